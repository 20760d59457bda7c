//! Core processing engine
//!
//! Feeds the source document's tokens into a [`WordSet`], then removes the
//! tokens of every exclusion list. Files are processed strictly one after
//! another; a file that cannot be opened or read is reported and skipped,
//! while failing to create the set aborts the run.

use crate::cli::Args;
use crate::encoding::{decoded_reader, open_input, resolve_encoding, ReadMode};
use crate::error::{Result, VocabError};
use crate::progress::{create_bytes_progress_bar, print_bullet, print_error, print_info, print_warning, ProcessingStats};
use crate::tokenizer::TokenizerConfig;
use crate::wordset::{WordSet, DEFAULT_BUCKETS};

use encoding_rs::Encoding;
use indicatif::ProgressBar;
use std::error::Error as _;
use std::fmt;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// What a file's tokens do to the word set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessMode {
    /// Source document: tokens are added
    Add,
    /// Exclusion list: tokens are removed
    Remove,
}

impl fmt::Display for ProcessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessMode::Add => write!(f, "source"),
            ProcessMode::Remove => write!(f, "exclusion"),
        }
    }
}

/// Processor configuration
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    pub tokenizer: TokenizerConfig,
    pub buckets: usize,
    pub read_mode: ReadMode,
    /// Forced input encoding; auto-detected per file when `None`
    pub encoding: Option<&'static Encoding>,
    pub recursive: bool,
    pub extensions: Vec<String>,
    pub quiet: bool,
    pub verbose: bool,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            tokenizer: TokenizerConfig::default(),
            buckets: DEFAULT_BUCKETS,
            read_mode: ReadMode::Buffered,
            encoding: None,
            recursive: false,
            extensions: vec!["txt".to_string()],
            quiet: false,
            verbose: false,
        }
    }
}

impl ProcessorConfig {
    pub fn from_args(args: &Args) -> anyhow::Result<Self> {
        let encoding = args.encoding.as_deref().map(resolve_encoding).transpose()?;

        Ok(Self {
            tokenizer: TokenizerConfig::new(args.min_length, args.max_length)?,
            buckets: args.buckets,
            read_mode: args.read_mode(),
            encoding,
            recursive: args.recursive,
            extensions: args.get_extensions(),
            quiet: args.quiet,
            verbose: args.verbose,
        })
    }
}

/// Outcome of processing one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub path: PathBuf,
    pub mode: ProcessMode,
    /// Tokens read from the file
    pub tokens: u64,
    /// Words added (add mode) or removed (remove mode)
    pub changed: u64,
    /// Words dropped because their entry could not be allocated
    pub dropped: u64,
}

/// Main processor
pub struct Processor {
    config: ProcessorConfig,
    stats: ProcessingStats,
}

impl Processor {
    pub fn new(config: ProcessorConfig) -> Self {
        Self {
            config,
            stats: ProcessingStats::new(),
        }
    }

    /// Build the vocabulary of `source` minus every word in `exclusions`
    ///
    /// Fatal errors, such as failing to create the set, are returned;
    /// per-file failures are reported and skipped.
    pub fn run(&mut self, source: &Path, exclusions: &[PathBuf]) -> Result<WordSet> {
        let mut set = WordSet::new(self.config.buckets)?;

        self.process_path(source, &mut set, ProcessMode::Add)?;

        for exclusion in exclusions {
            if exclusion.is_dir() {
                let files = self.collect_directory(exclusion);
                if files.is_empty() && !self.config.quiet {
                    print_warning(&format!(
                        "No exclusion files with extensions {:?} found in {}",
                        self.config.extensions,
                        exclusion.display()
                    ));
                }
                for file in files {
                    self.process_path(&file, &mut set, ProcessMode::Remove)?;
                }
            } else {
                self.process_path(exclusion, &mut set, ProcessMode::Remove)?;
            }
        }

        Ok(set)
    }

    /// Announce and process one file
    ///
    /// Non-fatal failures are reported and the file is skipped; fatal ones
    /// are handed back to abort the run.
    fn process_path(&mut self, path: &Path, set: &mut WordSet, mode: ProcessMode) -> Result<()> {
        if !self.config.quiet {
            print_info(&format!("Processing {} file: {}", mode, path.display()));
        }

        match self.process_file(path, set, mode) {
            Ok(report) => {
                log::info!(
                    "{}: {} tokens, {} words {}, {} dropped",
                    report.path.display(),
                    report.tokens,
                    report.changed,
                    match report.mode {
                        ProcessMode::Add => "added",
                        ProcessMode::Remove => "removed",
                    },
                    report.dropped
                );
                Ok(())
            }
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                report_error(&e);
                self.stats.skip_file();
                Ok(())
            }
        }
    }

    /// Tokenize `path` and apply every token to `set` according to `mode`
    pub fn process_file(&mut self, path: &Path, set: &mut WordSet, mode: ProcessMode) -> Result<FileReport> {
        let input = open_input(path, self.config.read_mode, self.config.encoding)?;
        log::debug!(
            "{}: {} bytes, encoding {} (confidence {:.2})",
            path.display(),
            input.size,
            input.encoding.name,
            input.encoding.confidence
        );

        let pb = if self.config.quiet {
            ProgressBar::hidden()
        } else {
            let name = path.file_name().unwrap_or_default().to_string_lossy();
            create_bytes_progress_bar(input.size, &name)
        };

        let reader = decoded_reader(pb.wrap_read(input.reader), input.encoding.encoding);

        let mut report = FileReport {
            path: path.to_path_buf(),
            mode,
            tokens: 0,
            changed: 0,
            dropped: 0,
        };

        for token in self.config.tokenizer.tokens(reader) {
            let token = match token {
                Ok(token) => token,
                Err(source) => {
                    pb.finish_and_clear();
                    return Err(VocabError::Read {
                        path: path.to_path_buf(),
                        source,
                    });
                }
            };

            report.tokens += 1;
            self.apply(set, mode, &token, &mut report);
        }

        pb.finish_and_clear();
        self.stats.complete_file(input.size);

        Ok(report)
    }

    fn apply(&mut self, set: &mut WordSet, mode: ProcessMode, token: &str, report: &mut FileReport) {
        self.stats.tokens_seen += 1;

        match mode {
            ProcessMode::Add => match set.add(token) {
                Ok(true) => {
                    report.changed += 1;
                    self.stats.words_added += 1;
                }
                Ok(false) => self.stats.duplicate_tokens += 1,
                Err(e) => {
                    // The set is unchanged; only this word is lost
                    print_error(&e.to_string());
                    report.dropped += 1;
                    self.stats.dropped_words += 1;
                }
            },
            ProcessMode::Remove => {
                if set.remove(token) {
                    report.changed += 1;
                    self.stats.words_removed += 1;
                }
            }
        }
    }

    /// Files inside an exclusion directory, sorted by path
    fn collect_directory(&self, dir: &Path) -> Vec<PathBuf> {
        let walker = if self.config.recursive {
            WalkDir::new(dir)
        } else {
            WalkDir::new(dir).max_depth(1)
        };

        let mut files: Vec<PathBuf> = walker
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    log::warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| {
                entry
                    .path()
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| self.config.extensions.contains(&ext.to_lowercase()))
                    .unwrap_or(false)
            })
            .map(|entry| entry.into_path())
            .collect();

        files.sort();

        if self.config.verbose && !self.config.quiet {
            for file in &files {
                print_bullet(&file.display().to_string());
            }
        }

        files
    }

    /// Get processing statistics
    pub fn stats(&self) -> &ProcessingStats {
        &self.stats
    }
}

/// Print an error and its chain of causes
fn report_error(e: &VocabError) {
    print_error(&format!("Error: {}", e));

    let mut source = e.source();
    while let Some(err) = source {
        print_error(&format!("  Caused by: {}", err));
        source = err.source();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn quiet_config() -> ProcessorConfig {
        ProcessorConfig {
            quiet: true,
            ..ProcessorConfig::default()
        }
    }

    fn sorted(set: &WordSet) -> Vec<String> {
        let mut words: Vec<String> = set.iter().map(str::to_string).collect();
        words.sort();
        words
    }

    #[test]
    fn test_end_to_end_filtering() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source.txt");
        let exclusion = dir.path().join("exclude.txt");
        fs::write(&source, "The quick brown fox jumps over the lazy dog").unwrap();
        fs::write(&exclusion, "the over").unwrap();

        let mut processor = Processor::new(quiet_config());
        let set = processor.run(&source, &[exclusion]).unwrap();

        assert_eq!(sorted(&set), vec!["brown", "jumps", "lazy", "quick"]);
        assert_eq!(processor.stats().files_processed, 2);
        assert_eq!(processor.stats().words_removed, 1);
    }

    #[test]
    fn test_missing_exclusion_file_is_skipped() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source.txt");
        fs::write(&source, "Alpha beta gamma delta").unwrap();

        let mut processor = Processor::new(quiet_config());
        let set = processor
            .run(&source, &[dir.path().join("missing.txt")])
            .unwrap();

        assert_eq!(sorted(&set), vec!["alpha", "beta", "delta", "gamma"]);
        assert_eq!(processor.stats().files_skipped, 1);
    }

    #[test]
    fn test_missing_source_yields_empty_set() {
        let dir = TempDir::new().unwrap();
        let exclusion = dir.path().join("exclude.txt");
        fs::write(&exclusion, "word").unwrap();

        let mut processor = Processor::new(quiet_config());
        let set = processor
            .run(&dir.path().join("missing.txt"), &[exclusion])
            .unwrap();

        assert!(set.is_empty());
    }

    #[test]
    fn test_unreadable_paths_are_skipped_not_fatal() {
        let dir = TempDir::new().unwrap();
        let exclusion = dir.path().join("exclude.txt");
        fs::write(&exclusion, "word").unwrap();

        let mut processor = Processor::new(quiet_config());
        let mut set = WordSet::new(16).unwrap();
        let err = processor
            .process_file(dir.path(), &mut set, ProcessMode::Add)
            .unwrap_err();
        assert!(!err.is_fatal());

        // A directory given as the source is skipped like a missing file
        let set = processor.run(dir.path(), &[exclusion]).unwrap();
        assert!(set.is_empty());
        assert_eq!(processor.stats().files_skipped, 1);
        assert_eq!(processor.stats().files_processed, 1);
    }

    #[test]
    fn test_zero_buckets_is_fatal() {
        let dir = TempDir::new().unwrap();
        let config = ProcessorConfig {
            buckets: 0,
            ..quiet_config()
        };

        let mut processor = Processor::new(config);
        let err = processor
            .run(&dir.path().join("a.txt"), &[dir.path().join("b.txt")])
            .unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_process_file_reports_counts() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source.txt");
        fs::write(&source, "Word word WORD other").unwrap();

        let mut processor = Processor::new(quiet_config());
        let mut set = WordSet::new(16).unwrap();
        let report = processor.process_file(&source, &mut set, ProcessMode::Add).unwrap();

        assert_eq!(report.path, source);
        assert_eq!(report.tokens, 4);
        assert_eq!(report.changed, 2);
        assert_eq!(report.dropped, 0);
        assert_eq!(processor.stats().duplicate_tokens, 2);

        let removal = processor.process_file(&source, &mut set, ProcessMode::Remove).unwrap();
        assert_eq!(removal.changed, 2);
        assert!(set.is_empty());
    }

    #[test]
    fn test_exclusion_directory_is_expanded() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source.txt");
        fs::write(&source, "north south east west").unwrap();

        let lists = dir.path().join("lists");
        fs::create_dir_all(lists.join("nested")).unwrap();
        fs::write(lists.join("common.txt"), "north").unwrap();
        fs::write(lists.join("slang.txt"), "south").unwrap();
        fs::write(lists.join("notes.md"), "east").unwrap();
        fs::write(lists.join("nested").join("deep.txt"), "west").unwrap();

        let mut processor = Processor::new(quiet_config());
        let set = processor.run(&source, &[lists.clone()]).unwrap();
        assert_eq!(sorted(&set), vec!["east", "west"]);

        let recursive = ProcessorConfig {
            recursive: true,
            ..quiet_config()
        };
        let mut processor = Processor::new(recursive);
        let set = processor.run(&source, &[lists]).unwrap();
        assert_eq!(sorted(&set), vec!["east"]);
    }

    #[test]
    fn test_custom_lengths() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source.txt");
        let exclusion = dir.path().join("exclude.txt");
        fs::write(&source, "hello, world! foo123bar").unwrap();
        fs::write(&exclusion, "").unwrap();

        let config = ProcessorConfig {
            tokenizer: TokenizerConfig::new(3, 63).unwrap(),
            ..quiet_config()
        };
        let mut processor = Processor::new(config);
        let set = processor.run(&source, &[exclusion]).unwrap();

        assert_eq!(sorted(&set), vec!["bar", "foo", "hello", "world"]);
    }

    #[test]
    fn test_mmap_mode() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source.txt");
        let exclusion = dir.path().join("exclude.txt");
        fs::write(&source, "The quick brown fox jumps over the lazy dog").unwrap();
        fs::write(&exclusion, "QUICK").unwrap();

        let config = ProcessorConfig {
            read_mode: ReadMode::Mmap,
            ..quiet_config()
        };
        let mut processor = Processor::new(config);
        let set = processor.run(&source, &[exclusion]).unwrap();

        assert_eq!(sorted(&set), vec!["brown", "jumps", "lazy", "over"]);
    }
}
