//! Command-line interface definition for vocab-filter
//!
//! Provides argument parsing and validation for the vocabulary filter.

use crate::encoding::ReadMode;
use crate::tokenizer::{DEFAULT_MAX_LENGTH, DEFAULT_MIN_LENGTH};
use crate::wordset::DEFAULT_BUCKETS;
use clap::Parser;
use std::path::PathBuf;

/// Extract the vocabulary of a document and filter it against exclusion lists
///
/// Builds the set of unique words in SOURCE, then removes every word that
/// appears in any EXCLUSION list.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "vocab-filter",
    version,
    about = "Extract the vocabulary of a document and filter it against exclusion lists",
    long_about = r#"
Builds the set of unique words of a source document and removes every word
found in one or more exclusion lists (common words, slang, stop-words).

A word is a run of ASCII letters, lowercased. Runs shorter than the minimum
length are ignored; runs longer than the maximum length are truncated.

EXAMPLES:
    # Filter a novel against a stop-word list
    vocab-filter novel.txt stopwords.txt

    # Several exclusion lists, sorted output into a file
    vocab-filter novel.txt common.txt slang.txt --sort -o vocab.txt

    # Every .txt list inside a directory, words of 6+ letters
    vocab-filter corpus.txt lists/ -m 6

    # Legacy encoded source
    vocab-filter old.txt stopwords.txt --encoding latin1
"#
)]
pub struct Args {
    /// Source document whose vocabulary is extracted
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Exclusion word lists (files or directories)
    #[arg(value_name = "EXCLUSION", required = true, num_args = 1..)]
    pub exclusions: Vec<PathBuf>,

    /// Minimum word length
    #[arg(short = 'm', long, value_name = "LEN", default_value_t = DEFAULT_MIN_LENGTH)]
    pub min_length: usize,

    /// Maximum word length; longer runs are truncated
    #[arg(short = 'M', long, value_name = "LEN", default_value_t = DEFAULT_MAX_LENGTH)]
    pub max_length: usize,

    /// Number of hash table buckets (size for the expected vocabulary)
    #[arg(short, long, value_name = "NUM", default_value_t = DEFAULT_BUCKETS)]
    pub buckets: usize,

    /// Write the vocabulary to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Omit the header line
    #[arg(long, default_value_t = false)]
    pub no_header: bool,

    /// Sort output alphabetically
    #[arg(long, default_value_t = false)]
    pub sort: bool,

    /// Input encoding label (default: auto-detect)
    #[arg(long, value_name = "LABEL")]
    pub encoding: Option<String>,

    /// Memory-map input files
    #[arg(long, default_value_t = false)]
    pub mmap: bool,

    /// Descend into exclusion directories recursively
    #[arg(short, long, default_value_t = false)]
    pub recursive: bool,

    /// File extensions read from exclusion directories (default: txt)
    #[arg(long, value_name = "EXT", default_value = "txt")]
    pub extensions: String,

    /// Show detailed statistics
    #[arg(long, default_value_t = false)]
    pub stats: bool,

    /// Quiet mode - no progress output
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,

    /// Verbose mode - detailed logging
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Args {
    /// Check value ranges clap cannot express
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.min_length == 0 {
            anyhow::bail!("--min-length must be at least 1");
        }
        if self.max_length == 0 {
            anyhow::bail!("--max-length must be at least 1");
        }
        if self.min_length > self.max_length {
            anyhow::bail!(
                "--min-length ({}) must be <= --max-length ({})",
                self.min_length,
                self.max_length
            );
        }
        if self.buckets == 0 {
            anyhow::bail!("--buckets must be at least 1");
        }
        Ok(())
    }

    /// Parse file extensions to read from exclusion directories
    pub fn get_extensions(&self) -> Vec<String> {
        self.extensions
            .split(',')
            .map(|s| s.trim().trim_start_matches('.').to_lowercase())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn read_mode(&self) -> ReadMode {
        if self.mmap {
            ReadMode::Mmap
        } else {
            ReadMode::Buffered
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let args = Args::try_parse_from(["vocab-filter", "source.txt", "stop.txt"]).unwrap();

        assert_eq!(args.source, PathBuf::from("source.txt"));
        assert_eq!(args.exclusions, vec![PathBuf::from("stop.txt")]);
        assert_eq!(args.min_length, 4);
        assert_eq!(args.max_length, 63);
        assert_eq!(args.buckets, 16384);
        assert_eq!(args.read_mode(), ReadMode::Buffered);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_requires_an_exclusion_file() {
        assert!(Args::try_parse_from(["vocab-filter", "source.txt"]).is_err());
        assert!(Args::try_parse_from(["vocab-filter"]).is_err());
    }

    #[test]
    fn test_multiple_exclusions_and_options() {
        let args = Args::try_parse_from([
            "vocab-filter",
            "source.txt",
            "common.txt",
            "slang.txt",
            "-m",
            "6",
            "--sort",
            "--mmap",
        ])
        .unwrap();

        assert_eq!(args.exclusions.len(), 2);
        assert_eq!(args.min_length, 6);
        assert!(args.sort);
        assert_eq!(args.read_mode(), ReadMode::Mmap);
    }

    #[test]
    fn test_validate_rejects_bad_lengths() {
        let args = Args::try_parse_from(["vocab-filter", "a", "b", "-m", "10", "-M", "5"]).unwrap();
        assert!(args.validate().is_err());

        let args = Args::try_parse_from(["vocab-filter", "a", "b", "--buckets", "0"]).unwrap();
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_get_extensions() {
        let args =
            Args::try_parse_from(["vocab-filter", "a", "b", "--extensions", "txt, .LST,,csv"]).unwrap();
        assert_eq!(args.get_extensions(), vec!["txt", "lst", "csv"]);
    }
}
