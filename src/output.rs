//! Output management module
//!
//! Writes the final vocabulary, one word per line, to stdout or a file.

use crate::error::{Result, VocabError};
use crate::wordset::WordSet;
use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Header line printed above the word list
pub const HEADER: &str = "--- Final Vocabulary ---";

/// Default buffer size for output (1MB)
const DEFAULT_BUFFER_SIZE: usize = 1024 * 1024;

/// How the vocabulary is rendered
#[derive(Debug, Clone, Default)]
pub struct OutputOptions {
    /// Destination file; stdout when `None`
    pub path: Option<PathBuf>,
    /// Omit the header line
    pub no_header: bool,
    /// Sort words alphabetically instead of table order
    pub sort: bool,
}

/// Buffered line writer for the vocabulary
pub struct VocabularyWriter<W: Write> {
    writer: BufWriter<W>,
    lines_written: u64,
}

impl<W: Write> VocabularyWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, inner),
            lines_written: 0,
        }
    }

    /// Write the blank separator line and the header
    pub fn write_header(&mut self) -> Result<()> {
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", HEADER)?;
        Ok(())
    }

    /// Write one word
    pub fn write_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.writer, "{}", line)?;
        self.lines_written += 1;
        Ok(())
    }

    /// Number of words written
    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }

    /// Flush and hand back the underlying writer
    pub fn finish(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| VocabError::Output(e.into_error()))
    }
}

/// Open the output destination: a created/truncated file or stdout
pub fn open_destination(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(path)?;
            Ok(Box::new(file))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}

/// Write every word of `set` to `dest`, returning the number of words
pub fn write_vocabulary<W: Write>(set: &WordSet, dest: W, options: &OutputOptions) -> Result<u64> {
    let mut writer = VocabularyWriter::new(dest);

    if !options.no_header {
        writer.write_header()?;
    }

    if options.sort {
        let mut words: Vec<&str> = set.iter().collect();
        words.sort_unstable();
        for word in words {
            writer.write_line(word)?;
        }
    } else {
        for word in set {
            writer.write_line(word)?;
        }
    }

    let written = writer.lines_written();
    writer.finish()?.flush()?;
    log::debug!("Wrote {} words", written);

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_set() -> WordSet {
        let mut set = WordSet::new(1).unwrap();
        for word in ["zebra", "apple", "mango"] {
            set.add(word).unwrap();
        }
        set
    }

    #[test]
    fn test_writer_counts() {
        let mut writer = VocabularyWriter::new(Vec::new());
        writer.write_line("hello").unwrap();
        writer.write_line("world").unwrap();

        assert_eq!(writer.lines_written(), 2);

        let content = writer.finish().unwrap();
        assert_eq!(content, b"hello\nworld\n");
    }

    #[test]
    fn test_vocabulary_with_header_in_table_order() {
        let set = sample_set();
        let mut out = Vec::new();

        let count = write_vocabulary(&set, &mut out, &OutputOptions::default()).unwrap();

        assert_eq!(count, 3);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "\n--- Final Vocabulary ---\nmango\napple\nzebra\n");
    }

    #[test]
    fn test_sorted_without_header() {
        let set = sample_set();
        let mut out = Vec::new();
        let options = OutputOptions {
            path: None,
            no_header: true,
            sort: true,
        };

        write_vocabulary(&set, &mut out, &options).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "apple\nmango\nzebra\n");
    }

    #[test]
    fn test_file_destination_is_truncated() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("vocab.txt");
        std::fs::write(&path, "stale content that is much longer\n").unwrap();

        let dest = open_destination(Some(&path)).unwrap();
        let options = OutputOptions {
            path: Some(path.clone()),
            no_header: true,
            sort: true,
        };
        write_vocabulary(&sample_set(), dest, &options).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "apple\nmango\nzebra\n");
    }
}
