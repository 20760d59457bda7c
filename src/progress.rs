//! Progress display module
//!
//! Status lines, per-file progress bars and the statistics summary. All of
//! it goes to stderr; stdout is reserved for the vocabulary.

use crate::wordset::WordSet;
use bytesize::ByteSize;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::{Duration, Instant};

/// Print an info message
pub fn print_info(text: &str) {
    eprintln!("  {} {}", "ℹ".cyan(), text);
}

/// Print a success message
pub fn print_success(text: &str) {
    eprintln!("  {} {}", "✔".green(), text.green());
}

/// Print a warning message
pub fn print_warning(text: &str) {
    eprintln!("  {} {}", "⚠".yellow(), text.yellow());
}

/// Print an error message
pub fn print_error(text: &str) {
    eprintln!("  {} {}", "✖".red(), text.red());
}

/// Print a bullet point
pub fn print_bullet(text: &str) {
    eprintln!("  {} {}", "•".green(), text);
}

/// Create a bytes-based progress bar
pub fn create_bytes_progress_bar(total_bytes: u64, msg: &str) -> ProgressBar {
    let pb = ProgressBar::new(total_bytes);

    // The template is a literal; a parse failure only loses the styling
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.green/dim}] {bytes}/{total_bytes} ({bytes_per_sec}) {msg}")
    {
        pb.set_style(style.progress_chars("█▓░"));
    }

    pb.set_message(msg.to_string());

    pb
}

/// Processing statistics
#[derive(Debug)]
pub struct ProcessingStats {
    pub files_processed: u64,
    pub files_skipped: u64,
    pub bytes_processed: u64,
    pub tokens_seen: u64,
    pub words_added: u64,
    pub duplicate_tokens: u64,
    pub words_removed: u64,
    pub dropped_words: u64,
    pub start_time: Instant,
}

impl ProcessingStats {
    pub fn new() -> Self {
        Self {
            files_processed: 0,
            files_skipped: 0,
            bytes_processed: 0,
            tokens_seen: 0,
            words_added: 0,
            duplicate_tokens: 0,
            words_removed: 0,
            dropped_words: 0,
            start_time: Instant::now(),
        }
    }

    pub fn complete_file(&mut self, size: u64) {
        self.files_processed += 1;
        self.bytes_processed += size;
    }

    pub fn skip_file(&mut self) {
        self.files_skipped += 1;
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn tokens_per_second(&self) -> f64 {
        let elapsed = self.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.tokens_seen as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Print final statistics for the run that produced `set`
    pub fn print_summary(&self, set: &WordSet) {
        eprintln!();
        eprintln!("{}", "═".repeat(60).green());
        eprintln!("{}", "                    PROCESSING COMPLETE".green().bold());
        eprintln!("{}", "═".repeat(60).green());
        eprintln!();

        eprintln!("  {} {}", "Files processed:".green(), format_number(self.files_processed));
        if self.files_skipped > 0 {
            eprintln!("  {} {}", "Files skipped:  ".red(), format_number(self.files_skipped).red());
        }
        eprintln!("  {} {}", "Data processed: ".green(), ByteSize(self.bytes_processed));
        eprintln!();

        eprintln!("  {} {}", "Tokens seen:    ".green(), format_number(self.tokens_seen));
        eprintln!("  {} {}", "Words added:    ".green(), format_number(self.words_added));
        eprintln!("  {} {}", "Duplicates:     ".yellow(), format_number(self.duplicate_tokens));
        eprintln!("  {} {}", "Words removed:  ".green(), format_number(self.words_removed));
        if self.dropped_words > 0 {
            eprintln!("  {} {}", "Dropped words:  ".red(), format_number(self.dropped_words).red());
        }
        eprintln!(
            "  {} {}",
            "Vocabulary:     ".green().bold(),
            format_number(set.len() as u64).green().bold()
        );
        eprintln!();

        eprintln!("  {} {}", "Buckets:        ".green(), format_number(set.bucket_count() as u64));
        eprintln!("  {} {:.3}", "Load factor:    ".green(), set.load_factor());
        eprintln!("  {} {}", "Longest chain:  ".green(), set.max_chain_len());
        eprintln!("  {} {}", "Table memory:   ".green(), ByteSize(set.memory_usage() as u64));
        eprintln!();

        eprintln!("  {} {}", "Duration:       ".green(), format_duration(self.elapsed()));
        eprintln!("  {} {:.2} tokens/sec", "Throughput:     ".green(), self.tokens_per_second());
        eprintln!();
        eprintln!("{}", "═".repeat(60).green());
    }
}

impl Default for ProcessingStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a number with thousand separators
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    let chars: Vec<char> = s.chars().collect();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }

    result
}

/// Format duration as human-readable string
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();

    if secs < 60 {
        format!("{:.1}s", duration.as_secs_f64())
    } else if secs < 3600 {
        let mins = secs / 60;
        let secs = secs % 60;
        format!("{}m {}s", mins, secs)
    } else {
        let hours = secs / 3600;
        let mins = (secs % 3600) / 60;
        format!("{}h {}m", hours, mins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(123), "123");
        assert_eq!(format_number(1234), "1,234");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(30)), "30.0s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
        assert_eq!(format_duration(Duration::from_secs(3661)), "1h 1m");
    }

    #[test]
    fn test_stats() {
        let mut stats = ProcessingStats::new();

        stats.complete_file(100);
        stats.complete_file(50);
        stats.skip_file();

        assert_eq!(stats.files_processed, 2);
        assert_eq!(stats.bytes_processed, 150);
        assert_eq!(stats.files_skipped, 1);
    }
}
