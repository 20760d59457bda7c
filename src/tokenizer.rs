//! Word tokenization
//!
//! Turns a byte stream into normalized word tokens: maximal runs of ASCII
//! letters, lowercased, at least `min_length` long. Runs longer than
//! `max_length` are truncated to their first `max_length` letters rather
//! than split or discarded. Every other byte, including non-ASCII UTF-8
//! bytes, is a delimiter.

use crate::error::{Result, VocabError};
use std::io::{self, BufRead, Bytes};
use std::mem;

/// Default minimum token length
pub const DEFAULT_MIN_LENGTH: usize = 4;

/// Default maximum token length; longer runs are truncated
pub const DEFAULT_MAX_LENGTH: usize = 63;

/// Token length bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenizerConfig {
    /// Tokens shorter than this are not emitted
    pub min_length: usize,
    /// Letters beyond this count are dropped from a run
    pub max_length: usize,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_MIN_LENGTH,
            max_length: DEFAULT_MAX_LENGTH,
        }
    }
}

impl TokenizerConfig {
    /// Create a validated configuration
    pub fn new(min_length: usize, max_length: usize) -> Result<Self> {
        if min_length == 0 {
            return Err(VocabError::InvalidArgument(
                "minimum word length must be at least 1".to_string(),
            ));
        }
        if min_length > max_length {
            return Err(VocabError::InvalidArgument(format!(
                "minimum word length ({}) must be <= maximum word length ({})",
                min_length, max_length
            )));
        }
        Ok(Self {
            min_length,
            max_length,
        })
    }

    /// Lazily tokenize a buffered reader
    pub fn tokens<R: BufRead>(&self, reader: R) -> Tokens<R> {
        Tokens {
            bytes: reader.bytes(),
            buffer: String::with_capacity(self.max_length),
            config: *self,
            finished: false,
        }
    }
}

/// Iterator of tokens over a reader
///
/// Yields `Err` at most once, after which the iterator is exhausted.
pub struct Tokens<R: BufRead> {
    bytes: Bytes<R>,
    buffer: String,
    config: TokenizerConfig,
    finished: bool,
}

impl<R: BufRead> Tokens<R> {
    /// Close the current run, returning it if it is long enough
    fn take_token(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            return None;
        }
        if self.buffer.len() >= self.config.min_length {
            Some(mem::take(&mut self.buffer))
        } else {
            self.buffer.clear();
            None
        }
    }
}

impl<R: BufRead> Iterator for Tokens<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            match self.bytes.next() {
                Some(Ok(byte)) if byte.is_ascii_alphabetic() => {
                    if self.buffer.len() < self.config.max_length {
                        self.buffer.push(char::from(byte.to_ascii_lowercase()));
                    }
                }
                Some(Ok(_)) => {
                    if let Some(token) = self.take_token() {
                        return Some(Ok(token));
                    }
                }
                Some(Err(e)) => {
                    self.finished = true;
                    return Some(Err(e));
                }
                None => {
                    self.finished = true;
                    return self.take_token().map(Ok);
                }
            }
        }
    }
}
