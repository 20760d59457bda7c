//! Error types for vocabulary processing
//!
//! Fatal and per-file failures are kept apart so the processor can decide
//! which ones abort the run and which ones only skip a unit of work.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the word set, the readers and the output writer
#[derive(Error, Debug)]
pub enum VocabError {
    /// The bucket array of the word set could not be allocated
    #[error("could not create vocabulary table with {buckets} buckets")]
    TableCreation { buckets: usize },

    /// A single entry could not be allocated; the word is dropped
    #[error("failed to allocate memory for word '{word}'")]
    EntryAllocation { word: String },

    /// An input file could not be opened
    #[error("could not open file '{}'", path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An input file failed while being read
    #[error("failed reading file '{}'", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Invalid command-line or configuration value
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Writing the vocabulary failed
    #[error("failed to write vocabulary")]
    Output(#[from] io::Error),
}

impl VocabError {
    /// Whether this error must terminate the whole run
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            VocabError::TableCreation { .. } | VocabError::InvalidArgument(_) | VocabError::Output(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, VocabError>;
