//! # Vocab Filter
//!
//! Vocabulary extraction and filtering for corpus preparation.
//!
//! ## Features
//!
//! - **Tokenization**: runs of ASCII letters, lowercased, with minimum and
//!   maximum lengths
//! - **Case-insensitive word set**: fixed-size chained hash table (djb2)
//! - **Exclusion lists**: any number of files or directories of lists
//! - **Encoding detection**: UTF-16 and legacy encodings are transcoded
//!   before tokenization
//!
//! ## Usage
//!
//! ```bash
//! # Vocabulary of a novel minus a stop-word list
//! vocab-filter novel.txt stopwords.txt
//!
//! # Several lists, sorted output
//! vocab-filter novel.txt common.txt slang.txt --sort
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use vocab_filter::processor::{Processor, ProcessorConfig};
//! use std::path::{Path, PathBuf};
//!
//! let mut processor = Processor::new(ProcessorConfig::default());
//! let vocabulary = processor
//!     .run(Path::new("novel.txt"), &[PathBuf::from("stopwords.txt")])
//!     .unwrap();
//!
//! for word in &vocabulary {
//!     println!("{}", word);
//! }
//! ```

pub mod cli;
pub mod encoding;
pub mod error;
pub mod output;
pub mod processor;
pub mod progress;
pub mod tokenizer;
pub mod wordset;

pub use cli::Args;
pub use error::{Result, VocabError};
pub use processor::{ProcessMode, Processor, ProcessorConfig};
pub use tokenizer::TokenizerConfig;
pub use wordset::WordSet;
