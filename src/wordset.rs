//! Case-insensitive word set
//!
//! A fixed-size hash table with chained buckets. The bucket count is chosen
//! at construction and never changes, so the table is sized for an expected
//! vocabulary up front; chains simply grow past that point.
//!
//! Enumeration walks buckets in index order and each chain from the most
//! recently inserted word to the oldest.

use crate::error::{Result, VocabError};
use std::iter::Rev;
use std::mem;
use std::slice;

/// Default number of buckets
pub const DEFAULT_BUCKETS: usize = 16384;

const DJB2_SEED: u64 = 5381;

/// djb2 string hash over the ASCII-lowercased bytes of `word`
///
/// Words differing only in case hash identically.
#[inline]
pub fn hash_word(word: &str) -> u64 {
    word.bytes().fold(DJB2_SEED, |hash, byte| {
        // hash * 33 + c
        (hash << 5)
            .wrapping_add(hash)
            .wrapping_add(u64::from(byte.to_ascii_lowercase()))
    })
}

/// Case-insensitive set of words backed by a chained hash table
#[derive(Debug)]
pub struct WordSet {
    // Newest entry of each chain sits at the end of its Vec.
    buckets: Vec<Vec<String>>,
    len: usize,
}

impl WordSet {
    /// Create a set with `bucket_count` empty buckets
    ///
    /// Fails when the count is zero or the bucket array cannot be allocated.
    pub fn new(bucket_count: usize) -> Result<Self> {
        if bucket_count == 0 {
            return Err(VocabError::TableCreation { buckets: 0 });
        }

        let mut buckets = Vec::new();
        buckets
            .try_reserve_exact(bucket_count)
            .map_err(|_| VocabError::TableCreation { buckets: bucket_count })?;
        buckets.resize_with(bucket_count, Vec::new);

        Ok(Self { buckets, len: 0 })
    }

    /// Create a set with the default bucket count
    pub fn with_default_buckets() -> Result<Self> {
        Self::new(DEFAULT_BUCKETS)
    }

    #[inline]
    fn bucket_index(&self, word: &str) -> usize {
        (hash_word(word) % self.buckets.len() as u64) as usize
    }

    /// Insert `word` unless a case variant of it is already present
    ///
    /// Returns `Ok(true)` if the word was new. On allocation failure the set
    /// is left untouched and `EntryAllocation` is returned.
    pub fn add(&mut self, word: &str) -> Result<bool> {
        let index = self.bucket_index(word);
        let chain = &mut self.buckets[index];

        if chain.iter().any(|existing| existing.eq_ignore_ascii_case(word)) {
            return Ok(false);
        }

        let alloc_error = || VocabError::EntryAllocation {
            word: word.to_string(),
        };

        let mut entry = String::new();
        entry.try_reserve_exact(word.len()).map_err(|_| alloc_error())?;
        entry.push_str(word);
        entry.make_ascii_lowercase();

        chain.try_reserve(1).map_err(|_| alloc_error())?;
        chain.push(entry);
        self.len += 1;

        Ok(true)
    }

    /// Remove the entry matching `word` case-insensitively
    ///
    /// Returns `true` if an entry was removed.
    pub fn remove(&mut self, word: &str) -> bool {
        let index = self.bucket_index(word);
        let chain = &mut self.buckets[index];

        match chain.iter().position(|existing| existing.eq_ignore_ascii_case(word)) {
            Some(pos) => {
                // Vec::remove keeps the remaining chain order intact
                chain.remove(pos);
                self.len -= 1;
                true
            }
            None => false,
        }
    }

    /// Case-insensitive membership test
    pub fn contains(&self, word: &str) -> bool {
        self.buckets[self.bucket_index(word)]
            .iter()
            .any(|existing| existing.eq_ignore_ascii_case(word))
    }

    /// Number of words in the set
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of buckets fixed at construction
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Average chain length
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.buckets.len() as f64
    }

    /// Length of the longest chain
    pub fn max_chain_len(&self) -> usize {
        self.buckets.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Approximate heap usage in bytes
    pub fn memory_usage(&self) -> usize {
        let table = self.buckets.capacity() * mem::size_of::<Vec<String>>();
        let entries: usize = self
            .buckets
            .iter()
            .map(|chain| {
                chain.capacity() * mem::size_of::<String>()
                    + chain.iter().map(String::capacity).sum::<usize>()
            })
            .sum();
        table + entries
    }

    /// Drop every entry, keeping the bucket array
    pub fn clear(&mut self) {
        for chain in &mut self.buckets {
            chain.clear();
        }
        self.len = 0;
    }

    /// Iterate over the words in bucket-then-chain order
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            buckets: self.buckets.iter(),
            chain: None,
        }
    }
}

/// Iterator over the words of a [`WordSet`]
pub struct Iter<'a> {
    buckets: slice::Iter<'a, Vec<String>>,
    chain: Option<Rev<slice::Iter<'a, String>>>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(word) = self.chain.as_mut().and_then(|chain| chain.next()) {
                return Some(word.as_str());
            }
            self.chain = Some(self.buckets.next()?.iter().rev());
        }
    }
}

impl<'a> IntoIterator for &'a WordSet {
    type Item = &'a str;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
