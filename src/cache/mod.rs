//! Per-file memo of filtered words, keyed by the fingerprint of each
//! comment or string literal's text.
//!
//! A file's cache is a *generation*: the complete set of entries produced by
//! one parse. Generations are never edited after they are published; a new
//! parse builds a fresh [`FileCache`] and swaps it in whole, which drops the
//! entries of tokens that have disappeared from the file.

mod fingerprint;

pub use fingerprint::Fingerprint;

use crate::{Word, WordList};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use log::debug;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub fingerprint: Fingerprint,
    /// Position of the token the words were computed for
    pub line: usize,
    pub column: usize,
    pub words: Arc<[Word]>,
}

impl CacheEntry {
    pub fn new(fingerprint: Fingerprint, line: usize, column: usize, words: WordList) -> Self {
        Self {
            fingerprint,
            line,
            column,
            words: words.into(),
        }
    }

    /// The cached words moved to a token that now starts at `line`/`column`.
    /// Only the token's first line shifts horizontally.
    pub fn relocated(&self, line: usize, column: usize) -> WordList {
        let line_delta = line as isize - self.line as isize;
        let column_delta = column as isize - self.column as isize;

        self.words
            .iter()
            .map(|word| Word {
                text: word.text.clone(),
                line: word.line.saturating_add_signed(line_delta),
                column: if word.line == self.line {
                    word.column.saturating_add_signed(column_delta)
                } else {
                    word.column
                },
                length: word.length,
            })
            .collect()
    }
}

/// One generation of a file's cache.
#[derive(Debug, Clone, Default)]
pub struct FileCache {
    generation: u64,
    entries: HashMap<Fingerprint, CacheEntry>,
}

impl FileCache {
    pub fn new(generation: u64) -> Self {
        Self {
            generation,
            entries: HashMap::new(),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn lookup(&self, fingerprint: Fingerprint) -> Option<&CacheEntry> {
        self.entries.get(&fingerprint)
    }

    /// Later tokens with the same text replace the position of earlier ones.
    pub fn record(&mut self, entry: CacheEntry) {
        self.entries.insert(entry.fingerprint, entry);
    }

    pub fn contains(&self, fingerprint: Fingerprint) -> bool {
        self.entries.contains_key(&fingerprint)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Published generations for every tracked file.
#[derive(Debug, Default)]
pub struct TokenCache {
    files: DashMap<PathBuf, Arc<FileCache>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, file: &Path, fingerprint: Fingerprint) -> Option<CacheEntry> {
        self.files
            .get(file)
            .and_then(|cache| cache.lookup(fingerprint).cloned())
    }

    /// The current generation for `file`, empty when the file is unknown.
    pub fn generation(&self, file: &Path) -> Arc<FileCache> {
        self.files
            .get(file)
            .map(|cache| Arc::clone(cache.value()))
            .unwrap_or_default()
    }

    /// Publish `cache` as the file's generation, replacing the previous one.
    /// Returns false, leaving the published generation in place, when
    /// `cache` is older than it.
    pub fn record_and_commit(&self, file: &Path, cache: FileCache) -> bool {
        match self.files.entry(file.to_path_buf()) {
            Entry::Occupied(mut current) => {
                if current.get().generation() > cache.generation() {
                    debug!(
                        "Rejecting generation {} for {}: generation {} already committed",
                        cache.generation(),
                        file.display(),
                        current.get().generation()
                    );
                    return false;
                }
                current.insert(Arc::new(cache));
            }
            Entry::Vacant(slot) => {
                slot.insert(Arc::new(cache));
            }
        }
        true
    }

    pub fn remove_file(&self, file: &Path) {
        self.files.remove(file);
    }

    pub fn invalidate_all(&self) {
        self.files.clear();
    }

    pub fn tracked_files(&self) -> usize {
        self.files.len()
    }
}
