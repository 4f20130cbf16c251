use crate::cache::{CacheEntry, FileCache, Fingerprint};
use crate::config::FilterSettings;
use crate::filter::WordFilterPipeline;
use crate::parser::ParsedDocument;
use crate::WordList;
use log::debug;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobId(u64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "job#{}", self.0)
    }
}

/// Bookkeeping for a job between dispatch and completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobInfo {
    pub file: PathBuf,
    pub generation: u64,
    pub epoch: u64,
}

/// Outstanding jobs plus the per-file generation counters.
#[derive(Debug, Default)]
pub struct JobTable {
    next_id: u64,
    jobs: HashMap<JobId, JobInfo>,
    generations: HashMap<PathBuf, u64>,
}

impl JobTable {
    /// Register a new job for `file`; its generation is above every earlier
    /// job's for the same file.
    pub fn register(&mut self, file: &Path, epoch: u64) -> (JobId, JobInfo) {
        self.next_id += 1;
        let id = JobId(self.next_id);

        let generation = self.generations.entry(file.to_path_buf()).or_insert(0);
        *generation += 1;

        let info = JobInfo {
            file: file.to_path_buf(),
            generation: *generation,
            epoch,
        };
        self.jobs.insert(id, info.clone());
        (id, info)
    }

    pub fn get(&self, id: JobId) -> Option<&JobInfo> {
        self.jobs.get(&id)
    }

    pub fn complete(&mut self, id: JobId) -> Option<JobInfo> {
        self.jobs.remove(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn files_in_process(&self) -> BTreeSet<PathBuf> {
        self.jobs.values().map(|info| info.file.clone()).collect()
    }
}

/// Everything one parse needs, captured when it is dispatched.
pub struct ParseJob {
    pub id: JobId,
    pub info: JobInfo,
    pub(crate) document: ParsedDocument,
    pub(crate) previous: Arc<FileCache>,
    pub(crate) settings: Arc<FilterSettings>,
    pub(crate) pipeline: Arc<WordFilterPipeline>,
    pub(crate) canceled: Arc<AtomicBool>,
}

/// Result of running a job, waiting to be committed.
#[derive(Debug)]
pub struct ParseOutcome {
    pub id: JobId,
    pub cache: FileCache,
    pub words: WordList,
    pub hits: usize,
    pub misses: usize,
}

impl ParseJob {
    /// Filter every token, reusing entries from the previous generation.
    /// Returns `None` when the processor was shut down meanwhile.
    pub fn run(self) -> Option<ParseOutcome> {
        if self.canceled.load(Ordering::Acquire) {
            return None;
        }

        let mut cache = FileCache::new(self.info.generation);
        let mut words = Vec::new();
        let (mut hits, mut misses) = (0, 0);

        for token in &self.document.tokens {
            let fingerprint = Fingerprint::of(&token.text);
            let cached = cache
                .lookup(fingerprint)
                .or_else(|| self.previous.lookup(fingerprint))
                .map(|entry| entry.relocated(token.line, token.column));

            let token_words = match cached {
                Some(found) => {
                    hits += 1;
                    found
                }
                None => {
                    misses += 1;
                    self.pipeline.filter(
                        &token.text,
                        token.position(),
                        &self.settings,
                        &self.document.identifiers,
                    )
                }
            };

            words.extend(token_words.iter().cloned());
            cache.record(CacheEntry::new(fingerprint, token.line, token.column, token_words));
        }

        if self.canceled.load(Ordering::Acquire) {
            return None;
        }

        debug!(
            "{} for {}: {} tokens, {} cached, {} filtered",
            self.id,
            self.info.file.display(),
            self.document.tokens.len(),
            hits,
            misses
        );

        Some(ParseOutcome {
            id: self.id,
            cache,
            words,
            hits,
            misses,
        })
    }
}
