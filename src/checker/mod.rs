pub mod jobs;
pub mod project;

use crate::cache::TokenCache;
use crate::config::{CoreSettings, FilterSettings};
use crate::error::Result;
use crate::filter::WordFilterPipeline;
use crate::parser::ParsedDocument;
use crate::WordList;
use dashmap::DashMap;
use jobs::{JobId, JobInfo, JobTable, ParseJob, ParseOutcome};
use log::{debug, info, warn};
use project::ProjectFiles;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

/// Receives the authoritative word list of a file after each parse.
pub trait WordsConsumer: Send + Sync {
    fn words_parsed(&self, file: &Path, words: WordList);
}

impl<F> WordsConsumer for F
where
    F: Fn(&Path, WordList) + Send + Sync,
{
    fn words_parsed(&self, file: &Path, words: WordList) {
        self(file, words)
    }
}

/// The lexer side: asked to lex files again and feed them back through
/// [`DocumentProcessor::document_updated`].
pub trait DocumentSource: Send + Sync {
    fn update_source_files(&self, files: &BTreeSet<PathBuf>);
}

/// A source that cannot re-lex anything on request.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoReparse;

impl DocumentSource for NoReparse {
    fn update_source_files(&self, _files: &BTreeSet<PathBuf>) {}
}

/// State guarded by one lock: job bookkeeping, the settings snapshot and
/// the project membership.
struct State {
    jobs: JobTable,
    /// Committed results not yet handed to the consumer
    emitting: usize,
    settings: Arc<FilterSettings>,
    core: CoreSettings,
    epoch: u64,
    project: ProjectFiles,
}

impl State {
    fn is_idle(&self) -> bool {
        self.jobs.is_empty() && self.emitting == 0
    }
}

struct Shared {
    state: Mutex<State>,
    idle: Condvar,
    cache: TokenCache,
    /// Last generation handed to the consumer, per file. Held across the
    /// consumer call so emissions for one file never overtake each other.
    emitted: DashMap<PathBuf, Arc<Mutex<u64>>>,
    canceled: Arc<AtomicBool>,
    consumer: Arc<dyn WordsConsumer>,
}

/// A committed parse on its way to the consumer.
struct Committed {
    file: PathBuf,
    generation: u64,
    words: WordList,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Commit the outcome and retire the job, then hand the words to the
    /// consumer.
    fn finish(&self, id: JobId, outcome: Option<ParseOutcome>) -> Option<WordList> {
        let committed = self.commit(id, outcome)?;
        let emitted = self.emit(&committed);

        let mut state = self.lock();
        state.emitting -= 1;
        if state.is_idle() {
            self.idle.notify_all();
        }
        emitted.then_some(committed.words)
    }

    /// Publishes the generation and retires the job in one critical section.
    /// Canceled, unknown, stale and outdated-settings results are dropped
    /// here and never reach the consumer.
    fn commit(&self, id: JobId, outcome: Option<ParseOutcome>) -> Option<Committed> {
        let mut state = self.lock();
        let Some(info) = state.jobs.complete(id) else {
            debug!("{} finished but is no longer tracked", id);
            return None;
        };
        let committed = self.check_commit(id, &info, state.epoch, outcome);
        if committed.is_some() {
            state.emitting += 1;
        } else if state.is_idle() {
            self.idle.notify_all();
        }
        committed
    }

    fn check_commit(
        &self,
        id: JobId,
        info: &JobInfo,
        epoch: u64,
        outcome: Option<ParseOutcome>,
    ) -> Option<Committed> {
        let Some(outcome) = outcome else {
            debug!("{} for {} was canceled", id, info.file.display());
            return None;
        };
        if self.canceled.load(Ordering::Acquire) {
            debug!("Discarding {} for {}: shutting down", id, info.file.display());
            return None;
        }
        if info.epoch != epoch {
            warn!(
                "Discarding {} for {}: settings changed while it ran",
                id,
                info.file.display()
            );
            return None;
        }
        if !self.cache.record_and_commit(&info.file, outcome.cache) {
            warn!(
                "Discarding {} for {}: a newer parse was already committed",
                id,
                info.file.display()
            );
            return None;
        }

        debug!(
            "{} committed {} words for {} ({} cached, {} filtered)",
            id,
            outcome.words.len(),
            info.file.display(),
            outcome.hits,
            outcome.misses
        );
        Some(Committed {
            file: info.file.clone(),
            generation: info.generation,
            words: outcome.words,
        })
    }

    /// Hand `committed` to the consumer unless a newer generation of the
    /// same file got there first.
    fn emit(&self, committed: &Committed) -> bool {
        let gate = Arc::clone(
            self.emitted
                .entry(committed.file.clone())
                .or_default()
                .value(),
        );
        let mut last = gate.lock().unwrap_or_else(PoisonError::into_inner);
        if *last > committed.generation {
            warn!(
                "Not emitting generation {} for {}: generation {} already emitted",
                committed.generation,
                committed.file.display(),
                *last
            );
            return false;
        }
        *last = committed.generation;
        self.consumer
            .words_parsed(&committed.file, committed.words.clone());
        true
    }
}

/// Incrementally turns lexed C++ documents into word lists, one background
/// job per document update.
pub struct DocumentProcessor {
    shared: Arc<Shared>,
    pipeline: Arc<WordFilterPipeline>,
    source: Arc<dyn DocumentSource>,
    pool: rayon::ThreadPool,
}

impl DocumentProcessor {
    pub fn new(
        settings: FilterSettings,
        core: CoreSettings,
        consumer: Arc<dyn WordsConsumer>,
        source: Arc<dyn DocumentSource>,
    ) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .thread_name(|i| format!("cppspell-parse-{}", i))
            .build()?;

        Ok(Self {
            shared: Arc::new(Shared {
                state: Mutex::new(State {
                    jobs: JobTable::default(),
                    emitting: 0,
                    settings: Arc::new(settings),
                    core,
                    epoch: 0,
                    project: ProjectFiles::default(),
                }),
                idle: Condvar::new(),
                cache: TokenCache::new(),
                emitted: DashMap::new(),
                canceled: Arc::new(AtomicBool::new(false)),
                consumer,
            }),
            pipeline: Arc::new(WordFilterPipeline::new()?),
            source,
            pool,
        })
    }

    pub fn cache(&self) -> &TokenCache {
        &self.shared.cache
    }

    pub fn settings(&self) -> Arc<FilterSettings> {
        Arc::clone(&self.shared.lock().settings)
    }

    /// Entry point for the lexer: parse `document` in the background if the
    /// project membership rules allow it. Returns the dispatched job.
    pub fn document_updated(&self, document: ParsedDocument) -> Option<JobId> {
        if !self.should_parse(&document.file_name) {
            debug!("Skipping {}", document.file_name.display());
            return None;
        }

        let job = self.begin_job(document)?;
        let id = job.id;
        let shared = Arc::clone(&self.shared);
        self.pool.spawn(move || {
            let outcome = job.run();
            shared.finish(id, outcome);
        });
        Some(id)
    }

    /// Parse `document` on the calling thread, bypassing membership checks.
    pub fn parse_blocking(&self, document: ParsedDocument) -> Option<WordList> {
        let job = self.begin_job(document)?;
        let id = job.id;
        let outcome = job.run();
        self.finish_job(id, outcome)
    }

    /// Register a job and capture the settings and cache generation it runs
    /// against. Nothing is dispatched.
    pub fn begin_job(&self, document: ParsedDocument) -> Option<ParseJob> {
        if self.shared.canceled.load(Ordering::Acquire) {
            return None;
        }

        let mut state = self.shared.lock();
        let epoch = state.epoch;
        let (id, info) = state.jobs.register(&document.file_name, epoch);
        debug!(
            "{} dispatched for {} (generation {})",
            id,
            info.file.display(),
            info.generation
        );

        Some(ParseJob {
            id,
            previous: self.shared.cache.generation(&info.file),
            info,
            document,
            settings: Arc::clone(&state.settings),
            pipeline: Arc::clone(&self.pipeline),
            canceled: Arc::clone(&self.shared.canceled),
        })
    }

    /// Commit a job's outcome and hand its words to the consumer.
    pub fn finish_job(&self, id: JobId, outcome: Option<ParseOutcome>) -> Option<WordList> {
        self.shared.finish(id, outcome)
    }

    /// Filter settings changed: nothing cached is valid any more.
    pub fn settings_changed(&self, settings: FilterSettings) {
        let files = {
            let mut state = self.shared.lock();
            state.settings = Arc::new(settings);
            self.invalidate(&mut state)
        };
        self.request_reparse(&files);
    }

    pub fn core_settings_changed(&self, core: CoreSettings) {
        let files = {
            let mut state = self.shared.lock();
            state.core = core;
            self.invalidate(&mut state)
        };
        self.request_reparse(&files);
    }

    fn invalidate(&self, state: &mut State) -> BTreeSet<PathBuf> {
        state.epoch += 1;
        self.shared.cache.invalidate_all();
        info!(
            "Settings changed, cleared cache and reparsing {} project files",
            state.project.files().len()
        );
        state.project.files().clone()
    }

    /// Switch to a new active project, or to none.
    pub fn set_active_project<I>(&self, files: Option<I>)
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let reparse = {
            let mut state = self.shared.lock();
            match files {
                Some(files) => state.project.set_files(files),
                None => {
                    state.project.clear();
                    BTreeSet::new()
                }
            }
        };
        self.request_reparse(&reparse);
    }

    /// Files added to the project are lexed again; removed files lose their cache.
    pub fn update_project_files<I, R>(&self, added: I, removed: R)
    where
        I: IntoIterator<Item = PathBuf>,
        R: IntoIterator<Item = PathBuf>,
    {
        let removed: Vec<PathBuf> = removed.into_iter().collect();
        let added = {
            let mut state = self.shared.lock();
            state.project.update(added, removed.iter().cloned())
        };
        for file in &removed {
            self.shared.cache.remove_file(file);
        }
        self.request_reparse(&added);
    }

    pub fn set_current_editor(&self, file: Option<PathBuf>) {
        self.shared.lock().project.set_current_editor(file);
    }

    pub fn should_parse(&self, file: &Path) -> bool {
        let state = self.shared.lock();
        state.project.should_parse(file, &state.core)
    }

    pub fn files_in_process(&self) -> BTreeSet<PathBuf> {
        self.shared.lock().jobs.files_in_process()
    }

    /// Block until no job is outstanding and every committed result has
    /// reached the consumer.
    pub fn wait_idle(&self) {
        let state = self.shared.lock();
        let _state = self
            .shared
            .idle
            .wait_while(state, |state| !state.is_idle())
            .unwrap_or_else(PoisonError::into_inner);
    }

    /// Cancel outstanding work. Jobs still running finish without committing.
    pub fn shutdown(&self) {
        info!("Shutting down, {} jobs outstanding", self.shared.lock().jobs.len());
        self.shared.canceled.store(true, Ordering::Release);
    }

    fn request_reparse(&self, files: &BTreeSet<PathBuf>) {
        if !files.is_empty() && !self.shared.canceled.load(Ordering::Acquire) {
            self.source.update_source_files(files);
        }
    }
}

impl Drop for DocumentProcessor {
    fn drop(&mut self) {
        self.shared.canceled.store(true, Ordering::Release);
    }
}
