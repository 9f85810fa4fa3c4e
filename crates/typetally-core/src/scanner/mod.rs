/// Scanner module: turns a walk into a stream of [`ScanEvent`]s.
///
/// Two execution strategies share the same per-file step ([`process_file`]):
/// - **Sequential** (`jobs == 1`): walk, stat and classify inline on the
///   calling thread.
/// - **Worker pool** (`jobs > 1`): one walker thread feeds a bounded path
///   queue drained by `jobs` classification workers. Workers send events
///   through a second bounded channel to the caller, which is the only
///   thread that folds results. Both queues are bounded, so memory tracks
///   the pool size rather than the tree size.
pub mod progress;
pub mod walker;

use crate::classifier::SharedClassifier;
use crate::error::{ClassificationError, SkipReason, SkippedEntry};
use crate::model::{FileRecord, TypeLabel};
use crossbeam_channel::{Receiver, RecvTimeoutError};
use progress::ScanEvent;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};
use walker::{Walk, WalkEntry};

/// Queue slots per worker, for both the path queue and the event queue.
pub const QUEUE_DEPTH_PER_WORKER: usize = 4;

/// Tuning knobs for one scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Classification workers. `1` selects the sequential pipeline.
    pub jobs: usize,
    /// Follow symbolic links. Links that loop back to an ancestor are
    /// reported as skipped entries.
    pub follow_links: bool,
    /// Per-file classification deadline. `None` waits indefinitely.
    pub classify_timeout: Option<Duration>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            jobs: num_cpus::get().max(1),
            follow_links: false,
            classify_timeout: None,
        }
    }
}

impl ScanOptions {
    /// Capacity of each bounded channel in the worker pool.
    pub fn queue_capacity(&self) -> usize {
        self.jobs.max(1) * QUEUE_DEPTH_PER_WORKER
    }

    /// Whether the scan runs inline on the calling thread.
    pub fn is_sequential(&self) -> bool {
        self.jobs <= 1
    }
}

/// Handle to a running worker-pool scan.
pub struct ScanHandle {
    /// Events from the walker and the workers. Disconnects once every
    /// scanner thread has finished.
    pub events: Receiver<ScanEvent>,
    threads: Vec<thread::JoinHandle<()>>,
}

impl ScanHandle {
    /// Wait for every scanner thread. Call after `events` is drained.
    pub fn join(self) {
        for handle in self.threads {
            let name = handle.thread().name().unwrap_or("scanner").to_string();
            if handle.join().is_err() {
                warn!("Scanner thread {name} panicked");
            }
        }
    }
}

/// Start a worker-pool scan on background threads.
///
/// Fails only if the OS refuses to spawn a thread; threads already started
/// wind down on their own once their channels close.
pub fn start_scan(
    walk: Walk,
    classifier: SharedClassifier,
    options: &ScanOptions,
) -> io::Result<ScanHandle> {
    let jobs = options.jobs.max(1);
    let capacity = options.queue_capacity();
    let (path_tx, path_rx) = crossbeam_channel::bounded::<PathBuf>(capacity);
    let (event_tx, event_rx) = crossbeam_channel::bounded::<ScanEvent>(capacity);

    let mut threads = Vec::with_capacity(jobs + 1);
    for id in 0..jobs {
        let path_rx = path_rx.clone();
        let event_tx = event_tx.clone();
        let classifier = Arc::clone(&classifier);
        let timeout = options.classify_timeout;
        let handle = thread::Builder::new()
            .name(format!("typetally-worker-{id}"))
            .spawn(move || {
                for path in path_rx.iter() {
                    if event_tx.send(process_file(path, &classifier, timeout)).is_err() {
                        // Receiver dropped, nobody is listening any more.
                        break;
                    }
                }
            })?;
        threads.push(handle);
    }
    drop(path_rx);

    let walker = thread::Builder::new()
        .name("typetally-walker".into())
        .spawn(move || {
            debug!("Walking {}", walk.root().display());
            for entry in walk.entries() {
                let sent = match entry {
                    WalkEntry::File(path) => path_tx.send(path).is_ok(),
                    WalkEntry::Skipped(skipped) => {
                        event_tx.send(ScanEvent::Skipped(skipped)).is_ok()
                    }
                };
                if !sent {
                    break;
                }
            }
            debug!("Walk complete");
        })?;
    threads.push(walker);

    debug!("Started scan with {jobs} classification workers (queue capacity {capacity})");
    Ok(ScanHandle {
        events: event_rx,
        threads,
    })
}

/// Run the whole scan on the calling thread, handing each event to `sink`.
pub fn scan_sequential(
    walk: &Walk,
    classifier: &SharedClassifier,
    options: &ScanOptions,
    mut sink: impl FnMut(ScanEvent),
) {
    for entry in walk.entries() {
        match entry {
            WalkEntry::File(path) => sink(process_file(path, classifier, options.classify_timeout)),
            WalkEntry::Skipped(skipped) => sink(ScanEvent::Skipped(skipped)),
        }
    }
}

/// Stat and classify one file.
pub fn process_file(
    path: PathBuf,
    classifier: &SharedClassifier,
    timeout: Option<Duration>,
) -> ScanEvent {
    let size = match fs::metadata(&path) {
        Ok(meta) => meta.len(),
        Err(err) => return ScanEvent::Skipped(SkippedEntry::new(path, SkipReason::Stat(err))),
    };
    match classify_with_deadline(classifier, &path, timeout) {
        Ok(label) => ScanEvent::Classified(FileRecord::new(path, size, label)),
        Err(reason) => ScanEvent::Skipped(SkippedEntry::new(path, reason)),
    }
}

/// Classify `path`, giving up after `timeout` if one is set.
///
/// With a deadline the call runs on a short-lived helper thread. A call
/// that overruns is abandoned, not interrupted: the helper finishes in the
/// background and its result is discarded.
fn classify_with_deadline(
    classifier: &SharedClassifier,
    path: &Path,
    timeout: Option<Duration>,
) -> Result<TypeLabel, SkipReason> {
    let Some(timeout) = timeout else {
        return classifier.classify(path).map_err(SkipReason::from);
    };

    let (tx, rx) = crossbeam_channel::bounded(1);
    let helper_classifier = Arc::clone(classifier);
    let owned_path = path.to_path_buf();
    let spawned = thread::Builder::new()
        .name("typetally-deadline".into())
        .spawn(move || {
            let _ = tx.send(helper_classifier.classify(&owned_path));
        });
    if let Err(err) = spawned {
        warn!("Cannot enforce classification deadline ({err}); classifying inline");
        return classifier.classify(path).map_err(SkipReason::from);
    }

    match rx.recv_timeout(timeout) {
        Ok(result) => result.map_err(SkipReason::from),
        Err(RecvTimeoutError::Timeout) => Err(SkipReason::TimedOut(timeout)),
        Err(RecvTimeoutError::Disconnected) => Err(SkipReason::Classify(
            ClassificationError::model(path, "classifier exited without a result"),
        )),
    }
}
