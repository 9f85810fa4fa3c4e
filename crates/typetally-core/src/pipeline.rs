/// Run orchestrator: walk → stat → classify → aggregate → render.
///
/// A run moves through [`RunPhase`]s in a fixed order and ends in either
/// `Done` or `Aborted`. Root validation and classifier start-up happen
/// before any file is touched; a failure in either aborts the run. After
/// that point only per-entry skips can occur and the run always reaches
/// `Done`.
///
/// Walking, classifying and aggregating overlap while files stream through;
/// the phase records the furthest stage the run has entered.
use crate::analysis::{AggregateState, Report};
use crate::classifier::SharedClassifier;
use crate::error::{RunError, SkippedEntry};
use crate::render::{render, ReportFormat};
use crate::scanner::progress::ScanEvent;
use crate::scanner::walker::Walk;
use crate::scanner::{scan_sequential, start_scan, ScanOptions};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Files folded between progress log lines.
const PROGRESS_INTERVAL: u64 = 5_000;

/// Lifecycle of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Start,
    Walking,
    Classifying,
    Aggregating,
    Rendering,
    Done,
    Aborted,
}

impl RunPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Aborted)
    }

    /// Legal transitions: one step forward, or to `Aborted` from any
    /// non-terminal phase.
    pub fn can_advance_to(self, next: Self) -> bool {
        use RunPhase::*;
        match (self, next) {
            (from, Aborted) => !from.is_terminal(),
            (Start, Walking)
            | (Walking, Classifying)
            | (Classifying, Aggregating)
            | (Aggregating, Rendering)
            | (Rendering, Done) => true,
            _ => false,
        }
    }
}

/// What a successful run produces.
#[derive(Debug)]
pub struct RunOutcome {
    pub report: Report,
    /// `report` rendered in the requested format.
    pub rendered: String,
}

/// Drives a single run. Not reusable: build a new one per invocation.
pub struct Orchestrator {
    root: PathBuf,
    options: ScanOptions,
    format: ReportFormat,
    phase: RunPhase,
}

impl Orchestrator {
    pub fn new(root: impl Into<PathBuf>, options: ScanOptions, format: ReportFormat) -> Self {
        Self {
            root: root.into(),
            options,
            format,
            phase: RunPhase::Start,
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Execute the run.
    ///
    /// `init_classifier` is called once, after the root has been validated
    /// and before any file is processed. The classifier it returns lives
    /// only as long as this call.
    pub fn run<F>(&mut self, init_classifier: F) -> Result<RunOutcome, RunError>
    where
        F: FnOnce() -> Result<SharedClassifier, RunError>,
    {
        let result = self.execute(init_classifier);
        // The caller reports fatal errors; only trace the transition here.
        if let Err(err) = &result {
            debug!("Run aborted: {err}");
            self.advance(RunPhase::Aborted);
        }
        result
    }

    fn execute<F>(&mut self, init_classifier: F) -> Result<RunOutcome, RunError>
    where
        F: FnOnce() -> Result<SharedClassifier, RunError>,
    {
        let walk = Walk::new(&self.root, self.options.follow_links, self.options.jobs)?;
        self.advance(RunPhase::Walking);

        let classifier = init_classifier()?;
        let mut options = self.options.clone();
        if classifier.serialises_calls() && options.classify_timeout.take().is_some() {
            // An abandoned call would keep the backend locked and stall
            // every later file behind it.
            warn!(
                "The {} classifier handles one file at a time; ignoring the per-file timeout",
                classifier.name()
            );
        }
        info!(
            "Scanning {} with the {} classifier ({} jobs)",
            self.root.display(),
            classifier.name(),
            self.options.jobs.max(1)
        );

        let start = Instant::now();
        self.advance(RunPhase::Classifying);
        self.advance(RunPhase::Aggregating);
        let mut tally = Tally::default();
        if options.is_sequential() {
            scan_sequential(&walk, &classifier, &options, |event| tally.fold(event));
        } else {
            match start_scan(walk.clone(), classifier.clone(), &options) {
                Ok(handle) => {
                    for event in handle.events.iter() {
                        tally.fold(event);
                    }
                    handle.join();
                }
                Err(err) => {
                    warn!("Could not start worker pool ({err}); scanning sequentially");
                    scan_sequential(&walk, &classifier, &options, |event| tally.fold(event));
                }
            }
        }
        drop(classifier);

        info!(
            "Scan complete: {} files analyzed, {} skipped in {:?}",
            tally.state.files_analyzed(),
            tally.skipped,
            start.elapsed()
        );

        self.advance(RunPhase::Rendering);
        let report = tally.state.finalize(tally.skipped);
        let rendered = render(&report, self.format)?;
        self.advance(RunPhase::Done);

        Ok(RunOutcome { report, rendered })
    }

    fn advance(&mut self, next: RunPhase) {
        debug_assert!(
            self.phase.can_advance_to(next),
            "illegal phase transition {:?} -> {:?}",
            self.phase,
            next
        );
        debug!("Phase {:?} -> {:?}", self.phase, next);
        self.phase = next;
    }
}

/// The single folding point for scan events.
#[derive(Default)]
struct Tally {
    state: AggregateState,
    skipped: u64,
}

impl Tally {
    fn fold(&mut self, event: ScanEvent) {
        match event {
            ScanEvent::Classified(record) => {
                self.state.fold(record);
                let analyzed = self.state.files_analyzed();
                if analyzed % PROGRESS_INTERVAL == 0 {
                    debug!(
                        "Progress: {analyzed} files, {} bytes, {} skipped",
                        self.state.grand_total(),
                        self.skipped
                    );
                }
            }
            ScanEvent::Skipped(skipped) => self.skip(skipped),
        }
    }

    fn skip(&mut self, skipped: SkippedEntry) {
        debug!("Skipped {skipped}");
        self.skipped += 1;
    }
}
