//! Analysis session — the explicitly owned accumulator for one run
//!
//! The orchestrator constructs a session, feeds chunks through [`ingest`]
//! one at a time, and consumes [`finish`]. Folding takes `&mut self` and
//! finishing takes `self`, so exactly one fold can be in flight and the
//! master is never shared — sequential discipline enforced by ownership,
//! not by synchronization.
//!
//! [`ingest`]: AnalysisSession::ingest
//! [`finish`]: AnalysisSession::finish

use crate::extract;
use crate::merge::{finalize, merge};
use crate::model::{AnalysisMode, ModeResult, SanitizerReport};
use crate::repair::repair;
use crate::sanitize::sanitize_graph;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

/// Unique identifier for one analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Single-writer accumulator for one analysis run.
pub struct AnalysisSession {
    run_id: RunId,
    mode: AnalysisMode,
    auto_stub: bool,
    master: Option<ModeResult>,
    totals: SanitizerReport,
    raw_log: String,
    chunks_processed: u32,
    started_at: DateTime<Utc>,
}

impl AnalysisSession {
    pub fn new(mode: AnalysisMode) -> Self {
        Self {
            run_id: RunId::new(),
            mode,
            auto_stub: true,
            master: None,
            totals: SanitizerReport::default(),
            raw_log: String::new(),
            chunks_processed: 0,
            started_at: Utc::now(),
        }
    }

    /// Set the dangling-endpoint policy: stub (default) or drop.
    pub fn with_auto_stub(mut self, auto_stub: bool) -> Self {
        self.auto_stub = auto_stub;
        self
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    pub fn mode(&self) -> AnalysisMode {
        self.mode
    }

    /// The master accumulated so far; `None` before the first chunk.
    pub fn master(&self) -> Option<&ModeResult> {
        self.master.as_ref()
    }

    /// Running field-wise totals across all ingested chunks.
    pub fn report(&self) -> &SanitizerReport {
        &self.totals
    }

    pub fn chunks_processed(&self) -> u32 {
        self.chunks_processed
    }

    /// Process one chunk's raw text and fold it into the master.
    ///
    /// Graph mode routes through the sanitizer; the other modes run the
    /// repair pass and then the mode's record extractor on the repaired
    /// text. Returns the per-chunk report, already absorbed into the
    /// running totals.
    pub fn ingest(&mut self, raw_text: &str, chunk_id: u32) -> SanitizerReport {
        let (result, cleaned_text, report) = match self.mode {
            AnalysisMode::Graph => {
                let sanitized = sanitize_graph(raw_text, chunk_id, self.auto_stub);
                (
                    ModeResult::Graph(sanitized.result),
                    sanitized.cleaned_text,
                    sanitized.report,
                )
            }
            mode => {
                let outcome = repair(raw_text);
                let report = SanitizerReport {
                    repairs: outcome.repairs,
                    ..Default::default()
                };
                let result = extract::extract(&outcome.text, mode, chunk_id);
                (result, outcome.text, report)
            }
        };

        debug!(
            run = %self.run_id,
            chunk_id,
            repairs = report.repairs,
            dropped = report.total_dropped(),
            "chunk folded into master"
        );

        if !self.raw_log.is_empty() {
            self.raw_log.push('\n');
        }
        self.raw_log.push_str(&cleaned_text);

        self.totals.absorb(&report);
        self.master = Some(merge(self.master.take(), result));
        self.chunks_processed += 1;
        report
    }

    /// Finish the run.
    ///
    /// Graph mode gets the global integrity pass here: endpoints left
    /// dangling by cross-chunk merging are stubbed, and those stubs are
    /// added to the run total's `stub_nodes_created`.
    pub fn finish(mut self) -> RunOutput {
        if let Some(ModeResult::Graph(graph)) = self.master.as_mut() {
            self.totals.stub_nodes_created += finalize(graph);
        }
        info!(
            run = %self.run_id,
            mode = %self.mode,
            chunks = self.chunks_processed,
            "analysis run finished"
        );
        RunOutput {
            run_id: self.run_id,
            mode: self.mode,
            result: self.master.unwrap_or_else(|| ModeResult::empty(self.mode)),
            report: self.totals,
            chunks_processed: self.chunks_processed,
            started_at: self.started_at,
            finished_at: Utc::now(),
            raw_log: self.raw_log,
        }
    }
}

/// Final output of a run, ready for JSON export or raw-TagLog audit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutput {
    pub run_id: RunId,
    pub mode: AnalysisMode,
    pub result: ModeResult,
    pub report: SanitizerReport,
    pub chunks_processed: u32,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Cleaned (repaired) text of every chunk, newline-joined
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub raw_log: String,
}
