//! TagLog: tolerant extraction, repair, and merge engine
//!
//! Turns unreliable LLM-emitted "TagLog" text — a constrained, quasi-XML
//! dialect with no attributes, no namespaces, and one nesting level — into
//! validated, internally-consistent typed results, and folds per-chunk
//! results into a single master accumulator.
//!
//! # Core concepts
//!
//! - **Repair**: known tag-mismatch mistakes are rewritten to the canonical
//!   pair, every rewrite counted
//! - **Extraction**: permissive per-mode record extraction with documented
//!   field defaults; one malformed chunk never aborts a run
//! - **Sanitization**: referential integrity enforced by a stub-or-drop
//!   policy, with every repair and drop reflected in a [`SanitizerReport`]
//! - **Merge**: shape-specific accumulation into a single-writer master,
//!   finished by a global integrity pass
//!
//! # Example
//!
//! ```
//! use taglog::{AnalysisMode, AnalysisSession};
//!
//! let mut session = AnalysisSession::new(AnalysisMode::Graph);
//! session.ingest(
//!     "<chunk><graph><node><id>per_scott</id><label>Scott</label></node></graph></chunk>",
//!     1,
//! );
//! let output = session.finish();
//! assert_eq!(output.chunks_processed, 1);
//! assert_eq!(output.report.nodes_kept, 1);
//! ```

pub mod extract;
pub mod merge;
mod model;
pub mod repair;
pub mod sanitize;
pub mod scan;
mod session;


pub use model::{
    clamp_weight, AnalysisMode, DashboardReport, Dynamic, Edge, GraphResult, ModeResult, Node,
    NodeSet, ParseModeError, SanitizerReport, SubjectState, SubtextAnalysis, TimelineEvent,
    TimelineResult, DEFAULT_INTENSITY, UNKNOWN_TYPE, WEIGHT_MAX, WEIGHT_MIN,
};
pub use session::{AnalysisSession, RunId, RunOutput};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
