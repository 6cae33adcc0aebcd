//! Sanitizer statistics

use serde::{Deserialize, Serialize};

/// Counters describing what one sanitizer call saw, repaired, kept, and
/// dropped.
///
/// Created fresh per chunk and never mutated afterwards; the caller sums
/// per-chunk reports field-wise into a running total via [`absorb`]. A
/// spike in any dropped counter signals the upstream text generator is
/// drifting from the expected grammar even though no individual call fails.
///
/// [`absorb`]: SanitizerReport::absorb
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitizerReport {
    /// Tag-mismatch rewrites performed by the repair pass
    pub repairs: u64,
    pub nodes_raw: u64,
    pub edges_raw: u64,
    pub nodes_kept: u64,
    pub edges_kept: u64,
    pub nodes_dropped_empty_id: u64,
    pub edges_dropped_missing_endpoint: u64,
    pub edges_dropped_missing_relation: u64,
    pub edges_dropped_nonexistent_endpoint: u64,
    pub stub_nodes_created: u64,
}

impl SanitizerReport {
    /// Add another report's counters into this one, field-wise.
    pub fn absorb(&mut self, other: &SanitizerReport) {
        self.repairs += other.repairs;
        self.nodes_raw += other.nodes_raw;
        self.edges_raw += other.edges_raw;
        self.nodes_kept += other.nodes_kept;
        self.edges_kept += other.edges_kept;
        self.nodes_dropped_empty_id += other.nodes_dropped_empty_id;
        self.edges_dropped_missing_endpoint += other.edges_dropped_missing_endpoint;
        self.edges_dropped_missing_relation += other.edges_dropped_missing_relation;
        self.edges_dropped_nonexistent_endpoint += other.edges_dropped_nonexistent_endpoint;
        self.stub_nodes_created += other.stub_nodes_created;
    }

    /// Total records discarded by any drop rule.
    pub fn total_dropped(&self) -> u64 {
        self.nodes_dropped_empty_id
            + self.edges_dropped_missing_endpoint
            + self.edges_dropped_missing_relation
            + self.edges_dropped_nonexistent_endpoint
    }
}
