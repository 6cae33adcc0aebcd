//! Edge representation — a per-chunk relation observation

use serde::{Deserialize, Serialize};

/// Inclusive weight bounds.
pub const WEIGHT_MIN: u8 = 1;
pub const WEIGHT_MAX: u8 = 10;

/// A directed relation between two node ids, observed in one chunk.
///
/// Edges are observations, not global facts: the same source/target/relation
/// triple emitted by two chunks stays as two edges, distinguished by
/// `chunk_id`. Post-sanitization both endpoints resolve to a node id in the
/// same result scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub source: String,
    pub target: String,
    /// Relation label, e.g. `STRESSED_BY`; required for an edge to be kept
    pub relation: String,
    /// Clamped to [`WEIGHT_MIN`]..=[`WEIGHT_MAX`], defaults to 1
    pub weight: u8,
    /// Chunk this observation came from
    pub chunk_id: u32,
}

impl Edge {
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        relation: impl Into<String>,
        chunk_id: u32,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            relation: relation.into(),
            weight: WEIGHT_MIN,
            chunk_id,
        }
    }

    pub fn with_weight(mut self, weight: i64) -> Self {
        self.weight = clamp_weight(weight);
        self
    }
}

/// Clamp a parsed weight into the valid range.
///
/// Values the model should never emit (zero, negative, out of range)
/// saturate at the bounds.
pub fn clamp_weight(raw: i64) -> u8 {
    raw.clamp(WEIGHT_MIN as i64, WEIGHT_MAX as i64) as u8
}
