//! Analysis modes and their tagged result variants

use super::edge::Edge;
use super::node::Node;
use super::records::{DashboardReport, SubtextAnalysis, TimelineEvent};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The four analysis modes the TagLog dialect defines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    Dashboard,
    Graph,
    Timeline,
    Subtext,
}

impl AnalysisMode {
    pub const ALL: [AnalysisMode; 4] = [
        AnalysisMode::Dashboard,
        AnalysisMode::Graph,
        AnalysisMode::Timeline,
        AnalysisMode::Subtext,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisMode::Dashboard => "dashboard",
            AnalysisMode::Graph => "graph",
            AnalysisMode::Timeline => "timeline",
            AnalysisMode::Subtext => "subtext",
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a mode string that names no known analysis mode.
#[derive(Debug, Clone, Error)]
#[error("unknown analysis mode: {0}")]
pub struct ParseModeError(pub String);

impl FromStr for AnalysisMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dashboard" => Ok(AnalysisMode::Dashboard),
            "graph" => Ok(AnalysisMode::Graph),
            "timeline" => Ok(AnalysisMode::Timeline),
            "subtext" => Ok(AnalysisMode::Subtext),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}

/// Extracted graph for one chunk, or the accumulated master graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphResult {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

/// Extracted timeline for one chunk, or the accumulated master timeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineResult {
    pub chronology: Vec<TimelineEvent>,
}

/// Extraction output, tagged by mode.
///
/// A distinct structural type per mode keeps the merge engine an exhaustive
/// match rather than a bag of field-presence checks. Serialization is
/// untagged so the JSON export matches the original per-mode object shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModeResult {
    Dashboard(DashboardReport),
    Graph(GraphResult),
    Timeline(TimelineResult),
    Subtext(SubtextAnalysis),
}

impl ModeResult {
    /// The mode this result belongs to.
    pub fn mode(&self) -> AnalysisMode {
        match self {
            ModeResult::Dashboard(_) => AnalysisMode::Dashboard,
            ModeResult::Graph(_) => AnalysisMode::Graph,
            ModeResult::Timeline(_) => AnalysisMode::Timeline,
            ModeResult::Subtext(_) => AnalysisMode::Subtext,
        }
    }

    /// The empty result for a mode — what a chunk with no extractable
    /// payload yields.
    pub fn empty(mode: AnalysisMode) -> Self {
        match mode {
            AnalysisMode::Dashboard => ModeResult::Dashboard(DashboardReport::default()),
            AnalysisMode::Graph => ModeResult::Graph(GraphResult::default()),
            AnalysisMode::Timeline => ModeResult::Timeline(TimelineResult::default()),
            AnalysisMode::Subtext => ModeResult::Subtext(SubtextAnalysis::default()),
        }
    }

    pub fn as_graph(&self) -> Option<&GraphResult> {
        match self {
            ModeResult::Graph(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_timeline(&self) -> Option<&TimelineResult> {
        match self {
            ModeResult::Timeline(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_dashboard(&self) -> Option<&DashboardReport> {
        match self {
            ModeResult::Dashboard(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_subtext(&self) -> Option<&SubtextAnalysis> {
        match self {
            ModeResult::Subtext(s) => Some(s),
            _ => None,
        }
    }
}
