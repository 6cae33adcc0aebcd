//! Record types for the non-graph analysis modes

use serde::{Deserialize, Serialize};

/// Intensity used when the `<intensity>` tag is missing or unparseable.
pub const DEFAULT_INTENSITY: u8 = 5;

/// One flashpoint on the timeline.
///
/// `timestamp` is free-form text, never parsed to a calendar type —
/// chronological ordering is a presentation concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    pub timestamp: String,
    /// Short title, extracted from the `<title>` tag
    pub event: String,
    /// Why the event matters
    pub significance: String,
    /// 1–10, defaults to [`DEFAULT_INTENSITY`]
    pub intensity: u8,
    /// Enum-like free text (`Low`, `Medium`, `High`)
    pub volume: String,
    /// Comma-separated in the source text, empties filtered
    pub tags: Vec<String>,
    /// Chunk this event was extracted from
    pub chunk_id: u32,
}

/// High-level synthesis accumulated across chunks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    pub title: String,
    /// Grows by concatenation, one chunk's summary per line
    pub executive_summary: String,
    /// Append-only
    pub action_items: Vec<String>,
}

/// Current psychological state of one subject.
///
/// Each chunk redescribes the subject's state, so merging replaces the
/// prior value rather than accumulating.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectState {
    pub psychological_state: String,
}

/// One observed interaction and its likely underlying meaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dynamic {
    pub observation: String,
    pub implication: String,
    /// Chunk this dynamic was extracted from
    pub chunk_id: u32,
}

/// Dual-channel subtext analysis.
///
/// The two subject fields mirror the `<scott_psych>`/`<mer_psych>` tags the
/// TagLog dialect defines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtextAnalysis {
    pub scott: SubjectState,
    pub mer: SubjectState,
    /// Append-only across chunks
    pub unspoken_dynamics: Vec<Dynamic>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subtext_serializes_with_original_field_names() {
        let analysis = SubtextAnalysis {
            scott: SubjectState {
                psychological_state: "calm".to_string(),
            },
            mer: SubjectState::default(),
            unspoken_dynamics: vec![Dynamic {
                observation: "long pause".to_string(),
                implication: "hesitation".to_string(),
                chunk_id: 1,
            }],
        };
        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(json["scott"]["psychologicalState"], "calm");
        assert_eq!(json["unspokenDynamics"][0]["observation"], "long pause");
        assert_eq!(json["unspokenDynamics"][0]["chunkId"], 1);
    }

    #[test]
    fn dashboard_serializes_with_original_field_names() {
        let report = DashboardReport {
            title: "Week 1".to_string(),
            executive_summary: "Summary".to_string(),
            action_items: vec!["2024-01-01 | Scott | Call".to_string()],
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["executiveSummary"], "Summary");
        assert_eq!(json["actionItems"][0], "2024-01-01 | Scott | Call");
    }
}
