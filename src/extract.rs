//! Per-mode record extraction from repaired TagLog text
//!
//! Extraction is permissive and total: missing fields take documented
//! defaults, an absent payload yields the mode's empty result, and no code
//! path can panic — one malformed chunk never aborts a scan. Required-ness
//! (drop/keep decisions) is enforced downstream by the sanitizer, not here.

use crate::model::{
    AnalysisMode, DashboardReport, Dynamic, Edge, GraphResult, ModeResult, Node, SubjectState,
    SubtextAnalysis, TimelineEvent, TimelineResult, DEFAULT_INTENSITY,
};
use crate::scan::{blocks, extract_tag};

/// Extract the mode's typed records from `text`.
///
/// `chunk_id` stamps provenance on every record that carries it.
pub fn extract(text: &str, mode: AnalysisMode, chunk_id: u32) -> ModeResult {
    match mode {
        AnalysisMode::Dashboard => ModeResult::Dashboard(extract_dashboard(text)),
        AnalysisMode::Graph => ModeResult::Graph(extract_graph(text, chunk_id)),
        AnalysisMode::Timeline => ModeResult::Timeline(extract_timeline(text, chunk_id)),
        AnalysisMode::Subtext => ModeResult::Subtext(extract_subtext(text, chunk_id)),
    }
}

/// Build a node from one `<node>` block, applying the label/type fallbacks.
///
/// The `id` may come back empty; only the sanitizer decides to drop it.
pub fn node_from_block(block: &str, chunk_id: u32) -> Node {
    Node::new(
        extract_tag(block, "id"),
        extract_tag(block, "label"),
        extract_tag(block, "type"),
        chunk_id,
    )
}

/// Build an edge from one `<edge>` block, parsing and clamping the weight.
///
/// Endpoints and relation may come back empty; only the sanitizer decides
/// to drop them.
pub fn edge_from_block(block: &str, chunk_id: u32) -> Edge {
    Edge::new(
        extract_tag(block, "source"),
        extract_tag(block, "target"),
        extract_tag(block, "relation"),
        chunk_id,
    )
    .with_weight(parse_leading_int(&extract_tag(block, "weight")).unwrap_or(1))
}

pub fn extract_graph(text: &str, chunk_id: u32) -> GraphResult {
    GraphResult {
        nodes: blocks(text, "node")
            .map(|b| node_from_block(b, chunk_id))
            .collect(),
        edges: blocks(text, "edge")
            .map(|b| edge_from_block(b, chunk_id))
            .collect(),
    }
}

pub fn extract_timeline(text: &str, chunk_id: u32) -> TimelineResult {
    TimelineResult {
        chronology: blocks(text, "event")
            .map(|block| TimelineEvent {
                timestamp: extract_tag(block, "timestamp"),
                event: extract_tag(block, "title"),
                significance: extract_tag(block, "significance"),
                intensity: parse_intensity(&extract_tag(block, "intensity")),
                volume: extract_tag(block, "volume"),
                tags: parse_tags(&extract_tag(block, "tags")),
                chunk_id,
            })
            .collect(),
    }
}

pub fn extract_dashboard(text: &str) -> DashboardReport {
    DashboardReport {
        title: extract_tag(text, "title"),
        executive_summary: extract_tag(text, "summary"),
        action_items: blocks(text, "action")
            .map(|b| b.trim().to_string())
            .collect(),
    }
}

pub fn extract_subtext(text: &str, chunk_id: u32) -> SubtextAnalysis {
    SubtextAnalysis {
        scott: SubjectState {
            psychological_state: extract_tag(text, "scott_psych"),
        },
        mer: SubjectState {
            psychological_state: extract_tag(text, "mer_psych"),
        },
        unspoken_dynamics: blocks(text, "dynamic")
            .map(|block| Dynamic {
                observation: extract_tag(block, "observation"),
                implication: extract_tag(block, "implication"),
                chunk_id,
            })
            .collect(),
    }
}

/// Parse the leading integer of a free-text numeric field.
///
/// Models pad numeric fields ("7 / 10", "9!"), so take the leading signed
/// digit run and ignore the rest. `None` when no digits lead.
fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let len = digits.bytes().take_while(u8::is_ascii_digit).count();
    if len == 0 {
        return None;
    }
    // 18 digits always fit in i64; longer runs clamp downstream anyway
    let run = &digits[..len.min(18)];
    run.parse::<i64>().ok().map(|n| sign * n)
}

/// Intensity: 1–10, with missing, unparseable, or zero input falling back
/// to the default.
fn parse_intensity(raw: &str) -> u8 {
    match parse_leading_int(raw) {
        Some(n) if n != 0 => n.clamp(1, 10) as u8,
        _ => DEFAULT_INTENSITY,
    }
}

/// Comma-separated tag list with empties filtered.
fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}
