//! Graph sanitizer — tolerant extraction plus invariant enforcement
//!
//! Two passes by design: nodes are collected in full before any edge is
//! validated, so edge validation never depends on extraction order within
//! the chunk. Every repair, drop, and stub is counted in the report; no
//! input can make a call fail.

use crate::extract::{edge_from_block, node_from_block};
use crate::model::{GraphResult, Node, NodeSet, SanitizerReport};
use crate::repair::repair;
use crate::scan::blocks;
use tracing::{debug, warn};

/// Output of one sanitizer call over one chunk's raw text.
#[derive(Debug, Clone)]
pub struct Sanitized {
    pub result: GraphResult,
    /// The repaired text, suitable for raw-TagLog audit export
    pub cleaned_text: String,
    pub report: SanitizerReport,
}

/// Repair, extract, and validate one chunk of graph-mode TagLog.
///
/// With `auto_stub` set, an edge endpoint that names no extracted node gets
/// a stub node and the edge is kept; otherwise the edge is dropped. Either
/// way the outcome is counted.
pub fn sanitize_graph(raw_text: &str, chunk_id: u32, auto_stub: bool) -> Sanitized {
    let outcome = repair(raw_text);
    let mut report = SanitizerReport {
        repairs: outcome.repairs,
        ..Default::default()
    };
    let cleaned_text = outcome.text;

    // Pass 1: collect nodes, first occurrence of an id wins
    let mut nodes = NodeSet::new();
    for block in blocks(&cleaned_text, "node") {
        report.nodes_raw += 1;
        let node = node_from_block(block, chunk_id);
        if node.id.is_empty() {
            report.nodes_dropped_empty_id += 1;
            warn!(chunk_id, "dropping node block without an id");
            continue;
        }
        if !nodes.insert_if_absent(node) {
            debug!(chunk_id, "duplicate node id within chunk, first kept");
        }
    }

    // Pass 2: structural edge checks
    let mut pending = Vec::new();
    for block in blocks(&cleaned_text, "edge") {
        report.edges_raw += 1;
        let edge = edge_from_block(block, chunk_id);
        if edge.source.is_empty() || edge.target.is_empty() {
            report.edges_dropped_missing_endpoint += 1;
            warn!(chunk_id, "dropping edge with missing endpoint");
            continue;
        }
        if edge.relation.is_empty() {
            // strict: an edge without a relation is never tolerated
            report.edges_dropped_missing_relation += 1;
            warn!(
                chunk_id,
                source = %edge.source,
                target = %edge.target,
                "dropping edge with missing relation"
            );
            continue;
        }
        pending.push(edge);
    }

    // Referential integrity against the completed node set
    let mut edges = Vec::with_capacity(pending.len());
    for edge in pending {
        let mut keep = true;
        for endpoint in [&edge.source, &edge.target] {
            if nodes.contains(endpoint) {
                continue;
            }
            if auto_stub {
                debug!(chunk_id, endpoint = %endpoint, "stubbing dangling edge endpoint");
                nodes.insert_if_absent(Node::stub(endpoint.clone()));
                report.stub_nodes_created += 1;
            } else {
                keep = false;
            }
        }
        if keep {
            edges.push(edge);
        } else {
            report.edges_dropped_nonexistent_endpoint += 1;
            warn!(
                chunk_id,
                source = %edge.source,
                target = %edge.target,
                "dropping edge with nonexistent endpoint"
            );
        }
    }

    report.nodes_kept = nodes.len() as u64;
    report.edges_kept = edges.len() as u64;

    Sanitized {
        result: GraphResult {
            nodes: nodes.into_vec(),
            edges,
        },
        cleaned_text,
        report,
    }
}
