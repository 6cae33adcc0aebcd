//! Merge engine and the global integrity pass
//!
//! Folds one chunk's extraction result into the running master. Each result
//! shape has its own accumulation rule: graph nodes dedup by id, edges and
//! events append, dashboard prose concatenates, subtext states are
//! redescribed by each chunk and so replace.

use crate::model::{GraphResult, ModeResult, Node, NodeSet, SubtextAnalysis};
use std::collections::HashSet;
use tracing::{info, warn};

/// Fold a newly extracted chunk result into the running master.
///
/// With no existing master the new result becomes the master verbatim.
/// Graph, timeline, and dashboard-action merging is associative in
/// practice: chunk arrival order does not change the final sets. Subtext
/// states and the dashboard summary are order-sensitive by design.
pub fn merge(current: Option<ModeResult>, incoming: ModeResult) -> ModeResult {
    let Some(master) = current else {
        return incoming;
    };
    match (master, incoming) {
        (ModeResult::Graph(master), ModeResult::Graph(incoming)) => {
            ModeResult::Graph(merge_graph(master, incoming))
        }
        (ModeResult::Timeline(mut master), ModeResult::Timeline(incoming)) => {
            master.chronology.extend(incoming.chronology);
            ModeResult::Timeline(master)
        }
        (ModeResult::Dashboard(mut master), ModeResult::Dashboard(incoming)) => {
            master.executive_summary.push('\n');
            master.executive_summary.push_str(&incoming.executive_summary);
            master.action_items.extend(incoming.action_items);
            // title and any other fields carry over from the master
            ModeResult::Dashboard(master)
        }
        (ModeResult::Subtext(master), ModeResult::Subtext(mut incoming)) => {
            // each chunk redescribes the subjects' current state: newest wins
            let mut unspoken_dynamics = master.unspoken_dynamics;
            unspoken_dynamics.append(&mut incoming.unspoken_dynamics);
            ModeResult::Subtext(SubtextAnalysis {
                scott: incoming.scott,
                mer: incoming.mer,
                unspoken_dynamics,
            })
        }
        (master, incoming) => {
            warn!(
                master = %master.mode(),
                incoming = %incoming.mode(),
                "result mode mismatch during merge, keeping incoming"
            );
            incoming
        }
    }
}

fn merge_graph(mut master: GraphResult, incoming: GraphResult) -> GraphResult {
    let mut nodes = NodeSet::from_nodes(std::mem::take(&mut master.nodes));
    for node in incoming.nodes {
        nodes.upsert(node);
    }
    master.nodes = nodes.into_vec();
    // edges are per-chunk observations, never deduplicated
    master.edges.extend(incoming.edges);
    master
}

/// Global integrity pass over the accumulated graph.
///
/// Cross-chunk merging can leave an edge pointing at an id no chunk kept.
/// Every such id gets a stub node, appended in first-reference order; edges
/// are structurally valid by now and are never dropped here. Returns the
/// number of stubs appended.
pub fn finalize(result: &mut GraphResult) -> u64 {
    let missing: Vec<String> = {
        let ids: HashSet<&str> = result.nodes.iter().map(|n| n.id.as_str()).collect();
        let mut seen = HashSet::new();
        let mut missing = Vec::new();
        for edge in &result.edges {
            for endpoint in [edge.source.as_str(), edge.target.as_str()] {
                if !ids.contains(endpoint) && seen.insert(endpoint) {
                    missing.push(endpoint.to_string());
                }
            }
        }
        missing
    };
    if !missing.is_empty() {
        info!(count = missing.len(), "autogenerating stub nodes for dangling endpoints");
    }
    let count = missing.len() as u64;
    for id in missing {
        result.nodes.push(Node::stub(id));
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        AnalysisMode, DashboardReport, Dynamic, Edge, SubjectState, TimelineEvent, TimelineResult,
        UNKNOWN_TYPE,
    };

    fn graph(nodes: Vec<Node>, edges: Vec<Edge>) -> ModeResult {
        ModeResult::Graph(GraphResult { nodes, edges })
    }

    fn event(title: &str, chunk_id: u32) -> TimelineEvent {
        TimelineEvent {
            timestamp: String::new(),
            event: title.to_string(),
            significance: String::new(),
            intensity: 5,
            volume: String::new(),
            tags: Vec::new(),
            chunk_id,
        }
    }

    #[test]
    fn first_chunk_becomes_master_verbatim() {
        let incoming = graph(vec![Node::new("a", "", "", 1)], vec![]);
        assert_eq!(merge(None, incoming.clone()), incoming);
    }

    #[test]
    fn graph_nodes_union_by_id_and_accumulate_provenance() {
        let master = graph(
            vec![Node::new("a", "Alpha", "PERSON", 1), Node::new("b", "", "", 1)],
            vec![],
        );
        let incoming = graph(
            vec![Node::new("a", "Renamed", "TOPIC", 2), Node::new("c", "", "", 2)],
            vec![],
        );
        let merged = merge(Some(master), incoming);
        let g = merged.as_graph().unwrap();

        assert_eq!(g.nodes.len(), 3);
        // first-seen metadata wins, foundIn unions ascending
        assert_eq!(g.nodes[0].id, "a");
        assert_eq!(g.nodes[0].label, "Alpha");
        assert_eq!(g.nodes[0].node_type, "PERSON");
        assert_eq!(g.nodes[0].found_in, vec![1, 2]);
        assert_eq!(g.nodes[2].id, "c");
    }

    #[test]
    fn graph_edges_append_without_dedup() {
        let e = Edge::new("a", "b", "KNOWS", 1);
        let mut e2 = e.clone();
        e2.chunk_id = 2;
        let master = graph(vec![Node::new("a", "", "", 1)], vec![e.clone()]);
        let incoming = graph(vec![], vec![e2.clone(), e.clone()]);

        let merged = merge(Some(master), incoming);
        let g = merged.as_graph().unwrap();
        // identical observations from different chunks all survive
        assert_eq!(g.edges, vec![e.clone(), e2, e]);
    }

    #[test]
    fn timeline_appends_in_arrival_order() {
        let master = ModeResult::Timeline(TimelineResult {
            chronology: vec![event("first", 1)],
        });
        let incoming = ModeResult::Timeline(TimelineResult {
            chronology: vec![event("second", 2)],
        });
        let merged = merge(Some(master), incoming);
        let events = &merged.as_timeline().unwrap().chronology;
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event, "first");
        assert_eq!(events[1].event, "second");
    }

    #[test]
    fn dashboard_concatenates_summary_and_appends_actions() {
        let master = ModeResult::Dashboard(DashboardReport {
            title: "Run".to_string(),
            executive_summary: "Week one.".to_string(),
            action_items: vec!["a1".to_string()],
        });
        let incoming = ModeResult::Dashboard(DashboardReport {
            title: "Ignored".to_string(),
            executive_summary: "Week two.".to_string(),
            action_items: vec!["a2".to_string()],
        });
        let merged = merge(Some(master), incoming);
        let report = merged.as_dashboard().unwrap();
        assert_eq!(report.title, "Run");
        assert_eq!(report.executive_summary, "Week one.\nWeek two.");
        assert_eq!(report.action_items, vec!["a1", "a2"]);
    }

    // --- Scenario: subtext last-write-wins ---

    #[test]
    fn subtext_states_replace_but_dynamics_append() {
        let master = ModeResult::Subtext(SubtextAnalysis {
            scott: SubjectState {
                psychological_state: "calm".to_string(),
            },
            mer: SubjectState {
                psychological_state: "distant".to_string(),
            },
            unspoken_dynamics: vec![Dynamic {
                observation: "o1".to_string(),
                implication: "i1".to_string(),
                chunk_id: 1,
            }],
        });
        let incoming = ModeResult::Subtext(SubtextAnalysis {
            scott: SubjectState {
                psychological_state: "anxious".to_string(),
            },
            mer: SubjectState::default(),
            unspoken_dynamics: vec![Dynamic {
                observation: "o2".to_string(),
                implication: "i2".to_string(),
                chunk_id: 2,
            }],
        });
        let merged = merge(Some(master), incoming);
        let analysis = merged.as_subtext().unwrap();
        assert_eq!(analysis.scott.psychological_state, "anxious");
        assert_eq!(analysis.mer.psychological_state, "");
        assert_eq!(analysis.unspoken_dynamics.len(), 2);
        assert_eq!(analysis.unspoken_dynamics[0].observation, "o1");
    }

    #[test]
    fn mode_mismatch_keeps_incoming() {
        let master = ModeResult::empty(AnalysisMode::Graph);
        let incoming = ModeResult::empty(AnalysisMode::Timeline);
        assert_eq!(merge(Some(master), incoming.clone()), incoming);
    }

    // --- Property: associativity over chunk groupings ---

    #[test]
    fn graph_merge_is_associative_over_groupings() {
        let a = || {
            graph(
                vec![Node::new("a", "Alpha", "", 1)],
                vec![Edge::new("a", "b", "r", 1)],
            )
        };
        let b = || {
            graph(
                vec![Node::new("b", "", "", 2), Node::new("a", "Beta", "", 2)],
                vec![Edge::new("b", "a", "s", 2)],
            )
        };
        let c = || graph(vec![Node::new("c", "", "", 3)], vec![Edge::new("a", "c", "t", 3)]);

        // ((A + B) + C) vs (A + (B + C))
        let left = merge(Some(merge(Some(a()), b())), c());
        let right = merge(Some(a()), merge(Some(b()), c()));

        assert_eq!(left, right);
    }

    #[test]
    fn timeline_merge_is_associative_over_groupings() {
        let t = |titles: &[&str], chunk: u32| {
            ModeResult::Timeline(TimelineResult {
                chronology: titles.iter().map(|s| event(s, chunk)).collect(),
            })
        };
        let left = merge(Some(merge(Some(t(&["a"], 1)), t(&["b"], 2))), t(&["c"], 3));
        let right = merge(Some(t(&["a"], 1)), merge(Some(t(&["b"], 2)), t(&["c"], 3)));
        assert_eq!(left, right);
    }

    #[test]
    fn dashboard_actions_are_associative_even_though_prose_is_not() {
        let d = |summary: &str, action: &str| {
            ModeResult::Dashboard(DashboardReport {
                title: "t".to_string(),
                executive_summary: summary.to_string(),
                action_items: vec![action.to_string()],
            })
        };
        let left = merge(Some(merge(Some(d("s1", "a1")), d("s2", "a2"))), d("s3", "a3"));
        let right = merge(Some(d("s1", "a1")), merge(Some(d("s2", "a2")), d("s3", "a3")));

        let left = left.as_dashboard().unwrap().clone();
        let right = right.as_dashboard().unwrap().clone();
        assert_eq!(left.action_items, right.action_items);
        assert_eq!(left.action_items, vec!["a1", "a2", "a3"]);
        // the concatenated summary is order-sensitive but grouping-stable too
        assert_eq!(left.executive_summary, right.executive_summary);
    }

    // --- Scenario: cross-chunk dangling edge gets a stub, edges untouched ---

    #[test]
    fn finalize_stubs_dangling_endpoints_without_dropping_edges() {
        let master = merge(
            Some(graph(
                vec![Node::new("a", "", "", 1)],
                vec![Edge::new("a", "b", "KNOWS", 1)],
            )),
            graph(vec![Node::new("c", "", "", 2)], vec![Edge::new("c", "a", "MET", 2)]),
        );
        let ModeResult::Graph(mut g) = master else {
            unreachable!()
        };

        let stubs = finalize(&mut g);

        assert_eq!(stubs, 1);
        assert_eq!(g.edges.len(), 2, "no edge is ever dropped here");
        let stub = g.nodes.iter().find(|n| n.id == "b").unwrap();
        assert_eq!(stub.label, "b");
        assert_eq!(stub.node_type, UNKNOWN_TYPE);
        assert!(stub.found_in.is_empty());
    }

    #[test]
    fn finalize_is_a_no_op_on_a_closed_graph() {
        let mut g = GraphResult {
            nodes: vec![Node::new("a", "", "", 1), Node::new("b", "", "", 1)],
            edges: vec![Edge::new("a", "b", "r", 1)],
        };
        assert_eq!(finalize(&mut g), 0);
        assert_eq!(g.nodes.len(), 2);
    }

    #[test]
    fn finalize_stubs_each_missing_id_once_in_first_reference_order() {
        let mut g = GraphResult {
            nodes: vec![],
            edges: vec![
                Edge::new("x", "y", "r", 1),
                Edge::new("y", "x", "s", 2),
                Edge::new("z", "x", "t", 2),
            ],
        };
        assert_eq!(finalize(&mut g), 3);
        let ids: Vec<&str> = g.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["x", "y", "z"]);
    }
}
