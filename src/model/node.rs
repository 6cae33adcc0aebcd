//! Node representation and the id-keyed node collection

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Fallback type for nodes whose `<type>` tag is absent, and for stubs.
pub const UNKNOWN_TYPE: &str = "UNKNOWN";

/// A named entity extracted from TagLog text.
///
/// Identity is the model-emitted `id` string; `found_in` records the chunks
/// in which the node was observed, ascending and deduplicated. A kept node
/// never has an empty `id` — the sanitizer drops those before they reach
/// any collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Stable key, e.g. `per_scott`
    pub id: String,
    /// Display label, falls back to `id`
    pub label: String,
    /// Classification, e.g. `PERSON`, falls back to [`UNKNOWN_TYPE`]
    #[serde(rename = "type")]
    pub node_type: String,
    /// Chunk numbers where this node was observed
    pub found_in: Vec<u32>,
}

impl Node {
    /// Create a node observed in `chunk_id`, applying the label/type fallbacks.
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        node_type: impl Into<String>,
        chunk_id: u32,
    ) -> Self {
        let id = id.into();
        let label = label.into();
        let node_type = node_type.into();
        Self {
            label: if label.is_empty() { id.clone() } else { label },
            node_type: if node_type.is_empty() {
                UNKNOWN_TYPE.to_string()
            } else {
                node_type
            },
            found_in: vec![chunk_id],
            id,
        }
    }

    /// Placeholder for an edge endpoint that was never explicitly extracted.
    ///
    /// A stub has no direct textual provenance, so `found_in` starts empty.
    pub fn stub(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            node_type: UNKNOWN_TYPE.to_string(),
            found_in: Vec::new(),
            id,
        }
    }

    /// Fold a later observation of the same id into this node.
    ///
    /// Metadata (label, type) of the first-seen node wins; only the
    /// provenance union is taken, sorted ascending and deduplicated.
    pub fn absorb(&mut self, other: Node) {
        debug_assert_eq!(self.id, other.id);
        self.found_in.extend(other.found_in);
        self.found_in.sort_unstable();
        self.found_in.dedup();
    }
}

/// Id-keyed node collection preserving first-insertion order.
///
/// Both the chunk-local sanitizer pass and the master accumulator need
/// map-by-id semantics with deterministic output order. First insertion
/// wins on metadata; later observations of the same id only extend
/// `found_in`.
#[derive(Debug, Clone, Default)]
pub struct NodeSet {
    nodes: Vec<Node>,
    index: HashMap<String, usize>,
}

impl NodeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from an existing node list, folding duplicates.
    pub fn from_nodes(nodes: Vec<Node>) -> Self {
        let mut set = Self::new();
        for node in nodes {
            set.upsert(node);
        }
        set
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Insert a node, or fold it into the existing entry with the same id.
    pub fn upsert(&mut self, node: Node) {
        match self.index.get(&node.id) {
            Some(&i) => self.nodes[i].absorb(node),
            None => {
                self.index.insert(node.id.clone(), self.nodes.len());
                self.nodes.push(node);
            }
        }
    }

    /// Insert only if the id is not present yet.
    ///
    /// Returns `false` (and drops the candidate whole, `found_in` included)
    /// when the id already exists — the first occurrence wins.
    pub fn insert_if_absent(&mut self, node: Node) -> bool {
        if self.contains(&node.id) {
            return false;
        }
        self.index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Consume the set, yielding nodes in first-insertion order.
    pub fn into_vec(self) -> Vec<Node> {
        self.nodes
    }
}
