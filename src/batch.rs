//! Atom batches - deduplicated, order-preserving node/link collections
//!
//! A batch is the unit of exchange between the mappers and whatever consumes
//! the mapped graph. Once returned by a mapper it is treated as immutable;
//! merging produces a new batch.

use crate::Result;
use crate::atom::{Link, Node};
use crate::id::AtomId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A deduplicated pair of node and link sequences.
///
/// Both sequences keep first occurrences in insertion order. Since every
/// field of a node or link derives from its identity, first-wins versus
/// any-wins dedup are behaviorally equivalent - but first-wins is the pinned
/// contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AtomBatch {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub links: Vec<Link>,
}

impl AtomBatch {
    /// Build a batch from raw atom lists, deduplicating both independently
    pub fn new(nodes: Vec<Node>, links: Vec<Link>) -> Self {
        Self {
            nodes: dedupe(nodes, |n| &n.id),
            links: dedupe(links, |l| &l.id),
        }
    }

    /// Merge batches into one: concatenate in batch order then atom order,
    /// then dedupe nodes and links independently.
    ///
    /// Associative, so callers may merge shards in any grouping before a
    /// final pass.
    pub fn merge(batches: impl IntoIterator<Item = AtomBatch>) -> AtomBatch {
        let mut nodes = Vec::new();
        let mut links = Vec::new();
        for batch in batches {
            nodes.extend(batch.nodes);
            links.extend(batch.links);
        }
        AtomBatch::new(nodes, links)
    }

    /// Total atom count (nodes + links)
    pub fn len(&self) -> usize {
        self.nodes.len() + self.links.len()
    }

    /// Check whether the batch holds no atoms
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.links.is_empty()
    }

    /// Deterministic textual form: compact JSON with object keys sorted.
    ///
    /// Identical logical batches always produce byte-identical output, which
    /// is what any content-addressed storage or caching layer above the
    /// bridge keys on.
    pub fn to_canonical_json(&self) -> Result<String> {
        // serde_json::Value maps are BTreeMaps, so going through Value sorts keys
        let value = serde_json::to_value(self)?;
        Ok(value.to_string())
    }

    /// Get statistics about the batch
    pub fn stats(&self) -> BatchStats {
        BatchStats {
            nodes: self.nodes.len(),
            links: self.links.len(),
        }
    }
}

/// Stable first-occurrence-wins filter by atom id, preserving input order.
///
/// Idempotent: `dedupe(dedupe(x)) == dedupe(x)`.
pub fn dedupe<T>(items: Vec<T>, id: impl Fn(&T) -> &AtomId) -> Vec<T> {
    let mut seen: HashSet<AtomId> = HashSet::with_capacity(items.len());
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        if seen.insert(id(&item).clone()) {
            out.push(item);
        }
    }
    out
}

/// Statistics about an atom batch
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BatchStats {
    pub nodes: usize,
    pub links: usize,
}

impl std::fmt::Display for BatchStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} nodes, {} links", self.nodes, self.links)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::{LinkKind, NodeKind};

    fn table(name: &str) -> Node {
        Node::new(NodeKind::Table, name)
    }

    fn member(row: &Node, table: &Node) -> Link {
        Link::new(LinkKind::Member, vec![row.id.clone(), table.id.clone()])
    }

    #[test]
    fn test_dedupe_keeps_first_occurrence_in_order() {
        let nodes = vec![table("a"), table("b"), table("a"), table("c"), table("b")];
        let deduped = dedupe(nodes, |n| &n.id);
        let names: Vec<&str> = deduped.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_dedupe_is_idempotent() {
        let nodes = vec![table("a"), table("a"), table("b")];
        let once = dedupe(nodes, |n| &n.id);
        let twice = dedupe(once.clone(), |n| &n.id);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_merge_dedupes_across_batches() {
        let t = table("dbo.t");
        let r = Node::new(NodeKind::Row, "dbo.t:1");
        let b1 = AtomBatch::new(vec![t.clone(), r.clone()], vec![member(&r, &t)]);
        let b2 = b1.clone();

        let merged = AtomBatch::merge([b1, b2]);
        assert_eq!(merged.nodes.len(), 2);
        assert_eq!(merged.links.len(), 1);
    }

    #[test]
    fn test_merge_is_associative() {
        let a = AtomBatch::new(vec![table("a"), table("x")], vec![]);
        let b = AtomBatch::new(vec![table("b"), table("x")], vec![]);
        let c = AtomBatch::new(vec![table("c"), table("a")], vec![]);

        let left = AtomBatch::merge([AtomBatch::merge([a.clone(), b.clone()]), c.clone()]);
        let right = AtomBatch::merge([a, AtomBatch::merge([b, c])]);

        let ids = |batch: &AtomBatch| {
            batch
                .nodes
                .iter()
                .map(|n| n.id.clone())
                .collect::<std::collections::HashSet<_>>()
        };
        assert_eq!(ids(&left), ids(&right));
    }

    #[test]
    fn test_canonical_json_is_byte_stable_and_sorted() {
        let t = table("dbo.t");
        let r = Node::new(NodeKind::Row, "dbo.t:1");
        let batch = AtomBatch::new(vec![r.clone(), t.clone()], vec![member(&r, &t)]);

        let first = batch.to_canonical_json().unwrap();
        let second = batch.clone().to_canonical_json().unwrap();
        assert_eq!(first, second);

        // keys inside each object come out sorted
        let idx_id = first.find("\"id\"").unwrap();
        let idx_kind = first.find("\"kind\"").unwrap();
        assert!(idx_id < idx_kind);
    }

    #[test]
    fn test_empty_batch() {
        let batch = AtomBatch::default();
        assert!(batch.is_empty());
        assert_eq!(batch.len(), 0);
        assert_eq!(batch.stats().to_string(), "0 nodes, 0 links");
    }
}
