//! Atom types - nodes and links of the content-addressed graph
//!
//! All relational structure reduces to four node kinds and three link kinds:
//! - `TableNode`, `ColumnNode`, `RowNode`, `ValueNode`
//! - `ForeignKeyLink`: source table → destination table (+ key columns)
//! - `MemberLink`: row → its table
//! - `EvaluationLink`: row → column → value
//!
//! The serde/wire tag of a kind is also its derivation tag, so an atom's id
//! can be recomputed from its serialized form alone.

use crate::id::AtomId;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Node kinds - every mapped entity is one of these four.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// A table (`dbo.users`)
    #[serde(rename = "TableNode")]
    Table,
    /// A column of a table (`dbo.users.id`)
    #[serde(rename = "ColumnNode")]
    Column,
    /// A row, identified by its primary-key values (`dbo.users:42`)
    #[serde(rename = "RowNode")]
    Row,
    /// A scalar value in canonical text form (`NULL`, `42`, `alice`)
    #[serde(rename = "ValueNode")]
    Value,
}

impl NodeKind {
    /// The wire tag - also the derivation tag for ids of this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Table => "TableNode",
            NodeKind::Column => "ColumnNode",
            NodeKind::Row => "RowNode",
            NodeKind::Value => "ValueNode",
        }
    }

    /// Get all node kinds
    pub fn all() -> &'static [NodeKind] {
        &[
            NodeKind::Table,
            NodeKind::Column,
            NodeKind::Row,
            NodeKind::Value,
        ]
    }
}

impl FromStr for NodeKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "TableNode" => Ok(NodeKind::Table),
            "ColumnNode" => Ok(NodeKind::Column),
            "RowNode" => Ok(NodeKind::Row),
            "ValueNode" => Ok(NodeKind::Value),
            _ => Err(Error::MalformedDescriptor(format!(
                "unknown node kind: {s}"
            ))),
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Link kinds - every mapped relationship is one of these three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkKind {
    /// Source table references destination table via key columns
    #[serde(rename = "ForeignKeyLink")]
    ForeignKey,
    /// Row belongs to table
    #[serde(rename = "MemberLink")]
    Member,
    /// Row has value for column
    #[serde(rename = "EvaluationLink")]
    Evaluation,
}

impl LinkKind {
    /// The wire tag - also the derivation tag for ids of this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkKind::ForeignKey => "ForeignKeyLink",
            LinkKind::Member => "MemberLink",
            LinkKind::Evaluation => "EvaluationLink",
        }
    }

    /// Get all link kinds
    pub fn all() -> &'static [LinkKind] {
        &[LinkKind::ForeignKey, LinkKind::Member, LinkKind::Evaluation]
    }
}

impl FromStr for LinkKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ForeignKeyLink" => Ok(LinkKind::ForeignKey),
            "MemberLink" => Ok(LinkKind::Member),
            "EvaluationLink" => Ok(LinkKind::Evaluation),
            _ => Err(Error::MalformedDescriptor(format!(
                "unknown link kind: {s}"
            ))),
        }
    }
}

impl std::fmt::Display for LinkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A named node in the atom graph.
///
/// Every field participates in identity: the id is derived from the kind tag
/// and the name, so nodes with equal fields are the same node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// The kind of node
    pub kind: NodeKind,
    /// Identity string (table identity, column identity, row identity, or value text)
    pub name: String,
    /// Content-derived identifier
    pub id: AtomId,
}

impl Node {
    /// Create a node, deriving its id from `(kind, name)`
    pub fn new(kind: NodeKind, name: impl Into<String>) -> Self {
        let name = name.into();
        let id = AtomId::derive(kind.as_str(), &name);
        Self { kind, name, id }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Node {}

impl std::hash::Hash for Node {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// An ordered relationship between atom identifiers.
///
/// Argument order is semantically significant and part of the identity
/// payload - swapping a foreign key's source and destination produces a
/// different link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    /// The kind of link
    pub kind: LinkKind,
    /// Ordered argument identifiers
    pub args: Vec<AtomId>,
    /// Content-derived identifier
    pub id: AtomId,
}

impl Link {
    /// Create a link, deriving its id from `(kind, args)`
    pub fn new(kind: LinkKind, args: Vec<AtomId>) -> Self {
        let payload = args
            .iter()
            .map(AtomId::as_str)
            .collect::<Vec<_>>()
            .join("|");
        let id = AtomId::derive(kind.as_str(), &payload);
        Self { kind, args, id }
    }
}

impl PartialEq for Link {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Link {}

impl std::hash::Hash for Link {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_kind_roundtrip() {
        for kind in NodeKind::all() {
            let parsed: NodeKind = kind.as_str().parse().unwrap();
            assert_eq!(*kind, parsed);
        }
    }

    #[test]
    fn test_link_kind_roundtrip() {
        for kind in LinkKind::all() {
            let parsed: LinkKind = kind.as_str().parse().unwrap();
            assert_eq!(*kind, parsed);
        }
    }

    #[test]
    fn test_node_identity_is_content_derived() {
        let a = Node::new(NodeKind::Table, "dbo.users");
        let b = Node::new(NodeKind::Table, "dbo.users");
        assert_eq!(a, b);
        assert_eq!(a.id, AtomId::derive("TableNode", "dbo.users"));
    }

    #[test]
    fn test_same_name_different_kind_differs() {
        let table = Node::new(NodeKind::Table, "dbo.users");
        let row = Node::new(NodeKind::Row, "dbo.users");
        assert_ne!(table, row);
    }

    #[test]
    fn test_link_argument_order_matters() {
        let a = Node::new(NodeKind::Table, "dbo.orders");
        let b = Node::new(NodeKind::Table, "dbo.users");
        let forward = Link::new(LinkKind::ForeignKey, vec![a.id.clone(), b.id.clone()]);
        let backward = Link::new(LinkKind::ForeignKey, vec![b.id, a.id]);
        assert_ne!(forward, backward);
    }

    #[test]
    fn test_node_serde_uses_wire_tags() {
        let node = Node::new(NodeKind::Column, "dbo.users.id");
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["kind"], "ColumnNode");
        let back: Node = serde_json::from_value(json).unwrap();
        assert_eq!(back, node);
    }
}
