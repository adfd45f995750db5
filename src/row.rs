//! Row mapper - table rows → atoms
//!
//! Each row becomes a `RowNode` (named by table identity plus its
//! primary-key values) with a `MemberLink` into its table, and one
//! `ColumnNode`/`ValueNode`/`EvaluationLink` triple per column present on
//! the row. The table node itself is emitted too, so a row batch is
//! self-contained and does not require merging with a schema batch first.

use crate::atom::{Link, LinkKind, Node, NodeKind};
use crate::batch::AtomBatch;
use crate::id::{column_identity, row_identity, table_identity, value_repr};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// A row on the wire: column name → scalar value.
///
/// The column set may vary per row; mapping is not limited to any declared
/// schema.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Primary-key specification: a single column or an ordered column tuple.
///
/// Order matters for composite keys - it determines the row identity string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrimaryKey {
    Single(String),
    Composite(Vec<String>),
}

impl PrimaryKey {
    /// Key columns in declared order
    pub fn columns(&self) -> &[String] {
        match self {
            PrimaryKey::Single(col) => std::slice::from_ref(col),
            PrimaryKey::Composite(cols) => cols,
        }
    }

    fn validate(&self) -> Result<()> {
        let cols = self.columns();
        if cols.is_empty() {
            return Err(Error::MalformedDescriptor(
                "primary key with no columns".to_string(),
            ));
        }
        if cols.iter().any(|c| c.is_empty()) {
            return Err(Error::MalformedDescriptor(
                "primary key with an empty column name".to_string(),
            ));
        }
        Ok(())
    }
}

/// Map rows of one table onto atoms.
///
/// Fails with [`Error::MissingKeyColumn`] if any row lacks a declared key
/// column - checked up front across all rows, so the mapping either fully
/// succeeds or emits nothing. Rows sharing primary-key values collapse to
/// one row node; their value pairs still produce separate evaluation links
/// (identical triples collapse via dedup).
pub fn map_rows(
    schema: Option<&str>,
    table: &str,
    rows: &[Row],
    primary_key: &PrimaryKey,
) -> Result<AtomBatch> {
    if table.is_empty() {
        return Err(Error::MalformedDescriptor(
            "row mapping with empty table name".to_string(),
        ));
    }
    primary_key.validate()?;

    let pk_cols = primary_key.columns();
    for row in rows {
        for col in pk_cols {
            if !row.contains_key(col) {
                return Err(Error::MissingKeyColumn(col.clone()));
            }
        }
    }

    let table_node = Node::new(NodeKind::Table, table_identity(schema, table));
    let table_id = table_node.id.clone();

    let mut nodes = vec![table_node];
    let mut links = Vec::new();

    for row in rows {
        let pk_values: Vec<String> = pk_cols
            .iter()
            .map(|col| value_repr(&row[col.as_str()]))
            .collect();
        let row_node = Node::new(NodeKind::Row, row_identity(schema, table, &pk_values));
        let row_id = row_node.id.clone();
        nodes.push(row_node);
        links.push(Link::new(
            LinkKind::Member,
            vec![row_id.clone(), table_id.clone()],
        ));

        for (col, value) in row {
            let column_node = Node::new(NodeKind::Column, column_identity(schema, table, col));
            let value_node = Node::new(NodeKind::Value, value_repr(value));
            links.push(Link::new(
                LinkKind::Evaluation,
                vec![row_id.clone(), column_node.id.clone(), value_node.id.clone()],
            ));
            nodes.push(column_node);
            nodes.push(value_node);
        }
    }

    Ok(AtomBatch::new(nodes, links))
}
