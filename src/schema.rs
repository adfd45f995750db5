//! Schema mapper - tables and foreign keys → atoms
//!
//! Each table becomes a `TableNode` plus one `ColumnNode` per column; each
//! foreign key becomes a `ForeignKeyLink` whose ordered arguments are
//! `[srcTable, dstTable, srcColumns.., dstColumns..]`. The column arguments
//! are derived straight from column-identity strings, so they land in the
//! same id space as materialized column nodes and resolve to the same atoms
//! in a merged batch.

use crate::atom::{Link, LinkKind, Node, NodeKind};
use crate::batch::AtomBatch;
use crate::id::{AtomId, column_identity, table_identity};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// A single column of a table descriptor.
///
/// Only the name participates in mapping; type information and other
/// catalog metadata are ignored (and tolerated) on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
}

/// A table as reported by the relational catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableDescriptor {
    #[serde(default)]
    pub schema: Option<String>,
    pub table: String,
    #[serde(default)]
    pub columns: Vec<ColumnDescriptor>,
}

impl TableDescriptor {
    fn validate(&self) -> Result<()> {
        if self.table.is_empty() {
            return Err(Error::MalformedDescriptor(
                "table descriptor with empty table name".to_string(),
            ));
        }
        for col in &self.columns {
            if col.name.is_empty() {
                return Err(Error::MalformedDescriptor(format!(
                    "table '{}' has a column with an empty name",
                    table_identity(self.schema.as_deref(), &self.table)
                )));
            }
        }
        Ok(())
    }
}

/// A foreign-key constraint between two tables.
///
/// Column order is significant on both sides and must match the constraint
/// declaration. The referenced tables need not appear in the table list -
/// referential completeness is the caller's concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForeignKeyDescriptor {
    #[serde(default)]
    pub src_schema: Option<String>,
    pub src_table: String,
    pub src_columns: Vec<String>,
    #[serde(default)]
    pub dst_schema: Option<String>,
    pub dst_table: String,
    pub dst_columns: Vec<String>,
}

impl ForeignKeyDescriptor {
    fn validate(&self) -> Result<()> {
        if self.src_table.is_empty() || self.dst_table.is_empty() {
            return Err(Error::MalformedDescriptor(
                "foreign key with empty table name".to_string(),
            ));
        }
        if self.src_columns.is_empty() || self.dst_columns.is_empty() {
            return Err(Error::MalformedDescriptor(format!(
                "foreign key {} -> {} with empty column list",
                self.src_table, self.dst_table
            )));
        }
        if self.src_columns.len() != self.dst_columns.len() {
            return Err(Error::MalformedDescriptor(format!(
                "foreign key {} -> {} has {} source columns but {} destination columns",
                self.src_table,
                self.dst_table,
                self.src_columns.len(),
                self.dst_columns.len()
            )));
        }
        Ok(())
    }
}

/// Map a relational schema onto atoms.
///
/// Emission order follows input order (tables before their columns, foreign
/// keys in declaration order); dedup keeps first occurrences. All
/// descriptors are validated before any atom is built, so the mapping
/// either fully succeeds or fails without a partial batch.
pub fn map_schema(
    tables: &[TableDescriptor],
    foreign_keys: &[ForeignKeyDescriptor],
) -> Result<AtomBatch> {
    for t in tables {
        t.validate()?;
    }
    for fk in foreign_keys {
        fk.validate()?;
    }

    let mut nodes = Vec::new();
    let mut links = Vec::new();

    for t in tables {
        let schema = t.schema.as_deref();
        nodes.push(Node::new(NodeKind::Table, table_identity(schema, &t.table)));
        for col in &t.columns {
            nodes.push(Node::new(
                NodeKind::Column,
                column_identity(schema, &t.table, &col.name),
            ));
        }
    }

    for fk in foreign_keys {
        let src_schema = fk.src_schema.as_deref();
        let dst_schema = fk.dst_schema.as_deref();
        let src_table = Node::new(NodeKind::Table, table_identity(src_schema, &fk.src_table));
        let dst_table = Node::new(NodeKind::Table, table_identity(dst_schema, &fk.dst_table));

        let mut args = vec![src_table.id, dst_table.id];
        args.extend(fk.src_columns.iter().map(|c| {
            AtomId::derive(
                NodeKind::Column.as_str(),
                &column_identity(src_schema, &fk.src_table, c),
            )
        }));
        args.extend(fk.dst_columns.iter().map(|c| {
            AtomId::derive(
                NodeKind::Column.as_str(),
                &column_identity(dst_schema, &fk.dst_table, c),
            )
        }));
        links.push(Link::new(LinkKind::ForeignKey, args));
    }

    Ok(AtomBatch::new(nodes, links))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users_table() -> TableDescriptor {
        TableDescriptor {
            schema: Some("dbo".to_string()),
            table: "users".to_string(),
            columns: ["id", "name", "email"]
                .iter()
                .map(|n| ColumnDescriptor {
                    name: n.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_table_yields_table_and_column_nodes() {
        let batch = map_schema(&[users_table()], &[]).unwrap();

        assert_eq!(batch.nodes.len(), 4);
        assert!(batch.links.is_empty());

        let table = &batch.nodes[0];
        assert_eq!(table.kind, NodeKind::Table);
        assert_eq!(table.name, "dbo.users");

        let column_names: Vec<&str> = batch.nodes[1..].iter().map(|n| n.name.as_str()).collect();
        assert_eq!(
            column_names,
            vec!["dbo.users.id", "dbo.users.name", "dbo.users.email"]
        );
    }

    #[test]
    fn test_zero_column_table_yields_only_table_node() {
        let t = TableDescriptor {
            schema: None,
            table: "audit_log".to_string(),
            columns: vec![],
        };
        let batch = map_schema(&[t], &[]).unwrap();
        assert_eq!(batch.nodes.len(), 1);
        assert_eq!(batch.nodes[0].name, "audit_log");
    }

    #[test]
    fn test_foreign_key_link_argument_layout() {
        let fk = ForeignKeyDescriptor {
            src_schema: Some("dbo".to_string()),
            src_table: "orders".to_string(),
            src_columns: vec!["user_id".to_string()],
            dst_schema: Some("dbo".to_string()),
            dst_table: "users".to_string(),
            dst_columns: vec!["id".to_string()],
        };
        // destination table deliberately absent from the table list
        let batch = map_schema(&[users_table()], &[fk]).unwrap();

        assert_eq!(batch.links.len(), 1);
        let link = &batch.links[0];
        assert_eq!(link.kind, LinkKind::ForeignKey);
        assert_eq!(link.args.len(), 4);
        assert_eq!(link.args[0], AtomId::derive("TableNode", "dbo.orders"));
        assert_eq!(link.args[1], AtomId::derive("TableNode", "dbo.users"));
        assert_eq!(
            link.args[2],
            AtomId::derive("ColumnNode", "dbo.orders.user_id")
        );
        assert_eq!(link.args[3], AtomId::derive("ColumnNode", "dbo.users.id"));
    }

    #[test]
    fn test_fk_column_ids_match_materialized_column_nodes() {
        let fk = ForeignKeyDescriptor {
            src_schema: Some("dbo".to_string()),
            src_table: "users".to_string(),
            src_columns: vec!["id".to_string()],
            dst_schema: Some("dbo".to_string()),
            dst_table: "users".to_string(),
            dst_columns: vec!["id".to_string()],
        };
        let batch = map_schema(&[users_table()], &[fk]).unwrap();

        let id_column = batch
            .nodes
            .iter()
            .find(|n| n.name == "dbo.users.id")
            .unwrap();
        assert_eq!(batch.links[0].args[2], id_column.id);
    }

    #[test]
    fn test_duplicate_tables_collapse() {
        let batch = map_schema(&[users_table(), users_table()], &[]).unwrap();
        assert_eq!(batch.nodes.len(), 4);
    }

    #[test]
    fn test_malformed_descriptors_rejected() {
        let empty_name = TableDescriptor {
            schema: None,
            table: String::new(),
            columns: vec![],
        };
        assert!(matches!(
            map_schema(&[empty_name], &[]),
            Err(Error::MalformedDescriptor(_))
        ));

        let mismatched = ForeignKeyDescriptor {
            src_schema: None,
            src_table: "a".to_string(),
            src_columns: vec!["x".to_string(), "y".to_string()],
            dst_schema: None,
            dst_table: "b".to_string(),
            dst_columns: vec!["x".to_string()],
        };
        assert!(matches!(
            map_schema(&[], &[mismatched]),
            Err(Error::MalformedDescriptor(_))
        ));
    }

    #[test]
    fn test_determinism_across_calls() {
        let tables = [users_table()];
        let a = map_schema(&tables, &[]).unwrap();
        let b = map_schema(&tables, &[]).unwrap();
        assert_eq!(
            a.to_canonical_json().unwrap(),
            b.to_canonical_json().unwrap()
        );
    }
}
