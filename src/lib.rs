//! # Atombridge - SQL to AtomSpace Bridge
//!
//! Maps relational database structure and row data into a content-addressed
//! atom graph (typed nodes and typed, ordered-argument links) for ingestion
//! into a symbolic-reasoning store.
//!
//! Atombridge provides:
//! - Deterministic blake3-derived atom identifiers (content addressing)
//! - Schema mapper: tables + foreign keys → table/column nodes and FK links
//! - Row mapper: table rows → row/column/value nodes and member/evaluation links
//! - Batch engine: first-wins dedup and associative batch merging
//! - A pluggable AtomSpace adapter (mock and remote variants) plus an HTTP bridge

pub mod id;
pub mod atom;
pub mod schema;
pub mod row;
pub mod batch;
pub mod adapter;
pub mod cognition;
pub mod server;
pub mod config;

// Re-exports for convenient access
pub use id::AtomId;
pub use atom::{Link, LinkKind, Node, NodeKind};
pub use batch::AtomBatch;
pub use row::{PrimaryKey, map_rows};
pub use schema::map_schema;

/// Result type alias for Atombridge operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Atombridge operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("row is missing primary-key column '{0}'")]
    MissingKeyColumn(String),

    #[error("malformed descriptor: {0}")]
    MalformedDescriptor(String),

    #[error("invalid atom id: {0}")]
    InvalidAtomId(String),

    #[error("atomspace transport error: {0}")]
    Transport(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
