//! Atom identifiers - Global, stable identity for every atom
//!
//! An `AtomId` is the hex blake3 digest of `"<tag>:<payload>"`, where the tag
//! is the atom's kind and the payload is its defining data. Identical defining
//! data always yields an identical id, across processes and runs - this is the
//! content-addressing invariant the whole bridge rests on.
//!
//! This module also owns the identity strings fed into derivation:
//! - table identity: `schema.table` (or bare `table`)
//! - column identity: `<table identity>.<column>`
//! - row identity: `<table identity>:<pk values joined by "|">`
//! - value identity: canonical scalar text (see [`value_repr`])

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Deterministic, content-derived identifier for a node or link.
///
/// This id serves as the primary key for:
/// - Nodes and links
/// - Dedup within and across batches
/// - Any downstream content-addressed storage
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AtomId(String);

impl AtomId {
    /// Length of the hex-encoded digest
    pub const LEN: usize = 64;

    /// Derive an id from a kind tag and an identity payload.
    ///
    /// Pure function of `(tag, payload)` - no salt, no randomness, no clock.
    /// Collisions between distinct payloads are treated as a correctness bug,
    /// not a runtime condition.
    pub fn derive(tag: &str, payload: &str) -> Self {
        let digest = blake3::hash(format!("{tag}:{payload}").as_bytes());
        AtomId(digest.to_string())
    }

    /// Get the hex string form
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse a previously derived id from its hex form
    pub fn parse(s: &str) -> Result<Self> {
        if s.len() != Self::LEN {
            return Err(Error::InvalidAtomId(format!(
                "expected {} hex chars, got {}",
                Self::LEN,
                s.len()
            )));
        }
        if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::InvalidAtomId(format!("non-hex characters in '{s}'")));
        }
        Ok(AtomId(s.to_ascii_lowercase()))
    }
}

impl fmt::Display for AtomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AtomId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for AtomId {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for AtomId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        AtomId::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Identity of a table: `schema.table` when a schema name is present.
pub fn table_identity(schema: Option<&str>, table: &str) -> String {
    match schema {
        Some(s) => format!("{s}.{table}"),
        None => table.to_string(),
    }
}

/// Identity of a column: `<table identity>.<column>`.
pub fn column_identity(schema: Option<&str>, table: &str, column: &str) -> String {
    format!("{}.{column}", table_identity(schema, table))
}

/// Identity of a row: `<table identity>:<pk values joined by "|">`.
///
/// Primary-key value order must match the caller-declared key order.
pub fn row_identity(schema: Option<&str>, table: &str, pk_values: &[String]) -> String {
    format!("{}:{}", table_identity(schema, table), pk_values.join("|"))
}

/// Canonical text form of a scalar value.
///
/// `NULL` for null, `true`/`false` for booleans, decimal text for numbers,
/// the raw string otherwise. Non-scalar JSON (not produced by real SQL rows
/// but representable in requests) falls back to its compact JSON text.
pub fn value_repr(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "NULL".to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
