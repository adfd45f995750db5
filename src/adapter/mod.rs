//! AtomSpace adapter framework
//!
//! The bridge never talks to a reasoning store directly - it produces
//! batches and hands them to an [`AtomSpace`] implementation. Two variants
//! exist: a mock that only counts atoms (the default, and the test double)
//! and a remote variant holding an endpoint whose transport is not yet
//! implemented. The mapping engine never knows which one is active.

use crate::batch::AtomBatch;
use crate::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Outcome of pushing a batch into the store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertSummary {
    pub status: String,
    pub nodes: usize,
    pub links: usize,
}

/// Outcome of a reasoning pass over a batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReasonSummary {
    pub status: String,
    pub mode: String,
    pub insight: String,
    pub atoms: usize,
}

/// Capability interface for the symbolic-reasoning store.
///
/// Implementations own all transport concerns; callers only ever see plain
/// summaries or a typed error.
#[async_trait]
pub trait AtomSpace: Send + Sync {
    /// Short name for logging
    fn name(&self) -> &'static str;

    /// Store (or refresh) every atom in the batch
    async fn upsert(&self, batch: &AtomBatch) -> Result<UpsertSummary>;

    /// Run a reasoning pass over the batch
    async fn reason(&self, batch: &AtomBatch, mode: Option<&str>) -> Result<ReasonSummary>;
}

/// No-op store: acknowledges batches and reports their sizes.
#[derive(Debug, Default)]
pub struct MockAtomSpace;

#[async_trait]
impl AtomSpace for MockAtomSpace {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn upsert(&self, batch: &AtomBatch) -> Result<UpsertSummary> {
        tracing::debug!(nodes = batch.nodes.len(), links = batch.links.len(), "mock upsert");
        Ok(UpsertSummary {
            status: "ok".to_string(),
            nodes: batch.nodes.len(),
            links: batch.links.len(),
        })
    }

    async fn reason(&self, batch: &AtomBatch, mode: Option<&str>) -> Result<ReasonSummary> {
        Ok(ReasonSummary {
            status: "ok".to_string(),
            mode: mode.unwrap_or("default").to_string(),
            insight: "noop".to_string(),
            atoms: batch.links.len(),
        })
    }
}

/// Live-transport variant.
///
/// Holds the configured endpoint, but the wire protocol is not implemented
/// yet: both operations surface [`Error::Transport`]. Dropping a real client
/// in later only touches this type.
#[derive(Debug)]
pub struct RemoteAtomSpace {
    endpoint: String,
}

impl RemoteAtomSpace {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    fn unimplemented(&self) -> Error {
        Error::Transport(format!(
            "real AtomSpace transport to {} not configured",
            self.endpoint
        ))
    }
}

#[async_trait]
impl AtomSpace for RemoteAtomSpace {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn upsert(&self, _batch: &AtomBatch) -> Result<UpsertSummary> {
        Err(self.unimplemented())
    }

    async fn reason(&self, _batch: &AtomBatch, _mode: Option<&str>) -> Result<ReasonSummary> {
        Err(self.unimplemented())
    }
}

/// Which adapter variant configuration selects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AtomSpaceMode {
    #[default]
    Mock,
    Remote,
}

impl AtomSpaceMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AtomSpaceMode::Mock => "mock",
            AtomSpaceMode::Remote => "remote",
        }
    }
}

impl FromStr for AtomSpaceMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "mock" => Ok(AtomSpaceMode::Mock),
            "remote" | "real" => Ok(AtomSpaceMode::Remote),
            _ => Err(Error::MalformedDescriptor(format!(
                "unknown atomspace mode: {s}"
            ))),
        }
    }
}

impl std::fmt::Display for AtomSpaceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Build the adapter a configuration asks for.
///
/// Remote mode without an endpoint falls back to the mock.
pub fn build_atomspace(mode: AtomSpaceMode, endpoint: Option<&str>) -> Box<dyn AtomSpace> {
    match (mode, endpoint) {
        (AtomSpaceMode::Remote, Some(url)) => Box::new(RemoteAtomSpace::new(url)),
        (AtomSpaceMode::Remote, None) => {
            tracing::warn!("remote atomspace mode without an endpoint, using mock");
            Box::new(MockAtomSpace)
        }
        (AtomSpaceMode::Mock, _) => Box::new(MockAtomSpace),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::{Node, NodeKind};

    fn batch() -> AtomBatch {
        AtomBatch::new(
            vec![
                Node::new(NodeKind::Table, "dbo.t"),
                Node::new(NodeKind::Row, "dbo.t:1"),
            ],
            vec![],
        )
    }

    #[tokio::test]
    async fn test_mock_upsert_counts_atoms() {
        let summary = MockAtomSpace.upsert(&batch()).await.unwrap();
        assert_eq!(summary.status, "ok");
        assert_eq!(summary.nodes, 2);
        assert_eq!(summary.links, 0);
    }

    #[tokio::test]
    async fn test_mock_reason_defaults_mode() {
        let summary = MockAtomSpace.reason(&batch(), None).await.unwrap();
        assert_eq!(summary.mode, "default");
        assert_eq!(summary.insight, "noop");

        let summary = MockAtomSpace.reason(&batch(), Some("pln")).await.unwrap();
        assert_eq!(summary.mode, "pln");
    }

    #[tokio::test]
    async fn test_remote_surfaces_transport_error() {
        let remote = RemoteAtomSpace::new("http://localhost:17001");
        let err = remote.upsert(&batch()).await.unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
    }

    #[test]
    fn test_build_atomspace_selection() {
        assert_eq!(build_atomspace(AtomSpaceMode::Mock, None).name(), "mock");
        assert_eq!(
            build_atomspace(AtomSpaceMode::Remote, Some("http://x")).name(),
            "remote"
        );
        // remote without endpoint falls back to mock
        assert_eq!(build_atomspace(AtomSpaceMode::Remote, None).name(), "mock");
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("mock".parse::<AtomSpaceMode>().unwrap(), AtomSpaceMode::Mock);
        assert_eq!("real".parse::<AtomSpaceMode>().unwrap(), AtomSpaceMode::Remote);
        assert!("furious".parse::<AtomSpaceMode>().is_err());
    }
}
