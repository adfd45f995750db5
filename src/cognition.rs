//! Cognitive processor - mode-tagged batch summaries
//!
//! Sits between the mappers and the reasoning adapter: given a merged batch
//! and an optional mode/context, it produces a small report the bridge
//! returns alongside the adapter's own summary. Pure; no state beyond the
//! configured default mode.

use crate::batch::AtomBatch;
use serde::{Deserialize, Serialize};

/// Report produced by a processing pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CognitiveReport {
    pub mode: String,
    pub summary: String,
    pub context: serde_json::Value,
}

/// Summarizes batches under a mode, falling back to a configured default.
#[derive(Debug, Clone)]
pub struct CognitiveProcessor {
    default_mode: String,
}

impl CognitiveProcessor {
    pub fn new(default_mode: impl Into<String>) -> Self {
        Self {
            default_mode: default_mode.into(),
        }
    }

    pub fn process(
        &self,
        batch: &AtomBatch,
        mode: Option<&str>,
        context: Option<serde_json::Value>,
    ) -> CognitiveReport {
        let mode = mode.unwrap_or(&self.default_mode).to_string();
        CognitiveReport {
            mode,
            summary: format!("processed {} atoms", batch.len()),
            context: context.unwrap_or_else(|| serde_json::json!({})),
        }
    }
}

impl Default for CognitiveProcessor {
    fn default() -> Self {
        Self::new("default")
    }
}
