use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::adapter::{AtomSpace, build_atomspace};
use crate::cognition::CognitiveProcessor;
use crate::config::BridgeConfig;

pub mod routes;

/// Mutable service-layer bookkeeping.
///
/// Owned by the server behind a lock; the mapping engine itself stays
/// stateless.
#[derive(Debug, Default)]
pub struct BridgeState {
    pub processed_batches: u64,
    pub last_request_id: Option<Uuid>,
}

impl BridgeState {
    /// Count one processed batch and stamp a fresh request id
    pub fn record_batch(&mut self) -> Uuid {
        self.processed_batches += 1;
        let id = Uuid::new_v4();
        self.last_request_id = Some(id);
        id
    }
}

/// Server state
pub struct AppState {
    pub atomspace: Box<dyn AtomSpace>,
    pub cognition: CognitiveProcessor,
    pub state: Mutex<BridgeState>,
}

impl AppState {
    pub fn from_config(config: &BridgeConfig) -> Self {
        Self {
            atomspace: build_atomspace(config.atomspace_mode, config.atomspace_url.as_deref()),
            cognition: CognitiveProcessor::new(config.cognition_mode.clone()),
            state: Mutex::new(BridgeState::default()),
        }
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", post(routes::health))
        .route("/ingest/schema", post(routes::ingest_schema))
        .route("/ingest/table", post(routes::ingest_table))
        .route("/reason", post(routes::reason))
        .route("/status", get(routes::status))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start_server(config: &BridgeConfig) -> anyhow::Result<()> {
    let state = Arc::new(AppState::from_config(config));
    tracing::info!(adapter = state.atomspace.name(), "bridge adapter selected");

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    let addr = listener.local_addr()?;
    tracing::info!("Starting bridge on {}", addr);
    println!("Bridge running at http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BridgeConfig;

    #[test]
    fn test_router_composes_with_layers() {
        let state = Arc::new(AppState::from_config(&BridgeConfig::default()));
        let _app = build_router(state);
    }

    #[tokio::test]
    async fn test_record_batch_advances_state() {
        let state = AppState::from_config(&BridgeConfig::default());
        let first = state.state.lock().await.record_batch();
        let second = state.state.lock().await.record_batch();
        assert_ne!(first, second);

        let guard = state.state.lock().await;
        assert_eq!(guard.processed_batches, 2);
        assert_eq!(guard.last_request_id, Some(second));
    }
}
