use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::batch::AtomBatch;
use crate::row::{PrimaryKey, Row, map_rows};
use crate::schema::{ForeignKeyDescriptor, TableDescriptor, map_schema};
use crate::server::AppState;
use crate::Error;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub time: String,
}

#[derive(Debug, Deserialize)]
pub struct IngestSchemaRequest {
    pub tables: Vec<TableDescriptor>,
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKeyDescriptor>,
}

#[derive(Debug, Deserialize)]
pub struct IngestTableRequest {
    #[serde(default)]
    pub schema: Option<String>,
    pub table: String,
    pub primary_key: PrimaryKey,
    pub rows: Vec<Row>,
}

#[derive(Debug, Deserialize)]
pub struct ReasonRequest {
    pub atoms: AtomBatch,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub context: Option<serde_json::Value>,
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub status: String,
    pub processed_batches: u64,
    pub last_request_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type HandlerError = (StatusCode, Json<ErrorResponse>);

fn engine_error(e: Error) -> HandlerError {
    let status = match e {
        Error::MissingKeyColumn(_) | Error::MalformedDescriptor(_) | Error::InvalidAtomId(_) => {
            StatusCode::BAD_REQUEST
        }
        Error::Transport(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ErrorResponse { error: e.to_string() }))
}

pub async fn health(State(_state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        time: chrono::Utc::now().to_rfc3339(),
    })
}

pub async fn ingest_schema(
    State(state): State<Arc<AppState>>,
    Json(req): Json<IngestSchemaRequest>,
) -> Result<Json<serde_json::Value>, HandlerError> {
    let batch = map_schema(&req.tables, &req.foreign_keys).map_err(engine_error)?;
    tracing::debug!(stats = %batch.stats(), "mapped schema batch");

    let upsert = state.atomspace.upsert(&batch).await.map_err(engine_error)?;
    state.state.lock().await.record_batch();

    Ok(Json(serde_json::json!({ "upsert": upsert })))
}

pub async fn ingest_table(
    State(state): State<Arc<AppState>>,
    Json(req): Json<IngestTableRequest>,
) -> Result<Json<serde_json::Value>, HandlerError> {
    let batch = map_rows(
        req.schema.as_deref(),
        &req.table,
        &req.rows,
        &req.primary_key,
    )
    .map_err(engine_error)?;
    tracing::debug!(table = %req.table, stats = %batch.stats(), "mapped row batch");

    let upsert = state.atomspace.upsert(&batch).await.map_err(engine_error)?;
    state.state.lock().await.record_batch();

    Ok(Json(serde_json::json!({ "upsert": upsert })))
}

pub async fn reason(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ReasonRequest>,
) -> Result<Json<serde_json::Value>, HandlerError> {
    // normalizes whatever the caller sent through the first-wins dedup
    let merged = AtomBatch::merge([req.atoms]);

    let cognitive = state
        .cognition
        .process(&merged, req.mode.as_deref(), req.context.clone());
    let adapter = state
        .atomspace
        .reason(&merged, req.mode.as_deref())
        .await
        .map_err(engine_error)?;
    state.state.lock().await.record_batch();

    Ok(Json(serde_json::json!({
        "cognitive": cognitive,
        "adapter": adapter,
    })))
}

pub async fn status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let state = state.state.lock().await;
    Json(StatusResponse {
        status: "ok".to_string(),
        processed_batches: state.processed_batches,
        last_request_id: state.last_request_id,
    })
}
