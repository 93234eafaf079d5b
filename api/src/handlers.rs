//! Request handlers for the transaction endpoints.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use prometheus::{Encoder, TextEncoder};

use chainwatch_eth::ChainRegistry;
use chainwatch_store::TransactionStore;
use chainwatch_types::{TxFilter, TxId, TxRecord};

use crate::error::ApiError;
use crate::pagination::PageParams;

/// Shared state injected into every handler.
pub struct ApiState {
    pub store: Arc<dyn TransactionStore>,
    pub registry: Arc<ChainRegistry>,
    pub metrics: prometheus::Registry,
}

// ── POST /transaction ────────────────────────────────────────────────────

/// Register a transaction for monitoring.
///
/// Only `id`, `chain` and `metadata` are taken from the body; creation
/// forces a fresh monitoring state whatever status flags the caller sent.
pub async fn create_transaction(
    State(state): State<Arc<ApiState>>,
    body: Result<Json<TxRecord>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(submitted) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    if submitted.id.is_empty() {
        return Err(ApiError::BadRequest("transaction id is required".to_string()));
    }
    if submitted.chain.is_empty() {
        return Err(ApiError::BadRequest("chain is required".to_string()));
    }

    let mut record = TxRecord::new(submitted.id, submitted.chain);
    record.metadata = submitted.metadata;
    state.store.create(&record).await?;

    tracing::info!(txid = %record.id, chain = %record.chain, "transaction registered");
    Ok(StatusCode::OK)
}

// ── POST /transaction/:txid/reviewed ─────────────────────────────────────

/// Acknowledge a transaction's outcome, removing it from sweep candidacy.
///
/// The id comes from the path; the body is decoded for validity but its
/// field values are ignored. The endpoint only ever sets the reviewed flag,
/// so a body carrying `reviewed: false` cannot un-review a record. Returns
/// the record as stored after the write.
pub async fn mark_reviewed(
    State(state): State<Arc<ApiState>>,
    Path(txid): Path<String>,
    body: Result<Json<TxRecord>, JsonRejection>,
) -> Result<Json<TxRecord>, ApiError> {
    body.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let record = state.store.mark_reviewed(&TxId::new(txid)).await?;
    tracing::info!(txid = %record.id, "transaction marked reviewed");
    Ok(Json(record))
}

// ── POST /transactions ───────────────────────────────────────────────────

/// List records matching a field-equality filter, paged.
pub async fn list_transactions(
    State(state): State<Arc<ApiState>>,
    params: Result<Query<PageParams>, QueryRejection>,
    body: Result<Json<TxFilter>, JsonRejection>,
) -> Result<Json<Vec<TxRecord>>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let Json(filter) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let records = state.store.find(&filter, params.to_page()).await?;
    Ok(Json(records))
}

// ── GET /status/healthz ──────────────────────────────────────────────────

/// Probe every configured chain client; any failure makes the service
/// unhealthy.
pub async fn healthz(State(state): State<Arc<ApiState>>) -> Result<&'static str, ApiError> {
    for (name, client) in state.registry.iter() {
        client
            .chain_id()
            .await
            .map_err(|e| ApiError::Unhealthy(format!("chain {name} unreachable: {e}")))?;
    }
    Ok("healthy")
}

// ── GET /status/metrics ──────────────────────────────────────────────────

/// Prometheus text exposition of the engine metrics.
pub async fn metrics(State(state): State<Arc<ApiState>>) -> Result<String, ApiError> {
    let mut buf = Vec::new();
    TextEncoder::new()
        .encode(&state.metrics.gather(), &mut buf)
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    String::from_utf8(buf).map_err(|e| ApiError::Internal(e.to_string()))
}
