//! API Handlers
//!
//! HTTP request handlers for each cache endpoint.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::cache::{ExpiringCache, InsertOutcome};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::models::{
    validate_key, CountResponse, EntryResponse, ExistsResponse, HealthResponse, MessageResponse,
    PutRequest, StatsResponse, ValueResponse,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Shared cache handle; clones point at the same store
    pub cache: ExpiringCache<String>,
}

impl AppState {
    pub fn new(cache: ExpiringCache<String>) -> Self {
        Self { cache }
    }

    /// Initializes a cache from `config`, starting its sweep if configured.
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        Ok(Self::new(ExpiringCache::init(config.clone())?))
    }
}

fn check_key(key: &str) -> Result<()> {
    match validate_key(key) {
        Some(msg) => Err(CacheError::InvalidRequest(msg)),
        None => Ok(()),
    }
}

/// Handler for PUT /put
pub async fn put_handler(
    State(state): State<AppState>,
    Json(req): Json<PutRequest>,
) -> Result<Json<MessageResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let outcome = match req.ttl {
        Some(ttl) => {
            state
                .cache
                .put_with_expiry(req.key.clone(), req.value, ttl)
                .await
        }
        None => state.cache.put(req.key.clone(), req.value).await,
    };

    Ok(Json(MessageResponse::stored(
        req.key,
        outcome == InsertOutcome::Updated,
    )))
}

/// Handler for GET /get/:key
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ValueResponse>> {
    check_key(&key)?;

    match state.cache.get(&key).await {
        Some(value) => Ok(Json(ValueResponse::new(key, value))),
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for DELETE /del/:key. Deleting an absent key succeeds.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<MessageResponse>> {
    check_key(&key)?;

    let removed = state.cache.del(&key).await;
    Ok(Json(MessageResponse::deleted(key, removed)))
}

/// Handler for POST /pop
pub async fn pop_handler(State(state): State<AppState>) -> Result<Json<ValueResponse>> {
    state
        .cache
        .pop_random_entry()
        .await
        .map(|entry| Json(ValueResponse::new(entry.key, entry.value)))
        .ok_or_else(|| CacheError::NotFound("cache is empty".to_string()))
}

/// Handler for GET /exists/:key
pub async fn exists_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ExistsResponse>> {
    check_key(&key)?;

    let exists = state.cache.exists(&key).await;
    Ok(Json(ExistsResponse { key, exists }))
}

/// Handler for GET /count
pub async fn count_handler(State(state): State<AppState>) -> Json<CountResponse> {
    Json(CountResponse {
        count: state.cache.count().await,
    })
}

/// Handler for GET /entries
pub async fn entries_handler(State(state): State<AppState>) -> Json<Vec<EntryResponse>> {
    Json(state.cache.iter().await.map(EntryResponse::from).collect())
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.cache.stats().await))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
