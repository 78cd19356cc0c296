//! API Handlers
//!
//! HTTP request handlers for each fetch cache endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::info;

use crate::cache::MemoryStore;
use crate::config::Config;
use crate::error::{ApiError, ConfigurationError};
use crate::fetcher::{CachedFetcher, FetchRequest};
use crate::models::{
    DeleteResponse, FetchResponse, HealthResponse, InvalidateQuery, InvalidateResponse,
    StatsResponse,
};
use crate::transport::{HttpTransport, Params};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Cached fetcher in front of the upstream
    pub fetcher: Arc<CachedFetcher>,
    /// The store behind `fetcher`, kept for stats and sweeping
    pub store: MemoryStore,
}

impl AppState {
    pub fn new(fetcher: CachedFetcher, store: MemoryStore) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            store,
        }
    }

    /// Builds the store, transport and fetcher described by `config`.
    ///
    /// Fails before any I/O if the retry or HTTP settings are invalid.
    pub fn from_config(config: &Config) -> Result<Self, ConfigurationError> {
        let policy = config.retry_policy()?;
        let transport = HttpTransport::from_config(config)?;
        let store = MemoryStore::new(config.max_entries);

        let fetcher = CachedFetcher::new(
            Arc::new(store.clone()),
            Arc::new(transport),
            policy,
            config.default_ttl(),
        );

        Ok(Self::new(fetcher, store))
    }
}

/// Handler for GET /fetch/*endpoint
///
/// Serves the upstream resource from cache, fetching it on a miss. Query
/// parameters are forwarded and are part of the cache key.
pub async fn fetch_handler(
    State(state): State<AppState>,
    Path(endpoint): Path<String>,
    Query(params): Query<Params>,
) -> Result<Json<FetchResponse>, ApiError> {
    let request = FetchRequest::get(format!("/{}", endpoint.trim_start_matches('/')), params);
    let data = state.fetcher.fetch(&request, None).await?;

    Ok(Json(FetchResponse::new(request.resource_key, data)))
}

/// Handler for DELETE /cache/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let deleted = state.fetcher.invalidate(&key).await?;

    Ok(Json(DeleteResponse::new(key, deleted)))
}

/// Handler for DELETE /cache?pattern=...
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Query(query): Query<InvalidateQuery>,
) -> Result<Json<InvalidateResponse>, ApiError> {
    let pattern = query.validate().map_err(ApiError::InvalidRequest)?;
    let removed = state.fetcher.invalidate_pattern(pattern).await?;
    info!(pattern, removed, "Invalidated cache entries");

    Ok(Json(InvalidateResponse::new(pattern, removed)))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.store.stats().await.into())
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
