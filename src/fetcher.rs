//! Cached Fetcher Module
//!
//! Get-or-compute over a [`KeyValueStore`], with misses filled through a
//! [`RetryPolicy`]-wrapped remote call.
//!
//! There is no single-flight coalescing: two concurrent callers that miss on
//! the same key both run the remote fetch, and the last write to the store
//! wins. Callers that need one fetch per key must add their own locking.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::future::try_join_all;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::{generate_key, KeyValueStore};
use crate::error::{CacheError, FetchError, TransportError};
use crate::retry::RetryPolicy;
use crate::transport::{Method, Params, Transport};

// == Fetch Request ==
/// One remote resource to read, and the cache key it is stored under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub resource_key: String,
    pub endpoint: String,
    pub params: Params,
}

impl FetchRequest {
    /// GET request whose cache key is derived from the endpoint and params.
    pub fn get(endpoint: impl Into<String>, params: Params) -> Self {
        let endpoint = endpoint.into();
        Self {
            resource_key: generate_key(&endpoint, &params),
            endpoint,
            params,
        }
    }

    /// GET request cached under an explicit key.
    pub fn with_key(
        resource_key: impl Into<String>,
        endpoint: impl Into<String>,
        params: Params,
    ) -> Self {
        Self {
            resource_key: resource_key.into(),
            endpoint: endpoint.into(),
            params,
        }
    }
}

// == Page Params ==
/// How [`CachedFetcher::fetch_paginated`] names and sizes its pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageParams {
    pub page_param: String,
    pub limit_param: String,
    pub limit: u32,
    /// Stop after this many pages even if the upstream keeps answering
    pub max_pages: Option<u32>,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page_param: "page".to_string(),
            limit_param: "limit".to_string(),
            limit: 100,
            max_pages: None,
        }
    }
}

// == Cached Fetcher ==
/// Composes a cache store, a transport and a retry policy.
///
/// All collaborators are passed in; nothing is global.
#[derive(Clone)]
pub struct CachedFetcher {
    store: Arc<dyn KeyValueStore>,
    transport: Arc<dyn Transport>,
    policy: RetryPolicy,
    default_ttl: Duration,
}

impl CachedFetcher {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        transport: Arc<dyn Transport>,
        policy: RetryPolicy,
        default_ttl: Duration,
    ) -> Self {
        Self {
            store,
            transport,
            policy,
            default_ttl,
        }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    // == Get Or Fetch ==
    /// Returns the cached value for `resource_key`, or computes and caches it.
    ///
    /// 1. A live cached value is returned without calling `compute`.
    /// 2. On a miss, `compute` runs under the retry policy.
    /// 3. A success is written with `ttl` and returned; a failed write is
    ///    logged and does not fail the call.
    /// 4. Exhaustion returns [`FetchError::Unavailable`] and leaves the
    ///    cache untouched.
    ///
    /// Store read failures and cached values that do not decode as `T` are
    /// treated as misses.
    pub async fn get_or_fetch<T, F, Fut>(
        &self,
        resource_key: &str,
        compute: F,
        ttl: Duration,
    ) -> Result<T, FetchError>
    where
        T: Serialize + DeserializeOwned,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, TransportError>>,
    {
        if let Some(cached) = self.lookup(resource_key).await {
            return Ok(cached);
        }

        let value = self.policy.execute(compute).await.map_err(|err| {
            warn!(key = resource_key, error = %err, "Fetch unavailable, cache left untouched");
            FetchError::Unavailable(err)
        })?;

        self.store_result(resource_key, &value, ttl).await;
        Ok(value)
    }

    async fn lookup<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.store.get(key).await {
            Ok(Some(raw)) => match serde_json::from_value(raw) {
                Ok(value) => {
                    debug!(key, "Cache hit");
                    Some(value)
                }
                Err(err) => {
                    warn!(key, error = %err, "Cached value has unexpected shape, refetching");
                    None
                }
            },
            Ok(None) => {
                debug!(key, "Cache miss");
                None
            }
            Err(err) => {
                warn!(key, error = %err, "Cache read failed, treating as miss");
                None
            }
        }
    }

    async fn store_result<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) {
        let result = match serde_json::to_value(value) {
            Ok(encoded) => self.store.set(key, encoded, ttl).await,
            Err(err) => Err(CacheError::Serialization(err.to_string())),
        };

        if let Err(err) = result {
            warn!(key, error = %err, "Failed to cache fetched value");
        }
    }

    // == Fetch ==
    /// Cached GET of `request.endpoint`; `None` uses the default TTL.
    pub async fn fetch(
        &self,
        request: &FetchRequest,
        ttl: Option<Duration>,
    ) -> Result<Value, FetchError> {
        let transport = &self.transport;

        self.get_or_fetch(
            &request.resource_key,
            || async move {
                transport
                    .request(Method::Get, &request.endpoint, &request.params)
                    .await
                    .map(|response| response.body)
            },
            ttl.unwrap_or(self.default_ttl),
        )
        .await
    }

    // == Fetch Bulk ==
    /// Fetches every request concurrently, in order.
    ///
    /// Fails with the first error; results of the other requests that
    /// completed are still cached.
    pub async fn fetch_bulk(
        &self,
        requests: &[FetchRequest],
        ttl: Option<Duration>,
    ) -> Result<Vec<Value>, FetchError> {
        try_join_all(requests.iter().map(|request| self.fetch(request, ttl))).await
    }

    // == Fetch Paginated ==
    /// Walks pages 1, 2, ... until a page is empty (`[]` or `null`).
    ///
    /// Array pages are concatenated. A page that is not an array is kept as
    /// a single item and ends the walk. Each page is cached on its own.
    pub async fn fetch_paginated(
        &self,
        endpoint: &str,
        params: &Params,
        paging: &PageParams,
        ttl: Option<Duration>,
    ) -> Result<Vec<Value>, FetchError> {
        let mut items = Vec::new();
        let mut page: u32 = 1;

        loop {
            if paging.max_pages.is_some_and(|max| page > max) {
                debug!(endpoint, pages = page - 1, "Page limit reached");
                break;
            }

            let mut page_params = params.clone();
            page_params.insert(paging.page_param.clone(), page.to_string());
            page_params.insert(paging.limit_param.clone(), paging.limit.to_string());

            let body = self.fetch(&FetchRequest::get(endpoint, page_params), ttl).await?;

            match body {
                Value::Null => break,
                Value::Array(batch) if batch.is_empty() => break,
                Value::Array(batch) => items.extend(batch),
                other => {
                    items.push(other);
                    break;
                }
            }

            page += 1;
        }

        Ok(items)
    }

    // == Send ==
    /// Uncached request with retries, for verbs that change upstream state.
    pub async fn send(
        &self,
        method: Method,
        endpoint: &str,
        params: &Params,
    ) -> Result<Value, FetchError> {
        let transport = &self.transport;

        self.policy
            .execute(|| async move {
                transport
                    .request(method, endpoint, params)
                    .await
                    .map(|response| response.body)
            })
            .await
            .map_err(FetchError::Unavailable)
    }

    // == Invalidate ==
    pub async fn invalidate(&self, resource_key: &str) -> Result<bool, CacheError> {
        self.store.delete(resource_key).await
    }

    pub async fn invalidate_pattern(&self, pattern: &str) -> Result<usize, CacheError> {
        self.store.invalidate_pattern(pattern).await
    }
}
