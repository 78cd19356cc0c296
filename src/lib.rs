//! Fetch Cache - cache-backed remote fetching with bounded retries
//!
//! Returns a cached value while it is fresh, otherwise fetches it over the
//! network with linear backoff and stores the result with a TTL.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod models;
pub mod retry;
pub mod tasks;
pub mod transport;

pub use api::AppState;
pub use cache::{KeyValueStore, MemoryStore};
pub use config::Config;
pub use error::{CacheError, ConfigurationError, FetchError, TransportError};
pub use fetcher::{CachedFetcher, FetchRequest, PageParams};
pub use retry::RetryPolicy;
pub use tasks::spawn_cleanup_task;
pub use transport::{HttpTransport, Method, Params, Transport};
