//! API Module
//!
//! HTTP handlers and routing that expose the cached fetcher.
//!
//! # Endpoints
//! - `GET /fetch/*endpoint` - Cached upstream GET
//! - `DELETE /cache/:key` - Drop one cache entry
//! - `DELETE /cache?pattern=...` - Drop entries matching a glob
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
