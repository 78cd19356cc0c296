//! Request and Response models for the fetch cache API
//!
//! DTOs used for serializing/deserializing HTTP query strings and bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::InvalidateQuery;
pub use responses::{
    DeleteResponse, FetchResponse, HealthResponse, InvalidateResponse, StatsResponse,
};
