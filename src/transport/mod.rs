//! Transport Module
//!
//! The single-request boundary to the remote service. One call is one
//! attempt; retrying is the caller's job.

mod http;

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::TransportError;

pub use http::HttpTransport;

/// Request parameters, kept ordered so derived cache keys are stable.
pub type Params = BTreeMap<String, String>;

/// HTTP verbs the transport knows how to issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    /// Whether params travel in the query string rather than a JSON body.
    pub fn uses_query(&self) -> bool {
        matches!(self, Method::Get | Method::Delete)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// A successful (2xx) response with its decoded JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: Value,
}

/// Performs exactly one remote request per call.
///
/// Connection failures, timeouts and non-2xx statuses all surface as
/// [`TransportError`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn request(
        &self,
        method: Method,
        endpoint: &str,
        params: &Params,
    ) -> Result<Response, TransportError>;
}
