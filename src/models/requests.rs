//! Request DTOs for the fetch cache API
//!
//! Query strings accepted by the HTTP endpoints.

use serde::Deserialize;

/// Query for `DELETE /cache?pattern=...`
#[derive(Debug, Clone, Deserialize)]
pub struct InvalidateQuery {
    /// Glob over cache keys (`*` and `?`)
    #[serde(default)]
    pub pattern: Option<String>,
}

impl InvalidateQuery {
    /// Returns the pattern, or an error message if it is missing or blank.
    pub fn validate(&self) -> Result<&str, String> {
        match self.pattern.as_deref() {
            Some(p) if !p.trim().is_empty() => Ok(p),
            _ => Err("Query parameter 'pattern' is required".to_string()),
        }
    }
}
