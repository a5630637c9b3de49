//! Error types for Confluence integration.

/// Error from Confluence API operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfluenceError {
    /// HTTP request failed (network error, timeout, etc).
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] ureq::Error),

    /// HTTP response error (server returned error status).
    #[error("HTTP error: {status} - {body}")]
    HttpResponse {
        /// HTTP status code.
        status: u16,
        /// Response body (may contain error details).
        body: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Title lookup matched more than one page.
    #[error("{count} pages titled \"{title}\" match the same filters")]
    AmbiguousPage { title: String, count: usize },

    /// Response was successful but lacked an expected field.
    #[error("Unexpected response: {0}")]
    MalformedResponse(String),
}

impl ConfluenceError {
    /// Whether the server rejected our credentials.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::HttpResponse { status: 401 | 403, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_unauthorized() {
        for status in [401, 403] {
            let err = ConfluenceError::HttpResponse {
                status,
                body: String::new(),
            };
            assert!(err.is_unauthorized());
        }

        let err = ConfluenceError::HttpResponse {
            status: 404,
            body: String::new(),
        };
        assert!(!err.is_unauthorized());
        assert!(!ConfluenceError::MalformedResponse("x".to_owned()).is_unauthorized());
    }

    #[test]
    fn test_ambiguous_message() {
        let err = ConfluenceError::AmbiguousPage {
            title: "Setup Guide".to_owned(),
            count: 2,
        };
        assert_eq!(
            err.to_string(),
            "2 pages titled \"Setup Guide\" match the same filters"
        );
    }
}
