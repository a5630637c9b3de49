//! Errors that abort a sync run.

use crate::error::ConfluenceError;

/// Fatal sync error.
///
/// Page-level problems are collected in the
/// [`SyncReport`](super::SyncReport) instead.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Confluence rejected the credentials.
    #[error("Authorization failed (HTTP {status}). Please check your credentials")]
    Unauthorized { status: u16, body: String },
}

/// Split a client error into fatal (`Err`) and page-local (`Ok(reason)`).
pub(crate) fn page_local(err: ConfluenceError) -> Result<String, SyncError> {
    if !err.is_unauthorized() {
        return Ok(err.to_string());
    }
    match err {
        ConfluenceError::HttpResponse { status, body } => {
            Err(SyncError::Unauthorized { status, body })
        }
        other => Ok(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_local() {
        for status in [401, 403] {
            let err = ConfluenceError::HttpResponse {
                status,
                body: "Forbidden".to_owned(),
            };
            match page_local(err) {
                Err(SyncError::Unauthorized { status: got, body }) => {
                    assert_eq!(got, status);
                    assert_eq!(body, "Forbidden");
                }
                other => panic!("expected unauthorized, got {other:?}"),
            }
        }

        let err = ConfluenceError::HttpResponse {
            status: 500,
            body: "boom".to_owned(),
        };
        assert_eq!(page_local(err).unwrap(), "HTTP error: 500 - boom");

        let err = ConfluenceError::MalformedResponse("no id".to_owned());
        assert_eq!(page_local(err).unwrap(), "Unexpected response: no id");
    }
}
