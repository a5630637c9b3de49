//! Confluence REST API client.
//!
//! Provides sync HTTP client for Confluence Server/Data Center REST API
//! with HTTP Basic authentication.

mod attachments;
mod labels;
mod pages;

use std::path::Path;
use std::time::Duration;

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use ureq::http::Response;
use ureq::{Agent, Body, RequestBuilder};

use crate::error::ConfluenceError;
use crate::types::{Attachment, Label, Page, PageDraft, PublishedPage};
use crate::wiki::WikiClient;

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

const USER_AGENT: &str = concat!("mdpub/", env!("CARGO_PKG_VERSION"));

/// Confluence REST API client.
pub struct ConfluenceClient {
    agent: Agent,
    base_url: String,
    authorization: String,
    headers: Vec<(String, String)>,
    minor_edit: bool,
}

impl ConfluenceClient {
    /// Create a client for the server at `base_url`.
    ///
    /// # Arguments
    /// * `base_url` - Confluence server base URL (without `/rest/api`)
    /// * `username` - Account used for publishing
    /// * `password` - Password or personal access token
    #[must_use]
    pub fn new(base_url: &str, username: &str, password: &str) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_owned(),
            authorization: basic_auth(username, password),
            headers: Vec::new(),
            minor_edit: true,
        }
    }

    /// Extra headers sent with every request.
    #[must_use]
    pub fn with_headers(mut self, headers: Vec<(String, String)>) -> Self {
        self.headers = headers;
        self
    }

    /// Whether updates and uploads are flagged as minor edits, which
    /// suppresses watcher notifications.
    #[must_use]
    pub fn with_minor_edit(mut self, minor_edit: bool) -> Self {
        self.minor_edit = minor_edit;
        self
    }

    /// Get the API base URL.
    fn api_url(&self) -> String {
        format!("{}/rest/api", self.base_url)
    }

    /// Add authentication and the common headers to a request.
    fn authorize<B>(&self, request: RequestBuilder<B>) -> RequestBuilder<B> {
        let mut request = request
            .header("Authorization", &self.authorization)
            .header("Accept", "application/json")
            .header("User-Agent", USER_AGENT);
        for (name, value) in &self.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        request
    }
}

/// Pass successful responses through, turn error statuses into errors.
fn check_status(response: Response<Body>) -> Result<Body, ConfluenceError> {
    let status = response.status().as_u16();
    let mut body = response.into_body();

    if status >= 400 {
        let error_body = body
            .read_to_string()
            .unwrap_or_else(|_| "(unable to read error body)".to_owned());
        return Err(ConfluenceError::HttpResponse {
            status,
            body: error_body,
        });
    }

    Ok(body)
}

fn basic_auth(username: &str, password: &str) -> String {
    format!(
        "Basic {}",
        BASE64_STANDARD.encode(format!("{username}:{password}"))
    )
}

impl WikiClient for ConfluenceClient {
    fn find_page(
        &self,
        title: &str,
        space: &str,
        ancestor_id: Option<&str>,
    ) -> Result<Option<Page>, ConfluenceError> {
        self.search_page(title, space, ancestor_id)
    }

    fn page_content(&self, page_id: &str) -> Result<String, ConfluenceError> {
        self.get_page_body(page_id)
    }

    fn create_page(&self, draft: &PageDraft<'_>) -> Result<Page, ConfluenceError> {
        self.post_page(draft)
    }

    fn update_page(
        &self,
        page_id: &str,
        draft: &PageDraft<'_>,
        current_version: u32,
    ) -> Result<PublishedPage, ConfluenceError> {
        self.put_page(page_id, draft, current_version)
    }

    fn list_attachments(
        &self,
        page_id: &str,
        filename: &str,
    ) -> Result<Vec<Attachment>, ConfluenceError> {
        self.get_attachments(page_id, filename)
    }

    fn upload_attachment(
        &self,
        page_id: &str,
        path: &Path,
        hash: &str,
    ) -> Result<(), ConfluenceError> {
        self.post_attachment(page_id, path, hash)
    }

    fn apply_labels(&self, page_id: &str, labels: &[String]) -> Result<Vec<Label>, ConfluenceError> {
        self.post_labels(page_id, labels)
    }

    fn resolve_author(&self, username: &str) -> Result<Option<String>, ConfluenceError> {
        self.get_user_key(username)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_basic_auth() {
        // "user:pass" in base64
        assert_eq!(basic_auth("user", "pass"), "Basic dXNlcjpwYXNz");
    }

    #[test]
    fn test_api_url_trims_trailing_slash() {
        let client = ConfluenceClient::new("https://wiki.example.com/", "u", "p");
        assert_eq!(client.api_url(), "https://wiki.example.com/rest/api");
    }

    #[test]
    fn test_builder_options() {
        let client = ConfluenceClient::new("https://wiki.example.com", "u", "p")
            .with_headers(vec![("X-Team".to_owned(), "docs".to_owned())])
            .with_minor_edit(false);
        assert_eq!(client.headers, vec![("X-Team".to_owned(), "docs".to_owned())]);
        assert!(!client.minor_edit);
    }
}
