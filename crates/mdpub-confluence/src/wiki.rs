//! The wiki operations publishing depends on.

use std::path::Path;

use crate::error::ConfluenceError;
use crate::types::{Attachment, Label, Page, PageDraft, PublishedPage};

/// Remote wiki capability used by the synchronizer.
///
/// Implemented over the REST API by [`ConfluenceClient`](crate::ConfluenceClient),
/// wrapped by [`DryRunClient`](crate::DryRunClient) to suppress writes, and
/// by an in-memory mock in tests.
///
/// Every method may fail with an HTTP 401/403 response, which callers detect
/// with [`ConfluenceError::is_unauthorized`].
pub trait WikiClient {
    /// Look up a page by exact title within a space, optionally below an
    /// ancestor page.
    ///
    /// Returns [`ConfluenceError::AmbiguousPage`] if more than one page matches.
    fn find_page(
        &self,
        title: &str,
        space: &str,
        ancestor_id: Option<&str>,
    ) -> Result<Option<Page>, ConfluenceError>;

    /// Stored storage-format body of a page.
    fn page_content(&self, page_id: &str) -> Result<String, ConfluenceError>;

    /// Create a page.
    fn create_page(&self, draft: &PageDraft<'_>) -> Result<Page, ConfluenceError>;

    /// Replace a page's content, bumping `current_version` by one.
    fn update_page(
        &self,
        page_id: &str,
        draft: &PageDraft<'_>,
        current_version: u32,
    ) -> Result<PublishedPage, ConfluenceError>;

    /// Attachments on a page with the given file name.
    fn list_attachments(
        &self,
        page_id: &str,
        filename: &str,
    ) -> Result<Vec<Attachment>, ConfluenceError>;

    /// Upload a file as a new attachment version, recording `hash` as its comment.
    fn upload_attachment(&self, page_id: &str, path: &Path, hash: &str)
    -> Result<(), ConfluenceError>;

    /// Add global labels to a page, returning the labels the page now has.
    fn apply_labels(&self, page_id: &str, labels: &[String])
    -> Result<Vec<Label>, ConfluenceError>;

    /// Map a username to its user key.
    fn resolve_author(&self, username: &str) -> Result<Option<String>, ConfluenceError>;
}
