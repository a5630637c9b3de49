//! Dry-run wrapper that suppresses writes.

use std::path::Path;

use tracing::info;

use crate::error::ConfluenceError;
use crate::types::{Attachment, Label, Page, PageDraft, PublishedPage, Version};
use crate::wiki::WikiClient;

/// URL reported for pages "published" in a dry run.
pub const DRY_RUN_URL: &str = "(dry run)";

/// Wraps a client so lookups hit the server but writes are only logged.
///
/// Writes return empty results: created pages have an empty ID, which the
/// wrapper never sends to the server.
pub struct DryRunClient<C> {
    inner: C,
}

impl<C: WikiClient> DryRunClient<C> {
    #[must_use]
    pub fn new(inner: C) -> Self {
        Self { inner }
    }

    /// The wrapped client.
    #[must_use]
    pub fn inner(&self) -> &C {
        &self.inner
    }
}

impl<C: WikiClient> WikiClient for DryRunClient<C> {
    fn find_page(
        &self,
        title: &str,
        space: &str,
        ancestor_id: Option<&str>,
    ) -> Result<Option<Page>, ConfluenceError> {
        self.inner.find_page(title, space, ancestor_id)
    }

    fn page_content(&self, page_id: &str) -> Result<String, ConfluenceError> {
        self.inner.page_content(page_id)
    }

    fn create_page(&self, draft: &PageDraft<'_>) -> Result<Page, ConfluenceError> {
        info!(
            "[dry run] Would create page \"{}\" in space {} (parent {})",
            draft.title,
            draft.space,
            draft.ancestor_id.unwrap_or("none")
        );
        Ok(Page {
            id: String::new(),
            content_type: "page".to_owned(),
            title: draft.title.to_owned(),
            version: Version::default(),
            body: None,
            links: None,
        })
    }

    fn update_page(
        &self,
        page_id: &str,
        draft: &PageDraft<'_>,
        current_version: u32,
    ) -> Result<PublishedPage, ConfluenceError> {
        info!(
            "[dry run] Would update page \"{}\" (id {}) to version {} ({} bytes)",
            draft.title,
            page_id,
            current_version + 1,
            draft.content.len()
        );
        Ok(PublishedPage {
            id: page_id.to_owned(),
            version: current_version,
            url: DRY_RUN_URL.to_owned(),
        })
    }

    fn list_attachments(
        &self,
        page_id: &str,
        filename: &str,
    ) -> Result<Vec<Attachment>, ConfluenceError> {
        // Pages created in this run don't exist remotely
        if page_id.is_empty() {
            return Ok(Vec::new());
        }
        self.inner.list_attachments(page_id, filename)
    }

    fn upload_attachment(
        &self,
        page_id: &str,
        path: &Path,
        _hash: &str,
    ) -> Result<(), ConfluenceError> {
        info!(
            "[dry run] Would upload {} to page {}",
            path.display(),
            page_id
        );
        Ok(())
    }

    fn apply_labels(&self, page_id: &str, labels: &[String]) -> Result<Vec<Label>, ConfluenceError> {
        info!(
            "[dry run] Would label page {} with: {}",
            page_id,
            labels.join(", ")
        );
        Ok(Vec::new())
    }

    fn resolve_author(&self, username: &str) -> Result<Option<String>, ConfluenceError> {
        self.inner.resolve_author(username)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::mock::{Call, MockWikiClient};

    fn draft<'a>() -> PageDraft<'a> {
        PageDraft {
            title: "Guide",
            space: "ENG",
            ancestor_id: None,
            content: "<p>x</p>",
        }
    }

    #[test]
    fn test_reads_delegate() {
        let mock = MockWikiClient::new().with_page("Guide", "ENG", None, "<p>old</p>");
        let client = DryRunClient::new(mock);

        let page = client.find_page("Guide", "ENG", None).unwrap().unwrap();
        assert_eq!(client.page_content(&page.id).unwrap(), "<p>old</p>");
    }

    #[test]
    fn test_writes_are_suppressed() {
        let client = DryRunClient::new(MockWikiClient::new());

        let page = client.create_page(&draft()).unwrap();
        assert!(page.id.is_empty());

        let published = client.update_page(&page.id, &draft(), 0).unwrap();
        assert_eq!(published.url, DRY_RUN_URL);

        client
            .upload_attachment("", &PathBuf::from("a.png"), "hash")
            .unwrap();
        assert!(client.apply_labels("", &["docs".to_owned()]).unwrap().is_empty());
        assert!(client.list_attachments("", "a.png").unwrap().is_empty());

        assert_eq!(client.inner.calls(), Vec::<Call>::new());
    }
}
