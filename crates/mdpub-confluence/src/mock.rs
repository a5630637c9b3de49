//! In-memory wiki for testing.
//!
//! Provides [`MockWikiClient`] for unit testing without a Confluence server.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::RwLock;

use crate::error::ConfluenceError;
use crate::types::{Attachment, Label, Page, PageDraft, PublishedPage, Version};
use crate::wiki::WikiClient;

/// A recorded client call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    FindPage {
        title: String,
        ancestor_id: Option<String>,
    },
    PageContent {
        page_id: String,
    },
    CreatePage {
        title: String,
        ancestor_id: Option<String>,
    },
    UpdatePage {
        page_id: String,
        title: String,
        ancestor_id: Option<String>,
        version: u32,
    },
    ListAttachments {
        page_id: String,
        filename: String,
    },
    UploadAttachment {
        page_id: String,
        filename: String,
        hash: String,
    },
    ApplyLabels {
        page_id: String,
        labels: Vec<String>,
    },
    ResolveAuthor {
        username: String,
    },
}

impl Call {
    /// Whether the call changes remote state.
    #[must_use]
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::CreatePage { .. }
                | Self::UpdatePage { .. }
                | Self::UploadAttachment { .. }
                | Self::ApplyLabels { .. }
        )
    }
}

#[derive(Debug, Clone)]
struct MockPage {
    id: String,
    title: String,
    space: String,
    ancestor_id: Option<String>,
    content: String,
    version: u32,
}

#[derive(Debug, Default)]
struct State {
    pages: Vec<MockPage>,
    attachments: HashMap<String, Vec<Attachment>>,
    next_id: u32,
}

impl State {
    fn next_id(&mut self) -> String {
        self.next_id += 1;
        (100 + self.next_id).to_string()
    }
}

/// Mock wiki for testing.
///
/// Stores pages and attachments in memory and records every call. Use the
/// builder methods to seed remote state and inject failures.
///
/// # Example
///
/// ```ignore
/// use mdpub_confluence::{MockWikiClient, WikiClient};
///
/// let client = MockWikiClient::new().with_page("Home", "ENG", None, "<p>Hi</p>");
/// let page = client.find_page("Home", "ENG", None).unwrap().unwrap();
/// ```
#[derive(Debug, Default)]
pub struct MockWikiClient {
    state: RwLock<State>,
    calls: RwLock<Vec<Call>>,
    users: HashMap<String, String>,
    failing_updates: HashSet<String>,
    failing_creates: HashSet<String>,
    unauthorized: bool,
}

impl MockWikiClient {
    /// Create an empty wiki.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an existing page at version 1.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_page(
        self,
        title: &str,
        space: &str,
        ancestor_id: Option<&str>,
        content: &str,
    ) -> Self {
        {
            let mut state = self.state.write().unwrap();
            let id = state.next_id();
            state.pages.push(MockPage {
                id,
                title: title.to_owned(),
                space: space.to_owned(),
                ancestor_id: ancestor_id.map(ToOwned::to_owned),
                content: content.to_owned(),
                version: 1,
            });
        }
        self
    }

    /// Seed an attachment on the page with the given title.
    ///
    /// # Panics
    ///
    /// Panics if no such page was seeded or the internal lock is poisoned.
    #[must_use]
    pub fn with_attachment(self, page_title: &str, filename: &str, hash: &str) -> Self {
        let page_id = self.page_id(page_title).unwrap();
        {
            let mut state = self.state.write().unwrap();
            let id = state.next_id();
            state
                .attachments
                .entry(page_id)
                .or_default()
                .push(attachment(id, filename, hash));
        }
        self
    }

    /// Register a user key for a username.
    #[must_use]
    pub fn with_user(mut self, username: &str, user_key: &str) -> Self {
        self.users.insert(username.to_owned(), user_key.to_owned());
        self
    }

    /// Make content updates of the titled page fail.
    #[must_use]
    pub fn with_failing_update(mut self, title: &str) -> Self {
        self.failing_updates.insert(title.to_owned());
        self
    }

    /// Make creation of the titled page fail.
    #[must_use]
    pub fn with_failing_create(mut self, title: &str) -> Self {
        self.failing_creates.insert(title.to_owned());
        self
    }

    /// Reject every call with HTTP 401.
    #[must_use]
    pub fn unauthorized(mut self) -> Self {
        self.unauthorized = true;
        self
    }

    /// All calls made so far, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.calls.read().unwrap().clone()
    }

    /// Calls that changed remote state.
    #[must_use]
    pub fn mutations(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_mutation).collect()
    }

    /// ID of the first page with the given title.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn page_id(&self, title: &str) -> Option<String> {
        let state = self.state.read().unwrap();
        state
            .pages
            .iter()
            .find(|p| p.title == title)
            .map(|p| p.id.clone())
    }

    /// Stored content of the first page with the given title.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn content(&self, title: &str) -> Option<String> {
        let state = self.state.read().unwrap();
        state
            .pages
            .iter()
            .find(|p| p.title == title)
            .map(|p| p.content.clone())
    }

    /// Parent ID of the first page with the given title.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn ancestor_of(&self, title: &str) -> Option<String> {
        let state = self.state.read().unwrap();
        state
            .pages
            .iter()
            .find(|p| p.title == title)
            .and_then(|p| p.ancestor_id.clone())
    }

    fn record(&self, call: Call) -> Result<(), ConfluenceError> {
        self.calls.write().unwrap().push(call);
        if self.unauthorized {
            return Err(ConfluenceError::HttpResponse {
                status: 401,
                body: "Unauthorized".to_owned(),
            });
        }
        Ok(())
    }
}

fn attachment(id: String, filename: &str, hash: &str) -> Attachment {
    Attachment {
        id,
        title: filename.to_owned(),
        version: Some(Version {
            number: 1,
            message: Some(hash.to_owned()),
        }),
    }
}

fn not_found(page_id: &str) -> ConfluenceError {
    ConfluenceError::HttpResponse {
        status: 404,
        body: format!("No content with id {page_id}"),
    }
}

impl WikiClient for MockWikiClient {
    fn find_page(
        &self,
        title: &str,
        space: &str,
        ancestor_id: Option<&str>,
    ) -> Result<Option<Page>, ConfluenceError> {
        self.record(Call::FindPage {
            title: title.to_owned(),
            ancestor_id: ancestor_id.map(ToOwned::to_owned),
        })?;

        let state = self.state.read().unwrap();
        let mut matches: Vec<&MockPage> = state
            .pages
            .iter()
            .filter(|p| p.title == title && p.space == space)
            .filter(|p| ancestor_id.is_none() || p.ancestor_id.as_deref() == ancestor_id)
            .collect();

        if matches.len() > 1 {
            return Err(ConfluenceError::AmbiguousPage {
                title: title.to_owned(),
                count: matches.len(),
            });
        }
        Ok(matches.pop().map(|p| Page {
            id: p.id.clone(),
            content_type: "page".to_owned(),
            title: p.title.clone(),
            version: Version {
                number: p.version,
                message: None,
            },
            body: None,
            links: None,
        }))
    }

    fn page_content(&self, page_id: &str) -> Result<String, ConfluenceError> {
        self.record(Call::PageContent {
            page_id: page_id.to_owned(),
        })?;

        let state = self.state.read().unwrap();
        state
            .pages
            .iter()
            .find(|p| p.id == page_id)
            .map(|p| p.content.clone())
            .ok_or_else(|| not_found(page_id))
    }

    fn create_page(&self, draft: &PageDraft<'_>) -> Result<Page, ConfluenceError> {
        self.record(Call::CreatePage {
            title: draft.title.to_owned(),
            ancestor_id: draft.ancestor_id.map(ToOwned::to_owned),
        })?;

        if self.failing_creates.contains(draft.title) {
            return Err(ConfluenceError::HttpResponse {
                status: 400,
                body: "A page with this title already exists".to_owned(),
            });
        }

        let mut state = self.state.write().unwrap();
        let id = state.next_id();
        state.pages.push(MockPage {
            id: id.clone(),
            title: draft.title.to_owned(),
            space: draft.space.to_owned(),
            ancestor_id: draft.ancestor_id.map(ToOwned::to_owned),
            content: draft.content.to_owned(),
            version: 1,
        });

        Ok(Page {
            id,
            content_type: "page".to_owned(),
            title: draft.title.to_owned(),
            version: Version {
                number: 1,
                message: None,
            },
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
        self.record(Call::UpdatePage {
            page_id: page_id.to_owned(),
            title: draft.title.to_owned(),
            ancestor_id: draft.ancestor_id.map(ToOwned::to_owned),
            version: current_version,
        })?;

        if self.failing_updates.contains(draft.title) {
            return Err(ConfluenceError::MalformedResponse(format!(
                "update of page {page_id} returned no web link"
            )));
        }

        let mut state = self.state.write().unwrap();
        let page = state
            .pages
            .iter_mut()
            .find(|p| p.id == page_id)
            .ok_or_else(|| not_found(page_id))?;

        if page.version != current_version {
            return Err(ConfluenceError::HttpResponse {
                status: 409,
                body: format!("Version must be incremented from {}", page.version),
            });
        }

        page.title = draft.title.to_owned();
        page.space = draft.space.to_owned();
        page.ancestor_id = draft.ancestor_id.map(ToOwned::to_owned);
        page.content = draft.content.to_owned();
        page.version += 1;

        Ok(PublishedPage {
            id: page.id.clone(),
            version: page.version,
            url: format!(
                "https://wiki.example.com/pages/viewpage.action?pageId={}",
                page.id
            ),
        })
    }

    fn list_attachments(
        &self,
        page_id: &str,
        filename: &str,
    ) -> Result<Vec<Attachment>, ConfluenceError> {
        self.record(Call::ListAttachments {
            page_id: page_id.to_owned(),
            filename: filename.to_owned(),
        })?;

        let state = self.state.read().unwrap();
        Ok(state
            .attachments
            .get(page_id)
            .map(|list| {
                list.iter()
                    .filter(|a| a.title == filename)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn upload_attachment(
        &self,
        page_id: &str,
        path: &Path,
        hash: &str,
    ) -> Result<(), ConfluenceError> {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.record(Call::UploadAttachment {
            page_id: page_id.to_owned(),
            filename: filename.clone(),
            hash: hash.to_owned(),
        })?;

        let mut state = self.state.write().unwrap();
        let id = state.next_id();
        state
            .attachments
            .entry(page_id.to_owned())
            .or_default()
            .push(attachment(id, &filename, hash));
        Ok(())
    }

    fn apply_labels(&self, page_id: &str, labels: &[String]) -> Result<Vec<Label>, ConfluenceError> {
        self.record(Call::ApplyLabels {
            page_id: page_id.to_owned(),
            labels: labels.to_vec(),
        })?;
        Ok(labels.iter().map(Label::global).collect())
    }

    fn resolve_author(&self, username: &str) -> Result<Option<String>, ConfluenceError> {
        self.record(Call::ResolveAuthor {
            username: username.to_owned(),
        })?;
        Ok(self.users.get(username).cloned())
    }
}
