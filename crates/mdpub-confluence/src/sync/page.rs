//! Deployment intent for one source document.

use std::path::{Path, PathBuf};

use mdpub_renderer::StorageRenderer;
use mdpub_site::{Document, sanitize_tags, slug};

use super::SyncOptions;
use crate::types::PageDraft;

/// What a document should look like on the wiki.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageModel {
    /// Page title; unique within a run.
    pub title: String,
    /// Title of the parent page, if declared.
    pub parent_title: Option<String>,
    pub space: String,
    pub slug: String,
    /// Sanitized tags plus the global label.
    pub labels: Vec<String>,
    /// Rendered storage format body.
    pub markup: String,
    /// Local files referenced by the body, resolved against the static directory.
    pub attachments: Vec<PathBuf>,
    /// Source file.
    pub source: PathBuf,
    /// Page ID once found or created. Empty for pages created in a dry run.
    pub remote_id: Option<String>,
}

impl PageModel {
    /// Page content to publish below `ancestor_id`.
    #[must_use]
    pub fn draft<'a>(&'a self, ancestor_id: Option<&'a str>) -> PageDraft<'a> {
        PageDraft {
            title: &self.title,
            space: &self.space,
            ancestor_id,
            content: &self.markup,
        }
    }
}

/// Builds [`PageModel`]s from eligible documents.
pub struct PagePlanner<'a> {
    options: &'a SyncOptions,
}

impl<'a> PagePlanner<'a> {
    #[must_use]
    pub fn new(options: &'a SyncOptions) -> Self {
        Self { options }
    }

    /// Plan a page for an eligible document.
    ///
    /// `author_keys` are credited on the page when author rendering is enabled.
    #[must_use]
    pub fn plan(&self, document: &Document, title: String, author_keys: Vec<String>) -> PageModel {
        let renderer = if self.options.render_authors {
            StorageRenderer::new().with_authors(author_keys)
        } else {
            StorageRenderer::new()
        };
        let rendered = renderer.render(&document.body);

        let attachments = rendered
            .attachments
            .iter()
            .map(|src| resolve_static(&self.options.static_dir, src))
            .collect();

        let mut labels = sanitize_tags(&document.front_matter.tags);
        if let Some(label) = &self.options.global_label {
            labels.push(label.clone());
        }

        let space = document
            .front_matter
            .space
            .clone()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| self.options.space.clone());

        PageModel {
            title,
            parent_title: document.parent().map(ToOwned::to_owned),
            space,
            slug: slug(&document.path, self.options.slug_prefix.as_deref()),
            labels,
            markup: rendered.markup,
            attachments,
            source: document.path.clone(),
            remote_id: None,
        }
    }
}

/// Resolve an image source against the static directory.
///
/// Site-absolute sources (`/img/a.png`) are relative to the static root too.
fn resolve_static(static_dir: &Path, src: &str) -> PathBuf {
    static_dir.join(src.trim_start_matches('/'))
}
