//! Markdown to Confluence synchronization.
//!
//! A run loads source documents, plans one [`PageModel`] per publishable
//! document, orders the pages so parents deploy before their children and
//! then creates or updates each page on the wiki:
//!
//! 1. Find the page by title (below its parent when known)
//! 2. Skip it when the stored body already matches, unless forced
//! 3. Create it if missing, upload changed attachments, update the body
//! 4. Apply labels
//!
//! Page-level problems are collected in a [`SyncReport`]. Only rejected
//! credentials abort the run with a [`SyncError`].

mod attachments;
mod deploy;
mod error;
mod forest;
mod page;
mod report;


use std::path::{Path, PathBuf};

use mdpub_config::Config;
use mdpub_site::{Document, Eligibility, Ineligible, SiteError, is_supported};
use tracing::{error, info, warn};

pub use attachments::file_hash;
pub use error::SyncError;
pub use forest::{Forest, Visit, Walk};
pub use page::{PageModel, PagePlanner};
pub use report::{IgnoredDocument, PageIssue, PageOutcome, PageReport, SyncReport};

use crate::wiki::WikiClient;
use error::page_local;

/// Settings for a sync run.
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Space for pages that don't declare one.
    pub space: String,
    /// Root that local image references resolve against.
    pub static_dir: PathBuf,
    /// Label added to every page.
    pub global_label: Option<String>,
    /// Prefix for page slugs.
    pub slug_prefix: Option<String>,
    /// Prepend an authors block to each page.
    pub render_authors: bool,
    /// Skip uploading attachments whose hash is unchanged.
    pub optimize_attachments: bool,
    /// Update pages even when the stored body matches.
    pub force: bool,
}

impl SyncOptions {
    /// Options from loaded configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let publish = &config.publish_resolved;
        Self {
            space: config.confluence.space.clone(),
            static_dir: publish.static_dir.clone(),
            global_label: publish.global_label.clone(),
            slug_prefix: publish.slug_prefix.clone(),
            render_authors: publish.render_authors,
            optimize_attachments: publish.optimize_attachments,
            force: false,
        }
    }

    #[must_use]
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
}

/// A document that passed the publish checks.
#[derive(Debug)]
pub struct Publishable {
    pub document: Document,
    pub title: String,
}

/// Load documents and keep the ones that should be published.
///
/// Excluded documents go to the report: unreadable files and shared
/// documents without a title as failures, the rest as ignored.
pub fn load_documents(paths: &[PathBuf], report: &mut SyncReport) -> Vec<Publishable> {
    let mut publishable = Vec::with_capacity(paths.len());

    for path in paths {
        if !is_supported(path) {
            info!("Skipping {}: {}", path.display(), Ineligible::UnsupportedFormat);
            report.ignore(path.clone(), Ineligible::UnsupportedFormat.to_string());
            continue;
        }

        let document = match Document::load(path) {
            Ok(document) => document,
            Err(e) => {
                let reason = load_failure(&e);
                error!("Unable to process {}: {}", path.display(), reason);
                report.fail(None, path.clone(), reason);
                continue;
            }
        };

        match document.eligibility() {
            Eligibility::Eligible { title } => publishable.push(Publishable { document, title }),
            Eligibility::Ineligible(reason) if reason.is_failure() => {
                error!("Unable to publish {}: {}", path.display(), reason);
                report.fail(None, path.clone(), reason.to_string());
            }
            Eligibility::Ineligible(reason) => {
                info!("Skipping {}: {}", path.display(), reason);
                report.ignore(path.clone(), reason.to_string());
            }
        }
    }

    publishable
}

fn load_failure(err: &SiteError) -> String {
    match err {
        SiteError::Io { source, .. } => format!("unable to read file: {source}"),
        SiteError::FrontMatter { source, .. } => source.to_string(),
    }
}

/// Publishes documents to the wiki through a [`WikiClient`].
pub struct Synchronizer<'a, C> {
    client: &'a C,
    options: SyncOptions,
}

impl<'a, C: WikiClient> Synchronizer<'a, C> {
    #[must_use]
    pub fn new(client: &'a C, options: SyncOptions) -> Self {
        Self { client, options }
    }

    /// Publish the given source files.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Unauthorized`] if the wiki rejects the
    /// credentials. Everything else is recorded in the report.
    pub fn run(&self, paths: &[PathBuf]) -> Result<SyncReport, SyncError> {
        let mut report = SyncReport::default();
        let publishable = load_documents(paths, &mut report);

        let planner = PagePlanner::new(&self.options);
        let mut pages = Vec::with_capacity(publishable.len());
        for Publishable { document, title } in publishable {
            let author_keys = self.resolve_authors(&document.path, &document.front_matter.authors)?;
            pages.push(planner.plan(&document, title, author_keys));
        }

        let mut forest = Forest::build(pages);
        self.deploy_all(&mut forest, &mut report)?;

        info!(
            "Sync finished: {} created, {} updated, {} unchanged, {} failed, {} skipped",
            report.created(),
            report.updated(),
            report.unchanged(),
            report.failed.len(),
            report.skipped.len()
        );
        Ok(report)
    }

    /// User keys for the document's authors. Unknown users are left out.
    fn resolve_authors(&self, source: &Path, usernames: &[String]) -> Result<Vec<String>, SyncError> {
        if !self.options.render_authors {
            return Ok(Vec::new());
        }

        let mut keys = Vec::with_capacity(usernames.len());
        for username in usernames {
            match self.client.resolve_author(username) {
                Ok(Some(key)) => keys.push(key),
                Ok(None) => warn!(
                    "Unknown author {} in {}; leaving it out",
                    username,
                    source.display()
                ),
                Err(e) => {
                    let reason = page_local(e)?;
                    warn!("Unable to look up author {}: {}", username, reason);
                }
            }
        }
        Ok(keys)
    }
}
