//! Per-page deployment.

use tracing::{error, info, warn};

use super::error::{SyncError, page_local};
use super::forest::{Forest, Visit};
use super::page::PageModel;
use super::report::{PageOutcome, SyncReport};
use super::Synchronizer;
use crate::types::{PageDraft, PublishedPage};
use crate::wiki::WikiClient;

/// Body of a freshly created page until the first update replaces it.
const CREATE_PLACEHOLDER: &str = "<p>Created by mdpub</p>";

impl<C: WikiClient> Synchronizer<'_, C> {
    /// Deploy every page of the forest in walk order.
    pub(super) fn deploy_all(
        &self,
        forest: &mut Forest,
        report: &mut SyncReport,
    ) -> Result<(), SyncError> {
        let walk = forest.walk();

        for visit in walk.visits {
            match visit {
                Visit::Duplicate { index, first } => {
                    let page = forest.page(index);
                    let first = forest.page(first);
                    warn!(
                        "Page title \"{}\" in {} is already used by {}; skipping",
                        page.title,
                        page.source.display(),
                        first.source.display()
                    );
                    report.skip(
                        &page.title,
                        page.source.clone(),
                        format!("duplicate title, already deployed from {}", first.source.display()),
                    );
                }
                Visit::Deploy {
                    index,
                    parent,
                    depth,
                } => {
                    let ancestor = parent.and_then(|p| forest.page(p).remote_id.clone());
                    let page = forest.page(index);
                    info!(
                        "{}> Deploying \"{}\" from {}",
                        "-".repeat(depth * 4),
                        page.title,
                        page.source.display()
                    );

                    let outcome = self.deploy_page(page, ancestor)?;
                    let remote_id = outcome.remote_id().map(ToOwned::to_owned);
                    report.record(&page.title, page.source.clone(), outcome);
                    forest.page_mut(index).remote_id = remote_id;
                }
            }
        }

        for index in walk.cycles {
            let page = forest.page(index);
            warn!(
                "Page \"{}\" in {} is part of a parent cycle; skipping",
                page.title,
                page.source.display()
            );
            report.skip(&page.title, page.source.clone(), "parent cycle");
        }

        Ok(())
    }

    /// Create or update one page below `ancestor`, the ID of its parent
    /// deployed earlier in this run.
    ///
    /// Without one, a declared parent is looked up on the wiki.
    fn deploy_page(
        &self,
        page: &PageModel,
        ancestor: Option<String>,
    ) -> Result<PageOutcome, SyncError> {
        let ancestor = match (ancestor, &page.parent_title) {
            (Some(id), _) => Some(id),
            (None, None) => None,
            (None, Some(parent)) => match self.client.find_page(parent, &page.space, None) {
                Ok(Some(found)) => Some(found.id),
                Ok(None) => {
                    error!(
                        "Cannot find parent page \"{}\"; skipping {}",
                        parent,
                        page.source.display()
                    );
                    return Ok(PageOutcome::ParentUnresolved {
                        parent: parent.clone(),
                    });
                }
                Err(e) => {
                    return Ok(PageOutcome::Failed {
                        id: None,
                        reason: format!("parent lookup failed: {}", page_local(e)?),
                    });
                }
            },
        };
        // Empty IDs belong to pages a dry run pretended to create
        let ancestor = ancestor.as_deref().filter(|id| !id.is_empty());

        let existing = match self.client.find_page(&page.title, &page.space, ancestor) {
            Ok(existing) => existing,
            Err(e) => {
                let reason = page_local(e)?;
                error!("Unable to look up \"{}\": {}", page.title, reason);
                return Ok(PageOutcome::Failed { id: None, reason });
            }
        };

        if let Some(remote) = existing {
            if !self.options.force && self.is_unchanged(page, &remote.id)? {
                info!("Skipping \"{}\": no changes", page.title);
                return Ok(PageOutcome::Unchanged { id: remote.id });
            }

            return Ok(match self.publish(page, &remote.id, remote.version.number, ancestor)? {
                Ok(published) => PageOutcome::Updated {
                    id: remote.id,
                    url: published.url,
                },
                Err(reason) => PageOutcome::Failed {
                    id: Some(remote.id),
                    reason,
                },
            });
        }

        let placeholder = PageDraft {
            content: CREATE_PLACEHOLDER,
            ..page.draft(ancestor)
        };
        let created = match self.client.create_page(&placeholder) {
            Ok(created) => created,
            Err(e) => {
                let reason = page_local(e)?;
                error!("Unable to create \"{}\": {}", page.title, reason);
                return Ok(PageOutcome::Failed { id: None, reason });
            }
        };
        info!("Created page \"{}\" (id {})", page.title, created.id);

        Ok(match self.publish(page, &created.id, created.version.number, ancestor)? {
            Ok(published) => PageOutcome::Created {
                id: created.id,
                url: published.url,
            },
            Err(reason) => PageOutcome::Failed {
                id: Some(created.id),
                reason,
            },
        })
    }

    /// Whether the stored body equals the rendered one.
    ///
    /// A failed lookup counts as changed.
    fn is_unchanged(&self, page: &PageModel, page_id: &str) -> Result<bool, SyncError> {
        match self.client.page_content(page_id) {
            Ok(content) => Ok(content == page.markup),
            Err(e) => {
                let reason = page_local(e)?;
                warn!("Unable to fetch content of page {}: {}", page_id, reason);
                Ok(false)
            }
        }
    }

    /// Upload attachments, replace the body and apply labels.
    ///
    /// The inner result carries the page-local failure reason.
    fn publish(
        &self,
        page: &PageModel,
        page_id: &str,
        version: u32,
        ancestor: Option<&str>,
    ) -> Result<Result<PublishedPage, String>, SyncError> {
        self.sync_attachments(page, page_id)?;

        match self.client.update_page(page_id, &page.draft(ancestor), version) {
            Ok(published) => {
                info!(
                    "Page \"{}\" (id {}) published at {}",
                    page.title, page_id, published.url
                );
                self.apply_labels(page, page_id)?;
                Ok(Ok(published))
            }
            Err(e) => {
                let reason = page_local(e)?;
                error!(
                    "Page \"{}\" (id {}) failed to update: {}",
                    page.title, page_id, reason
                );
                Ok(Err(reason))
            }
        }
    }

    fn apply_labels(&self, page: &PageModel, page_id: &str) -> Result<(), SyncError> {
        if page.labels.is_empty() {
            return Ok(());
        }

        match self.client.apply_labels(page_id, &page.labels) {
            Ok(applied) if applied.is_empty() => {
                warn!("Page {} has no labels after labelling", page_id);
            }
            Ok(_) => {}
            Err(e) => {
                let reason = page_local(e)?;
                warn!("Unable to label page {}: {}", page_id, reason);
            }
        }
        Ok(())
    }
}
