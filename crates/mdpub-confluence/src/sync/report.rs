//! Outcome of a sync run.

use std::fmt;
use std::path::PathBuf;

/// What happened to one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    Created { id: String, url: String },
    Updated { id: String, url: String },
    /// Remote content already matches.
    Unchanged { id: String },
    /// The declared parent page was not found.
    ParentUnresolved { parent: String },
    /// Publishing failed. `id` is set when the page exists remotely.
    Failed { id: Option<String>, reason: String },
}

impl PageOutcome {
    /// Remote page ID to pass to children.
    #[must_use]
    pub fn remote_id(&self) -> Option<&str> {
        match self {
            Self::Created { id, .. } | Self::Updated { id, .. } | Self::Unchanged { id } => {
                Some(id)
            }
            Self::Failed { id, .. } => id.as_deref(),
            Self::ParentUnresolved { .. } => None,
        }
    }

    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::ParentUnresolved { .. } | Self::Failed { .. })
    }

    fn failure_reason(&self) -> Option<String> {
        match self {
            Self::ParentUnresolved { parent } => Some(format!("parent page \"{parent}\" not found")),
            Self::Failed { reason, .. } => Some(reason.clone()),
            _ => None,
        }
    }
}

/// Outcome for a page that went through deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageReport {
    pub title: String,
    pub source: PathBuf,
    pub outcome: PageOutcome,
}

/// A page that failed or was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageIssue {
    /// Page title, when the document got far enough to have one.
    pub title: Option<String>,
    pub source: PathBuf,
    pub reason: String,
}

impl fmt::Display for PageIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.title {
            Some(title) => write!(
                f,
                "\"{title}\" at {}: {}",
                self.source.display(),
                self.reason
            ),
            None => write!(f, "{}: {}", self.source.display(), self.reason),
        }
    }
}

/// A document intentionally left out of publishing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoredDocument {
    pub source: PathBuf,
    pub reason: String,
}

/// Result of a sync run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Deployed pages in deploy order.
    pub pages: Vec<PageReport>,
    /// Pages that could not be published.
    pub failed: Vec<PageIssue>,
    /// Pages skipped due to conflicts (duplicate titles, parent cycles).
    pub skipped: Vec<PageIssue>,
    /// Documents not meant for publishing (drafts, unshared, other formats).
    pub ignored: Vec<IgnoredDocument>,
}

impl SyncReport {
    /// Record a deploy outcome. Failures are also added to [`failed`](Self::failed).
    pub fn record(&mut self, title: &str, source: PathBuf, outcome: PageOutcome) {
        if let Some(reason) = outcome.failure_reason() {
            self.failed.push(PageIssue {
                title: Some(title.to_owned()),
                source: source.clone(),
                reason,
            });
        }
        self.pages.push(PageReport {
            title: title.to_owned(),
            source,
            outcome,
        });
    }

    pub fn fail(&mut self, title: Option<&str>, source: PathBuf, reason: impl Into<String>) {
        self.failed.push(PageIssue {
            title: title.map(ToOwned::to_owned),
            source,
            reason: reason.into(),
        });
    }

    pub fn skip(&mut self, title: &str, source: PathBuf, reason: impl Into<String>) {
        self.skipped.push(PageIssue {
            title: Some(title.to_owned()),
            source,
            reason: reason.into(),
        });
    }

    pub fn ignore(&mut self, source: PathBuf, reason: impl Into<String>) {
        self.ignored.push(IgnoredDocument {
            source,
            reason: reason.into(),
        });
    }

    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    #[must_use]
    pub fn created(&self) -> usize {
        self.count(|o| matches!(o, PageOutcome::Created { .. }))
    }

    #[must_use]
    pub fn updated(&self) -> usize {
        self.count(|o| matches!(o, PageOutcome::Updated { .. }))
    }

    #[must_use]
    pub fn unchanged(&self) -> usize {
        self.count(|o| matches!(o, PageOutcome::Unchanged { .. }))
    }

    fn count(&self, predicate: impl Fn(&PageOutcome) -> bool) -> usize {
        self.pages.iter().filter(|p| predicate(&p.outcome)).count()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_issue_display() {
        let issue = PageIssue {
            title: Some("Setup Guide".to_owned()),
            source: PathBuf::from("content/setup.md"),
            reason: "duplicate title".to_owned(),
        };
        assert_eq!(
            issue.to_string(),
            "\"Setup Guide\" at content/setup.md: duplicate title"
        );

        let issue = PageIssue {
            title: None,
            source: PathBuf::from("content/bad.md"),
            reason: "invalid front matter".to_owned(),
        };
        assert_eq!(issue.to_string(), "content/bad.md: invalid front matter");
    }

    #[test]
    fn test_record_failures_also_listed_as_failed() {
        let mut report = SyncReport::default();
        report.record(
            "A",
            PathBuf::from("a.md"),
            PageOutcome::Created {
                id: "1".to_owned(),
                url: "u".to_owned(),
            },
        );
        report.record(
            "B",
            PathBuf::from("b.md"),
            PageOutcome::ParentUnresolved {
                parent: "Missing".to_owned(),
            },
        );

        assert_eq!(report.pages.len(), 2);
        assert_eq!(report.created(), 1);
        assert!(report.has_failures());
        assert_eq!(
            report.failed[0].to_string(),
            "\"B\" at b.md: parent page \"Missing\" not found"
        );
    }

    #[test]
    fn test_remote_id() {
        let failed = PageOutcome::Failed {
            id: Some("7".to_owned()),
            reason: "x".to_owned(),
        };
        assert_eq!(failed.remote_id(), Some("7"));
        assert!(failed.is_failure());

        let unchanged = PageOutcome::Unchanged { id: "8".to_owned() };
        assert_eq!(unchanged.remote_id(), Some("8"));
        assert!(!unchanged.is_failure());

        let orphan = PageOutcome::ParentUnresolved {
            parent: "P".to_owned(),
        };
        assert_eq!(orphan.remote_id(), None);
    }
}
