//! Source documents and publish eligibility.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SiteError;
use crate::frontmatter::{self, FrontMatter};

/// File extensions that can be published.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["md"];

/// Whether a path has a publishable extension.
#[must_use]
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext))
}

/// A parsed markdown source file.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub path: PathBuf,
    pub front_matter: FrontMatter,
    /// Markdown body, trimmed.
    pub body: String,
}

/// Whether a document should be published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Eligibility {
    Eligible { title: String },
    Ineligible(Ineligible),
}

/// Why a document is not published.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ineligible {
    UnsupportedFormat,
    NotShared,
    Draft,
    /// Shared, but neither `wiki.title` nor `title` is set.
    MissingTitle,
}

impl Ineligible {
    /// Whether this exclusion is a problem the author must fix, rather
    /// than an intentional opt-out.
    #[must_use]
    pub fn is_failure(self) -> bool {
        matches!(self, Self::MissingTitle)
    }
}

impl fmt::Display for Ineligible {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::UnsupportedFormat => "not a supported format",
            Self::NotShared => "not set to be shared",
            Self::Draft => "marked as draft",
            Self::MissingTitle => "no title in front matter",
        };
        f.write_str(reason)
    }
}

impl Document {
    /// Read and parse a document.
    pub fn load(path: &Path) -> Result<Self, SiteError> {
        let text = fs::read_to_string(path).map_err(|source| SiteError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path.to_path_buf(), &text)
    }

    /// Parse document text read from `path`.
    pub fn parse(path: PathBuf, text: &str) -> Result<Self, SiteError> {
        match frontmatter::parse(text) {
            Ok((front_matter, body)) => Ok(Self {
                front_matter,
                body: body.to_owned(),
                path,
            }),
            Err(source) => Err(SiteError::FrontMatter { path, source }),
        }
    }

    /// Effective page title.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.front_matter.effective_title()
    }

    /// Declared parent page title.
    #[must_use]
    pub fn parent(&self) -> Option<&str> {
        self.front_matter.parent()
    }

    /// Decide whether this document is published.
    ///
    /// Checks run in order: format, sharing, draft, title.
    #[must_use]
    pub fn eligibility(&self) -> Eligibility {
        if !is_supported(&self.path) {
            return Eligibility::Ineligible(Ineligible::UnsupportedFormat);
        }
        if !self.front_matter.wiki.share {
            return Eligibility::Ineligible(Ineligible::NotShared);
        }
        if self.front_matter.draft {
            return Eligibility::Ineligible(Ineligible::Draft);
        }
        match self.title() {
            Some(title) => Eligibility::Eligible {
                title: title.to_owned(),
            },
            None => Eligibility::Ineligible(Ineligible::MissingTitle),
        }
    }
}

/// Derive a page slug from a file name.
///
/// The file stem with `-` replaced by `_`, since labels containing hyphens
/// can't be searched for. A non-empty `prefix` is joined with `_`.
#[must_use]
pub fn slug(path: &Path, prefix: Option<&str>) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().replace('-', "_"))
        .unwrap_or_default();
    match prefix.filter(|p| !p.is_empty()) {
        Some(prefix) => format!("{prefix}_{stem}"),
        None => stem,
    }
}
