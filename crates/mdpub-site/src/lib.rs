//! Markdown source documents for mdpub.
//!
//! Loads markdown files, splits off their YAML front matter and decides
//! which of them are published:
//!
//! - [`frontmatter`]: `---` fenced YAML block and its schema
//! - [`Document`]: a parsed file and its [`Eligibility`]
//! - [`slug`] and [`sanitize_tag`]: page slug and label normalization
//! - [`discover`]: walks a content directory for source files

mod discover;
mod document;
mod error;
pub mod frontmatter;
mod lenient;
mod tags;

pub use discover::discover;
pub use document::{
    Document, Eligibility, Ineligible, SUPPORTED_EXTENSIONS, is_supported, slug,
};
pub use error::{FrontMatterError, SiteError};
pub use frontmatter::{FrontMatter, WikiMeta};
pub use tags::{sanitize_tag, sanitize_tags};
