//! Confluence page types.

use serde::{Deserialize, Serialize};

/// Confluence page.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Page {
    /// Page ID.
    pub id: String,
    /// Content type (always "page" for results we keep).
    #[serde(rename = "type")]
    pub content_type: String,
    /// Page title.
    pub title: String,
    /// Version information.
    pub version: Version,
    /// Page body content.
    #[serde(default)]
    pub body: Option<Body>,
    /// Hypermedia links.
    #[serde(rename = "_links", default)]
    pub links: Option<Links>,
}

/// Content version.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Version {
    /// Version number.
    pub number: u32,
    /// Version message/comment.
    #[serde(default)]
    pub message: Option<String>,
}

/// Page body content.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Body {
    /// Storage format content.
    #[serde(default)]
    pub storage: Option<Storage>,
}

/// Storage format representation.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Storage {
    /// HTML content in Confluence storage format.
    pub value: String,
    /// Content representation (always "storage").
    pub representation: String,
}

/// Hypermedia links.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Links {
    /// Web UI link, relative to the server base URL.
    #[serde(default)]
    pub webui: Option<String>,
}

/// Content search API response.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<Page>,
}

/// Page content and placement to publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageDraft<'a> {
    pub title: &'a str,
    pub space: &'a str,
    /// Parent page ID; `None` places the page at the space root.
    pub ancestor_id: Option<&'a str>,
    /// Storage format body.
    pub content: &'a str,
}

/// Result of a successful content update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedPage {
    pub id: String,
    /// Version number after the update.
    pub version: u32,
    /// Browser URL of the page.
    pub url: String,
}
