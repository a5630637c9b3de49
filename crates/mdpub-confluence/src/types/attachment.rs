//! Confluence attachment and label types.

use serde::{Deserialize, Serialize};

use super::Version;

/// Confluence attachment.
///
/// Only includes fields that are actually used.
/// Serde ignores unknown fields from the API response.
#[derive(Debug, Clone, Deserialize)]
pub struct Attachment {
    /// Attachment ID.
    pub id: String,
    /// Attachment title/filename.
    pub title: String,
    /// Present when requested with `expand=version`.
    #[serde(default)]
    pub version: Option<Version>,
}

impl Attachment {
    /// Content hash recorded as the version comment at upload.
    #[must_use]
    pub fn hash_marker(&self) -> Option<&str> {
        self.version.as_ref()?.message.as_deref()
    }
}

/// Attachments API response.
#[derive(Debug, Clone, Deserialize)]
pub struct AttachmentsResponse {
    /// List of attachments.
    pub results: Vec<Attachment>,
}

/// Page label.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Label {
    pub prefix: String,
    pub name: String,
}

impl Label {
    /// Label in the `global` namespace.
    #[must_use]
    pub fn global(name: impl Into<String>) -> Self {
        Self {
            prefix: "global".to_owned(),
            name: name.into(),
        }
    }
}

/// Labels API response.
#[derive(Debug, Clone, Deserialize)]
pub struct LabelsResponse {
    #[serde(default)]
    pub results: Vec<Label>,
}

/// User lookup response.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    #[serde(rename = "userKey", default)]
    pub user_key: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attachment_hash_marker() {
        let json = r#"{"id":"att1","title":"a.png","version":{"number":2,"message":"abc123"}}"#;
        let attachment: Attachment = serde_json::from_str(json).unwrap();
        assert_eq!(attachment.hash_marker(), Some("abc123"));

        let json = r#"{"id":"att2","title":"b.png"}"#;
        let attachment: Attachment = serde_json::from_str(json).unwrap();
        assert_eq!(attachment.hash_marker(), None);
    }

    #[test]
    fn test_label_serialization() {
        let json = serde_json::to_string(&[Label::global("docs")]).unwrap();
        assert_eq!(json, r#"[{"prefix":"global","name":"docs"}]"#);
    }
}
