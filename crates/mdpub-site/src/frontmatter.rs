//! YAML front matter.
//!
//! A document may open with a YAML block fenced by `---` lines:
//!
//! ```text
//! ---
//! title: Setup Guide
//! wiki:
//!   share: true
//!   parent: Handbook
//! tags: [onboarding]
//! ---
//! # Setup
//! ```

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_yaml::Value;

use crate::error::FrontMatterError;
use crate::lenient;

const BOUNDARY: &str = "---";

/// Publishing controls under the `wiki` key.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct WikiMeta {
    /// Only shared documents are published.
    #[serde(deserialize_with = "lenient::flag")]
    pub share: bool,
    /// Page title, overriding the top-level `title`.
    #[serde(deserialize_with = "lenient::text")]
    pub title: Option<String>,
    /// Title of the parent page.
    #[serde(deserialize_with = "lenient::text")]
    pub parent: Option<String>,
}

/// Parsed front matter.
///
/// Keys that are not recognised are kept in [`extra`](Self::extra). A
/// recognised key with a value of the wrong type is treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    #[serde(deserialize_with = "lenient::wiki")]
    pub wiki: WikiMeta,
    #[serde(deserialize_with = "lenient::text")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient::flag")]
    pub draft: bool,
    /// Usernames credited on the page; a single name is accepted.
    #[serde(deserialize_with = "lenient::one_or_many")]
    pub authors: Vec<String>,
    #[serde(deserialize_with = "lenient::one_or_many")]
    pub tags: Vec<String>,
    /// Target space, overriding the configured default.
    #[serde(deserialize_with = "lenient::text")]
    pub space: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl FrontMatter {
    /// Parse a YAML block. Empty input is empty metadata.
    ///
    /// Fails only for malformed YAML or YAML that is not a mapping.
    pub fn from_yaml(yaml: &str) -> Result<Self, FrontMatterError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let value: Value = serde_yaml::from_str(yaml)?;
        match value {
            Value::Null => Ok(Self::default()),
            Value::Mapping(_) => Ok(serde_yaml::from_value(value)?),
            Value::Bool(_) => Err(FrontMatterError::NotMapping("a boolean")),
            Value::Number(_) => Err(FrontMatterError::NotMapping("a number")),
            Value::String(_) => Err(FrontMatterError::NotMapping("a string")),
            Value::Sequence(_) => Err(FrontMatterError::NotMapping("a sequence")),
            Value::Tagged(_) => Err(FrontMatterError::NotMapping("a tagged value")),
        }
    }

    /// Effective page title: `wiki.title`, then `title`.
    #[must_use]
    pub fn effective_title(&self) -> Option<&str> {
        non_empty(self.wiki.title.as_deref()).or_else(|| non_empty(self.title.as_deref()))
    }

    /// Declared parent page title.
    #[must_use]
    pub fn parent(&self) -> Option<&str> {
        non_empty(self.wiki.parent.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

/// Split raw text into its YAML block and body.
///
/// Returns `None` for the YAML block when the text does not open with a
/// boundary line or the block is never closed; the body is then the whole
/// text. The body is trimmed.
#[must_use]
pub fn split(text: &str) -> (Option<&str>, &str) {
    let mut lines = text.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return (None, text.trim());
    };
    if first.trim() != BOUNDARY {
        return (None, text.trim());
    }

    let yaml_start = first.len();
    let mut offset = yaml_start;
    for line in lines {
        if line.trim() == BOUNDARY {
            let yaml = &text[yaml_start..offset];
            let body = &text[offset + line.len()..];
            return (Some(yaml), body.trim());
        }
        offset += line.len();
    }

    (None, text.trim())
}

/// Split and parse a document into front matter and body.
pub fn parse(text: &str) -> Result<(FrontMatter, &str), FrontMatterError> {
    match split(text) {
        (Some(yaml), body) => Ok((FrontMatter::from_yaml(yaml)?, body)),
        (None, body) => Ok((FrontMatter::default(), body)),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_split_with_front_matter() {
        let (yaml, body) = split("---\ntitle: A\n---\n\n# Body\n\n");
        assert_eq!(yaml, Some("title: A\n"));
        assert_eq!(body, "# Body");
    }

    #[test]
    fn test_split_without_front_matter() {
        let (yaml, body) = split("  # Just markdown\n");
        assert_eq!(yaml, None);
        assert_eq!(body, "# Just markdown");
    }

    #[test]
    fn test_split_unclosed_block_is_body() {
        let text = "---\ntitle: A\nno closing marker";
        let (yaml, body) = split(text);
        assert_eq!(yaml, None);
        assert_eq!(body, text);
    }

    #[test]
    fn test_split_later_rule_stays_in_body() {
        let (yaml, body) = split("---\ntitle: A\n---\nintro\n\n---\n\noutro");
        assert_eq!(yaml, Some("title: A\n"));
        assert_eq!(body, "intro\n\n---\n\noutro");
    }

    #[test]
    fn test_split_crlf() {
        let (yaml, body) = split("---\r\ntitle: A\r\n---\r\nbody\r\n");
        assert_eq!(yaml, Some("title: A\r\n"));
        assert_eq!(body, "body");
    }

    #[test]
    fn test_split_empty() {
        assert_eq!(split(""), (None, ""));
    }

    #[test]
    fn test_parse_full_schema() {
        let text = concat!(
            "---\n",
            "title: Fallback\n",
            "wiki:\n",
            "  share: true\n",
            "  title: Setup Guide\n",
            "  parent: Handbook\n",
            "draft: false\n",
            "authors: [jdoe, asmith]\n",
            "tags:\n",
            "  - Dev Ops!\n",
            "space: ENG\n",
            "date: 2024-01-01\n",
            "---\n",
            "Body"
        );
        let (fm, body) = parse(text).unwrap();
        assert_eq!(body, "Body");
        assert!(fm.wiki.share);
        assert_eq!(fm.effective_title(), Some("Setup Guide"));
        assert_eq!(fm.parent(), Some("Handbook"));
        assert_eq!(fm.authors, vec!["jdoe", "asmith"]);
        assert_eq!(fm.tags, vec!["Dev Ops!"]);
        assert_eq!(fm.space.as_deref(), Some("ENG"));
        assert!(fm.extra.contains_key("date"));
    }

    #[test]
    fn test_parse_defaults() {
        let (fm, body) = parse("---\nfoo: bar\n---\ntext").unwrap();
        assert_eq!(body, "text");
        assert!(!fm.wiki.share);
        assert!(!fm.draft);
        assert!(fm.tags.is_empty());
        assert_eq!(fm.effective_title(), None);
    }

    #[test]
    fn test_parse_empty_block() {
        let (fm, body) = parse("---\n---\ntext").unwrap();
        assert_eq!(fm, FrontMatter::default());
        assert_eq!(body, "text");
    }

    #[test]
    fn test_parse_no_block() {
        let (fm, body) = parse("# Title\n\ntext").unwrap();
        assert_eq!(fm, FrontMatter::default());
        assert_eq!(body, "# Title\n\ntext");
    }

    #[test]
    fn test_title_falls_back_to_top_level() {
        let (fm, _) = parse("---\ntitle: Top\nwiki:\n  share: true\n---\n").unwrap();
        assert_eq!(fm.effective_title(), Some("Top"));

        let (fm, _) = parse("---\ntitle: Top\nwiki:\n  title: ''\n---\n").unwrap();
        assert_eq!(fm.effective_title(), Some("Top"));
    }

    #[test]
    fn test_parse_invalid_yaml() {
        let err = parse("---\ntitle: [unclosed\n---\nbody").unwrap_err();
        assert!(matches!(err, FrontMatterError::Yaml(_)));
    }

    #[test]
    fn test_parse_not_a_mapping() {
        let err = parse("---\n- a\n- b\n---\nbody").unwrap_err();
        assert!(matches!(err, FrontMatterError::NotMapping("a sequence")));

        let err = parse("---\njust a string\n---\nbody").unwrap_err();
        assert!(matches!(err, FrontMatterError::NotMapping("a string")));
    }

    #[test]
    fn test_parse_single_values_for_lists() {
        let (fm, _) = parse("---\ntags: devops\nauthors: jdoe\n---\nbody").unwrap();
        assert_eq!(fm.tags, vec!["devops"]);
        assert_eq!(fm.authors, vec!["jdoe"]);

        let (fm, _) = parse("---\ntags: [ops, 42, [nested], ~]\n---\nbody").unwrap();
        assert_eq!(fm.tags, vec!["ops", "42"]);
    }

    #[test]
    fn test_parse_scalar_titles() {
        let (fm, _) =
            parse("---\ntitle: 2024\nwiki:\n  share: true\n  parent: 1.5\n---\n").unwrap();
        assert_eq!(fm.effective_title(), Some("2024"));
        assert_eq!(fm.parent(), Some("1.5"));

        let (fm, _) = parse("---\nwiki:\n  title: true\n---\n").unwrap();
        assert_eq!(fm.effective_title(), Some("true"));
    }

    #[test]
    fn test_parse_mistyped_keys_are_absent() {
        let (fm, body) = parse(concat!(
            "---\n",
            "draft: [1, 2]\n",
            "title: {nested: map}\n",
            "space: [ENG]\n",
            "tags: {a: b}\n",
            "---\n",
            "body"
        ))
        .unwrap();
        assert_eq!(body, "body");
        assert!(!fm.draft);
        assert_eq!(fm.title, None);
        assert_eq!(fm.space, None);
        assert!(fm.tags.is_empty());

        let (fm, _) = parse("---\nwiki: yes please\n---\n").unwrap();
        assert_eq!(fm.wiki, WikiMeta::default());

        let (fm, _) = parse("---\nwiki:\n  share: 'yes'\n  title: Guide\n---\n").unwrap();
        assert!(!fm.wiki.share);
        assert_eq!(fm.wiki.title.as_deref(), Some("Guide"));
    }
}
