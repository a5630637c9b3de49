//! Label normalization.

use std::sync::LazyLock;

use regex::Regex;

static DISALLOWED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9 -]+").unwrap());

/// Normalize a tag into a label.
///
/// Characters other than ASCII letters, digits, spaces and hyphens are
/// removed, then spaces become hyphens since labels can't contain spaces.
#[must_use]
pub fn sanitize_tag(tag: &str) -> String {
    DISALLOWED.replace_all(tag, "").replace(' ', "-")
}

/// Sanitize tags, dropping any that end up empty.
pub fn sanitize_tags<'a, I>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a String>,
{
    tags.into_iter()
        .map(|tag| sanitize_tag(tag))
        .filter(|tag| !tag.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_sanitize_tag() {
        assert_eq!(sanitize_tag("Dev Ops!"), "Dev-Ops");
        assert_eq!(sanitize_tag("already-fine"), "already-fine");
        assert_eq!(sanitize_tag("C++ & Rust"), "C--Rust");
        assert_eq!(sanitize_tag("café"), "caf");
    }

    #[test]
    fn test_sanitize_tags_drops_empty() {
        let tags = vec!["ok".to_owned(), "!!!".to_owned(), "two words".to_owned()];
        assert_eq!(sanitize_tags(&tags), vec!["ok", "two-words"]);
    }
}
