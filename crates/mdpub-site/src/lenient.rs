//! Forgiving decoders for recognised front matter keys.
//!
//! Front matter is shared with other tools, so a recognised key holding an
//! unexpected type is read as absent (with a warning) instead of failing
//! the document. Scalars are accepted wherever text is expected, and a
//! single value wherever a list is.

use serde::{Deserialize, Deserializer};
use serde_yaml::Value;
use tracing::warn;

use crate::frontmatter::WikiMeta;

/// Text form of a scalar. Sequences and mappings have none.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_text(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

fn ignored(value: &Value, expected: &str) {
    warn!("Ignoring front matter value {:?}: expected {}", value, expected);
}

/// Optional text; numbers and booleans are converted.
pub(crate) fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    let text = scalar_text(&value);
    if text.is_none() {
        ignored(&value, "text");
    }
    Ok(text)
}

/// A list of strings, or a single one.
pub(crate) fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match &value {
        Value::Null => Ok(Vec::new()),
        Value::Sequence(items) => Ok(items
            .iter()
            .filter_map(|item| {
                let text = scalar_text(item);
                if text.is_none() && !item.is_null() {
                    ignored(item, "text");
                }
                text
            })
            .collect()),
        other => match scalar_text(other) {
            Some(text) => Ok(vec![text]),
            None => {
                ignored(other, "a list");
                Ok(Vec::new())
            }
        },
    }
}

/// A boolean; anything else is `false`.
pub(crate) fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Bool(b) => Ok(b),
        Value::Null => Ok(false),
        other => {
            ignored(&other, "true or false");
            Ok(false)
        }
    }
}

/// The `wiki` mapping; anything else is empty settings.
pub(crate) fn wiki<'de, D>(deserializer: D) -> Result<WikiMeta, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(WikiMeta::default());
    }
    if !value.is_mapping() {
        ignored(&value, "a mapping");
        return Ok(WikiMeta::default());
    }
    Ok(serde_yaml::from_value(value).unwrap_or_else(|e| {
        warn!("Ignoring wiki settings: {}", e);
        WikiMeta::default()
    }))
}
