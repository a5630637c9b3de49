//! `${VAR}` expansion for configuration strings.

use crate::ConfigError;

/// Expand environment variable references in a config value.
///
/// Supports `${VAR}` (error if unset) and `${VAR:-default}`. Values without
/// a `${` sequence are returned unchanged, so bare `$` characters in
/// passwords survive.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, UnsetVar> {
        std::env::var(var).map(Some).map_err(|_| UnsetVar {
            name: var.to_owned(),
        })
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause.name),
    })
}

/// Lookup failure carrying the variable name.
struct UnsetVar {
    name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_set_var() {
        // SAFETY: the variable name is unique to this test
        unsafe {
            std::env::set_var("MDPUB_TEST_SPACE", "DOCS");
        }
        let result = expand_env("${MDPUB_TEST_SPACE}", "confluence.space").unwrap();
        assert_eq!(result, "DOCS");
        unsafe {
            std::env::remove_var("MDPUB_TEST_SPACE");
        }
    }

    #[test]
    fn test_expand_default_when_unset() {
        // SAFETY: the variable name is unique to this test
        unsafe {
            std::env::remove_var("MDPUB_TEST_UNSET");
        }
        let result = expand_env("${MDPUB_TEST_UNSET:-fallback}", "publish.global_label").unwrap();
        assert_eq!(result, "fallback");
    }

    #[test]
    fn test_expand_missing_var_names_field() {
        // SAFETY: the variable name is unique to this test
        unsafe {
            std::env::remove_var("MDPUB_TEST_MISSING");
        }
        let err = expand_env("${MDPUB_TEST_MISSING}", "confluence.password").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("MDPUB_TEST_MISSING"));
        assert!(err.to_string().contains("confluence.password"));
    }

    #[test]
    fn test_embedded_var_in_url() {
        // SAFETY: the variable name is unique to this test
        unsafe {
            std::env::set_var("MDPUB_TEST_HOST", "wiki.example.com");
        }
        let result = expand_env("https://${MDPUB_TEST_HOST}/", "confluence.base_url").unwrap();
        assert_eq!(result, "https://wiki.example.com/");
        unsafe {
            std::env::remove_var("MDPUB_TEST_HOST");
        }
    }

    #[test]
    fn test_bare_dollar_left_alone() {
        let result = expand_env("pa$$word", "confluence.password").unwrap();
        assert_eq!(result, "pa$$word");
    }
}
