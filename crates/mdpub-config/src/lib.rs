//! Configuration management for mdpub.
//!
//! Parses `mdpub.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `confluence.base_url`
//! - `confluence.username`
//! - `confluence.password`
//! - `confluence.space`
//! - `publish.global_label`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override Confluence base URL.
    pub base_url: Option<String>,
    /// Override default space key.
    pub space: Option<String>,
    /// Override username.
    pub username: Option<String>,
    /// Override password.
    pub password: Option<String>,
    /// Extra request headers, appended to the configured ones.
    pub headers: Vec<String>,
    /// Override the label applied to every page.
    pub global_label: Option<String>,
    /// Override the content root directory.
    pub root: Option<PathBuf>,
    /// Override the minor edit flag.
    pub minor_edit: Option<bool>,
    /// Override attachment change detection.
    pub optimize_attachments: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "mdpub.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Confluence connection configuration.
    pub confluence: ConfluenceConfig,
    /// Publishing configuration (paths are relative strings from TOML).
    publish: PublishConfigRaw,

    /// Resolved publishing configuration (set after loading).
    #[serde(skip)]
    pub publish_resolved: PublishConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Confluence connection configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ConfluenceConfig {
    /// Confluence server base URL (e.g. `https://wiki.example.com`).
    pub base_url: String,
    /// Service account username.
    pub username: String,
    /// Service account password or token.
    pub password: String,
    /// Default space key for pages that don't declare one.
    pub space: String,
    /// Extra HTTP headers in `Name: value` form.
    pub headers: Vec<String>,
    /// Whether updates are flagged as minor edits (suppresses notifications).
    pub minor_edit: bool,
}

impl Default for ConfluenceConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            username: String::new(),
            password: String::new(),
            space: String::new(),
            headers: Vec::new(),
            minor_edit: true,
        }
    }
}

impl ConfluenceConfig {
    /// Validate that all required fields are properly set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if a required field is empty or a
    /// field has an invalid format. The password may be empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.base_url, "confluence.base_url")?;
        require_http_url(&self.base_url, "confluence.base_url")?;
        require_non_empty(&self.space, "confluence.space")?;
        require_non_empty(&self.username, "confluence.username")?;
        for header in &self.headers {
            parse_header(header)?;
        }
        Ok(())
    }

    /// Parsed extra headers as `(name, value)` pairs.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` for a header with an empty name.
    pub fn parsed_headers(&self) -> Result<Vec<(String, String)>, ConfigError> {
        self.headers.iter().map(|h| parse_header(h)).collect()
    }
}

/// Split a `Name: value` header. A header without a colon gets an empty value.
fn parse_header(header: &str) -> Result<(String, String), ConfigError> {
    let (name, value) = header.split_once(':').unwrap_or((header, ""));
    let name = name.trim();
    if name.is_empty() {
        return Err(ConfigError::Validation(format!(
            "invalid header {header:?}: missing name"
        )));
    }
    Ok((name.to_owned(), value.trim_start().to_owned()))
}

/// Raw publish configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct PublishConfigRaw {
    root: Option<String>,
    content_dir: Option<String>,
    static_dir: Option<String>,
    global_label: Option<String>,
    slug_prefix: Option<String>,
    optimize_attachments: Option<bool>,
    render_authors: Option<bool>,
}

/// Resolved publishing configuration with absolute paths.
#[derive(Debug, Default)]
pub struct PublishConfig {
    /// Content repository root.
    pub root: PathBuf,
    /// Directory scanned for documents in directory mode.
    pub content_dir: PathBuf,
    /// Root that local attachment references are resolved against.
    pub static_dir: PathBuf,
    /// Label appended to every page's tags.
    pub global_label: Option<String>,
    /// Prefix for derived page slugs.
    pub slug_prefix: Option<String>,
    /// Skip uploading attachments whose content hash is unchanged.
    pub optimize_attachments: bool,
    /// Prepend an authors block to each page.
    pub render_authors: bool,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`confluence.password`").
        field: String,
        /// Error message (e.g., "${`CONFLUENCE_PASSWORD`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `mdpub.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Get validated Confluence configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if a required connection field is missing.
    pub fn require_confluence(&self) -> Result<&ConfluenceConfig, ConfigError> {
        self.confluence.validate()?;
        Ok(&self.confluence)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        let confluence = &mut self.confluence;
        if let Some(base_url) = &settings.base_url {
            confluence.base_url.clone_from(base_url);
        }
        if let Some(space) = &settings.space {
            confluence.space.clone_from(space);
        }
        if let Some(username) = &settings.username {
            confluence.username.clone_from(username);
        }
        if let Some(password) = &settings.password {
            confluence.password.clone_from(password);
        }
        confluence.headers.extend(settings.headers.iter().cloned());
        if let Some(minor_edit) = settings.minor_edit {
            confluence.minor_edit = minor_edit;
        }

        if let Some(label) = &settings.global_label {
            self.publish_resolved.global_label = non_empty(Some(label.clone()));
        }
        if let Some(optimize) = settings.optimize_attachments {
            self.publish_resolved.optimize_attachments = optimize;
        }
        if let Some(root) = &settings.root {
            self.resolve_publish_dirs(root.clone());
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        let mut config = Self {
            confluence: ConfluenceConfig::default(),
            publish: PublishConfigRaw::default(),
            publish_resolved: PublishConfig::default(),
            config_path: None,
        };
        config.resolve_paths(base);
        config
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        let confluence = &mut self.confluence;
        confluence.base_url = expand::expand_env(&confluence.base_url, "confluence.base_url")?;
        confluence.username = expand::expand_env(&confluence.username, "confluence.username")?;
        confluence.password = expand::expand_env(&confluence.password, "confluence.password")?;
        confluence.space = expand::expand_env(&confluence.space, "confluence.space")?;

        if let Some(ref label) = self.publish.global_label {
            self.publish.global_label = Some(expand::expand_env(label, "publish.global_label")?);
        }

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let raw = &self.publish;
        self.publish_resolved.global_label = non_empty(raw.global_label.clone());
        self.publish_resolved.slug_prefix = non_empty(raw.slug_prefix.clone());
        self.publish_resolved.optimize_attachments = raw.optimize_attachments.unwrap_or(true);
        self.publish_resolved.render_authors = raw.render_authors.unwrap_or(false);

        let root = raw
            .root
            .as_deref()
            .map_or_else(|| config_dir.to_path_buf(), |r| config_dir.join(r));
        self.resolve_publish_dirs(root);
    }

    /// Set the content root and re-derive the directories below it.
    fn resolve_publish_dirs(&mut self, root: PathBuf) {
        let raw = &self.publish;
        self.publish_resolved.content_dir =
            root.join(raw.content_dir.as_deref().unwrap_or("content"));
        self.publish_resolved.static_dir =
            root.join(raw.static_dir.as_deref().unwrap_or("static"));
        self.publish_resolved.root = root;
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
