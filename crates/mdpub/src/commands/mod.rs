//! CLI command implementations.

pub(crate) mod check;
pub(crate) mod publish;

use std::path::PathBuf;

use clap::Args;
use mdpub_config::{CliSettings, Config};
use mdpub_confluence::SyncReport;
use mdpub_site::discover;
use tracing::{debug, info};

use crate::error::CliError;
use crate::output::Output;

pub(crate) use check::CheckArgs;
pub(crate) use publish::PublishArgs;

/// Document selection shared by all commands.
#[derive(Args)]
pub(crate) struct SourceArgs {
    /// Markdown files to process (default: every file in the content directory).
    files: Vec<PathBuf>,

    /// Content root to scan instead of the configured one.
    #[arg(short, long, conflicts_with = "files")]
    dir: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover mdpub.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl SourceArgs {
    /// Load configuration, with `--dir` overriding the content root.
    pub(crate) fn load_config(&self, mut settings: CliSettings) -> Result<Config, CliError> {
        settings.root.clone_from(&self.dir);
        let config = Config::load(self.config.as_deref(), Some(&settings))?;
        match &config.config_path {
            Some(path) => debug!("Loaded configuration from {}", path.display()),
            None => debug!("No mdpub.toml found; using defaults"),
        }
        Ok(config)
    }

    /// Files to process: the explicit list, or every file discovered below
    /// the content directory.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Validation` if an explicit file does not exist.
    pub(crate) fn paths(&self, config: &Config) -> Result<Vec<PathBuf>, CliError> {
        if self.files.is_empty() {
            let publish = &config.publish_resolved;
            let paths = discover(&publish.root, &publish.content_dir);
            info!(
                "Found {} file(s) in {}",
                paths.len(),
                publish.content_dir.display()
            );
            return Ok(paths);
        }

        if let Some(missing) = self.files.iter().find(|path| !path.is_file()) {
            return Err(CliError::Validation(format!(
                "{} does not exist",
                missing.display()
            )));
        }
        Ok(self.files.clone())
    }
}

/// Print skipped and failed pages.
pub(crate) fn print_issues(output: &Output, report: &SyncReport) {
    if !report.skipped.is_empty() {
        output.warning(&format!("\nSkipped pages ({}):", report.skipped.len()));
        for issue in &report.skipped {
            output.warning(&format!("  - {issue}"));
        }
    }

    if report.has_failures() {
        output.error(&format!("\nFailed pages ({}):", report.failed.len()));
        for issue in &report.failed {
            output.error(&format!("  - {issue}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn source(files: Vec<PathBuf>, dir: Option<PathBuf>) -> SourceArgs {
        SourceArgs {
            files,
            dir,
            config: None,
        }
    }

    #[test]
    fn test_explicit_files_must_exist() {
        let dir = TempDir::new().unwrap();
        let present = dir.path().join("a.md");
        fs::write(&present, "text").unwrap();
        let missing = dir.path().join("b.md");

        let config = Config::default();
        let args = source(vec![present.clone()], None);
        assert_eq!(args.paths(&config).unwrap(), vec![present.clone()]);

        let args = source(vec![present, missing], None);
        let err = args.paths(&config).unwrap_err();
        assert!(err.to_string().ends_with("b.md does not exist"));
    }

    #[test]
    fn test_dir_discovers_content() {
        let dir = TempDir::new().unwrap();
        let content = dir.path().join("content");
        fs::create_dir_all(content.join("guides")).unwrap();
        fs::write(content.join("guides/setup.md"), "text").unwrap();
        fs::write(content.join("index.md"), "text").unwrap();
        fs::write(dir.path().join("README.md"), "text").unwrap();

        let args = source(vec![], Some(dir.path().to_path_buf()));
        let config = args.load_config(CliSettings::default()).unwrap();

        assert_eq!(
            args.paths(&config).unwrap(),
            vec![content.join("guides/setup.md"), content.join("index.md")]
        );
    }

    #[test]
    fn test_explicit_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wiki.toml");
        fs::write(&path, "[publish]\ncontent_dir = \"posts\"\n").unwrap();

        let args = SourceArgs {
            files: vec![],
            dir: None,
            config: Some(path.clone()),
        };
        let config = args.load_config(CliSettings::default()).unwrap();

        assert_eq!(config.config_path, Some(path));
        assert_eq!(config.publish_resolved.content_dir, dir.path().join("posts"));
    }
}
