//! `mdpub publish` command implementation.

use std::process::ExitCode;

use clap::Args;
use mdpub_config::CliSettings;
use mdpub_confluence::{
    ConfluenceClient, DryRunClient, PageOutcome, SyncOptions, SyncReport, Synchronizer,
};

use super::{SourceArgs, print_issues};
use crate::error::CliError;
use crate::output::Output;

/// Environment variables with this prefix add request headers.
const HEADER_ENV_PREFIX: &str = "CONFLUENCE_HEADER_";

/// Arguments for the publish command.
#[derive(Args)]
pub(crate) struct PublishArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Confluence server base URL (overrides config).
    #[arg(long, env = "CONFLUENCE_BASE_URL")]
    base_url: Option<String>,

    /// Space for pages that don't declare one (overrides config).
    #[arg(long, env = "CONFLUENCE_SPACE")]
    space: Option<String>,

    /// Username for authentication (overrides config).
    #[arg(long, env = "CONFLUENCE_USERNAME")]
    username: Option<String>,

    /// Password or token for authentication (overrides config).
    #[arg(long, env = "CONFLUENCE_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Label applied to every page (overrides config).
    #[arg(long, env = "CONFLUENCE_GLOBAL_LABEL")]
    global_label: Option<String>,

    /// Extra request header as `Name: value`. May be repeated; also read
    /// from `CONFLUENCE_HEADER_<NAME>` variables.
    #[arg(long = "header", value_name = "HEADER")]
    headers: Vec<String>,

    /// Log the changes that would be made without making them.
    #[arg(long)]
    dry_run: bool,

    /// Update pages even when their content is unchanged.
    #[arg(long)]
    force: bool,

    /// Notify page watchers about every update.
    #[arg(long)]
    no_minor_edit: bool,

    /// Upload every attachment, even when unchanged.
    #[arg(long)]
    no_optimize_attachments: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl PublishArgs {
    /// Execute the publish command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid or Confluence rejects
    /// the credentials. Page failures are reported and turn into a
    /// failing exit code.
    pub(crate) fn execute(self) -> Result<ExitCode, CliError> {
        let output = Output::new();

        let mut headers = env_headers(std::env::vars());
        headers.extend(self.headers.iter().cloned());
        let settings = CliSettings {
            base_url: self.base_url.clone(),
            space: self.space.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            headers,
            global_label: self.global_label.clone(),
            root: None,
            minor_edit: self.no_minor_edit.then_some(false),
            optimize_attachments: self.no_optimize_attachments.then_some(false),
        };
        let config = self.source.load_config(settings)?;
        let confluence = config.require_confluence()?;

        let paths = self.source.paths(&config)?;
        if paths.is_empty() {
            output.warning("No documents found to publish.");
            return Ok(ExitCode::SUCCESS);
        }

        let client = ConfluenceClient::new(
            &confluence.base_url,
            &confluence.username,
            &confluence.password,
        )
        .with_headers(confluence.parsed_headers()?)
        .with_minor_edit(confluence.minor_edit);
        let options = SyncOptions::from_config(&config).with_force(self.force);

        output.info(&format!(
            "Publishing {} file(s) to {} (space {})...",
            paths.len(),
            confluence.base_url,
            confluence.space
        ));

        let report = if self.dry_run {
            output.highlight("[DRY RUN] No changes will be made.");
            let client = DryRunClient::new(client);
            Synchronizer::new(&client, options).run(&paths)?
        } else {
            Synchronizer::new(&client, options).run(&paths)?
        };

        print_report(&output, &report);

        Ok(if report.has_failures() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        })
    }
}

/// Headers from `CONFLUENCE_HEADER_<NAME>=value` variables, as `NAME: value`.
fn env_headers(vars: impl IntoIterator<Item = (String, String)>) -> Vec<String> {
    let mut headers: Vec<String> = vars
        .into_iter()
        .filter_map(|(key, value)| {
            let name = key.strip_prefix(HEADER_ENV_PREFIX)?;
            (!name.is_empty()).then(|| format!("{name}: {value}"))
        })
        .collect();
    headers.sort();
    headers
}

fn print_report(output: &Output, report: &SyncReport) {
    output.separator();
    for page in &report.pages {
        match &page.outcome {
            PageOutcome::Created { url, .. } => {
                output.success(&format!("Created   \"{}\"", page.title));
                output.detail(&format!("          {url}"));
            }
            PageOutcome::Updated { url, .. } => {
                output.success(&format!("Updated   \"{}\"", page.title));
                output.detail(&format!("          {url}"));
            }
            PageOutcome::Unchanged { .. } => {
                output.info(&format!("Unchanged \"{}\"", page.title));
            }
            PageOutcome::ParentUnresolved { .. } | PageOutcome::Failed { .. } => {}
        }
    }

    output.info(&format!("\n{}", summary(report)));
    if !report.ignored.is_empty() {
        output.detail(&format!(
            "{} document(s) not meant for publishing (drafts, unshared or unsupported)",
            report.ignored.len()
        ));
    }
    print_issues(output, report);
}

fn summary(report: &SyncReport) -> String {
    format!(
        "{} created, {} updated, {} unchanged, {} skipped, {} failed",
        report.created(),
        report.updated(),
        report.unchanged(),
        report.skipped.len(),
        report.failed.len()
    )
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;

    use super::*;

    fn var(key: &str, value: &str) -> (String, String) {
        (key.to_owned(), value.to_owned())
    }

    #[test]
    fn test_env_headers() {
        let headers = env_headers(vec![
            var("CONFLUENCE_HEADER_X-Team", "docs"),
            var("CONFLUENCE_HEADER_", "ignored"),
            var("CONFLUENCE_SPACE", "ENG"),
            var("CONFLUENCE_HEADER_Authorization-Proxy", "token"),
        ]);
        assert_eq!(
            headers,
            vec!["Authorization-Proxy: token", "X-Team: docs"]
        );
    }

    #[test]
    fn test_summary() {
        let mut report = SyncReport::default();
        report.record(
            "A",
            PathBuf::from("a.md"),
            PageOutcome::Unchanged { id: "1".to_owned() },
        );
        report.record(
            "B",
            PathBuf::from("b.md"),
            PageOutcome::Failed {
                id: None,
                reason: "boom".to_owned(),
            },
        );
        report.skip("C", PathBuf::from("c.md"), "parent cycle");

        assert_eq!(
            summary(&report),
            "0 created, 0 updated, 1 unchanged, 1 skipped, 1 failed"
        );
    }
}
