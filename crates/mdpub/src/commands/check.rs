//! `mdpub check` command implementation.

use std::process::ExitCode;

use clap::Args;
use mdpub_config::CliSettings;
use mdpub_confluence::SyncReport;
use mdpub_confluence::sync::{Forest, PagePlanner, SyncOptions, Visit, load_documents};

use super::{SourceArgs, print_issues};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Space for pages that don't declare one (overrides config).
    #[arg(long, env = "CONFLUENCE_SPACE")]
    space: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// Loads and renders every document like `publish` does and prints the
    /// resulting page tree. Authors are not resolved since that needs the
    /// wiki.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or an explicit
    /// file is missing.
    pub(crate) fn execute(self) -> Result<ExitCode, CliError> {
        let output = Output::new();

        let settings = CliSettings {
            space: self.space.clone(),
            ..Default::default()
        };
        let config = self.source.load_config(settings)?;
        let paths = self.source.paths(&config)?;

        let mut report = SyncReport::default();
        let options = SyncOptions::from_config(&config);
        let planner = PagePlanner::new(&options);
        let pages = load_documents(&paths, &mut report)
            .into_iter()
            .map(|p| planner.plan(&p.document, p.title, Vec::new()))
            .collect();

        let forest = Forest::build(pages);
        let walk = forest.walk();
        let deployable = walk
            .visits
            .iter()
            .filter(|visit| matches!(visit, Visit::Deploy { .. }))
            .count();

        output.highlight(&format!("{deployable} page(s) would be published:"));
        for visit in &walk.visits {
            match *visit {
                Visit::Deploy {
                    index,
                    parent,
                    depth,
                } => {
                    let page = forest.page(index);
                    let indent = "  ".repeat(depth);
                    output.info(&format!(
                        "{indent}{} [{}] ({})",
                        page.title,
                        page.space,
                        page.source.display()
                    ));
                    if let (None, Some(remote_parent)) = (parent, &page.parent_title) {
                        output.detail(&format!("{indent}  parent on wiki: {remote_parent}"));
                    }
                    for attachment in &page.attachments {
                        let missing = if attachment.is_file() { "" } else { " (missing)" };
                        output.detail(&format!(
                            "{indent}  + {}{missing}",
                            attachment.display()
                        ));
                    }
                }
                Visit::Duplicate { index, first } => {
                    let page = forest.page(index);
                    let first = forest.page(first);
                    report.skip(
                        &page.title,
                        page.source.clone(),
                        format!("duplicate title, already deployed from {}", first.source.display()),
                    );
                }
            }
        }
        for &index in &walk.cycles {
            let page = forest.page(index);
            report.skip(&page.title, page.source.clone(), "parent cycle");
        }

        if !report.ignored.is_empty() {
            output.detail(&format!("\nNot published ({}):", report.ignored.len()));
            for ignored in &report.ignored {
                output.detail(&format!(
                    "  - {}: {}",
                    ignored.source.display(),
                    ignored.reason
                ));
            }
        }
        print_issues(&output, &report);

        Ok(if report.has_failures() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        })
    }
}
