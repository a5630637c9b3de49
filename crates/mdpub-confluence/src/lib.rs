//! Confluence publishing for mdpub.
//!
//! This crate provides:
//! - [`WikiClient`]: the wiki operations publishing needs
//! - [`ConfluenceClient`]: REST API implementation with HTTP Basic auth
//! - [`DryRunClient`]: wrapper that logs writes instead of sending them
//! - [`Synchronizer`]: publishes markdown documents as a page hierarchy
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::PathBuf;
//! use mdpub_confluence::{ConfluenceClient, SyncOptions, Synchronizer};
//!
//! let client = ConfluenceClient::new("https://wiki.example.com", "bot", "secret");
//! let options = SyncOptions {
//!     space: "ENG".to_owned(),
//!     static_dir: PathBuf::from("static"),
//!     ..SyncOptions::default()
//! };
//! let report = Synchronizer::new(&client, options).run(&[PathBuf::from("content/guide.md")])?;
//! assert_eq!(report.failed.len(), 0);
//! # Ok(())
//! # }
//! ```

mod client;
mod dry_run;
mod error;
pub mod sync;
pub mod types;
mod wiki;

#[cfg(any(test, feature = "mock"))]
mod mock;

pub use client::ConfluenceClient;
pub use dry_run::{DRY_RUN_URL, DryRunClient};
pub use error::ConfluenceError;
pub use sync::{
    PageOutcome, PageReport, SyncError, SyncOptions, SyncReport, Synchronizer, load_documents,
};
pub use wiki::WikiClient;

#[cfg(any(test, feature = "mock"))]
pub use mock::{Call, MockWikiClient};
