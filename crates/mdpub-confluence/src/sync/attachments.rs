//! Attachment upload with change detection.
//!
//! Each upload records the SHA-256 of the file as the attachment's version
//! comment. On the next run a file is only uploaded again when its hash
//! differs from that comment.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::{info, warn};

use super::Synchronizer;
use super::error::{SyncError, page_local};
use super::page::PageModel;
use crate::wiki::WikiClient;

/// Hex-encoded SHA-256 of a file's contents.
pub fn file_hash(path: &Path) -> io::Result<String> {
    let data = fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&data);
    Ok(hex::encode(hasher.finalize()))
}

impl<C: WikiClient> Synchronizer<'_, C> {
    /// Upload the page's attachments that changed.
    ///
    /// Missing files and upload errors are logged and skipped; only
    /// authorization failures abort.
    pub(super) fn sync_attachments(&self, page: &PageModel, page_id: &str) -> Result<(), SyncError> {
        let mut done = HashSet::new();
        for path in &page.attachments {
            if !done.insert(path) {
                continue;
            }
            self.sync_attachment(path, page_id)?;
        }
        Ok(())
    }

    fn sync_attachment(&self, path: &Path, page_id: &str) -> Result<(), SyncError> {
        if !path.is_file() {
            warn!("Attachment {} does not exist", path.display());
            return Ok(());
        }

        let hash = match file_hash(path) {
            Ok(hash) => hash,
            Err(e) => {
                warn!("Unable to read attachment {}: {}", path.display(), e);
                return Ok(());
            }
        };

        if self.options.optimize_attachments && self.is_uploaded(path, page_id, &hash)? {
            info!(
                "Not uploading {} to page {}: no changes",
                path.display(),
                page_id
            );
            return Ok(());
        }

        match self.client.upload_attachment(page_id, path, &hash) {
            Ok(()) => info!("Uploaded {} to page {}", path.display(), page_id),
            Err(e) => {
                let reason = page_local(e)?;
                warn!("Failed to upload {}: {}", path.display(), reason);
            }
        }
        Ok(())
    }

    /// Whether exactly one attachment with this file name exists and
    /// carries the same hash.
    fn is_uploaded(&self, path: &Path, page_id: &str, hash: &str) -> Result<bool, SyncError> {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_default();

        match self.client.list_attachments(page_id, &filename) {
            Ok(existing) => Ok(matches!(
                existing.as_slice(),
                [only] if only.hash_marker() == Some(hash)
            )),
            Err(e) => {
                let reason = page_local(e)?;
                warn!("Unable to check existing attachment {}: {}", filename, reason);
                Ok(false)
            }
        }
    }
}
