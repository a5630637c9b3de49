//! Attachment operations for Confluence API.

use std::fs;
use std::path::Path;

use rand::RngExt;
use tracing::{debug, info};

use super::{ConfluenceClient, check_status};
use crate::error::ConfluenceError;
use crate::types::{Attachment, AttachmentsResponse};

impl ConfluenceClient {
    /// List attachments with a given filename, including version comments.
    pub(crate) fn get_attachments(
        &self,
        page_id: &str,
        filename: &str,
    ) -> Result<Vec<Attachment>, ConfluenceError> {
        let url = format!("{}/content/{}/child/attachment", self.api_url(), page_id);

        debug!("Getting attachments '{}' for page {}", filename, page_id);

        let response = self
            .authorize(self.agent.get(&url))
            .query("filename", filename)
            .query("expand", "version")
            .call()?;

        let attachments: AttachmentsResponse = check_status(response)?.read_json()?;
        Ok(attachments.results)
    }

    /// Upload a file as an attachment.
    ///
    /// Duplicates are allowed, so re-uploading a filename adds a new
    /// version rather than failing.
    pub(crate) fn post_attachment(
        &self,
        page_id: &str,
        path: &Path,
        hash: &str,
    ) -> Result<(), ConfluenceError> {
        let url = format!("{}/content/{}/child/attachment", self.api_url(), page_id);
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let data = fs::read(path)?;

        info!("Uploading attachment '{}' to page {}", filename, page_id);

        let boundary = format!("----MdpubFormBoundary{:016x}", rand::rng().random::<u64>());
        let minor_edit = if self.minor_edit { "true" } else { "false" };
        let body = multipart_body(
            &boundary,
            &filename,
            &data,
            &[("comment", hash), ("minorEdit", minor_edit)],
        );

        let response = self
            .authorize(self.agent.post(&url))
            .query("allowDuplicated", "true")
            .header(
                "Content-Type",
                &format!("multipart/form-data; boundary={boundary}"),
            )
            .header("X-Atlassian-Token", "nocheck")
            .send(&body[..])?;

        check_status(response)?;
        Ok(())
    }
}

/// Build a multipart form body with one file part followed by text fields.
fn multipart_body(boundary: &str, filename: &str, data: &[u8], fields: &[(&str, &str)]) -> Vec<u8> {
    let mut body = Vec::with_capacity(data.len() + 512);

    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(b"\r\n");

    for (name, value) in fields {
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }

    // End boundary
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    body
}
