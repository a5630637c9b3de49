//! Label and user operations for Confluence API.

use tracing::{debug, info};

use super::{ConfluenceClient, check_status};
use crate::error::ConfluenceError;
use crate::types::{Label, LabelsResponse, User};

impl ConfluenceClient {
    /// Add global labels to a page.
    pub(crate) fn post_labels(
        &self,
        page_id: &str,
        labels: &[String],
    ) -> Result<Vec<Label>, ConfluenceError> {
        let url = format!("{}/content/{}/label", self.api_url(), page_id);
        let payload: Vec<Label> = labels.iter().map(Label::global).collect();
        let payload_bytes = serde_json::to_vec(&payload)?;

        let response = self
            .authorize(self.agent.post(&url))
            .header("Content-Type", "application/json")
            .send(&payload_bytes[..])?;

        let applied: LabelsResponse = check_status(response)?.read_json()?;
        if !applied.results.is_empty() {
            let names: Vec<&str> = applied.results.iter().map(|l| l.name.as_str()).collect();
            info!("Labels on page {}: {}", page_id, names.join(", "));
        }
        Ok(applied.results)
    }

    /// Look up the user key for a username. Unknown users are `None`.
    pub(crate) fn get_user_key(&self, username: &str) -> Result<Option<String>, ConfluenceError> {
        let url = format!("{}/user", self.api_url());

        debug!("Looking up user key for {}", username);

        let response = self
            .authorize(self.agent.get(&url))
            .query("username", username)
            .call()?;

        match check_status(response) {
            Ok(mut body) => {
                let user: User = body.read_json()?;
                Ok(user.user_key.filter(|key| !key.is_empty()))
            }
            Err(ConfluenceError::HttpResponse { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
