//! Page operations for Confluence API.

use serde_json::{Value, json};
use tracing::{debug, info};

use super::{ConfluenceClient, check_status};
use crate::error::ConfluenceError;
use crate::types::{Page, PageDraft, PublishedPage, SearchResponse};

impl ConfluenceClient {
    /// Find a page by exact title using CQL search.
    pub(crate) fn search_page(
        &self,
        title: &str,
        space: &str,
        ancestor_id: Option<&str>,
    ) -> Result<Option<Page>, ConfluenceError> {
        let url = format!("{}/content/search", self.api_url());
        let cql = cql_query(title, space, ancestor_id);

        debug!("Searching pages: {}", cql);

        let response = self
            .authorize(self.agent.get(&url))
            .query("cql", &cql)
            .query("expand", "version")
            .call()?;

        let search: SearchResponse = check_status(response)?.read_json()?;
        select_page(title, search.results)
    }

    /// Get the storage format body of a page.
    pub(crate) fn get_page_body(&self, page_id: &str) -> Result<String, ConfluenceError> {
        let url = format!("{}/content/{}", self.api_url(), page_id);

        debug!("Getting content of page {}", page_id);

        let response = self
            .authorize(self.agent.get(&url))
            .query("expand", "body.storage")
            .call()?;

        let page: Page = check_status(response)?.read_json()?;
        page.body
            .and_then(|body| body.storage)
            .map(|storage| storage.value)
            .ok_or_else(|| {
                ConfluenceError::MalformedResponse(format!("page {page_id} has no storage body"))
            })
    }

    /// Create a new page.
    pub(crate) fn post_page(&self, draft: &PageDraft<'_>) -> Result<Page, ConfluenceError> {
        let url = format!("{}/content/", self.api_url());
        let payload = page_payload(draft);

        let payload_bytes = serde_json::to_vec(&payload)?;

        let response = self
            .authorize(self.agent.post(&url))
            .header("Content-Type", "application/json")
            .send(&payload_bytes[..])?;

        let page: Page = check_status(response)?.read_json()?;
        info!(
            "Page \"{}\" (id {}) created in space {}",
            page.title, page.id, draft.space
        );
        Ok(page)
    }

    /// Replace page content (auto-increments version).
    pub(crate) fn put_page(
        &self,
        page_id: &str,
        draft: &PageDraft<'_>,
        version: u32,
    ) -> Result<PublishedPage, ConfluenceError> {
        let url = format!("{}/content/{}", self.api_url(), page_id);

        let mut payload = page_payload(draft);
        payload["version"] = json!({
            "number": version + 1,
            "minorEdit": self.minor_edit
        });

        info!(
            "Updating page {} from version {} to {}",
            page_id,
            version,
            version + 1
        );

        let payload_bytes = serde_json::to_vec(&payload)?;

        let response = self
            .authorize(self.agent.put(&url))
            .header("Content-Type", "application/json")
            .send(&payload_bytes[..])?;

        let page: Page = check_status(response)?.read_json()?;
        let Some(webui) = page.links.and_then(|links| links.webui) else {
            return Err(ConfluenceError::MalformedResponse(format!(
                "update of page {page_id} returned no web link"
            )));
        };

        Ok(PublishedPage {
            id: page.id,
            version: page.version.number,
            url: format!("{}{}", self.base_url, webui),
        })
    }
}

/// Build the CQL query matching a page title within a space and,
/// optionally, below an ancestor.
fn cql_query(title: &str, space: &str, ancestor_id: Option<&str>) -> String {
    let title = title.replace('\\', "\\\\").replace('"', "\\\"");
    let mut clauses = vec![format!("title=\"{title}\"")];
    if let Some(ancestor) = ancestor_id {
        clauses.push(format!("ancestor={ancestor}"));
    }
    clauses.push(format!("space='{space}'"));
    clauses.join(" and ")
}

/// Keep exact-title page matches; CQL title search is not exact.
fn select_page(title: &str, results: Vec<Page>) -> Result<Option<Page>, ConfluenceError> {
    let mut matches: Vec<Page> = results
        .into_iter()
        .filter(|page| page.content_type == "page" && page.title == title)
        .collect();

    match matches.len() {
        0 => Ok(None),
        1 => Ok(matches.pop()),
        count => Err(ConfluenceError::AmbiguousPage {
            title: title.to_owned(),
            count,
        }),
    }
}

fn page_payload(draft: &PageDraft<'_>) -> Value {
    let mut payload = json!({
        "type": "page",
        "title": draft.title,
        "space": {"key": draft.space},
        "body": {
            "storage": {
                "value": draft.content,
                "representation": "storage"
            }
        }
    });
    if let Some(ancestor) = draft.ancestor_id {
        payload["ancestors"] = json!([{"id": ancestor}]);
    }
    payload
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::types::Version;

    fn page(id: &str, content_type: &str, title: &str) -> Page {
        Page {
            id: id.to_owned(),
            content_type: content_type.to_owned(),
            title: title.to_owned(),
            version: Version::default(),
            body: None,
            links: None,
        }
    }

    #[test]
    fn test_cql_query() {
        assert_eq!(
            cql_query("Setup Guide", "ENG", None),
            r#"title="Setup Guide" and space='ENG'"#
        );
        assert_eq!(
            cql_query("Setup Guide", "ENG", Some("123")),
            r#"title="Setup Guide" and ancestor=123 and space='ENG'"#
        );
    }

    #[test]
    fn test_cql_query_escapes_quotes() {
        assert_eq!(
            cql_query(r#"The "Best" Page"#, "ENG", None),
            r#"title="The \"Best\" Page" and space='ENG'"#
        );
    }

    #[test]
    fn test_select_page_exact_title() {
        let results = vec![
            page("1", "page", "Setup Guide (old)"),
            page("2", "blogpost", "Setup Guide"),
            page("3", "page", "Setup Guide"),
        ];
        let found = select_page("Setup Guide", results).unwrap().unwrap();
        assert_eq!(found.id, "3");
    }

    #[test]
    fn test_select_page_none() {
        assert!(select_page("Missing", vec![]).unwrap().is_none());
    }

    #[test]
    fn test_select_page_ambiguous() {
        let results = vec![page("1", "page", "Dup"), page("2", "page", "Dup")];
        let err = select_page("Dup", results).unwrap_err();
        assert!(matches!(err, ConfluenceError::AmbiguousPage { count: 2, .. }));
    }

    #[test]
    fn test_page_payload() {
        let draft = PageDraft {
            title: "Child",
            space: "ENG",
            ancestor_id: Some("42"),
            content: "<p>x</p>",
        };
        let payload = page_payload(&draft);
        assert_eq!(payload["type"], "page");
        assert_eq!(payload["space"]["key"], "ENG");
        assert_eq!(payload["body"]["storage"]["value"], "<p>x</p>");
        assert_eq!(payload["ancestors"][0]["id"], "42");

        let root = PageDraft {
            ancestor_id: None,
            ..draft
        };
        assert!(page_payload(&root).get("ancestors").is_none());
    }
}
