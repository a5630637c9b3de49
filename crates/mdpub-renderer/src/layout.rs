//! Page layout around the rendered body.
//!
//! Pages with headings get three columns:
//!
//! ```text
//! -------------------------------------------
//! |             |  |                        |
//! | Sidebar     |  |       Content          |
//! | (25% width) |  |    (73% width)         |
//! |             |  |                        |
//! -------------------------------------------
//! ```
//!
//! The sidebar holds a table of contents; the 2% spacer column is empty.
//! Pages without headings get one full-width column.

use std::fmt::Write;

use crate::state::escape_html;

const SIDEBAR_WIDTH: &str = "25%";
const SPACER_WIDTH: &str = "2%";
const CONTENT_WIDTH: &str = "73%";
const FULL_WIDTH: &str = "100%";

/// Sidebar content. The exclusion keeps the sidebar and author headings out of the TOC.
const TOC_SIDEBAR: &str = concat!(
    "<h1>Table of Contents</h1>",
    r#"<p><ac:structured-macro ac:name="toc" ac:schema-version="1">"#,
    r#"<ac:parameter ac:name="exclude">^(Authors|Table of Contents)$</ac:parameter>"#,
    "</ac:structured-macro></p>"
);

/// Wrap the rendered body in the page layout.
#[must_use]
pub fn page_layout(content: &str, has_headings: bool) -> String {
    let mut out = String::with_capacity(content.len() + 1024);
    if has_headings {
        column(SIDEBAR_WIDTH, TOC_SIDEBAR, &mut out);
        column(SPACER_WIDTH, "", &mut out);
        column(CONTENT_WIDTH, content, &mut out);
    } else {
        column(FULL_WIDTH, content, &mut out);
    }
    out
}

fn column(width: &str, content: &str, out: &mut String) {
    write!(
        out,
        concat!(
            r#"<ac:structured-macro ac:name="column" ac:schema-version="1">"#,
            r#"<ac:parameter ac:name="width">{}</ac:parameter>"#,
            "<ac:rich-text-body>{}</ac:rich-text-body>",
            "</ac:structured-macro>"
        ),
        width, content
    )
    .unwrap();
}

/// Render an "Authors" section crediting each user key.
///
/// Pages are published by a service account, so this is how readers see
/// who actually wrote them.
#[must_use]
pub fn render_authors(user_keys: &[String]) -> String {
    let entries: Vec<String> = user_keys
        .iter()
        .map(|key| {
            let key = escape_html(key);
            format!(
                concat!(
                    r#"<ac:structured-macro ac:name="profile-picture" ac:schema-version="1">"#,
                    r#"<ac:parameter ac:name="User"><ri:user ri:userkey="{key}" /></ac:parameter>"#,
                    "</ac:structured-macro>&nbsp;",
                    r#"<ac:link><ri:user ri:userkey="{key}" /></ac:link>"#
                ),
                key = key
            )
        })
        .collect();
    format!("<h1>Authors</h1><p>{}</p>", entries.join("<br />"))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn count(haystack: &str, needle: &str) -> usize {
        haystack.matches(needle).count()
    }

    #[test]
    fn test_layout_with_headings_has_three_columns() {
        let out = page_layout("<h1>Intro</h1>", true);
        assert_eq!(count(&out, r#"ac:name="column""#), 3);
        assert!(out.contains(r#"<ac:parameter ac:name="width">25%</ac:parameter>"#));
        assert!(out.contains(r#"<ac:parameter ac:name="width">2%</ac:parameter>"#));
        assert!(out.contains(r#"<ac:parameter ac:name="width">73%</ac:parameter>"#));
        assert!(out.contains(r#"ac:name="toc""#));
        assert!(out.contains("^(Authors|Table of Contents)$"));

        // Sidebar, spacer, then content
        let toc = out.find("Table of Contents").unwrap();
        let spacer = out.find("2%").unwrap();
        let body = out.find("<h1>Intro</h1>").unwrap();
        assert!(toc < spacer && spacer < body);
    }

    #[test]
    fn test_layout_without_headings_is_single_column() {
        let out = page_layout("<p>Just text</p>", false);
        assert_eq!(
            out,
            concat!(
                r#"<ac:structured-macro ac:name="column" ac:schema-version="1">"#,
                r#"<ac:parameter ac:name="width">100%</ac:parameter>"#,
                "<ac:rich-text-body><p>Just text</p></ac:rich-text-body>",
                "</ac:structured-macro>"
            )
        );
        assert!(!out.contains(r#"ac:name="toc""#));
    }

    #[test]
    fn test_render_authors() {
        let out = render_authors(&["ff8080".to_owned(), "abc123".to_owned()]);
        assert!(out.starts_with("<h1>Authors</h1><p>"));
        assert!(out.ends_with("</p>"));
        assert_eq!(count(&out, r#"ac:name="profile-picture""#), 2);
        assert_eq!(count(&out, r#"<ac:link><ri:user ri:userkey="abc123" /></ac:link>"#), 1);
        assert_eq!(count(&out, "<br />"), 1);
    }

    #[test]
    fn test_render_authors_empty() {
        assert_eq!(render_authors(&[]), "<h1>Authors</h1><p></p>");
    }
}
