//! Confluence storage format elements.
//!
//! Macro markup for the elements that don't map to plain XHTML: code
//! blocks and images.

use std::fmt::Write;

use url::Url;

use crate::state::escape_html;

/// Code macro theme applied to every code block.
const CODE_THEME: &str = "Midnight";

/// How an image source is referenced from the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef<'a> {
    /// Hosted elsewhere; referenced by full URL.
    External(&'a str),
    /// Uploaded to the page; referenced by file name only.
    Attachment {
        /// Basename of the source path.
        filename: &'a str,
    },
}

impl<'a> ImageRef<'a> {
    /// Classify an image source.
    ///
    /// A source is external when it parses as an absolute URL with a host.
    /// Anything else is a local file that must be attached to the page.
    #[must_use]
    pub fn classify(src: &'a str) -> Self {
        let has_host = Url::parse(src).is_ok_and(|url| url.host().is_some());
        if has_host {
            Self::External(src)
        } else {
            Self::Attachment {
                filename: src.rsplit('/').next().unwrap_or(src),
            }
        }
    }
}

/// Normalize a fence language for the code macro.
///
/// The code macro knows `bash` but not the `sh` alias.
pub(crate) fn code_language(lang: Option<&str>) -> &str {
    match lang {
        Some("sh") => "bash",
        Some(lang) => lang,
        None => "",
    }
}

/// Render a code block macro.
pub(crate) fn code_block(lang: Option<&str>, content: &str, out: &mut String) {
    out.push_str(r#"<ac:structured-macro ac:name="code" ac:schema-version="1">"#);
    write!(
        out,
        r#"<ac:parameter ac:name="language">{}</ac:parameter>"#,
        escape_html(code_language(lang))
    )
    .unwrap();
    write!(
        out,
        r#"<ac:parameter ac:name="theme">{CODE_THEME}</ac:parameter>"#
    )
    .unwrap();
    // CDATA content is not escaped; a literal "]]>" is split across two sections
    let body = content.strip_suffix('\n').unwrap_or(content);
    write!(
        out,
        "<ac:plain-text-body><![CDATA[{}]]></ac:plain-text-body>",
        body.replace("]]>", "]]]]><![CDATA[>")
    )
    .unwrap();
    out.push_str("</ac:structured-macro>");
}

/// Render an image macro.
pub(crate) fn image(image: &ImageRef<'_>, out: &mut String) {
    let inner = match image {
        ImageRef::External(url) => format!(r#"ri:url ri:value="{}""#, escape_html(url)),
        ImageRef::Attachment { filename } => {
            format!(r#"ri:attachment ri:filename="{}""#, escape_html(filename))
        }
    };
    write!(out, "<ac:image><{inner} /></ac:image>").unwrap();
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_code_block_sh_becomes_bash() {
        let mut out = String::new();
        code_block(Some("sh"), "ls -la\n", &mut out);
        assert_eq!(
            out,
            concat!(
                r#"<ac:structured-macro ac:name="code" ac:schema-version="1">"#,
                r#"<ac:parameter ac:name="language">bash</ac:parameter>"#,
                r#"<ac:parameter ac:name="theme">Midnight</ac:parameter>"#,
                "<ac:plain-text-body><![CDATA[ls -la]]></ac:plain-text-body>",
                "</ac:structured-macro>"
            )
        );
    }

    #[test]
    fn test_code_block_language_passthrough() {
        let mut out = String::new();
        code_block(Some("python"), "print(1)", &mut out);
        assert!(out.contains(r#"<ac:parameter ac:name="language">python</ac:parameter>"#));

        let mut out = String::new();
        code_block(Some("shell"), "x", &mut out);
        assert!(out.contains(r#"<ac:parameter ac:name="language">shell</ac:parameter>"#));
    }

    #[test]
    fn test_code_block_without_language_has_empty_parameter() {
        let mut out = String::new();
        code_block(None, "plain", &mut out);
        assert!(out.contains(r#"<ac:parameter ac:name="language"></ac:parameter>"#));
    }

    #[test]
    fn test_code_block_content_not_escaped() {
        let mut out = String::new();
        code_block(Some("html"), "<p>a & b</p>\n", &mut out);
        assert!(out.contains("<![CDATA[<p>a & b</p>]]>"));
    }

    #[test]
    fn test_code_block_cdata_terminator_split() {
        let mut out = String::new();
        code_block(None, "x]]>y", &mut out);
        assert!(out.contains("<![CDATA[x]]]]><![CDATA[>y]]>"));
    }

    #[test]
    fn test_classify_external() {
        assert_eq!(
            ImageRef::classify("https://example.com/x.png"),
            ImageRef::External("https://example.com/x.png")
        );
        assert_eq!(
            ImageRef::classify("http://cdn.example.com:8080/a/b.svg"),
            ImageRef::External("http://cdn.example.com:8080/a/b.svg")
        );
    }

    #[test]
    fn test_classify_local() {
        assert_eq!(
            ImageRef::classify("./img/a.png"),
            ImageRef::Attachment { filename: "a.png" }
        );
        assert_eq!(
            ImageRef::classify("/images/diagram.png"),
            ImageRef::Attachment {
                filename: "diagram.png"
            }
        );
        assert_eq!(
            ImageRef::classify("b.png"),
            ImageRef::Attachment { filename: "b.png" }
        );
        // A scheme without a host is still local
        assert_eq!(
            ImageRef::classify("file:///tmp/c.png"),
            ImageRef::Attachment { filename: "c.png" }
        );
    }

    #[test]
    fn test_image_markup() {
        let mut out = String::new();
        image(&ImageRef::classify("./img/a.png"), &mut out);
        assert_eq!(
            out,
            r#"<ac:image><ri:attachment ri:filename="a.png" /></ac:image>"#
        );

        let mut out = String::new();
        image(&ImageRef::classify("https://example.com/x.png"), &mut out);
        assert_eq!(
            out,
            r#"<ac:image><ri:url ri:value="https://example.com/x.png" /></ac:image>"#
        );
    }
}
