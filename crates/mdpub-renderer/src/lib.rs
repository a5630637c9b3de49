//! Markdown to Confluence storage format renderer.
//!
//! [`StorageRenderer`] turns a markdown body into the XHTML storage format
//! Confluence keeps for page content. Besides the markup it reports the
//! local images the page references (to be uploaded as attachments) and
//! whether the body has headings, which decides the page layout.
//!
//! # Example
//!
//! ```
//! use mdpub_renderer::StorageRenderer;
//!
//! let page = StorageRenderer::new().render("# Hello\n\n![diagram](./img/arch.png)");
//! assert!(page.has_headings);
//! assert_eq!(page.attachments, vec!["./img/arch.png"]);
//! assert!(page.markup.contains(r#"ri:filename="arch.png""#));
//! ```

mod layout;
mod renderer;
mod state;
mod storage;

use pulldown_cmark::{Options, Parser};

pub use layout::{page_layout, render_authors};
pub use renderer::MarkdownRenderer;
pub use state::{RenderContext, escape_html};
pub use storage::ImageRef;

/// Rendered page body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    /// Storage format markup, trimmed.
    pub markup: String,
    /// Local image sources as authored, in encounter order.
    pub attachments: Vec<String>,
    /// Whether the body contains headings.
    pub has_headings: bool,
}

/// Renders markdown bodies into complete page markup.
#[derive(Debug, Default, Clone)]
pub struct StorageRenderer {
    author_keys: Vec<String>,
}

impl StorageRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit these user keys in an "Authors" block above the body.
    ///
    /// An empty list renders no block.
    #[must_use]
    pub fn with_authors(mut self, user_keys: Vec<String>) -> Self {
        self.author_keys = user_keys;
        self
    }

    /// Render a markdown body.
    #[must_use]
    pub fn render(&self, markdown: &str) -> RenderedPage {
        let options =
            Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
        let parser = Parser::new_ext(markdown, options);

        let mut ctx = RenderContext::default();
        let body = MarkdownRenderer::new().render(parser, &mut ctx);

        let content = if self.author_keys.is_empty() {
            body
        } else {
            format!("{}{body}", render_authors(&self.author_keys))
        };

        RenderedPage {
            markup: page_layout(&content, ctx.has_headings).trim().to_owned(),
            attachments: ctx.attachments,
            has_headings: ctx.has_headings,
        }
    }
}
