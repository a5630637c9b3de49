//! State structs threaded through markdown rendering.

use pulldown_cmark::Alignment;

/// Facts collected while rendering a document body.
///
/// Owned by the caller and passed into the visitor, so nothing about a
/// document lingers on the renderer between runs.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RenderContext {
    /// Local image sources in encounter order, as authored (duplicates kept).
    pub attachments: Vec<String>,
    /// Whether the body contains at least one heading.
    pub has_headings: bool,
}

/// State for tracking code block rendering.
#[derive(Default)]
pub(crate) struct CodeBlockState {
    active: bool,
    language: Option<String>,
    buffer: String,
}

impl CodeBlockState {
    /// Start a new code block with optional language.
    pub(crate) fn start(&mut self, language: Option<String>) {
        self.active = true;
        self.language = language;
        self.buffer.clear();
    }

    /// End the current code block and return (language, content).
    pub(crate) fn end(&mut self) -> (Option<String>, String) {
        self.active = false;
        (self.language.take(), std::mem::take(&mut self.buffer))
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn push_str(&mut self, text: &str) {
        self.buffer.push_str(text);
    }
}

/// State for tracking table rendering.
#[derive(Default)]
pub(crate) struct TableState {
    in_head: bool,
    alignments: Vec<Alignment>,
    cell_index: usize,
}

impl TableState {
    /// Start a new table with column alignments.
    pub(crate) fn start(&mut self, alignments: Vec<Alignment>) {
        self.alignments = alignments;
        self.in_head = false;
        self.cell_index = 0;
    }

    pub(crate) fn start_head(&mut self) {
        self.in_head = true;
        self.cell_index = 0;
    }

    pub(crate) fn end_head(&mut self) {
        self.in_head = false;
    }

    pub(crate) fn start_row(&mut self) {
        self.cell_index = 0;
    }

    pub(crate) fn next_cell(&mut self) {
        self.cell_index += 1;
    }

    pub(crate) fn is_in_head(&self) -> bool {
        self.in_head
    }

    /// Get the alignment style for the current cell.
    pub(crate) fn current_alignment_style(&self) -> &'static str {
        match self.alignments.get(self.cell_index) {
            Some(Alignment::Left) => r#" style="text-align:left""#,
            Some(Alignment::Center) => r#" style="text-align:center""#,
            Some(Alignment::Right) => r#" style="text-align:right""#,
            Some(Alignment::None) | None => "",
        }
    }
}

/// Swallows image alt text, which storage format has no place for.
///
/// Alt text may itself contain images. Only the outermost one is rendered.
#[derive(Default)]
pub(crate) struct ImageState {
    outer_src: Option<String>,
    depth: usize,
}

impl ImageState {
    pub(crate) fn start(&mut self, src: String) {
        if self.depth == 0 {
            self.outer_src = Some(src);
        }
        self.depth += 1;
    }

    /// Source of the image to render, once the outermost image closes.
    pub(crate) fn end(&mut self) -> Option<String> {
        self.depth = self.depth.saturating_sub(1);
        if self.depth == 0 {
            self.outer_src.take()
        } else {
            None
        }
    }

    pub(crate) fn is_active(&self) -> bool {
        self.depth > 0
    }
}

/// Escape HTML special characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<b>"), "&lt;b&gt;");
        assert_eq!(escape_html("Q&A"), "Q&amp;A");
        assert_eq!(escape_html(r#"say "hi""#), "say &quot;hi&quot;");
    }

    #[test]
    fn test_code_block_state() {
        let mut state = CodeBlockState::default();
        state.start(Some("bash".to_owned()));
        assert!(state.is_active());
        state.push_str("echo hi\n");

        let (lang, content) = state.end();
        assert_eq!(lang.as_deref(), Some("bash"));
        assert_eq!(content, "echo hi\n");
        assert!(!state.is_active());
    }

    #[test]
    fn test_table_alignment() {
        let mut state = TableState::default();
        state.start(vec![Alignment::None, Alignment::Right]);
        state.start_row();
        assert_eq!(state.current_alignment_style(), "");
        state.next_cell();
        assert_eq!(
            state.current_alignment_style(),
            r#" style="text-align:right""#
        );
        state.next_cell();
        assert_eq!(state.current_alignment_style(), "");
    }

    #[test]
    fn test_image_state() {
        let mut state = ImageState::default();
        assert!(!state.is_active());
        state.start("a.png".to_owned());
        assert!(state.is_active());
        assert_eq!(state.end().as_deref(), Some("a.png"));
        assert!(!state.is_active());
    }

    #[test]
    fn test_nested_image_keeps_outer_source() {
        let mut image = ImageState::default();
        image.start("b.png".to_owned());
        image.start("a.png".to_owned());
        assert_eq!(image.end(), None);
        assert!(image.is_active());
        assert_eq!(image.end().as_deref(), Some("b.png"));
        assert!(!image.is_active());
    }
}
