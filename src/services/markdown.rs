//! Markdown rendering
//!
//! Renders post content to HTML at write time so list and detail responses
//! serve pre-rendered markup.

use pulldown_cmark::{html, Options, Parser};

/// Markdown renderer with a fixed option set.
#[derive(Debug, Clone, Default)]
pub struct MarkdownRenderer;

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render markdown to HTML.
    pub fn render(&self, markdown: &str) -> String {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_FOOTNOTES);

        let parser = Parser::new_ext(markdown, options);
        let mut output = String::new();
        html::push_html(&mut output, parser);
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_paragraph() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("Olá **mundo**");
        assert!(html.contains("<strong>mundo</strong>"));
    }

    #[test]
    fn test_render_heading_and_list() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("# Título\n\n- um\n- dois\n");
        assert!(html.contains("<h1>"));
        assert!(html.contains("<li>um</li>"));
    }

    #[test]
    fn test_render_table_extension() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<table>"));
    }

    #[test]
    fn test_render_empty() {
        let renderer = MarkdownRenderer::new();
        assert_eq!(renderer.render(""), "");
    }
}
