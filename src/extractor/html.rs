use crate::error::ExtractionError;
use scraper::{ElementRef, Html, Node};
use std::path::Path;
use tracing::debug;

/// Elements whose content is never visible text.
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Convert markup into visible text with one line per block.
pub fn html_to_text(markup: &str) -> String {
    let document = Html::parse_document(markup);
    let mut collector = TextCollector::default();
    walk_element(document.root_element(), &mut collector);
    collector.finish()
}

/// Read an HTML file (invalid UTF-8 replaced) and strip it to text.
pub fn extract_html(path: &Path) -> Result<String, ExtractionError> {
    let markup = super::read_lossy(path)?;
    debug!(path = %path.display(), bytes = markup.len(), "stripping HTML");
    Ok(html_to_text(&markup))
}

fn walk_element(element: ElementRef, collector: &mut TextCollector) {
    let name = element.value().name();
    if SKIPPED_ELEMENTS.contains(&name) {
        return;
    }

    let block = is_block_element(name);
    let preformatted = matches!(name, "pre" | "textarea" | "listing");

    if block {
        collector.break_block();
    }
    if preformatted {
        collector.preformatted += 1;
    }

    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            walk_element(child_element, collector);
        } else if let Node::Text(text) = child.value() {
            collector.push_text(text);
        }
    }

    if preformatted {
        collector.preformatted -= 1;
    }
    if block {
        collector.break_block();
    }
}

fn is_block_element(name: &str) -> bool {
    matches!(
        name,
        "address"
            | "article"
            | "aside"
            | "blockquote"
            | "body"
            | "br"
            | "caption"
            | "center"
            | "dd"
            | "details"
            | "dialog"
            | "div"
            | "dl"
            | "dt"
            | "fieldset"
            | "figcaption"
            | "figure"
            | "footer"
            | "form"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "head"
            | "header"
            | "hgroup"
            | "hr"
            | "html"
            | "legend"
            | "li"
            | "listing"
            | "main"
            | "menu"
            | "nav"
            | "ol"
            | "option"
            | "p"
            | "pre"
            | "section"
            | "summary"
            | "table"
            | "tbody"
            | "td"
            | "textarea"
            | "tfoot"
            | "th"
            | "thead"
            | "title"
            | "tr"
            | "ul"
    )
}

#[derive(Default)]
struct TextCollector {
    lines: Vec<String>,
    current: String,
    preformatted: usize,
}

impl TextCollector {
    fn push_text(&mut self, text: &str) {
        if self.preformatted == 0 {
            self.current.push_str(text);
            return;
        }

        // Line breaks inside <pre> are real lines.
        for (index, segment) in text.split('\n').enumerate() {
            if index > 0 {
                self.break_block();
            }
            self.current.push_str(segment);
        }
    }

    fn break_block(&mut self) {
        if self.current.is_empty() {
            return;
        }

        let line = collapse_whitespace(&self.current);
        if !line.is_empty() {
            self.lines.push(line);
        }
        self.current.clear();
    }

    fn finish(mut self) -> String {
        self.break_block();
        self.lines.join("\n")
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
