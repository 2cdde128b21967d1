use crate::error::ExtractionError;
use std::path::Path;

/// Render Markdown to HTML, then strip it to text like any HTML page.
#[cfg(feature = "markdown")]
pub fn extract_markdown(path: &Path) -> Result<String, ExtractionError> {
    let source = super::read_lossy(path)?;
    tracing::debug!(path = %path.display(), bytes = source.len(), "rendering Markdown");
    Ok(super::html::html_to_text(&render_html(&source)))
}

#[cfg(not(feature = "markdown"))]
pub fn extract_markdown(_path: &Path) -> Result<String, ExtractionError> {
    Err(ExtractionError::MissingCapability {
        kind: crate::extractor::DocumentKind::Markdown,
    })
}

/// Plain CommonMark, no extensions.
#[cfg(feature = "markdown")]
pub fn render_html(source: &str) -> String {
    use pulldown_cmark::{html, Options, Parser};

    let parser = Parser::new_ext(source, Options::empty());
    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}
