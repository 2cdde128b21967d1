use crate::error::ExtractionError;
#[cfg(feature = "docx")]
use crate::extractor::DocumentKind;
use std::path::Path;
#[cfg(feature = "docx")]
use tracing::debug;

#[cfg(feature = "docx")]
const DOCUMENT_PART: &str = "word/document.xml";

/// Join paragraph texts one per line, dropping paragraphs that are blank.
pub fn join_paragraphs<S: AsRef<str>>(paragraphs: &[S]) -> String {
    paragraphs
        .iter()
        .map(|p| p.as_ref())
        .filter(|p| !p.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Body paragraphs of `word/document.xml`, one per line. Paragraphs inside
/// tables and text boxes are left out.
#[cfg(feature = "docx")]
pub fn extract_docx(path: &Path) -> Result<String, ExtractionError> {
    use std::io::BufReader;
    use zip::result::ZipError;
    use zip::ZipArchive;

    let file = std::fs::File::open(path)?;
    let mut archive = ZipArchive::new(file)?;

    let document = archive.by_name(DOCUMENT_PART).map_err(|e| match e {
        ZipError::FileNotFound => {
            ExtractionError::parse(DocumentKind::Docx, format!("package has no {}", DOCUMENT_PART))
        }
        other => other.into(),
    })?;

    let paragraphs = read_paragraphs(BufReader::new(document))?;
    debug!(path = %path.display(), paragraphs = paragraphs.len(), "read DOCX body");

    Ok(join_paragraphs(&paragraphs))
}

#[cfg(not(feature = "docx"))]
pub fn extract_docx(_path: &Path) -> Result<String, ExtractionError> {
    Err(ExtractionError::MissingCapability {
        kind: crate::extractor::DocumentKind::Docx,
    })
}

/// Stream `word/document.xml` and return the text of each body paragraph.
#[cfg(feature = "docx")]
pub fn read_paragraphs<R: std::io::BufRead>(source: R) -> Result<Vec<String>, ExtractionError> {
    use quick_xml::events::Event;
    use quick_xml::Reader;

    let mut reader = Reader::from_reader(source);
    let mut buf = Vec::with_capacity(1024);

    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_paragraph = false;
    let mut in_run = false;
    let mut in_text = false;
    // >0 while inside a table or text box
    let mut nested = 0usize;
    // DrawingML `a:p` elements opened inside the current body paragraph
    let mut inner_paragraphs = 0usize;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"tbl" | b"txbxContent" => nested += 1,
                b"p" if nested == 0 => {
                    if in_paragraph {
                        inner_paragraphs += 1;
                    } else {
                        in_paragraph = true;
                        current.clear();
                    }
                }
                b"r" => in_run = true,
                b"t" => in_text = true,
                _ => {}
            },
            Event::Empty(e) if nested == 0 => {
                let name = e.local_name();
                if !in_paragraph {
                    if name.as_ref() == b"p" {
                        paragraphs.push(String::new());
                    }
                } else if in_run && inner_paragraphs == 0 {
                    match name.as_ref() {
                        b"tab" => current.push('\t'),
                        b"br" | b"cr" => current.push('\n'),
                        _ => {}
                    }
                }
            }
            Event::Text(t) => {
                if in_paragraph && in_text && nested == 0 && inner_paragraphs == 0 {
                    current.push_str(&t.unescape()?);
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"tbl" | b"txbxContent" => nested = nested.saturating_sub(1),
                b"p" if nested == 0 && inner_paragraphs > 0 => inner_paragraphs -= 1,
                b"p" if nested == 0 && in_paragraph => {
                    paragraphs.push(std::mem::take(&mut current));
                    in_paragraph = false;
                }
                b"r" => in_run = false,
                b"t" => in_text = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(paragraphs)
}
