use crate::error::ExtractionError;
use crate::extractor::{html::html_to_text, DocumentKind};
use mail_parser::{Message, MessageParser, MessagePart, MimeHeaders, PartType};
use std::borrow::Cow;
use std::path::Path;
use tracing::debug;

const FRAGMENT_SEPARATOR: &str = "\n\n";

/// A leaf of the MIME tree with its content already transfer- and
/// charset-decoded.
#[derive(Debug, Clone)]
pub struct MimeLeaf {
    pub content_type: String,
    pub body: LeafBody,
}

#[derive(Debug, Clone)]
pub enum LeafBody {
    Text(String),
    Binary(Vec<u8>),
}

impl LeafBody {
    pub fn as_text_lossy(&self) -> Cow<'_, str> {
        match self {
            LeafBody::Text(text) => Cow::Borrowed(text),
            LeafBody::Binary(bytes) => String::from_utf8_lossy(bytes),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MimeDocument {
    pub multipart: bool,
    pub leaves: Vec<MimeLeaf>,
}

pub fn extract_mhtml(path: &Path) -> Result<String, ExtractionError> {
    let bytes = std::fs::read(path)?;
    debug!(path = %path.display(), bytes = bytes.len(), "parsing MIME archive");
    extract_text_from_mime(&bytes)
}

/// Extract the readable text of a raw MIME message.
pub fn extract_text_from_mime(raw: &[u8]) -> Result<String, ExtractionError> {
    let document = parse_mime_document(raw)?;

    if !document.multipart {
        return match document.leaves.first() {
            Some(leaf) => single_body_text(leaf),
            None => Ok(String::new()),
        };
    }

    let mut fragments = Vec::new();
    for leaf in &document.leaves {
        match leaf.content_type.as_str() {
            "text/html" => fragments.push(html_to_text(&leaf.body.as_text_lossy())),
            "text/plain" => fragments.push(leaf.body.as_text_lossy().into_owned()),
            other => debug!(content_type = other, "ignoring MIME part"),
        }
    }

    Ok(fragments.join(FRAGMENT_SEPARATOR))
}

/// Parse a raw message into its ordered leaf parts.
///
/// Input without a MIME header block is a single `text/plain` body holding
/// the raw bytes.
pub fn parse_mime_document(raw: &[u8]) -> Result<MimeDocument, ExtractionError> {
    let Some(message) = MessageParser::default().parse(raw) else {
        debug!(bytes = raw.len(), "no MIME headers, reading body as plain text");
        let leaves = if raw.is_empty() {
            Vec::new()
        } else {
            vec![MimeLeaf {
                content_type: "text/plain".to_string(),
                body: LeafBody::Text(String::from_utf8_lossy(raw).into_owned()),
            }]
        };
        return Ok(MimeDocument {
            multipart: false,
            leaves,
        });
    };

    let multipart = message
        .parts
        .first()
        .is_some_and(|root| matches!(root.body, PartType::Multipart(_)));

    let mut leaves = Vec::new();
    collect_leaves(&message, 0, &mut leaves)?;

    Ok(MimeDocument { multipart, leaves })
}

fn collect_leaves(
    message: &Message<'_>,
    part_id: usize,
    leaves: &mut Vec<MimeLeaf>,
) -> Result<(), ExtractionError> {
    let part = message.parts.get(part_id).ok_or_else(|| {
        ExtractionError::parse(
            DocumentKind::Mhtml,
            format!("dangling reference to MIME part {}", part_id),
        )
    })?;

    if part.is_encoding_problem {
        debug!(part_id, "MIME part could not be fully decoded; using best effort");
    }

    match &part.body {
        PartType::Multipart(children) => {
            for child in children {
                collect_leaves(message, *child as usize, leaves)?;
            }
        }
        PartType::Message(nested) => {
            if !nested.parts.is_empty() {
                collect_leaves(nested, 0, leaves)?;
            }
        }
        PartType::Text(text) | PartType::Html(text) => leaves.push(MimeLeaf {
            content_type: content_type_of(part),
            body: LeafBody::Text(text.to_string()),
        }),
        PartType::Binary(bytes) | PartType::InlineBinary(bytes) => leaves.push(MimeLeaf {
            content_type: content_type_of(part),
            body: LeafBody::Binary(bytes.to_vec()),
        }),
    }

    Ok(())
}

/// Lowercased `type/subtype`; parts without a header default to `text/plain`.
fn content_type_of(part: &MessagePart<'_>) -> String {
    part.content_type()
        .map(|ct| match ct.subtype() {
            Some(subtype) => format!("{}/{}", ct.ctype(), subtype),
            None => ct.ctype().to_string(),
        })
        .map(|ct| ct.to_lowercase())
        .unwrap_or_else(|| "text/plain".to_string())
}

fn single_body_text(leaf: &MimeLeaf) -> Result<String, ExtractionError> {
    if leaf.content_type == "text/html" {
        return Ok(html_to_text(&leaf.body.as_text_lossy()));
    }

    match &leaf.body {
        LeafBody::Text(text) => Ok(text.clone()),
        LeafBody::Binary(_) => Err(ExtractionError::parse(
            DocumentKind::Mhtml,
            format!("single-part body is not text ({})", leaf.content_type),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const TWO_PART_ARCHIVE: &str = "From: <Saved by Blink>\r\n\
Subject: Example\r\n\
MIME-Version: 1.0\r\n\
Content-Type: multipart/related; type=\"text/html\"; boundary=\"----BOUNDARY\"\r\n\
\r\n\
------BOUNDARY\r\n\
Content-Type: text/html; charset=\"utf-8\"\r\n\
Content-Transfer-Encoding: quoted-printable\r\n\
Content-Location: https://example.com/\r\n\
\r\n\
<html><body><p>Hello</p><p>World</p></body></html>\r\n\
------BOUNDARY\r\n\
Content-Type: text/plain\r\n\
\r\n\
Raw\r\n\
------BOUNDARY--\r\n";

    #[test]
    fn test_html_and_plain_parts_joined_in_order() {
        let text = extract_text_from_mime(TWO_PART_ARCHIVE.as_bytes()).unwrap();

        assert!(text.starts_with("Hello\nWorld\n\n"), "got {:?}", text);
        assert!(text.trim_end().ends_with("Raw"), "got {:?}", text);
        assert!(text.find("Hello").unwrap() < text.find("Raw").unwrap());
    }

    #[test]
    fn test_images_and_css_are_ignored() {
        let archive = "MIME-Version: 1.0\r\n\
Content-Type: multipart/related; boundary=\"b1\"\r\n\
\r\n\
--b1\r\n\
Content-Type: text/html\r\n\
\r\n\
<p>Page text</p>\r\n\
--b1\r\n\
Content-Type: text/css\r\n\
\r\n\
body { color: red; }\r\n\
--b1\r\n\
Content-Type: image/png\r\n\
Content-Transfer-Encoding: base64\r\n\
\r\n\
iVBORw0KGgo=\r\n\
--b1--\r\n";

        let text = extract_text_from_mime(archive.as_bytes()).unwrap();
        assert_eq!(text, "Page text");
    }

    #[test]
    fn test_empty_fragments_keep_their_place() {
        let archive = "MIME-Version: 1.0\r\n\
Content-Type: multipart/related; boundary=\"e\"\r\n\
\r\n\
--e\r\n\
Content-Type: text/html\r\n\
\r\n\
<script>x()</script>\r\n\
--e\r\n\
Content-Type: text/plain\r\n\
\r\n\
Raw\r\n\
--e--\r\n";

        let text = extract_text_from_mime(archive.as_bytes()).unwrap();
        assert!(text.starts_with("\n\nRaw"), "got {:?}", text);
        assert!(!text.contains("x()"));
    }

    #[test]
    fn test_headerless_input_is_kept_as_plain_text() {
        let page = b"<html><body><p>Hi there</p></body></html>\n";
        let document = parse_mime_document(page).unwrap();
        assert!(!document.multipart);
        assert_eq!(document.leaves.len(), 1);
        assert_eq!(document.leaves[0].content_type, "text/plain");

        let text = extract_text_from_mime(page).unwrap();
        assert_eq!(text, String::from_utf8_lossy(page));

        let words = b"Just some words\nand more\n";
        assert_eq!(
            extract_text_from_mime(words).unwrap(),
            "Just some words\nand more\n"
        );
    }

    #[test]
    fn test_empty_input_yields_empty_text() {
        assert_eq!(extract_text_from_mime(b"").unwrap(), "");
    }

    #[test]
    fn test_nested_multipart_is_flattened() {
        let archive = "MIME-Version: 1.0\r\n\
Content-Type: multipart/mixed; boundary=\"outer\"\r\n\
\r\n\
--outer\r\n\
Content-Type: multipart/alternative; boundary=\"inner\"\r\n\
\r\n\
--inner\r\n\
Content-Type: text/plain\r\n\
\r\n\
First\r\n\
--inner\r\n\
Content-Type: text/html\r\n\
\r\n\
<div>Second</div>\r\n\
--inner--\r\n\
--outer\r\n\
Content-Type: text/plain\r\n\
\r\n\
Third\r\n\
--outer--\r\n";

        let document = parse_mime_document(archive.as_bytes()).unwrap();
        assert!(document.multipart);
        assert_eq!(document.leaves.len(), 3);

        let text = extract_text_from_mime(archive.as_bytes()).unwrap();
        let first = text.find("First").unwrap();
        let second = text.find("Second").unwrap();
        let third = text.find("Third").unwrap();
        assert!(first < second && second < third, "got {:?}", text);
    }

    #[test]
    fn test_quoted_printable_is_decoded() {
        let archive = "MIME-Version: 1.0\r\n\
Content-Type: multipart/related; boundary=\"qp\"\r\n\
\r\n\
--qp\r\n\
Content-Type: text/html; charset=utf-8\r\n\
Content-Transfer-Encoding: quoted-printable\r\n\
\r\n\
<p class=3D\"intro\">A long para=\r\n\
graph</p>\r\n\
--qp--\r\n";

        let text = extract_text_from_mime(archive.as_bytes()).unwrap();
        assert_eq!(text, "A long paragraph");
    }

    #[test]
    fn test_latin1_charset_is_decoded() {
        let mut archive = b"MIME-Version: 1.0\r\n\
Content-Type: multipart/related; boundary=\"cs\"\r\n\
\r\n\
--cs\r\n\
Content-Type: text/plain; charset=iso-8859-1\r\n\
\r\n\
caf"
        .to_vec();
        archive.push(0xE9);
        archive.extend_from_slice(b"\r\n--cs--\r\n");

        let text = extract_text_from_mime(&archive).unwrap();
        assert_eq!(text.trim_end(), "caf\u{e9}");
    }

    #[test]
    fn test_unknown_charset_falls_back() {
        let archive = "MIME-Version: 1.0\r\n\
Content-Type: multipart/related; boundary=\"u\"\r\n\
\r\n\
--u\r\n\
Content-Type: text/html; charset=x-made-up\r\n\
\r\n\
<p>Plain words</p>\r\n\
--u--\r\n";

        let text = extract_text_from_mime(archive.as_bytes()).unwrap();
        assert_eq!(text, "Plain words");
    }

    #[test]
    fn test_no_collectible_parts_yields_empty_text() {
        let archive = "MIME-Version: 1.0\r\n\
Content-Type: multipart/related; boundary=\"img\"\r\n\
\r\n\
--img\r\n\
Content-Type: image/gif\r\n\
Content-Transfer-Encoding: base64\r\n\
\r\n\
R0lGODlhAQABAAAAACw=\r\n\
--img--\r\n";

        let text = extract_text_from_mime(archive.as_bytes()).unwrap();
        assert_eq!(text, "");
    }

    #[test]
    fn test_single_part_html() {
        let message = "MIME-Version: 1.0\r\n\
Content-Type: text/html; charset=utf-8\r\n\
\r\n\
<h1>Only</h1><script>skip()</script><p>body</p>\r\n";

        let document = parse_mime_document(message.as_bytes()).unwrap();
        assert!(!document.multipart);

        let text = extract_text_from_mime(message.as_bytes()).unwrap();
        assert_eq!(text, "Only\nbody");
    }

    #[test]
    fn test_single_part_plain_is_verbatim() {
        let message = concat!(
            "MIME-Version: 1.0\r\n",
            "Content-Type: text/plain\r\n",
            "\r\n",
            "  indented line\r\n",
            "second line",
        );

        let text = extract_text_from_mime(message.as_bytes()).unwrap();
        assert!(text.starts_with("  indented line"));
        assert!(text.contains("second line"));
    }

    #[test]
    fn test_single_part_binary_is_an_error() {
        let message = "MIME-Version: 1.0\r\n\
Content-Type: application/octet-stream\r\n\
Content-Transfer-Encoding: base64\r\n\
\r\n\
AAECAw==\r\n";

        let result = extract_text_from_mime(message.as_bytes());
        assert!(matches!(result, Err(ExtractionError::Parse { .. })));
    }

    #[test]
    fn test_extract_mhtml_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("saved.mhtml");
        fs::write(&path, TWO_PART_ARCHIVE).unwrap();

        let text = extract_mhtml(&path).unwrap();
        assert!(text.contains("Hello\nWorld"));
        assert!(text.contains("Raw"));
    }

    #[test]
    fn test_extract_mhtml_missing_file() {
        let result = extract_mhtml(Path::new("/nope/missing.mhtml"));
        assert!(matches!(result, Err(ExtractionError::Io(_))));
    }
}
