use lopdf::Document;
use std::path::Path;
use tracing::{debug, warn};

use crate::utils::StudyResult;

/// How an uploaded document's bytes are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// `.txt` / `.md`, strict UTF-8
    PlainText,
    /// `.pdf`, page-by-page text extraction
    Pdf,
    /// Anything else, lossy UTF-8
    Other,
}

impl DocumentKind {
    /// Decide by file extension, case-insensitively
    pub fn from_name(file_name: &str) -> Self {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("txt") | Some("md") => DocumentKind::PlainText,
            Some("pdf") => DocumentKind::Pdf,
            _ => DocumentKind::Other,
        }
    }
}

/// Turn an uploaded document into source text. Never fails: problems come
/// back as an inline `[...]` message or empty text.
pub fn extract_document(file_name: &str, bytes: &[u8]) -> String {
    match DocumentKind::from_name(file_name) {
        DocumentKind::PlainText => match std::str::from_utf8(bytes) {
            Ok(text) => text.to_string(),
            Err(e) => {
                warn!("{} is not valid UTF-8: {}", file_name, e);
                format!("[Could not decode text: {}]", e)
            }
        },
        DocumentKind::Pdf => extract_pdf(bytes),
        DocumentKind::Other => decode_lossy(bytes),
    }
}

/// Read a file from disk and extract it.
///
/// Unlike decoding problems, a file that cannot be read is an error.
pub fn extract_file(path: &Path) -> StudyResult<String> {
    let bytes = std::fs::read(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(extract_document(&name, &bytes))
}

fn extract_pdf(bytes: &[u8]) -> String {
    let document = match Document::load_mem(bytes) {
        Ok(document) => document,
        Err(e) => {
            warn!("PDF load failed: {}", e);
            return format!("[Could not parse PDF: {}]", e);
        }
    };

    // get_pages is keyed by 1-based page number, already in order
    let pages = document.get_pages();
    debug!("Extracting {} PDF pages", pages.len());

    join_pages(
        pages.keys().map(|&number| {
            // extract_text ends every page with its own newline
            document
                .extract_text(&[number])
                .map(|text| text.trim_end_matches('\n').to_string())
        }),
    )
}

/// Join per-page results with newlines; a failed page contributes "".
pub fn join_pages<E: std::fmt::Display>(
    pages: impl IntoIterator<Item = Result<String, E>>,
) -> String {
    pages
        .into_iter()
        .enumerate()
        .map(|(index, page)| match page {
            Ok(text) => text,
            Err(e) => {
                debug!("page {} extraction failed: {}", index + 1, e);
                String::new()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// UTF-8 decode that drops invalid sequences rather than replacing them
fn decode_lossy(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        out.push_str(chunk.valid());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::StudyError;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_kind_by_extension() {
        assert_eq!(DocumentKind::from_name("notes.TXT"), DocumentKind::PlainText);
        assert_eq!(DocumentKind::from_name("readme.md"), DocumentKind::PlainText);
        assert_eq!(DocumentKind::from_name("Lecture 3.PDF"), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_name("slides.pptx"), DocumentKind::Other);
        assert_eq!(DocumentKind::from_name("no_extension"), DocumentKind::Other);
    }

    #[test]
    fn test_plain_text_is_unchanged() {
        let text = "Mitochondria — the powerhouse.\nΣ = sum, ∫ = integral\n";
        assert_eq!(extract_document("bio.txt", text.as_bytes()), text);
        assert_eq!(extract_document("bio.md", text.as_bytes()), text);
    }

    #[test]
    fn test_invalid_plain_text_degrades_to_message() {
        let out = extract_document("bad.txt", &[0x66, 0xff, 0x6f]);
        assert!(out.starts_with("[Could not decode text:"));
    }

    #[test]
    fn test_unknown_type_drops_invalid_bytes() {
        let out = extract_document("data.bin", &[b'a', 0xff, 0xfe, b'b', b'c']);
        assert_eq!(out, "abc");
    }

    #[test]
    fn test_garbage_pdf_degrades_to_message() {
        let out = extract_document("broken.pdf", b"definitely not a pdf");
        assert!(out.starts_with("[Could not parse PDF:"));
    }

    #[test]
    fn test_failed_page_contributes_empty_segment() {
        let pages: Vec<Result<String, String>> = vec![
            Ok("page one".to_string()),
            Err("bad font".to_string()),
            Ok("page three".to_string()),
        ];
        assert_eq!(join_pages(pages), "page one\n\npage three");
    }

    #[test]
    fn test_all_pages_failing_yields_separators_only() {
        let pages: Vec<Result<String, &str>> = vec![Err("x"), Err("y")];
        assert_eq!(join_pages(pages), "\n");
    }

    #[test]
    fn test_extract_file_reads_from_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.md");
        fs::write(&path, "# Cells\nAll life is made of cells.").unwrap();

        assert_eq!(
            extract_file(&path).unwrap(),
            "# Cells\nAll life is made of cells."
        );
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let result = extract_file(&dir.path().join("missing.txt"));
        assert!(matches!(result, Err(StudyError::IoError(_))));
    }

    fn pdf_with_pages(texts: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in texts {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![100.into(), 600.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_pdf_pages_joined_in_order() {
        let bytes = pdf_with_pages(&["Page one text", "Page two text"]);
        assert_eq!(
            extract_document("lecture.pdf", &bytes),
            "Page one text\nPage two text"
        );
    }
}
