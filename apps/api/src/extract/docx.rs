use std::io::{Cursor, Read, Seek};

use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::extract::{DocumentKind, ExtractError, TextExtractor};

const DOCUMENT_PART: &str = "word/document.xml";

pub struct DocxExtractor;

impl TextExtractor for DocxExtractor {
    fn kind(&self) -> DocumentKind {
        DocumentKind::Docx
    }

    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| ExtractError::Docx(format!("Failed to open DOCX: {e}")))?;

        let xml = read_document_part(&mut archive)?;
        paragraphs_from_xml(&xml).map(|paragraphs| paragraphs.join("\n"))
    }
}

fn read_document_part<R: Read + Seek>(
    archive: &mut zip::ZipArchive<R>,
) -> Result<String, ExtractError> {
    let mut part = archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| ExtractError::Docx(format!("Failed to find {DOCUMENT_PART}: {e}")))?;

    let mut xml = String::new();
    part.read_to_string(&mut xml)
        .map_err(|e| ExtractError::Docx(format!("Failed to read {DOCUMENT_PART}: {e}")))?;
    Ok(xml)
}

/// Returns the text of every `<w:p>` in document order. Runs inside a
/// paragraph are concatenated; `<w:tab/>` and `<w:br/>` become `\t` and `\n`.
///
/// Paragraphs nested in a run (text boxes) get their own entry right after
/// the enclosing paragraph, whose text stays intact.
pub(crate) fn paragraphs_from_xml(xml: &str) -> Result<Vec<String>, ExtractError> {
    let mut reader = Reader::from_str(xml);

    let mut paragraphs: Vec<String> = Vec::new();
    // Open `<w:p>` elements: index into `paragraphs` and the run depth at open.
    let mut open: Vec<(usize, usize)> = Vec::new();
    let mut run_depth = 0usize;
    let mut text_depth = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"p" => {
                    open.push((paragraphs.len(), run_depth));
                    paragraphs.push(String::new());
                }
                b"r" => run_depth += 1,
                b"t" => text_depth += 1,
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"p" => paragraphs.push(String::new()),
                b"tab" if in_run(&open, run_depth) => push(&mut paragraphs, &open, "\t"),
                b"br" | b"cr" if in_run(&open, run_depth) => {
                    push(&mut paragraphs, &open, "\n")
                }
                _ => {}
            },
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"p" => {
                    open.pop();
                }
                b"r" => run_depth = run_depth.saturating_sub(1),
                b"t" => text_depth = text_depth.saturating_sub(1),
                _ => {}
            },
            Ok(Event::Text(e)) if text_depth > 0 => {
                let decoded = e
                    .decode()
                    .map_err(|e| ExtractError::Docx(format!("Bad text node: {e}")))?;
                push(&mut paragraphs, &open, &decoded);
            }
            Ok(Event::GeneralRef(e)) if text_depth > 0 => {
                if let Ok(Some(ch)) = e.resolve_char_ref() {
                    push(&mut paragraphs, &open, ch.encode_utf8(&mut [0; 4]));
                } else if let Ok(name) = e.decode() {
                    if let Some(resolved) = resolve_predefined_entity(&name) {
                        push(&mut paragraphs, &open, resolved);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ExtractError::Docx(format!("XML parsing error: {e}")));
            }
            _ => {}
        }
    }

    Ok(paragraphs)
}

/// Appends to the innermost open paragraph; text outside any paragraph is dropped.
fn push(paragraphs: &mut [String], open: &[(usize, usize)], text: &str) {
    if let Some(paragraph) = open.last().and_then(|&(i, _)| paragraphs.get_mut(i)) {
        paragraph.push_str(text);
    }
}

/// True inside a run of the innermost open paragraph.
fn in_run(open: &[(usize, usize)], run_depth: usize) -> bool {
    open.last()
        .is_some_and(|&(_, depth_at_open)| run_depth > depth_at_open)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

    fn wrap(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><w:document xmlns:w="{NS}"><w:body>{body}</w:body></w:document>"#
        )
    }

    #[test]
    fn test_paragraphs_joined_in_order() {
        let xml = wrap(
            "<w:p><w:r><w:t>John Doe</w:t></w:r></w:p>\
             <w:p><w:r><w:t>Software </w:t></w:r><w:r><w:t>Engineer</w:t></w:r></w:p>",
        );
        let paragraphs = paragraphs_from_xml(&xml).unwrap();
        assert_eq!(paragraphs, vec!["John Doe", "Software Engineer"]);
    }

    #[test]
    fn test_empty_paragraph_is_kept() {
        let xml = wrap("<w:p><w:r><w:t>A</w:t></w:r></w:p><w:p/><w:p><w:r><w:t>B</w:t></w:r></w:p>");
        assert_eq!(paragraphs_from_xml(&xml).unwrap(), vec!["A", "", "B"]);
    }

    #[test]
    fn test_tab_stops_in_properties_are_ignored() {
        let xml = wrap(
            r#"<w:p><w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr><w:r><w:t>2019</w:t><w:tab/><w:t>Acme</w:t></w:r></w:p>"#,
        );
        assert_eq!(paragraphs_from_xml(&xml).unwrap(), vec!["2019\tAcme"]);
    }

    #[test]
    fn test_text_box_keeps_enclosing_paragraph() {
        let xml = wrap(
            "<w:p><w:r><w:t>Before </w:t></w:r>\
             <w:r><w:pict><w:txbxContent><w:p><w:r><w:t>Box</w:t></w:r></w:p></w:txbxContent></w:pict></w:r>\
             <w:r><w:t>After</w:t></w:r></w:p>\
             <w:p><w:r><w:t>Next</w:t></w:r></w:p>",
        );
        assert_eq!(
            paragraphs_from_xml(&xml).unwrap(),
            vec!["Before After", "Box", "Next"]
        );
    }

    #[test]
    fn test_tab_stops_inside_text_box_are_ignored() {
        let xml = wrap(
            r#"<w:p><w:r><w:t>Lead</w:t><w:pict><w:txbxContent><w:p><w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr><w:r><w:t>Rust</w:t></w:r></w:p></w:txbxContent></w:pict></w:r></w:p>"#,
        );
        assert_eq!(paragraphs_from_xml(&xml).unwrap(), vec!["Lead", "Rust"]);
    }

    #[test]
    fn test_character_references_are_resolved() {
        let xml = wrap("<w:p><w:r><w:t>R&amp;D &#8211; &lt;5&gt;</w:t></w:r></w:p>");
        assert_eq!(paragraphs_from_xml(&xml).unwrap(), vec!["R&D \u{2013} <5>"]);
    }

    #[test]
    fn test_invalid_zip_is_an_error() {
        let result = DocxExtractor.extract(b"not a zip archive");
        assert!(matches!(result, Err(ExtractError::Docx(_))));
    }

    #[test]
    fn test_reads_encoded_document() {
        let bytes = crate::render::docx::encode("Jane Roe\n- Led R&D <platform> work").unwrap();
        let text = DocxExtractor.extract(&bytes).unwrap();
        assert_eq!(text, "Jane Roe\n- Led R&D <platform> work");
    }
}
