//! DOCX container text extraction

use crate::error::{Result, ResumeScorerError};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};

/// Extract paragraph text from DOCX bytes.
///
/// A DOCX file is a zip archive; the body lives in `word/document.xml` as
/// runs of `<w:t>` text inside `<w:p>` paragraphs. Paragraphs are joined
/// with newline separators, matching how word processors render them.
pub fn extract_text(bytes: &[u8]) -> Result<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ResumeScorerError::InvalidContainer(format!("not a DOCX archive: {}", e)))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|_| {
            ResumeScorerError::InvalidContainer("archive has no word/document.xml".to_string())
        })?
        .read_to_string(&mut xml)
        .map_err(|e| {
            ResumeScorerError::InvalidContainer(format!("unreadable document body: {}", e))
        })?;

    parse_document_xml(&xml)
}

fn parse_document_xml(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"w:t" => in_text_run = true,
            Ok(Event::End(ref e)) if e.name().as_ref() == b"w:t" => in_text_run = false,
            Ok(Event::Text(t)) if in_text_run => {
                let run = t.unescape().map_err(|e| {
                    ResumeScorerError::InvalidContainer(format!("malformed text run: {}", e))
                })?;
                text.push_str(&run);
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == b"w:p" => text.push('\n'),
            Ok(Event::Empty(ref e)) if e.name().as_ref() == b"w:br" => text.push('\n'),
            Ok(Event::Empty(ref e)) if e.name().as_ref() == b"w:tab" => text.push(' '),
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(ResumeScorerError::InvalidContainer(format!(
                    "malformed document XML: {}",
                    e
                )))
            }
        }
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    const SAMPLE_XML: &str = r#"<?xml version="1.0"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Priya Sharma</w:t></w:r></w:p>
    <w:p><w:r><w:t>Backend engineer, </w:t></w:r><w:r><w:t>Python &amp; Go</w:t></w:r></w:p>
  </w:body>
</w:document>"#;

    fn build_docx(document_xml: &str) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        writer
            .start_file("[Content_Types].xml", options)
            .unwrap();
        writer
            .write_all(br#"<?xml version="1.0"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"/>"#)
            .unwrap();
        writer.start_file("word/document.xml", options).unwrap();
        writer.write_all(document_xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_paragraphs_joined_with_newlines() {
        let text = parse_document_xml(SAMPLE_XML).unwrap();
        assert_eq!(text.trim(), "Priya Sharma\nBackend engineer, Python & Go");
    }

    #[test]
    fn test_round_trip_through_archive() {
        let bytes = build_docx(SAMPLE_XML);
        let text = extract_text(&bytes).unwrap();
        assert!(text.contains("Priya Sharma"));
        assert!(text.contains("Python & Go"));
    }

    #[test]
    fn test_archive_without_document_body() {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("word/other.xml", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"<w:document/>").unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let err = extract_text(&bytes).unwrap_err();
        assert!(matches!(err, ResumeScorerError::InvalidContainer(_)));
    }

    #[test]
    fn test_not_an_archive() {
        let err = extract_text(b"garbage").unwrap_err();
        assert!(matches!(err, ResumeScorerError::InvalidContainer(_)));
    }
}
