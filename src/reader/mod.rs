//! Document-to-text conversion for uploaded resumes

pub mod docx;
pub mod ocr;

use crate::config::ReaderConfig;
use crate::error::{Result, ResumeScorerError};
use log::{info, warn};
use ocr::OcrEngine;

/// An uploaded resume document as received at the core boundary.
///
/// Immutable: created at the upload boundary and consumed once by
/// [`DocumentReader::read`].
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub media_type: Option<String>,
}

impl RawDocument {
    pub fn new(bytes: Vec<u8>, filename: impl Into<String>) -> Self {
        Self {
            bytes,
            filename: filename.into(),
            media_type: None,
        }
    }

    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Dispatch on file extension, falling back to the declared media type
    /// when the extension is missing or unrecognized.
    pub fn detect(filename: &str, media_type: Option<&str>) -> Option<Self> {
        let extension = filename.rsplit_once('.').map(|(_, ext)| ext.to_lowercase());
        match extension.as_deref() {
            Some("pdf") => return Some(DocumentKind::Pdf),
            Some("docx") => return Some(DocumentKind::Docx),
            _ => {}
        }

        let media_type = media_type.map(|m| m.to_lowercase()).unwrap_or_default();
        if media_type.contains("pdf") {
            Some(DocumentKind::Pdf)
        } else if media_type.contains("wordprocessingml") || media_type.contains("docx") {
            Some(DocumentKind::Docx)
        } else {
            None
        }
    }
}

/// Converts raw PDF/DOCX bytes into raw text, with OCR fallback for
/// scanned PDFs.
pub struct DocumentReader {
    ocr: OcrEngine,
    ocr_trigger_chars: usize,
}

impl DocumentReader {
    pub fn new(config: &ReaderConfig) -> Self {
        Self {
            ocr: OcrEngine::detect(),
            ocr_trigger_chars: config.ocr_trigger_chars,
        }
    }

    /// Pure transform over bytes. OCR rasterization and recognition block
    /// for non-trivial wall-clock time; callers on a latency-sensitive path
    /// should run this on a blocking worker.
    pub fn read(&self, document: &RawDocument) -> Result<String> {
        let kind = DocumentKind::detect(&document.filename, document.media_type.as_deref())
            .ok_or_else(|| {
                ResumeScorerError::UnsupportedFormat(format!(
                    "'{}' is not a PDF or DOCX file",
                    document.filename
                ))
            })?;

        match kind {
            DocumentKind::Pdf => self.read_pdf(&document.bytes),
            DocumentKind::Docx => docx::extract_text(&document.bytes),
        }
    }

    fn read_pdf(&self, bytes: &[u8]) -> Result<String> {
        let text = match pdf_extract::extract_text_from_mem(bytes) {
            Ok(text) => repair_glyphs(&text),
            Err(e) => {
                warn!("PDF text layer extraction failed: {}", e);
                String::new()
            }
        };

        if text.trim().len() >= self.ocr_trigger_chars {
            return Ok(text);
        }

        if self.ocr.is_available() {
            info!(
                "PDF text layer too small ({} chars), running OCR fallback",
                text.trim().len()
            );
            let recognized = self.ocr.recognize_pdf(bytes)?;
            if recognized.trim().is_empty() {
                return Err(ResumeScorerError::ExtractionFailed(
                    "no text recoverable from PDF, even with OCR".to_string(),
                ));
            }
            return Ok(recognized);
        }

        if text.trim().is_empty() {
            return Err(ResumeScorerError::ExtractionFailed(
                "no text layer in PDF and OCR is unavailable".to_string(),
            ));
        }

        // Short but non-empty text with no OCR on hand: pass it through and
        // let the normalizer's minimum-length check make the final call.
        Ok(text)
    }
}

/// Repair ligatures and smart punctuation that PDF text extraction leaves
/// behind, then strip non-breaking spaces.
fn repair_glyphs(text: &str) -> String {
    text.replace('\u{FB00}', "ff")
        .replace('\u{FB01}', "fi")
        .replace('\u{FB02}', "fl")
        .replace('\u{FB03}', "ffi")
        .replace('\u{FB04}', "ffl")
        .replace(&['\u{2018}', '\u{2019}'][..], "'")
        .replace(&['\u{201C}', '\u{201D}'][..], "\"")
        .replace('\u{00A0}', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_by_extension() {
        assert_eq!(
            DocumentKind::detect("resume.PDF", None),
            Some(DocumentKind::Pdf)
        );
        assert_eq!(
            DocumentKind::detect("cv.docx", None),
            Some(DocumentKind::Docx)
        );
        assert_eq!(DocumentKind::detect("notes.txt", None), None);
    }

    #[test]
    fn test_detect_by_media_type_fallback() {
        assert_eq!(
            DocumentKind::detect("resume", Some("application/pdf")),
            Some(DocumentKind::Pdf)
        );
        assert_eq!(
            DocumentKind::detect(
                "upload.bin",
                Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document")
            ),
            Some(DocumentKind::Docx)
        );
        assert_eq!(DocumentKind::detect("upload", Some("text/plain")), None);
    }

    #[test]
    fn test_unsupported_format_error() {
        let reader = DocumentReader::new(&ReaderConfig::default());
        let doc = RawDocument::new(b"plain text".to_vec(), "resume.txt");
        let err = reader.read(&doc).unwrap_err();
        assert!(matches!(err, ResumeScorerError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_invalid_docx_container() {
        let reader = DocumentReader::new(&ReaderConfig::default());
        let doc = RawDocument::new(b"not a zip archive".to_vec(), "resume.docx");
        let err = reader.read(&doc).unwrap_err();
        assert!(matches!(err, ResumeScorerError::InvalidContainer(_)));
    }

    #[test]
    fn test_repair_glyphs() {
        assert_eq!(repair_glyphs("e\u{FB03}cient"), "efficient");
        assert_eq!(repair_glyphs("\u{2018}quoted\u{2019}"), "'quoted'");
    }
}
