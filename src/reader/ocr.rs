//! OCR fallback for scanned PDFs
//!
//! Rasterizes PDF pages with `pdftoppm` and recognizes them with the
//! `tesseract` CLI. Both binaries are probed once at engine construction;
//! when either is missing the engine reports unavailable and the reader
//! skips straight to its no-OCR failure path.

use crate::error::{Result, ResumeScorerError};
use log::{debug, warn};
use std::path::Path;
use std::process::Command;

pub struct OcrEngine {
    available: bool,
}

impl OcrEngine {
    /// Probe for the external OCR toolchain.
    pub fn detect() -> Self {
        let available = binary_responds("pdftoppm", "-v") && binary_responds("tesseract", "--version");
        if !available {
            debug!("pdftoppm/tesseract not found, OCR fallback disabled");
        }
        Self { available }
    }

    #[cfg(test)]
    pub fn disabled() -> Self {
        Self { available: false }
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Rasterize each page and run character recognition, concatenating page
    /// results with newlines. CPU/IO heavy; blocks until every page is done.
    pub fn recognize_pdf(&self, bytes: &[u8]) -> Result<String> {
        if !self.available {
            return Err(ResumeScorerError::ExtractionFailed(
                "OCR toolchain unavailable".to_string(),
            ));
        }

        let workdir = tempfile::tempdir()?;
        let pdf_path = workdir.path().join("input.pdf");
        std::fs::write(&pdf_path, bytes)?;

        let status = Command::new("pdftoppm")
            .arg("-r")
            .arg("300")
            .arg("-png")
            .arg(&pdf_path)
            .arg(workdir.path().join("page"))
            .status()
            .map_err(|e| ResumeScorerError::ExtractionFailed(format!("pdftoppm failed: {}", e)))?;
        if !status.success() {
            return Err(ResumeScorerError::ExtractionFailed(format!(
                "pdftoppm exited with {}",
                status
            )));
        }

        let mut pages: Vec<_> = std::fs::read_dir(workdir.path())?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "png"))
            .collect();
        pages.sort();

        let mut text = String::new();
        for page in &pages {
            match recognize_page(page) {
                Ok(page_text) => {
                    text.push_str(&page_text);
                    text.push('\n');
                }
                Err(e) => warn!("OCR failed on {}: {}", page.display(), e),
            }
        }

        debug!("OCR recognized {} chars over {} pages", text.len(), pages.len());
        Ok(text)
    }
}

fn recognize_page(image: &Path) -> Result<String> {
    let output = Command::new("tesseract")
        .arg(image)
        .arg("stdout")
        .output()
        .map_err(|e| ResumeScorerError::ExtractionFailed(format!("tesseract failed: {}", e)))?;
    if !output.status.success() {
        return Err(ResumeScorerError::ExtractionFailed(format!(
            "tesseract exited with {}",
            output.status
        )));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn binary_responds(name: &str, probe_arg: &str) -> bool {
    Command::new(name)
        .arg(probe_arg)
        .output()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_engine_refuses_work() {
        let engine = OcrEngine::disabled();
        assert!(!engine.is_available());
        let err = engine.recognize_pdf(b"%PDF-1.4").unwrap_err();
        assert!(matches!(err, ResumeScorerError::ExtractionFailed(_)));
    }
}
