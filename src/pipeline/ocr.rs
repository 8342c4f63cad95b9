//! OCR extraction
//!
//! Image content enters the pipeline as plain text recovered by an OCR
//! engine. OCR is strictly best-effort: any failure yields an empty string
//! and the surrounding document continues processing.

use std::io::Write;
use std::process::{Command, Stdio};

/// Best-effort text extraction from image bytes
pub trait OcrEngine: Send + Sync {
    /// Extract text from an image, returning `""` on any failure
    fn extract_text(&self, image: &[u8]) -> String;
}

/// Shells out to the `tesseract` binary (`tesseract stdin stdout`)
///
/// Missing binary, non-zero exit, or undecodable output all collapse to an
/// empty string; the cause is logged at debug level only.
pub struct TesseractOcr {
    language: String,
}

impl TesseractOcr {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
        }
    }

    fn run(&self, image: &[u8]) -> std::io::Result<String> {
        let mut child = Command::new("tesseract")
            .args(["stdin", "stdout", "-l", &self.language])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;

        if let Some(stdin) = child.stdin.as_mut() {
            stdin.write_all(image)?;
        }
        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("tesseract exited with {}", output.status),
            ));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl OcrEngine for TesseractOcr {
    fn extract_text(&self, image: &[u8]) -> String {
        match self.run(image) {
            Ok(text) => text,
            Err(e) => {
                tracing::debug!(error = %e, "OCR extraction failed, continuing without text");
                String::new()
            }
        }
    }
}

/// OCR engine that extracts nothing, for tests and OCR-less deployments
pub struct NullOcr;

impl OcrEngine for NullOcr {
    fn extract_text(&self, _image: &[u8]) -> String {
        String::new()
    }
}

/// Canned engine for pipeline tests
#[cfg(test)]
pub(crate) struct FixedOcr(pub &'static str);

#[cfg(test)]
impl OcrEngine for FixedOcr {
    fn extract_text(&self, _image: &[u8]) -> String {
        self.0.to_string()
    }
}
