//! Resume text extraction: turns an uploaded blob into normalized plain text.
//!
//! Failure policy: any parse failure collapses to `ExtractedText::Empty`.
//! Callers branch on emptiness; no error type leaves this module. Image-only
//! (scanned) PDFs therefore come out `Empty`, since there is no OCR here.

use std::panic::{catch_unwind, AssertUnwindSafe};

use bytes::Bytes;
use tracing::warn;

/// Declared media type of an uploaded resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Pdf,
    Text,
}

impl MediaType {
    /// Derives the media type from the multipart part's declared content type,
    /// falling back to the filename extension. Anything unrecognized is
    /// treated as plain text.
    pub fn infer(content_type: Option<&str>, filename: Option<&str>) -> Self {
        if content_type.is_some_and(|ct| ct.eq_ignore_ascii_case("application/pdf")) {
            return MediaType::Pdf;
        }
        if filename.is_some_and(|name| name.to_ascii_lowercase().ends_with(".pdf")) {
            return MediaType::Pdf;
        }
        MediaType::Text
    }
}

/// An uploaded resume document. Exists only for the duration of one analyze
/// request; owned by the handler that received it.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub content: Bytes,
    pub media_type: MediaType,
}

/// Outcome of extraction. `Empty` covers both "the document contains no text"
/// and "the document could not be parsed"; downstream treats them the same.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractedText {
    /// Non-empty, whitespace-trimmed text.
    Text(String),
    Empty,
}

impl ExtractedText {
    fn from_raw(raw: String) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            ExtractedText::Empty
        } else {
            ExtractedText::Text(trimmed.to_string())
        }
    }
}

/// Extracts normalized text from an uploaded document.
///
/// PDF: page text concatenated in document order, then trimmed.
/// Text: lossy UTF-8 decode (undecodable sequences replaced, never fatal),
/// then trimmed.
pub fn extract_text(document: &UploadedDocument) -> ExtractedText {
    match document.media_type {
        MediaType::Pdf => extract_pdf(&document.content),
        MediaType::Text => {
            ExtractedText::from_raw(String::from_utf8_lossy(&document.content).into_owned())
        }
    }
}

/// `pdf-extract` panics on some degenerate documents (a structurally valid
/// page with no MediaBox, for one) instead of returning `Err`. The unwind is
/// contained here so every unreadable document maps to `Empty`.
fn extract_pdf(bytes: &[u8]) -> ExtractedText {
    match catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes))) {
        Ok(Ok(text)) => ExtractedText::from_raw(text),
        Ok(Err(e)) => {
            warn!("PDF extraction failed: {e}");
            ExtractedText::Empty
        }
        Err(_) => {
            warn!("PDF extraction panicked on a malformed document");
            ExtractedText::Empty
        }
    }
}
