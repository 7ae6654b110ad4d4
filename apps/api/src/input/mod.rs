//! Upload text extraction: turns an uploaded resume file into plain text.
//!
//! Dispatch is by file extension first, then by declared MIME type. Parsing
//! is CPU-bound; async callers run `extract_text` inside `spawn_blocking`.

use std::panic::{catch_unwind, AssertUnwindSafe};

use thiserror::Error;

pub mod docx;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("unsupported file type '{0}'; upload a PDF, DOCX or TXT file")]
    Unsupported(String),

    #[error("failed to extract text from PDF: {0}")]
    Pdf(String),

    #[error("failed to extract text from DOCX: {0}")]
    Docx(String),

    #[error("text file is not valid UTF-8")]
    Encoding,

    #[error("no text could be extracted from the uploaded file")]
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    PlainText,
}

impl DocumentKind {
    pub fn from_extension(file_name: &str) -> Option<Self> {
        let (_, ext) = file_name.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "docx" => Some(DocumentKind::Docx),
            "txt" | "text" | "md" => Some(DocumentKind::PlainText),
            _ => None,
        }
    }

    pub fn from_mime(content_type: &str) -> Option<Self> {
        let essence = content_type.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "application/pdf" => Some(DocumentKind::Pdf),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                Some(DocumentKind::Docx)
            }
            "text/plain" | "text/markdown" => Some(DocumentKind::PlainText),
            _ => None,
        }
    }

    pub fn detect(file_name: Option<&str>, content_type: Option<&str>) -> Option<Self> {
        file_name
            .and_then(Self::from_extension)
            .or_else(|| content_type.and_then(Self::from_mime))
    }
}

/// Extracts trimmed plain text from an uploaded file.
pub fn extract_text(
    bytes: &[u8],
    file_name: Option<&str>,
    content_type: Option<&str>,
) -> Result<String, InputError> {
    let kind = DocumentKind::detect(file_name, content_type).ok_or_else(|| {
        InputError::Unsupported(
            file_name
                .or(content_type)
                .unwrap_or("unknown")
                .to_string(),
        )
    })?;

    let text = match kind {
        DocumentKind::Pdf => extract_pdf_text(bytes)?,
        DocumentKind::Docx => docx::extract_docx_text(bytes)?,
        DocumentKind::PlainText => {
            String::from_utf8(bytes.to_vec()).map_err(|_| InputError::Encoding)?
        }
    };

    let text = text.replace("\r\n", "\n");
    let text = text.trim();
    if text.is_empty() {
        return Err(InputError::Empty);
    }
    Ok(text.to_string())
}

/// pdf-extract panics on some malformed documents; a panic is reported as a PDF error.
fn extract_pdf_text(bytes: &[u8]) -> Result<String, InputError> {
    match catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes))) {
        Ok(result) => result.map_err(|e| InputError::Pdf(e.to_string())),
        Err(_) => Err(InputError::Pdf("the PDF could not be parsed".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_prefers_extension() {
        assert_eq!(
            DocumentKind::detect(Some("cv.PDF"), Some("text/plain")),
            Some(DocumentKind::Pdf)
        );
        assert_eq!(
            DocumentKind::detect(Some("resume"), Some("text/plain; charset=utf-8")),
            Some(DocumentKind::PlainText)
        );
        assert_eq!(DocumentKind::detect(Some("resume.doc"), None), None);
    }

    #[test]
    fn test_plain_text_is_trimmed() {
        let text = extract_text(b"  Jordan Lee\r\nAnalyst  \n", Some("cv.txt"), None).unwrap();
        assert_eq!(text, "Jordan Lee\nAnalyst");
    }

    #[test]
    fn test_invalid_utf8_is_rejected() {
        let err = extract_text(&[0xff, 0xfe, 0x00], Some("cv.txt"), None).unwrap_err();
        assert!(matches!(err, InputError::Encoding));
    }

    #[test]
    fn test_unsupported_type_is_rejected() {
        let err = extract_text(b"data", Some("cv.rtf"), Some("application/rtf")).unwrap_err();
        assert!(matches!(err, InputError::Unsupported(ref name) if name == "cv.rtf"));
    }

    #[test]
    fn test_blank_file_is_rejected() {
        let err = extract_text(b"   \n ", Some("cv.txt"), None).unwrap_err();
        assert!(matches!(err, InputError::Empty));
    }

    #[test]
    fn test_garbage_pdf_is_an_error() {
        let err = extract_text(b"not a pdf", Some("cv.pdf"), None).unwrap_err();
        assert!(matches!(err, InputError::Pdf(_)));
    }
}
