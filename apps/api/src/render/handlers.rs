//! Axum route handler for document download.

use axum::{
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::ResumeDocument;
use crate::render::{render, RenderedDocument};

pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Deserialize)]
pub struct DownloadRequest {
    pub rewritten_resume: ResumeDocument,
}

/// POST /api/v1/download
///
/// Renders the rewritten resume and returns it as a `.docx` attachment.
pub async fn handle_download(
    Json(request): Json<DownloadRequest>,
) -> Result<Response, AppError> {
    // CPU-bound packaging; keep it off the async executor.
    let rendered = tokio::task::spawn_blocking(move || render(&request.rewritten_resume))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in render: {e}")))??;

    info!(
        file_name = %rendered.file_name,
        bytes = rendered.bytes.len(),
        "Rendered resume document"
    );

    attachment(rendered)
}

fn attachment(rendered: RenderedDocument) -> Result<Response, AppError> {
    let disposition = format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        ascii_fallback(&rendered.file_name),
        percent_encode(&rendered.file_name)
    );
    let disposition = HeaderValue::from_str(&disposition).map_err(|e| {
        AppError::Internal(anyhow::anyhow!("invalid Content-Disposition header: {e}"))
    })?;
    let length = rendered.bytes.len();

    let mut response = rendered.bytes.into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(DOCX_MIME));
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(length));
    headers.insert(header::CONTENT_DISPOSITION, disposition);
    Ok(response)
}

/// Quoted-string safe: non-ASCII and quoting characters become `_`.
fn ascii_fallback(name: &str) -> String {
    name.chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// RFC 5987 `attr-char` encoding.
fn percent_encode(value: &str) -> String {
    let mut out = String::with_capacity(value.len() * 3);
    for byte in value.bytes() {
        if byte.is_ascii_alphanumeric() || b"!#$&+-.^_`|~".contains(&byte) {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_fallback_replaces_non_ascii() {
        assert_eq!(ascii_fallback("José_optimized.docx"), "Jos__optimized.docx");
        assert_eq!(ascii_fallback("a\"b.docx"), "a_b.docx");
    }

    #[test]
    fn test_percent_encode_utf8() {
        assert_eq!(percent_encode("José.docx"), "Jos%C3%A9.docx");
        assert_eq!(percent_encode("a b"), "a%20b");
    }

    #[test]
    fn test_non_ascii_name_still_gets_disposition() {
        let response = attachment(RenderedDocument {
            bytes: vec![0],
            file_name: "José\u{7f}_Müller_optimized.docx".to_string(),
        })
        .unwrap();
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap();
        assert!(disposition.starts_with("attachment; filename=\"Jos"));
        assert!(disposition.contains("filename*=UTF-8''Jos%C3%A9%7F_M%C3%BCller_optimized.docx"));
    }

    #[test]
    fn test_attachment_headers() {
        let response = attachment(RenderedDocument {
            bytes: vec![1, 2, 3, 4],
            file_name: "Jordan_Lee_optimized.docx".to_string(),
        })
        .unwrap();
        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_TYPE], DOCX_MIME);
        assert_eq!(headers[header::CONTENT_LENGTH], "4");
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Jordan_Lee_optimized.docx\"; filename*=UTF-8''Jordan_Lee_optimized.docx"
        );
    }
}
