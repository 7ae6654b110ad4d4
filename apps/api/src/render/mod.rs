// Document Renderer: structured resume → ATS-safe .docx package.
// Pure and deterministic; CPU-bound, so async callers run it inside
// tokio::task::spawn_blocking.

pub mod ats;
pub mod docx;
pub mod handlers;
pub mod layout;
pub mod typography;

use thiserror::Error;

use crate::models::ResumeDocument;
use typography::default_page_setup;

pub const FALLBACK_FILE_NAME: &str = "resume_optimized.docx";
const FILE_SUFFIX: &str = "_optimized.docx";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("resume has no name and no sections; nothing to render")]
    Empty,

    #[error("package could not be written: {0}")]
    Package(#[from] zip::result::ZipError),

    #[error("package I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("document violates the ATS format contract: {0}")]
    Contract(String),
}

/// The finished binary artifact and its suggested download name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub file_name: String,
}

/// Lays out, writes and verifies the package. Nothing is returned unless the
/// written bytes pass the format contract.
pub fn render(doc: &ResumeDocument) -> Result<RenderedDocument, RenderError> {
    let page = default_page_setup();
    let blocks = layout::build_blocks(doc)?;
    let bytes = docx::write_package(&blocks, &page, doc.name.trim())?;
    ats::verify_package(&bytes, &page)?;

    Ok(RenderedDocument {
        bytes,
        file_name: file_name_for(&doc.name),
    })
}

/// `Jane  Q Doe` → `Jane_Q_Doe_optimized.docx`; characters unsafe in file
/// names are dropped, and an empty result falls back to `resume_optimized.docx`.
pub fn file_name_for(name: &str) -> String {
    let stem: String = name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| !c.is_control() && !matches!(c, '"' | '\\' | '/' | ':' | '*' | '?' | '<' | '>' | '|'))
        .collect();

    if stem.trim_matches('_').is_empty() {
        FALLBACK_FILE_NAME.to_string()
    } else {
        format!("{stem}{FILE_SUFFIX}")
    }
}
