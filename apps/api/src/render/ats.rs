//! ATS format contract: checks a written package before it leaves the renderer.
//!
//! # Contract rules
//! - only paragraphs, runs and bullets: no tables, text boxes, drawings, frames or embedded objects
//! - every run uses the single typeface
//! - every run size is one of body / heading / name
//! - page geometry matches the fixed page setup

use std::io::{Cursor, Read};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use zip::ZipArchive;

use super::docx::DOCUMENT_PART;
use super::typography::{PageSetup, ALLOWED_SIZES, FONT};
use super::RenderError;

/// Element local names that are never allowed in the document body.
const FORBIDDEN_ELEMENTS: &[&[u8]] = &[
    b"tbl",
    b"txbxContent",
    b"drawing",
    b"pict",
    b"object",
    b"framePr",
];

const REQUIRED_PARTS: &[&str] = &[
    "[Content_Types].xml",
    "_rels/.rels",
    "word/_rels/document.xml.rels",
    DOCUMENT_PART,
    "word/styles.xml",
    "word/numbering.xml",
];

/// Re-opens the package and verifies its structure and main document part.
pub fn verify_package(bytes: &[u8], page: &PageSetup) -> Result<(), RenderError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    for part in REQUIRED_PARTS {
        if archive.by_name(part).is_err() {
            return Err(RenderError::Contract(format!("package is missing {part}")));
        }
    }

    let mut xml = Vec::new();
    archive.by_name(DOCUMENT_PART)?.read_to_end(&mut xml)?;
    verify_document_xml(&xml, page)
}

/// Walks `word/document.xml` and rejects anything outside the contract.
pub fn verify_document_xml(xml: &[u8], page: &PageSetup) -> Result<(), RenderError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut saw_page_size = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                let name = e.local_name();
                let name = name.as_ref();

                if FORBIDDEN_ELEMENTS.iter().any(|f| *f == name) {
                    return Err(RenderError::Contract(format!(
                        "forbidden element <w:{}>",
                        String::from_utf8_lossy(name)
                    )));
                }

                match name {
                    b"rFonts" => {
                        let font = get_attr(e, b"w:ascii").unwrap_or_default();
                        if font != FONT {
                            return Err(RenderError::Contract(format!(
                                "run font '{font}' is not {FONT}"
                            )));
                        }
                    }
                    b"sz" | b"szCs" => {
                        let size = get_attr(e, b"w:val")
                            .and_then(|v| v.parse::<u32>().ok())
                            .unwrap_or_default();
                        if !ALLOWED_SIZES.contains(&size) {
                            return Err(RenderError::Contract(format!(
                                "run size {size} is outside the fixed size set"
                            )));
                        }
                    }
                    b"pgSz" => {
                        let width = get_attr(e, b"w:w");
                        let height = get_attr(e, b"w:h");
                        if width != Some(page.width.to_string())
                            || height != Some(page.height.to_string())
                        {
                            return Err(RenderError::Contract(format!(
                                "page size {width:?}x{height:?} is not {}x{}",
                                page.width, page.height
                            )));
                        }
                        saw_page_size = true;
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(RenderError::Contract(format!(
                    "document.xml is not well-formed at {}: {e}",
                    reader.buffer_position()
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    if !saw_page_size {
        return Err(RenderError::Contract("document has no page size".to_string()));
    }
    Ok(())
}

fn get_attr(e: &BytesStart, name: &[u8]) -> Option<String> {
    e.attributes()
        .filter_map(|a| a.ok())
        .find(|a| a.key.as_ref() == name)
        .and_then(|a| String::from_utf8(a.value.to_vec()).ok())
}
