//! DOCX text extraction: paragraph text of `word/document.xml`, in order.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use super::InputError;

const DOCUMENT_PART: &str = "word/document.xml";

pub fn extract_docx_text(bytes: &[u8]) -> Result<String, InputError> {
    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).map_err(|e| InputError::Docx(e.to_string()))?;
    let mut xml = Vec::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| InputError::Docx(format!("{DOCUMENT_PART}: {e}")))?
        .read_to_end(&mut xml)
        .map_err(|e| InputError::Docx(e.to_string()))?;

    Ok(paragraph_texts(&xml)?.join("\n"))
}

/// Text of every `w:p`, one entry per paragraph (empty paragraphs included).
/// Tabs and breaks inside a paragraph become `\t` and `\n`.
pub fn paragraph_texts(xml: &[u8]) -> Result<Vec<String>, InputError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut paragraphs = Vec::new();
    let mut current: Option<String> = None;
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"p" => current = Some(String::new()),
                b"t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"p" => paragraphs.push(String::new()),
                b"tab" => push_into(&mut current, "\t"),
                b"br" | b"cr" => push_into(&mut current, "\n"),
                _ => {}
            },
            Ok(Event::Text(ref e)) => {
                if in_text {
                    let text = e.unescape().map_err(|e| InputError::Docx(e.to_string()))?;
                    push_into(&mut current, &text);
                }
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"p" => {
                    if let Some(text) = current.take() {
                        paragraphs.push(text);
                    }
                }
                b"t" => in_text = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(InputError::Docx(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(paragraphs)
}

fn push_into(current: &mut Option<String>, text: &str) {
    if let Some(paragraph) = current {
        paragraph.push_str(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::{SimpleFileOptions, ZipWriter};

    const XML: &str = concat!(
        r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>"#,
        r#"<w:p><w:r><w:t>Jordan Lee</w:t></w:r></w:p>"#,
        r#"<w:p/>"#,
        r#"<w:p><w:r><w:t xml:space="preserve">Acme  </w:t></w:r><w:r><w:t>&amp; Co</w:t><w:tab/><w:t>2019</w:t></w:r></w:p>"#,
        r#"</w:body></w:document>"#
    );

    #[test]
    fn test_paragraph_texts_in_order() {
        let paragraphs = paragraph_texts(XML.as_bytes()).unwrap();
        assert_eq!(paragraphs, vec!["Jordan Lee", "", "Acme  & Co\t2019"]);
    }

    #[test]
    fn test_extract_from_package() {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file(DOCUMENT_PART, SimpleFileOptions::default())
            .unwrap();
        zip.write_all(XML.as_bytes()).unwrap();
        let bytes = zip.finish().unwrap().into_inner();

        let text = extract_docx_text(&bytes).unwrap();
        assert_eq!(text, "Jordan Lee\n\nAcme  & Co\t2019");
    }

    #[test]
    fn test_package_without_document_part_fails() {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file("other.xml", SimpleFileOptions::default())
            .unwrap();
        zip.write_all(b"<x/>").unwrap();
        let bytes = zip.finish().unwrap().into_inner();

        assert!(matches!(
            extract_docx_text(&bytes),
            Err(InputError::Docx(_))
        ));
    }
}
