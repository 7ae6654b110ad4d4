//! OOXML package writer.
//!
//! Builds every part as a string and zips them in a fixed order with a fixed
//! timestamp, so identical blocks always produce identical bytes.

use std::io::{Cursor, Write};

use quick_xml::escape::escape;
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::CompressionMethod;

use super::layout::{Alignment, Block, Run};
use super::typography::{
    PageSetup, BODY_SIZE, BULLET_HANGING, BULLET_INDENT, BULLET_MARKER, BULLET_SPACING_AFTER,
    FONT, HEADING_SIZE, HEADING_SPACING_AFTER, HEADING_SPACING_BEFORE, SPACER_SPACING_AFTER,
};
use super::RenderError;

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const PKG_REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// Bullet list numbering instance referenced by every bullet paragraph.
const BULLET_NUM_ID: u32 = 1;
const HEADING_STYLE: &str = "Heading2";

pub const DOCUMENT_PART: &str = "word/document.xml";

/// Writes the complete `.docx` package.
pub fn write_package(
    blocks: &[Block],
    page: &PageSetup,
    title: &str,
) -> Result<Vec<u8>, RenderError> {
    let parts: [(&str, String); 8] = [
        ("[Content_Types].xml", content_types_xml()),
        ("_rels/.rels", package_rels_xml()),
        ("docProps/app.xml", app_xml()),
        ("docProps/core.xml", core_xml(title)),
        (DOCUMENT_PART, document_xml(blocks, page)),
        ("word/_rels/document.xml.rels", document_rels_xml()),
        ("word/numbering.xml", numbering_xml()),
        ("word/styles.xml", styles_xml()),
    ];

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(zip::DateTime::default());

    for (path, contents) in &parts {
        zip.start_file(*path, options)?;
        zip.write_all(contents.as_bytes())?;
    }

    Ok(zip.finish()?.into_inner())
}

// ────────────────────────────────────────────────────────────────────────────
// word/document.xml
// ────────────────────────────────────────────────────────────────────────────

pub fn document_xml(blocks: &[Block], page: &PageSetup) -> String {
    let mut xml = String::with_capacity(4096);
    xml.push_str(XML_DECL);
    xml.push_str(&format!(r#"<w:document xmlns:w="{W_NS}" xmlns:r="{REL_NS}"><w:body>"#));

    for block in blocks {
        match block {
            Block::Heading(text) => {
                xml.push_str("<w:p><w:pPr>");
                xml.push_str(&format!(r#"<w:pStyle w:val="{HEADING_STYLE}"/>"#));
                push_spacing(&mut xml, HEADING_SPACING_BEFORE, HEADING_SPACING_AFTER);
                xml.push_str("</w:pPr>");
                push_run(&mut xml, text, true, true, HEADING_SIZE, None);
                xml.push_str("</w:p>");
            }
            Block::Paragraph {
                runs,
                alignment,
                spacing_before,
                spacing_after,
            } => {
                xml.push_str("<w:p><w:pPr>");
                push_spacing(&mut xml, *spacing_before, *spacing_after);
                if *alignment == Alignment::Center {
                    xml.push_str(r#"<w:jc w:val="center"/>"#);
                }
                xml.push_str("</w:pPr>");
                for Run {
                    text,
                    bold,
                    size,
                    color,
                } in runs
                {
                    push_run(&mut xml, text, *bold, false, *size, *color);
                }
                xml.push_str("</w:p>");
            }
            Block::Bullet(text) => {
                xml.push_str("<w:p><w:pPr>");
                xml.push_str(&format!(
                    r#"<w:numPr><w:ilvl w:val="0"/><w:numId w:val="{BULLET_NUM_ID}"/></w:numPr>"#
                ));
                push_spacing(&mut xml, 0, BULLET_SPACING_AFTER);
                xml.push_str("</w:pPr>");
                push_run(&mut xml, text, false, false, BODY_SIZE, None);
                xml.push_str("</w:p>");
            }
            Block::Spacer => {
                xml.push_str("<w:p><w:pPr>");
                push_spacing(&mut xml, 0, SPACER_SPACING_AFTER);
                xml.push_str("</w:pPr>");
                push_run(&mut xml, "", false, false, BODY_SIZE, None);
                xml.push_str("</w:p>");
            }
        }
    }

    xml.push_str(&format!(
        concat!(
            r#"<w:sectPr><w:pgSz w:w="{}" w:h="{}"/>"#,
            r#"<w:pgMar w:top="{}" w:right="{}" w:bottom="{}" w:left="{}" w:header="720" w:footer="720" w:gutter="0"/>"#,
            "</w:sectPr>"
        ),
        page.width,
        page.height,
        page.margin_top,
        page.margin_right,
        page.margin_bottom,
        page.margin_left,
    ));
    xml.push_str("</w:body></w:document>");
    xml
}

fn push_spacing(xml: &mut String, before: u32, after: u32) {
    xml.push_str(&format!(
        r#"<w:spacing w:before="{before}" w:after="{after}"/>"#
    ));
}

fn push_run(
    xml: &mut String,
    text: &str,
    bold: bool,
    underline: bool,
    size: u32,
    color: Option<&str>,
) {
    xml.push_str("<w:r><w:rPr>");
    xml.push_str(&fonts_xml());
    if bold {
        xml.push_str("<w:b/>");
    }
    if let Some(color) = color {
        xml.push_str(&format!(r#"<w:color w:val="{color}"/>"#));
    }
    xml.push_str(&format!(
        r#"<w:sz w:val="{size}"/><w:szCs w:val="{size}"/>"#
    ));
    if underline {
        xml.push_str(r#"<w:u w:val="single"/>"#);
    }
    xml.push_str("</w:rPr>");
    xml.push_str(&format!(
        r#"<w:t xml:space="preserve">{}</w:t></w:r>"#,
        escape_text(text)
    ));
}

fn fonts_xml() -> String {
    format!(r#"<w:rFonts w:ascii="{FONT}" w:hAnsi="{FONT}" w:eastAsia="{FONT}" w:cs="{FONT}"/>"#)
}

/// Drops characters XML 1.0 cannot carry, then escapes markup.
pub fn escape_text(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .filter(|&c| matches!(c, '\t' | '\n' | '\r') || (c >= ' ' && c != '\u{FFFE}' && c != '\u{FFFF}'))
        .collect();
    escape(cleaned.as_str()).into_owned()
}

// ────────────────────────────────────────────────────────────────────────────
// Supporting parts
// ────────────────────────────────────────────────────────────────────────────

fn styles_xml() -> String {
    let fonts = fonts_xml();
    format!(
        concat!(
            "{decl}",
            r#"<w:styles xmlns:w="{ns}">"#,
            "<w:docDefaults>",
            r#"<w:rPrDefault><w:rPr>{fonts}<w:sz w:val="{body}"/><w:szCs w:val="{body}"/></w:rPr></w:rPrDefault>"#,
            r#"<w:pPrDefault><w:pPr><w:spacing w:before="0" w:after="0"/></w:pPr></w:pPrDefault>"#,
            "</w:docDefaults>",
            r#"<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/>"#,
            r#"<w:rPr>{fonts}<w:sz w:val="{body}"/><w:szCs w:val="{body}"/></w:rPr></w:style>"#,
            r#"<w:style w:type="paragraph" w:styleId="{heading}"><w:name w:val="heading 2"/>"#,
            r#"<w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/>"#,
            r#"<w:pPr><w:keepNext/><w:outlineLvl w:val="1"/></w:pPr>"#,
            r#"<w:rPr>{fonts}<w:b/><w:sz w:val="{head}"/><w:szCs w:val="{head}"/></w:rPr></w:style>"#,
            "</w:styles>"
        ),
        decl = XML_DECL,
        ns = W_NS,
        fonts = fonts,
        body = BODY_SIZE,
        head = HEADING_SIZE,
        heading = HEADING_STYLE,
    )
}

fn numbering_xml() -> String {
    format!(
        concat!(
            "{decl}",
            r#"<w:numbering xmlns:w="{ns}">"#,
            r#"<w:abstractNum w:abstractNumId="0"><w:multiLevelType w:val="singleLevel"/>"#,
            r#"<w:lvl w:ilvl="0"><w:start w:val="1"/><w:numFmt w:val="bullet"/>"#,
            r#"<w:lvlText w:val="{marker}"/><w:lvlJc w:val="left"/>"#,
            r#"<w:pPr><w:ind w:left="{indent}" w:hanging="{hanging}"/></w:pPr>"#,
            r#"<w:rPr>{fonts}</w:rPr></w:lvl></w:abstractNum>"#,
            r#"<w:num w:numId="{num_id}"><w:abstractNumId w:val="0"/></w:num>"#,
            "</w:numbering>"
        ),
        decl = XML_DECL,
        ns = W_NS,
        marker = BULLET_MARKER,
        indent = BULLET_INDENT,
        hanging = BULLET_HANGING,
        fonts = fonts_xml(),
        num_id = BULLET_NUM_ID,
    )
}

fn content_types_xml() -> String {
    format!(
        concat!(
            "{decl}",
            r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
            r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
            r#"<Default Extension="xml" ContentType="application/xml"/>"#,
            r#"<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>"#,
            r#"<Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>"#,
            r#"<Override PartName="/word/numbering.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml"/>"#,
            r#"<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>"#,
            r#"<Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>"#,
            "</Types>"
        ),
        decl = XML_DECL
    )
}

fn package_rels_xml() -> String {
    format!(
        concat!(
            "{decl}",
            r#"<Relationships xmlns="{ns}">"#,
            r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>"#,
            r#"<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>"#,
            r#"<Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/>"#,
            "</Relationships>"
        ),
        decl = XML_DECL,
        ns = PKG_REL_NS
    )
}

fn document_rels_xml() -> String {
    format!(
        concat!(
            "{decl}",
            r#"<Relationships xmlns="{ns}">"#,
            r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#,
            r#"<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering" Target="numbering.xml"/>"#,
            "</Relationships>"
        ),
        decl = XML_DECL,
        ns = PKG_REL_NS
    )
}

fn core_xml(title: &str) -> String {
    format!(
        concat!(
            "{decl}",
            r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
            r#"xmlns:dc="http://purl.org/dc/elements/1.1/">"#,
            "<dc:title>{title}</dc:title><dc:creator>{title}</dc:creator>",
            "</cp:coreProperties>"
        ),
        decl = XML_DECL,
        title = escape_text(title)
    )
}

fn app_xml() -> String {
    format!(
        concat!(
            "{decl}",
            r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties">"#,
            "<Application>{app}</Application>",
            "</Properties>"
        ),
        decl = XML_DECL,
        app = env!("CARGO_PKG_NAME")
    )
}
