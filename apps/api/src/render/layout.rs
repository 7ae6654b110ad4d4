//! Block layout: turns a `ResumeDocument` into the ordered paragraphs of the page.
//!
//! Order: name, contact, spacer, profile (heading + body + spacer), then each
//! section (heading + content + spacer). Bullets are emitted one per input
//! string, in input order; nothing is merged or reordered.

use super::typography::{
    BODY_SIZE, BODY_SPACING_AFTER, COMPANY_SPACING_AFTER, ENTRY_SPACING_BEFORE, MUTED_COLOR,
    NAME_SIZE,
};
use super::RenderError;
use crate::models::{ExperienceEntry, ResumeDocument, SectionContent};

pub const NAME_FALLBACK: &str = "Full Name";
pub const PROFILE_HEADING: &str = "PROFESSIONAL PROFILE";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
}

/// A single formatted text run. Text never contains line breaks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub text: String,
    pub bold: bool,
    pub size: u32,
    pub color: Option<&'static str>,
}

impl Run {
    pub fn plain(text: &str) -> Self {
        Self {
            text: single_line(text),
            bold: false,
            size: BODY_SIZE,
            color: None,
        }
    }

    pub fn bold(text: &str, size: u32) -> Self {
        Self {
            text: single_line(text),
            bold: true,
            size,
            color: None,
        }
    }

    /// Taken verbatim so leading separators keep their spacing.
    fn muted(text: String) -> Self {
        Self {
            text,
            bold: false,
            size: BODY_SIZE,
            color: Some(MUTED_COLOR),
        }
    }
}

/// One block of the page. Only headings, paragraphs and single-level bullets exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Section heading; rendered bold, underlined, at heading size.
    Heading(String),
    Paragraph {
        runs: Vec<Run>,
        alignment: Alignment,
        spacing_before: u32,
        spacing_after: u32,
    },
    /// One bulleted paragraph at body size.
    Bullet(String),
    Spacer,
}

impl Block {
    fn body(text: &str) -> Self {
        Block::Paragraph {
            runs: vec![Run::plain(text)],
            alignment: Alignment::Left,
            spacing_before: 0,
            spacing_after: BODY_SPACING_AFTER,
        }
    }

    /// The block's visible text, runs concatenated.
    #[cfg(test)]
    pub fn text(&self) -> String {
        match self {
            Block::Heading(text) | Block::Bullet(text) => text.clone(),
            Block::Paragraph { runs, .. } => runs.iter().map(|r| r.text.as_str()).collect(),
            Block::Spacer => String::new(),
        }
    }
}

/// Lays out the whole document.
pub fn build_blocks(doc: &ResumeDocument) -> Result<Vec<Block>, RenderError> {
    let name = doc.name.trim();
    if name.is_empty() && doc.sections.is_empty() {
        return Err(RenderError::Empty);
    }

    let mut blocks = Vec::new();

    blocks.push(Block::Paragraph {
        runs: vec![Run::bold(
            if name.is_empty() { NAME_FALLBACK } else { name },
            NAME_SIZE,
        )],
        alignment: Alignment::Center,
        spacing_before: 0,
        spacing_after: 0,
    });

    if !doc.contact.trim().is_empty() {
        blocks.push(Block::Paragraph {
            runs: vec![Run::plain(&doc.contact)],
            alignment: Alignment::Center,
            spacing_before: 0,
            spacing_after: 0,
        });
    }
    blocks.push(Block::Spacer);

    if !doc.profile.trim().is_empty() {
        blocks.push(Block::Heading(PROFILE_HEADING.to_string()));
        blocks.push(Block::body(&doc.profile));
        blocks.push(Block::Spacer);
    }

    for section in &doc.sections {
        blocks.push(Block::Heading(single_line(&section.title).to_uppercase()));
        match &section.content {
            SectionContent::Experience(entries) => {
                for entry in entries {
                    push_entry(&mut blocks, entry);
                }
            }
            SectionContent::FreeText(text) => push_free_text(&mut blocks, text),
        }
        blocks.push(Block::Spacer);
    }

    Ok(blocks)
}

/// Title line, company/date line, then one bullet per input bullet.
fn push_entry(blocks: &mut Vec<Block>, entry: &ExperienceEntry) {
    blocks.push(Block::Paragraph {
        runs: vec![Run::bold(&entry.title, BODY_SIZE)],
        alignment: Alignment::Left,
        spacing_before: ENTRY_SPACING_BEFORE,
        spacing_after: 0,
    });

    let mut runs = vec![Run::plain(&entry.company)];
    let dates = single_line(&entry.dates);
    if !dates.is_empty() {
        runs.push(Run::muted(format!("  |  {dates}")));
    }
    blocks.push(Block::Paragraph {
        runs,
        alignment: Alignment::Left,
        spacing_before: 0,
        spacing_after: COMPANY_SPACING_AFTER,
    });

    for bullet in &entry.bullets {
        blocks.push(Block::Bullet(without_breaks(bullet)));
    }
}

/// One block per non-empty line; `•`/`-` lines become bullets with the marker stripped.
fn push_free_text(blocks: &mut Vec<Block>, text: &str) {
    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        match line.strip_prefix('•').or_else(|| line.strip_prefix('-')) {
            Some(rest) => {
                let rest = rest.trim_start();
                if !rest.is_empty() {
                    blocks.push(Block::Bullet(rest.to_string()));
                }
            }
            None => blocks.push(Block::body(line)),
        }
    }
}

/// Collapses internal line breaks and runs of whitespace to single spaces.
fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Replaces each line break with a space and leaves all other characters as given.
fn without_breaks(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

/// Visible text, one line per non-spacer block.
#[cfg(test)]
pub fn plain_text(blocks: &[Block]) -> String {
    blocks
        .iter()
        .filter(|b| !matches!(b, Block::Spacer))
        .map(Block::text)
        .collect::<Vec<_>>()
        .join("\n")
}
