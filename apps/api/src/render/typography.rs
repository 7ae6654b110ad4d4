//! Fixed typography and page geometry for rendered resumes.
//!
//! Sizes are in half-points (the unit OOXML `w:sz` uses); lengths in twips
//! (1/20 pt, 1440 per inch).

use serde::Serialize;

// ────────────────────────────────────────────────────────────────────────────
// Typeface and sizes
// ────────────────────────────────────────────────────────────────────────────

/// The single typeface used for every run.
pub const FONT: &str = "Calibri";

/// Body and contact text, 11pt.
pub const BODY_SIZE: u32 = 22;
/// Section headings, 12pt.
pub const HEADING_SIZE: u32 = 24;
/// Candidate name, 18pt.
pub const NAME_SIZE: u32 = 36;

/// Every size the renderer may emit.
pub const ALLOWED_SIZES: [u32; 3] = [BODY_SIZE, HEADING_SIZE, NAME_SIZE];

/// De-emphasis colour for the date run on a company line.
pub const MUTED_COLOR: &str = "666666";

// ────────────────────────────────────────────────────────────────────────────
// Paragraph spacing (twips)
// ────────────────────────────────────────────────────────────────────────────

pub const HEADING_SPACING_BEFORE: u32 = 120;
pub const HEADING_SPACING_AFTER: u32 = 60;
/// Gap above each experience title line; separates roles visually.
pub const ENTRY_SPACING_BEFORE: u32 = 600;
pub const COMPANY_SPACING_AFTER: u32 = 80;
pub const BODY_SPACING_AFTER: u32 = 60;
pub const BULLET_SPACING_AFTER: u32 = 80;
pub const SPACER_SPACING_AFTER: u32 = 80;

/// Bullet indentation: text indent and hanging indent for the marker.
pub const BULLET_INDENT: u32 = 360;
pub const BULLET_HANGING: u32 = 360;
pub const BULLET_MARKER: &str = "•";

// ────────────────────────────────────────────────────────────────────────────
// Page geometry
// ────────────────────────────────────────────────────────────────────────────

/// Page size and margins, in twips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageSetup {
    pub width: u32,
    pub height: u32,
    pub margin_top: u32,
    pub margin_right: u32,
    pub margin_bottom: u32,
    pub margin_left: u32,
}

/// US Letter (8.5" × 11") with 1" margins all round.
pub fn default_page_setup() -> PageSetup {
    PageSetup {
        width: 12240,
        height: 15840,
        margin_top: 1440,
        margin_right: 1440,
        margin_bottom: 1440,
        margin_left: 1440,
    }
}

impl PageSetup {
    /// Usable text width between the side margins.
    #[cfg(test)]
    pub fn text_width(&self) -> u32 {
        self.width - self.margin_left - self.margin_right
    }
}
