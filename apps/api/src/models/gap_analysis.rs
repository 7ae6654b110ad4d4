//! Gap analysis produced by the second pipeline stage.

use serde::{Deserialize, Serialize};

use crate::scoring::CoverageScore;

/// A JD-preferred term the resume already covers under a different name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticGap {
    pub jd_term: String,
    pub resume_equivalent: String,
}

/// A missing skill paired with experience that plausibly transfers to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapBridge {
    pub missing_skill: String,
    pub transferable_experience: String,
}

/// Coverage of a `RequirementsProfile` by one resume.
///
/// `match_score.overall` is recomputed locally on decode; the value the model
/// reports is never trusted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapAnalysis {
    pub match_score: CoverageScore,
    pub matched_keywords: Vec<String>,
    pub keyword_gaps: Vec<String>,
    pub semantic_gaps: Vec<SemanticGap>,
    pub over_indexed: Vec<String>,
    pub missing_context: Vec<String>,
    pub gap_bridges: Vec<GapBridge>,
}
