//! Score Composer: deterministic weighted coverage arithmetic.
//!
//! `compose` is the only way an overall figure is ever produced. Category
//! scores coming off the wire are clamped and rounded; any `overall` the model
//! reports is ignored and recomputed.

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

pub mod projection;

pub use projection::{ProjectionInput, RandomizedProjector, RescoringProjector, ScoreProjector};

/// Category weights, in percent. They sum to 100.
pub const HARD_SKILL_WEIGHT: u32 = 50;
pub const TOOLS_WEIGHT: u32 = 30;
pub const SOFT_SKILL_WEIGHT: u32 = 20;

/// `round(hard*0.5 + tools*0.3 + soft*0.2)`, clamped to 0..=100.
///
/// Integer arithmetic: the weighted sum is in hundredths, so adding 50 before
/// dividing rounds half up without float error.
pub fn compose(hard: u8, tools: u8, soft: u8) -> u8 {
    let weighted = u32::from(hard) * HARD_SKILL_WEIGHT
        + u32::from(tools) * TOOLS_WEIGHT
        + u32::from(soft) * SOFT_SKILL_WEIGHT;
    ((weighted + 50) / 100).min(100) as u8
}

/// Coverage of the three requirement categories plus their composed overall.
///
/// Fields are private so `overall` can only ever come from `compose`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "CoverageScoreWire")]
pub struct CoverageScore {
    hard_skill: u8,
    tools: u8,
    soft_skill: u8,
    overall: u8,
}

impl CoverageScore {
    pub fn new(hard_skill: u8, tools: u8, soft_skill: u8) -> Self {
        let hard_skill = hard_skill.min(100);
        let tools = tools.min(100);
        let soft_skill = soft_skill.min(100);
        Self {
            hard_skill,
            tools,
            soft_skill,
            overall: compose(hard_skill, tools, soft_skill),
        }
    }

    pub fn hard_skill(&self) -> u8 {
        self.hard_skill
    }

    pub fn tools(&self) -> u8 {
        self.tools
    }

    pub fn soft_skill(&self) -> u8 {
        self.soft_skill
    }

    pub fn overall(&self) -> u8 {
        self.overall
    }

    /// True when no category of `self` is below the same category of `other`.
    #[cfg(test)]
    pub fn dominates(&self, other: &CoverageScore) -> bool {
        self.hard_skill >= other.hard_skill
            && self.tools >= other.tools
            && self.soft_skill >= other.soft_skill
    }
}

#[derive(Deserialize)]
struct CoverageScoreWire {
    #[serde(deserialize_with = "de_percent")]
    hard_skill: u8,
    #[serde(deserialize_with = "de_percent")]
    tools: u8,
    #[serde(deserialize_with = "de_percent")]
    soft_skill: u8,
    #[serde(default)]
    overall: Option<f64>,
}

impl From<CoverageScoreWire> for CoverageScore {
    fn from(wire: CoverageScoreWire) -> Self {
        let score = CoverageScore::new(wire.hard_skill, wire.tools, wire.soft_skill);
        if let Some(reported) = wire.overall {
            if (reported.round() - f64::from(score.overall)).abs() >= 1.0 {
                warn!(
                    reported,
                    recomputed = score.overall,
                    "Reported overall score disagrees with weighted composition; using recomputed value"
                );
            }
        }
        score
    }
}

/// Accepts integer or decimal percentages, clamps to 0..=100 and rounds.
fn de_percent<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    if !raw.is_finite() {
        return Err(serde::de::Error::custom("score must be a finite number"));
    }
    Ok(raw.clamp(0.0, 100.0).round() as u8)
}
