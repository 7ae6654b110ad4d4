//! After-rewrite score projection: pluggable, trait-based.
//!
//! Default: `RescoringProjector` (deterministic keyword coverage of the rewritten resume).
//! Alternative: `RandomizedProjector` (bounded random uplift, seedable for tests).
//!
//! Both only ever raise a category, and both build the result through
//! `CoverageScore::new`, so `overall` always comes from `compose`.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::CoverageScore;
use crate::models::{RequirementsProfile, ResumeDocument};

/// Everything a projector may look at.
pub struct ProjectionInput<'a> {
    pub before: CoverageScore,
    pub requirements: &'a RequirementsProfile,
    pub resume: &'a ResumeDocument,
}

/// Carried in `Pipeline` as `Arc<dyn ScoreProjector>`.
pub trait ScoreProjector: Send + Sync {
    fn project(&self, input: &ProjectionInput<'_>) -> CoverageScore;

    /// Label reported in logs, e.g. "rescore" | "randomized".
    fn backend(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// RescoringProjector (default)
// ────────────────────────────────────────────────────────────────────────────

/// Measures how many requirements of each category the rewritten resume
/// evidences, and keeps the higher of that and the "before" figure.
///
/// Per requirement:
/// - whole phrase found as a contiguous token sequence → 1.0
/// - at least half of its significant words found → 0.6
/// - otherwise → 0.0
///
/// category = Σ strength / count × 100. An empty category keeps its "before" value.
pub struct RescoringProjector;

impl ScoreProjector for RescoringProjector {
    fn project(&self, input: &ProjectionInput<'_>) -> CoverageScore {
        let text = input
            .resume
            .raw_text
            .clone()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| input.resume.plain_text())
            .to_lowercase();
        let tokens = tokenize(&text);
        let words = significant_words(&tokens);

        let hard = rescore(&input.requirements.hard_requirements, &tokens, &words);
        let tools = rescore(&input.requirements.tools_and_platforms, &tokens, &words);
        let soft = rescore(&input.requirements.soft_requirements, &tokens, &words);

        CoverageScore::new(
            hard.map_or(input.before.hard_skill(), |v| v.max(input.before.hard_skill())),
            tools.map_or(input.before.tools(), |v| v.max(input.before.tools())),
            soft.map_or(input.before.soft_skill(), |v| v.max(input.before.soft_skill())),
        )
    }

    fn backend(&self) -> &'static str {
        "rescore"
    }
}

fn rescore(requirements: &[String], tokens: &[String], words: &[String]) -> Option<u8> {
    if requirements.is_empty() {
        return None;
    }

    let total: f64 = requirements
        .iter()
        .map(|req| requirement_strength(req, tokens, words))
        .sum();

    Some(((total / requirements.len() as f64) * 100.0).round().clamp(0.0, 100.0) as u8)
}

/// Matches on whole tokens only, so "R" or "Go" never hit inside "Managed" or "good".
fn requirement_strength(requirement: &str, tokens: &[String], words: &[String]) -> f64 {
    let phrase = tokenize(&requirement.to_lowercase());
    if phrase.is_empty() {
        return 0.0;
    }
    if tokens.windows(phrase.len()).any(|window| window == phrase.as_slice()) {
        return 1.0;
    }

    let wanted = significant_words(&phrase);
    if wanted.is_empty() {
        return 0.0;
    }
    let found = wanted.iter().filter(|w| words.contains(w)).count();
    if found * 2 >= wanted.len() {
        0.6
    } else {
        0.0
    }
}

const STOPWORDS: &[&str] = &[
    "and", "for", "the", "with", "years", "year", "experience", "of", "in", "to", "or", "a",
    "an", "plus", "strong", "ability",
];

/// Lowercase input split on anything but alphanumerics, `+` and `#` (keeps "c++", "c#").
fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#'))
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

fn significant_words(tokens: &[String]) -> Vec<String> {
    tokens
        .iter()
        .filter(|w| !STOPWORDS.contains(&w.as_str()))
        .cloned()
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// RandomizedProjector
// ────────────────────────────────────────────────────────────────────────────

/// Adds a bounded random uplift to each category, capped at 100:
/// hard skills +15..=25, tools +12..=22, soft skills +10..=18.
pub struct RandomizedProjector {
    rng: Mutex<StdRng>,
}

impl RandomizedProjector {
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    #[cfg(test)]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl ScoreProjector for RandomizedProjector {
    fn project(&self, input: &ProjectionInput<'_>) -> CoverageScore {
        let before = input.before;
        let (hard, tools, soft) = {
            // A poisoned lock still holds a usable generator.
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            (
                rng.gen_range(15..=25u8),
                rng.gen_range(12..=22u8),
                rng.gen_range(10..=18u8),
            )
        };

        CoverageScore::new(
            before.hard_skill().saturating_add(hard).min(100),
            before.tools().saturating_add(tools).min(100),
            before.soft_skill().saturating_add(soft).min(100),
        )
    }

    fn backend(&self) -> &'static str {
        "randomized"
    }
}
