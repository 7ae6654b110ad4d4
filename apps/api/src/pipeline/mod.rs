//! Tailoring pipeline: three sequential generation stages with typed contracts.
//!
//! requirements extraction → gap analysis → resume rewrite, each stage's typed
//! output interpolated into the next stage's prompt. Generation output is
//! untrusted: every reply goes through `extract::extract` before it is used.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::llm_client::LlmError;

pub mod contracts;
pub mod extract;
pub mod handlers;
pub mod orchestrator;
pub mod prompts;

#[cfg(test)]
pub mod fixtures;

pub use extract::ExtractionError;
pub use orchestrator::{CancelToken, Pipeline, PipelineInput};

/// One of the three ordered transformations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    RequirementsExtraction,
    GapAnalysis,
    ResumeRewrite,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::RequirementsExtraction => "requirements_extraction",
            Stage::GapAnalysis => "gap_analysis",
            Stage::ResumeRewrite => "resume_rewrite",
        }
    }

    /// Output budget for the stage's generation call.
    pub fn max_tokens(&self) -> u32 {
        match self {
            Stage::RequirementsExtraction => 2000,
            Stage::GapAnalysis => 3000,
            Stage::ResumeRewrite => 8000,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal pipeline failure. Every variant names the stage it happened in.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("input rejected: {0}")]
    Validation(String),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("{stage} generation call failed: {source}")]
    Upstream {
        stage: Stage,
        #[source]
        source: LlmError,
    },

    #[error("{stage} prompt could not be built: {source}")]
    Encode {
        stage: Stage,
        #[source]
        source: serde_json::Error,
    },

    #[error("run cancelled during {stage}")]
    Cancelled { stage: Stage },
}

impl PipelineError {
    /// The stage that failed; `None` when the input was rejected before any stage ran.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            PipelineError::Validation(_) => None,
            PipelineError::Extraction(e) => Some(e.stage),
            PipelineError::Upstream { stage, .. }
            | PipelineError::Encode { stage, .. }
            | PipelineError::Cancelled { stage } => Some(*stage),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_budgets() {
        assert_eq!(Stage::RequirementsExtraction.max_tokens(), 2000);
        assert_eq!(Stage::GapAnalysis.max_tokens(), 3000);
        assert_eq!(Stage::ResumeRewrite.max_tokens(), 8000);
    }

    #[test]
    fn test_stage_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(Stage::GapAnalysis).unwrap(),
            serde_json::json!("gap_analysis")
        );
        assert_eq!(Stage::ResumeRewrite.to_string(), "resume_rewrite");
    }

    #[test]
    fn test_every_error_names_its_stage() {
        let err = PipelineError::Upstream {
            stage: Stage::GapAnalysis,
            source: LlmError::Timeout(120),
        };
        assert_eq!(err.stage(), Some(Stage::GapAnalysis));
        assert!(err.to_string().contains("gap_analysis"));

        let err = PipelineError::Cancelled {
            stage: Stage::ResumeRewrite,
        };
        assert_eq!(err.stage(), Some(Stage::ResumeRewrite));

        assert_eq!(PipelineError::Validation("short".into()).stage(), None);
    }
}
