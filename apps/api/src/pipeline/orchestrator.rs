//! Pipeline Orchestrator: sequences the three stages as an explicit state machine.
//!
//! AwaitingInput → RequirementsExtracted → GapAnalyzed → Rewritten
//!        └───────────────┴───────────────────┴──────→ Failed
//!
//! A stage runs only once its predecessor's record exists. Any failure moves
//! straight to `Failed` and no later stage is invoked. No retries.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use super::contracts::{self, StageRequest};
use super::extract::extract;
use super::{PipelineError, Stage};
use crate::llm_client::TextGenerator;
use crate::models::{GapAnalysis, RequirementsProfile, ResumeDocument};
use crate::scoring::{CoverageScore, ProjectionInput, ScoreProjector};

// ────────────────────────────────────────────────────────────────────────────
// Input validation
// ────────────────────────────────────────────────────────────────────────────

/// Validated pipeline input. Construction fails before any stage runs.
#[derive(Debug, Clone)]
pub struct PipelineInput {
    job_description: String,
    resume_text: String,
}

impl PipelineInput {
    pub fn new(
        job_description: &str,
        resume_text: &str,
        min_chars: usize,
    ) -> Result<Self, PipelineError> {
        let job_description = require_text("job description", job_description, min_chars)?;
        let resume_text = require_text("resume text", resume_text, min_chars)?;
        Ok(Self {
            job_description,
            resume_text,
        })
    }

    pub fn job_description(&self) -> &str {
        &self.job_description
    }

    pub fn resume_text(&self) -> &str {
        &self.resume_text
    }
}

/// Trims `text` and rejects it when blank or shorter than `min_chars` characters.
pub fn require_text(label: &str, text: &str, min_chars: usize) -> Result<String, PipelineError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(PipelineError::Validation(format!("{label} is required")));
    }
    let len = trimmed.chars().count();
    if len < min_chars {
        return Err(PipelineError::Validation(format!(
            "{label} is too short ({len} characters, minimum {min_chars})"
        )));
    }
    Ok(trimmed.to_string())
}

// ────────────────────────────────────────────────────────────────────────────
// Cancellation
// ────────────────────────────────────────────────────────────────────────────

/// Owner side of a cancellation signal. HTTP handlers rely on request-future
/// drop instead; this is for callers that embed the pipeline directly.
#[allow(dead_code)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

/// Observer side, threaded through every stage.
#[derive(Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

#[allow(dead_code)]
impl CancelHandle {
    pub fn pair() -> (CancelHandle, CancelToken) {
        let (tx, rx) = watch::channel(false);
        (CancelHandle { tx }, CancelToken { rx })
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

impl CancelToken {
    /// A token that is never cancelled.
    pub fn never() -> Self {
        let (_tx, rx) = watch::channel(false);
        CancelToken { rx }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once cancelled. Pends forever if the handle is dropped uncancelled.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        if rx.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// State machine
// ────────────────────────────────────────────────────────────────────────────

/// Terminal success record: every stage's output plus the two scores.
#[derive(Debug, Clone, Serialize)]
pub struct TailoredResume {
    pub requirements: RequirementsProfile,
    pub gap_analysis: GapAnalysis,
    pub resume: ResumeDocument,
    pub before_score: CoverageScore,
    pub after_score: CoverageScore,
}

#[derive(Debug)]
pub enum PipelineState {
    AwaitingInput,
    RequirementsExtracted {
        requirements: RequirementsProfile,
    },
    GapAnalyzed {
        requirements: RequirementsProfile,
        gap_analysis: GapAnalysis,
    },
    Rewritten(Box<TailoredResume>),
    Failed(PipelineError),
}

impl PipelineState {
    pub fn name(&self) -> &'static str {
        match self {
            PipelineState::AwaitingInput => "awaiting_input",
            PipelineState::RequirementsExtracted { .. } => "requirements_extracted",
            PipelineState::GapAnalyzed { .. } => "gap_analyzed",
            PipelineState::Rewritten(_) => "rewritten",
            PipelineState::Failed(_) => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Rewritten(_) | PipelineState::Failed(_))
    }
}

/// Runs the stages. Cheap to clone; holds only shared capabilities.
#[derive(Clone)]
pub struct Pipeline {
    generator: Arc<dyn TextGenerator>,
    projector: Arc<dyn ScoreProjector>,
}

impl Pipeline {
    pub fn new(generator: Arc<dyn TextGenerator>, projector: Arc<dyn ScoreProjector>) -> Self {
        Self {
            generator,
            projector,
        }
    }

    /// Full run: requirements, gap analysis, rewrite and score projection.
    pub async fn run(
        &self,
        input: &PipelineInput,
        cancel: &CancelToken,
    ) -> Result<TailoredResume, PipelineError> {
        let span = info_span!("pipeline", run_id = %Uuid::new_v4(), mode = "tailor");
        async {
            match self.drive(PipelineState::AwaitingInput, input, cancel).await {
                PipelineState::Rewritten(tailored) => Ok(*tailored),
                PipelineState::Failed(e) => Err(e),
                other => Err(unexpected_halt(&other)),
            }
        }
        .instrument(span)
        .await
    }

    /// Stages 1–2 only.
    pub async fn analyze(
        &self,
        input: &PipelineInput,
        cancel: &CancelToken,
    ) -> Result<(RequirementsProfile, GapAnalysis), PipelineError> {
        let span = info_span!("pipeline", run_id = %Uuid::new_v4(), mode = "analyze");
        async {
            let mut state = PipelineState::AwaitingInput;
            loop {
                state = match state {
                    PipelineState::GapAnalyzed {
                        requirements,
                        gap_analysis,
                    } => return Ok((requirements, gap_analysis)),
                    PipelineState::Failed(e) => return Err(e),
                    other => self.advance(other, input, cancel).await,
                };
            }
        }
        .instrument(span)
        .await
    }

    /// Resumes from `GapAnalyzed` with records a caller already holds.
    pub async fn rewrite(
        &self,
        resume_text: &str,
        requirements: RequirementsProfile,
        gap_analysis: GapAnalysis,
        min_chars: usize,
        cancel: &CancelToken,
    ) -> Result<TailoredResume, PipelineError> {
        let resume_text = require_text("resume text", resume_text, min_chars)?;
        let span = info_span!("pipeline", run_id = %Uuid::new_v4(), mode = "rewrite");
        self.rewrite_stage(&resume_text, requirements, gap_analysis, cancel)
            .instrument(span)
            .await
    }

    /// Steps until a terminal state.
    pub async fn drive(
        &self,
        mut state: PipelineState,
        input: &PipelineInput,
        cancel: &CancelToken,
    ) -> PipelineState {
        while !state.is_terminal() {
            state = self.advance(state, input, cancel).await;
        }
        state
    }

    /// Performs exactly one transition, logging it.
    pub async fn advance(
        &self,
        state: PipelineState,
        input: &PipelineInput,
        cancel: &CancelToken,
    ) -> PipelineState {
        let from = state.name();
        let next = self.step(state, input, cancel).await;
        match &next {
            PipelineState::Failed(e) => {
                warn!(from, to = next.name(), stage = ?e.stage(), error = %e, "Pipeline failed")
            }
            _ => info!(from, to = next.name(), "Pipeline transition"),
        }
        next
    }

    async fn step(
        &self,
        state: PipelineState,
        input: &PipelineInput,
        cancel: &CancelToken,
    ) -> PipelineState {
        match state {
            PipelineState::AwaitingInput => {
                let request = contracts::requirements_request(input.job_description());
                match self.run_stage::<RequirementsProfile>(request, cancel).await {
                    Ok(requirements) => PipelineState::RequirementsExtracted { requirements },
                    Err(e) => PipelineState::Failed(e),
                }
            }
            PipelineState::RequirementsExtracted { requirements } => {
                let result = async {
                    let request =
                        contracts::gap_analysis_request(input.resume_text(), &requirements)?;
                    self.run_stage::<GapAnalysis>(request, cancel).await
                }
                .await;
                match result {
                    Ok(gap_analysis) => PipelineState::GapAnalyzed {
                        requirements,
                        gap_analysis,
                    },
                    Err(e) => PipelineState::Failed(e),
                }
            }
            PipelineState::GapAnalyzed {
                requirements,
                gap_analysis,
            } => match self
                .rewrite_stage(input.resume_text(), requirements, gap_analysis, cancel)
                .await
            {
                Ok(tailored) => PipelineState::Rewritten(Box::new(tailored)),
                Err(e) => PipelineState::Failed(e),
            },
            terminal @ (PipelineState::Rewritten(_) | PipelineState::Failed(_)) => terminal,
        }
    }

    async fn rewrite_stage(
        &self,
        resume_text: &str,
        requirements: RequirementsProfile,
        gap_analysis: GapAnalysis,
        cancel: &CancelToken,
    ) -> Result<TailoredResume, PipelineError> {
        let request = contracts::rewrite_request(resume_text, &requirements, &gap_analysis)?;
        let resume = self
            .run_stage::<ResumeDocument>(request, cancel)
            .await?
            .with_raw_text();

        let unverified = contracts::unverified_titles(resume_text, &resume);
        if !unverified.is_empty() {
            warn!(?unverified, "Rewritten titles/employers not found verbatim in source resume");
        }

        let before_score = gap_analysis.match_score;
        let after_score = self.projector.project(&ProjectionInput {
            before: before_score,
            requirements: &requirements,
            resume: &resume,
        });
        info!(
            backend = self.projector.backend(),
            before = before_score.overall(),
            after = after_score.overall(),
            "Projected after-rewrite score"
        );

        Ok(TailoredResume {
            requirements,
            gap_analysis,
            resume,
            before_score,
            after_score,
        })
    }

    /// One generation call plus extraction. A result that arrives after
    /// cancellation is discarded.
    async fn run_stage<T: serde::de::DeserializeOwned>(
        &self,
        request: StageRequest,
        cancel: &CancelToken,
    ) -> Result<T, PipelineError> {
        let stage = request.stage;
        if cancel.is_cancelled() {
            return Err(PipelineError::Cancelled { stage });
        }

        info!(%stage, max_tokens = stage.max_tokens(), "Invoking generation stage");
        let raw = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(PipelineError::Cancelled { stage }),
            reply = self.generator.invoke(&request.system, &request.prompt, stage.max_tokens()) => {
                reply.map_err(|source| PipelineError::Upstream { stage, source })?
            }
        };

        if cancel.is_cancelled() {
            return Err(PipelineError::Cancelled { stage });
        }

        Ok(extract::<T>(&raw, stage)?)
    }
}

fn unexpected_halt(state: &PipelineState) -> PipelineError {
    // drive() only returns terminal states; map anything else to the stage it stopped before.
    let stage = match state {
        PipelineState::AwaitingInput => Stage::RequirementsExtraction,
        PipelineState::RequirementsExtracted { .. } => Stage::GapAnalysis,
        _ => Stage::ResumeRewrite,
    };
    PipelineError::Cancelled { stage }
}
