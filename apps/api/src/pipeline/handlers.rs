//! Axum route handlers for the tailoring pipeline.

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::input::extract_text;
use crate::models::{GapAnalysis, RequirementsProfile, ResumeDocument};
use crate::pipeline::{CancelToken, PipelineInput};
use crate::scoring::CoverageScore;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub requirements: RequirementsProfile,
    pub gap_analysis: GapAnalysis,
    pub original_text: String,
    pub job_description: String,
}

#[derive(Debug, Deserialize)]
pub struct RewriteRequest {
    pub resume_text: String,
    pub requirements: RequirementsProfile,
    pub gap_analysis: GapAnalysis,
}

#[derive(Debug, Serialize)]
pub struct RewriteResponse {
    pub rewritten_resume: ResumeDocument,
    pub before_score: CoverageScore,
    pub after_score: CoverageScore,
}

#[derive(Debug, Deserialize)]
pub struct TailorRequest {
    pub job_description: String,
    pub resume_text: String,
}

#[derive(Debug, Serialize)]
pub struct TailorResponse {
    pub requirements: RequirementsProfile,
    pub gap_analysis: GapAnalysis,
    pub rewritten_resume: ResumeDocument,
    pub before_score: CoverageScore,
    pub after_score: CoverageScore,
}

/// An uploaded resume file, before text extraction.
struct Upload {
    bytes: Bytes,
    file_name: Option<String>,
    content_type: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analyze
///
/// Multipart: `resume` (PDF/DOCX/TXT file) or `resumeText`, plus `jobDescription`.
/// Runs requirements extraction and gap analysis.
pub async fn handle_analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let mut upload: Option<Upload> = None;
    let mut resume_text: Option<String> = None;
    let mut job_description: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read resume upload: {e}")))?;
                if !bytes.is_empty() {
                    upload = Some(Upload {
                        bytes,
                        file_name,
                        content_type,
                    });
                }
            }
            "resumeText" => {
                resume_text = Some(field.text().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read resumeText: {e}"))
                })?);
            }
            "jobDescription" => {
                job_description = Some(field.text().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read jobDescription: {e}"))
                })?);
            }
            _ => {}
        }
    }

    let job_description = job_description
        .filter(|jd| !jd.trim().is_empty())
        .ok_or_else(|| AppError::Validation("jobDescription is required".to_string()))?;

    let resume_text = match upload {
        Some(upload) => {
            info!(
                file_name = ?upload.file_name,
                bytes = upload.bytes.len(),
                "Extracting text from uploaded resume"
            );
            // PDF/DOCX parsing is CPU-bound; keep it off the async executor.
            tokio::task::spawn_blocking(move || {
                extract_text(
                    &upload.bytes,
                    upload.file_name.as_deref(),
                    upload.content_type.as_deref(),
                )
            })
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in text extraction: {e}")))??
        }
        None => resume_text
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| {
                AppError::Validation("A resume file or resumeText is required".to_string())
            })?,
    };

    let input = PipelineInput::new(
        &job_description,
        &resume_text,
        state.config.min_input_chars,
    )?;

    let (requirements, gap_analysis) = state
        .pipeline
        .analyze(&input, &CancelToken::never())
        .await?;

    Ok(Json(AnalyzeResponse {
        requirements,
        gap_analysis,
        original_text: input.resume_text().to_string(),
        job_description: input.job_description().to_string(),
    }))
}

/// POST /api/v1/rewrite
///
/// Resumes the pipeline from a completed gap analysis: runs the rewrite stage
/// and projects the after-rewrite score.
pub async fn handle_rewrite(
    State(state): State<AppState>,
    Json(request): Json<RewriteRequest>,
) -> Result<Json<RewriteResponse>, AppError> {
    let tailored = state
        .pipeline
        .rewrite(
            &request.resume_text,
            request.requirements,
            request.gap_analysis,
            state.config.min_input_chars,
            &CancelToken::never(),
        )
        .await?;

    Ok(Json(RewriteResponse {
        rewritten_resume: tailored.resume,
        before_score: tailored.before_score,
        after_score: tailored.after_score,
    }))
}

/// POST /api/v1/tailor
///
/// Full pipeline in one call.
pub async fn handle_tailor(
    State(state): State<AppState>,
    Json(request): Json<TailorRequest>,
) -> Result<Json<TailorResponse>, AppError> {
    let input = PipelineInput::new(
        &request.job_description,
        &request.resume_text,
        state.config.min_input_chars,
    )?;

    let tailored = state.pipeline.run(&input, &CancelToken::never()).await?;

    Ok(Json(TailorResponse {
        requirements: tailored.requirements,
        gap_analysis: tailored.gap_analysis,
        rewritten_resume: tailored.resume,
        before_score: tailored.before_score,
        after_score: tailored.after_score,
    }))
}
