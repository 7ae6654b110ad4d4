use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::input::InputError;
use crate::llm_client::LlmError;
use crate::pipeline::PipelineError;
use crate::render::RenderError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<InputError> for AppError {
    fn from(e: InputError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let stage = match &self {
            AppError::Pipeline(e) => e.stage(),
            _ => None,
        };

        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Pipeline(PipelineError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Pipeline(e @ PipelineError::Extraction(_)) => {
                tracing::error!("Extraction error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "EXTRACTION_ERROR",
                    format!("The {} stage returned output that could not be parsed", stage_label(stage)),
                )
            }
            AppError::Pipeline(
                e @ PipelineError::Upstream {
                    source: LlmError::Timeout(_),
                    ..
                },
            ) => {
                tracing::error!("Upstream timeout: {e}");
                (
                    StatusCode::GATEWAY_TIMEOUT,
                    "UPSTREAM_TIMEOUT",
                    format!("The {} stage timed out", stage_label(stage)),
                )
            }
            AppError::Pipeline(e @ PipelineError::Upstream { .. }) => {
                tracing::error!("Upstream error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_ERROR",
                    format!("The {} stage failed to reach the AI service", stage_label(stage)),
                )
            }
            AppError::Pipeline(e @ PipelineError::Encode { .. }) => {
                tracing::error!("Prompt encoding error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
            AppError::Pipeline(e @ PipelineError::Cancelled { .. }) => {
                tracing::error!("Pipeline cancelled: {e}");
                (StatusCode::CONFLICT, "CANCELLED", e.to_string())
            }
            AppError::Render(e @ (RenderError::Empty | RenderError::Contract(_))) => {
                tracing::error!("Render error: {e}");
                (StatusCode::UNPROCESSABLE_ENTITY, "RENDER_ERROR", e.to_string())
            }
            AppError::Render(e) => {
                tracing::error!("Render error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "RENDER_ERROR",
                    "The document could not be generated".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message,
                "stage": stage,
            }
        }));

        (status, body).into_response()
    }
}

fn stage_label(stage: Option<crate::pipeline::Stage>) -> &'static str {
    stage.map_or("pipeline", |s| s.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{ExtractionError, Stage};
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_extraction_error_is_bad_gateway_with_stage() {
        let err = AppError::from(PipelineError::Extraction(ExtractionError {
            stage: Stage::GapAnalysis,
            reason: "missing field `gap_bridges`".to_string(),
        }));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "EXTRACTION_ERROR");
        assert_eq!(body["error"]["stage"], "gap_analysis");
    }

    #[tokio::test]
    async fn test_timeout_is_gateway_timeout() {
        let err = AppError::from(PipelineError::Upstream {
            stage: Stage::ResumeRewrite,
            source: LlmError::Timeout(120),
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(body_json(response).await["error"]["stage"], "resume_rewrite");
    }

    #[tokio::test]
    async fn test_validation_has_null_stage() {
        let response = AppError::Validation("jobDescription is required".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["error"]["stage"].is_null());
    }

    #[tokio::test]
    async fn test_empty_render_is_unprocessable() {
        let response = AppError::from(RenderError::Empty).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_cancelled_is_conflict() {
        let response = AppError::from(PipelineError::Cancelled {
            stage: Stage::GapAnalysis,
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_input_error_becomes_validation() {
        let err = AppError::from(InputError::Empty);
        assert!(matches!(err, AppError::Validation(_)));
    }
}
