use crate::config::Config;
use crate::pipeline::Pipeline;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Nothing in here is mutable: every request runs its own pipeline instance
/// over the shared generation client and score projector.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Stage sequencer. Holds `Arc<dyn TextGenerator>` and `Arc<dyn ScoreProjector>`,
    /// swapped at startup (or in tests) without touching handlers.
    pub pipeline: Pipeline,
}
