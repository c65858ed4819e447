use std::sync::Arc;

use crate::config::Config;
use crate::engine::llm_recommend::Recommender;
use crate::rubrics::RubricSet;

/// Shared application state injected into all route handlers via Axum
/// extractors. Everything here is read-only after startup, so concurrent
/// scoring requests need no coordination.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Statically configured engines, validated once at startup.
    pub rubrics: Arc<RubricSet>,
    /// Pluggable recommendation backend. Default: rule-based. Swapped to
    /// the LLM decorator when ANTHROPIC_API_KEY is set.
    pub recommender: Arc<dyn Recommender>,
}
