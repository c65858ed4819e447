//! Rubric instances — the four product configurations of the engine.
//!
//! Offers and contacts are static configuration validated once at startup.
//! Responses and benchmarks embed request parameters (query tags,
//! benchmark targets) and are built per request.

pub mod benchmarks;
pub mod contacts;
pub mod handlers;
pub mod offers;
pub mod responses;

use crate::engine::{ConfigError, ScoringEngine};

/// The statically configured engines, built once at startup. A malformed
/// table here stops the process before it can serve a request.
pub struct RubricSet {
    pub offers: ScoringEngine,
    pub contacts: ScoringEngine,
}

impl RubricSet {
    pub fn build() -> Result<Self, ConfigError> {
        Ok(Self {
            offers: ScoringEngine::new(offers::rubric())?,
            contacts: ScoringEngine::new(contacts::rubric())?,
        })
    }
}
