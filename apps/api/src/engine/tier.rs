//! Tier classification — maps a composite score onto a discrete label.
//!
//! The tier table is configuration and is validated once at engine
//! construction: bands must be contiguous, non-overlapping, and span
//! exactly [0, 100].

use serde::{Deserialize, Serialize};

use crate::engine::ConfigError;

/// Ordered classification bucket, worst first. The same labels are shared
/// by every rubric; each rubric chooses its own boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    AtRisk,
    NeedsAttention,
    Healthy,
    Strong,
}

/// One `[low, high)` band of a tier table. The final band is closed at 100.
#[derive(Debug, Clone, PartialEq)]
pub struct TierBand {
    pub tier: Tier,
    pub low: f64,
    pub high: f64,
}

/// Full tier configuration for one rubric, ordered low to high.
#[derive(Debug, Clone, PartialEq)]
pub struct TierTable {
    bands: Vec<TierBand>,
}

impl TierTable {
    /// Builds a table, rejecting gaps, overlaps, and tables that do not
    /// span exactly [0, 100].
    pub fn new(bands: Vec<TierBand>) -> Result<Self, ConfigError> {
        if bands.is_empty() {
            return Err(ConfigError::EmptyTierTable);
        }
        let mut sorted = bands;
        sorted.sort_by(|a, b| a.low.partial_cmp(&b.low).unwrap_or(std::cmp::Ordering::Equal));

        if sorted.first().map(|b| b.low) != Some(0.0) || sorted.last().map(|b| b.high) != Some(100.0)
        {
            return Err(ConfigError::TierSpan);
        }
        for band in &sorted {
            if band.high <= band.low {
                return Err(ConfigError::TierBandInverted {
                    tier: band.tier,
                    low: band.low,
                    high: band.high,
                });
            }
        }
        for pair in sorted.windows(2) {
            if (pair[0].high - pair[1].low).abs() > f64::EPSILON {
                return Err(ConfigError::TierDiscontinuity {
                    at: pair[0].high,
                    next: pair[1].low,
                });
            }
        }
        Ok(Self { bands: sorted })
    }

    /// The default four-band table used by most rubrics:
    /// at_risk [0,30), needs_attention [30,50), healthy [50,75), strong [75,100].
    pub fn standard() -> Self {
        Self::new(vec![
            TierBand { tier: Tier::AtRisk, low: 0.0, high: 30.0 },
            TierBand { tier: Tier::NeedsAttention, low: 30.0, high: 50.0 },
            TierBand { tier: Tier::Healthy, low: 50.0, high: 75.0 },
            TierBand { tier: Tier::Strong, low: 75.0, high: 100.0 },
        ])
        .expect("standard tier table is contiguous")
    }

    /// Total, deterministic range lookup. Bands are half-open except the
    /// last, which is closed so 100.0 classifies.
    pub fn classify(&self, composite: f64) -> Tier {
        let score = composite.clamp(0.0, 100.0);
        for (i, band) in self.bands.iter().enumerate() {
            let last = i == self.bands.len() - 1;
            if score >= band.low && (score < band.high || (last && score <= band.high)) {
                return band.tier;
            }
        }
        // Unreachable after validation; clamp guarantees coverage.
        self.bands[self.bands.len() - 1].tier
    }
}
