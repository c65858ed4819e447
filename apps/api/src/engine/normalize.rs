//! Normalization — maps a raw factor value onto the common 0–100 scale.

use serde::{Deserialize, Serialize};

/// One (upper_bound, score) step of a threshold-bucket rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub upper_bound: f64,
    pub score: f64,
}

/// How one factor's raw value maps onto [0, 100].
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizeRule {
    /// `clamp((value - min) / (max - min) * 100, 0, 100)`.
    Linear { min: f64, max: f64 },
    /// Lower-is-better variant, e.g. days since last contact.
    InverseLinear { min: f64, max: f64 },
    /// First bucket whose `upper_bound >= value` wins; values above every
    /// bound take the last bucket's score. Bounds must be strictly
    /// ascending (enforced at rubric validation).
    ThresholdBuckets(Vec<Bucket>),
    /// `clamp(value / target * 100, 0, 100)` — "you vs benchmark".
    Ratio { target: f64 },
}

impl NormalizeRule {
    /// True for rules where a smaller raw value is the better one. Drives
    /// the per-factor "best" direction in comparison.
    pub fn lower_is_better(&self) -> bool {
        matches!(self, NormalizeRule::InverseLinear { .. })
    }
}

/// Applies one rule to a present raw value. Output is always in [0, 100].
pub fn normalize(raw: f64, rule: &NormalizeRule) -> f64 {
    match rule {
        NormalizeRule::Linear { min, max } => {
            (((raw - min) / (max - min)) * 100.0).clamp(0.0, 100.0)
        }
        NormalizeRule::InverseLinear { min, max } => {
            (100.0 - ((raw - min) / (max - min)) * 100.0).clamp(0.0, 100.0)
        }
        NormalizeRule::ThresholdBuckets(buckets) => buckets
            .iter()
            .find(|b| b.upper_bound >= raw)
            .or_else(|| buckets.last())
            .map(|b| b.score.clamp(0.0, 100.0))
            .unwrap_or(0.0),
        NormalizeRule::Ratio { target } => ((raw / target) * 100.0).clamp(0.0, 100.0),
    }
}
