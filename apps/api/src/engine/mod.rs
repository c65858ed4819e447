//! Weighted multi-factor scoring engine.
//!
//! One shape, four product uses: offer comparison, relationship health,
//! response-library relevance, networking benchmarks. A rubric declares
//! weighted factors, a tier table, and an advice-rule table; the engine
//! runs extract → normalize → aggregate → classify → recommend as a pure,
//! synchronous pipeline over caller-supplied records. Nothing here holds
//! state between calls.
//!
//! Malformed rubrics fail loudly at construction. Missing data on a single
//! factor degrades that factor to its neutral default instead of aborting
//! the call.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

pub mod aggregate;
pub mod compare;
pub mod extract;
pub mod llm_recommend;
pub mod normalize;
pub mod prompts;
pub mod recommend;
pub mod record;
pub mod tier;

use aggregate::{WeightedInput, WEIGHT_TOLERANCE};
use extract::Extraction;
use normalize::NormalizeRule;
use recommend::RecommendationRule;
use record::ScorableRecord;
use tier::{Tier, TierTable};

/// Fatal rubric misconfiguration, raised once at engine construction and
/// never tolerated per-request.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("factor weights sum to {sum}, expected 1.0")]
    WeightSum { sum: f64 },

    #[error("factor '{factor}' has weight outside [0, 1]")]
    WeightOutOfRange { factor: String },

    #[error("rubric declares no factors")]
    NoFactors,

    #[error("duplicate factor name '{name}'")]
    DuplicateFactor { name: String },

    #[error("factor '{factor}' has an inverted or empty normalization range")]
    BadRange { factor: String },

    #[error("factor '{factor}' has an empty threshold-bucket list")]
    EmptyBuckets { factor: String },

    #[error("factor '{factor}' has non-ascending bucket bounds")]
    BucketOrder { factor: String },

    #[error("factor '{factor}' has a non-positive ratio target")]
    NonPositiveTarget { factor: String },

    #[error("factor '{factor}' has a neutral default outside [0, 100]")]
    NeutralOutOfRange { factor: String },

    #[error("factor '{factor}' declares tag overlap with no targets")]
    EmptyOverlapTargets { factor: String },

    #[error("recommendation rule has a vacuous (empty) condition")]
    VacuousCondition,

    #[error("tier table is empty")]
    EmptyTierTable,

    #[error("tier table does not span exactly [0, 100]")]
    TierSpan,

    #[error("tier band {tier:?} has inverted bounds [{low}, {high})")]
    TierBandInverted { tier: Tier, low: f64, high: f64 },

    #[error("tier table discontinuity: band ends at {at}, next starts at {next}")]
    TierDiscontinuity { at: f64, next: f64 },
}

/// Caller-side input errors, rejected before any factor work.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid record: {0}")]
    InvalidRecord(String),
}

/// One named, weighted, independently normalized input signal.
#[derive(Debug, Clone, PartialEq)]
pub struct FactorDef {
    pub name: String,
    pub extraction: Extraction,
    pub rule: NormalizeRule,
    pub weight: f64,
    /// Normalized score substituted when the factor's data is unavailable.
    pub neutral_default: f64,
}

impl FactorDef {
    pub fn new(name: &str, extraction: Extraction, rule: NormalizeRule, weight: f64) -> Self {
        Self {
            name: name.to_string(),
            extraction,
            rule,
            weight,
            neutral_default: 50.0,
        }
    }

    pub fn with_neutral(mut self, neutral_default: f64) -> Self {
        self.neutral_default = neutral_default;
        self
    }
}

/// Full configuration of one scoring use case: factors, weights, tier
/// boundaries, and the advice-rule table. Read-only after construction.
#[derive(Debug, Clone)]
pub struct Rubric {
    pub name: String,
    pub factors: Vec<FactorDef>,
    pub tiers: TierTable,
    pub rules: Vec<RecommendationRule>,
    pub max_recommendations: usize,
}

impl Rubric {
    pub fn new(
        name: &str,
        factors: Vec<FactorDef>,
        tiers: TierTable,
        rules: Vec<RecommendationRule>,
    ) -> Self {
        Self {
            name: name.to_string(),
            factors,
            tiers,
            rules,
            max_recommendations: 3,
        }
    }

    pub fn with_max_recommendations(mut self, max: usize) -> Self {
        self.max_recommendations = max;
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.factors.is_empty() {
            return Err(ConfigError::NoFactors);
        }

        let mut seen = std::collections::BTreeSet::new();
        for f in &self.factors {
            if !seen.insert(f.name.as_str()) {
                return Err(ConfigError::DuplicateFactor {
                    name: f.name.clone(),
                });
            }
            if !(0.0..=1.0).contains(&f.weight) {
                return Err(ConfigError::WeightOutOfRange {
                    factor: f.name.clone(),
                });
            }
            if !(0.0..=100.0).contains(&f.neutral_default) {
                return Err(ConfigError::NeutralOutOfRange {
                    factor: f.name.clone(),
                });
            }
            validate_rule(&f.name, &f.rule)?;
            if let Extraction::TagOverlap { targets, .. } = &f.extraction {
                if targets.is_empty() {
                    return Err(ConfigError::EmptyOverlapTargets {
                        factor: f.name.clone(),
                    });
                }
            }
        }

        let sum: f64 = self.factors.iter().map(|f| f.weight).sum();
        if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(ConfigError::WeightSum { sum });
        }

        for rule in &self.rules {
            rule.condition.validate()?;
        }
        Ok(())
    }
}

fn validate_rule(factor: &str, rule: &NormalizeRule) -> Result<(), ConfigError> {
    match rule {
        NormalizeRule::Linear { min, max } | NormalizeRule::InverseLinear { min, max } => {
            if max <= min {
                return Err(ConfigError::BadRange {
                    factor: factor.to_string(),
                });
            }
        }
        NormalizeRule::ThresholdBuckets(buckets) => {
            if buckets.is_empty() {
                return Err(ConfigError::EmptyBuckets {
                    factor: factor.to_string(),
                });
            }
            if buckets.windows(2).any(|p| p[1].upper_bound <= p[0].upper_bound) {
                return Err(ConfigError::BucketOrder {
                    factor: factor.to_string(),
                });
            }
        }
        NormalizeRule::Ratio { target } => {
            if *target <= 0.0 {
                return Err(ConfigError::NonPositiveTarget {
                    factor: factor.to_string(),
                });
            }
        }
    }
    Ok(())
}

/// One factor's scored breakdown inside a result. `raw: None` marks a
/// factor that degraded to its neutral default; `weight` is the effective
/// (post-redistribution) weight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorScore {
    pub name: String,
    pub raw: Option<f64>,
    pub normalized: f64,
    pub weight: f64,
}

/// Immutable output of one scoring call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    pub record_id: String,
    /// Rounded for display stability.
    pub composite_score: u32,
    /// Full precision, used for comparator tie-breaking only.
    #[serde(skip_serializing)]
    pub composite_exact: f64,
    pub tier: Tier,
    pub factors: Vec<FactorScore>,
    pub recommendations: Vec<String>,
}

/// Validated rubric plus the scoring pipeline. Construction is the only
/// place configuration errors can surface; scoring never fails for data
/// reasons short of a record with no id.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    rubric: Rubric,
}

impl ScoringEngine {
    pub fn new(rubric: Rubric) -> Result<Self, ConfigError> {
        rubric.validate()?;
        Ok(Self { rubric })
    }

    pub fn rubric(&self) -> &Rubric {
        &self.rubric
    }

    /// Scores one record as of the given date. Time-relative factors use
    /// `as_of`, so re-scoring at the same instant is idempotent.
    pub fn score(
        &self,
        record: &ScorableRecord,
        as_of: NaiveDate,
    ) -> Result<ScoreResult, EngineError> {
        if record.id.trim().is_empty() {
            return Err(EngineError::InvalidRecord(
                "record is missing a non-empty id".to_string(),
            ));
        }

        let mut raws = Vec::with_capacity(self.rubric.factors.len());
        let mut inputs = Vec::with_capacity(self.rubric.factors.len());
        for f in &self.rubric.factors {
            let raw = extract::extract(record, &f.extraction, as_of);
            let normalized = match raw {
                Some(value) => normalize::normalize(value, &f.rule),
                None => {
                    debug!(
                        record = %record.id,
                        rubric = %self.rubric.name,
                        factor = %f.name,
                        "factor data missing, using neutral default"
                    );
                    f.neutral_default
                }
            };
            inputs.push(WeightedInput {
                normalized,
                declared_weight: f.weight,
                missing: raw.is_none(),
            });
            raws.push(raw);
        }

        let effective = aggregate::effective_weights(&inputs);
        let composite_exact = aggregate::aggregate(&inputs).clamp(0.0, 100.0);
        let tier = self.rubric.tiers.classify(composite_exact);

        let factors: Vec<FactorScore> = self
            .rubric
            .factors
            .iter()
            .zip(raws)
            .zip(inputs.iter().zip(effective))
            .map(|((f, raw), (input, weight))| FactorScore {
                name: f.name.clone(),
                raw,
                normalized: input.normalized,
                weight,
            })
            .collect();

        let recommendations = recommend::generate(
            record,
            composite_exact,
            tier,
            &factors,
            &self.rubric.rules,
            self.rubric.max_recommendations,
        );

        Ok(ScoreResult {
            record_id: record.id.clone(),
            composite_score: composite_exact.round() as u32,
            composite_exact,
            tier,
            factors,
            recommendations,
        })
    }

    /// Scores a batch, preserving input order.
    pub fn score_all(
        &self,
        records: &[ScorableRecord],
        as_of: NaiveDate,
    ) -> Result<Vec<ScoreResult>, EngineError> {
        records.iter().map(|r| self.score(r, as_of)).collect()
    }
}
