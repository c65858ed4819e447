//! Offer comparison rubric.
//!
//! Weights and bands are product configuration, kept in one place; they
//! are not derived values. Comparison adds cross-offer negotiation advice
//! on top of each offer's own rule-based recommendations.

use chrono::NaiveDate;
use serde::Serialize;

use crate::engine::compare::{best_per_factor, rank, FactorLeader};
use crate::engine::extract::Extraction;
use crate::engine::normalize::{Bucket, NormalizeRule};
use crate::engine::recommend::{Condition, RecommendationRule};
use crate::engine::record::ScorableRecord;
use crate::engine::tier::{Tier, TierTable};
use crate::engine::{EngineError, FactorDef, Rubric, ScoreResult, ScoringEngine};

/// Default offer-comparison rubric.
pub fn rubric() -> Rubric {
    let factors = vec![
        FactorDef::new(
            "total_compensation",
            Extraction::Sum(vec!["base_salary".into(), "bonus".into()]),
            NormalizeRule::Linear {
                min: 100_000.0,
                max: 200_000.0,
            },
            0.4,
        ),
        FactorDef::new(
            "equity",
            Extraction::Number("equity_annual".into()),
            NormalizeRule::Linear { min: 0.0, max: 30_000.0 },
            0.2,
        ),
        FactorDef::new(
            "pto",
            Extraction::Number("pto_days".into()),
            NormalizeRule::Linear { min: 10.0, max: 30.0 },
            0.15,
        ),
        FactorDef::new(
            "signing_bonus",
            Extraction::Number("signing_bonus".into()),
            NormalizeRule::Linear { min: 0.0, max: 30_000.0 },
            0.1,
        ),
        FactorDef::new(
            "remote",
            Extraction::Flag("remote".into()),
            NormalizeRule::ThresholdBuckets(vec![
                Bucket { upper_bound: 0.0, score: 40.0 },
                Bucket { upper_bound: 1.0, score: 100.0 },
            ]),
            0.05,
        ),
        FactorDef::new(
            "benefits",
            Extraction::TagCount("benefits".into()),
            NormalizeRule::ThresholdBuckets(vec![
                Bucket { upper_bound: 0.0, score: 20.0 },
                Bucket { upper_bound: 3.0, score: 60.0 },
                Bucket { upper_bound: 6.0, score: 90.0 },
                Bucket { upper_bound: 10.0, score: 100.0 },
            ]),
            0.1,
        ),
    ];

    let rules = vec![
        RecommendationRule::new(
            Condition::TierAtMost(Tier::NeedsAttention),
            5,
            "Below-market offer overall ({score}/100); negotiate before accepting or keep interviewing",
        ),
        RecommendationRule::new(
            Condition::FactorBelow {
                factor: "total_compensation".into(),
                below: 40.0,
            },
            4,
            "Cash compensation sits at {factor:total_compensation}/100 for this band; counter on base salary first",
        ),
        RecommendationRule::new(
            Condition::FactorBelow {
                factor: "equity".into(),
                below: 25.0,
            },
            3,
            "Equity is light ({factor:equity}/100); ask about a larger initial grant or refresh schedule",
        ),
        RecommendationRule::new(
            Condition::FactorMissing("signing_bonus".into()),
            2,
            "No signing bonus on record; it is often the easiest line item to add",
        ),
        RecommendationRule::new(
            Condition::TierIs(Tier::Strong),
            1,
            "Strong offer ({score}/100); use it as leverage in your other processes",
        ),
    ];

    Rubric::new("offer_comparison", factors, TierTable::standard(), rules)
}

/// Full output of comparing a set of offers.
#[derive(Debug, Clone, Serialize)]
pub struct OfferComparison {
    /// Best overall first; ties keep submission order.
    pub ranked: Vec<ScoreResult>,
    /// Per-factor winners over raw values.
    pub best_per_factor: Vec<FactorLeader>,
}

/// Scores, ranks, and cross-annotates a set of offers. Each offer that
/// trails the per-factor leader gets a negotiation item naming the factors
/// it trails on, placed ahead of its own rule-based advice.
pub fn comparison(
    engine: &ScoringEngine,
    offers: &[ScorableRecord],
    as_of: NaiveDate,
) -> Result<OfferComparison, EngineError> {
    let mut results = engine.score_all(offers, as_of)?;
    let leaders = best_per_factor(engine.rubric(), offers, as_of);

    if offers.len() > 1 {
        for result in &mut results {
            let trailing = trailing_factors(result, &leaders);
            if !trailing.is_empty() {
                let advice = format!(
                    "Negotiate before accepting: {} below competing offer",
                    trailing.join("/")
                );
                result.recommendations.insert(0, advice);
                result
                    .recommendations
                    .truncate(engine.rubric().max_recommendations);
            }
        }
    }

    Ok(OfferComparison {
        ranked: rank(results),
        best_per_factor: leaders,
    })
}

/// Factors where this offer is strictly behind the leading offer, in
/// rubric declaration order. Factors this offer is missing entirely are
/// not listed; you cannot negotiate a number nobody supplied.
fn trailing_factors(result: &ScoreResult, leaders: &[FactorLeader]) -> Vec<String> {
    result
        .factors
        .iter()
        .filter_map(|f| {
            let leader = leaders.iter().find(|l| l.factor == f.name)?;
            let raw = f.raw?;
            if leader.record_id != result.record_id && raw != leader.raw {
                Some(f.name.clone())
            } else {
                None
            }
        })
        .collect()
}
