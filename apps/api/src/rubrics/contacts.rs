//! Relationship health rubric for networking contacts.
//!
//! Weights are product configuration. The tier bands are the ones the
//! dashboard renders: at_risk [0,30), needs_attention [30,50),
//! healthy [50,75), strong [75,100].

use crate::engine::extract::Extraction;
use crate::engine::normalize::{Bucket, NormalizeRule};
use crate::engine::recommend::{Condition, RecommendationRule};
use crate::engine::tier::{Tier, TierTable};
use crate::engine::{FactorDef, Rubric};

pub fn rubric() -> Rubric {
    let factors = vec![
        FactorDef::new(
            "last_touch",
            Extraction::DaysSince("last_contact_date".into()),
            NormalizeRule::InverseLinear { min: 0.0, max: 90.0 },
            0.3,
        ),
        FactorDef::new(
            "interactions",
            Extraction::Number("interactions_90d".into()),
            NormalizeRule::ThresholdBuckets(vec![
                Bucket { upper_bound: 0.0, score: 0.0 },
                Bucket { upper_bound: 2.0, score: 40.0 },
                Bucket { upper_bound: 5.0, score: 70.0 },
                Bucket { upper_bound: 12.0, score: 100.0 },
            ]),
            0.3,
        ),
        FactorDef::new(
            "closeness",
            Extraction::Number("closeness".into()),
            NormalizeRule::Linear { min: 1.0, max: 5.0 },
            0.2,
        ),
        FactorDef::new(
            "response_rate",
            Extraction::Number("response_rate".into()),
            NormalizeRule::Linear { min: 0.0, max: 1.0 },
            0.2,
        ),
    ];

    let rules = vec![
        RecommendationRule::new(
            Condition::TierIs(Tier::AtRisk),
            5,
            "Relationship at risk ({score}/100); send a short, no-ask check-in this week",
        ),
        RecommendationRule::new(
            Condition::FactorBelow {
                factor: "last_touch".into(),
                below: 35.0,
            },
            4,
            "It has been a while since your last touchpoint; reconnect before you need a favor",
        ),
        RecommendationRule::new(
            Condition::AllOf(vec![
                Condition::FactorBelow {
                    factor: "interactions".into(),
                    below: 50.0,
                },
                Condition::Not(Box::new(Condition::TierIs(Tier::Strong))),
            ]),
            3,
            "Interaction volume is low ({factor:interactions}/100); comment on their work or share something relevant",
        ),
        RecommendationRule::new(
            Condition::TierIs(Tier::Strong),
            2,
            "Healthy relationship ({score}/100); a referral or intro ask is reasonable now",
        ),
        RecommendationRule::new(
            Condition::FactorMissing("response_rate".into()),
            1,
            "Log replies for this contact to get a reliable health reading",
        ),
    ];

    // Dashboards render up to four items for contacts.
    Rubric::new("contact_health", factors, TierTable::standard(), rules)
        .with_max_recommendations(4)
}
