//! Networking performance vs industry benchmarks.
//!
//! Every factor is a ratio of the user's aggregate metric to a
//! caller-supplied benchmark target, so the rubric is built per request.

use serde::Deserialize;

use crate::engine::extract::Extraction;
use crate::engine::normalize::NormalizeRule;
use crate::engine::recommend::{Condition, RecommendationRule};
use crate::engine::tier::TierTable;
use crate::engine::{FactorDef, Rubric};

/// Benchmark targets the user is measured against. All targets must be
/// positive; a zero or negative target fails rubric construction.
#[derive(Debug, Clone, Deserialize)]
pub struct BenchmarkTargets {
    pub weekly_outreach: f64,
    pub response_rate: f64,
    pub meetings_per_month: f64,
    pub new_connections_per_month: f64,
}

pub fn rubric_for(targets: &BenchmarkTargets) -> Rubric {
    let factors = vec![
        FactorDef::new(
            "outreach",
            Extraction::Number("weekly_outreach".into()),
            NormalizeRule::Ratio {
                target: targets.weekly_outreach,
            },
            0.3,
        ),
        FactorDef::new(
            "response_rate",
            Extraction::Number("response_rate".into()),
            NormalizeRule::Ratio {
                target: targets.response_rate,
            },
            0.3,
        ),
        FactorDef::new(
            "meetings",
            Extraction::Number("meetings_per_month".into()),
            NormalizeRule::Ratio {
                target: targets.meetings_per_month,
            },
            0.2,
        ),
        FactorDef::new(
            "connections",
            Extraction::Number("new_connections_per_month".into()),
            NormalizeRule::Ratio {
                target: targets.new_connections_per_month,
            },
            0.2,
        ),
    ];

    let rules = vec![
        RecommendationRule::new(
            Condition::FactorBelow {
                factor: "outreach".into(),
                below: 60.0,
            },
            4,
            "Outreach is at {factor:outreach}% of the benchmark; schedule a few targeted messages each week",
        ),
        RecommendationRule::new(
            Condition::AllOf(vec![
                Condition::FactorAtLeast {
                    factor: "outreach".into(),
                    at_least: 80.0,
                },
                Condition::FactorBelow {
                    factor: "response_rate".into(),
                    below: 60.0,
                },
            ]),
            3,
            "Volume is fine but replies lag ({factor:response_rate}% of benchmark); tighten personalization",
        ),
        RecommendationRule::new(
            Condition::FactorBelow {
                factor: "meetings".into(),
                below: 50.0,
            },
            2,
            "Conversations are not converting to meetings; end messages with a concrete ask",
        ),
        RecommendationRule::new(
            Condition::CompositeAtLeast(75.0),
            1,
            "Networking pace is ahead of the benchmark ({score}/100); keep the current cadence",
        ),
    ];

    Rubric::new(
        "networking_benchmark",
        factors,
        TierTable::standard(),
        rules,
    )
}
