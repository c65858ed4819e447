//! Response-library relevance rubric.
//!
//! Built per request: the query's target tags are baked into the overlap
//! factor, everything else is constant configuration. Results are ranked
//! and consumed as a suggestion list.

use crate::engine::extract::Extraction;
use crate::engine::normalize::NormalizeRule;
use crate::engine::recommend::{Condition, RecommendationRule};
use crate::engine::tier::{Tier, TierTable};
use crate::engine::{FactorDef, Rubric};

/// Relevance rubric for one query. Empty `query_tags` fails engine
/// construction (vacuous overlap); handlers reject it earlier as a 400.
pub fn rubric_for(query_tags: &[String]) -> Rubric {
    let factors = vec![
        FactorDef::new(
            "relevance",
            Extraction::TagOverlap {
                attr: "tags".into(),
                targets: query_tags.to_vec(),
            },
            NormalizeRule::Ratio { target: 1.0 },
            0.5,
        )
        .with_neutral(0.0),
        FactorDef::new(
            "success_rate",
            Extraction::Number("success_rate".into()),
            NormalizeRule::Linear { min: 0.0, max: 1.0 },
            0.3,
        ),
        FactorDef::new(
            "freshness",
            Extraction::DaysSince("last_used".into()),
            NormalizeRule::InverseLinear { min: 0.0, max: 180.0 },
            0.2,
        ),
    ];

    let rules = vec![
        RecommendationRule::new(
            Condition::FactorBelow {
                factor: "relevance".into(),
                below: 50.0,
            },
            4,
            "Low topical overlap ({factor:relevance}/100); consider drafting a fresh response instead",
        ),
        RecommendationRule::new(
            Condition::TierAtLeast(Tier::Healthy),
            3,
            "Good match ({score}/100); tailor the opening line before sending",
        ),
        RecommendationRule::new(
            Condition::FactorBelow {
                factor: "freshness".into(),
                below: 40.0,
            },
            2,
            "This response has not been used recently; re-read it for stale details",
        ),
        RecommendationRule::new(
            Condition::FactorMissing("success_rate".into()),
            1,
            "No outcome data yet; mark wins and losses to improve future suggestions",
        ),
    ];

    Rubric::new("response_relevance", factors, TierTable::standard(), rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::record::ScorableRecord;
    use crate::engine::{compare, ConfigError, ScoringEngine};
    use chrono::NaiveDate;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()
    }

    fn query() -> Vec<String> {
        vec!["rust".to_string(), "backend".to_string()]
    }

    fn entry(id: &str, tags: &[&str], success: f64, days_ago: i64) -> ScorableRecord {
        ScorableRecord::new(id)
            .with_tags("tags", tags.iter().map(|t| t.to_string()).collect())
            .with_number("success_rate", success)
            .with_date("last_used", as_of() - chrono::Duration::days(days_ago))
    }

    #[test]
    fn test_exact_tag_match_outranks_partial() {
        let engine = ScoringEngine::new(rubric_for(&query())).unwrap();
        let entries = vec![
            entry("partial", &["rust"], 0.8, 10),
            entry("exact", &["rust", "backend"], 0.8, 10),
        ];
        let ranked = compare::rank(engine.score_all(&entries, as_of()).unwrap());
        assert_eq!(ranked[0].record_id, "exact");
    }

    #[test]
    fn test_unrelated_entry_told_to_draft_fresh() {
        let engine = ScoringEngine::new(rubric_for(&query())).unwrap();
        let result = engine
            .score(&entry("off-topic", &["sales"], 0.9, 5), as_of())
            .unwrap();
        assert!(result.recommendations[0].contains("fresh response"));
    }

    #[test]
    fn test_untagged_entry_degrades_to_zero_relevance() {
        let engine = ScoringEngine::new(rubric_for(&query())).unwrap();
        let bare = ScorableRecord::new("bare").with_number("success_rate", 0.5);
        let result = engine.score(&bare, as_of()).unwrap();
        let relevance = result.factors.iter().find(|f| f.name == "relevance").unwrap();
        assert_eq!(relevance.raw, None);
        assert_eq!(relevance.normalized, 0.0);
    }

    #[test]
    fn test_empty_query_tags_rejected_at_construction() {
        let result = ScoringEngine::new(rubric_for(&[]));
        assert!(matches!(
            result,
            Err(ConfigError::EmptyOverlapTargets { .. })
        ));
    }
}
