//! Pluggable recommendation backends.
//!
//! `RuleBasedRecommender` is the default and the mandatory fallback; the
//! `LlmRecommender` decorator asks Claude for richer phrasing of the same
//! factor evidence, and resolves every failure (timeout, non-2xx, garbage
//! body, empty list) back to the rule-based output. An LLM problem is
//! never visible to the caller as an error.
//!
//! `AppState` holds an `Arc<dyn Recommender>`, selected at startup.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::engine::prompts::{RECOMMEND_PROMPT_TEMPLATE, RECOMMEND_SYSTEM};
use crate::engine::record::{AttrValue, ScorableRecord};
use crate::engine::{Rubric, ScoreResult};
use crate::llm_client::{strip_json_fences, LlmClient, LlmError};

/// Seam between the recommender and the network. The production
/// implementation is `LlmClient`; tests use failing stubs.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn complete(&self, prompt: &str, system: &str) -> Result<String, LlmError>;
}

#[async_trait]
impl TextGenerator for LlmClient {
    async fn complete(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
        let response = self.call(prompt, system).await?;
        response
            .text()
            .map(str::to_string)
            .ok_or(LlmError::EmptyContent)
    }
}

/// Produces the recommendation list attached to a score result.
#[async_trait]
pub trait Recommender: Send + Sync {
    async fn recommend(
        &self,
        record: &ScorableRecord,
        result: &ScoreResult,
        rubric: &Rubric,
    ) -> Vec<String>;
}

/// Default backend: the engine already ran the rule table, so this just
/// hands its output through. Zero external dependencies.
pub struct RuleBasedRecommender;

#[async_trait]
impl Recommender for RuleBasedRecommender {
    async fn recommend(
        &self,
        _record: &ScorableRecord,
        result: &ScoreResult,
        _rubric: &Rubric,
    ) -> Vec<String> {
        result.recommendations.clone()
    }
}

/// AI-augmented backend: decorates the rule-based list with LLM phrasing.
/// Single attempt; any failure falls back.
pub struct LlmRecommender<G: TextGenerator> {
    generator: G,
}

impl<G: TextGenerator> LlmRecommender<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl<G: TextGenerator> Recommender for LlmRecommender<G> {
    async fn recommend(
        &self,
        record: &ScorableRecord,
        result: &ScoreResult,
        rubric: &Rubric,
    ) -> Vec<String> {
        let prompt = build_prompt(record, result, rubric);

        match self.generator.complete(&prompt, RECOMMEND_SYSTEM).await {
            Ok(text) => match parse_advice(&text, rubric.max_recommendations) {
                Some(advice) => {
                    debug!(record = %record.id, rubric = %rubric.name, "using LLM advice");
                    advice
                }
                None => {
                    warn!(
                        record = %record.id,
                        rubric = %rubric.name,
                        "LLM returned unusable advice body, falling back to rule-based"
                    );
                    result.recommendations.clone()
                }
            },
            Err(e) => {
                warn!(
                    record = %record.id,
                    rubric = %rubric.name,
                    error = %e,
                    "LLM advice call failed, falling back to rule-based"
                );
                result.recommendations.clone()
            }
        }
    }
}

/// Embeds the record's identifying attributes and the full per-factor
/// evidence, never just the tier label.
fn build_prompt(record: &ScorableRecord, result: &ScoreResult, rubric: &Rubric) -> String {
    let attributes = record
        .attrs
        .iter()
        .map(|(name, value)| format!("- {name}: {}", format_attr(value)))
        .collect::<Vec<_>>()
        .join("\n");

    let factor_evidence = result
        .factors
        .iter()
        .map(|f| {
            let raw = f
                .raw
                .map(|v| format!("{v}"))
                .unwrap_or_else(|| "unavailable".to_string());
            format!(
                "- {} | {} | {:.0} | {:.2}",
                f.name, raw, f.normalized, f.weight
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let fallback = if result.recommendations.is_empty() {
        "- (none)".to_string()
    } else {
        result
            .recommendations
            .iter()
            .map(|r| format!("- {r}"))
            .collect::<Vec<_>>()
            .join("\n")
    };

    RECOMMEND_PROMPT_TEMPLATE
        .replace("{rubric}", &rubric.name)
        .replace("{record_id}", &record.id)
        .replace(
            "{attributes}",
            if attributes.is_empty() { "- (none)" } else { attributes.as_str() },
        )
        .replace("{composite}", &result.composite_score.to_string())
        .replace("{tier}", &format!("{:?}", result.tier))
        .replace("{factor_evidence}", &factor_evidence)
        .replace("{fallback}", &fallback)
        .replace("{max_items}", &rubric.max_recommendations.to_string())
}

fn format_attr(value: &AttrValue) -> String {
    match value {
        AttrValue::Bool(b) => b.to_string(),
        AttrValue::Number(n) => n.to_string(),
        AttrValue::Date(d) => d.to_string(),
        AttrValue::Tags(t) => t.join(", "),
        AttrValue::Text(s) => s.clone(),
    }
}

/// Parses the model's output as a JSON array of non-empty strings.
/// Returns None for anything unusable so the caller falls back.
fn parse_advice(text: &str, max_items: usize) -> Option<Vec<String>> {
    let advice: Vec<String> = serde_json::from_str(strip_json_fences(text)).ok()?;
    let advice: Vec<String> = advice
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .take(max_items)
        .collect();
    if advice.is_empty() {
        None
    } else {
        Some(advice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::extract::Extraction;
    use crate::engine::normalize::NormalizeRule;
    use crate::engine::recommend::{Condition, RecommendationRule};
    use crate::engine::tier::{Tier, TierTable};
    use crate::engine::{FactorDef, ScoringEngine};
    use chrono::NaiveDate;

    struct StubGenerator {
        response: Result<String, LlmError>,
    }

    #[async_trait]
    impl TextGenerator for StubGenerator {
        async fn complete(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
            match &self.response {
                Ok(s) => Ok(s.clone()),
                Err(LlmError::Timeout) => Err(LlmError::Timeout),
                Err(LlmError::Api { status, message }) => Err(LlmError::Api {
                    status: *status,
                    message: message.clone(),
                }),
                Err(LlmError::EmptyContent) => Err(LlmError::EmptyContent),
                Err(_) => Err(LlmError::EmptyContent),
            }
        }
    }

    fn rubric() -> Rubric {
        Rubric::new(
            "contact_health",
            vec![FactorDef::new(
                "closeness",
                Extraction::Number("closeness".into()),
                NormalizeRule::Linear { min: 1.0, max: 5.0 },
                1.0,
            )],
            TierTable::standard(),
            vec![RecommendationRule::new(
                Condition::TierAtMost(Tier::NeedsAttention),
                1,
                "Reach out this week to rebuild momentum",
            )],
        )
    }

    fn scored() -> (ScorableRecord, ScoreResult, Rubric) {
        let rubric = rubric();
        let engine = ScoringEngine::new(rubric.clone()).unwrap();
        let record = ScorableRecord::new("contact-1").with_number("closeness", 2.0);
        let result = engine
            .score(&record, NaiveDate::from_ymd_opt(2025, 7, 1).unwrap())
            .unwrap();
        (record, result, rubric)
    }

    #[tokio::test]
    async fn test_server_error_falls_back_to_rule_based() {
        let (record, result, rubric) = scored();
        let recommender = LlmRecommender::new(StubGenerator {
            response: Err(LlmError::Api {
                status: 500,
                message: "overloaded".to_string(),
            }),
        });
        let advice = recommender.recommend(&record, &result, &rubric).await;
        assert_eq!(advice, result.recommendations);
    }

    #[tokio::test]
    async fn test_timeout_falls_back_to_rule_based() {
        let (record, result, rubric) = scored();
        let recommender = LlmRecommender::new(StubGenerator {
            response: Err(LlmError::Timeout),
        });
        let advice = recommender.recommend(&record, &result, &rubric).await;
        assert_eq!(advice, result.recommendations);
    }

    #[tokio::test]
    async fn test_unparsable_body_falls_back_to_rule_based() {
        let (record, result, rubric) = scored();
        let recommender = LlmRecommender::new(StubGenerator {
            response: Ok("Sure! Here are some tips: reach out more.".to_string()),
        });
        let advice = recommender.recommend(&record, &result, &rubric).await;
        assert_eq!(advice, result.recommendations);
    }

    #[tokio::test]
    async fn test_valid_json_array_is_used_and_truncated() {
        let (record, result, rubric) = scored();
        let recommender = LlmRecommender::new(StubGenerator {
            response: Ok(
                r#"["Message them about the new role", "Share the article you discussed", "Book a coffee chat", "Fourth item"]"#
                    .to_string(),
            ),
        });
        let advice = recommender.recommend(&record, &result, &rubric).await;
        assert_eq!(advice.len(), rubric.max_recommendations);
        assert_eq!(advice[0], "Message them about the new role");
    }

    #[tokio::test]
    async fn test_fenced_json_is_accepted() {
        let (record, result, rubric) = scored();
        let recommender = LlmRecommender::new(StubGenerator {
            response: Ok("```json\n[\"Send a follow-up note\"]\n```".to_string()),
        });
        let advice = recommender.recommend(&record, &result, &rubric).await;
        assert_eq!(advice, vec!["Send a follow-up note"]);
    }

    #[tokio::test]
    async fn test_rule_based_backend_passes_through() {
        let (record, result, rubric) = scored();
        let advice = RuleBasedRecommender
            .recommend(&record, &result, &rubric)
            .await;
        assert_eq!(advice, result.recommendations);
    }

    #[test]
    fn test_prompt_embeds_full_factor_evidence() {
        let (record, result, rubric) = scored();
        let prompt = build_prompt(&record, &result, &rubric);
        assert!(prompt.contains("contact-1"));
        assert!(prompt.contains("closeness | 2 | 25 | 1.00"));
        assert!(prompt.contains("Reach out this week"));
    }

    #[test]
    fn test_parse_advice_rejects_empty_array() {
        assert_eq!(parse_advice("[]", 3), None);
        assert_eq!(parse_advice("[\"  \"]", 3), None);
    }
}
