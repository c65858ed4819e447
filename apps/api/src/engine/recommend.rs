//! Rule-based recommendation generation.
//!
//! A rubric carries a table of rules; every rule whose condition matches
//! the scored record contributes its template, sorted by priority then
//! declaration order, truncated to the rubric's limit. This path has no
//! external dependencies and is the mandatory fallback for the
//! AI-augmented variant.

use crate::engine::record::ScorableRecord;
use crate::engine::tier::Tier;
use crate::engine::{ConfigError, FactorScore};

/// Predicate over a record and its score breakdown.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    TierIs(Tier),
    TierAtMost(Tier),
    TierAtLeast(Tier),
    CompositeBelow(f64),
    CompositeAtLeast(f64),
    /// Normalized factor score strictly below the threshold.
    FactorBelow { factor: String, below: f64 },
    /// Normalized factor score at or above the threshold.
    FactorAtLeast { factor: String, at_least: f64 },
    /// The factor's raw value was unavailable on this record.
    FactorMissing(String),
    AllOf(Vec<Condition>),
    AnyOf(Vec<Condition>),
    Not(Box<Condition>),
}

impl Condition {
    /// Rejects vacuous combinators: an empty AllOf/AnyOf is a rule with
    /// no condition, which is a configuration error.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Condition::AllOf(inner) | Condition::AnyOf(inner) => {
                if inner.is_empty() {
                    return Err(ConfigError::VacuousCondition);
                }
                inner.iter().try_for_each(Condition::validate)
            }
            Condition::Not(inner) => inner.validate(),
            _ => Ok(()),
        }
    }

    fn matches(&self, composite: f64, tier: Tier, factors: &[FactorScore]) -> bool {
        let factor = |name: &str| factors.iter().find(|f| f.name == name);
        match self {
            Condition::TierIs(t) => tier == *t,
            Condition::TierAtMost(t) => tier <= *t,
            Condition::TierAtLeast(t) => tier >= *t,
            Condition::CompositeBelow(v) => composite < *v,
            Condition::CompositeAtLeast(v) => composite >= *v,
            Condition::FactorBelow { factor: name, below } => {
                factor(name).is_some_and(|f| f.normalized < *below)
            }
            Condition::FactorAtLeast { factor: name, at_least } => {
                factor(name).is_some_and(|f| f.normalized >= *at_least)
            }
            Condition::FactorMissing(name) => factor(name).is_some_and(|f| f.raw.is_none()),
            Condition::AllOf(inner) => inner.iter().all(|c| c.matches(composite, tier, factors)),
            Condition::AnyOf(inner) => inner.iter().any(|c| c.matches(composite, tier, factors)),
            Condition::Not(inner) => !inner.matches(composite, tier, factors),
        }
    }
}

/// One row of a rubric's advice table. Higher priority surfaces first;
/// ties keep declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationRule {
    pub condition: Condition,
    pub priority: u8,
    pub template: String,
}

impl RecommendationRule {
    pub fn new(condition: Condition, priority: u8, template: &str) -> Self {
        Self {
            condition,
            priority,
            template: template.to_string(),
        }
    }
}

/// Evaluates every rule and returns the rendered advice strings, sorted by
/// (priority desc, declaration order asc) and truncated to `max_items`.
pub fn generate(
    record: &ScorableRecord,
    composite: f64,
    tier: Tier,
    factors: &[FactorScore],
    rules: &[RecommendationRule],
    max_items: usize,
) -> Vec<String> {
    let mut matched: Vec<&RecommendationRule> = rules
        .iter()
        .filter(|r| r.condition.matches(composite, tier, factors))
        .collect();
    // Stable sort keeps declaration order within equal priorities.
    matched.sort_by(|a, b| b.priority.cmp(&a.priority));

    matched
        .into_iter()
        .take(max_items)
        .map(|r| render(&r.template, record, composite, tier, factors))
        .collect()
}

fn render(
    template: &str,
    record: &ScorableRecord,
    composite: f64,
    tier: Tier,
    factors: &[FactorScore],
) -> String {
    let mut out = template
        .replace("{score}", &format!("{}", composite.round() as i64))
        .replace("{tier}", tier_label(tier))
        .replace("{record}", &record.id);
    for f in factors {
        let placeholder = format!("{{factor:{}}}", f.name);
        if out.contains(&placeholder) {
            out = out.replace(&placeholder, &format!("{}", f.normalized.round() as i64));
        }
    }
    out
}

fn tier_label(tier: Tier) -> &'static str {
    match tier {
        Tier::AtRisk => "at_risk",
        Tier::NeedsAttention => "needs_attention",
        Tier::Healthy => "healthy",
        Tier::Strong => "strong",
    }
}
