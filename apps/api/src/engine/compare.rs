//! Comparison and ranking across a set of scored records.
//!
//! Deterministic by construction: ranking is a stable sort on the exact
//! composite, and per-factor leaders keep first-seen order on ties. Two
//! offers with identical PTO days always resolve to the one supplied
//! first.

use chrono::NaiveDate;

use crate::engine::extract;
use crate::engine::record::ScorableRecord;
use crate::engine::{Rubric, ScoreResult};

/// The record leading one factor across a comparison set.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct FactorLeader {
    pub factor: String,
    pub record_id: String,
    pub raw: f64,
}

/// Orders results by exact composite, best first. Stable: equal composites
/// keep their input order.
pub fn rank(mut results: Vec<ScoreResult>) -> Vec<ScoreResult> {
    results.sort_by(|a, b| {
        b.composite_exact
            .partial_cmp(&a.composite_exact)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    results
}

/// Per-factor winners over raw values. Factors where lower is better
/// (inverse normalization) pick the minimum; everything else the maximum.
/// Records missing a factor are skipped for that factor; a factor missing
/// on every record produces no leader.
pub fn best_per_factor(
    rubric: &Rubric,
    records: &[ScorableRecord],
    as_of: NaiveDate,
) -> Vec<FactorLeader> {
    let mut leaders = Vec::new();
    for f in &rubric.factors {
        let lower_wins = f.rule.lower_is_better();
        let mut best: Option<(usize, f64)> = None;
        for (idx, record) in records.iter().enumerate() {
            let Some(raw) = extract::extract(record, &f.extraction, as_of) else {
                continue;
            };
            let wins = match best {
                None => true,
                // Strict comparison keeps the first-seen record on ties.
                Some((_, current)) => {
                    if lower_wins {
                        raw < current
                    } else {
                        raw > current
                    }
                }
            };
            if wins {
                best = Some((idx, raw));
            }
        }
        if let Some((idx, raw)) = best {
            leaders.push(FactorLeader {
                factor: f.name.clone(),
                record_id: records[idx].id.clone(),
                raw,
            });
        }
    }
    leaders
}
