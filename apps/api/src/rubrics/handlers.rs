//! Axum route handlers for the Scoring API.
//!
//! Each record kind has an explicit request schema here; the conversion to
//! `ScorableRecord` is the only place attribute names are spelled, so the
//! rubrics never need defensive lookups against duck-typed input.

use axum::{extract::State, Json};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::record::ScorableRecord;
use crate::engine::{compare, ScoreResult, ScoringEngine};
use crate::errors::AppError;
use crate::rubrics::benchmarks::{self, BenchmarkTargets};
use crate::rubrics::offers::{self, OfferComparison};
use crate::rubrics::responses;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct OfferInput {
    pub id: String,
    pub company: Option<String>,
    pub base_salary: Option<f64>,
    pub bonus: Option<f64>,
    pub equity_annual: Option<f64>,
    pub pto_days: Option<f64>,
    pub signing_bonus: Option<f64>,
    pub remote: Option<bool>,
    pub benefits: Option<Vec<String>>,
}

impl OfferInput {
    fn to_record(&self) -> ScorableRecord {
        let mut record = ScorableRecord::new(self.id.clone());
        if let Some(company) = &self.company {
            record = record.with_text("company", company);
        }
        if let Some(v) = self.base_salary {
            record = record.with_number("base_salary", v);
        }
        if let Some(v) = self.bonus {
            record = record.with_number("bonus", v);
        }
        if let Some(v) = self.equity_annual {
            record = record.with_number("equity_annual", v);
        }
        if let Some(v) = self.pto_days {
            record = record.with_number("pto_days", v);
        }
        if let Some(v) = self.signing_bonus {
            record = record.with_number("signing_bonus", v);
        }
        if let Some(v) = self.remote {
            record = record.with_bool("remote", v);
        }
        if let Some(benefits) = &self.benefits {
            record = record.with_tags("benefits", benefits.clone());
        }
        record
    }
}

#[derive(Debug, Deserialize)]
pub struct ScoreOffersRequest {
    pub offers: Vec<OfferInput>,
    /// Reference date for time-relative factors; defaults to today.
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct ContactInput {
    pub id: String,
    pub name: Option<String>,
    pub last_contact_date: Option<NaiveDate>,
    pub interactions_90d: Option<f64>,
    pub closeness: Option<f64>,
    pub response_rate: Option<f64>,
}

impl ContactInput {
    fn to_record(&self) -> ScorableRecord {
        let mut record = ScorableRecord::new(self.id.clone());
        if let Some(name) = &self.name {
            record = record.with_text("name", name);
        }
        if let Some(d) = self.last_contact_date {
            record = record.with_date("last_contact_date", d);
        }
        if let Some(v) = self.interactions_90d {
            record = record.with_number("interactions_90d", v);
        }
        if let Some(v) = self.closeness {
            record = record.with_number("closeness", v);
        }
        if let Some(v) = self.response_rate {
            record = record.with_number("response_rate", v);
        }
        record
    }
}

#[derive(Debug, Deserialize)]
pub struct ScoreContactsRequest {
    pub contacts: Vec<ContactInput>,
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct ScoreContactsResponse {
    /// One result per contact, in request order.
    pub results: Vec<ScoreResult>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseEntryInput {
    pub id: String,
    pub tags: Option<Vec<String>>,
    pub success_rate: Option<f64>,
    pub last_used: Option<NaiveDate>,
}

impl ResponseEntryInput {
    fn to_record(&self) -> ScorableRecord {
        let mut record = ScorableRecord::new(self.id.clone());
        if let Some(tags) = &self.tags {
            record = record.with_tags("tags", tags.clone());
        }
        if let Some(v) = self.success_rate {
            record = record.with_number("success_rate", v);
        }
        if let Some(d) = self.last_used {
            record = record.with_date("last_used", d);
        }
        record
    }
}

#[derive(Debug, Deserialize)]
pub struct SuggestResponsesRequest {
    pub query_tags: Vec<String>,
    pub entries: Vec<ResponseEntryInput>,
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct SuggestResponsesResponse {
    /// Best match first.
    pub ranked: Vec<ScoreResult>,
}

#[derive(Debug, Deserialize)]
pub struct MetricsInput {
    pub id: String,
    pub weekly_outreach: Option<f64>,
    pub response_rate: Option<f64>,
    pub meetings_per_month: Option<f64>,
    pub new_connections_per_month: Option<f64>,
}

impl MetricsInput {
    fn to_record(&self) -> ScorableRecord {
        let mut record = ScorableRecord::new(self.id.clone());
        if let Some(v) = self.weekly_outreach {
            record = record.with_number("weekly_outreach", v);
        }
        if let Some(v) = self.response_rate {
            record = record.with_number("response_rate", v);
        }
        if let Some(v) = self.meetings_per_month {
            record = record.with_number("meetings_per_month", v);
        }
        if let Some(v) = self.new_connections_per_month {
            record = record.with_number("new_connections_per_month", v);
        }
        record
    }
}

#[derive(Debug, Deserialize)]
pub struct ScoreBenchmarkRequest {
    pub metrics: MetricsInput,
    pub benchmarks: BenchmarkTargets,
    pub as_of: Option<NaiveDate>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

fn resolve_as_of(requested: Option<NaiveDate>) -> NaiveDate {
    requested.unwrap_or_else(|| Utc::now().date_naive())
}

/// Replaces each result's rule-based advice with the configured
/// recommender's output (the rule-based backend hands it straight back).
async fn apply_recommender(
    state: &AppState,
    engine: &ScoringEngine,
    records: &[ScorableRecord],
    results: &mut [ScoreResult],
) {
    for result in results.iter_mut() {
        if let Some(record) = records.iter().find(|r| r.id == result.record_id) {
            result.recommendations = state
                .recommender
                .recommend(record, result, engine.rubric())
                .await;
        }
    }
}

/// POST /api/v1/score/offers
///
/// Scores and ranks a set of offers against each other. Trailing offers
/// get negotiation advice naming the factors they trail on.
pub async fn handle_score_offers(
    State(state): State<AppState>,
    Json(request): Json<ScoreOffersRequest>,
) -> Result<Json<OfferComparison>, AppError> {
    if request.offers.is_empty() {
        return Err(AppError::Validation("offers cannot be empty".to_string()));
    }
    let as_of = resolve_as_of(request.as_of);
    let records: Vec<ScorableRecord> = request.offers.iter().map(OfferInput::to_record).collect();

    let engine = &state.rubrics.offers;
    let mut comparison = offers::comparison(engine, &records, as_of)?;
    apply_recommender(&state, engine, &records, &mut comparison.ranked).await;

    Ok(Json(comparison))
}

/// POST /api/v1/score/contacts
///
/// Relationship health for each contact, in request order. A contact with
/// sparse data degrades to a lower-confidence score; it never errors.
pub async fn handle_score_contacts(
    State(state): State<AppState>,
    Json(request): Json<ScoreContactsRequest>,
) -> Result<Json<ScoreContactsResponse>, AppError> {
    if request.contacts.is_empty() {
        return Err(AppError::Validation("contacts cannot be empty".to_string()));
    }
    let as_of = resolve_as_of(request.as_of);
    let records: Vec<ScorableRecord> =
        request.contacts.iter().map(ContactInput::to_record).collect();

    let engine = &state.rubrics.contacts;
    let mut results = engine.score_all(&records, as_of)?;
    apply_recommender(&state, engine, &records, &mut results).await;

    Ok(Json(ScoreContactsResponse { results }))
}

/// POST /api/v1/score/responses
///
/// Ranks response-library entries against a query's tags.
pub async fn handle_suggest_responses(
    State(state): State<AppState>,
    Json(request): Json<SuggestResponsesRequest>,
) -> Result<Json<SuggestResponsesResponse>, AppError> {
    if request.query_tags.iter().all(|t| t.trim().is_empty()) {
        return Err(AppError::Validation(
            "query_tags cannot be empty".to_string(),
        ));
    }
    if request.entries.is_empty() {
        return Err(AppError::Validation("entries cannot be empty".to_string()));
    }
    let as_of = resolve_as_of(request.as_of);
    let records: Vec<ScorableRecord> = request
        .entries
        .iter()
        .map(ResponseEntryInput::to_record)
        .collect();

    let engine = ScoringEngine::new(responses::rubric_for(&request.query_tags))
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let mut results = engine.score_all(&records, as_of)?;
    apply_recommender(&state, &engine, &records, &mut results).await;

    Ok(Json(SuggestResponsesResponse {
        ranked: compare::rank(results),
    }))
}

/// POST /api/v1/score/benchmarks
///
/// Scores a user's aggregate networking metrics against the supplied
/// industry benchmark targets.
pub async fn handle_score_benchmarks(
    State(state): State<AppState>,
    Json(request): Json<ScoreBenchmarkRequest>,
) -> Result<Json<ScoreResult>, AppError> {
    let as_of = resolve_as_of(request.as_of);
    let record = request.metrics.to_record();

    let engine = ScoringEngine::new(benchmarks::rubric_for(&request.benchmarks))
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let mut result = engine.score(&record, as_of)?;
    result.recommendations = state
        .recommender
        .recommend(&record, &result, engine.rubric())
        .await;

    Ok(Json(result))
}
