pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::rubrics::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Scoring API
        .route(
            "/api/v1/score/offers",
            post(handlers::handle_score_offers),
        )
        .route(
            "/api/v1/score/contacts",
            post(handlers::handle_score_contacts),
        )
        .route(
            "/api/v1/score/responses",
            post(handlers::handle_suggest_responses),
        )
        .route(
            "/api/v1/score/benchmarks",
            post(handlers::handle_score_benchmarks),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::engine::llm_recommend::RuleBasedRecommender;
    use crate::rubrics::RubricSet;

    fn test_state() -> AppState {
        AppState {
            config: Config {
                anthropic_api_key: None,
                port: 0,
                rust_log: "info".to_string(),
                llm_timeout_secs: 6,
            },
            rubrics: Arc::new(RubricSet::build().unwrap()),
            recommender: Arc::new(RuleBasedRecommender),
        }
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = build_router(test_state());
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_score_offers_endpoint_ranks_offers() {
        let app = build_router(test_state());
        let body = r#"{
            "as_of": "2025-07-01",
            "offers": [
                {"id": "A", "base_salary": 150000, "pto_days": 15, "equity_annual": 0},
                {"id": "B", "base_salary": 145000, "pto_days": 25, "equity_annual": 10000}
            ]
        }"#;
        let response = app
            .oneshot(post_json("/api/v1/score/offers", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let ranked = json["ranked"].as_array().unwrap();
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0]["record_id"], "B");
    }

    #[tokio::test]
    async fn test_empty_offer_list_is_bad_request() {
        let app = build_router(test_state());
        let response = app
            .oneshot(post_json("/api/v1/score/offers", r#"{"offers": []}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_blank_record_id_is_bad_request() {
        let app = build_router(test_state());
        let body = r#"{
            "contacts": [{"id": "   ", "closeness": 3}]
        }"#;
        let response = app
            .oneshot(post_json("/api/v1/score/contacts", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_benchmark_endpoint_scores_metrics() {
        let app = build_router(test_state());
        let body = r#"{
            "metrics": {
                "id": "user-1",
                "weekly_outreach": 5,
                "response_rate": 0.3,
                "meetings_per_month": 4,
                "new_connections_per_month": 8
            },
            "benchmarks": {
                "weekly_outreach": 10,
                "response_rate": 0.3,
                "meetings_per_month": 4,
                "new_connections_per_month": 8
            }
        }"#;
        let response = app
            .oneshot(post_json("/api/v1/score/benchmarks", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        // 0.3*50 + 0.3*100 + 0.2*100 + 0.2*100 = 85
        assert_eq!(json["composite_score"], 85);
        assert_eq!(json["tier"], "strong");
    }

    #[tokio::test]
    async fn test_zero_benchmark_target_is_bad_request() {
        let app = build_router(test_state());
        let body = r#"{
            "metrics": {
                "id": "user-1",
                "weekly_outreach": 5,
                "response_rate": 0.3,
                "meetings_per_month": 4,
                "new_connections_per_month": 8
            },
            "benchmarks": {
                "weekly_outreach": 0,
                "response_rate": 0.3,
                "meetings_per_month": 4,
                "new_connections_per_month": 8
            }
        }"#;
        let response = app
            .oneshot(post_json("/api/v1/score/benchmarks", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_responses_endpoint_requires_query_tags() {
        let app = build_router(test_state());
        let body = r#"{
            "query_tags": [],
            "entries": [{"id": "r1", "tags": ["rust"]}]
        }"#;
        let response = app
            .oneshot(post_json("/api/v1/score/responses", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
