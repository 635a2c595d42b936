pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::candidates::handlers as candidates;
use crate::search::handlers as search;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Search API
        .route(
            "/api/v1/search",
            get(search::handle_search_query).post(search::handle_search),
        )
        .route("/api/v1/search/parse", post(search::handle_parse_query))
        // Candidates API
        .route(
            "/api/v1/candidates",
            get(candidates::handle_list_candidates).post(candidates::handle_create_candidate),
        )
        .route(
            "/api/v1/candidates/:id",
            get(candidates::handle_get_candidate).patch(candidates::handle_update_candidate),
        )
        .route("/api/v1/analytics", get(candidates::handle_analytics))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::search::scoring::KeywordMatchScorer;
    use crate::store::CandidateStore;

    async fn test_app() -> (TempDir, Router) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("candidates.json");
        let store = CandidateStore::open(path.clone()).await.unwrap();
        let state = AppState {
            store: Arc::new(store),
            scorer: Arc::new(KeywordMatchScorer),
            llm: None,
            config: Config::for_tests(&path.to_string_lossy()),
        };
        (dir, build_router(state))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn create(app: &Router, body: Value) -> String {
        let (status, value) = send(app, "POST", "/api/v1/candidates", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
        value["candidate_id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health_reports_store_and_ai_state() {
        let (_dir, app) = test_app().await;
        create(&app, json!({"name": "Asha", "skills": ["Python"]})).await;

        let (status, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["ai_enabled"], false);
        assert_eq!(body["scorer"], "keyword");
        assert_eq!(body["total_candidates"], 1);
    }

    #[tokio::test]
    async fn test_search_returns_ranked_array() {
        let (_dir, app) = test_app().await;
        create(
            &app,
            json!({"name": "Asha", "skills": ["Python", "Django"], "experience_years": 6, "location": "Bangalore"}),
        )
        .await;
        create(&app, json!({"name": "Ben", "skills": ["Java"], "experience_years": 8})).await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/search",
            Some(json!({"job_description": "Python developer with 5 years experience in Bangalore"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let matches = body.as_array().unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0]["name"], "Asha");
        assert!(matches[0]["match_score"].as_u64().unwrap() > 0);
        for field in ["id", "email", "location", "experience_years", "skills", "match_reasons", "strengths", "missing_skills"] {
            assert!(matches[0].get(field).is_some(), "missing field {field}");
        }
    }

    #[tokio::test]
    async fn test_search_get_form_and_no_matches() {
        let (_dir, app) = test_app().await;
        create(&app, json!({"name": "Asha", "skills": ["Python"]})).await;

        let (status, body) = send(&app, "GET", "/api/v1/search?job_description=Rust%20engineer", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_empty_query_is_a_validation_error() {
        let (_dir, app) = test_app().await;

        let (status, body) =
            send(&app, "POST", "/api/v1/search", Some(json!({"job_description": "  "}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert!(body["error"].as_str().is_some());

        let (status, _) = send(&app, "GET", "/api/v1/search", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_body_gets_json_error() {
        let (_dir, app) = test_app().await;
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/search")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_parse_preview() {
        let (_dir, app) = test_app().await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/search/parse",
            Some(json!({"job_description": "Senior React developer in NYC, remote OK"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["parsed"]["filter"]["location"], "New York");
        assert_eq!(body["parsed"]["filter"]["seniority_level"], "senior");
        assert_eq!(body["parsed"]["filter"]["remote_ok"], true);
        assert_eq!(body["parsed"]["source"], "heuristic");
    }

    #[tokio::test]
    async fn test_candidate_crud() {
        let (_dir, app) = test_app().await;
        let id = create(&app, json!({"name": "Asha", "email": "asha@example.com", "skills": ["Python"]})).await;

        let (status, body) = send(&app, "GET", &format!("/api/v1/candidates/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Asha");

        let (status, body) = send(
            &app,
            "PATCH",
            &format!("/api/v1/candidates/{id}"),
            Some(json!({"location": "Pune", "experience_years": 4})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], id.as_str());
        assert_eq!(body["location"], "Pune");
        assert_eq!(body["skills"], json!(["Python"]));

        let (status, body) = send(&app, "GET", "/api/v1/candidates", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_candidate_is_404() {
        let (_dir, app) = test_app().await;

        let (status, body) = send(&app, "GET", "/api/v1/candidates/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");

        let (status, _) = send(&app, "PATCH", "/api/v1/candidates/nope", Some(json!({"name": "X"}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_candidate_payloads() {
        let (_dir, app) = test_app().await;

        let (status, _) = send(&app, "POST", "/api/v1/candidates", Some(json!({"name": " "}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &app,
            "POST",
            "/api/v1/candidates",
            Some(json!({"name": "Asha", "experience_years": -1})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_analytics() {
        let (_dir, app) = test_app().await;
        create(&app, json!({"name": "A", "skills": ["Python"], "experience_years": 1, "location": "Pune"})).await;
        create(&app, json!({"name": "B", "skills": ["python", "Go"], "experience_years": 12})).await;

        let (status, body) = send(&app, "GET", "/api/v1/analytics", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_candidates"], 2);
        assert_eq!(body["skills_distribution"][0], json!({"skill": "Python", "count": 2}));
        assert_eq!(body["experience_distribution"]["0-2"], 1);
        assert_eq!(body["experience_distribution"]["10+"], 1);
        assert_eq!(body["location_distribution"]["Unknown"], 1);
    }

    #[tokio::test]
    async fn test_corrupt_store_is_a_storage_error() {
        let (dir, app) = test_app().await;
        std::fs::write(dir.path().join("candidates.json"), "{ not json").unwrap();

        let (status, body) = send(&app, "GET", "/api/v1/candidates", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "STORAGE_ERROR");
    }
}
