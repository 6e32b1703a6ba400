#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use reading_game_backend::build_router;
use reading_game_backend::config::GameConfig;
use reading_game_backend::db::config::DbConfig;
use reading_game_backend::db::Database;
use reading_game_backend::state::AppState;

/// Router over a throwaway SQLite file; the directory lives as long as the app.
pub struct TestApp {
    pub router: Router,
    pub db: Database,
    _dir: TempDir,
}

pub async fn create_test_app() -> TestApp {
    create_test_app_with(GameConfig::default()).await
}

pub async fn create_test_app_with(game: GameConfig) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("test.db").display());
    let db = Database::connect(&DbConfig::for_url(url)).await.unwrap();

    TestApp {
        router: build_router(AppState::new(db.clone(), game)),
        db,
        _dir: dir,
    }
}

impl TestApp {
    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::builder().method("DELETE").uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    pub async fn create_child(&self, name: &str) -> i64 {
        let (status, body) = self
            .post("/api/children", serde_json::json!({ "name": name }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_i64().unwrap()
    }

    pub async fn start(&self, child_id: i64, mode: &str, difficulty: &str) -> Value {
        let (status, body) = self
            .post(
                "/api/sessions/start",
                serde_json::json!({ "child_id": child_id, "mode": mode, "difficulty": difficulty }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body
    }

    pub async fn attempt(&self, session_id: i64, correct: bool, reaction_ms: i64) -> (StatusCode, Value) {
        self.post(
            &format!("/api/sessions/{session_id}/attempt"),
            serde_json::json!({
                "item_id": "item",
                "correct": correct,
                "reaction_ms": reaction_ms,
                "shown_ms": 1200,
            }),
        )
        .await
    }

    pub async fn finish(&self, session_id: i64) -> (StatusCode, Value) {
        self.post(&format!("/api/sessions/{session_id}/finish"), Value::Null)
            .await
    }
}
