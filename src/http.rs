//! HTTP surface: score submission, leaderboard queries, health.
//!
//! Handlers translate [`SubmitError`] into status codes and the fixed
//! client messages; nothing about the validation heuristics leaks out.

use std::net::SocketAddr;

use axum::extract::rejection::JsonRejection;
use axum::extract::{ConnectInfo, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, error};

use crate::error::SubmitError;
use crate::protocol::{
    ErrorResponse, LeaderboardErrorResponse, LeaderboardResponse, SubmitScoreRequest,
    SubmitScoreResponse, MSG_INTERNAL_ERROR, MSG_INVALID_SCORE, MSG_RATE_LIMITED,
};
use crate::state::AppState;

/// Build the service router. CORS is wide open: the game client is
/// static-hosted anywhere and talks to this API cross-origin.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/submit-score", post(submit_score))
        .route("/get-leaderboard", get(get_leaderboard))
        .route("/health", get(health))
        .layer(cors)
        .with_state(state)
}

async fn submit_score(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    payload: Result<Json<SubmitScoreRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(json) => json,
        Err(rejection) => {
            debug!(%rejection, "malformed submission body");
            return error_response(StatusCode::BAD_REQUEST, MSG_INVALID_SCORE);
        }
    };

    match state.submission.submit(addr.ip(), request.into_submission()).await {
        Ok(outcome) => {
            state.query.invalidate().await;
            (StatusCode::OK, Json(SubmitScoreResponse::accepted(outcome.rank))).into_response()
        }
        Err(SubmitError::AdmissionDenied) => {
            error_response(StatusCode::TOO_MANY_REQUESTS, MSG_RATE_LIMITED)
        }
        Err(SubmitError::ValidationRejected(_)) => {
            error_response(StatusCode::BAD_REQUEST, MSG_INVALID_SCORE)
        }
        Err(SubmitError::Store(err)) => {
            error!(%err, "submission failed in the store");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, MSG_INTERNAL_ERROR)
        }
    }
}

async fn get_leaderboard(State(state): State<AppState>) -> Response {
    match state.query.top_scores().await {
        Ok(board) => Json(LeaderboardResponse {
            success: true,
            scores: board.scores,
            last_updated: board.last_updated,
        })
        .into_response(),
        Err(err) => {
            error!(%err, "leaderboard query failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(LeaderboardErrorResponse::new(MSG_INTERNAL_ERROR)),
            )
                .into_response()
        }
    }
}

async fn health() -> &'static str {
    "OK"
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(ErrorResponse::new(message))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaderboard::{
        unix_time_ms, LeaderboardEntry, LeaderboardSnapshot, LeaderboardStore, MemoryKvStore,
        ScoreSubmission,
    };
    use crate::protocol::MSG_SCORE_ACCEPTED;
    use axum::body::Body;
    use axum::extract::connect_info::MockConnectInfo;
    use axum::http::{header, Method, Request};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_app() -> Router {
        let state = AppState::with_store(Arc::new(MemoryKvStore::new()));
        router(state).layer(MockConnectInfo(SocketAddr::from(([127, 0, 0, 1], 40_000))))
    }

    fn score_body(score: i64) -> String {
        let foods = score / 10;
        json!({
            "score": score,
            "timestamp": unix_time_ms(),
            "gameData": {
                "difficulty": "MEDIUM",
                "snakeLength": 3 + foods,
                "gameTime": foods * 500 + 1_000
            }
        })
        .to_string()
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<String>) -> (StatusCode, Value) {
        let request = match body {
            Some(body) => Request::builder()
                .method(method)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap(),
            None => Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_submit_then_query_round_trip() {
        let app = test_app();

        let (status, body) =
            send(&app, Method::POST, "/submit-score", Some(score_body(120))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["rank"], 1);
        assert_eq!(body["message"], MSG_SCORE_ACCEPTED);

        let (status, board) = send(&app, Method::GET, "/get-leaderboard", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(board["success"], true);
        assert_eq!(board["scores"].as_array().unwrap().len(), 1);
        assert_eq!(board["scores"][0]["score"], 120);
        assert_eq!(board["scores"][0]["snakeLength"], 15);
        assert!(board["scores"][0]["id"].is_string());
        assert!(board["lastUpdated"].as_u64().unwrap() > 0);
    }

    #[tokio::test]
    async fn test_empty_leaderboard_serves_empty_scores() {
        let app = test_app();
        let (status, board) = send(&app, Method::GET, "/get-leaderboard", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(board["success"], true);
        assert_eq!(board["scores"], json!([]));
        assert_eq!(board["lastUpdated"], 0);
    }

    #[tokio::test]
    async fn test_implausible_score_gets_generic_400() {
        let app = test_app();
        let (status, body) =
            send(&app, Method::POST, "/submit-score", Some(score_body(121))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], MSG_INVALID_SCORE);
        assert!(
            body.get("reason").is_none(),
            "precise reasons never reach the client"
        );
    }

    #[tokio::test]
    async fn test_malformed_body_gets_generic_400() {
        let app = test_app();

        let (status, body) = send(
            &app,
            Method::POST,
            "/submit-score",
            Some("{\"gameData\": {\"score\": 120}}".to_string()),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], MSG_INVALID_SCORE);

        let (status, body) = send(
            &app,
            Method::POST,
            "/submit-score",
            Some("this is not json".to_string()),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], MSG_INVALID_SCORE);
    }

    #[tokio::test]
    async fn test_rate_limit_yields_429_with_vague_body() {
        let app = test_app();

        for i in 0..crate::config::RATE_LIMIT_MAX_SUBMISSIONS {
            let score = i64::from(i + 1) * 10;
            let (status, _) =
                send(&app, Method::POST, "/submit-score", Some(score_body(score))).await;
            assert_eq!(status, StatusCode::OK, "submission {i} within budget");
        }

        let (status, body) =
            send(&app, Method::POST, "/submit-score", Some(score_body(10))).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], MSG_RATE_LIMITED);
    }

    #[tokio::test]
    async fn test_leaderboard_is_ordered_and_capped_over_http() {
        let app = test_app();

        // Three submissions out of order; rate limit allows them all
        for score in [200i64, 400, 300] {
            let (status, _) =
                send(&app, Method::POST, "/submit-score", Some(score_body(score))).await;
            assert_eq!(status, StatusCode::OK);
        }

        let (_, board) = send(&app, Method::GET, "/get-leaderboard", None).await;
        let scores: Vec<i64> = board["scores"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["score"].as_i64().unwrap())
            .collect();
        assert_eq!(scores, vec![400, 300, 200]);
    }

    #[tokio::test]
    async fn test_wrong_method_is_rejected() {
        let app = test_app();
        let (status, _) = send(&app, Method::GET, "/submit-score", None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

        let (status, _) = send(&app, Method::POST, "/get-leaderboard", None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_below_cutoff_submission_reports_null_rank() {
        // Fill the board with twenty better scores before the app starts.
        let kv = Arc::new(MemoryKvStore::new());
        let store = LeaderboardStore::new(kv.clone());
        let mut board = LeaderboardSnapshot::empty();
        for _ in 0..crate::config::LEADERBOARD_CAP {
            board.insert_ranked(LeaderboardEntry::from_submission(&ScoreSubmission {
                score: 1_000,
                timestamp: unix_time_ms(),
                difficulty: "HARD".to_string(),
                snake_length: 103,
                game_time: 60_000,
            }));
        }
        board.last_updated = unix_time_ms() as u64;
        store.save(&board).await.unwrap();

        let app = router(AppState::with_store(kv))
            .layer(MockConnectInfo(SocketAddr::from(([127, 0, 0, 1], 40_001))));
        let (status, body) =
            send(&app, Method::POST, "/submit-score", Some(score_body(10))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert!(body["rank"].is_null(), "rank must be present and null");
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = test_app();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"OK");
    }
}
