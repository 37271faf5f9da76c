//! Wire types for the score service endpoints.
//!
//! Responses follow a two-channel error design: precise failure reasons
//! stay in server logs, while clients get one of a few fixed, vague
//! messages. Field names are camelCase on the wire.

use serde::{Deserialize, Serialize};

use crate::leaderboard::{LeaderboardEntry, ScoreSubmission};

pub const MSG_SCORE_ACCEPTED: &str = "Score submitted successfully";
pub const MSG_INVALID_SCORE: &str = "Invalid score data";
pub const MSG_RATE_LIMITED: &str = "Too many requests. Please try again later.";
pub const MSG_INTERNAL_ERROR: &str = "Internal server error";

/// Body of `POST /submit-score`. The score and its timestamp sit at the
/// top level; the rest of the run details ride under `gameData`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitScoreRequest {
    pub score: i64,
    pub timestamp: i64,
    pub game_data: GamePayload,
}

/// Run details nested inside a submit request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GamePayload {
    pub difficulty: String,
    pub snake_length: i64,
    pub game_time: i64,
}

impl SubmitScoreRequest {
    /// Flattens the two-level wire shape into the validator's input.
    pub fn into_submission(self) -> ScoreSubmission {
        ScoreSubmission {
            score: self.score,
            timestamp: self.timestamp,
            difficulty: self.game_data.difficulty,
            snake_length: self.game_data.snake_length,
            game_time: self.game_data.game_time,
        }
    }
}

/// Success body for an accepted submission. `rank` is `null` when the
/// score landed outside the retained top entries.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitScoreResponse {
    pub success: bool,
    pub message: String,
    pub rank: Option<u32>,
}

impl SubmitScoreResponse {
    pub fn accepted(rank: Option<u32>) -> Self {
        Self {
            success: true,
            message: MSG_SCORE_ACCEPTED.to_string(),
            rank,
        }
    }
}

/// Failure body shared by the submit endpoint's error responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: &str) -> Self {
        Self {
            success: false,
            error: error.to_string(),
        }
    }
}

/// Success body of `GET /get-leaderboard`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardResponse {
    pub success: bool,
    pub scores: Vec<LeaderboardEntry>,
    pub last_updated: u64,
}

/// Failure body of `GET /get-leaderboard`. Always carries an empty
/// `scores` list alongside the error message.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardErrorResponse {
    pub success: bool,
    pub error: String,
    pub scores: Vec<LeaderboardEntry>,
}

impl LeaderboardErrorResponse {
    pub fn new(error: &str) -> Self {
        Self {
            success: false,
            error: error.to_string(),
            scores: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_submit_request_parses_camel_case() {
        let body = json!({
            "score": 120,
            "timestamp": 1_700_000_000_000u64,
            "gameData": {
                "difficulty": "HARD",
                "snakeLength": 15,
                "gameTime": 7000
            }
        });
        let request: SubmitScoreRequest = serde_json::from_value(body).unwrap();
        assert_eq!(request.score, 120);
        assert_eq!(request.timestamp, 1_700_000_000_000);
        assert_eq!(request.game_data.difficulty, "HARD");
        assert_eq!(request.game_data.snake_length, 15);
        assert_eq!(request.game_data.game_time, 7000);
    }

    #[test]
    fn test_submit_request_rejects_missing_fields() {
        let body = json!({
            "score": 120,
            "timestamp": 1_700_000_000_000u64,
            "gameData": { "difficulty": "HARD" }
        });
        assert!(serde_json::from_value::<SubmitScoreRequest>(body).is_err());

        let no_payload = json!({ "score": 120, "timestamp": 0 });
        assert!(serde_json::from_value::<SubmitScoreRequest>(no_payload).is_err());
    }

    #[test]
    fn test_into_submission_flattens_the_nesting() {
        let request = SubmitScoreRequest {
            score: 250,
            timestamp: 1_700_000_000_000,
            game_data: GamePayload {
                difficulty: "MEDIUM".to_string(),
                snake_length: 28,
                game_time: 30_000,
            },
        };
        let submission = request.into_submission();
        assert_eq!(submission.score, 250);
        assert_eq!(submission.timestamp, 1_700_000_000_000);
        assert_eq!(submission.difficulty, "MEDIUM");
        assert_eq!(submission.snake_length, 28);
        assert_eq!(submission.game_time, 30_000);
    }

    #[test]
    fn test_accepted_response_serializes_rank_even_when_null() {
        let with_rank: Value =
            serde_json::to_value(SubmitScoreResponse::accepted(Some(3))).unwrap();
        assert_eq!(with_rank["success"], true);
        assert_eq!(with_rank["rank"], 3);

        let without: Value = serde_json::to_value(SubmitScoreResponse::accepted(None)).unwrap();
        assert_eq!(without["message"], MSG_SCORE_ACCEPTED);
        assert!(without.get("rank").is_some_and(Value::is_null));
    }

    #[test]
    fn test_error_response_shape() {
        let value: Value = serde_json::to_value(ErrorResponse::new(MSG_RATE_LIMITED)).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["error"], MSG_RATE_LIMITED);
    }

    #[test]
    fn test_leaderboard_error_keeps_empty_scores() {
        let value: Value =
            serde_json::to_value(LeaderboardErrorResponse::new(MSG_INTERNAL_ERROR)).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["error"], MSG_INTERNAL_ERROR);
        assert_eq!(value["scores"], json!([]));
    }
}
