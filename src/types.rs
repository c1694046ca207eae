//! Request and response types of the HTTP surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Admin identity attached to a request by the session filter.
#[derive(Debug, Clone)]
pub struct AdminIdentity {
    pub username: String,
}

// Public intake.

/// Fields are optional so that missing ones reach the validation path and
/// produce the user-facing message instead of a body-decode rejection.
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub message: String,
}

// Auth.

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

// Draw.

#[derive(Debug, Serialize)]
pub struct WinnerEntry {
    pub id: String,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub place: u32,
}

#[derive(Debug, Serialize)]
pub struct DrawResponse {
    pub success: bool,
    pub winners: Vec<WinnerEntry>,
    #[serde(rename = "isTestDraw")]
    pub is_test_draw: bool,
}

#[derive(Debug, Serialize)]
pub struct DrawLogWinner {
    pub place: u32,
    pub id: String,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct DrawLogEntry {
    pub time: DateTime<Utc>,
    #[serde(rename = "isTest")]
    pub is_test: bool,
    pub admin: String,
    pub winners: Vec<DrawLogWinner>,
}

// Test mode & reset.

#[derive(Debug, Serialize)]
pub struct TestModeResponse {
    #[serde(rename = "testMode")]
    pub test_mode: bool,
}

#[derive(Debug, Deserialize)]
pub struct TestModeUpdateRequest {
    pub enabled: bool,
}

#[derive(Debug, Serialize)]
pub struct TestModeUpdateResponse {
    pub success: bool,
    #[serde(rename = "testMode")]
    pub test_mode: bool,
}

#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub success: bool,
    pub message: String,
}
