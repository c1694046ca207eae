//! Rejection taxonomy and the shared recover handler.
//!
//! User-facing messages are German, matching the public form. Storage
//! detail is logged server-side only; clients get a generic message.

use std::convert::Infallible;

use serde::Serialize;
use tracing::error;
use warp::http::StatusCode;
use warp::reject::Reject;
use warp::{Rejection, Reply};

#[derive(Debug)]
pub enum ServerError {
    /// Bad or missing input; the message is shown to the user.
    Validation(String),
    /// Draw pool below the configured winner count.
    InsufficientParticipants {
        available: usize,
        required: usize,
        test_mode: bool,
    },
    /// Bad credentials on login.
    BadCredentials,
    /// Missing or expired session on an admin route.
    SessionRequired,
    /// Any persistence failure. Detail is logged where it occurs.
    Storage,
}

impl Reject for ServerError {}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Logs a storage-layer failure and converts it into the generic rejection.
pub fn storage_reject<E: std::fmt::Display>(err: E) -> Rejection {
    error!("storage failure: {}", err);
    warp::reject::custom(ServerError::Storage)
}

pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (code, message) = if let Some(server_error) = err.find::<ServerError>() {
        match server_error {
            ServerError::Validation(message) => (StatusCode::BAD_REQUEST, message.clone()),
            ServerError::InsufficientParticipants {
                required, test_mode, ..
            } => (
                StatusCode::BAD_REQUEST,
                format!(
                    "Nicht genügend Teilnehmer für eine Ziehung. Mindestens {} {}Teilnehmer erforderlich.",
                    required,
                    if *test_mode { "Test-" } else { "" }
                ),
            ),
            ServerError::BadCredentials => {
                (StatusCode::UNAUTHORIZED, "Ungültige Anmeldedaten".to_string())
            }
            ServerError::SessionRequired => {
                (StatusCode::UNAUTHORIZED, "Nicht angemeldet".to_string())
            }
            ServerError::Storage => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Ein Fehler ist aufgetreten".to_string(),
            ),
        }
    } else if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not Found".to_string())
    } else if err
        .find::<warp::filters::body::BodyDeserializeError>()
        .is_some()
    {
        (StatusCode::BAD_REQUEST, "Ungültige Anfrage".to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed".to_string())
    } else {
        error!("unhandled rejection: {:?}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Ein Fehler ist aufgetreten".to_string(),
        )
    };

    let body = ErrorBody { error: message };
    Ok(warp::reply::with_status(warp::reply::json(&body), code))
}
