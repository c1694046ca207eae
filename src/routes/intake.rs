//! Public intake: the unauthenticated signup endpoint.

use std::sync::Arc;

use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

use crate::core::participants::validate_email;
use crate::errors::{storage_reject, ServerError};
use crate::state::ServerState;
use crate::types::{SubmitRequest, SubmitResponse};
use crate::utils::with_state;

pub fn routes(state: Arc<ServerState>) -> warp::filters::BoxedFilter<(impl Reply,)> {
    warp::path!("submit")
        .and(warp::post())
        .and(warp::body::json())
        .and(with_state(state))
        .and_then(|req: SubmitRequest, state: Arc<ServerState>| async move {
            submit_impl(req, state).await
        })
        .boxed()
}

async fn submit_impl(req: SubmitRequest, state: Arc<ServerState>) -> Result<impl Reply, Rejection> {
    let firstname = req.firstname.as_deref().map(str::trim).unwrap_or_default();
    let lastname = req.lastname.as_deref().map(str::trim).unwrap_or_default();
    let email = req.email.as_deref().map(str::trim).unwrap_or_default();

    if firstname.is_empty() || lastname.is_empty() || email.is_empty() {
        return Err(warp::reject::custom(ServerError::Validation(
            "Alle Felder müssen ausgefüllt werden".to_string(),
        )));
    }
    if !validate_email(email) {
        return Err(warp::reject::custom(ServerError::Validation(
            "Ungültige E-Mail-Adresse".to_string(),
        )));
    }

    // Read the flag once; the new entry is stamped with it.
    let is_test = state.settings.test_mode().await;
    state
        .participants
        .register(firstname, lastname, email, is_test)
        .await
        .map_err(storage_reject)?;

    Ok(warp::reply::with_status(
        warp::reply::json(&SubmitResponse {
            success: true,
            message: "Teilnahme erfolgreich registriert".to_string(),
        }),
        StatusCode::CREATED,
    ))
}
