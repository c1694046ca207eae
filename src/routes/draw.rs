//! Draw trigger and draw history.

use std::sync::Arc;

use warp::{Filter, Rejection, Reply};

use crate::core::draw::DrawError;
use crate::errors::{storage_reject, ServerError};
use crate::state::ServerState;
use crate::types::{AdminIdentity, DrawLogEntry, DrawLogWinner, DrawResponse, WinnerEntry};
use crate::utils::{require_admin, with_state};

pub fn routes(state: Arc<ServerState>) -> warp::filters::BoxedFilter<(impl Reply,)> {
    let draw_route = {
        let state = Arc::clone(&state);
        warp::path!("api" / "draw")
            .and(warp::post())
            .and(require_admin(Arc::clone(&state)))
            .and(with_state(state))
            .and_then(|admin: AdminIdentity, state: Arc<ServerState>| async move {
                draw_impl(admin, state).await
            })
            .boxed()
    };

    let logs_route = {
        let state = Arc::clone(&state);
        warp::path!("api" / "draw-logs")
            .and(warp::get())
            .and(require_admin(Arc::clone(&state)))
            .and(with_state(state))
            .and_then(|_admin: AdminIdentity, state: Arc<ServerState>| async move {
                logs_impl(state).await
            })
            .boxed()
    };

    draw_route.or(logs_route).boxed()
}

async fn draw_impl(admin: AdminIdentity, state: Arc<ServerState>) -> Result<impl Reply, Rejection> {
    // Mode is read once here and passed through explicitly.
    let test_draw = state.settings.test_mode().await;
    let outcome = state
        .draw
        .run(test_draw, &admin.username)
        .await
        .map_err(|e| match e {
            DrawError::InsufficientParticipants {
                available,
                required,
            } => warp::reject::custom(ServerError::InsufficientParticipants {
                available,
                required,
                test_mode: test_draw,
            }),
            other => storage_reject(other),
        })?;

    let winners = outcome
        .winners
        .into_iter()
        .map(|w| WinnerEntry {
            id: w.participant.id,
            firstname: w.participant.firstname,
            lastname: w.participant.lastname,
            email: w.participant.email,
            place: w.place,
        })
        .collect();
    Ok(warp::reply::json(&DrawResponse {
        success: true,
        winners,
        is_test_draw: outcome.test_draw,
    }))
}

async fn logs_impl(state: Arc<ServerState>) -> Result<impl Reply, Rejection> {
    let mut entries = Vec::new();
    for event in state.draw_log.history().await {
        let mut winners = Vec::with_capacity(event.winners.len());
        for winner in &event.winners {
            // Join against the participant store; rows whose participant is
            // gone are skipped, like the SQL join the panel originally read.
            if let Some(p) = state.participants.get(&winner.participant_id).await {
                winners.push(DrawLogWinner {
                    place: winner.place,
                    id: p.id,
                    firstname: p.firstname,
                    lastname: p.lastname,
                    email: p.email,
                });
            }
        }
        entries.push(DrawLogEntry {
            time: event.time,
            is_test: event.is_test,
            admin: event.admin,
            winners,
        });
    }
    Ok(warp::reply::json(&entries))
}
