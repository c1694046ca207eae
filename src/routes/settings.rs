//! Test-mode toggle and test-data reset.

use std::sync::Arc;

use tracing::info;
use warp::{Filter, Rejection, Reply};

use crate::errors::storage_reject;
use crate::state::ServerState;
use crate::types::{
    AdminIdentity, ResetResponse, TestModeResponse, TestModeUpdateRequest, TestModeUpdateResponse,
};
use crate::utils::{require_admin, with_state};

pub fn routes(state: Arc<ServerState>) -> warp::filters::BoxedFilter<(impl Reply,)> {
    let get_mode_route = {
        let state = Arc::clone(&state);
        warp::path!("api" / "test-mode")
            .and(warp::get())
            .and(require_admin(Arc::clone(&state)))
            .and(with_state(state))
            .and_then(|_admin: AdminIdentity, state: Arc<ServerState>| async move {
                get_mode_impl(state).await
            })
            .boxed()
    };

    let set_mode_route = {
        let state = Arc::clone(&state);
        warp::path!("api" / "test-mode")
            .and(warp::post())
            .and(require_admin(Arc::clone(&state)))
            .and(warp::body::json())
            .and(with_state(state))
            .and_then(
                |_admin: AdminIdentity, req: TestModeUpdateRequest, state: Arc<ServerState>| async move {
                    set_mode_impl(req, state).await
                },
            )
            .boxed()
    };

    let reset_route = {
        let state = Arc::clone(&state);
        warp::path!("api" / "reset-test-data")
            .and(warp::post())
            .and(require_admin(Arc::clone(&state)))
            .and(with_state(state))
            .and_then(|admin: AdminIdentity, state: Arc<ServerState>| async move {
                reset_impl(admin, state).await
            })
            .boxed()
    };

    get_mode_route.or(set_mode_route).or(reset_route).boxed()
}

async fn get_mode_impl(state: Arc<ServerState>) -> Result<impl Reply, Rejection> {
    Ok(warp::reply::json(&TestModeResponse {
        test_mode: state.settings.test_mode().await,
    }))
}

async fn set_mode_impl(
    req: TestModeUpdateRequest,
    state: Arc<ServerState>,
) -> Result<impl Reply, Rejection> {
    state
        .settings
        .set_test_mode(req.enabled)
        .await
        .map_err(storage_reject)?;
    Ok(warp::reply::json(&TestModeUpdateResponse {
        success: true,
        test_mode: req.enabled,
    }))
}

async fn reset_impl(
    admin: AdminIdentity,
    state: Arc<ServerState>,
) -> Result<impl Reply, Rejection> {
    // Log rows reference participants, so they go first.
    let log_rows = state
        .draw_log
        .remove_test_rows()
        .await
        .map_err(storage_reject)?;
    let participant_rows = state
        .participants
        .remove_test_rows()
        .await
        .map_err(storage_reject)?;
    info!(
        "test data reset by {}: {} log rows, {} participants removed",
        admin.username, log_rows, participant_rows
    );
    Ok(warp::reply::json(&ResetResponse {
        success: true,
        message: "Testdaten wurden zurückgesetzt".to_string(),
    }))
}
