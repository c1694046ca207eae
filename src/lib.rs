//! Tombola: raffle signup and administration service.
//!
//! Public intake collects participant entries, an authenticated admin API
//! lists/exports participants and runs the randomized winner draw. A
//! persisted "test mode" flag partitions test entries from real entries so
//! that a rehearsal can never touch a real prize draw.

use std::sync::Arc;

use warp::filters::BoxedFilter;
use warp::{Filter, Reply};

pub mod config;
pub mod core;
pub mod errors;
pub mod routes;
pub mod state;
pub mod types;
pub mod utils;

use state::ServerState;

/// Compose the full application filter: admin API, public surface and the
/// rejection handler. Groups are boxed separately to keep filter types flat.
pub fn app(state: Arc<ServerState>) -> BoxedFilter<(impl Reply,)> {
    let api_group = routes::draw::routes(Arc::clone(&state))
        .or(routes::participants::routes(Arc::clone(&state)))
        .or(routes::settings::routes(Arc::clone(&state)))
        .boxed();

    let public_group = routes::intake::routes(Arc::clone(&state))
        .or(routes::auth::routes(Arc::clone(&state)))
        .or(routes::pages::routes(state))
        .boxed();

    api_group
        .or(public_group)
        .recover(errors::handle_rejection)
        .boxed()
}
