use std::convert::Infallible;
use std::sync::Arc;

use warp::{Filter, Rejection};

use crate::core::session::SESSION_COOKIE;
use crate::errors::ServerError;
use crate::state::ServerState;
use crate::types::AdminIdentity;

pub fn with_state(
    state: Arc<ServerState>,
) -> impl Filter<Extract = (Arc<ServerState>,), Error = Infallible> + Clone {
    warp::any().map(move || Arc::clone(&state))
}

/// Gate for admin routes: resolves the session cookie to an admin identity
/// or rejects with `SessionRequired`.
pub fn require_admin(
    state: Arc<ServerState>,
) -> impl Filter<Extract = (AdminIdentity,), Error = Rejection> + Clone {
    warp::cookie::optional::<String>(SESSION_COOKIE)
        .and(with_state(state))
        .and_then(
            |token: Option<String>, state: Arc<ServerState>| async move {
                let username = match token {
                    Some(token) => state.sessions.validate(&token).await,
                    None => None,
                };
                match username {
                    Some(username) => Ok(AdminIdentity { username }),
                    None => Err(warp::reject::custom(ServerError::SessionRequired)),
                }
            },
        )
}
