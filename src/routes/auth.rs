//! Login and logout.

use std::sync::Arc;

use tracing::warn;
use warp::http::header::SET_COOKIE;
use warp::http::Uri;
use warp::{Filter, Rejection, Reply};

use crate::core::session::SESSION_COOKIE;
use crate::errors::ServerError;
use crate::state::ServerState;
use crate::types::LoginRequest;
use crate::utils::with_state;

pub fn routes(state: Arc<ServerState>) -> warp::filters::BoxedFilter<(impl Reply,)> {
    let login_route = {
        let state = Arc::clone(&state);
        warp::path!("login")
            .and(warp::post())
            .and(warp::body::json())
            .and(with_state(state))
            .and_then(|req: LoginRequest, state: Arc<ServerState>| async move {
                login_impl(req, state).await
            })
            .boxed()
    };

    let logout_route = warp::path!("logout")
        .and(warp::get())
        .and(warp::cookie::optional::<String>(SESSION_COOKIE))
        .and(with_state(state))
        .and_then(|token: Option<String>, state: Arc<ServerState>| async move {
            logout_impl(token, state).await
        })
        .boxed();

    login_route.or(logout_route).boxed()
}

async fn login_impl(req: LoginRequest, state: Arc<ServerState>) -> Result<impl Reply, Rejection> {
    if !state.admins.verify(&req.username, &req.password).await {
        warn!("rejected login for {:?}", req.username);
        return Err(warp::reject::custom(ServerError::BadCredentials));
    }
    let token = state.sessions.create(&req.username).await;
    let reply = warp::redirect::see_other(Uri::from_static("/admin"));
    Ok(warp::reply::with_header(
        reply,
        SET_COOKIE,
        format!("{}={}; HttpOnly; Path=/", SESSION_COOKIE, token),
    ))
}

async fn logout_impl(
    token: Option<String>,
    state: Arc<ServerState>,
) -> Result<impl Reply, Rejection> {
    if let Some(token) = token {
        state.sessions.destroy(&token).await;
    }
    let reply = warp::redirect::see_other(Uri::from_static("/login"));
    Ok(warp::reply::with_header(
        reply,
        SET_COOKIE,
        format!("{}=; Max-Age=0; HttpOnly; Path=/", SESSION_COOKIE),
    ))
}
