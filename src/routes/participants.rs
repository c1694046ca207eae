//! Admin participant list and CSV export.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use warp::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use warp::{Filter, Rejection, Reply};

use crate::core::export;
use crate::core::participants::{ParticipantFilter, ParticipantQuery, SortKey};
use crate::state::ServerState;
use crate::types::AdminIdentity;
use crate::utils::{require_admin, with_state};

pub fn routes(state: Arc<ServerState>) -> warp::filters::BoxedFilter<(impl Reply,)> {
    let list_route = {
        let state = Arc::clone(&state);
        warp::path!("api" / "participants")
            .and(warp::get())
            .and(require_admin(Arc::clone(&state)))
            .and(warp::query::<HashMap<String, String>>())
            .and(with_state(state))
            .and_then(
                |_admin: AdminIdentity, query: HashMap<String, String>, state: Arc<ServerState>| async move {
                    list_impl(query, state).await
                },
            )
            .boxed()
    };

    let export_route = {
        let state = Arc::clone(&state);
        warp::path!("api" / "export-csv")
            .and(warp::get())
            .and(require_admin(Arc::clone(&state)))
            .and(warp::query::<HashMap<String, String>>())
            .and(with_state(state))
            .and_then(
                |_admin: AdminIdentity, query: HashMap<String, String>, state: Arc<ServerState>| async move {
                    export_impl(query, state).await
                },
            )
            .boxed()
    };

    list_route.or(export_route).boxed()
}

fn query_from_params(params: &HashMap<String, String>) -> ParticipantQuery {
    let sort = SortKey::from_param(params.get("sort").map(String::as_str))
        .map(|key| (key, params.get("order").map(String::as_str) == Some("desc")));
    ParticipantQuery {
        filter: ParticipantFilter::from_param(params.get("filter").map(String::as_str)),
        search: params.get("search").filter(|s| !s.is_empty()).cloned(),
        sort,
    }
}

async fn list_impl(
    params: HashMap<String, String>,
    state: Arc<ServerState>,
) -> Result<impl Reply, Rejection> {
    let rows = state.participants.list(&query_from_params(&params)).await;
    Ok(warp::reply::json(&rows))
}

async fn export_impl(
    params: HashMap<String, String>,
    state: Arc<ServerState>,
) -> Result<impl Reply, Rejection> {
    let query = ParticipantQuery {
        filter: ParticipantFilter::from_param(params.get("filter").map(String::as_str)),
        ..Default::default()
    };
    let rows = state.participants.list(&query).await;
    let fields = export::parse_fields(params.get("fields").map(String::as_str));
    let csv = export::render_csv(&rows, &fields);
    let filename = export::filename(&fields, Utc::now());

    let reply = warp::reply::with_header(csv, CONTENT_TYPE, "text/csv; charset=utf-8");
    Ok(warp::reply::with_header(
        reply,
        CONTENT_DISPOSITION,
        format!("attachment; filename={}", filename),
    ))
}
