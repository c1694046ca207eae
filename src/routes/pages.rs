//! Minimal built-in pages. No templating: the form and the admin panel are
//! plain HTML talking to the JSON endpoints.

use std::sync::Arc;

use warp::http::Uri;
use warp::{Filter, Rejection, Reply};

use crate::core::session::SESSION_COOKIE;
use crate::state::ServerState;
use crate::utils::with_state;

const FORM_HTML: &str = r#"<!doctype html>
<html lang="de"><head><meta charset="utf-8"><title>Tombola</title></head>
<body>
<h1>Tombola-Anmeldung</h1>
<form method="post" onsubmit="send(event)">
  <input id="firstname" placeholder="Vorname" required>
  <input id="lastname" placeholder="Nachname" required>
  <input id="email" type="email" placeholder="E-Mail" required>
  <button>Teilnehmen</button>
</form>
<p id="out"></p>
<script>
async function send(e){e.preventDefault();
 const r=await fetch('/submit',{method:'POST',headers:{'Content-Type':'application/json'},
  body:JSON.stringify({firstname:firstname.value,lastname:lastname.value,email:email.value})});
 const j=await r.json();out.textContent=j.message||j.error;}
</script>
</body></html>
"#;

const LOGIN_HTML: &str = r#"<!doctype html>
<html lang="de"><head><meta charset="utf-8"><title>Tombola Login</title></head>
<body>
<h1>Admin-Login</h1>
<form method="post" onsubmit="send(event)">
  <input id="username" placeholder="Benutzername" required>
  <input id="password" type="password" placeholder="Passwort" required>
  <button>Anmelden</button>
</form>
<p id="out"></p>
<script>
async function send(e){e.preventDefault();
 const r=await fetch('/login',{method:'POST',headers:{'Content-Type':'application/json'},
  body:JSON.stringify({username:username.value,password:password.value})});
 if(r.redirected){location.href=r.url;}else{const j=await r.json();out.textContent=j.error;}}
</script>
</body></html>
"#;

const ADMIN_HTML: &str = r#"<!doctype html>
<html lang="de"><head><meta charset="utf-8"><title>Tombola Admin</title></head>
<body>
<h1>Tombola-Verwaltung</h1>
<p>Endpunkte: <code>/api/participants</code>, <code>/api/export-csv</code>,
<code>/api/draw</code>, <code>/api/draw-logs</code>, <code>/api/test-mode</code>,
<code>/api/reset-test-data</code> &mdash; <a href="/logout">Abmelden</a></p>
</body></html>
"#;

pub fn routes(state: Arc<ServerState>) -> warp::filters::BoxedFilter<(impl Reply,)> {
    let root_route = warp::path::end()
        .and(warp::get())
        .map(|| warp::redirect::see_other(Uri::from_static("/form")))
        .boxed();

    let form_route = warp::path!("form")
        .and(warp::get())
        .map(|| warp::reply::html(FORM_HTML))
        .boxed();

    let login_route = warp::path!("login")
        .and(warp::get())
        .map(|| warp::reply::html(LOGIN_HTML))
        .boxed();

    // Unauthenticated hits on the panel are redirected to the login page
    // instead of getting the API's 401.
    let admin_route = warp::path!("admin")
        .and(warp::get())
        .and(warp::cookie::optional::<String>(SESSION_COOKIE))
        .and(with_state(state))
        .and_then(|token: Option<String>, state: Arc<ServerState>| async move {
            admin_impl(token, state).await
        })
        .boxed();

    root_route
        .or(form_route)
        .or(login_route)
        .or(admin_route)
        .boxed()
}

async fn admin_impl(
    token: Option<String>,
    state: Arc<ServerState>,
) -> Result<warp::reply::Response, Rejection> {
    let authenticated = match token {
        Some(token) => state.sessions.validate(&token).await.is_some(),
        None => false,
    };
    if authenticated {
        Ok(warp::reply::html(ADMIN_HTML).into_response())
    } else {
        Ok(warp::redirect::see_other(Uri::from_static("/login")).into_response())
    }
}
