//! End-to-end tests over the composed application filter.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::{json, Value};
use warp::filters::BoxedFilter;
use warp::http::StatusCode;
use warp::Reply;

use tombola_server::config::Config;
use tombola_server::state::ServerState;

async fn test_app() -> (BoxedFilter<(impl Reply,)>, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        port: 0,
        data_dir: dir.path().to_path_buf(),
        admin_username: "admin".to_string(),
        admin_password: "geheim".to_string(),
        session_ttl_secs: 3600,
        winner_count: 3,
    };
    let state = Arc::new(ServerState::new(&config).await.unwrap());
    (tombola_server::app(state), dir)
}

async fn login(app: &BoxedFilter<(impl Reply + 'static,)>) -> String {
    let resp = warp::test::request()
        .method("POST")
        .path("/login")
        .json(&json!({"username": "admin", "password": "geheim"}))
        .reply(app)
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let cookie = resp
        .headers()
        .get("set-cookie")
        .expect("login sets a session cookie")
        .to_str()
        .unwrap();
    cookie.split(';').next().unwrap().to_string()
}

async fn submit(
    app: &BoxedFilter<(impl Reply + 'static,)>,
    firstname: &str,
    lastname: &str,
    email: &str,
) {
    let resp = warp::test::request()
        .method("POST")
        .path("/submit")
        .json(&json!({"firstname": firstname, "lastname": lastname, "email": email}))
        .reply(app)
        .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
}

fn body_json(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap()
}

#[tokio::test]
async fn admin_api_requires_a_session() {
    let (app, _dir) = test_app().await;
    for (method, path) in [
        ("GET", "/api/participants"),
        ("GET", "/api/export-csv"),
        ("POST", "/api/draw"),
        ("GET", "/api/draw-logs"),
        ("GET", "/api/test-mode"),
        ("POST", "/api/reset-test-data"),
    ] {
        let resp = warp::test::request()
            .method(method)
            .path(path)
            .reply(&app)
            .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{} {}", method, path);
    }
    // The panel page redirects to the login page instead.
    let resp = warp::test::request().path("/admin").reply(&app).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get("location").unwrap(), "/login");
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let (app, _dir) = test_app().await;
    let resp = warp::test::request()
        .method("POST")
        .path("/login")
        .json(&json!({"username": "admin", "password": "falsch"}))
        .reply(&app)
        .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(resp.body())["error"],
        "Ungültige Anmeldedaten"
    );
}

#[tokio::test]
async fn submit_validates_input() {
    let (app, _dir) = test_app().await;

    let resp = warp::test::request()
        .method("POST")
        .path("/submit")
        .json(&json!({"firstname": "Anna", "lastname": "", "email": "anna@example.com"}))
        .reply(&app)
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(resp.body())["error"],
        "Alle Felder müssen ausgefüllt werden"
    );

    let resp = warp::test::request()
        .method("POST")
        .path("/submit")
        .json(&json!({"firstname": "Anna", "lastname": "Becker", "email": "keine-mail"}))
        .reply(&app)
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp.body())["error"], "Ungültige E-Mail-Adresse");
}

#[tokio::test]
async fn draw_requires_three_participants() {
    let (app, _dir) = test_app().await;
    let cookie = login(&app).await;
    submit(&app, "Anna", "Becker", "anna@example.com").await;
    submit(&app, "Bernd", "Adler", "bernd@example.com").await;

    let resp = warp::test::request()
        .method("POST")
        .path("/api/draw")
        .header("cookie", &cookie)
        .reply(&app)
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let error = body_json(resp.body())["error"].as_str().unwrap().to_string();
    assert!(error.contains("Mindestens 3"), "unexpected error: {}", error);
    assert!(!error.contains("Test-"));

    // The failed draw wrote nothing to the log.
    let resp = warp::test::request()
        .method("GET")
        .path("/api/draw-logs")
        .header("cookie", &cookie)
        .reply(&app)
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp.body()).as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn full_draw_flow() {
    let (app, _dir) = test_app().await;
    let cookie = login(&app).await;
    submit(&app, "Anna", "Becker", "anna@example.com").await;
    submit(&app, "Bernd", "Adler", "bernd@example.com").await;
    submit(&app, "Clara", "Curt", "clara@example.com").await;
    submit(&app, "Doris", "Dahl", "doris@example.com").await;
    submit(&app, "Emil", "Ernst", "emil@example.com").await;

    let resp = warp::test::request()
        .method("POST")
        .path("/api/draw")
        .header("cookie", &cookie)
        .reply(&app)
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp.body());
    assert_eq!(body["success"], true);
    assert_eq!(body["isTestDraw"], false);
    let winners = body["winners"].as_array().unwrap();
    assert_eq!(winners.len(), 3);
    let ids: HashSet<&str> = winners.iter().map(|w| w["id"].as_str().unwrap()).collect();
    assert_eq!(ids.len(), 3);
    let places: Vec<u64> = winners.iter().map(|w| w["place"].as_u64().unwrap()).collect();
    assert_eq!(places, vec![1, 2, 3]);

    let resp = warp::test::request()
        .method("GET")
        .path("/api/draw-logs")
        .header("cookie", &cookie)
        .reply(&app)
        .await;
    let logs = body_json(resp.body());
    let logs = logs.as_array().unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0]["isTest"], false);
    assert_eq!(logs[0]["admin"], "admin");
    let log_places: Vec<u64> = logs[0]["winners"]
        .as_array()
        .unwrap()
        .iter()
        .map(|w| w["place"].as_u64().unwrap())
        .collect();
    assert_eq!(log_places, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_mode_partitions_entries_and_reset_clears_them() {
    let (app, _dir) = test_app().await;
    let cookie = login(&app).await;

    // Real entry while test mode is off.
    submit(&app, "Anna", "Becker", "anna@example.com").await;

    let resp = warp::test::request()
        .method("GET")
        .path("/api/test-mode")
        .header("cookie", &cookie)
        .reply(&app)
        .await;
    assert_eq!(body_json(resp.body())["testMode"], false);

    let resp = warp::test::request()
        .method("POST")
        .path("/api/test-mode")
        .header("cookie", &cookie)
        .json(&json!({"enabled": true}))
        .reply(&app)
        .await;
    assert_eq!(body_json(resp.body())["testMode"], true);

    // This entry is stamped as test data.
    submit(&app, "Tina", "Test", "tina@test.example").await;

    // A test draw sees only the single test participant.
    let resp = warp::test::request()
        .method("POST")
        .path("/api/draw")
        .header("cookie", &cookie)
        .reply(&app)
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let error = body_json(resp.body())["error"].as_str().unwrap().to_string();
    assert!(error.contains("Test-"), "unexpected error: {}", error);

    let resp = warp::test::request()
        .method("GET")
        .path("/api/participants?filter=test")
        .header("cookie", &cookie)
        .reply(&app)
        .await;
    assert_eq!(body_json(resp.body()).as_array().unwrap().len(), 1);

    let resp = warp::test::request()
        .method("POST")
        .path("/api/reset-test-data")
        .header("cookie", &cookie)
        .reply(&app)
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        body_json(resp.body())["message"],
        "Testdaten wurden zurückgesetzt"
    );

    // Only the real entry remains.
    let resp = warp::test::request()
        .method("GET")
        .path("/api/participants")
        .header("cookie", &cookie)
        .reply(&app)
        .await;
    let rows = body_json(resp.body());
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["email"], "anna@example.com");
}

#[tokio::test]
async fn csv_export_shape() {
    let (app, _dir) = test_app().await;
    let cookie = login(&app).await;

    // Header-only file when nothing is registered.
    let resp = warp::test::request()
        .method("GET")
        .path("/api/export-csv")
        .header("cookie", &cookie)
        .reply(&app)
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(std::str::from_utf8(resp.body()).unwrap(), "Name;Email\n");
    let disposition = resp
        .headers()
        .get("content-disposition")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(disposition.contains("email-kontakte-"));

    submit(&app, "Anna", "Becker", "anna@example.com").await;
    submit(&app, "Bernd", "Adler", "bernd@example.com").await;

    let resp = warp::test::request()
        .method("GET")
        .path("/api/export-csv?fields=name,email,test")
        .header("cookie", &cookie)
        .reply(&app)
        .await;
    let text = std::str::from_utf8(resp.body()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "Name;Email;Testdaten");
    assert!(lines.iter().skip(1).all(|l| l.ends_with(";Nein")));
}

#[tokio::test]
async fn logout_invalidates_the_session() {
    let (app, _dir) = test_app().await;
    let cookie = login(&app).await;

    let resp = warp::test::request()
        .method("GET")
        .path("/logout")
        .header("cookie", &cookie)
        .reply(&app)
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let resp = warp::test::request()
        .method("GET")
        .path("/api/participants")
        .header("cookie", &cookie)
        .reply(&app)
        .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
