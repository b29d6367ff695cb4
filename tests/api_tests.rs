//! HTTP API integration tests
//!
//! These tests drive the full router (auth gate included) through axum-test
//! against an in-memory libsql store.

mod common;

use axum::http::{Method, StatusCode};
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_test::TestServer;
use chrono::{Duration, Utc};
use common::logs::LogCapture;
use common::mocks::{create_test_state, InstrumentedStore, TEST_SECRET};
use rstest::rstest;
use satchel::{build_app, cart::UpdatePolicy, SessionCodec};
use serde_json::{json, Value};
use std::sync::Arc;

// ============= Test Helpers =============

/// Create a test server around `store`
fn create_test_server_with(store: Arc<InstrumentedStore>) -> TestServer {
    let app = build_app(create_test_state(store, UpdatePolicy::PerUserLock));
    TestServer::new(app).expect("Failed to create test server")
}

/// Create a test server with a fresh in-memory database
async fn create_test_server() -> (TestServer, Arc<InstrumentedStore>) {
    let store = Arc::new(InstrumentedStore::new().await);
    (create_test_server_with(store.clone()), store)
}

async fn register(server: &TestServer, username: &str, password: &str) -> Value {
    let response = server
        .post("/register")
        .json(&json!({ "username": username, "password": password }))
        .await;
    response.assert_status_ok();
    response.json()
}

/// Registers and logs in, returning the session token from the cookie.
async fn login_token(server: &TestServer, username: &str, password: &str) -> String {
    let response = server
        .post("/login")
        .json(&json!({ "username": username, "password": password }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true, "login failed: {body}");
    response.cookie("token").value().to_string()
}

fn session(token: &str) -> Cookie<'static> {
    Cookie::new("token", token.to_string())
}

// ============= Health Check Tests =============

#[tokio::test]
async fn test_health_check() {
    let (server, _) = create_test_server().await;

    let response = server.get("/health").await;
    response.assert_status_ok();
    response.assert_text("OK");
}

// ============= Registration Tests =============

#[tokio::test]
async fn test_register_user() {
    let (server, store) = create_test_server().await;

    let body = register(&server, "alice", "pw1").await;

    assert_eq!(body["success"], true);
    assert_eq!(store.inner().count_users_named("alice").await.unwrap(), 1);
}

#[tokio::test]
async fn test_register_does_not_log_in() {
    let (server, _) = create_test_server().await;

    let response = server
        .post("/register")
        .json(&json!({ "username": "alice", "password": "pw1" }))
        .await;

    assert!(response.maybe_cookie("token").is_none());
}

#[tokio::test]
async fn test_register_duplicate_user() {
    let (server, store) = create_test_server().await;

    register(&server, "alice", "pw1").await;
    let body = register(&server, "alice", "another").await;

    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "duplicate_username");
    assert_eq!(body["message"], "account already exists");
    assert_eq!(store.inner().count_users_named("alice").await.unwrap(), 1);

    // The first password still works
    login_token(&server, "alice", "pw1").await;
}

#[rstest]
#[case(json!({ "username": "alice" }))]
#[case(json!({ "password": "pw1" }))]
#[case(json!({ "username": "", "password": "pw1" }))]
#[case(json!({}))]
#[tokio::test]
async fn test_register_requires_both_fields(#[case] payload: Value) {
    let (server, store) = create_test_server().await;

    let response = server.post("/register").json(&payload).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "missing_field");
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn test_register_store_error_is_business_failure() {
    let (server, store) = create_test_server().await;
    store.fail_writes(true);

    let body = register(&server, "alice", "pw1").await;

    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "store_error");
}

// ============= Login Tests =============

#[tokio::test]
async fn test_register_and_login() {
    let (server, _) = create_test_server().await;
    register(&server, "alice", "pw1").await;

    let response = server
        .post("/login")
        .json(&json!({ "username": "alice", "password": "pw1" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["username"], "alice");

    let token = response.cookie("token").value().to_string();
    let claims = SessionCodec::new(TEST_SECRET)
        .verify(&token)
        .expect("cookie should carry a valid token");
    assert_eq!(claims.sub, "alice");
}

#[tokio::test]
async fn test_login_cookie_attributes() {
    let (server, _) = create_test_server().await;
    register(&server, "alice", "pw1").await;

    let response = server
        .post("/login")
        .json(&json!({ "username": "alice", "password": "pw1" }))
        .await;

    let cookie = response.cookie("token");
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.same_site(), Some(SameSite::Strict));
    assert_eq!(cookie.max_age(), Some(time::Duration::days(7)));
}

#[tokio::test]
async fn test_login_unknown_account() {
    let (server, _) = create_test_server().await;

    let response = server
        .post("/login")
        .json(&json!({ "username": "ghost", "password": "pw1" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "account does not exist");
    assert_eq!(body["code"], "unknown_account");
    assert!(response.maybe_cookie("token").is_none());
}

#[tokio::test]
async fn test_login_wrong_password() {
    let (server, _) = create_test_server().await;
    register(&server, "alice", "correct_password").await;

    for attempt in ["wrong", "", "correct_password ", "CORRECT_PASSWORD"] {
        let response = server
            .post("/login")
            .json(&json!({ "username": "alice", "password": attempt }))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "wrong password", "attempt {attempt:?}");
        assert!(response.maybe_cookie("token").is_none());
    }
}

#[tokio::test]
async fn test_login_store_error() {
    let (server, store) = create_test_server().await;
    register(&server, "alice", "pw1").await;
    store.fail_reads(true);

    let response = server
        .post("/login")
        .json(&json!({ "username": "alice", "password": "pw1" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "database error");
    assert_eq!(body["code"], "store_error");
}

// ============= Auth Gate Tests =============

#[tokio::test]
async fn test_check_login_with_session() {
    let (server, _) = create_test_server().await;
    register(&server, "alice", "pw1").await;
    let token = login_token(&server, "alice", "pw1").await;

    let response = server.get("/check-login").add_cookie(session(&token)).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["username"], "alice");
}

#[tokio::test]
async fn test_check_login_without_cookie() {
    let (server, _) = create_test_server().await;

    let response = server.get("/check-login").await;

    response.assert_status_unauthorized();
    let body: Value = response.json();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_check_login_with_expired_token() {
    let (server, _) = create_test_server().await;
    let expired = SessionCodec::new(TEST_SECRET)
        .issue_at("alice", Utc::now() - Duration::days(8))
        .expect("should issue");

    let response = server.get("/check-login").add_cookie(session(&expired)).await;

    response.assert_status(StatusCode::FORBIDDEN);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
}

#[rstest]
#[case::garbage("not-a-jwt")]
#[case::empty("")]
#[tokio::test]
async fn test_check_login_with_malformed_token(#[case] token: &str) {
    let (server, _) = create_test_server().await;

    let response = server.get("/check-login").add_cookie(session(token)).await;

    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_token_signed_with_other_secret_is_forbidden() {
    let (server, _) = create_test_server().await;
    let forged = SessionCodec::new("some-other-secret-of-reasonable-length")
        .issue("alice")
        .expect("should issue");

    let response = server.get("/cart").add_cookie(session(&forged)).await;

    response.assert_status(StatusCode::FORBIDDEN);
}

#[rstest]
#[case(Method::GET, "/cart")]
#[case(Method::GET, "/profile")]
#[case(Method::POST, "/cart/add")]
#[case(Method::POST, "/cart/remove")]
#[tokio::test]
async fn test_protected_routes_require_session(#[case] method: Method, #[case] path: &str) {
    let (server, store) = create_test_server().await;
    register(&server, "alice", "pw1").await;
    store.reset_calls();

    let response = server
        .method(method, path)
        .json(&json!({ "product": "sword" }))
        .await;

    response.assert_status_unauthorized();
    assert_eq!(store.calls(), 0, "store must not be touched");
}

// ============= Auth Gate Logging Tests =============

const MISSING_COOKIE_LOG: &str = "request without session cookie";

#[tokio::test]
async fn test_check_login_without_cookie_is_not_logged() {
    let (server, _) = create_test_server().await;
    let logs = LogCapture::default();
    let _guard = logs.install();

    server.get("/check-login").await.assert_status_unauthorized();

    assert!(
        !logs.contents().contains(MISSING_COOKIE_LOG),
        "unexpected log: {}",
        logs.contents()
    );
}

#[rstest]
#[case(Method::GET, "/cart")]
#[case(Method::GET, "/profile")]
#[case(Method::POST, "/cart/add")]
#[tokio::test]
async fn test_protected_action_without_cookie_is_logged(
    #[case] method: Method,
    #[case] path: &str,
) {
    let (server, _) = create_test_server().await;
    let logs = LogCapture::default();
    let _guard = logs.install();

    server
        .method(method, path)
        .json(&json!({ "product": "sword" }))
        .await
        .assert_status_unauthorized();

    let output = logs.contents();
    let line = output
        .lines()
        .find(|line| line.contains(MISSING_COOKIE_LOG))
        .unwrap_or_else(|| panic!("no warning for {path}: {output}"));
    assert!(line.contains("WARN"));
    assert!(line.contains(path));
}

// ============= Request Body Tests =============

#[rstest]
#[case::missing_product(json!({}))]
#[case::numeric_product(json!({ "product": 5 }))]
#[case::null_product(json!({ "product": null }))]
#[tokio::test]
async fn test_malformed_cart_body_gets_envelope(#[case] payload: Value) {
    let (server, store) = create_test_server().await;
    register(&server, "alice", "pw1").await;
    let token = login_token(&server, "alice", "pw1").await;

    for path in ["/cart/add", "/cart/remove"] {
        store.reset_calls();
        let response = server
            .post(path)
            .add_cookie(session(&token))
            .json(&payload)
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["success"], false, "{path}");
        assert_eq!(body["code"], "invalid_input", "{path}");
        assert!(body["message"].is_string());
        assert_eq!(store.calls(), 0, "{path} must not touch the store");
    }

    let cart: Value = server.get("/cart").add_cookie(session(&token)).await.json();
    assert_eq!(cart["cart"], json!([]));
}

#[rstest]
#[case("/login")]
#[case("/register")]
#[tokio::test]
async fn test_non_json_credentials_get_envelope(#[case] path: &str) {
    let (server, store) = create_test_server().await;

    let response = server.post(path).text("username=alice&password=pw1").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "invalid_input");
    assert!(response.maybe_cookie("token").is_none());
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn test_truncated_json_gets_envelope() {
    let (server, _) = create_test_server().await;

    let response = server
        .post("/login")
        .content_type("application/json")
        .bytes(r#"{"username":"alice","#.into())
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "invalid_input");
}

// ============= Cart Tests =============

#[tokio::test]
async fn test_cart_scenario() {
    let (server, _) = create_test_server().await;

    let body = register(&server, "alice", "pw1").await;
    assert_eq!(body["success"], true);
    let token = login_token(&server, "alice", "pw1").await;

    let response = server
        .post("/cart/add")
        .add_cookie(session(&token))
        .json(&json!({ "product": "sword" }))
        .await;
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["cart"], json!(["sword"]));

    let response = server
        .post("/cart/add")
        .add_cookie(session(&token))
        .json(&json!({ "product": "sword" }))
        .await;
    let body: Value = response.json();
    assert_eq!(body["cart"], json!(["sword", "sword"]));

    let response = server
        .post("/cart/remove")
        .add_cookie(session(&token))
        .json(&json!({ "product": "sword" }))
        .await;
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["cart"], json!([]));

    server.get("/check-login").await.assert_status_unauthorized();

    let expired = SessionCodec::new(TEST_SECRET)
        .issue_at("alice", Utc::now() - Duration::days(8))
        .expect("should issue");
    server
        .get("/check-login")
        .add_cookie(session(&expired))
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_get_cart_reflects_adds() {
    let (server, _) = create_test_server().await;
    register(&server, "alice", "pw1").await;
    let token = login_token(&server, "alice", "pw1").await;

    let body: Value = server.get("/cart").add_cookie(session(&token)).await.json();
    assert_eq!(body["cart"], json!([]));

    for product in ["potion", "shield", "potion"] {
        server
            .post("/cart/add")
            .add_cookie(session(&token))
            .json(&json!({ "product": product }))
            .await
            .assert_status_ok();
    }

    let body: Value = server.get("/cart").add_cookie(session(&token)).await.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["cart"], json!(["potion", "shield", "potion"]));
}

#[tokio::test]
async fn test_remove_missing_product_is_noop() {
    let (server, _) = create_test_server().await;
    register(&server, "alice", "pw1").await;
    let token = login_token(&server, "alice", "pw1").await;

    server
        .post("/cart/add")
        .add_cookie(session(&token))
        .json(&json!({ "product": "shield" }))
        .await;

    let body: Value = server
        .post("/cart/remove")
        .add_cookie(session(&token))
        .json(&json!({ "product": "sword" }))
        .await
        .json();

    assert_eq!(body["success"], true);
    assert_eq!(body["cart"], json!(["shield"]));
}

#[tokio::test]
async fn test_identity_comes_from_cookie_not_body() {
    let (server, _) = create_test_server().await;
    register(&server, "alice", "pw1").await;
    register(&server, "bob", "pw2").await;
    let alice = login_token(&server, "alice", "pw1").await;
    let bob = login_token(&server, "bob", "pw2").await;

    server
        .post("/cart/add")
        .add_cookie(session(&alice))
        .json(&json!({ "product": "sword", "username": "bob" }))
        .await
        .assert_status_ok();

    let alice_cart: Value = server.get("/cart").add_cookie(session(&alice)).await.json();
    let bob_cart: Value = server.get("/cart").add_cookie(session(&bob)).await.json();
    assert_eq!(alice_cart["cart"], json!(["sword"]));
    assert_eq!(bob_cart["cart"], json!([]));
}

#[tokio::test]
async fn test_cart_read_failure() {
    let (server, store) = create_test_server().await;
    register(&server, "alice", "pw1").await;
    let token = login_token(&server, "alice", "pw1").await;
    store.fail_reads(true);

    let response = server.get("/cart").add_cookie(session(&token)).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "failed to read cart");
}

#[tokio::test]
async fn test_cart_write_failure() {
    let (server, store) = create_test_server().await;
    register(&server, "alice", "pw1").await;
    let token = login_token(&server, "alice", "pw1").await;
    store.fail_writes(true);

    let add: Value = server
        .post("/cart/add")
        .add_cookie(session(&token))
        .json(&json!({ "product": "sword" }))
        .await
        .json();
    assert_eq!(add["success"], false);
    assert_eq!(add["message"], "failed to add to cart");

    let remove: Value = server
        .post("/cart/remove")
        .add_cookie(session(&token))
        .json(&json!({ "product": "sword" }))
        .await
        .json();
    assert_eq!(remove["success"], false);
    assert_eq!(remove["message"], "failed to remove from cart");

    store.fail_writes(false);
    let cart: Value = server.get("/cart").add_cookie(session(&token)).await.json();
    assert_eq!(cart["cart"], json!([]));
}

#[tokio::test]
async fn test_corrupt_stored_cart_reads_empty() {
    let (server, store) = create_test_server().await;
    register(&server, "alice", "pw1").await;
    let token = login_token(&server, "alice", "pw1").await;

    store
        .inner()
        .connection()
        .execute(
            "UPDATE users SET cart = 'not json' WHERE username = ?",
            ["alice"],
        )
        .await
        .expect("corrupt the cart");

    let body: Value = server.get("/cart").add_cookie(session(&token)).await.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["cart"], json!([]));
}

// ============= Profile Tests =============

#[tokio::test]
async fn test_profile_includes_cart() {
    let (server, _) = create_test_server().await;
    register(&server, "alice", "pw1").await;
    let token = login_token(&server, "alice", "pw1").await;

    server
        .post("/cart/add")
        .add_cookie(session(&token))
        .json(&json!({ "product": "lantern" }))
        .await;

    let body: Value = server.get("/profile").add_cookie(session(&token)).await.json();

    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["username"], "alice");
    assert_eq!(body["user"]["cart"], json!(["lantern"]));
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_profile_for_missing_account() {
    let (server, _) = create_test_server().await;
    let token = SessionCodec::new(TEST_SECRET)
        .issue("nobody")
        .expect("should issue");

    let response = server.get("/profile").add_cookie(session(&token)).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "user not found");
}

// ============= Logout Tests =============

#[tokio::test]
async fn test_logout_clears_cookie() {
    let (server, _) = create_test_server().await;

    let response = server.post("/logout").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);

    let set_cookie = response
        .headers()
        .get("set-cookie")
        .expect("logout should set a cookie")
        .to_str()
        .expect("ascii header");
    assert!(set_cookie.starts_with("token="));
    assert!(set_cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_token_outlives_logout() {
    // No server-side session table: a copied token stays valid after logout.
    let (server, _) = create_test_server().await;
    register(&server, "alice", "pw1").await;
    let token = login_token(&server, "alice", "pw1").await;

    server
        .post("/logout")
        .add_cookie(session(&token))
        .await
        .assert_status_ok();

    server
        .get("/check-login")
        .add_cookie(session(&token))
        .await
        .assert_status_ok();
}
