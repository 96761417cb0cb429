//! Account, session and entitlement endpoints.

mod common;

use axum::http::StatusCode;
use common::{PASSWORD, spawn_app};
use serde_json::json;

#[tokio::test]
async fn test_protected_routes_require_login() {
    let app = spawn_app().await;
    let mut client = app.client();

    for uri in ["/getAnime", "/getCollections", "/profile", "/logout"] {
        let response = client.get(uri).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "{uri}");
        assert!(!response.error().is_empty());
    }

    let response = client.post("/addAnime", json!({ "title": "Bleach" })).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_signup_logs_in_and_profile_starts_free() {
    let app = spawn_app().await;
    let mut client = app.client();

    let response = client
        .post(
            "/signup",
            json!({ "username": "alice", "pass": PASSWORD, "pass2": PASSWORD }),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["redirect"], "/tracker");

    let profile = client.get("/profile").await;
    assert_eq!(profile.status, StatusCode::OK);
    assert_eq!(profile.body["username"], "alice");
    assert_eq!(profile.body["isPremium"], false);
    assert_eq!(profile.body["premiumCredits"], 0);
}

#[tokio::test]
async fn test_signup_validation() {
    let app = spawn_app().await;
    let mut client = app.client();

    let response = client
        .post("/signup", json!({ "username": "alice", "pass": PASSWORD }))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), "All fields are required");

    let response = client
        .post(
            "/signup",
            json!({ "username": "alice", "pass": PASSWORD, "pass2": "other" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), "Passwords do not match");

    assert!(client.is_logged_out());
}

#[tokio::test]
async fn test_duplicate_username_is_rejected() {
    let app = spawn_app().await;
    let _alice = app.signed_up("alice").await;

    let mut other = app.client();
    let response = other
        .post(
            "/signup",
            json!({ "username": "alice", "pass": "x", "pass2": "x" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), "Username already in use");
}

#[tokio::test]
async fn test_login_logout_cycle() {
    let app = spawn_app().await;
    let mut client = app.signed_up("alice").await;

    let response = client.get("/logout").await;
    assert!(response.status.is_redirection());
    assert_eq!(response.location(), Some("/"));

    let response = client.get("/profile").await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = client
        .post("/login", json!({ "username": "alice", "pass": "nope" }))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error(), "Wrong username or password");

    let response = client
        .post("/login", json!({ "username": "nobody", "pass": PASSWORD }))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = client.post("/login", json!({ "username": "alice" })).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = client
        .post("/login", json!({ "username": "alice", "pass": PASSWORD }))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["redirect"], "/tracker");

    let response = client.get("/profile").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["username"], "alice");
}

#[tokio::test]
async fn test_logged_in_clients_are_redirected_from_login() {
    let app = spawn_app().await;
    let mut client = app.signed_up("alice").await;

    let response = client
        .post("/login", json!({ "username": "alice", "pass": PASSWORD }))
        .await;
    assert!(response.status.is_redirection());
    assert_eq!(response.location(), Some("/tracker"));

    let response = client
        .post(
            "/signup",
            json!({ "username": "bob", "pass": PASSWORD, "pass2": PASSWORD }),
        )
        .await;
    assert!(response.status.is_redirection());

    // The redirect short-circuits, so bob was never created.
    let mut fresh = app.client();
    let response = fresh
        .post("/login", json!({ "username": "bob", "pass": PASSWORD }))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_change_password() {
    let app = spawn_app().await;
    let mut client = app.signed_up("alice").await;

    let response = client
        .post("/changePassword", json!({ "currentPassword": PASSWORD }))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = client
        .post(
            "/changePassword",
            json!({ "currentPassword": "wrong", "newPassword": "fresh-pass" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error(), "Current password is incorrect");

    let response = client
        .post(
            "/changePassword",
            json!({ "currentPassword": PASSWORD, "newPassword": "fresh-pass" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "Password changed successfully");

    let mut other = app.client();
    let response = other
        .post("/login", json!({ "username": "alice", "pass": PASSWORD }))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = other
        .post("/login", json!({ "username": "alice", "pass": "fresh-pass" }))
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_purchase_credits_transitions() {
    let app = spawn_app().await;
    let mut client = app.signed_up("alice").await;

    let response = client.post("/purchaseCredits", json!({ "amount": 5 })).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["isPremium"], true);
    assert_eq!(response.body["premiumCredits"], 5);

    let response = client.post("/purchaseCredits", json!({ "amount": 10 })).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["isPremium"], true);
    assert_eq!(response.body["premiumCredits"], 15);

    // The session snapshot follows the purchase.
    let profile = client.get("/profile").await;
    assert_eq!(profile.body["isPremium"], true);
    assert_eq!(profile.body["premiumCredits"], 15);
}

#[tokio::test]
async fn test_invalid_purchases_leave_state_unchanged() {
    let app = spawn_app().await;
    let mut client = app.signed_up("alice").await;

    for body in [
        json!({ "amount": 0 }),
        json!({ "amount": -3 }),
        json!({}),
    ] {
        let response = client.post("/purchaseCredits", body).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
    }

    let response = client
        .post("/purchaseCredits", json!({ "amount": "lots" }))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(!response.error().is_empty());

    let profile = client.get("/profile").await;
    assert_eq!(profile.body["isPremium"], false);
    assert_eq!(profile.body["premiumCredits"], 0);
}

#[tokio::test]
async fn test_malformed_json_is_a_json_error() {
    let app = spawn_app().await;
    let mut client = app.client();

    let response = client.post_raw("/login", "{not json").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(!response.error().is_empty());
}

#[tokio::test]
async fn test_grant_credits_uses_the_purchase_rules() {
    let app = spawn_app().await;
    let mut client = app.signed_up("alice").await;

    let accounts = app.state.account_service();
    assert!(accounts.grant_credits("alice", 0).await.is_err());
    assert!(accounts.grant_credits("nobody", 5).await.is_err());

    let account = accounts.grant_credits("alice", 7).await.unwrap();
    assert!(account.entitlement.is_premium);
    assert_eq!(account.entitlement.premium_credits, 7);

    // The live session keeps its snapshot until the next purchase or login.
    let profile = client.get("/profile").await;
    assert_eq!(profile.body["isPremium"], false);

    let response = client.post("/purchaseCredits", json!({ "amount": 1 })).await;
    assert_eq!(response.body["premiumCredits"], 8);
}

#[tokio::test]
async fn test_purchase_from_stale_session_cannot_overflow_balance() {
    let app = spawn_app().await;
    let mut first = app.signed_up("alice").await;

    let mut second = app.client();
    let response = second
        .post("/login", json!({ "username": "alice", "pass": PASSWORD }))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = second
        .post("/purchaseCredits", json!({ "amount": i64::MAX - 1 }))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    // The first session still believes the balance is 0.
    let response = first.post("/purchaseCredits", json!({ "amount": 5 })).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), "Credit balance would overflow");

    let accounts = app.state.account_service();
    assert!(accounts.grant_credits("alice", 2).await.is_err());

    // The stored balance is untouched and still readable.
    let mut fresh = app.client();
    let response = fresh
        .post("/login", json!({ "username": "alice", "pass": PASSWORD }))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let profile = fresh.get("/profile").await;
    assert_eq!(profile.status, StatusCode::OK);
    assert_eq!(profile.body["premiumCredits"], i64::MAX - 1);

    let response = fresh.post("/purchaseCredits", json!({ "amount": 1 })).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["premiumCredits"], i64::MAX);
}
