//! End-to-end coverage of registration, login, and federated sign-in.

mod common;

use actix_web::http::StatusCode;
use serde_json::json;

use common::{TEST_SECRET, body_json, post_json, register_user, spawn_app};
use lifevein_backend::domain::TokenIssuer;

#[actix_web::test]
async fn register_then_login_round_trips_the_subject() {
    let (app, _) = spawn_app().await;
    let issuer = TokenIssuer::new(TEST_SECRET);

    let (register_token, user_id, _) = register_user(&app, "a@x.com", "secret-pw").await;

    let response = post_json(
        &app,
        "/api/v1/auth/login",
        None,
        json!({ "email": "a@x.com", "password": "secret-pw" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let payload = body_json(response).await;
    let login_token = payload["token"].as_str().expect("token present");

    let first = issuer.verify(&register_token).expect("register token valid");
    let second = issuer.verify(login_token).expect("login token valid");
    assert_eq!(first.sub, second.sub);
    assert_eq!(first.sub.to_string(), user_id);
}

#[actix_web::test]
async fn duplicate_registration_is_a_400_with_details() {
    let (app, _) = spawn_app().await;
    register_user(&app, "a@x.com", "secret-pw").await;

    let response = post_json(
        &app,
        "/api/v1/auth/register",
        None,
        json!({
            "name": "Other",
            "email": "a@x.com",
            "password": "different-pw",
            "phone": "5550199",
            "bloodGroup": "A+",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = body_json(response).await;
    assert_eq!(payload["details"]["code"], "duplicate_identity");
}

#[actix_web::test]
async fn short_passwords_fail_validation() {
    let (app, _) = spawn_app().await;
    let response = post_json(
        &app,
        "/api/v1/auth/register",
        None,
        json!({
            "name": "Test User",
            "email": "short@x.com",
            "password": "tiny",
            "phone": "5550100",
            "bloodGroup": "O+",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = body_json(response).await;
    assert_eq!(payload["details"]["field"], "password");
}

#[actix_web::test]
async fn unknown_email_and_wrong_password_read_identically() {
    let (app, _) = spawn_app().await;
    register_user(&app, "a@x.com", "secret-pw").await;

    let wrong_password = body_json(
        post_json(
            &app,
            "/api/v1/auth/login",
            None,
            json!({ "email": "a@x.com", "password": "wrong-pw" }),
        )
        .await,
    )
    .await;
    let unknown_email = body_json(
        post_json(
            &app,
            "/api/v1/auth/login",
            None,
            json!({ "email": "nobody@x.com", "password": "secret-pw" }),
        )
        .await,
    )
    .await;

    assert_eq!(wrong_password["message"], unknown_email["message"]);
    assert_eq!(wrong_password["code"], unknown_email["code"]);
}

#[actix_web::test]
async fn login_responses_never_leak_password_material() {
    let (app, _) = spawn_app().await;
    let (_, _, payload) = register_user(&app, "a@x.com", "secret-pw").await;
    let text = payload.to_string();
    assert!(!text.contains("password"));
    assert!(!text.contains("$2b$"));
}

#[actix_web::test]
async fn google_login_requires_the_provider_fields() {
    let (app, _) = spawn_app().await;
    let response = post_json(
        &app,
        "/api/v1/auth/google",
        None,
        json!({ "email": "g@x.com", "name": "Gita" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn google_login_creates_once_and_reuses_after() {
    let (app, _) = spawn_app().await;
    let body = json!({
        "email": "g@x.com",
        "name": "Gita",
        "googleId": "google-123",
        "photoURL": "https://photos.example/1.jpg",
    });

    let first = body_json(post_json(&app, "/api/v1/auth/google", None, body.clone()).await).await;
    let second = body_json(post_json(&app, "/api/v1/auth/google", None, body).await).await;
    assert_eq!(first["user"]["id"], second["user"]["id"]);
    assert_eq!(first["user"]["photoUrl"], "https://photos.example/1.jpg");
}

#[actix_web::test]
async fn bank_and_user_email_uniqueness_are_independent() {
    // The two identity tables are independently unique on email; the same
    // address may exist in both.
    let (app, _) = spawn_app().await;
    register_user(&app, "shared@x.com", "secret-pw").await;

    let response = post_json(
        &app,
        "/api/v1/banks/register",
        None,
        json!({
            "name": "City Blood Bank",
            "email": "shared@x.com",
            "password": "bank-secret",
            "phone": "5550123",
            "licenseNumber": "LIC-1",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[actix_web::test]
async fn duplicate_bank_licence_is_refused() {
    let (app, _) = spawn_app().await;
    common::register_bank(&app, "bank1@x.com", "LIC-SAME").await;

    let response = post_json(
        &app,
        "/api/v1/banks/register",
        None,
        json!({
            "name": "Other Bank",
            "email": "bank2@x.com",
            "password": "bank-secret",
            "phone": "5550124",
            "licenseNumber": "LIC-SAME",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = body_json(response).await;
    assert_eq!(payload["details"]["code"], "duplicate_identity");
}
