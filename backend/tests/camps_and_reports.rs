//! End-to-end coverage of camps and the admin reporting surface.

mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::json;

use common::{body_json, get, post_json, register_bank, register_user, spawn_app};
use lifevein_backend::domain::ports::UserRepository;
use lifevein_backend::domain::{EmailAddress, Role};

fn camp_body() -> serde_json::Value {
    json!({
        "name": "Spring Drive",
        "date": "2030-05-01T09:00:00Z",
        "startTime": "09:00",
        "endTime": "16:00",
        "venue": "Town Hall",
        "address": "1 Main St",
        "city": "Springfield",
        "state": "IL",
        "pincode": "62701",
        "targetUnits": 50,
    })
}

#[actix_web::test]
async fn camp_creation_is_bank_only() {
    let (app, _) = spawn_app().await;
    let (user_token, _, _) = register_user(&app, "a@x.com", "secret-pw").await;

    let response = post_json(&app, "/api/v1/camps", Some(&user_token), camp_body()).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let (bank_token, bank_id) = register_bank(&app, "bank@x.com", "LIC-1").await;
    let response = post_json(&app, "/api/v1/camps", Some(&bank_token), camp_body()).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = body_json(response).await;
    assert_eq!(payload["camp"]["organizer"], bank_id.as_str());
    assert_eq!(payload["camp"]["status"], "scheduled");
    // Contact details defaulted from the bank account.
    assert_eq!(payload["camp"]["contactEmail"], "bank@x.com");
}

#[actix_web::test]
async fn only_the_organiser_updates_or_deletes_a_camp() {
    let (app, _) = spawn_app().await;
    let (owner_token, _) = register_bank(&app, "owner@x.com", "LIC-1").await;
    let (other_token, _) = register_bank(&app, "other@x.com", "LIC-2").await;

    let created =
        body_json(post_json(&app, "/api/v1/camps", Some(&owner_token), camp_body()).await).await;
    let camp_id = created["camp"]["id"].as_str().expect("camp id");

    let response = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/v1/camps/{camp_id}"))
            .insert_header(("Authorization", format!("Bearer {other_token}")))
            .set_json(json!({ "status": "cancelled" }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/v1/camps/{camp_id}"))
            .insert_header(("Authorization", format!("Bearer {owner_token}")))
            .set_json(json!({ "status": "completed", "targetUnits": 80 }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let payload = body_json(response).await;
    assert_eq!(payload["camp"]["status"], "completed");
    assert_eq!(payload["camp"]["targetUnits"], 80);

    let response = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/camps/{camp_id}"))
            .insert_header(("Authorization", format!("Bearer {other_token}")))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/camps/{camp_id}"))
            .insert_header(("Authorization", format!("Bearer {owner_token}")))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(&app, &format!("/api/v1/camps/{camp_id}"), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn donors_register_once_per_camp() {
    let (app, _) = spawn_app().await;
    let (bank_token, _) = register_bank(&app, "bank@x.com", "LIC-1").await;
    let (user_token, user_id, _) = register_user(&app, "ravi@x.com", "secret-pw").await;

    let created =
        body_json(post_json(&app, "/api/v1/camps", Some(&bank_token), camp_body()).await).await;
    let camp_id = created["camp"]["id"].as_str().expect("camp id");

    let register_path = format!("/api/v1/camps/{camp_id}/register");
    let response = post_json(&app, &register_path, Some(&user_token), json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json(&app, &register_path, Some(&user_token), json!({})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let camp = body_json(get(&app, &format!("/api/v1/camps/{camp_id}"), None).await).await;
    let donors = camp["registeredDonors"].as_array().expect("array");
    assert_eq!(donors.len(), 1);
    assert_eq!(donors[0]["donor"], user_id.as_str());
}

#[actix_web::test]
async fn the_public_feed_defaults_to_upcoming_camps() {
    let (app, _) = spawn_app().await;
    let (bank_token, _) = register_bank(&app, "bank@x.com", "LIC-1").await;

    let mut past = camp_body();
    past["date"] = json!("2020-05-01T09:00:00Z");
    post_json(&app, "/api/v1/camps", Some(&bank_token), past).await;
    post_json(&app, "/api/v1/camps", Some(&bank_token), camp_body()).await;

    let feed = body_json(get(&app, "/api/v1/camps", None).await).await;
    assert_eq!(feed.as_array().map(Vec::len), Some(1));

    let all = body_json(get(&app, "/api/v1/camps?status=scheduled", None).await).await;
    assert_eq!(all.as_array().map(Vec::len), Some(2));

    let city = body_json(get(&app, "/api/v1/camps?city=spring", None).await).await;
    assert_eq!(city.as_array().map(Vec::len), Some(1));
}

#[actix_web::test]
async fn reports_are_admin_only() {
    let (app, _stores) = spawn_app().await;
    let (user_token, _, _) = register_user(&app, "plain@x.com", "secret-pw").await;
    let (bank_token, _) = register_bank(&app, "bank@x.com", "LIC-1").await;

    // A plain user is authenticated but lacks the role.
    let response = get(&app, "/api/v1/reports/users", Some(&user_token)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // A bank token is the wrong actor kind entirely.
    let response = get(&app, "/api/v1/reports/users", Some(&bank_token)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // No token at all.
    let response = get(&app, "/api/v1/reports/users", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn admins_see_every_report() {
    let (app, stores) = spawn_app().await;
    register_user(&app, "donor@x.com", "secret-pw").await;
    let (_, _, _) = register_user(&app, "admin@x.com", "secret-pw").await;
    register_bank(&app, "bank@x.com", "LIC-1").await;

    // Promote the second account; role elevation has no public endpoint.
    let email = EmailAddress::new("admin@x.com").expect("email");
    let mut admin = stores
        .users
        .find_by_email(&email)
        .await
        .expect("lookup runs")
        .expect("account present");
    admin.role = Role::Admin;
    stores.users.update(&admin).await.expect("update runs");

    // Log in again so the token carries the admin role.
    let login = body_json(
        post_json(
            &app,
            "/api/v1/auth/login",
            None,
            json!({ "email": "admin@x.com", "password": "secret-pw" }),
        )
        .await,
    )
    .await;
    let admin_token = login["token"].as_str().expect("token present");

    for path in [
        "/api/v1/reports/users",
        "/api/v1/reports/requests",
        "/api/v1/reports/banks",
        "/api/v1/reports/camps",
    ] {
        let response = get(&app, path, Some(admin_token)).await;
        assert_eq!(response.status(), StatusCode::OK, "{path}");
    }

    let users = body_json(get(&app, "/api/v1/reports/users", Some(admin_token)).await).await;
    assert_eq!(users.as_array().map(Vec::len), Some(2));

    let banks = body_json(get(&app, "/api/v1/reports/banks", Some(admin_token)).await).await;
    let bank_row = &banks.as_array().expect("array")[0];
    assert_eq!(bank_row["licenseNumber"], "LIC-1");
    assert_eq!(bank_row["inventory"]["A+"], 0);
}
