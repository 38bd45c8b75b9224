//! Shared harness for endpoint integration tests.
//!
//! Builds the real application (routes, gate, trace middleware) over the
//! in-memory adapters, plus helpers for registering accounts and issuing
//! requests with bearer tokens.
#![allow(dead_code)]

use std::sync::Arc;

use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web};
use serde_json::{Value, json};

use lifevein_backend::domain::TokenIssuer;
use lifevein_backend::domain::ports::SystemClock;
use lifevein_backend::inbound::http::health::HealthState;
use lifevein_backend::outbound::memory::{
    MemoryBankRepository, MemoryCampRepository, MemoryRequestRepository, MemoryUserRepository,
};
use lifevein_backend::server::{AppDependencies, build_app, wire_http_state};

/// Signing secret every test app shares, so tests can mint their own tokens.
pub const TEST_SECRET: &[u8] = b"integration-test-secret";

/// Repositories backing one test app, kept for direct seeding/inspection.
pub struct Stores {
    pub users: Arc<MemoryUserRepository>,
    pub banks: Arc<MemoryBankRepository>,
    pub requests: Arc<MemoryRequestRepository>,
    pub camps: Arc<MemoryCampRepository>,
}

/// Build the dependencies for one application instance.
pub fn dependencies() -> (AppDependencies, Stores) {
    let users = Arc::new(MemoryUserRepository::default());
    let banks = Arc::new(MemoryBankRepository::default());
    let requests = Arc::new(MemoryRequestRepository::default());
    let camps = Arc::new(MemoryCampRepository::default());

    let issuer = TokenIssuer::new(TEST_SECRET);
    let http_state = wire_http_state(
        Arc::clone(&users),
        Arc::clone(&banks),
        Arc::clone(&requests),
        Arc::clone(&camps),
        Arc::new(issuer.clone()),
        Arc::new(SystemClock),
    );

    let deps = AppDependencies {
        health_state: web::Data::new(HealthState::new()),
        http_state: web::Data::new(http_state),
        token_issuer: web::Data::new(issuer),
    };
    let stores = Stores {
        users,
        banks,
        requests,
        camps,
    };
    (deps, stores)
}

/// Spin up an initialised service plus handles to its stores.
pub async fn spawn_app() -> (
    impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    Stores,
) {
    let (deps, stores) = dependencies();
    let app = test::init_service(build_app(deps)).await;
    (app, stores)
}

/// POST a JSON body, optionally with a bearer token.
pub async fn post_json<S>(
    app: &S,
    path: &str,
    token: Option<&str>,
    body: Value,
) -> ServiceResponse
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let mut request = test::TestRequest::post().uri(path).set_json(body);
    if let Some(token) = token {
        request = request.insert_header(("Authorization", format!("Bearer {token}")));
    }
    test::call_service(app, request.to_request()).await
}

/// GET a path, optionally with a bearer token.
pub async fn get<S>(app: &S, path: &str, token: Option<&str>) -> ServiceResponse
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let mut request = test::TestRequest::get().uri(path);
    if let Some(token) = token {
        request = request.insert_header(("Authorization", format!("Bearer {token}")));
    }
    test::call_service(app, request.to_request()).await
}

/// Read a response body as JSON.
pub async fn body_json(response: ServiceResponse) -> Value {
    let bytes = test::read_body(response).await;
    serde_json::from_slice(&bytes).expect("response body is JSON")
}

/// Register a user and return `(token, user_id, payload)`.
pub async fn register_user<S>(app: &S, email: &str, password: &str) -> (String, String, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let response = post_json(
        app,
        "/api/v1/auth/register",
        None,
        json!({
            "name": "Test User",
            "email": email,
            "password": password,
            "phone": "5550100",
            "bloodGroup": "O+",
        }),
    )
    .await;
    assert_eq!(response.status(), 201, "registration should succeed");
    let payload = body_json(response).await;
    let token = payload["token"].as_str().expect("token present").to_owned();
    let id = payload["user"]["id"]
        .as_str()
        .expect("user id present")
        .to_owned();
    (token, id, payload)
}

/// Register a bank and return `(token, bank_id)`.
pub async fn register_bank<S>(app: &S, email: &str, license: &str) -> (String, String)
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let response = post_json(
        app,
        "/api/v1/banks/register",
        None,
        json!({
            "name": "City Blood Bank",
            "email": email,
            "password": "bank-secret",
            "phone": "5550123",
            "licenseNumber": license,
        }),
    )
    .await;
    assert_eq!(response.status(), 201, "bank registration should succeed");
    let payload = body_json(response).await;
    let token = payload["token"].as_str().expect("token present").to_owned();
    let id = payload["bank"]["id"]
        .as_str()
        .expect("bank id present")
        .to_owned();
    (token, id)
}

/// Create a pending blood request owned by the token's user; returns its id.
pub async fn create_request<S>(app: &S, token: &str) -> String
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let response = post_json(
        app,
        "/api/v1/requests",
        Some(token),
        json!({
            "patientName": "Patient Zero",
            "bloodGroup": "O-",
            "units": 2,
            "urgency": "urgent",
            "hospital": "General Hospital",
            "contactNumber": "5550100",
            "requiredBy": "2030-01-01T00:00:00Z",
            "description": "post-surgery transfusion",
        }),
    )
    .await;
    assert_eq!(response.status(), 201, "request creation should succeed");
    let payload = body_json(response).await;
    assert_eq!(payload["request"]["status"], "pending");
    payload["request"]["id"]
        .as_str()
        .expect("request id present")
        .to_owned()
}

/// PATCH a request status with the given token, returning the response.
pub async fn change_status<S>(
    app: &S,
    request_id: &str,
    token: Option<&str>,
    status: &str,
) -> ServiceResponse
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let mut request = test::TestRequest::patch()
        .uri(&format!("/api/v1/requests/{request_id}/status"))
        .set_json(json!({ "status": status }));
    if let Some(token) = token {
        request = request.insert_header(("Authorization", format!("Bearer {token}")));
    }
    test::call_service(app, request.to_request()).await
}
