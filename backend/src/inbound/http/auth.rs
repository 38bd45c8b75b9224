//! Registration and login endpoints for both identity tables.
//!
//! ```text
//! POST /api/v1/auth/register  {"name":"...","email":"...","password":"...", ...}
//! POST /api/v1/auth/login     {"email":"...","password":"..."}
//! POST /api/v1/auth/google    {"email":"...","name":"...","googleId":"..."}
//! POST /api/v1/banks/register {"name":"...","licenseNumber":"...", ...}
//! POST /api/v1/banks/login    {"email":"...","password":"..."}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::user::Address;
use crate::domain::{
    AuthValidationError, BankRegistration, BloodGroup, Error, FederatedIdentity,
    LoginCredentials, NewRegistration,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{BankDto, UserDto};
use crate::inbound::http::state::HttpState;

fn map_auth_validation_error(err: AuthValidationError) -> Error {
    let field = match err {
        AuthValidationError::EmptyName => "name",
        AuthValidationError::InvalidEmail => "email",
        AuthValidationError::EmptyPassword | AuthValidationError::PasswordTooShort { .. } => {
            "password"
        }
        AuthValidationError::EmptyPhone => "phone",
        AuthValidationError::EmptyLicenseNumber => "licenseNumber",
        AuthValidationError::MissingProviderId => "googleId",
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field }))
}

fn parse_blood_group(raw: &str) -> Result<BloodGroup, Error> {
    raw.parse().map_err(|_| {
        Error::invalid_request("invalid blood group").with_details(json!({ "field": "bloodGroup" }))
    })
}

/// Registration body for `POST /api/v1/auth/register`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterBody {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    #[schema(example = "O+")]
    pub blood_group: String,
    #[serde(default)]
    pub is_donor: bool,
    #[schema(value_type = Option<Object>)]
    pub address: Option<Address>,
}

/// Login body shared by user and bank logins.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

/// Federated login body for `POST /api/v1/auth/google`.
///
/// All fields optional at the serde level so a missing field produces the
/// endpoint's own 400 rather than a generic deserialisation failure.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GoogleLoginBody {
    pub email: Option<String>,
    pub name: Option<String>,
    pub google_id: Option<String>,
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
}

/// Bank registration body for `POST /api/v1/banks/register`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BankRegisterBody {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub license_number: String,
    pub registration_number: Option<String>,
    pub established_year: Option<i32>,
    #[schema(value_type = Option<Object>)]
    pub address: Option<Address>,
}

/// Register a new individual account.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterBody,
    responses(
        (status = 201, description = "Account created; token and user returned"),
        (status = 400, description = "Validation failure or duplicate email", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "registerUser",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let blood_group = parse_blood_group(&body.blood_group)?;
    let registration = NewRegistration::try_new(
        &body.name,
        &body.email,
        &body.password,
        &body.phone,
        Some(blood_group),
        body.is_donor,
        body.address,
    )
    .map_err(map_auth_validation_error)?;

    let session = state.accounts.register_user(registration).await?;
    Ok(HttpResponse::Created().json(json!({
        "message": "user registered successfully",
        "token": session.token.as_str(),
        "user": UserDto::from(session.user),
    })))
}

/// Authenticate an individual account.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginBody,
    responses(
        (status = 200, description = "Login success; token and user returned"),
        (status = 400, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "loginUser",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(&body.email, &body.password)
        .map_err(map_auth_validation_error)?;
    let session = state.accounts.login_user(credentials).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "login successful",
        "token": session.token.as_str(),
        "user": UserDto::from(session.user),
    })))
}

/// Sign in with an externally verified Google identity.
#[utoipa::path(
    post,
    path = "/api/v1/auth/google",
    request_body = GoogleLoginBody,
    responses(
        (status = 200, description = "Login success; token and user returned"),
        (status = 400, description = "Missing or invalid provider data", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "loginGoogle",
    security([])
)]
#[post("/auth/google")]
pub async fn login_google(
    state: web::Data<HttpState>,
    payload: web::Json<GoogleLoginBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let (Some(email), Some(name), Some(google_id)) = (body.email, body.name, body.google_id)
    else {
        return Err(Error::invalid_request("missing required Google user data"));
    };
    let identity = FederatedIdentity::try_new(&email, &name, &google_id, body.photo_url)
        .map_err(map_auth_validation_error)?;
    let session = state.accounts.login_federated(identity).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "google login successful",
        "token": session.token.as_str(),
        "user": UserDto::from(session.user),
    })))
}

/// Register a new blood bank.
#[utoipa::path(
    post,
    path = "/api/v1/banks/register",
    request_body = BankRegisterBody,
    responses(
        (status = 201, description = "Bank created; token and bank returned"),
        (status = 400, description = "Validation failure or duplicate email/licence", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["banks"],
    operation_id = "registerBank",
    security([])
)]
#[post("/banks/register")]
pub async fn register_bank(
    state: web::Data<HttpState>,
    payload: web::Json<BankRegisterBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let registration = BankRegistration::try_new(
        &body.name,
        &body.email,
        &body.password,
        &body.phone,
        &body.license_number,
        body.registration_number,
        body.established_year,
        body.address,
    )
    .map_err(map_auth_validation_error)?;

    let session = state.accounts.register_bank(registration).await?;
    Ok(HttpResponse::Created().json(json!({
        "message": "blood bank registered successfully",
        "token": session.token.as_str(),
        "bank": BankDto::from(session.bank),
    })))
}

/// Authenticate a blood bank.
#[utoipa::path(
    post,
    path = "/api/v1/banks/login",
    request_body = LoginBody,
    responses(
        (status = 200, description = "Login success; token and bank returned"),
        (status = 400, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["banks"],
    operation_id = "loginBank",
    security([])
)]
#[post("/banks/login")]
pub async fn login_bank(
    state: web::Data<HttpState>,
    payload: web::Json<LoginBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(&body.email, &body.password)
        .map_err(map_auth_validation_error)?;
    let session = state.accounts.login_bank(credentials).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "login successful",
        "token": session.token.as_str(),
        "bank": BankDto::from(session.bank),
    })))
}
