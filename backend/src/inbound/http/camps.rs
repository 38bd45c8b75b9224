//! Donation camp endpoints.
//!
//! Reads are public; creation and mutation sit behind the strict bank gate,
//! with ownership enforced in the camp service.

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::camp::{CampDraft, CampPatch};
use crate::domain::ports::CampFilter;
use crate::domain::{CampId, CampStatus, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::bearer::{BankActor, IndividualActor};
use crate::inbound::http::dto::CampDto;
use crate::inbound::http::state::HttpState;

fn parse_camp_id(raw: &str) -> Result<CampId, Error> {
    raw.parse()
        .map_err(|_| Error::not_found(format!("camp {raw} not found")))
}

fn parse_status(raw: &str) -> Result<CampStatus, Error> {
    raw.parse()
        .map_err(|err: crate::domain::camp::CampStatusParseError| {
            Error::invalid_request(err.to_string())
        })
}

/// Query for `GET /api/v1/camps`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampListQuery {
    pub city: Option<String>,
    pub status: Option<String>,
    pub upcoming: Option<bool>,
}

/// Body for `POST /api/v1/camps`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCampBody {
    pub name: String,
    pub date: DateTime<Utc>,
    pub start_time: String,
    pub end_time: String,
    pub venue: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub target_units: u32,
    pub description: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
}

/// Body for `PUT /api/v1/camps/{id}`; every field optional.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCampBody {
    pub name: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub venue: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub target_units: Option<u32>,
    pub description: Option<String>,
    #[schema(example = "completed")]
    pub status: Option<String>,
}

/// Public camp feed; upcoming camps only unless a status filter is given.
#[utoipa::path(
    get,
    path = "/api/v1/camps",
    params(
        ("city" = Option<String>, Query, description = "Case-insensitive city match"),
        ("status" = Option<String>, Query, description = "Filter by camp status"),
        ("upcoming" = Option<bool>, Query, description = "Only future scheduled camps")
    ),
    responses(
        (status = 200, description = "Camps", body = [CampDto]),
        (status = 400, description = "Invalid filter", body = Error)
    ),
    tags = ["camps"],
    operation_id = "listCamps",
    security([])
)]
#[get("/camps")]
pub async fn list_camps(
    state: web::Data<HttpState>,
    query: web::Query<CampListQuery>,
) -> ApiResult<web::Json<Vec<CampDto>>> {
    let query = query.into_inner();
    let status = query.status.as_deref().map(parse_status).transpose()?;
    let camps = state
        .camps
        .list_camps(CampFilter {
            city: query.city,
            status,
            upcoming_only: query.upcoming.unwrap_or(false),
        })
        .await?;
    Ok(web::Json(camps.into_iter().map(CampDto::from).collect()))
}

/// Fetch one camp.
#[utoipa::path(
    get,
    path = "/api/v1/camps/{id}",
    params(("id" = String, Path, description = "Camp identifier")),
    responses(
        (status = 200, description = "Camp", body = CampDto),
        (status = 404, description = "No such camp", body = Error)
    ),
    tags = ["camps"],
    operation_id = "getCamp",
    security([])
)]
#[get("/camps/{id}")]
pub async fn get_camp(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<CampDto>> {
    let id = parse_camp_id(&path.into_inner())?;
    let camp = state.camps.fetch_camp(id).await?;
    Ok(web::Json(CampDto::from(camp)))
}

/// Create a camp organised by the authenticated bank.
#[utoipa::path(
    post,
    path = "/api/v1/camps",
    request_body = CreateCampBody,
    responses(
        (status = 201, description = "Camp created"),
        (status = 400, description = "Validation failure", body = Error),
        (status = 401, description = "Not a blood bank", body = Error)
    ),
    tags = ["camps"],
    operation_id = "createCamp"
)]
#[post("/camps")]
pub async fn create_camp(
    state: web::Data<HttpState>,
    actor: BankActor,
    payload: web::Json<CreateCampBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let draft = CampDraft {
        name: body.name,
        date: body.date,
        start_time: body.start_time,
        end_time: body.end_time,
        venue: body.venue,
        address: body.address,
        city: body.city,
        state: body.state,
        pincode: body.pincode,
        target_units: body.target_units,
        description: body.description,
        contact_phone: body.contact_phone,
        contact_email: body.contact_email,
    };
    let camp = state.camps.create_camp(actor.0, draft).await?;
    Ok(HttpResponse::Created().json(json!({
        "message": "blood camp created successfully",
        "camp": CampDto::from(camp),
    })))
}

/// Update a camp; organiser only.
#[utoipa::path(
    put,
    path = "/api/v1/camps/{id}",
    params(("id" = String, Path, description = "Camp identifier")),
    request_body = UpdateCampBody,
    responses(
        (status = 200, description = "Updated camp"),
        (status = 401, description = "Not a blood bank", body = Error),
        (status = 403, description = "Not the organiser", body = Error),
        (status = 404, description = "No such camp", body = Error)
    ),
    tags = ["camps"],
    operation_id = "updateCamp"
)]
#[put("/camps/{id}")]
pub async fn update_camp(
    state: web::Data<HttpState>,
    actor: BankActor,
    path: web::Path<String>,
    payload: web::Json<UpdateCampBody>,
) -> ApiResult<HttpResponse> {
    let id = parse_camp_id(&path.into_inner())?;
    let body = payload.into_inner();
    let status = body.status.as_deref().map(parse_status).transpose()?;
    let patch = CampPatch {
        name: body.name,
        date: body.date,
        start_time: body.start_time,
        end_time: body.end_time,
        venue: body.venue,
        address: body.address,
        city: body.city,
        state: body.state,
        pincode: body.pincode,
        target_units: body.target_units,
        description: body.description,
        status,
    };
    let camp = state.camps.update_camp(actor.0, id, patch).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "blood camp updated successfully",
        "camp": CampDto::from(camp),
    })))
}

/// Delete a camp; organiser only.
#[utoipa::path(
    delete,
    path = "/api/v1/camps/{id}",
    params(("id" = String, Path, description = "Camp identifier")),
    responses(
        (status = 200, description = "Camp deleted"),
        (status = 401, description = "Not a blood bank", body = Error),
        (status = 403, description = "Not the organiser", body = Error),
        (status = 404, description = "No such camp", body = Error)
    ),
    tags = ["camps"],
    operation_id = "deleteCamp"
)]
#[delete("/camps/{id}")]
pub async fn delete_camp(
    state: web::Data<HttpState>,
    actor: BankActor,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_camp_id(&path.into_inner())?;
    state.camps.delete_camp(actor.0, id).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "blood camp deleted successfully" })))
}

/// Register the authenticated user for a camp.
#[utoipa::path(
    post,
    path = "/api/v1/camps/{id}/register",
    params(("id" = String, Path, description = "Camp identifier")),
    responses(
        (status = 200, description = "Registered"),
        (status = 400, description = "Already registered", body = Error),
        (status = 401, description = "Unauthenticated", body = Error),
        (status = 404, description = "No such camp", body = Error)
    ),
    tags = ["camps"],
    operation_id = "registerForCamp"
)]
#[post("/camps/{id}/register")]
pub async fn register_for_camp(
    state: web::Data<HttpState>,
    actor: IndividualActor,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_camp_id(&path.into_inner())?;
    state.camps.register_donor(actor.id, id).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "successfully registered for blood camp" })))
}
