//! Blood request endpoints.
//!
//! `PATCH /requests/{id}/status` is the single transition entry point for
//! both actor kinds; the legacy unguarded overwrite route of the previous
//! system has no equivalent here.

use actix_web::{HttpResponse, get, patch, post, web};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::RequestFilter;
use crate::domain::{Error, RequestDraft, RequestId, RequestStatus, Urgency};
use crate::inbound::http::ApiResult;
use crate::inbound::http::bearer::{AuthenticatedActor, IndividualActor};
use crate::inbound::http::dto::RequestDto;
use crate::inbound::http::state::HttpState;

fn parse_request_id(raw: &str) -> Result<RequestId, Error> {
    raw.parse()
        .map_err(|_| Error::not_found(format!("request {raw} not found")))
}

/// Body for `POST /api/v1/requests`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequestBody {
    pub patient_name: String,
    #[schema(example = "O-")]
    pub blood_group: String,
    pub units: u32,
    #[schema(value_type = String, example = "urgent")]
    pub urgency: Urgency,
    pub hospital: String,
    pub contact_number: String,
    pub required_by: DateTime<Utc>,
    pub description: Option<String>,
}

/// Query filter for `GET /api/v1/requests`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestListQuery {
    pub status: Option<String>,
    pub blood_group: Option<String>,
}

/// Body for `PATCH /api/v1/requests/{id}/status`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct StatusChangeBody {
    #[schema(example = "approved")]
    pub status: String,
}

/// Open a new blood request owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/requests",
    request_body = CreateRequestBody,
    responses(
        (status = 201, description = "Request created"),
        (status = 400, description = "Validation failure", body = Error),
        (status = 401, description = "Unauthenticated", body = Error)
    ),
    tags = ["requests"],
    operation_id = "createRequest"
)]
#[post("/requests")]
pub async fn create_request(
    state: web::Data<HttpState>,
    actor: IndividualActor,
    payload: web::Json<CreateRequestBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let blood_group = body
        .blood_group
        .parse()
        .map_err(|_| Error::invalid_request("invalid blood group"))?;
    let draft = RequestDraft::try_new(
        &body.patient_name,
        blood_group,
        body.units,
        body.urgency,
        &body.hospital,
        &body.contact_number,
        body.required_by,
        body.description,
    )
    .map_err(|err| Error::invalid_request(err.to_string()))?;

    let request = state.requests.open_request(actor.id, draft).await?;
    Ok(HttpResponse::Created().json(json!({
        "message": "blood request created successfully",
        "request": RequestDto::from(request),
    })))
}

/// Public feed of blood requests.
#[utoipa::path(
    get,
    path = "/api/v1/requests",
    params(
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("bloodGroup" = Option<String>, Query, description = "Filter by blood group")
    ),
    responses(
        (status = 200, description = "Requests", body = [RequestDto]),
        (status = 400, description = "Invalid filter", body = Error)
    ),
    tags = ["requests"],
    operation_id = "listRequests",
    security([])
)]
#[get("/requests")]
pub async fn list_requests(
    state: web::Data<HttpState>,
    query: web::Query<RequestListQuery>,
) -> ApiResult<web::Json<Vec<RequestDto>>> {
    let query = query.into_inner();
    let status = query
        .status
        .as_deref()
        .map(str::parse::<RequestStatus>)
        .transpose()
        .map_err(|err| Error::invalid_request(err.to_string()))?;
    let blood_group = query
        .blood_group
        .as_deref()
        .map(str::parse)
        .transpose()
        .map_err(|_| Error::invalid_request("invalid blood group"))?;

    let requests = state
        .requests
        .list_requests(RequestFilter {
            status,
            blood_group,
        })
        .await?;
    Ok(web::Json(
        requests.into_iter().map(RequestDto::from).collect(),
    ))
}

/// The caller's own requests.
#[utoipa::path(
    get,
    path = "/api/v1/requests/mine",
    responses(
        (status = 200, description = "Requests owned by the caller", body = [RequestDto]),
        (status = 401, description = "Unauthenticated", body = Error)
    ),
    tags = ["requests"],
    operation_id = "listMyRequests"
)]
#[get("/requests/mine")]
pub async fn my_requests(
    state: web::Data<HttpState>,
    actor: IndividualActor,
) -> ApiResult<web::Json<Vec<RequestDto>>> {
    let requests = state.requests.list_requests_for(actor.id).await?;
    Ok(web::Json(
        requests.into_iter().map(RequestDto::from).collect(),
    ))
}

/// Apply a status transition as the authenticated actor.
///
/// Banks may approve or decline pending requests; the owning requester may
/// cancel a pending request. Everything else is refused per the lifecycle
/// rules.
#[utoipa::path(
    patch,
    path = "/api/v1/requests/{id}/status",
    params(("id" = String, Path, description = "Request identifier")),
    request_body = StatusChangeBody,
    responses(
        (status = 200, description = "Updated request"),
        (status = 400, description = "Invalid transition", body = Error),
        (status = 401, description = "Unauthenticated or invalid token", body = Error),
        (status = 403, description = "Forbidden transition or not owner", body = Error),
        (status = 404, description = "No such request", body = Error)
    ),
    tags = ["requests"],
    operation_id = "changeRequestStatus"
)]
#[patch("/requests/{id}/status")]
pub async fn change_request_status(
    state: web::Data<HttpState>,
    actor: AuthenticatedActor,
    path: web::Path<String>,
    payload: web::Json<StatusChangeBody>,
) -> ApiResult<HttpResponse> {
    let id = parse_request_id(&path.into_inner())?;
    let target: RequestStatus = payload
        .status
        .parse()
        .map_err(|err: crate::domain::request::StatusParseError| {
            Error::invalid_request(err.to_string())
        })?;

    let updated = state.requests.apply_status_change(id, actor.0, target).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": format!("request {} successfully", updated.status),
        "request": RequestDto::from(updated),
    })))
}
