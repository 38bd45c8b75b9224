//! Admin reporting endpoints.
//!
//! JSON projections with the columns the operations team exports; gated on
//! the admin role. Spreadsheet rendering happens downstream of this API.

use actix_web::{get, web};

use crate::domain::Error;
use crate::domain::ports::{BankReportRow, CampReportRow, RequestReportRow, UserReportRow};
use crate::inbound::http::ApiResult;
use crate::inbound::http::bearer::AdminActor;
use crate::inbound::http::state::HttpState;

/// Every user account.
#[utoipa::path(
    get,
    path = "/api/v1/reports/users",
    responses(
        (status = 200, description = "User rows", body = [UserReportRow]),
        (status = 401, description = "Unauthenticated", body = Error),
        (status = 403, description = "Admin only", body = Error)
    ),
    tags = ["reports"],
    operation_id = "usersReport"
)]
#[get("/reports/users")]
pub async fn users_report(
    state: web::Data<HttpState>,
    _actor: AdminActor,
) -> ApiResult<web::Json<Vec<UserReportRow>>> {
    Ok(web::Json(state.reports.users_report().await?))
}

/// Every blood request with requester and bank joined.
#[utoipa::path(
    get,
    path = "/api/v1/reports/requests",
    responses(
        (status = 200, description = "Request rows", body = [RequestReportRow]),
        (status = 401, description = "Unauthenticated", body = Error),
        (status = 403, description = "Admin only", body = Error)
    ),
    tags = ["reports"],
    operation_id = "requestsReport"
)]
#[get("/reports/requests")]
pub async fn requests_report(
    state: web::Data<HttpState>,
    _actor: AdminActor,
) -> ApiResult<web::Json<Vec<RequestReportRow>>> {
    Ok(web::Json(state.reports.requests_report().await?))
}

/// Every bank with flattened inventory.
#[utoipa::path(
    get,
    path = "/api/v1/reports/banks",
    responses(
        (status = 200, description = "Bank rows", body = [BankReportRow]),
        (status = 401, description = "Unauthenticated", body = Error),
        (status = 403, description = "Admin only", body = Error)
    ),
    tags = ["reports"],
    operation_id = "banksReport"
)]
#[get("/reports/banks")]
pub async fn banks_report(
    state: web::Data<HttpState>,
    _actor: AdminActor,
) -> ApiResult<web::Json<Vec<BankReportRow>>> {
    Ok(web::Json(state.reports.banks_report().await?))
}

/// Every camp with registration counts.
#[utoipa::path(
    get,
    path = "/api/v1/reports/camps",
    responses(
        (status = 200, description = "Camp rows", body = [CampReportRow]),
        (status = 401, description = "Unauthenticated", body = Error),
        (status = 403, description = "Admin only", body = Error)
    ),
    tags = ["reports"],
    operation_id = "campsReport"
)]
#[get("/reports/camps")]
pub async fn camps_report(
    state: web::Data<HttpState>,
    _actor: AdminActor,
) -> ApiResult<web::Json<Vec<CampReportRow>>> {
    Ok(web::Json(state.reports.camps_report().await?))
}
