//! Profile and donor-directory endpoints.

use actix_web::{HttpResponse, get, put, web};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::DonorSearch;
use crate::domain::user::{Address, DonorProfile, ProfileUpdate};
use crate::domain::{Error, GeoPoint, Proximity};
use crate::inbound::http::ApiResult;
use crate::inbound::http::bearer::IndividualActor;
use crate::inbound::http::dto::UserDto;
use crate::inbound::http::state::HttpState;

/// Body for `PUT /api/v1/profile`.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileBody {
    pub name: Option<String>,
    pub phone: Option<String>,
    #[schema(example = "A-")]
    pub blood_group: Option<String>,
    pub is_donor: Option<bool>,
    pub is_available: Option<bool>,
    #[schema(value_type = Option<Object>)]
    pub address: Option<Address>,
    #[schema(value_type = Option<Object>)]
    pub location: Option<GeoPoint>,
}

/// Query for `GET /api/v1/donors`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonorQuery {
    pub blood_group: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub max_distance: Option<f64>,
}

/// The caller's own profile.
#[utoipa::path(
    get,
    path = "/api/v1/profile",
    responses(
        (status = 200, description = "Profile", body = UserDto),
        (status = 401, description = "Unauthenticated", body = Error),
        (status = 404, description = "Account gone", body = Error)
    ),
    tags = ["profile"],
    operation_id = "getProfile"
)]
#[get("/profile")]
pub async fn get_profile(
    state: web::Data<HttpState>,
    actor: IndividualActor,
) -> ApiResult<web::Json<UserDto>> {
    let user = state.profiles.fetch_profile(actor.id).await?;
    Ok(web::Json(UserDto::from(user)))
}

/// Update the caller's profile fields.
#[utoipa::path(
    put,
    path = "/api/v1/profile",
    request_body = ProfileBody,
    responses(
        (status = 200, description = "Updated profile"),
        (status = 400, description = "Invalid field", body = Error),
        (status = 401, description = "Unauthenticated", body = Error)
    ),
    tags = ["profile"],
    operation_id = "updateProfile"
)]
#[put("/profile")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    actor: IndividualActor,
    payload: web::Json<ProfileBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let blood_group = body
        .blood_group
        .as_deref()
        .map(str::parse)
        .transpose()
        .map_err(|_| Error::invalid_request("invalid blood group"))?;

    let update = ProfileUpdate {
        name: body.name,
        phone: body.phone,
        blood_group,
        is_donor: body.is_donor,
        is_available: body.is_available,
        address: body.address,
        location: body.location,
    };
    let user = state.profiles.update_profile(actor.id, update).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "profile updated successfully",
        "user": UserDto::from(user),
    })))
}

/// Submit or replace the caller's donor questionnaire.
#[utoipa::path(
    put,
    path = "/api/v1/profile/donor",
    responses(
        (status = 200, description = "Donor information saved"),
        (status = 401, description = "Unauthenticated", body = Error)
    ),
    tags = ["profile"],
    operation_id = "updateDonorProfile"
)]
#[put("/profile/donor")]
pub async fn update_donor_profile(
    state: web::Data<HttpState>,
    actor: IndividualActor,
    payload: web::Json<DonorProfile>,
) -> ApiResult<HttpResponse> {
    let user = state
        .profiles
        .submit_donor_profile(actor.id, payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "donor information saved successfully",
        "user": UserDto::from(user),
    })))
}

/// Available donors, optionally filtered by group and proximity.
#[utoipa::path(
    get,
    path = "/api/v1/donors",
    params(
        ("bloodGroup" = Option<String>, Query, description = "Filter by blood group"),
        ("latitude" = Option<f64>, Query, description = "Search centre latitude"),
        ("longitude" = Option<f64>, Query, description = "Search centre longitude"),
        ("maxDistance" = Option<f64>, Query, description = "Radius in metres (default 10km)")
    ),
    responses(
        (status = 200, description = "Matching donors", body = [UserDto]),
        (status = 400, description = "Invalid filter", body = Error),
        (status = 401, description = "Unauthenticated", body = Error)
    ),
    tags = ["profile"],
    operation_id = "searchDonors"
)]
#[get("/donors")]
pub async fn search_donors(
    state: web::Data<HttpState>,
    _actor: IndividualActor,
    query: web::Query<DonorQuery>,
) -> ApiResult<web::Json<Vec<UserDto>>> {
    let query = query.into_inner();
    let blood_group = query
        .blood_group
        .as_deref()
        .map(str::parse)
        .transpose()
        .map_err(|_| Error::invalid_request("invalid blood group"))?;
    let near = match (query.latitude, query.longitude) {
        (Some(latitude), Some(longitude)) => Some(Proximity::new(
            GeoPoint::new(longitude, latitude),
            query.max_distance,
        )),
        (None, None) => None,
        _ => {
            return Err(Error::invalid_request(
                "latitude and longitude must be supplied together",
            ));
        }
    };

    let donors = state
        .profiles
        .search_donors(DonorSearch { blood_group, near })
        .await?;
    Ok(web::Json(donors.into_iter().map(UserDto::from).collect()))
}
