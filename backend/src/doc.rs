//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST path and the wire schemas; Swagger UI
//! serves the generated document in debug builds.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Adds the bearer-token security scheme to the generated document.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);
        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "Signed bearer token issued by the register/login endpoints.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Lifevein backend API",
        description = "Blood-donation coordination: accounts, blood requests, camps, and reporting."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::login_google,
        crate::inbound::http::auth::register_bank,
        crate::inbound::http::auth::login_bank,
        crate::inbound::http::requests::create_request,
        crate::inbound::http::requests::list_requests,
        crate::inbound::http::requests::my_requests,
        crate::inbound::http::requests::change_request_status,
        crate::inbound::http::profile::get_profile,
        crate::inbound::http::profile::update_profile,
        crate::inbound::http::profile::update_donor_profile,
        crate::inbound::http::profile::search_donors,
        crate::inbound::http::camps::list_camps,
        crate::inbound::http::camps::get_camp,
        crate::inbound::http::camps::create_camp,
        crate::inbound::http::camps::update_camp,
        crate::inbound::http::camps::delete_camp,
        crate::inbound::http::camps::register_for_camp,
        crate::inbound::http::reports::users_report,
        crate::inbound::http::reports::requests_report,
        crate::inbound::http::reports::banks_report,
        crate::inbound::http::reports::camps_report,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        crate::domain::Error,
        crate::domain::ErrorCode,
        crate::inbound::http::dto::UserDto,
        crate::inbound::http::dto::BankDto,
        crate::inbound::http::dto::RequestDto,
        crate::inbound::http::dto::CampDto,
        crate::inbound::http::auth::RegisterBody,
        crate::inbound::http::auth::LoginBody,
        crate::inbound::http::auth::GoogleLoginBody,
        crate::inbound::http::auth::BankRegisterBody,
        crate::inbound::http::requests::CreateRequestBody,
        crate::inbound::http::requests::StatusChangeBody,
        crate::inbound::http::profile::ProfileBody,
        crate::inbound::http::camps::CreateCampBody,
        crate::inbound::http::camps::UpdateCampBody,
        crate::domain::ports::UserReportRow,
        crate::domain::ports::RequestReportRow,
        crate::domain::ports::BankReportRow,
        crate::domain::ports::CampReportRow,
    ))
)]
pub struct ApiDoc;
