//! Server construction and route wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;
pub use state_builders::{build_http_state, wire_http_state};

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::TokenIssuer;
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{auth, camps, profile, reports, requests};
use crate::middleware::Trace;

/// Everything an application instance needs at construction time.
#[derive(Clone)]
pub struct AppDependencies {
    pub health_state: web::Data<HealthState>,
    pub http_state: web::Data<HttpState>,
    pub token_issuer: web::Data<TokenIssuer>,
}

/// Assemble the Actix application: trace middleware, the `/api/v1` surface,
/// health probes, and (debug builds) Swagger UI.
pub fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        token_issuer,
    } = deps;

    let api = web::scope("/api/v1")
        .service(auth::register)
        .service(auth::login)
        .service(auth::login_google)
        .service(auth::register_bank)
        .service(auth::login_bank)
        .service(requests::create_request)
        .service(requests::my_requests)
        .service(requests::list_requests)
        .service(requests::change_request_status)
        .service(profile::get_profile)
        .service(profile::update_profile)
        .service(profile::update_donor_profile)
        .service(profile::search_donors)
        .service(camps::list_camps)
        .service(camps::create_camp)
        .service(camps::register_for_camp)
        .service(camps::get_camp)
        .service(camps::update_camp)
        .service(camps::delete_camp)
        .service(reports::users_report)
        .service(reports::requests_report)
        .service(reports::banks_report)
        .service(reports::camps_report);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(token_issuer)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct the HTTP server from the configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = web::Data::new(build_http_state(&config));
    let token_issuer = web::Data::from(config.token_issuer.clone());
    let bind_addr = config.bind_addr();
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            token_issuer: token_issuer.clone(),
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
