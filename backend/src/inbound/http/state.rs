//! Shared HTTP adapter state.
//!
//! Handlers receive this via `actix_web::web::Data` and therefore depend
//! only on the driving ports, which keeps them testable against in-memory
//! wiring.

use std::sync::Arc;

use crate::domain::ports::{
    AccountService, CampService, ProfileService, ReportService, RequestLifecycle,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountService>,
    pub profiles: Arc<dyn ProfileService>,
    pub requests: Arc<dyn RequestLifecycle>,
    pub camps: Arc<dyn CampService>,
    pub reports: Arc<dyn ReportService>,
}

impl HttpState {
    /// Bundle the port implementations the handlers need.
    pub fn new(
        accounts: Arc<dyn AccountService>,
        profiles: Arc<dyn ProfileService>,
        requests: Arc<dyn RequestLifecycle>,
        camps: Arc<dyn CampService>,
        reports: Arc<dyn ReportService>,
    ) -> Self {
        Self {
            accounts,
            profiles,
            requests,
            camps,
            reports,
        }
    }
}
