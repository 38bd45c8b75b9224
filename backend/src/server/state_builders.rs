//! Assembles the handler state from whichever adapters are configured.

use std::sync::Arc;

use tracing::info;

use crate::domain::ports::{
    BankRepository, BloodRequestRepository, CampRepository, Clock, SystemClock, UserRepository,
};
use crate::domain::{
    AccountServiceImpl, CampServiceImpl, ProfileServiceImpl, ReportServiceImpl,
    RequestLifecycleService, TokenIssuer,
};
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::{
    MemoryBankRepository, MemoryCampRepository, MemoryRequestRepository, MemoryUserRepository,
};
use crate::outbound::persistence::{
    DieselBankRepository, DieselCampRepository, DieselRequestRepository, DieselUserRepository,
};

use super::config::ServerConfig;

/// Wire every domain service over one set of repositories.
pub fn wire_http_state<U, B, R, C>(
    users: Arc<U>,
    banks: Arc<B>,
    requests: Arc<R>,
    camps: Arc<C>,
    tokens: Arc<TokenIssuer>,
    clock: Arc<dyn Clock>,
) -> HttpState
where
    U: UserRepository + 'static,
    B: BankRepository + 'static,
    R: BloodRequestRepository + 'static,
    C: CampRepository + 'static,
{
    HttpState::new(
        Arc::new(AccountServiceImpl::new(
            Arc::clone(&users),
            Arc::clone(&banks),
            tokens,
            Arc::clone(&clock),
        )),
        Arc::new(ProfileServiceImpl::new(
            Arc::clone(&users),
            Arc::clone(&clock),
        )),
        Arc::new(RequestLifecycleService::new(
            Arc::clone(&requests),
            Arc::clone(&clock),
        )),
        Arc::new(CampServiceImpl::new(
            Arc::clone(&camps),
            Arc::clone(&banks),
            Arc::clone(&users),
            clock,
        )),
        Arc::new(ReportServiceImpl::new(users, banks, requests, camps)),
    )
}

/// Database-backed state when a pool is configured, in-memory otherwise.
pub fn build_http_state(config: &ServerConfig) -> HttpState {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    match &config.db_pool {
        Some(pool) => wire_http_state(
            Arc::new(DieselUserRepository::new(pool.clone())),
            Arc::new(DieselBankRepository::new(pool.clone())),
            Arc::new(DieselRequestRepository::new(pool.clone())),
            Arc::new(DieselCampRepository::new(pool.clone())),
            Arc::clone(&config.token_issuer),
            clock,
        ),
        None => {
            info!("no database configured; serving from in-memory stores");
            wire_http_state(
                Arc::new(MemoryUserRepository::default()),
                Arc::new(MemoryBankRepository::default()),
                Arc::new(MemoryRequestRepository::default()),
                Arc::new(MemoryCampRepository::default()),
                Arc::clone(&config.token_issuer),
                clock,
            )
        }
    }
}
