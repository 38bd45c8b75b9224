//! Admin report projections.
//!
//! Each report pulls full table listings and flattens them into the rows the
//! operations team exports; requester and bank descriptors are joined in
//! memory since the volumes here are administrative, not analytical.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::error::Error;
use crate::domain::ids::{BankId, UserId};
use crate::domain::ports::{
    BankReportRow, BankRepository, BankStoreError, BloodRequestRepository, CampReportRow,
    CampRepository, CampStoreError, ReportService, RequestFilter, RequestReportRow,
    RequestStoreError, UserReportRow, UserRepository, UserStoreError,
};

fn map_user_store_error(error: UserStoreError) -> Error {
    match error {
        UserStoreError::Connection { message } => {
            Error::service_unavailable(format!("user store unavailable: {message}"))
        }
        UserStoreError::Query { message } | UserStoreError::Duplicate { message } => {
            Error::internal(format!("user store error: {message}"))
        }
    }
}

fn map_bank_store_error(error: BankStoreError) -> Error {
    match error {
        BankStoreError::Connection { message } => {
            Error::service_unavailable(format!("bank store unavailable: {message}"))
        }
        BankStoreError::Query { message } | BankStoreError::Duplicate { message } => {
            Error::internal(format!("bank store error: {message}"))
        }
    }
}

fn map_request_store_error(error: RequestStoreError) -> Error {
    match error {
        RequestStoreError::Connection { message } => {
            Error::service_unavailable(format!("request store unavailable: {message}"))
        }
        RequestStoreError::Query { message } => {
            Error::internal(format!("request store error: {message}"))
        }
    }
}

fn map_camp_store_error(error: CampStoreError) -> Error {
    match error {
        CampStoreError::Connection { message } => {
            Error::service_unavailable(format!("camp store unavailable: {message}"))
        }
        CampStoreError::Query { message } => {
            Error::internal(format!("camp store error: {message}"))
        }
    }
}

/// [`ReportService`] implementation over all four repositories.
#[derive(Clone)]
pub struct ReportServiceImpl<U, B, R, C> {
    users: Arc<U>,
    banks: Arc<B>,
    requests: Arc<R>,
    camps: Arc<C>,
}

impl<U, B, R, C> ReportServiceImpl<U, B, R, C> {
    /// Wire the service to the repositories it projects from.
    pub fn new(users: Arc<U>, banks: Arc<B>, requests: Arc<R>, camps: Arc<C>) -> Self {
        Self {
            users,
            banks,
            requests,
            camps,
        }
    }
}

#[async_trait]
impl<U, B, R, C> ReportService for ReportServiceImpl<U, B, R, C>
where
    U: UserRepository,
    B: BankRepository,
    R: BloodRequestRepository,
    C: CampRepository,
{
    async fn users_report(&self) -> Result<Vec<UserReportRow>, Error> {
        let users = self.users.list_all().await.map_err(map_user_store_error)?;
        Ok(users
            .into_iter()
            .map(|user| UserReportRow {
                name: user.name,
                email: user.email.as_str().to_owned(),
                phone: user.phone,
                blood_group: user.blood_group.map(|g| g.as_str().to_owned()),
                role: user.role.as_str().to_owned(),
                is_donor: user.is_donor,
                city: user.address.as_ref().map(|a| a.city.clone()),
                state: user.address.as_ref().map(|a| a.state.clone()),
                created_at: user.created_at,
            })
            .collect())
    }

    async fn requests_report(&self) -> Result<Vec<RequestReportRow>, Error> {
        let requests = self
            .requests
            .list(RequestFilter::default())
            .await
            .map_err(map_request_store_error)?;
        let users = self.users.list_all().await.map_err(map_user_store_error)?;
        let banks = self.banks.list_all().await.map_err(map_bank_store_error)?;

        let users_by_id: HashMap<UserId, _> = users
            .into_iter()
            .map(|user| (user.id, (user.name, user.email, user.phone)))
            .collect();
        let banks_by_id: HashMap<BankId, _> = banks
            .into_iter()
            .map(|bank| (bank.id, (bank.name, bank.phone)))
            .collect();

        Ok(requests
            .into_iter()
            .map(|request| {
                let requester = users_by_id.get(&request.requested_by);
                let bank = request.blood_bank.and_then(|id| banks_by_id.get(&id));
                RequestReportRow {
                    request_id: request.id.to_string(),
                    requester_name: requester.map(|(name, _, _)| name.clone()),
                    requester_email: requester.map(|(_, email, _)| email.as_str().to_owned()),
                    requester_phone: requester.map(|(_, _, phone)| phone.clone()),
                    blood_group: request.blood_group.as_str().to_owned(),
                    units: request.units,
                    bank_name: bank.map(|(name, _)| name.clone()),
                    bank_phone: bank.map(|(_, phone)| phone.clone()),
                    status: request.status.as_str().to_owned(),
                    urgency: request.urgency.as_str().to_owned(),
                    required_by: request.required_by,
                    created_at: request.created_at,
                }
            })
            .collect())
    }

    async fn banks_report(&self) -> Result<Vec<BankReportRow>, Error> {
        let banks = self.banks.list_all().await.map_err(map_bank_store_error)?;
        Ok(banks
            .into_iter()
            .map(|bank| {
                let inventory: BTreeMap<String, u32> = crate::domain::blood_group::BloodGroup::ALL
                    .iter()
                    .map(|group| (group.as_str().to_owned(), bank.inventory.units_of(*group)))
                    .collect();
                BankReportRow {
                    name: bank.name,
                    email: bank.email.as_str().to_owned(),
                    phone: bank.phone,
                    license_number: bank.license_number,
                    city: bank.address.as_ref().map(|a| a.city.clone()),
                    state: bank.address.as_ref().map(|a| a.state.clone()),
                    is_verified: bank.is_verified,
                    inventory,
                    created_at: bank.created_at,
                }
            })
            .collect())
    }

    async fn camps_report(&self) -> Result<Vec<CampReportRow>, Error> {
        let camps = self.camps.list_all().await.map_err(map_camp_store_error)?;
        Ok(camps
            .into_iter()
            .map(|camp| CampReportRow {
                camp_name: camp.name,
                organizer_name: camp.organizer_name,
                date: camp.date,
                venue: camp.venue,
                city: camp.city,
                target_units: camp.target_units,
                collected_units: camp.collected_units,
                registered_donors: u32::try_from(camp.registered_donors.len()).unwrap_or(u32::MAX),
                status: camp.status.as_str().to_owned(),
                created_at: camp.created_at,
            })
            .collect())
    }
}
