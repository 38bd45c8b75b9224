//! Donation-camp use-cases.
//!
//! Camps are owned by the organising bank: update and delete check ownership
//! here, after the gate has already established the caller is a bank at all.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::camp::{CampDraft, CampPatch, DonationCamp};
use crate::domain::error::Error;
use crate::domain::ids::{BankId, CampId, UserId};
use crate::domain::ports::{
    BankRepository, BankStoreError, CampFilter, CampRepository, CampService, CampStoreError,
    Clock, UserRepository, UserStoreError,
};

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

fn camp_not_found(id: CampId) -> Error {
    Error::not_found(format!("camp {id} not found"))
}

/// [`CampService`] implementation over the camp, bank, and user repositories.
#[derive(Clone)]
pub struct CampServiceImpl<C, B, U> {
    camps: Arc<C>,
    banks: Arc<B>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<C, B, U> CampServiceImpl<C, B, U> {
    /// Wire the service to its repositories and clock.
    pub fn new(camps: Arc<C>, banks: Arc<B>, users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            camps,
            banks,
            users,
            clock,
        }
    }
}

#[async_trait]
impl<C, B, U> CampService for CampServiceImpl<C, B, U>
where
    C: CampRepository,
    B: BankRepository,
    U: UserRepository,
{
    async fn list_camps(&self, filter: CampFilter) -> Result<Vec<DonationCamp>, Error> {
        // The public feed hides past camps unless an explicit status was
        // asked for.
        let mut filter = filter;
        if filter.status.is_none() {
            filter.upcoming_only = true;
        }
        self.camps
            .list(filter, self.clock.now())
            .await
            .map_err(map_camp_store_error)
    }

    async fn fetch_camp(&self, id: CampId) -> Result<DonationCamp, Error> {
        self.camps
            .find_by_id(id)
            .await
            .map_err(map_camp_store_error)?
            .ok_or_else(|| camp_not_found(id))
    }

    async fn create_camp(
        &self,
        organizer: BankId,
        draft: CampDraft,
    ) -> Result<DonationCamp, Error> {
        draft
            .validate()
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let bank = self
            .banks
            .find_by_id(organizer)
            .await
            .map_err(map_bank_store_error)?
            .ok_or_else(|| Error::unauthorized("bank account not found"))?;

        // Contact details default to the organising bank's.
        let mut draft = draft;
        if draft.contact_phone.is_none() {
            draft.contact_phone = Some(bank.phone.clone());
        }
        if draft.contact_email.is_none() {
            draft.contact_email = Some(bank.email.as_str().to_owned());
        }

        let camp = DonationCamp::open(
            CampId::random(),
            organizer,
            bank.name.clone(),
            draft,
            self.clock.now(),
        );
        self.camps
            .insert(&camp)
            .await
            .map_err(map_camp_store_error)?;
        info!(camp = %camp.id, organizer = %organizer, "created donation camp");
        Ok(camp)
    }

    async fn update_camp(
        &self,
        organizer: BankId,
        id: CampId,
        patch: CampPatch,
    ) -> Result<DonationCamp, Error> {
        let mut camp = self.fetch_camp(id).await?;
        if camp.organizer != organizer {
            return Err(Error::forbidden("not authorised to update this camp"));
        }
        camp.apply_patch(patch);
        self.camps
            .update(&camp)
            .await
            .map_err(map_camp_store_error)?;
        Ok(camp)
    }

    async fn delete_camp(&self, organizer: BankId, id: CampId) -> Result<(), Error> {
        let camp = self.fetch_camp(id).await?;
        if camp.organizer != organizer {
            return Err(Error::forbidden("not authorised to delete this camp"));
        }
        let deleted = self
            .camps
            .delete(id)
            .await
            .map_err(map_camp_store_error)?;
        if deleted {
            info!(camp = %id, "deleted donation camp");
            Ok(())
        } else {
            Err(camp_not_found(id))
        }
    }

    async fn register_donor(&self, donor: UserId, id: CampId) -> Result<DonationCamp, Error> {
        let account = self
            .users
            .find_by_id(donor)
            .await
            .map_err(map_user_store_error)?
            .ok_or_else(|| Error::unauthorized("user account not found"))?;
        let mut camp = self.fetch_camp(id).await?;

        if !camp.register_donor(&account, self.clock.now()) {
            return Err(Error::invalid_request("already registered for this camp"));
        }
        self.camps
            .update(&camp)
            .await
            .map_err(map_camp_store_error)?;
        Ok(camp)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use chrono::Utc;

    use super::*;
    use crate::domain::auth::{BankRegistration, NewRegistration};
    use crate::domain::blood_bank::BloodBankAccount;
    use crate::domain::camp::CampStatus;
    use crate::domain::error::ErrorCode;
    use crate::domain::password::PasswordHash;
    use crate::domain::ports::SystemClock;
    use crate::domain::user::UserAccount;
    use crate::outbound::memory::{
        MemoryBankRepository, MemoryCampRepository, MemoryUserRepository,
    };

    struct Fixture {
        service: CampServiceImpl<MemoryCampRepository, MemoryBankRepository, MemoryUserRepository>,
        bank: BloodBankAccount,
        user: UserAccount,
    }

    async fn fixture() -> Fixture {
        let camps = Arc::new(MemoryCampRepository::default());
        let banks = Arc::new(MemoryBankRepository::default());
        let users = Arc::new(MemoryUserRepository::default());

        let bank_registration = BankRegistration::try_new(
            "City Blood Bank",
            "bank@x.com",
            "secret-pw",
            "5550123",
            "LIC-42",
            None,
            None,
            None,
        )
        .expect("valid registration");
        let bank = BloodBankAccount::from_registration(
            BankId::random(),
            &bank_registration,
            PasswordHash::from_stored("$2b$12$digest"),
            Utc::now(),
        );
        banks.insert(&bank).await.expect("seed bank");

        let user_registration = NewRegistration::try_new(
            "Ravi Kumar",
            "ravi@x.com",
            "secret-pw",
            "5550111",
            None,
            true,
            None,
        )
        .expect("valid registration");
        let user = UserAccount::from_registration(
            UserId::random(),
            &user_registration,
            PasswordHash::from_stored("$2b$12$digest"),
            Utc::now(),
        );
        users.insert(&user).await.expect("seed user");

        Fixture {
            service: CampServiceImpl::new(camps, banks, users, Arc::new(SystemClock)),
            bank,
            user,
        }
    }

    fn draft(days_ahead: i64) -> CampDraft {
        CampDraft {
            name: "Spring Drive".to_owned(),
            date: Utc::now() + chrono::Duration::days(days_ahead),
            start_time: "09:00".to_owned(),
            end_time: "16:00".to_owned(),
            venue: "Town Hall".to_owned(),
            address: "1 Main St".to_owned(),
            city: "Springfield".to_owned(),
            state: "IL".to_owned(),
            pincode: "62701".to_owned(),
            target_units: 50,
            description: None,
            contact_phone: None,
            contact_email: None,
        }
    }

    #[tokio::test]
    async fn created_camps_inherit_bank_contact_details() {
        let fixture = fixture().await;
        let camp = fixture
            .service
            .create_camp(fixture.bank.id, draft(10))
            .await
            .expect("camp created");
        assert_eq!(camp.organizer_name, "City Blood Bank");
        assert_eq!(camp.contact_phone.as_deref(), Some("5550123"));
        assert_eq!(camp.contact_email.as_deref(), Some("bank@x.com"));
    }

    #[tokio::test]
    async fn only_the_organiser_may_update_or_delete() {
        let fixture = fixture().await;
        let camp = fixture
            .service
            .create_camp(fixture.bank.id, draft(10))
            .await
            .expect("camp created");

        let stranger = BankId::random();
        let err = fixture
            .service
            .update_camp(stranger, camp.id, CampPatch::default())
            .await
            .expect_err("stranger update refused");
        assert_eq!(err.code, ErrorCode::Forbidden);

        let err = fixture
            .service
            .delete_camp(stranger, camp.id)
            .await
            .expect_err("stranger delete refused");
        assert_eq!(err.code, ErrorCode::Forbidden);

        fixture
            .service
            .delete_camp(fixture.bank.id, camp.id)
            .await
            .expect("organiser delete succeeds");
        let err = fixture
            .service
            .fetch_camp(camp.id)
            .await
            .expect_err("camp gone");
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn double_registration_is_refused() {
        let fixture = fixture().await;
        let camp = fixture
            .service
            .create_camp(fixture.bank.id, draft(10))
            .await
            .expect("camp created");

        fixture
            .service
            .register_donor(fixture.user.id, camp.id)
            .await
            .expect("first registration succeeds");
        let err = fixture
            .service
            .register_donor(fixture.user.id, camp.id)
            .await
            .expect_err("second registration fails");
        assert_eq!(err.code, ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn the_public_feed_hides_past_camps_by_default() {
        let fixture = fixture().await;
        fixture
            .service
            .create_camp(fixture.bank.id, draft(-10))
            .await
            .expect("past camp created");
        let upcoming = fixture
            .service
            .create_camp(fixture.bank.id, draft(10))
            .await
            .expect("future camp created");

        let listed = fixture
            .service
            .list_camps(CampFilter::default())
            .await
            .expect("listing succeeds");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed.first().map(|c| c.id), Some(upcoming.id));

        // An explicit status filter looks at the whole history.
        let all_scheduled = fixture
            .service
            .list_camps(CampFilter {
                status: Some(CampStatus::Scheduled),
                ..CampFilter::default()
            })
            .await
            .expect("listing succeeds");
        assert_eq!(all_scheduled.len(), 2);
    }

    #[tokio::test]
    async fn blank_camp_names_fail_validation() {
        let fixture = fixture().await;
        let mut bad = draft(10);
        bad.name = " ".to_owned();
        let err = fixture
            .service
            .create_camp(fixture.bank.id, bad)
            .await
            .expect_err("blank name fails");
        assert_eq!(err.code, ErrorCode::InvalidRequest);
    }
}
