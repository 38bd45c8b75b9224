//! In-memory repository adapters.
//!
//! These back the server when no database is configured and give handler and
//! service tests real storage semantics (including the conditional
//! transition update) without I/O. Maps are guarded by `std::sync::RwLock`;
//! every critical section is a plain map operation, so holding the lock
//! across an `.await` never arises.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::auth::EmailAddress;
use crate::domain::blood_bank::BloodBankAccount;
use crate::domain::blood_group::BloodGroup;
use crate::domain::camp::DonationCamp;
use crate::domain::ids::{BankId, CampId, RequestId, UserId};
use crate::domain::ports::{
    BankRepository, BankStoreError, BloodRequestRepository, CampFilter, CampRepository,
    CampStoreError, RequestFilter, RequestStoreError, TransitionRecord, UserRepository,
    UserStoreError,
};
use crate::domain::request::{BloodRequest, RequestStatus};
use crate::domain::user::UserAccount;

fn poisoned<T>(_: T) -> String {
    "memory store lock poisoned".to_owned()
}

/// In-memory [`UserRepository`].
#[derive(Default)]
pub struct MemoryUserRepository {
    accounts: RwLock<HashMap<UserId, UserAccount>>,
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn insert(&self, user: &UserAccount) -> Result<(), UserStoreError> {
        let mut accounts = self
            .accounts
            .write()
            .map_err(|e| UserStoreError::connection(poisoned(e)))?;
        if accounts.values().any(|existing| existing.email == user.email) {
            return Err(UserStoreError::duplicate(format!(
                "email {} already registered",
                user.email
            )));
        }
        accounts.insert(user.id, user.clone());
        Ok(())
    }

    async fn update(&self, user: &UserAccount) -> Result<(), UserStoreError> {
        let mut accounts = self
            .accounts
            .write()
            .map_err(|e| UserStoreError::connection(poisoned(e)))?;
        accounts.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<UserAccount>, UserStoreError> {
        let accounts = self
            .accounts
            .read()
            .map_err(|e| UserStoreError::connection(poisoned(e)))?;
        Ok(accounts.get(&id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserAccount>, UserStoreError> {
        let accounts = self
            .accounts
            .read()
            .map_err(|e| UserStoreError::connection(poisoned(e)))?;
        Ok(accounts.values().find(|user| &user.email == email).cloned())
    }

    async fn list_all(&self) -> Result<Vec<UserAccount>, UserStoreError> {
        let accounts = self
            .accounts
            .read()
            .map_err(|e| UserStoreError::connection(poisoned(e)))?;
        let mut all: Vec<UserAccount> = accounts.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(all)
    }

    async fn list_available_donors(
        &self,
        blood_group: Option<BloodGroup>,
    ) -> Result<Vec<UserAccount>, UserStoreError> {
        let accounts = self
            .accounts
            .read()
            .map_err(|e| UserStoreError::connection(poisoned(e)))?;
        Ok(accounts
            .values()
            .filter(|user| user.is_donor && user.is_available)
            .filter(|user| blood_group.is_none_or(|group| user.blood_group == Some(group)))
            .cloned()
            .collect())
    }
}

/// In-memory [`BankRepository`].
#[derive(Default)]
pub struct MemoryBankRepository {
    banks: RwLock<HashMap<BankId, BloodBankAccount>>,
}

#[async_trait]
impl BankRepository for MemoryBankRepository {
    async fn insert(&self, bank: &BloodBankAccount) -> Result<(), BankStoreError> {
        let mut banks = self
            .banks
            .write()
            .map_err(|e| BankStoreError::connection(poisoned(e)))?;
        let clash = banks.values().any(|existing| {
            existing.email == bank.email || existing.license_number == bank.license_number
        });
        if clash {
            return Err(BankStoreError::duplicate(format!(
                "email {} or licence {} already registered",
                bank.email, bank.license_number
            )));
        }
        banks.insert(bank.id, bank.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: BankId) -> Result<Option<BloodBankAccount>, BankStoreError> {
        let banks = self
            .banks
            .read()
            .map_err(|e| BankStoreError::connection(poisoned(e)))?;
        Ok(banks.get(&id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<BloodBankAccount>, BankStoreError> {
        let banks = self
            .banks
            .read()
            .map_err(|e| BankStoreError::connection(poisoned(e)))?;
        Ok(banks.values().find(|bank| &bank.email == email).cloned())
    }

    async fn list_all(&self) -> Result<Vec<BloodBankAccount>, BankStoreError> {
        let banks = self
            .banks
            .read()
            .map_err(|e| BankStoreError::connection(poisoned(e)))?;
        let mut all: Vec<BloodBankAccount> = banks.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(all)
    }
}

/// In-memory [`BloodRequestRepository`].
#[derive(Default)]
pub struct MemoryRequestRepository {
    requests: RwLock<HashMap<RequestId, BloodRequest>>,
}

#[async_trait]
impl BloodRequestRepository for MemoryRequestRepository {
    async fn insert(&self, request: &BloodRequest) -> Result<(), RequestStoreError> {
        let mut requests = self
            .requests
            .write()
            .map_err(|e| RequestStoreError::connection(poisoned(e)))?;
        requests.insert(request.id, request.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: RequestId,
    ) -> Result<Option<BloodRequest>, RequestStoreError> {
        let requests = self
            .requests
            .read()
            .map_err(|e| RequestStoreError::connection(poisoned(e)))?;
        Ok(requests.get(&id).cloned())
    }

    async fn list(&self, filter: RequestFilter) -> Result<Vec<BloodRequest>, RequestStoreError> {
        let requests = self
            .requests
            .read()
            .map_err(|e| RequestStoreError::connection(poisoned(e)))?;
        let mut matching: Vec<BloodRequest> = requests
            .values()
            .filter(|request| filter.status.is_none_or(|status| request.status == status))
            .filter(|request| {
                filter
                    .blood_group
                    .is_none_or(|group| request.blood_group == group)
            })
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }

    async fn list_by_requester(
        &self,
        requester: UserId,
    ) -> Result<Vec<BloodRequest>, RequestStoreError> {
        let requests = self
            .requests
            .read()
            .map_err(|e| RequestStoreError::connection(poisoned(e)))?;
        let mut matching: Vec<BloodRequest> = requests
            .values()
            .filter(|request| request.requested_by == requester)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }

    async fn complete_transition(
        &self,
        id: RequestId,
        record: TransitionRecord,
    ) -> Result<Option<BloodRequest>, RequestStoreError> {
        // One write lock covers the check and the mutation, mirroring the
        // database's conditional single-row update.
        let mut requests = self
            .requests
            .write()
            .map_err(|e| RequestStoreError::connection(poisoned(e)))?;
        let Some(request) = requests.get_mut(&id) else {
            return Ok(None);
        };
        if request.status != RequestStatus::Pending {
            return Ok(None);
        }
        request.status = record.status;
        request.updated_at = record.updated_at;
        if let Some(response) = record.bank_response {
            request.blood_bank = Some(response.responded_by);
            request.bank_response = Some(response);
        }
        Ok(Some(request.clone()))
    }
}

/// In-memory [`CampRepository`].
#[derive(Default)]
pub struct MemoryCampRepository {
    camps: RwLock<HashMap<CampId, DonationCamp>>,
}

#[async_trait]
impl CampRepository for MemoryCampRepository {
    async fn insert(&self, camp: &DonationCamp) -> Result<(), CampStoreError> {
        let mut camps = self
            .camps
            .write()
            .map_err(|e| CampStoreError::connection(poisoned(e)))?;
        camps.insert(camp.id, camp.clone());
        Ok(())
    }

    async fn update(&self, camp: &DonationCamp) -> Result<(), CampStoreError> {
        let mut camps = self
            .camps
            .write()
            .map_err(|e| CampStoreError::connection(poisoned(e)))?;
        camps.insert(camp.id, camp.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: CampId) -> Result<Option<DonationCamp>, CampStoreError> {
        let camps = self
            .camps
            .read()
            .map_err(|e| CampStoreError::connection(poisoned(e)))?;
        Ok(camps.get(&id).cloned())
    }

    async fn delete(&self, id: CampId) -> Result<bool, CampStoreError> {
        let mut camps = self
            .camps
            .write()
            .map_err(|e| CampStoreError::connection(poisoned(e)))?;
        Ok(camps.remove(&id).is_some())
    }

    async fn list(
        &self,
        filter: CampFilter,
        now: DateTime<Utc>,
    ) -> Result<Vec<DonationCamp>, CampStoreError> {
        let camps = self
            .camps
            .read()
            .map_err(|e| CampStoreError::connection(poisoned(e)))?;
        let city_needle = filter.city.as_ref().map(|city| city.to_lowercase());
        let mut matching: Vec<DonationCamp> = camps
            .values()
            .filter(|camp| {
                city_needle
                    .as_ref()
                    .is_none_or(|needle| camp.city.to_lowercase().contains(needle))
            })
            .filter(|camp| filter.status.is_none_or(|status| camp.status == status))
            .filter(|camp| {
                !filter.upcoming_only
                    || (camp.date >= now
                        && camp.status == crate::domain::camp::CampStatus::Scheduled)
            })
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(matching)
    }

    async fn list_all(&self) -> Result<Vec<DonationCamp>, CampStoreError> {
        let camps = self
            .camps
            .read()
            .map_err(|e| CampStoreError::connection(poisoned(e)))?;
        let mut all: Vec<DonationCamp> = camps.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    //! The conditional-update contract, exercised against the in-memory
    //! adapter.

    use chrono::Utc;

    use super::*;
    use crate::domain::blood_group::BloodGroup;
    use crate::domain::request::{RequestDraft, Urgency};

    fn pending() -> BloodRequest {
        let draft = RequestDraft::try_new(
            "Patient Zero",
            BloodGroup::ONegative,
            1,
            Urgency::Normal,
            "General Hospital",
            "5550100",
            Utc::now(),
            None,
        )
        .expect("valid draft");
        BloodRequest::open(RequestId::random(), UserId::random(), draft, Utc::now())
    }

    fn record(status: RequestStatus) -> TransitionRecord {
        TransitionRecord {
            status,
            updated_at: Utc::now(),
            bank_response: None,
        }
    }

    #[tokio::test]
    async fn the_second_of_two_transitions_loses() {
        let repo = MemoryRequestRepository::default();
        let request = pending();
        repo.insert(&request).await.expect("insert");

        let first = repo
            .complete_transition(request.id, record(RequestStatus::Approved))
            .await
            .expect("transition runs");
        assert_eq!(first.map(|r| r.status), Some(RequestStatus::Approved));

        let second = repo
            .complete_transition(request.id, record(RequestStatus::Cancelled))
            .await
            .expect("transition runs");
        assert!(second.is_none());

        let stored = repo
            .find_by_id(request.id)
            .await
            .expect("lookup runs")
            .expect("request present");
        assert_eq!(stored.status, RequestStatus::Approved);
    }

    #[tokio::test]
    async fn transitions_on_missing_requests_return_none() {
        let repo = MemoryRequestRepository::default();
        let outcome = repo
            .complete_transition(RequestId::random(), record(RequestStatus::Approved))
            .await
            .expect("transition runs");
        assert!(outcome.is_none());
    }

    #[tokio::test]
    async fn duplicate_emails_are_rejected_on_insert() {
        use crate::domain::auth::NewRegistration;
        use crate::domain::password::PasswordHash;
        use crate::domain::user::UserAccount;

        let repo = MemoryUserRepository::default();
        let registration = NewRegistration::try_new(
            "Asha",
            "a@x.com",
            "secret-pw",
            "5550100",
            None,
            false,
            None,
        )
        .expect("valid registration");
        let first = UserAccount::from_registration(
            UserId::random(),
            &registration,
            PasswordHash::from_stored("$2b$12$digest"),
            Utc::now(),
        );
        let second = UserAccount::from_registration(
            UserId::random(),
            &registration,
            PasswordHash::from_stored("$2b$12$digest"),
            Utc::now(),
        );

        repo.insert(&first).await.expect("first insert succeeds");
        let err = repo.insert(&second).await.expect_err("duplicate refused");
        assert!(matches!(err, UserStoreError::Duplicate { .. }));
    }
}
