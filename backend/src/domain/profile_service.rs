//! Profile and donor-directory use-cases.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::error::Error;
use crate::domain::geo::nearest_within;
use crate::domain::ids::UserId;
use crate::domain::ports::{
    Clock, DonorSearch, ProfileService, UserRepository, UserStoreError,
};
use crate::domain::user::{DonorProfile, ProfileUpdate, UserAccount};

fn map_store_error(error: UserStoreError) -> Error {
    match error {
        UserStoreError::Connection { message } => {
            Error::service_unavailable(format!("user store unavailable: {message}"))
        }
        UserStoreError::Query { message } | UserStoreError::Duplicate { message } => {
            Error::internal(format!("user store error: {message}"))
        }
    }
}

/// [`ProfileService`] implementation over the user repository.
#[derive(Clone)]
pub struct ProfileServiceImpl<U> {
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<U> ProfileServiceImpl<U> {
    /// Wire the service to its repository and clock.
    pub fn new(users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self { users, clock }
    }
}

impl<U> ProfileServiceImpl<U>
where
    U: UserRepository,
{
    async fn load(&self, id: UserId) -> Result<UserAccount, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| Error::not_found(format!("user {id} not found")))
    }
}

#[async_trait]
impl<U> ProfileService for ProfileServiceImpl<U>
where
    U: UserRepository,
{
    async fn fetch_profile(&self, id: UserId) -> Result<UserAccount, Error> {
        self.load(id).await
    }

    async fn update_profile(
        &self,
        id: UserId,
        update: ProfileUpdate,
    ) -> Result<UserAccount, Error> {
        let mut user = self.load(id).await?;
        user.apply_update(update);
        self.users.update(&user).await.map_err(map_store_error)?;
        Ok(user)
    }

    async fn submit_donor_profile(
        &self,
        id: UserId,
        profile: DonorProfile,
    ) -> Result<UserAccount, Error> {
        let mut user = self.load(id).await?;
        user.set_donor_profile(profile, self.clock.now());
        self.users.update(&user).await.map_err(map_store_error)?;
        Ok(user)
    }

    async fn search_donors(&self, search: DonorSearch) -> Result<Vec<UserAccount>, Error> {
        let donors = self
            .users
            .list_available_donors(search.blood_group)
            .await
            .map_err(map_store_error)?;
        Ok(match search.near {
            Some(proximity) => nearest_within(donors, &proximity, |donor| donor.location),
            None => donors,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use super::*;
    use crate::domain::auth::NewRegistration;
    use crate::domain::blood_group::BloodGroup;
    use crate::domain::error::ErrorCode;
    use crate::domain::geo::{GeoPoint, Proximity};
    use crate::domain::password::PasswordHash;
    use crate::domain::ports::SystemClock;
    use crate::outbound::memory::MemoryUserRepository;

    fn donor(
        email: &str,
        group: BloodGroup,
        available: bool,
        location: Option<GeoPoint>,
    ) -> UserAccount {
        let registration =
            NewRegistration::try_new("Donor", email, "secret-pw", "5550100", Some(group), true, None)
                .expect("valid registration");
        let mut account = UserAccount::from_registration(
            UserId::random(),
            &registration,
            PasswordHash::from_stored("$2b$12$digest"),
            chrono::Utc::now(),
        );
        account.is_available = available;
        account.location = location;
        account
    }

    async fn service_with(
        accounts: Vec<UserAccount>,
    ) -> ProfileServiceImpl<MemoryUserRepository> {
        let repo = Arc::new(MemoryUserRepository::default());
        for account in &accounts {
            repo.insert(account).await.expect("seed account");
        }
        ProfileServiceImpl::new(repo, Arc::new(SystemClock))
    }

    #[tokio::test]
    async fn missing_profiles_are_not_found() {
        let service = service_with(Vec::new()).await;
        let err = service
            .fetch_profile(UserId::random())
            .await
            .expect_err("missing profile");
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn updates_persist() {
        let account = donor("a@x.com", BloodGroup::APositive, true, None);
        let id = account.id;
        let service = service_with(vec![account]).await;

        let updated = service
            .update_profile(
                id,
                ProfileUpdate {
                    is_available: Some(false),
                    ..ProfileUpdate::default()
                },
            )
            .await
            .expect("update succeeds");
        assert!(!updated.is_available);

        let fetched = service.fetch_profile(id).await.expect("profile present");
        assert!(!fetched.is_available);
    }

    #[tokio::test]
    async fn submitting_the_questionnaire_marks_a_donor() {
        let mut account = donor("a@x.com", BloodGroup::APositive, true, None);
        account.is_donor = false;
        let id = account.id;
        let service = service_with(vec![account]).await;

        let updated = service
            .submit_donor_profile(id, DonorProfile::default())
            .await
            .expect("submission succeeds");
        assert!(updated.is_donor);
        assert!(updated.donor_profile.is_some());
    }

    #[tokio::test]
    async fn search_filters_by_group_and_availability() {
        let service = service_with(vec![
            donor("a@x.com", BloodGroup::APositive, true, None),
            donor("b@x.com", BloodGroup::ONegative, true, None),
            donor("c@x.com", BloodGroup::APositive, false, None),
        ])
        .await;

        let found = service
            .search_donors(DonorSearch {
                blood_group: Some(BloodGroup::APositive),
                near: None,
            })
            .await
            .expect("search succeeds");
        assert_eq!(found.len(), 1);
        assert_eq!(found.first().map(|d| d.email.as_str()), Some("a@x.com"));
    }

    #[tokio::test]
    async fn search_orders_by_distance_inside_the_radius() {
        let centre = GeoPoint::new(-0.1281, 51.5080);
        let near = GeoPoint::new(-0.1300, 51.5090);
        let farther = GeoPoint::new(0.0005, 51.4780);
        let remote = GeoPoint::new(-3.1883, 55.9533);

        let service = service_with(vec![
            donor("far@x.com", BloodGroup::APositive, true, Some(farther)),
            donor("near@x.com", BloodGroup::APositive, true, Some(near)),
            donor("remote@x.com", BloodGroup::APositive, true, Some(remote)),
        ])
        .await;

        let found = service
            .search_donors(DonorSearch {
                blood_group: None,
                near: Some(Proximity::new(centre, Some(20_000.0))),
            })
            .await
            .expect("search succeeds");
        let emails: Vec<&str> = found.iter().map(|d| d.email.as_str()).collect();
        assert_eq!(emails, vec!["near@x.com", "far@x.com"]);
    }
}
