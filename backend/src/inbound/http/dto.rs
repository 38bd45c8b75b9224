//! Wire representations shared across the HTTP handlers.
//!
//! Outbound DTOs are built from domain aggregates and deliberately omit
//! password digests; serde does the camelCase renaming.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::camp::CampRegistration;
use crate::domain::request::BankResponse;
use crate::domain::user::{Address, DonorProfile};
use crate::domain::{
    BloodBankAccount, BloodGroup, BloodRequest, CampStatus, DonationCamp, GeoPoint,
    InventoryLevel, OperatingHours, RequestStatus, Role, Urgency, UserAccount,
};

/// An individual account as returned to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: crate::domain::UserId,
    pub name: String,
    #[schema(example = "a@x.com")]
    pub email: String,
    pub phone: String,
    #[schema(value_type = Option<String>, example = "O+")]
    pub blood_group: Option<BloodGroup>,
    #[schema(value_type = String, example = "user")]
    pub role: Role,
    pub is_donor: bool,
    pub is_available: bool,
    #[schema(value_type = Option<Object>)]
    pub address: Option<Address>,
    #[schema(value_type = Option<Object>)]
    pub location: Option<GeoPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub donor_profile: Option<DonorProfile>,
    pub created_at: DateTime<Utc>,
}

impl From<UserAccount> for UserDto {
    fn from(user: UserAccount) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email.as_str().to_owned(),
            phone: user.phone,
            blood_group: user.blood_group,
            role: user.role,
            is_donor: user.is_donor,
            is_available: user.is_available,
            address: user.address,
            location: user.location,
            photo_url: user.photo_url,
            donor_profile: user.donor_profile,
            created_at: user.created_at,
        }
    }
}

/// A blood-bank account as returned to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BankDto {
    #[schema(value_type = String)]
    pub id: crate::domain::BankId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub license_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub established_year: Option<i32>,
    #[schema(value_type = Option<Object>)]
    pub address: Option<Address>,
    #[schema(value_type = Option<Object>)]
    pub location: Option<GeoPoint>,
    #[schema(value_type = Vec<Object>)]
    pub inventory: Vec<InventoryLevel>,
    #[schema(value_type = Object)]
    pub operating_hours: OperatingHours,
    pub is_active: bool,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<BloodBankAccount> for BankDto {
    fn from(bank: BloodBankAccount) -> Self {
        Self {
            id: bank.id,
            name: bank.name,
            email: bank.email.as_str().to_owned(),
            phone: bank.phone,
            license_number: bank.license_number,
            registration_number: bank.registration_number,
            established_year: bank.established_year,
            address: bank.address,
            location: bank.location,
            inventory: bank.inventory.levels().to_vec(),
            operating_hours: bank.operating_hours,
            is_active: bank.is_active,
            is_verified: bank.is_verified,
            created_at: bank.created_at,
        }
    }
}

/// A blood request as returned to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestDto {
    #[schema(value_type = String)]
    pub id: crate::domain::RequestId,
    #[schema(value_type = String)]
    pub requested_by: crate::domain::UserId,
    pub patient_name: String,
    #[schema(value_type = String, example = "O-")]
    pub blood_group: BloodGroup,
    pub units: u32,
    #[schema(value_type = String, example = "urgent")]
    pub urgency: Urgency,
    pub hospital: String,
    pub contact_number: String,
    pub required_by: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub blood_bank: Option<crate::domain::BankId>,
    #[schema(value_type = String, example = "pending")]
    pub status: RequestStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub bank_response: Option<BankResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<BloodRequest> for RequestDto {
    fn from(request: BloodRequest) -> Self {
        Self {
            id: request.id,
            requested_by: request.requested_by,
            patient_name: request.patient_name,
            blood_group: request.blood_group,
            units: request.units,
            urgency: request.urgency,
            hospital: request.hospital,
            contact_number: request.contact_number,
            required_by: request.required_by,
            description: request.description,
            blood_bank: request.blood_bank,
            status: request.status,
            bank_response: request.bank_response,
            created_at: request.created_at,
            updated_at: request.updated_at,
        }
    }
}

/// A donation camp as returned to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CampDto {
    #[schema(value_type = String)]
    pub id: crate::domain::CampId,
    #[schema(value_type = String)]
    pub organizer: crate::domain::BankId,
    pub organizer_name: String,
    pub name: String,
    pub date: DateTime<Utc>,
    pub start_time: String,
    pub end_time: String,
    pub venue: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub target_units: u32,
    pub collected_units: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[schema(value_type = String, example = "scheduled")]
    pub status: CampStatus,
    #[schema(value_type = Vec<Object>)]
    pub registered_donors: Vec<CampRegistration>,
    pub created_at: DateTime<Utc>,
}

impl From<DonationCamp> for CampDto {
    fn from(camp: DonationCamp) -> Self {
        Self {
            id: camp.id,
            organizer: camp.organizer,
            organizer_name: camp.organizer_name,
            name: camp.name,
            date: camp.date,
            start_time: camp.start_time,
            end_time: camp.end_time,
            venue: camp.venue,
            address: camp.address,
            city: camp.city,
            state: camp.state,
            pincode: camp.pincode,
            target_units: camp.target_units,
            collected_units: camp.collected_units,
            description: camp.description,
            contact_phone: camp.contact_phone,
            contact_email: camp.contact_email,
            status: camp.status,
            registered_donors: camp.registered_donors,
            created_at: camp.created_at,
        }
    }
}
