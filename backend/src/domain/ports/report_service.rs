//! Driving port for the admin reporting surface.
//!
//! Each report is a flat projection with exactly the columns the operations
//! team exports to spreadsheets; the spreadsheet serialisation itself lives
//! outside this service.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::error::Error;

/// One row of the users report.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserReportRow {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub blood_group: Option<String>,
    pub role: String,
    pub is_donor: bool,
    pub city: Option<String>,
    pub state: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One row of the requests report, with requester and bank joined in.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestReportRow {
    pub request_id: String,
    pub requester_name: Option<String>,
    pub requester_email: Option<String>,
    pub requester_phone: Option<String>,
    pub blood_group: String,
    pub units: u32,
    pub bank_name: Option<String>,
    pub bank_phone: Option<String>,
    pub status: String,
    pub urgency: String,
    pub required_by: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// One row of the banks report, inventory flattened per group.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BankReportRow {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub license_number: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub is_verified: bool,
    /// Units per group keyed by the clinical surface form (`"A+"`, ...).
    pub inventory: std::collections::BTreeMap<String, u32>,
    pub created_at: DateTime<Utc>,
}

/// One row of the camps report.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CampReportRow {
    pub camp_name: String,
    pub organizer_name: String,
    pub date: DateTime<Utc>,
    pub venue: String,
    pub city: String,
    pub target_units: u32,
    pub collected_units: u32,
    pub registered_donors: u32,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Domain use-case port for administrative reports.
#[async_trait]
pub trait ReportService: Send + Sync {
    /// Every user account, one row each.
    async fn users_report(&self) -> Result<Vec<UserReportRow>, Error>;

    /// Every blood request, with owner and bank descriptors joined.
    async fn requests_report(&self) -> Result<Vec<RequestReportRow>, Error>;

    /// Every bank with its flattened inventory.
    async fn banks_report(&self) -> Result<Vec<BankReportRow>, Error>;

    /// Every camp with registration counts.
    async fn camps_report(&self) -> Result<Vec<CampReportRow>, Error>;
}
