//! Blood request aggregate and the status transition rules.
//!
//! A request starts `pending` and moves exactly once into one of the
//! terminal states. Who may trigger which move is decided here, in one
//! place, from the tagged [`Actor`] the gate produced:
//!
//! - a blood bank may move a pending request to `approved` or `declined`;
//! - the owning requester may move their own pending request to `cancelled`;
//! - nothing leaves a terminal state.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::actor::Actor;
use super::blood_group::BloodGroup;
use super::ids::{BankId, RequestId, UserId};

/// How urgently the blood is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Critical,
    Urgent,
    Normal,
}

impl Urgency {
    /// Stable wire form.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Urgent => "urgent",
            Self::Normal => "normal",
        }
    }
}

/// Lifecycle state of a request. Everything except `Pending` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Declined,
    Cancelled,
    Fulfilled,
}

impl RequestStatus {
    /// Stable wire and storage form.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Declined => "declined",
            Self::Cancelled => "cancelled",
            Self::Fulfilled => "fulfilled",
        }
    }

    /// Whether no further transition is defined out of this state.
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RequestStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "declined" => Ok(Self::Declined),
            "cancelled" => Ok(Self::Cancelled),
            "fulfilled" => Ok(Self::Fulfilled),
            other => Err(StatusParseError {
                raw: other.to_owned(),
            }),
        }
    }
}

/// Error for unrecognised status text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised request status: {raw:?}")]
pub struct StatusParseError {
    raw: String,
}

/// A blood bank's recorded answer to a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankResponse {
    pub status: RequestStatus,
    pub responded_by: BankId,
    pub responded_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Validation errors for a new request payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestValidationError {
    EmptyPatientName,
    ZeroUnits,
    EmptyHospital,
    EmptyContactNumber,
}

impl fmt::Display for RequestValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPatientName => write!(f, "patient name must not be empty"),
            Self::ZeroUnits => write!(f, "at least one unit must be requested"),
            Self::EmptyHospital => write!(f, "hospital must not be empty"),
            Self::EmptyContactNumber => write!(f, "contact number must not be empty"),
        }
    }
}

impl std::error::Error for RequestValidationError {}

/// A validated new-request form, before an id and owner are attached.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDraft {
    pub patient_name: String,
    pub blood_group: BloodGroup,
    pub units: u32,
    pub urgency: Urgency,
    pub hospital: String,
    pub contact_number: String,
    pub required_by: DateTime<Utc>,
    pub description: Option<String>,
}

impl RequestDraft {
    /// Validate the form fields.
    #[expect(clippy::too_many_arguments, reason = "mirrors the request form")]
    pub fn try_new(
        patient_name: &str,
        blood_group: BloodGroup,
        units: u32,
        urgency: Urgency,
        hospital: &str,
        contact_number: &str,
        required_by: DateTime<Utc>,
        description: Option<String>,
    ) -> Result<Self, RequestValidationError> {
        let patient_name = patient_name.trim();
        if patient_name.is_empty() {
            return Err(RequestValidationError::EmptyPatientName);
        }
        if units == 0 {
            return Err(RequestValidationError::ZeroUnits);
        }
        let hospital = hospital.trim();
        if hospital.is_empty() {
            return Err(RequestValidationError::EmptyHospital);
        }
        let contact_number = contact_number.trim();
        if contact_number.is_empty() {
            return Err(RequestValidationError::EmptyContactNumber);
        }
        Ok(Self {
            patient_name: patient_name.to_owned(),
            blood_group,
            units,
            urgency,
            hospital: hospital.to_owned(),
            contact_number: contact_number.to_owned(),
            required_by,
            description,
        })
    }
}

/// A single patient's recorded need for blood.
///
/// ## Invariants
/// - `requested_by` never changes after creation.
/// - `bank_response` is present only once a bank has acted, and then its
///   `status` matches the request status.
/// - requests are never physically deleted.
#[derive(Debug, Clone, PartialEq)]
pub struct BloodRequest {
    pub id: RequestId,
    pub requested_by: UserId,
    pub patient_name: String,
    pub blood_group: BloodGroup,
    pub units: u32,
    pub urgency: Urgency,
    pub hospital: String,
    pub contact_number: String,
    pub required_by: DateTime<Utc>,
    pub description: Option<String>,
    pub blood_bank: Option<BankId>,
    pub status: RequestStatus,
    pub bank_response: Option<BankResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BloodRequest {
    /// Open a new pending request owned by `requested_by`.
    pub fn open(
        id: RequestId,
        requested_by: UserId,
        draft: RequestDraft,
        now: DateTime<Utc>,
    ) -> Self {
        let RequestDraft {
            patient_name,
            blood_group,
            units,
            urgency,
            hospital,
            contact_number,
            required_by,
            description,
        } = draft;
        Self {
            id,
            requested_by,
            patient_name,
            blood_group,
            units,
            urgency,
            hospital,
            contact_number,
            required_by,
            description,
            blood_bank: None,
            status: RequestStatus::Pending,
            bank_response: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Why a requested transition was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionDenied {
    /// The acting individual does not own the request.
    NotOwner,
    /// A bank asked for a target other than approved/declined.
    BankTargetNotAllowed { target: RequestStatus },
    /// An owner asked for a target other than cancelled.
    OwnerTargetNotAllowed { target: RequestStatus },
    /// The request has already left `pending`.
    AlreadyResolved { current: RequestStatus },
}

impl fmt::Display for TransitionDenied {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotOwner => write!(f, "not authorised to modify this request"),
            Self::BankTargetNotAllowed { target } => {
                write!(f, "blood banks may only approve or decline requests, not set {target}")
            }
            Self::OwnerTargetNotAllowed { target } => {
                write!(f, "requesters may only cancel their requests, not set {target}")
            }
            Self::AlreadyResolved { current } => {
                write!(f, "only pending requests can be updated (currently {current})")
            }
        }
    }
}

impl std::error::Error for TransitionDenied {}

/// Decide whether `actor` may move `request` to `target`.
///
/// Pure decision logic; persistence applies the matching conditional update
/// afterwards so a racing transition still observes one winner.
pub fn authorise_transition(
    request: &BloodRequest,
    actor: &Actor,
    target: RequestStatus,
) -> Result<(), TransitionDenied> {
    match actor {
        Actor::BloodBank { .. } => {
            if !matches!(target, RequestStatus::Approved | RequestStatus::Declined) {
                return Err(TransitionDenied::BankTargetNotAllowed { target });
            }
        }
        Actor::Individual { id, .. } => {
            if request.requested_by != *id {
                return Err(TransitionDenied::NotOwner);
            }
            if target != RequestStatus::Cancelled {
                return Err(TransitionDenied::OwnerTargetNotAllowed { target });
            }
        }
    }
    if request.status.is_terminal() {
        return Err(TransitionDenied::AlreadyResolved {
            current: request.status,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    //! Decision-table coverage for the transition rules.
    use rstest::rstest;

    use super::*;
    use crate::domain::user::Role;

    fn pending_request(owner: UserId) -> BloodRequest {
        let draft = RequestDraft::try_new(
            "Patient Zero",
            BloodGroup::ONegative,
            2,
            Urgency::Urgent,
            "General Hospital",
            "5550100",
            Utc::now() + chrono::Duration::days(2),
            None,
        )
        .expect("valid draft");
        BloodRequest::open(RequestId::random(), owner, draft, Utc::now())
    }

    fn with_status(mut request: BloodRequest, status: RequestStatus) -> BloodRequest {
        request.status = status;
        request
    }

    fn owner_actor(id: UserId) -> Actor {
        Actor::Individual {
            id,
            role: Role::User,
        }
    }

    fn bank_actor() -> Actor {
        Actor::BloodBank {
            id: BankId::random(),
        }
    }

    #[rstest]
    #[case(RequestStatus::Approved)]
    #[case(RequestStatus::Declined)]
    fn banks_may_resolve_pending_requests(#[case] target: RequestStatus) {
        let request = pending_request(UserId::random());
        assert_eq!(authorise_transition(&request, &bank_actor(), target), Ok(()));
    }

    #[rstest]
    #[case(RequestStatus::Cancelled)]
    #[case(RequestStatus::Pending)]
    #[case(RequestStatus::Fulfilled)]
    fn banks_may_not_set_other_states(#[case] target: RequestStatus) {
        let request = pending_request(UserId::random());
        assert_eq!(
            authorise_transition(&request, &bank_actor(), target),
            Err(TransitionDenied::BankTargetNotAllowed { target })
        );
    }

    #[test]
    fn owners_may_cancel_pending_requests() {
        let owner = UserId::random();
        let request = pending_request(owner);
        assert_eq!(
            authorise_transition(&request, &owner_actor(owner), RequestStatus::Cancelled),
            Ok(())
        );
    }

    #[rstest]
    #[case(RequestStatus::Approved)]
    #[case(RequestStatus::Declined)]
    #[case(RequestStatus::Cancelled)]
    #[case(RequestStatus::Fulfilled)]
    fn non_owners_are_refused_any_target(#[case] target: RequestStatus) {
        let request = pending_request(UserId::random());
        assert_eq!(
            authorise_transition(&request, &owner_actor(UserId::random()), target),
            Err(TransitionDenied::NotOwner)
        );
    }

    #[rstest]
    #[case(RequestStatus::Approved)]
    #[case(RequestStatus::Fulfilled)]
    fn owners_may_only_cancel(#[case] target: RequestStatus) {
        let owner = UserId::random();
        let request = pending_request(owner);
        assert_eq!(
            authorise_transition(&request, &owner_actor(owner), target),
            Err(TransitionDenied::OwnerTargetNotAllowed { target })
        );
    }

    #[rstest]
    #[case(RequestStatus::Approved)]
    #[case(RequestStatus::Declined)]
    #[case(RequestStatus::Cancelled)]
    #[case(RequestStatus::Fulfilled)]
    fn owners_cannot_cancel_resolved_requests(#[case] current: RequestStatus) {
        let owner = UserId::random();
        let request = with_status(pending_request(owner), current);
        assert_eq!(
            authorise_transition(&request, &owner_actor(owner), RequestStatus::Cancelled),
            Err(TransitionDenied::AlreadyResolved { current })
        );
    }

    #[rstest]
    #[case(RequestStatus::Approved, RequestStatus::Approved)]
    #[case(RequestStatus::Approved, RequestStatus::Declined)]
    #[case(RequestStatus::Cancelled, RequestStatus::Approved)]
    fn banks_cannot_touch_resolved_requests(
        #[case] current: RequestStatus,
        #[case] target: RequestStatus,
    ) {
        // Re-issuing an identical transition is an error, not a silent
        // overwrite.
        let request = with_status(pending_request(UserId::random()), current);
        assert_eq!(
            authorise_transition(&request, &bank_actor(), target),
            Err(TransitionDenied::AlreadyResolved { current })
        );
    }

    #[test]
    fn drafts_reject_zero_units() {
        let err = RequestDraft::try_new(
            "Patient Zero",
            BloodGroup::APositive,
            0,
            Urgency::Normal,
            "General Hospital",
            "5550100",
            Utc::now(),
            None,
        )
        .expect_err("zero units fails");
        assert_eq!(err, RequestValidationError::ZeroUnits);
    }

    #[test]
    fn open_requests_start_pending_with_matching_timestamps() {
        let request = pending_request(UserId::random());
        assert_eq!(request.status, RequestStatus::Pending);
        assert!(!request.status.is_terminal());
        assert_eq!(request.created_at, request.updated_at);
        assert!(request.bank_response.is_none());
    }
}
