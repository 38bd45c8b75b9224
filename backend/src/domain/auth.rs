//! Authentication payload value objects.
//!
//! Inbound DTO parsing stays in the HTTP layer; these constructors validate
//! raw strings before a handler hands them to the account service, so the
//! services only ever see well-formed input.

use std::fmt;

use zeroize::Zeroizing;

use super::blood_group::BloodGroup;
use super::password::MIN_PASSWORD_LEN;
use super::user::Address;

/// Validation errors for registration and login payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthValidationError {
    EmptyName,
    InvalidEmail,
    EmptyPassword,
    PasswordTooShort { min: usize },
    EmptyPhone,
    EmptyLicenseNumber,
    MissingProviderId,
}

impl fmt::Display for AuthValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::InvalidEmail => write!(f, "email address is not valid"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
            Self::EmptyPhone => write!(f, "phone number must not be empty"),
            Self::EmptyLicenseNumber => write!(f, "licence number must not be empty"),
            Self::MissingProviderId => write!(f, "federated provider id is missing"),
        }
    }
}

impl std::error::Error for AuthValidationError {}

/// A validated, normalised email address.
///
/// ## Invariants
/// - trimmed, lowercased
/// - exactly one `@` with a non-empty local part and domain
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and normalise a raw address.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, AuthValidationError> {
        let normalised = raw.as_ref().trim().to_lowercase();
        let mut parts = normalised.split('@');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(local), Some(domain), None) if !local.is_empty() && !domain.is_empty() => {
                Ok(Self(normalised))
            }
            _ => Err(AuthValidationError::InvalidEmail),
        }
    }

    /// The normalised address text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = AuthValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// Validated login credentials.
///
/// The password keeps caller-provided whitespace (trimming credentials leads
/// to surprising comparisons) and lives in a zeroised buffer.
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password input.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, AuthValidationError> {
        if password.is_empty() {
            return Err(AuthValidationError::EmptyPassword);
        }
        Ok(Self {
            email: EmailAddress::new(email)?,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// The normalised email used for the account lookup.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// The password exactly as supplied.
    pub fn password(&self) -> Zeroizing<String> {
        self.password.clone()
    }
}

/// A validated user registration form.
#[derive(Debug, Clone)]
pub struct NewRegistration {
    pub name: String,
    pub email: EmailAddress,
    password: Zeroizing<String>,
    pub phone: String,
    pub blood_group: Option<BloodGroup>,
    pub is_donor: bool,
    pub address: Option<Address>,
}

impl NewRegistration {
    /// Validate the registration form fields.
    #[expect(clippy::too_many_arguments, reason = "mirrors the registration form")]
    pub fn try_new(
        name: &str,
        email: &str,
        password: &str,
        phone: &str,
        blood_group: Option<BloodGroup>,
        is_donor: bool,
        address: Option<Address>,
    ) -> Result<Self, AuthValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AuthValidationError::EmptyName);
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(AuthValidationError::PasswordTooShort {
                min: MIN_PASSWORD_LEN,
            });
        }
        let phone = phone.trim();
        if phone.is_empty() {
            return Err(AuthValidationError::EmptyPhone);
        }
        Ok(Self {
            name: name.to_owned(),
            email: EmailAddress::new(email)?,
            password: Zeroizing::new(password.to_owned()),
            phone: phone.to_owned(),
            blood_group,
            is_donor,
            address,
        })
    }

    /// The plaintext password, for hashing only.
    pub fn password(&self) -> Zeroizing<String> {
        self.password.clone()
    }
}

/// A validated blood-bank registration form.
#[derive(Debug, Clone)]
pub struct BankRegistration {
    pub name: String,
    pub email: EmailAddress,
    password: Zeroizing<String>,
    pub phone: String,
    pub license_number: String,
    pub registration_number: Option<String>,
    pub established_year: Option<i32>,
    pub address: Option<Address>,
}

impl BankRegistration {
    /// Validate the bank registration form fields.
    #[expect(clippy::too_many_arguments, reason = "mirrors the registration form")]
    pub fn try_new(
        name: &str,
        email: &str,
        password: &str,
        phone: &str,
        license_number: &str,
        registration_number: Option<String>,
        established_year: Option<i32>,
        address: Option<Address>,
    ) -> Result<Self, AuthValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AuthValidationError::EmptyName);
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(AuthValidationError::PasswordTooShort {
                min: MIN_PASSWORD_LEN,
            });
        }
        let phone = phone.trim();
        if phone.is_empty() {
            return Err(AuthValidationError::EmptyPhone);
        }
        let license_number = license_number.trim();
        if license_number.is_empty() {
            return Err(AuthValidationError::EmptyLicenseNumber);
        }
        Ok(Self {
            name: name.to_owned(),
            email: EmailAddress::new(email)?,
            password: Zeroizing::new(password.to_owned()),
            phone: phone.to_owned(),
            license_number: license_number.to_owned(),
            registration_number,
            established_year,
            address,
        })
    }

    /// The plaintext password, for hashing only.
    pub fn password(&self) -> Zeroizing<String> {
        self.password.clone()
    }
}

/// An identity already verified by an external provider.
#[derive(Debug, Clone, PartialEq)]
pub struct FederatedIdentity {
    pub email: EmailAddress,
    pub name: String,
    pub provider_id: String,
    pub photo_url: Option<String>,
}

impl FederatedIdentity {
    /// Validate the provider-supplied identity fields.
    pub fn try_new(
        email: &str,
        name: &str,
        provider_id: &str,
        photo_url: Option<String>,
    ) -> Result<Self, AuthValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AuthValidationError::EmptyName);
        }
        let provider_id = provider_id.trim();
        if provider_id.is_empty() {
            return Err(AuthValidationError::MissingProviderId);
        }
        Ok(Self {
            email: EmailAddress::new(email)?,
            name: name.to_owned(),
            provider_id: provider_id.to_owned(),
            photo_url,
        })
    }
}
