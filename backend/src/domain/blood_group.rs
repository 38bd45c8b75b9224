//! The eight canonical ABO/Rh blood groups.
//!
//! The wire and storage form is the familiar clinical surface form
//! (`A+`, `O-`, ...), not the Rust variant name.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a string is not one of the eight recognised groups.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised blood group: {raw:?}")]
pub struct BloodGroupParseError {
    raw: String,
}

/// ABO/Rh blood group classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BloodGroup {
    APositive,
    ANegative,
    BPositive,
    BNegative,
    AbPositive,
    AbNegative,
    OPositive,
    ONegative,
}

impl BloodGroup {
    /// All groups, in the order clinical forms usually list them.
    pub const ALL: [Self; 8] = [
        Self::APositive,
        Self::ANegative,
        Self::BPositive,
        Self::BNegative,
        Self::AbPositive,
        Self::AbNegative,
        Self::OPositive,
        Self::ONegative,
    ];

    /// Clinical surface form, e.g. `"AB-"`.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::APositive => "A+",
            Self::ANegative => "A-",
            Self::BPositive => "B+",
            Self::BNegative => "B-",
            Self::AbPositive => "AB+",
            Self::AbNegative => "AB-",
            Self::OPositive => "O+",
            Self::ONegative => "O-",
        }
    }
}

impl fmt::Display for BloodGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BloodGroup {
    type Err = BloodGroupParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A+" => Ok(Self::APositive),
            "A-" => Ok(Self::ANegative),
            "B+" => Ok(Self::BPositive),
            "B-" => Ok(Self::BNegative),
            "AB+" => Ok(Self::AbPositive),
            "AB-" => Ok(Self::AbNegative),
            "O+" => Ok(Self::OPositive),
            "O-" => Ok(Self::ONegative),
            other => Err(BloodGroupParseError {
                raw: other.to_owned(),
            }),
        }
    }
}

impl TryFrom<String> for BloodGroup {
    type Error = BloodGroupParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BloodGroup> for String {
    fn from(value: BloodGroup) -> Self {
        value.as_str().to_owned()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("A+", BloodGroup::APositive)]
    #[case("AB-", BloodGroup::AbNegative)]
    #[case("O-", BloodGroup::ONegative)]
    #[case(" B+ ", BloodGroup::BPositive)]
    fn surface_forms_parse(#[case] raw: &str, #[case] expected: BloodGroup) {
        assert_eq!(raw.parse::<BloodGroup>().expect("valid group"), expected);
    }

    #[rstest]
    #[case("AB")]
    #[case("a+")]
    #[case("")]
    #[case("C+")]
    fn unknown_forms_are_rejected(#[case] raw: &str) {
        assert!(raw.parse::<BloodGroup>().is_err());
    }

    #[test]
    fn every_group_round_trips() {
        for group in BloodGroup::ALL {
            assert_eq!(group.as_str().parse::<BloodGroup>(), Ok(group));
        }
    }

    #[test]
    fn serialises_as_surface_form() {
        let json = serde_json::to_string(&BloodGroup::AbPositive).expect("serialise");
        assert_eq!(json, "\"AB+\"");
    }
}
