//! Shared primitive IDs and form field names.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque voter identifier, e.g. `VTR17171717171714321`.
pub type VoterId = String;
/// Doctor identifier entered on the registration form.
pub type DoctorId = String;
/// Milliseconds since the Unix epoch.
pub type TimestampMs = u64;

/// Registration form fields subject to required-field checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    /// Registrant first name.
    FirstName,
    /// Registrant last name.
    LastName,
    /// Date of birth.
    DateOfBirth,
    /// Sex.
    Sex,
    /// Marital status.
    MaritalStatus,
    /// Local government area.
    Lga,
    /// Doctor identifier.
    DoctorId,
}

impl Field {
    /// Every required field, in form order.
    pub const REQUIRED: [Field; 7] = [
        Field::FirstName,
        Field::LastName,
        Field::DateOfBirth,
        Field::Sex,
        Field::MaritalStatus,
        Field::Lga,
        Field::DoctorId,
    ];

    /// Human-readable label used in validation messages.
    pub fn label(self) -> &'static str {
        match self {
            Field::FirstName => "First name",
            Field::LastName => "Last name",
            Field::DateOfBirth => "Date of birth",
            Field::Sex => "Sex",
            Field::MaritalStatus => "Marital status",
            Field::Lga => "LGA",
            Field::DoctorId => "Doctor's ID",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
