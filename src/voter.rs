//! Voter domain record and registration draft types.

use serde::{Deserialize, Serialize};

use crate::types::{DoctorId, Field, VoterId};

/// Fully materialized, persisted registrant record.
///
/// Serialized with camelCase keys so blobs written by earlier portal builds
/// decode unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoterRecord {
    /// Identifier assigned at creation.
    pub voter_id: VoterId,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Other names; empty when not supplied.
    #[serde(default)]
    pub other_names: String,
    /// Date of birth as entered (`YYYY-MM-DD`).
    pub dob: String,
    /// Sex.
    pub sex: String,
    /// Marital status.
    pub marital_status: String,
    /// Local government area.
    pub lga: String,
    /// Doctor identifier; unique across the store.
    pub doctor_id: DoctorId,
    /// ISO-8601 UTC creation timestamp.
    pub registration_date: String,
}

impl VoterRecord {
    /// Assembles a record from a draft plus the generated identifier and timestamp.
    pub fn from_draft(draft: VoterDraft, voter_id: VoterId, registration_date: String) -> Self {
        Self {
            voter_id,
            first_name: draft.first_name,
            last_name: draft.last_name,
            other_names: draft.other_names,
            dob: draft.dob,
            sex: draft.sex,
            marital_status: draft.marital_status,
            lga: draft.lga,
            doctor_id: draft.doctor_id,
            registration_date,
        }
    }

    /// `first last other`, trimmed when other names are empty.
    pub fn full_name(&self) -> String {
        format!("{} {} {}", self.first_name, self.last_name, self.other_names)
            .trim()
            .to_string()
    }
}

/// Registration form payload used to create a new [`VoterRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VoterDraft {
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Other names.
    pub other_names: String,
    /// Date of birth (`YYYY-MM-DD`).
    pub dob: String,
    /// Sex.
    pub sex: String,
    /// Marital status.
    pub marital_status: String,
    /// Local government area.
    pub lga: String,
    /// Doctor identifier.
    pub doctor_id: DoctorId,
}

impl VoterDraft {
    /// Returns a copy with surrounding whitespace stripped from every field.
    pub fn trimmed(&self) -> Self {
        Self {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            other_names: self.other_names.trim().to_string(),
            dob: self.dob.trim().to_string(),
            sex: self.sex.trim().to_string(),
            marital_status: self.marital_status.trim().to_string(),
            lga: self.lga.trim().to_string(),
            doctor_id: self.doctor_id.trim().to_string(),
        }
    }

    /// Raw value of a required field.
    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::FirstName => &self.first_name,
            Field::LastName => &self.last_name,
            Field::DateOfBirth => &self.dob,
            Field::Sex => &self.sex,
            Field::MaritalStatus => &self.marital_status,
            Field::Lga => &self.lga,
            Field::DoctorId => &self.doctor_id,
        }
    }
}
