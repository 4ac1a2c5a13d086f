//! Required-field, minimum-age and duplicate-doctor checks.

use std::fmt;

use chrono::{Datelike, NaiveDate};

use crate::{core::store::VoterStore, types::Field, voter::VoterDraft};

/// Date format accepted for date of birth.
pub const DOB_FORMAT: &str = "%Y-%m-%d";

/// One violated registration rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required field was empty after trimming.
    #[error("{0} is required")]
    Required(Field),
    /// Date of birth could not be parsed.
    #[error("Date of birth must be a valid date (YYYY-MM-DD)")]
    InvalidDateOfBirth,
    /// Calendar-year age below the configured minimum.
    #[error("Doctor must be at least {min_age} years old")]
    TooYoung {
        /// Configured minimum age.
        min_age: i32,
    },
    /// Doctor id already present in the store.
    #[error("This Doctor ID is already registered")]
    DuplicateDoctorId,
}

/// Every violation for one submission, in rule order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    /// True when nothing was violated.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of violations.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Display messages, one per violation.
    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.messages().join("\n"))
    }
}

impl std::error::Error for ValidationErrors {}

/// Whole calendar years from `dob` to `today`, ignoring month and day.
///
/// Someone born on 31 December is counted a year older on 1 January.
pub fn calendar_age(dob: NaiveDate, today: NaiveDate) -> i32 {
    today.year() - dob.year()
}

/// Checks `draft` against the required-field rules, the minimum age and the
/// existing doctor ids in `store`.
///
/// Returns all violations; an empty vec means the draft may be created.
pub fn validate_draft(
    draft: &VoterDraft,
    store: &VoterStore,
    today: NaiveDate,
    min_age: i32,
) -> Vec<ValidationError> {
    let draft = draft.trimmed();
    let mut errors: Vec<ValidationError> = Field::REQUIRED
        .iter()
        .filter(|field| draft.field(**field).is_empty())
        .map(|field| ValidationError::Required(*field))
        .collect();

    if !draft.dob.is_empty() {
        match NaiveDate::parse_from_str(&draft.dob, DOB_FORMAT) {
            Ok(dob) if calendar_age(dob, today) < min_age => {
                errors.push(ValidationError::TooYoung { min_age });
            }
            Ok(_) => {}
            Err(_) => errors.push(ValidationError::InvalidDateOfBirth),
        }
    }

    if !draft.doctor_id.is_empty() && store.contains_doctor_id(&draft.doctor_id) {
        errors.push(ValidationError::DuplicateDoctorId);
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn empty_draft_reports_every_required_field() {
        let errors = validate_draft(&VoterDraft::default(), &VoterStore::new(), date(2025, 6, 1), 23);
        let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
        assert_eq!(
            messages,
            [
                "First name is required",
                "Last name is required",
                "Date of birth is required",
                "Sex is required",
                "Marital status is required",
                "LGA is required",
                "Doctor's ID is required",
            ]
        );
    }

    #[test]
    fn whitespace_only_counts_as_missing() {
        let draft = VoterDraft {
            first_name: "   ".to_string(),
            ..VoterDraft::default()
        };
        let errors = validate_draft(&draft, &VoterStore::new(), date(2025, 6, 1), 23);
        assert!(errors.contains(&ValidationError::Required(Field::FirstName)));
    }

    #[test]
    fn calendar_age_ignores_day_of_year() {
        assert_eq!(calendar_age(date(2002, 12, 31), date(2025, 1, 1)), 23);
        assert_eq!(calendar_age(date(2003, 1, 1), date(2025, 12, 31)), 22);
    }

    #[test]
    fn unparseable_dob_is_reported() {
        let draft = VoterDraft {
            dob: "01/02/1990".to_string(),
            ..VoterDraft::default()
        };
        let errors = validate_draft(&draft, &VoterStore::new(), date(2025, 6, 1), 23);
        assert!(errors.contains(&ValidationError::InvalidDateOfBirth));
        assert!(!errors.contains(&ValidationError::Required(Field::DateOfBirth)));
    }

    #[test]
    fn joined_display_is_newline_separated() {
        let errors = ValidationErrors(vec![
            ValidationError::Required(Field::Sex),
            ValidationError::DuplicateDoctorId,
        ]);
        assert_eq!(
            errors.to_string(),
            "Sex is required\nThis Doctor ID is already registered"
        );
    }
}
