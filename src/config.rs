//! Portal configuration and clock abstraction.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

/// Storage key the portal has always used for the voter sequence.
pub const DEFAULT_STORAGE_KEY: &str = "voters";
/// Prefix prepended to every generated voter identifier.
pub const DEFAULT_VOTER_ID_PREFIX: &str = "VTR";
/// Minimum registrant age in calendar years.
pub const DEFAULT_MIN_AGE_YEARS: i32 = 23;

/// Literal admin credentials.
///
/// Compared as plain strings with no hashing or rate limiting.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AdminCredentials {
    /// Admin username.
    pub username: String,
    /// Admin password.
    pub password: String,
}

impl Default for AdminCredentials {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password: "admin123".to_string(),
        }
    }
}

/// Registry and session settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    /// Key under which the whole voter sequence is stored.
    pub storage_key: String,
    /// Prefix for generated voter identifiers.
    pub voter_id_prefix: String,
    /// Minimum age, by calendar-year subtraction.
    pub min_age_years: i32,
    /// Export file stem; the date and `.json` are appended.
    pub export_file_prefix: String,
    /// Admin login.
    pub admin: AdminCredentials,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            voter_id_prefix: DEFAULT_VOTER_ID_PREFIX.to_string(),
            min_age_years: DEFAULT_MIN_AGE_YEARS,
            export_file_prefix: "voters_backup".to_string(),
            admin: AdminCredentials::default(),
        }
    }
}

impl PortalConfig {
    /// Parses a JSON config; missing keys fall back to defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

/// Source of wall-clock time.
pub trait Clock: Send {
    /// Current instant in UTC.
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar date in UTC.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    /// Current time in milliseconds since the Unix epoch.
    fn now_ms(&self) -> u64 {
        u64::try_from(self.now().timestamp_millis()).unwrap_or(0)
    }
}

/// Reads the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = PortalConfig::from_json_str(r#"{"storage_key": "voters-test"}"#).unwrap();
        assert_eq!(cfg.storage_key, "voters-test");
        assert_eq!(cfg.voter_id_prefix, "VTR");
        assert_eq!(cfg.min_age_years, 23);
        assert_eq!(cfg.admin, AdminCredentials::default());
    }

    #[test]
    fn fixed_clock_derives_date_and_millis() {
        let at = DateTime::parse_from_rfc3339("2025-06-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let clock = FixedClock(at);
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        assert_eq!(clock.now_ms(), 1_748_779_200_000);
    }
}
