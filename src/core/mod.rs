//! In-memory authoritative store and validation rules.

/// Authoritative voter sequence with doctor-id index.
pub mod store;
/// Registration form validation.
pub mod validate;
