//! Voter registration records with durable key-value persistence.
//!
//! # Examples
//!
//! In-memory usage with [`registry::Registry`]:
//! ```
//! use voterlog::{
//!     config::PortalConfig,
//!     persist::memory::MemoryKvStorage,
//!     registry::Registry,
//!     voter::VoterDraft,
//! };
//!
//! let mut registry = Registry::initialize(Box::new(MemoryKvStorage::new()), PortalConfig::default());
//! let draft = VoterDraft {
//!     first_name: "Ada".to_string(),
//!     last_name: "Lovelace".to_string(),
//!     dob: "1990-01-01".to_string(),
//!     sex: "F".to_string(),
//!     marital_status: "Single".to_string(),
//!     lga: "Ikeja".to_string(),
//!     doctor_id: "DOC1".to_string(),
//!     ..VoterDraft::default()
//! };
//! assert!(registry.validate(&draft).is_empty());
//! let rec = registry.create(draft).expect("create");
//! assert!(rec.voter_id.starts_with("VTR"));
//! assert_eq!(registry.list().len(), 1);
//! ```
//!
//! Runtime usage with SQLite storage:
//! ```no_run
//! use voterlog::{
//!     config::PortalConfig,
//!     persist::sqlite::SqliteKvStorage,
//!     registry::Registry,
//!     runtime::handle::{spawn_registry, RuntimeConfig},
//!     voter::VoterDraft,
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let storage = SqliteKvStorage::open("voters.db").expect("open sqlite");
//! let registry = Registry::initialize(Box::new(storage), PortalConfig::default());
//! let handle = spawn_registry(registry, RuntimeConfig::default());
//! let _rec = handle.register(VoterDraft {
//!     first_name: "Ada".to_string(),
//!     last_name: "Lovelace".to_string(),
//!     dob: "1990-01-01".to_string(),
//!     sex: "F".to_string(),
//!     marital_status: "Single".to_string(),
//!     lga: "Ikeja".to_string(),
//!     doctor_id: "DOC1".to_string(),
//!     ..VoterDraft::default()
//! }).await.expect("register");
//! handle.shutdown().await.expect("shutdown");
//! # }
//! ```
#![deny(missing_docs)]

/// Identifier generation and masking.
pub mod codec;
/// Portal settings and clock.
pub mod config;
/// Core in-memory store and validation rules.
pub mod core;
/// Key-value storage abstraction and backends.
pub mod persist;
/// Composed, persistent voter registry.
pub mod registry;
/// Single-writer runtime handle and events.
pub mod runtime;
/// UI session state and presentation handlers.
pub mod session;
/// Shared primitive types and enums.
pub mod types;
/// Voter records and registration drafts.
pub mod voter;
