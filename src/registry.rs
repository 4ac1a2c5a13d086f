//! Persistent voter registry: the store, its storage backend and the codec
//! composed behind one synchronous API.

use chrono::{NaiveDate, SecondsFormat};
use tracing::{debug, info, warn};

use crate::{
    codec::VoterIdCodec,
    config::{Clock, PortalConfig, SystemClock},
    core::{
        store::VoterStore,
        validate::{ValidationError, ValidationErrors, validate_draft},
    },
    persist::{KvStorage, PersistError},
    voter::{VoterDraft, VoterRecord},
};

/// Suffix of the key a malformed blob is copied to before it can be overwritten.
pub const MALFORMED_KEY_SUFFIX: &str = ".malformed";

/// Failure of a registry mutation.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The draft broke one or more rules; nothing was stored.
    #[error("{0}")]
    Validation(ValidationErrors),
    /// The write failed and the append was rolled back.
    #[error("failed to save registration: {0}")]
    Persist(#[from] PersistError),
}

/// What [`Registry::initialize`] found in storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadReport {
    /// No blob under the storage key.
    Empty,
    /// Blob decoded.
    Loaded {
        /// Records restored.
        records: usize,
    },
    /// Blob unreadable or malformed; the registry started empty.
    Recovered {
        /// Why the blob was discarded.
        reason: String,
        /// Key holding a copy of the discarded blob, when the copy succeeded.
        preserved_key: Option<String>,
    },
}

/// Owns the voter sequence and writes it back after every create.
pub struct Registry {
    store: VoterStore,
    storage: Box<dyn KvStorage>,
    codec: VoterIdCodec,
    clock: Box<dyn Clock>,
    config: PortalConfig,
    load_report: LoadReport,
}

impl Registry {
    /// Loads the registry from `storage` using the system clock.
    pub fn initialize(storage: Box<dyn KvStorage>, config: PortalConfig) -> Self {
        Self::initialize_with_clock(storage, config, Box::new(SystemClock))
    }

    /// Loads the registry from `storage`.
    ///
    /// Never fails: an unreadable or malformed blob is logged, copied aside
    /// when possible, and replaced by an empty sequence. The outcome is
    /// available from [`Registry::load_report`].
    pub fn initialize_with_clock(
        mut storage: Box<dyn KvStorage>,
        config: PortalConfig,
        clock: Box<dyn Clock>,
    ) -> Self {
        let key = config.storage_key.as_str();
        let (store, load_report) = match storage.get(key) {
            Ok(None) => (VoterStore::new(), LoadReport::Empty),
            Ok(Some(raw)) => match VoterStore::decode(&raw) {
                Ok(store) => {
                    let records = store.len();
                    (store, LoadReport::Loaded { records })
                }
                Err(err) => {
                    let backup_key = format!("{key}{MALFORMED_KEY_SUFFIX}");
                    let preserved_key = match storage.set(&backup_key, &raw) {
                        Ok(()) => Some(backup_key),
                        Err(set_err) => {
                            warn!(key, error = %set_err, "could not preserve malformed voter data");
                            None
                        }
                    };
                    warn!(key, error = %err, ?preserved_key, "malformed voter data, starting empty");
                    let report = LoadReport::Recovered {
                        reason: err.to_string(),
                        preserved_key,
                    };
                    (VoterStore::new(), report)
                }
            },
            Err(err) => {
                warn!(key, error = %err, "voter data unreadable, starting empty");
                let report = LoadReport::Recovered {
                    reason: err.to_string(),
                    preserved_key: None,
                };
                (VoterStore::new(), report)
            }
        };

        info!(key, total = store.len(), "voter registry initialized");

        Self {
            store,
            storage,
            codec: VoterIdCodec::new(config.voter_id_prefix.clone()),
            clock,
            config,
            load_report,
        }
    }

    /// Outcome of loading storage at startup.
    pub fn load_report(&self) -> &LoadReport {
        &self.load_report
    }

    /// Active configuration.
    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    /// Identifier codec built from the configured prefix.
    pub fn codec(&self) -> &VoterIdCodec {
        &self.codec
    }

    /// Current date from the registry clock.
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Every rule `draft` violates against the current store.
    pub fn validate(&self, draft: &VoterDraft) -> Vec<ValidationError> {
        validate_draft(draft, &self.store, self.today(), self.config.min_age_years)
    }

    /// Appends a new record built from `draft` and persists the full sequence.
    ///
    /// Callers run [`Registry::validate`] first; nothing is re-checked here.
    /// When the storage write fails the append is rolled back and the store
    /// is left as it was.
    pub fn create(&mut self, draft: VoterDraft) -> Result<VoterRecord, RegistryError> {
        let now = self.clock.now();
        let now_ms = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        let voter_id = self.codec.generate(now_ms);
        let registration_date = now.to_rfc3339_opts(SecondsFormat::Millis, true);
        let rec = VoterRecord::from_draft(draft.trimmed(), voter_id, registration_date);

        self.store.push(rec.clone());
        if let Err(err) = self.persist() {
            self.store.rollback_last();
            warn!(error = %err, total = self.store.len(), "voter save failed, registration rolled back");
            return Err(err.into());
        }

        info!(
            voter_id = %VoterIdCodec::mask(Some(rec.voter_id.as_str())),
            total = self.store.len(),
            "voter registered"
        );
        Ok(rec)
    }

    /// Validates then creates.
    pub fn register(&mut self, draft: VoterDraft) -> Result<VoterRecord, RegistryError> {
        let errors = self.validate(&draft);
        if !errors.is_empty() {
            debug!(errors = errors.len(), "registration rejected");
            return Err(RegistryError::Validation(ValidationErrors(errors)));
        }
        self.create(draft)
    }

    /// Records in registration order.
    pub fn list(&self) -> &[VoterRecord] {
        self.store.records()
    }

    /// Number of registered voters.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// True when nobody is registered.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Looks up a record by voter identifier.
    pub fn get(&self, voter_id: &str) -> Option<&VoterRecord> {
        self.store.get(voter_id)
    }

    /// Records registered under `doctor_id`.
    pub fn by_doctor(&self, doctor_id: &str) -> Vec<&VoterRecord> {
        self.store.by_doctor(doctor_id)
    }

    /// Pretty-printed JSON array of every record, for download.
    pub fn export_snapshot(&self) -> Result<Vec<u8>, RegistryError> {
        let bytes = serde_json::to_vec_pretty(self.store.records()).map_err(PersistError::from)?;
        debug!(records = self.store.len(), bytes = bytes.len(), "voter snapshot exported");
        Ok(bytes)
    }

    /// `<export_file_prefix>_YYYY-MM-DD.json`.
    pub fn export_file_name(&self, date: NaiveDate) -> String {
        format!("{}_{}.json", self.config.export_file_prefix, date.format("%Y-%m-%d"))
    }

    fn persist(&mut self) -> Result<(), PersistError> {
        let payload = self.store.encode()?;
        self.storage.set(&self.config.storage_key, &payload)
    }
}
