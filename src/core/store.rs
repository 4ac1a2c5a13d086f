use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::{
    types::{DoctorId, VoterId},
    voter::VoterRecord,
};

/// Version number for serialized [`StoreSnapshotV1`] envelopes.
pub const SNAPSHOT_FORMAT_VERSION: u16 = 1;

/// Failure to rebuild a store from a persisted blob.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Envelope carries a version this build cannot read.
    #[error("unsupported snapshot format version {0}")]
    UnsupportedVersion(u16),
    /// Blob is neither an envelope nor a record array.
    #[error("snapshot decode failed: {0}")]
    Decode(String),
}

/// Versioned on-disk form of the voter sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshotV1 {
    /// Payload format version.
    pub format_version: u16,
    /// Records in insertion order.
    pub voters: Vec<VoterRecord>,
}

/// Ordered, append-only voter sequence.
#[derive(Debug, Default, Clone)]
pub struct VoterStore {
    records: Vec<VoterRecord>,
    by_doctor: HashMap<DoctorId, Vec<usize>>,
    by_voter_id: HashMap<VoterId, usize>,
}

impl VoterStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from records already in insertion order.
    pub fn from_records(records: Vec<VoterRecord>) -> Self {
        let mut store = Self::new();
        for rec in records {
            store.push(rec);
        }
        store
    }

    /// Rebuilds a store from a snapshot with a supported version.
    pub fn from_snapshot(snapshot: StoreSnapshotV1) -> Result<Self, StoreError> {
        if snapshot.format_version != SNAPSHOT_FORMAT_VERSION {
            return Err(StoreError::UnsupportedVersion(snapshot.format_version));
        }
        Ok(Self::from_records(snapshot.voters))
    }

    /// Decodes a persisted blob: a versioned envelope or a bare record array.
    pub fn decode(payload: &[u8]) -> Result<Self, StoreError> {
        let probe = serde_json::from_slice::<StoredSnapshotProbe>(payload)
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        match probe {
            StoredSnapshotProbe::Envelope(snapshot) => Self::from_snapshot(snapshot),
            // Blobs written before the envelope existed are a bare array.
            StoredSnapshotProbe::Bare(voters) => Ok(Self::from_records(voters)),
        }
    }

    /// Captures the full sequence as a versioned snapshot.
    pub fn export_snapshot(&self) -> StoreSnapshotV1 {
        StoreSnapshotV1 {
            format_version: SNAPSHOT_FORMAT_VERSION,
            voters: self.records.clone(),
        }
    }

    /// Serializes the versioned snapshot for storage.
    pub fn encode(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(&self.export_snapshot())
    }

    /// Appends `rec` and returns its position.
    pub fn push(&mut self, rec: VoterRecord) -> usize {
        let pos = self.records.len();
        self.by_doctor
            .entry(rec.doctor_id.clone())
            .or_default()
            .push(pos);
        self.by_voter_id.entry(rec.voter_id.clone()).or_insert(pos);
        self.records.push(rec);
        pos
    }

    /// Removes the most recent append. Used to undo an uncommitted create.
    pub fn rollback_last(&mut self) -> Option<VoterRecord> {
        let rec = self.records.pop()?;
        let pos = self.records.len();

        if let Some(positions) = self.by_doctor.get_mut(&rec.doctor_id) {
            positions.retain(|p| *p != pos);
            if positions.is_empty() {
                self.by_doctor.remove(&rec.doctor_id);
            }
        }
        if self.by_voter_id.get(&rec.voter_id) == Some(&pos) {
            self.by_voter_id.remove(&rec.voter_id);
        }
        Some(rec)
    }

    /// Records in insertion order.
    pub fn records(&self) -> &[VoterRecord] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no records are stored.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Looks up a record by voter identifier.
    pub fn get(&self, voter_id: &str) -> Option<&VoterRecord> {
        self.by_voter_id
            .get(voter_id)
            .and_then(|pos| self.records.get(*pos))
    }

    /// True when some record already uses `doctor_id`.
    pub fn contains_doctor_id(&self, doctor_id: &str) -> bool {
        self.by_doctor
            .get(doctor_id)
            .is_some_and(|positions| !positions.is_empty())
    }

    /// Records registered under `doctor_id`.
    pub fn by_doctor(&self, doctor_id: &str) -> Vec<&VoterRecord> {
        self.by_doctor
            .get(doctor_id)
            .into_iter()
            .flat_map(|positions| positions.iter())
            .filter_map(|pos| self.records.get(*pos))
            .collect()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredSnapshotProbe {
    Envelope(StoreSnapshotV1),
    Bare(Vec<VoterRecord>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voter::VoterDraft;

    fn record(voter_id: &str, doctor_id: &str) -> VoterRecord {
        VoterRecord::from_draft(
            VoterDraft {
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                doctor_id: doctor_id.to_string(),
                ..VoterDraft::default()
            },
            voter_id.to_string(),
            "2025-06-01T00:00:00.000Z".to_string(),
        )
    }

    #[test]
    fn push_keeps_insertion_order_and_indices() {
        let mut store = VoterStore::new();
        store.push(record("VTR1", "DOC1"));
        store.push(record("VTR2", "DOC2"));

        let ids: Vec<_> = store.records().iter().map(|r| r.voter_id.as_str()).collect();
        assert_eq!(ids, ["VTR1", "VTR2"]);
        assert!(store.contains_doctor_id("DOC2"));
        assert_eq!(store.get("VTR2").map(|r| r.doctor_id.as_str()), Some("DOC2"));
    }

    #[test]
    fn rollback_last_clears_indices() {
        let mut store = VoterStore::new();
        store.push(record("VTR1", "DOC1"));
        store.push(record("VTR2", "DOC2"));

        let undone = store.rollback_last().unwrap();
        assert_eq!(undone.voter_id, "VTR2");
        assert_eq!(store.len(), 1);
        assert!(!store.contains_doctor_id("DOC2"));
        assert!(store.get("VTR2").is_none());
        assert!(store.contains_doctor_id("DOC1"));
    }

    #[test]
    fn decode_accepts_bare_array_and_envelope() {
        let mut store = VoterStore::new();
        store.push(record("VTR1", "DOC1"));

        let bare = serde_json::to_vec(store.records()).unwrap();
        assert_eq!(VoterStore::decode(&bare).unwrap().records(), store.records());

        let env = store.encode().unwrap();
        assert_eq!(VoterStore::decode(&env).unwrap().records(), store.records());
    }

    #[test]
    fn decode_rejects_unknown_version_and_garbage() {
        let env = br#"{"format_version": 9, "voters": []}"#;
        assert_eq!(
            VoterStore::decode(env).unwrap_err(),
            StoreError::UnsupportedVersion(9)
        );
        assert!(matches!(
            VoterStore::decode(b"{not json"),
            Err(StoreError::Decode(_))
        ));
    }
}
