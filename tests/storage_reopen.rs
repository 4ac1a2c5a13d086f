use tempfile::TempDir;

use voterlog::{
    config::PortalConfig,
    persist::{KvStorage, file::FileKvStorage, sqlite::SqliteKvStorage},
    registry::{LoadReport, Registry},
    voter::VoterDraft,
};

fn draft(doctor_id: &str) -> VoterDraft {
    VoterDraft {
        first_name: "Chinua".to_string(),
        last_name: "Achebe".to_string(),
        other_names: "Albert".to_string(),
        dob: "1960-11-16".to_string(),
        sex: "M".to_string(),
        marital_status: "Married".to_string(),
        lga: "Ogidi".to_string(),
        doctor_id: doctor_id.to_string(),
    }
}

fn fill(registry: &mut Registry) {
    for i in 0..5 {
        registry
            .register(draft(&format!("DOC{i}")))
            .expect("register");
    }
}

#[test]
fn sqlite_registry_reloads_in_order() {
    let tmp = TempDir::new().expect("tmp");
    let db_path = tmp.path().join("voters.db");

    let storage = SqliteKvStorage::open(&db_path).expect("open sqlite");
    let mut registry = Registry::initialize(Box::new(storage), PortalConfig::default());
    fill(&mut registry);
    let before = registry.list().to_vec();
    drop(registry);

    let reopened = SqliteKvStorage::open(&db_path).expect("reopen");
    let registry = Registry::initialize(Box::new(reopened), PortalConfig::default());
    assert_eq!(registry.load_report(), &LoadReport::Loaded { records: 5 });
    assert_eq!(registry.list(), before.as_slice());
}

#[test]
fn file_registry_reloads_and_blob_is_enveloped() {
    let tmp = TempDir::new().expect("tmp");

    let storage = FileKvStorage::open(tmp.path()).expect("open dir");
    let mut registry = Registry::initialize(Box::new(storage), PortalConfig::default());
    fill(&mut registry);
    let before = registry.list().to_vec();
    drop(registry);

    let reopened = FileKvStorage::open(tmp.path()).expect("reopen");
    let raw = reopened.get("voters").expect("get").expect("blob");
    let value: serde_json::Value = serde_json::from_slice(&raw).expect("json");
    assert_eq!(value["format_version"], 1);
    assert_eq!(value["voters"].as_array().map(Vec::len), Some(5));

    let registry = Registry::initialize(Box::new(reopened), PortalConfig::default());
    assert_eq!(registry.list(), before.as_slice());
}

#[test]
fn custom_storage_key_is_isolated() {
    let tmp = TempDir::new().expect("tmp");
    let db_path = tmp.path().join("shared.db");
    let cfg = PortalConfig {
        storage_key: "voters-ward-7".to_string(),
        ..PortalConfig::default()
    };

    let mut registry = Registry::initialize(
        Box::new(SqliteKvStorage::open(&db_path).expect("open")),
        cfg.clone(),
    );
    fill(&mut registry);
    drop(registry);

    let default_key = Registry::initialize(
        Box::new(SqliteKvStorage::open(&db_path).expect("open")),
        PortalConfig::default(),
    );
    assert_eq!(default_key.load_report(), &LoadReport::Empty);

    let same_key = Registry::initialize(
        Box::new(SqliteKvStorage::open(&db_path).expect("open")),
        cfg,
    );
    assert_eq!(same_key.len(), 5);
}
