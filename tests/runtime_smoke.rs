use std::time::Duration;

use voterlog::{
    config::PortalConfig,
    persist::memory::MemoryKvStorage,
    registry::{Registry, RegistryError},
    runtime::{
        events::RegistryEvent,
        handle::{RuntimeConfig, RuntimeError, spawn_registry},
    },
    voter::{VoterDraft, VoterRecord},
};

fn draft(doctor_id: &str) -> VoterDraft {
    VoterDraft {
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        dob: "1990-01-01".to_string(),
        sex: "F".to_string(),
        marital_status: "Single".to_string(),
        lga: "Ikeja".to_string(),
        doctor_id: doctor_id.to_string(),
        ..VoterDraft::default()
    }
}

fn registry() -> Registry {
    Registry::initialize(Box::new(MemoryKvStorage::new()), PortalConfig::default())
}

#[tokio::test]
async fn runtime_register_list_export_and_events_ordered() {
    let handle = spawn_registry(registry(), RuntimeConfig::default());
    let mut sub = handle.subscribe();

    let rec = handle.register(draft("DOC1")).await.expect("register");
    let err = handle.register(draft("DOC1")).await.unwrap_err();
    assert!(matches!(err, RuntimeError::Registry(RegistryError::Validation(_))));

    assert_eq!(handle.len().await.expect("len"), 1);
    let listed = handle.list().await.expect("list");
    assert_eq!(listed, vec![rec.clone()]);

    let bytes = handle.export_snapshot().await.expect("export");
    let exported: Vec<VoterRecord> = serde_json::from_slice(&bytes).expect("decode");
    assert_eq!(exported, listed);

    let mut seen = Vec::new();
    for _ in 0..3 {
        let evt = tokio::time::timeout(Duration::from_secs(1), sub.recv())
            .await
            .expect("event")
            .expect("recv");
        seen.push(evt);
    }
    assert_eq!(
        seen,
        vec![
            RegistryEvent::Registered {
                voter_id: rec.voter_id.clone()
            },
            RegistryEvent::Rejected { errors: 1 },
            RegistryEvent::Exported { records: 1 },
        ]
    );

    handle.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn concurrent_duplicate_submissions_admit_exactly_one() {
    let handle = spawn_registry(registry(), RuntimeConfig::default());

    let mut tasks = Vec::new();
    for _ in 0..8 {
        let h = handle.clone();
        tasks.push(tokio::spawn(async move { h.register(draft("DOC1")).await }));
    }

    let mut ok = 0;
    for task in tasks {
        if task.await.expect("join").is_ok() {
            ok += 1;
        }
    }
    assert_eq!(ok, 1);
    assert_eq!(handle.len().await.expect("len"), 1);

    let validation = handle.validate(draft("DOC1")).await.expect("validate");
    assert_eq!(validation.len(), 1);

    handle.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn calls_after_shutdown_report_closed_channel() {
    let handle = spawn_registry(registry(), RuntimeConfig::default());
    handle.shutdown().await.expect("shutdown");
    tokio::time::sleep(Duration::from_millis(20)).await;

    let err = handle.len().await.unwrap_err();
    assert!(matches!(err, RuntimeError::ChannelClosed));
}
