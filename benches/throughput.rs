use criterion::{Criterion, criterion_group, criterion_main};

use voterlog::{
    codec::VoterIdCodec,
    config::PortalConfig,
    persist::memory::MemoryKvStorage,
    registry::Registry,
    voter::VoterDraft,
};

fn draft(doctor_id: String) -> VoterDraft {
    VoterDraft {
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        other_names: String::new(),
        dob: "1990-01-01".to_string(),
        sex: "F".to_string(),
        marital_status: "Single".to_string(),
        lga: "Ikeja".to_string(),
        doctor_id,
    }
}

fn bench_register(c: &mut Criterion) {
    c.bench_function("registry_register_500", |b| {
        b.iter(|| {
            let mut registry =
                Registry::initialize(Box::new(MemoryKvStorage::new()), PortalConfig::default());
            for i in 0..500u32 {
                let _ = registry
                    .register(draft(format!("DOC{i}")))
                    .expect("register");
            }
        });
    });
}

fn bench_mask(c: &mut Criterion) {
    let codec = VoterIdCodec::default();
    let ids: Vec<String> = (0..1_000u64)
        .map(|i| codec.compose(1_748_779_200_000 + i, (i % 10_000) as u32))
        .collect();

    c.bench_function("codec_mask_1k", |b| {
        b.iter(|| {
            for id in &ids {
                let _ = VoterIdCodec::mask(Some(id.as_str()));
            }
        });
    });
}

criterion_group!(benches, bench_register, bench_mask);
criterion_main!(benches);
