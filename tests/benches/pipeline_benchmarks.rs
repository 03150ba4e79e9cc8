//! # Responder Pipeline Benchmarks
//!
//! | Operation | Why it matters |
//! |-----------|----------------|
//! | Hybrid seal | Runs once per accepted response |
//! | Symmetric open | Encrypted configs and invite images |
//! | Event validation | Runs on every request, including rejected ones |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use response_ingest::{DeploymentMode, EventValidator, IngestConfig};
use rsa::pkcs8::EncodePublicKey;
use rsa::RsaPrivateKey;
use serde_json::{json, Value};
use shared_crypto::{ResponsePublicKey, SymmetricKey};
use shared_types::{RawEvent, ResponseType};

fn bench_hybrid_seal(c: &mut Criterion) {
    let mut group = c.benchmark_group("hybrid-seal");

    let private = RsaPrivateKey::new(&mut rand::rngs::OsRng, 2048).unwrap();
    let der = private.to_public_key().to_public_key_der().unwrap();
    let public = ResponsePublicKey::from_der(der.as_bytes()).unwrap();

    for size in [256usize, 4 * 1024, 64 * 1024] {
        let payload = vec![0x5Au8; size];
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &payload, |b, payload| {
            b.iter(|| public.seal(black_box(payload)).unwrap())
        });
    }
    group.finish();
}

fn bench_symmetric_open(c: &mut Criterion) {
    let key = SymmetricKey::generate();
    let sealed = key.seal(&vec![0u8; 32 * 1024]).unwrap();

    c.bench_function("symmetric-open-32k", |b| {
        b.iter(|| key.open(black_box(&sealed)).unwrap())
    });
}

fn raw(value: Value) -> RawEvent {
    match value {
        Value::Object(map) => map,
        _ => unreachable!(),
    }
}

fn bench_event_validation(c: &mut Criterion) {
    let validator = EventValidator::new(&IngestConfig::new(DeploymentMode::self_hosted_s3(
        "bench", "us-east-1",
    )));
    let reaction = raw(json!({"encrypted": "e", "content": "thumbs-up"}));
    let read = raw(json!({"encrypted": "e", "copy_id": "copy-1", "has_max_reads": true}));
    let invalid = raw(json!({"encrypted": "e", "content": "not a reaction!"}));

    let mut group = c.benchmark_group("event-validation");
    group.bench_function("reaction", |b| {
        b.iter(|| validator.validate(ResponseType::Reaction, black_box(&reaction)))
    });
    group.bench_function("read", |b| {
        b.iter(|| validator.validate(ResponseType::Read, black_box(&read)))
    });
    group.bench_function("rejected-reaction", |b| {
        b.iter(|| validator.validate(ResponseType::Reaction, black_box(&invalid)))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_hybrid_seal,
    bench_symmetric_open,
    bench_event_validation
);
criterion_main!(benches);
