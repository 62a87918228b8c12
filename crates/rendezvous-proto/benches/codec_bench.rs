//! Performance benchmarks for rendezvous-proto.
//!
//! Run with: `cargo bench -p rendezvous-proto`

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand_core::OsRng;
use rendezvous_crypto::{Signer, SigningKey};
use rendezvous_proto::clock::SystemClock;
use rendezvous_proto::framing::{decode_frame, encode_frame};
use rendezvous_proto::{
    Multiaddr, PeerId, RegistrationRecord, new_discover_response_ok, seal, unseal,
};

fn addrs(n: usize) -> Vec<Multiaddr> {
    (0..n)
        .map(|i| format!("/ip4/10.0.{}.{}/tcp/60000", i / 256, i % 256).parse().unwrap())
        .collect()
}

fn bench_seal(c: &mut Criterion) {
    let key = SigningKey::generate(&mut OsRng);
    let id = PeerId::from_public_key(&key.public_key());
    let addrs = addrs(4);

    c.bench_function("seal_peer_record", |b| {
        b.iter(|| seal(black_box(&key), &SystemClock, black_box(&id), black_box(&addrs)))
    });
}

fn bench_unseal(c: &mut Criterion) {
    let key = SigningKey::generate(&mut OsRng);
    let id = PeerId::from_public_key(&key.public_key());
    let envelope = seal(&key, &SystemClock, &id, &addrs(4)).unwrap();

    c.bench_function("unseal_peer_record", |b| b.iter(|| unseal(black_box(&envelope))));
}

fn bench_discover_response(c: &mut Criterion) {
    let mut group = c.benchmark_group("discover_response");

    for count in [10, 100, 1000] {
        let records: Vec<RegistrationRecord> = (0..count)
            .map(|i| {
                let key = SigningKey::generate(&mut OsRng);
                let id = PeerId::from_public_key(&key.public_key());
                RegistrationRecord {
                    ns: "waku".to_string(),
                    peer_envelope: seal(&key, &SystemClock, &id, &addrs(2)).unwrap(),
                    ttl: i64::from(i),
                }
            })
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(count), &records, |b, records| {
            b.iter(|| {
                let response = new_discover_response_ok(black_box(records)).unwrap();
                let frame = encode_frame(&response.into()).unwrap();
                decode_frame(&frame).unwrap()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_seal, bench_unseal, bench_discover_response);
criterion_main!(benches);
