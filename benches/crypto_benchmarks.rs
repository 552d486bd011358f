use acca::{ChameleonHash, DefaultAuthenticator, Blinding, HolderHash, Randomness, SecretKey, VerifierHash};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand_core::OsRng;

const W: Blinding = Blinding([7u8; 32]);
const CT: [u8; 8] = [0, 0, 0, 0, 0, 0, 0, 1];

fn bench_chameleon_hash(c: &mut Criterion) {
    let sk = SecretKey::generate(&mut OsRng);
    let holder = ChameleonHash::new(&sk, &W, 5).unwrap();
    let verifier = ChameleonHash::from_public_key(&holder.public_key(true).unwrap(), &W, 5).unwrap();
    let d = ChameleonHash::digest(b"bench");
    let r = Randomness([3u8; 32]);

    c.bench_function("ch_holder", |b| {
        b.iter(|| holder.ch(black_box(&d), black_box(&r), black_box(5)));
    });
    c.bench_function("ch_verifier", |b| {
        b.iter(|| verifier.ch(black_box(&d), black_box(&r), black_box(5)));
    });
    c.bench_function("collision", |b| {
        b.iter(|| holder.collision(black_box(&d), black_box(&r), 5, black_box(&d), 6));
    });
}

fn bench_digest(c: &mut Criterion) {
    let msg = vec![0xabu8; 1024];
    c.bench_function("digest_1k", |b| {
        b.iter(|| ChameleonHash::digest(black_box(&msg)));
    });
}

fn bench_authenticate(c: &mut Criterion) {
    let sk = SecretKey::generate(&mut OsRng);
    let auth = DefaultAuthenticator::new(&sk, &W, 5).unwrap();

    c.bench_function("authenticate", |b| {
        b.iter(|| auth.authenticate(black_box(&CT), black_box(b"state".as_slice()), 5));
    });
}

fn bench_verify(c: &mut Criterion) {
    let sk = SecretKey::generate(&mut OsRng);
    let auth = DefaultAuthenticator::new(&sk, &W, 5).unwrap();
    let verifier = DefaultAuthenticator::verifier(&auth.dpk(true).unwrap(), &W, 5).unwrap();
    let token = auth.authenticate(&CT, b"state", 5).unwrap();

    c.bench_function("verify", |b| {
        b.iter(|| verifier.verify(black_box(&token), black_box(&CT), black_box(b"state".as_slice()), 5));
    });
}

fn bench_extract(c: &mut Criterion) {
    let sk = SecretKey::generate(&mut OsRng);
    let auth = DefaultAuthenticator::new(&sk, &W, 5).unwrap();
    let dpk = auth.dpk(true).unwrap();
    let t1 = auth.authenticate(&CT, b"hello", 5).unwrap();
    let t2 = auth.authenticate(&CT, b"world", 5).unwrap();

    c.bench_function("extract", |b| {
        b.iter(|| {
            let mut auditor = DefaultAuthenticator::verifier(&dpk, &W, 5).unwrap();
            auditor.extract(black_box(&t1), &CT, b"hello", black_box(&t2), b"world", 5, 5)
        });
    });
}

criterion_group!(
    benches,
    bench_chameleon_hash,
    bench_digest,
    bench_authenticate,
    bench_verify,
    bench_extract
);
criterion_main!(benches);
