// Criterion benchmarks for Scotch API

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use scotch_api::core::MatchDetector;
use scotch_api::models::{UserProfile, UserRef};
use scotch_api::services::{MemoryStore, RelationshipService};
use std::sync::Arc;

fn create_profile(id: i64) -> UserProfile {
    UserProfile {
        user_id: UserRef(id),
        login: format!("user{}", id),
        name: format!("User {}", id),
        age: 20 + (id % 15) as i16,
        gender: if id % 2 == 0 { "female" } else { "male" }.to_string(),
        city: "Moscow".to_string(),
        about: String::new(),
    }
}

fn bench_detector(c: &mut Criterion) {
    let detector = MatchDetector::new();

    c.bench_function("evaluate_on_like_created", |b| {
        b.iter(|| {
            detector.evaluate_on_like_created(
                black_box(UserRef(1)),
                black_box(UserRef(2)),
                black_box(true),
            )
        });
    });
}

fn bench_like_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("like_unlike_cycle");

    for population in [10i64, 100, 1000].iter() {
        let store = Arc::new(MemoryStore::with_users((1..=*population).map(create_profile)));
        let service = RelationshipService::new(store);

        group.bench_with_input(
            BenchmarkId::from_parameter(population),
            population,
            |b, &population| {
                b.iter(|| {
                    tokio_test::block_on(async {
                        let a = UserRef(1);
                        let other = UserRef(population);
                        service.like(a, other).await.unwrap();
                        service.like(other, a).await.unwrap();
                        service.unlike(a, other).await.unwrap();
                        service.unlike(other, a).await.unwrap();
                    })
                });
            },
        );
    }

    group.finish();
}

fn bench_list_matches(c: &mut Criterion) {
    let store = Arc::new(MemoryStore::with_users((1..=500).map(create_profile)));
    let service = RelationshipService::new(store);

    tokio_test::block_on(async {
        for other in 2..=500 {
            service.like(UserRef(1), UserRef(other)).await.unwrap();
            service.like(UserRef(other), UserRef(1)).await.unwrap();
        }
    });

    c.bench_function("list_matches_499", |b| {
        b.iter(|| tokio_test::block_on(service.list_matches(black_box(UserRef(1)))).unwrap());
    });
}

criterion_group!(benches, bench_detector, bench_like_cycle, bench_list_matches);
criterion_main!(benches);
