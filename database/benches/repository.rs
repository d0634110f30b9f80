use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use database::{
    database::{options::RepositoryOptions, repository::PersonRepository},
    model::person::{Address, Person},
    persistence::storage::memory::MemoryStore,
};
use std::sync::Arc;
use tokio::runtime::Runtime;
use uuid::Uuid;

const COLLECTION_SIZES: [usize; 3] = [100, 1_000, 10_000];

fn memory_repository() -> PersonRepository {
    PersonRepository::new(Arc::new(MemoryStore::default()), RepositoryOptions::default())
}

fn test_person(dni: &str) -> Person {
    Person::new(dni, Some("Nahuel"), Some("Avalos"))
        .with_address(Address::new("Avenida Siempreviva", "742"))
}

pub fn repository_create_benchmark(c: &mut Criterion) {
    let runtime = Runtime::new().expect("should build a tokio runtime");
    let repository = memory_repository();
    let repository = &repository;

    c.bench_function("repository_create", |b| {
        b.to_async(&runtime).iter(|| async move {
            repository
                .create(test_person(&Uuid::new_v4().to_string()))
                .await
                .expect("memory store should not fail")
        })
    });
}

/// Lookups scan the collection, so cost grows with its size
pub fn repository_find_by_dni_benchmark(c: &mut Criterion) {
    let runtime = Runtime::new().expect("should build a tokio runtime");
    let mut group = c.benchmark_group("repository_find_by_dni");

    for size in COLLECTION_SIZES.iter() {
        let repository = memory_repository();

        runtime.block_on(async {
            for i in 0..*size {
                repository
                    .create(test_person(&i.to_string()))
                    .await
                    .expect("memory store should not fail");
            }
        });

        let last_dni = (size - 1).to_string();
        let repository = &repository;
        let last_dni = last_dni.as_str();

        group.throughput(Throughput::Elements(*size as u64));

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.to_async(&runtime).iter(|| async move {
                repository
                    .find_by_dni(last_dni)
                    .await
                    .expect("should be stored")
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    repository_create_benchmark,
    repository_find_by_dni_benchmark
);
criterion_main!(benches);
