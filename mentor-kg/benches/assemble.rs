//! Context-pack assembly benchmarks
//!
//! Run with: cargo bench --bench assemble
//!
//! - assemble/cold: every call misses the cache (graph version bumped per call)
//! - assemble/hot: repeated key served from the cache
//! - cache/get_hit, cache/set: raw cache operations

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use mentor_kg::{
    Concept, ContextPackAssembler, Edge, GraphStore, GraphVersion, MemoryGraphStore, QueryCache,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;

/// Layered prerequisite graph: each node depends on `fanout` nodes one layer down
fn layered_graph(rt: &Runtime, layers: usize, fanout: usize) -> Arc<MemoryGraphStore> {
    let store = Arc::new(MemoryGraphStore::new());
    rt.block_on(async {
        for layer in 0..layers {
            for i in 0..fanout {
                let id = format!("c{}_{}", layer, i);
                store
                    .create_concept(Concept::new(id.clone(), id, "bench concept"))
                    .await
                    .unwrap();
            }
        }
        store
            .create_concept(Concept::new("root", "Root", ""))
            .await
            .unwrap();

        for i in 0..fanout {
            store
                .create_edge(Edge::prerequisite("root", format!("c0_{}", i)))
                .await
                .unwrap();
        }
        for layer in 0..layers.saturating_sub(1) {
            for i in 0..fanout {
                for j in 0..fanout {
                    store
                        .create_edge(Edge::prerequisite(
                            format!("c{}_{}", layer, i),
                            format!("c{}_{}", layer + 1, j),
                        ))
                        .await
                        .unwrap();
                }
            }
        }
    });
    store
}

fn assemble_benchmarks(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("assemble");

    for budget in [10usize, 50, 200] {
        let store = layered_graph(&rt, 8, 8);
        let version = Arc::new(GraphVersion::new());
        let assembler = ContextPackAssembler::new(
            store,
            Arc::new(QueryCache::with_ttl(Duration::from_secs(30))),
            Arc::clone(&version),
        );

        group.throughput(Throughput::Elements(budget as u64));

        group.bench_with_input(BenchmarkId::new("cold", budget), &budget, |b, &budget| {
            b.to_async(&rt).iter(|| async {
                version.bump();
                assembler.assemble("root", budget).await.unwrap()
            });
        });

        group.bench_with_input(BenchmarkId::new("hot", budget), &budget, |b, &budget| {
            b.to_async(&rt)
                .iter(|| async { assembler.assemble("root", budget).await.unwrap() });
        });
    }

    group.finish();
}

fn cache_benchmarks(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("cache");
    let cache: QueryCache<String> = QueryCache::with_ttl(Duration::from_secs(300));

    rt.block_on(async {
        for i in 0..1000 {
            cache.insert(format!("key_{}", i), format!("value_{}", i)).await;
        }
    });

    group.bench_function("get_hit", |b| {
        b.to_async(&rt).iter(|| async { cache.get("key_500").await });
    });

    group.bench_function("set", |b| {
        b.to_async(&rt).iter(|| async {
            cache
                .set("bench", "value".to_string(), Duration::from_secs(30))
                .await
        });
    });

    group.finish();
}

criterion_group!(benches, assemble_benchmarks, cache_benchmarks);
criterion_main!(benches);
