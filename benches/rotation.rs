use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rotanet::dns::{Name, Resolve, Resolving};
use rotanet::rotation::{RotationSelector, RoundRobinRouter};
use rotanet::NetError;
use std::net::IpAddr;
use tokio::runtime::Runtime;

struct NoDns;

impl Resolve for NoDns {
    fn resolve(&self, _name: Name) -> Resolving {
        Box::pin(async { Err(NetError::NameNotResolved) })
    }
}

/// Cursor advance alone, no cache involved.
fn bench_selector(c: &mut Criterion) {
    let selector = RotationSelector::new();
    let name = Name::new("example.com");
    let addrs: Vec<IpAddr> = (1..=8).map(|i| IpAddr::from([10, 0, 0, i])).collect();

    c.bench_function("selector_next", |b| {
        b.iter(|| black_box(selector.next(&name, &addrs)))
    });
}

/// Cached path through the router: map hit plus cursor advance.
fn bench_router_cached(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let router = RoundRobinRouter::builder()
        .resolver(NoDns)
        .dns_override("example.com", (1..=8).map(|i| IpAddr::from([10, 0, 0, i])))
        .build();
    rt.block_on(router.resolve_next("example.com"));

    c.bench_function("router_resolve_next_cached", |b| {
        b.to_async(&rt)
            .iter(|| async { black_box(router.resolve_next("example.com").await) })
    });

    // Failures are never cached, so this measures the miss path.
    c.bench_function("router_resolve_next_failing", |b| {
        b.to_async(&rt)
            .iter(|| async { black_box(router.resolve_next("bad.invalid").await) })
    });
}

criterion_group!(benches, bench_selector, bench_router_cached);
criterion_main!(benches);
