//! Round-robin router tests
//!
//! Covers:
//! - cyclic order over the resolved list
//! - one lookup per domain on the success path (including empty results)
//! - failures retried on every call
//! - per-domain independence
//! - distinct slots under concurrent callers

use rotanet::base::neterror::NetError;
use rotanet::dns::{Addrs, Name, Resolve, Resolving};
use rotanet::rotation::{EmptyResolution, RoundRobinRouter, RouterOptions};

use std::collections::HashMap;
use std::io;
use std::net::{IpAddr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Answers from a fixed table; names missing from it fail like NXDOMAIN.
#[derive(Default)]
struct MockResolver {
    table: HashMap<String, Vec<SocketAddr>>,
    calls: AtomicUsize,
}

impl MockResolver {
    fn with(mut self, domain: &str, addrs: &[&str]) -> Self {
        let addrs = addrs
            .iter()
            .map(|a| SocketAddr::new(a.parse().unwrap(), 0))
            .collect();
        self.table.insert(domain.to_string(), addrs);
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Resolve for MockResolver {
    fn resolve(&self, name: Name) -> Resolving {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let found = self.table.get(name.as_str()).cloned();
        Box::pin(async move {
            match found {
                Some(addrs) => Ok(Box::new(addrs.into_iter()) as Addrs),
                None => Err(NetError::dns_failed(
                    name.as_str(),
                    io::Error::new(io::ErrorKind::NotFound, "NXDOMAIN"),
                )),
            }
        })
    }
}

fn ip(s: &str) -> IpAddr {
    s.parse().unwrap()
}

fn router_over(mock: &Arc<MockResolver>) -> RoundRobinRouter {
    RoundRobinRouter::with_resolver(mock.clone())
}

#[tokio::test]
async fn test_two_addresses_alternate() {
    let mock = Arc::new(MockResolver::default().with("example.com", &["1.1.1.1", "2.2.2.2"]));
    let router = router_over(&mock);

    let mut picked = Vec::new();
    for _ in 0..4 {
        picked.push(router.resolve_next("example.com").await);
    }

    assert_eq!(
        picked,
        vec![
            Some(ip("1.1.1.1")),
            Some(ip("2.2.2.2")),
            Some(ip("1.1.1.1")),
            Some(ip("2.2.2.2")),
        ]
    );
    assert_eq!(mock.calls(), 1);
}

#[tokio::test]
async fn test_full_cycle_then_wraps() {
    let list = ["10.0.0.1", "10.0.0.2", "2001:db8::1", "10.0.0.4", "2001:db8::2"];
    let mock = Arc::new(MockResolver::default().with("pool.test", &list));
    let router = router_over(&mock);

    for expected in list {
        assert_eq!(router.resolve_next("pool.test").await, Some(ip(expected)));
    }
    assert_eq!(router.resolve_next("pool.test").await, Some(ip(list[0])));
    assert_eq!(mock.calls(), 1);
}

#[tokio::test]
async fn test_failed_lookup_retried_every_call() {
    let mock = Arc::new(MockResolver::default());
    let router = router_over(&mock);

    assert_eq!(router.resolve_next("bad.invalid").await, None);
    assert_eq!(router.resolve_next("bad.invalid").await, None);

    assert_eq!(mock.calls(), 2);
    assert!(!router.cache().contains("bad.invalid"));
}

#[tokio::test]
async fn test_empty_lookup_cached_as_no_address() {
    let mock = Arc::new(MockResolver::default().with("norecords.test", &[]));
    let router = router_over(&mock);

    for _ in 0..3 {
        assert_eq!(router.resolve_next("norecords.test").await, None);
    }
    assert_eq!(mock.calls(), 1);
    assert_eq!(router.selector().cursor("norecords.test"), 0);
}

#[tokio::test]
async fn test_empty_lookup_retried_under_retry_policy() {
    let mock = Arc::new(MockResolver::default().with("norecords.test", &[]));
    let router = RoundRobinRouter::builder()
        .shared_resolver(mock.clone())
        .options(RouterOptions {
            empty_resolution: EmptyResolution::Retry,
            ..RouterOptions::default()
        })
        .build();

    for _ in 0..3 {
        assert_eq!(router.resolve_next("norecords.test").await, None);
    }
    assert_eq!(mock.calls(), 3);
}

#[tokio::test]
async fn test_domains_do_not_share_cursors() {
    let mock = Arc::new(
        MockResolver::default()
            .with("a.test", &["1.0.0.1", "1.0.0.2"])
            .with("b.test", &["2.0.0.1", "2.0.0.2", "2.0.0.3"]),
    );
    let router = router_over(&mock);

    assert_eq!(router.resolve_next("a.test").await, Some(ip("1.0.0.1")));
    assert_eq!(router.resolve_next("b.test").await, Some(ip("2.0.0.1")));
    assert_eq!(router.resolve_next("b.test").await, Some(ip("2.0.0.2")));
    assert_eq!(router.resolve_next("a.test").await, Some(ip("1.0.0.2")));
    assert_eq!(router.resolve_next("b.test").await, Some(ip("2.0.0.3")));
    assert_eq!(router.resolve_next("a.test").await, Some(ip("1.0.0.1")));
    assert_eq!(router.resolve_next("b.test").await, Some(ip("2.0.0.1")));

    assert_eq!(mock.calls(), 2);
}

#[tokio::test]
async fn test_separate_routers_are_isolated() {
    let mock = Arc::new(MockResolver::default().with("example.com", &["1.1.1.1", "2.2.2.2"]));
    let first = router_over(&mock);
    let second = router_over(&mock);

    assert_eq!(first.resolve_next("example.com").await, Some(ip("1.1.1.1")));
    assert_eq!(second.resolve_next("example.com").await, Some(ip("1.1.1.1")));
    assert_eq!(mock.calls(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_callers_get_fair_share() {
    let mock = Arc::new(
        MockResolver::default().with("busy.test", &["10.0.0.1", "10.0.0.2", "10.0.0.3", "10.0.0.4"]),
    );
    let router = Arc::new(router_over(&mock));

    // Warm the cache so no caller races the first lookup.
    assert!(router.resolve_next("busy.test").await.is_some());
    assert!(router.resolve_next("busy.test").await.is_some());
    assert!(router.resolve_next("busy.test").await.is_some());
    assert!(router.resolve_next("busy.test").await.is_some());

    let tasks: Vec<_> = (0..400)
        .map(|_| {
            let router = Arc::clone(&router);
            tokio::spawn(async move { router.resolve_next("busy.test").await })
        })
        .collect();

    let mut counts: HashMap<IpAddr, usize> = HashMap::new();
    for result in futures::future::join_all(tasks).await {
        let picked = result.expect("task panicked").expect("address available");
        *counts.entry(picked).or_default() += 1;
    }

    assert_eq!(counts.len(), 4);
    assert!(counts.values().all(|&n| n == 100), "uneven split: {counts:?}");
    assert_eq!(mock.calls(), 1);
    assert_eq!(router.selector().cursor("busy.test"), 0);
}

#[tokio::test]
async fn test_concurrent_first_lookups_settle_on_one_entry() {
    let mock = Arc::new(MockResolver::default().with("cold.test", &["10.0.0.1", "10.0.0.2"]));
    let router = Arc::new(router_over(&mock));

    let picks = futures::future::join_all((0..8).map(|_| router.resolve_next("cold.test"))).await;

    assert!(picks.iter().all(|p| p.is_some()));
    assert!(mock.calls() >= 1);
    assert_eq!(router.cache().len(), 1);

    let calls = mock.calls();
    router.resolve_next("cold.test").await;
    assert_eq!(mock.calls(), calls);
}
