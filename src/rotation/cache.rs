//! Per-domain address cache.
//!
//! Entries live as long as the cache: no TTL, no capacity bound, no
//! eviction. Failed lookups are never stored.

use super::config::{EmptyResolution, RouterOptions};
use crate::dns::{Addrs, Name, Resolve};
use dashmap::DashMap;
use std::net::IpAddr;
use std::sync::Arc;

/// Resolved addresses per domain, filled lazily on first use.
///
/// The map guard is never held across the lookup. Two tasks missing on the
/// same domain at the same time will both look it up and the later insert
/// wins; both results are equally valid.
pub struct AddressCache {
    resolver: Arc<dyn Resolve>,
    entries: DashMap<Name, Arc<[IpAddr]>>,
    options: RouterOptions,
}

impl AddressCache {
    /// Create an empty cache over the given lookup backend.
    pub fn new(resolver: Arc<dyn Resolve>) -> Self {
        Self::with_options(resolver, RouterOptions::default())
    }

    pub fn with_options(resolver: Arc<dyn Resolve>, options: RouterOptions) -> Self {
        Self {
            resolver,
            entries: DashMap::new(),
            options,
        }
    }

    /// Addresses for `name`, looking them up on a cache miss.
    ///
    /// Never fails. A failed lookup yields an empty list for this call only,
    /// so the next call tries again.
    pub async fn resolve(&self, name: &Name) -> Arc<[IpAddr]> {
        if let Some(addrs) = self.get(name.as_str()) {
            if self.options.trace {
                tracing::debug!(domain = %name, count = addrs.len(), "address cache hit");
            }
            return addrs;
        }

        if self.options.trace {
            tracing::debug!(domain = %name, "address cache miss");
        }

        match self.resolver.resolve(name.clone()).await {
            Ok(found) => {
                let addrs = unique_ips(found);
                if addrs.is_empty() && self.options.empty_resolution == EmptyResolution::Retry {
                    if self.options.trace {
                        tracing::debug!(domain = %name, "resolved to no addresses, not caching");
                    }
                    return addrs;
                }
                if self.options.trace {
                    tracing::debug!(domain = %name, count = addrs.len(), "caching resolved addresses");
                }
                self.entries.insert(name.clone(), Arc::clone(&addrs));
                addrs
            }
            Err(e) => {
                if self.options.trace {
                    tracing::debug!(domain = %name, error = %e, "resolution failed, not caching");
                }
                Vec::<IpAddr>::new().into()
            }
        }
    }

    /// Cached addresses for `domain`, without touching the network.
    pub fn get(&self, domain: &str) -> Option<Arc<[IpAddr]>> {
        self.entries.get(domain).map(|entry| Arc::clone(entry.value()))
    }

    /// True if a lookup for `domain` has been stored.
    pub fn contains(&self, domain: &str) -> bool {
        self.entries.contains_key(domain)
    }

    /// Number of cached domains.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for AddressCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AddressCache")
            .field("domains", &self.entries.len())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Keep lookup order, drop ports and repeated IPs.
fn unique_ips(addrs: Addrs) -> Arc<[IpAddr]> {
    let mut ips: Vec<IpAddr> = Vec::new();
    for addr in addrs {
        let ip = addr.ip();
        if !ips.contains(&ip) {
            ips.push(ip);
        }
    }
    ips.into()
}
