//! System DNS resolver using getaddrinfo.
//!
//! Respects the host's resolver configuration (`/etc/hosts`, nsswitch,
//! `resolv.conf`). The blocking call runs on tokio's blocking pool.

use super::{Addrs, Name, Resolve, Resolving};
use crate::base::context::IoResultExt;
use crate::base::neterror::NetError;
use std::{io, net::ToSocketAddrs};

/// System DNS resolver using `getaddrinfo` in a thread pool.
///
/// Each lookup occupies one blocking thread for its duration. Prefer
/// [`HickoryResolver`](super::HickoryResolver) under heavy fan-out.
#[derive(Clone, Debug, Default)]
pub struct GaiResolver;

impl GaiResolver {
    /// Creates a new `GaiResolver`.
    pub fn new() -> Self {
        Self
    }
}

impl Resolve for GaiResolver {
    fn resolve(&self, name: Name) -> Resolving {
        Box::pin(async move {
            let host = name.as_str().to_string();

            let result = tokio::task::spawn_blocking(move || {
                tracing::debug!(host = %host, "resolving via getaddrinfo");
                (host.as_str(), 0u16)
                    .to_socket_addrs()
                    .map(|iter| iter.collect::<Vec<_>>())
            })
            .await;

            let addrs = result
                .map_err(|e| {
                    tracing::error!(error = %e, "DNS resolution task failed");
                    NetError::NameResolutionFailed
                })?
                .dns_context(name.as_str())?;

            if addrs.is_empty() {
                return Err(NetError::dns_failed(
                    name.as_str(),
                    io::Error::new(io::ErrorKind::NotFound, "No addresses returned by getaddrinfo"),
                ));
            }

            tracing::debug!(domain = %name, count = addrs.len(), "getaddrinfo resolution complete");
            Ok(Box::new(addrs.into_iter()) as Addrs)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_gai_resolver_localhost() {
        let resolver = GaiResolver::new();
        let addrs: Vec<_> = resolver
            .resolve(Name::new("localhost"))
            .await
            .expect("localhost resolves via /etc/hosts")
            .collect();

        assert!(!addrs.is_empty());
        assert!(addrs.iter().all(|a| a.ip().is_loopback()));
    }

    #[tokio::test]
    async fn test_gai_resolver_ip_literal() {
        let resolver = GaiResolver::new();
        let addrs: Vec<_> = resolver
            .resolve(Name::new("192.0.2.7"))
            .await
            .unwrap()
            .collect();

        assert_eq!(addrs.len(), 1);
        assert_eq!(addrs[0].ip().to_string(), "192.0.2.7");
    }

    #[tokio::test]
    async fn test_gai_resolver_invalid_domain() {
        let resolver = GaiResolver::new();
        let err = resolver
            .resolve(Name::new("no-such-host.invalid"))
            .await
            .err()
            .expect(".invalid never resolves");

        assert!(err.is_name_resolution());
    }
}
