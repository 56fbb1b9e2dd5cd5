//! The router: address cache plus rotation behind one call.

use super::cache::AddressCache;
use super::config::{EmptyResolution, RouterConfig, RouterOptions};
use super::selector::RotationSelector;
use crate::dns::{Name, Resolve};
use std::borrow::Cow;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

/// Spreads requests for a domain over every address it resolves to.
///
/// Each router owns its own cache and cursors; nothing is global. Share one
/// instance behind an `Arc` to get a single rotation per domain across all
/// callers, or create a fresh one for isolated state (tests).
///
/// # Example
///
/// ```rust,ignore
/// use rotanet::rotation::RoundRobinRouter;
///
/// let router = RoundRobinRouter::new();
/// if let Some(ip) = router.resolve_next("example.com").await {
///     println!("connect to {ip}, Host: example.com");
/// }
/// ```
pub struct RoundRobinRouter {
    cache: AddressCache,
    selector: RotationSelector,
    options: RouterOptions,
}

impl RoundRobinRouter {
    /// Router over the default hickory-dns resolver.
    pub fn new() -> Self {
        Self::with_config(RouterConfig::default())
    }

    /// Router over a custom lookup backend with default options.
    pub fn with_resolver(resolver: Arc<dyn Resolve>) -> Self {
        Self::with_config(RouterConfig {
            resolver: Some(resolver),
            ..RouterConfig::default()
        })
    }

    pub fn with_config(config: RouterConfig) -> Self {
        let resolver = config.build_resolver();
        Self {
            cache: AddressCache::with_options(resolver, config.options),
            selector: RotationSelector::new(),
            options: config.options,
        }
    }

    pub fn builder() -> RouterBuilder {
        RouterBuilder::default()
    }

    /// Next address to send a request for `domain` to.
    ///
    /// `None` means no rewrite should happen: the lookup failed or the
    /// domain has no addresses. Never errors.
    pub async fn resolve_next(&self, domain: impl Into<Name>) -> Option<IpAddr> {
        let name = domain.into();
        let addrs = self.cache.resolve(&name).await;
        let picked = self.selector.next(&name, &addrs);

        if self.options.trace {
            match picked {
                Some(ip) => tracing::debug!(domain = %name, address = %ip, "selected address"),
                None => tracing::debug!(domain = %name, "no address available"),
            }
        }
        picked
    }

    /// The address cache.
    pub fn cache(&self) -> &AddressCache {
        &self.cache
    }

    /// The rotation cursors.
    pub fn selector(&self) -> &RotationSelector {
        &self.selector
    }

    pub fn options(&self) -> RouterOptions {
        self.options
    }
}

impl Default for RoundRobinRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RoundRobinRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoundRobinRouter")
            .field("cached_domains", &self.cache.len())
            .field("rotating_domains", &self.selector.len())
            .field("options", &self.options)
            .finish()
    }
}

/// Builder for a [`RoundRobinRouter`].
#[derive(Default, Debug)]
pub struct RouterBuilder {
    config: RouterConfig,
}

impl RouterBuilder {
    /// Use a custom lookup backend.
    pub fn resolver<R: Resolve + 'static>(mut self, resolver: R) -> Self {
        self.config.resolver = Some(Arc::new(resolver));
        self
    }

    /// Use an already shared lookup backend.
    pub fn shared_resolver(mut self, resolver: Arc<dyn Resolve>) -> Self {
        self.config.resolver = Some(resolver);
        self
    }

    /// Answer `host` from a fixed address list instead of DNS.
    pub fn dns_override<I>(mut self, host: impl Into<Cow<'static, str>>, addrs: I) -> Self
    where
        I: IntoIterator<Item = IpAddr>,
    {
        let addrs = addrs.into_iter().map(|ip| SocketAddr::new(ip, 0)).collect();
        self.config.dns_overrides.insert(host.into(), addrs);
        self
    }

    /// Toggle diagnostic tracing.
    pub fn trace(mut self, enabled: bool) -> Self {
        self.config.options.trace = enabled;
        self
    }

    pub fn empty_resolution(mut self, policy: EmptyResolution) -> Self {
        self.config.options.empty_resolution = policy;
        self
    }

    /// Replace all serializable options at once.
    pub fn options(mut self, options: RouterOptions) -> Self {
        self.config.options = options;
        self
    }

    pub fn build(self) -> RoundRobinRouter {
        RoundRobinRouter::with_config(self.config)
    }
}
