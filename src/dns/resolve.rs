//! The lookup capability consumed by the address cache.
//!
//! [`Resolve`] is the one seam between the rotation core and the network:
//! given a domain it must return every address the domain currently has,
//! not only the first.

use crate::base::neterror::NetError;
use std::{
    borrow::{Borrow, Cow},
    collections::HashMap,
    fmt,
    future::Future,
    net::SocketAddr,
    pin::Pin,
    sync::Arc,
};

/// A domain name to resolve into IP addresses.
///
/// Not validated: whatever the caller hands over is passed to the resolver
/// as-is, and a malformed name simply fails to resolve.
#[derive(Clone, Hash, Eq, PartialEq)]
pub struct Name {
    host: Box<str>,
}

impl Name {
    /// Creates a new [`Name`] from any string-like type.
    #[inline]
    pub fn new(host: impl Into<Box<str>>) -> Self {
        Self { host: host.into() }
    }

    /// View the hostname as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.host
    }
}

impl From<&str> for Name {
    fn from(value: &str) -> Self {
        Name::new(value)
    }
}

impl From<String> for Name {
    fn from(value: String) -> Self {
        Name::new(value)
    }
}

impl From<&Name> for Name {
    fn from(value: &Name) -> Self {
        value.clone()
    }
}

// Lets maps keyed by `Name` be queried with a plain `&str`.
impl Borrow<str> for Name {
    fn borrow(&self) -> &str {
        &self.host
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.host, f)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.host, f)
    }
}

/// Alias for an `Iterator` trait object over `SocketAddr`.
pub type Addrs = Box<dyn Iterator<Item = SocketAddr> + Send>;

/// Alias for the `Future` type returned by a DNS resolver.
pub type Resolving = Pin<Box<dyn Future<Output = Result<Addrs, NetError>> + Send>>;

/// Looks up all addresses of a domain.
///
/// Implementations must be thread-safe; one resolver is shared by every
/// task that goes through a router.
///
/// - Ports on the returned addresses are meaningless (normally 0).
/// - The order of the returned addresses is the rotation order.
/// - `Ok` with zero addresses is allowed and means "resolved, no records".
pub trait Resolve: Send + Sync {
    /// Resolves a domain name to all of its IP addresses.
    fn resolve(&self, name: Name) -> Resolving;
}

/// Blanket implementation for Arc-wrapped resolvers.
impl<R: Resolve + ?Sized> Resolve for Arc<R> {
    fn resolve(&self, name: Name) -> Resolving {
        (**self).resolve(name)
    }
}

/// Resolver wrapper with a static hostname table.
///
/// Names present in the table never reach the inner resolver. Handy for
/// pinning a domain to a known set of backends, or for tests.
///
/// ```rust,ignore
/// use rotanet::dns::{DnsResolverWithOverrides, HickoryResolver};
/// use std::collections::HashMap;
///
/// let mut overrides = HashMap::new();
/// overrides.insert(
///     "api.internal".into(),
///     vec!["10.0.0.1:0".parse()?, "10.0.0.2:0".parse()?],
/// );
///
/// let resolver = DnsResolverWithOverrides::new(Arc::new(HickoryResolver::new()), overrides);
/// ```
pub struct DnsResolverWithOverrides {
    inner: Arc<dyn Resolve>,
    overrides: Arc<HashMap<Cow<'static, str>, Vec<SocketAddr>>>,
    trace: bool,
}

impl DnsResolverWithOverrides {
    /// Creates a new resolver with the given overrides.
    ///
    /// Hostnames match case-insensitively.
    pub fn new(
        inner: Arc<dyn Resolve>,
        overrides: HashMap<Cow<'static, str>, Vec<SocketAddr>>,
    ) -> Self {
        let overrides = overrides
            .into_iter()
            .map(|(host, addrs)| (Cow::Owned(host.to_ascii_lowercase()), addrs))
            .collect();
        Self {
            inner,
            overrides: Arc::new(overrides),
            trace: false,
        }
    }

    /// Emit a debug event for every override hit.
    pub fn with_trace(mut self, enabled: bool) -> Self {
        self.trace = enabled;
        self
    }

    /// Returns the number of configured overrides.
    pub fn override_count(&self) -> usize {
        self.overrides.len()
    }
}

impl Resolve for DnsResolverWithOverrides {
    fn resolve(&self, name: Name) -> Resolving {
        let key = name.as_str().to_ascii_lowercase();
        if let Some(addrs) = self.overrides.get(key.as_str()) {
            if self.trace {
                tracing::debug!(domain = %name, count = addrs.len(), "dns override hit");
            }
            let addrs: Addrs = Box::new(addrs.clone().into_iter());
            return Box::pin(std::future::ready(Ok(addrs)));
        }
        self.inner.resolve(name)
    }
}

impl fmt::Debug for DnsResolverWithOverrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DnsResolverWithOverrides")
            .field("override_count", &self.overrides.len())
            .finish_non_exhaustive()
    }
}
