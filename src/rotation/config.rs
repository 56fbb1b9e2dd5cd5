//! Router configuration.
//!
//! [`RouterOptions`] is the serializable part (what an application would put
//! in its own config file). [`RouterConfig`] adds the programmatic pieces:
//! the lookup backend and static DNS overrides.

use crate::dns::{DnsResolverWithOverrides, HickoryResolver, Resolve};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

/// What to do with a lookup that succeeds but returns no addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyResolution {
    /// Store the empty list; the domain answers "no address" for the rest
    /// of the router's lifetime without further lookups.
    #[default]
    Cache,
    /// Treat it like a failed lookup: nothing is stored and the next call
    /// looks the domain up again.
    Retry,
}

/// Serializable router options.
///
/// ```
/// use rotanet::rotation::{EmptyResolution, RouterOptions};
///
/// let opts: RouterOptions = serde_json::from_str(r#"{ "trace": true }"#).unwrap();
/// assert!(opts.trace);
/// assert_eq!(opts.empty_resolution, EmptyResolution::Cache);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RouterOptions {
    /// Emit `tracing` debug events for cache hits, misses, failures and
    /// for every selected address.
    pub trace: bool,

    /// Policy for successful lookups with zero records.
    pub empty_resolution: EmptyResolution,
}

/// Full configuration for a [`RoundRobinRouter`](super::RoundRobinRouter).
#[derive(Clone, Default)]
pub struct RouterConfig {
    /// Serializable options.
    pub options: RouterOptions,

    /// Custom lookup backend (None = use HickoryResolver).
    pub resolver: Option<Arc<dyn Resolve>>,

    /// DNS hostname overrides (hostname -> addresses).
    pub dns_overrides: HashMap<Cow<'static, str>, Vec<SocketAddr>>,
}

impl RouterConfig {
    /// Config with the given options and default everything else.
    pub fn with_options(options: RouterOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// The lookup backend described by this config.
    pub(crate) fn build_resolver(&self) -> Arc<dyn Resolve> {
        let base: Arc<dyn Resolve> = self
            .resolver
            .clone()
            .unwrap_or_else(|| Arc::new(HickoryResolver::new()));

        if self.dns_overrides.is_empty() {
            base
        } else {
            Arc::new(
                DnsResolverWithOverrides::new(base, self.dns_overrides.clone())
                    .with_trace(self.options.trace),
            )
        }
    }
}

impl std::fmt::Debug for RouterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouterConfig")
            .field("options", &self.options)
            .field("resolver", &self.resolver.is_some())
            .field("dns_overrides_count", &self.dns_overrides.len())
            .finish()
    }
}
