//! Client-side round-robin over resolved addresses.
//!
//! - [`AddressCache`]: domain -> every address it resolved to, kept for the
//!   life of the cache, failures never stored
//! - [`RotationSelector`]: domain -> cursor into that list, wrapping around
//! - [`RoundRobinRouter`]: both behind [`resolve_next`](RoundRobinRouter::resolve_next)
//!
//! For a domain resolving to `[a0, .., aN-1]`, N consecutive calls return
//! each address once in lookup order, then the cycle repeats.

mod cache;
mod config;
mod router;
mod selector;

pub use cache::AddressCache;
pub use config::{EmptyResolution, RouterConfig, RouterOptions};
pub use router::{RoundRobinRouter, RouterBuilder};
pub use selector::RotationSelector;
