//! DNS Resolution Module
//!
//! The lookup capability behind the address cache:
//! - [`HickoryResolver`]: async hickory-dns resolver (default)
//! - [`GaiResolver`]: system resolver (getaddrinfo via thread pool)
//! - [`DnsResolverWithOverrides`]: static hostname table in front of another resolver
//!
//! Any type implementing [`Resolve`] can be plugged into a
//! [`RoundRobinRouter`](crate::rotation::RoundRobinRouter).
//!
//! # Example
//!
//! ```rust,ignore
//! use rotanet::dns::{HickoryResolver, Name, Resolve};
//!
//! let resolver = HickoryResolver::new();
//! let addrs = resolver.resolve(Name::new("example.com")).await?;
//! for addr in addrs {
//!     println!("Resolved: {}", addr.ip());
//! }
//! ```

mod gai;
mod hickory;
mod resolve;

pub use gai::GaiResolver;
pub use hickory::HickoryResolver;
pub use resolve::{Addrs, DnsResolverWithOverrides, Name, Resolve, Resolving};
