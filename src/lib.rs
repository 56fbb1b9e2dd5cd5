//! # rotanet
//!
//! Client-side round-robin over every address a domain resolves to.
//!
//! Operating systems and stub resolvers tend to hand a process the same
//! address for a domain over and over. `rotanet` looks up *all* A/AAAA
//! records once, keeps them for the life of the router, and gives out the
//! next one on every request. The request is then sent to that IP with the
//! original domain preserved in the `Host` header.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rotanet::Client;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), rotanet::NetError> {
//!     let client = Client::new();
//!     for _ in 0..3 {
//!         let resp = client.get("http://example.com/").await?;
//!         println!("Status: {}", resp.status());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Or drive the rotation directly:
//!
//! ```rust,ignore
//! use rotanet::rotation::RoundRobinRouter;
//!
//! let router = RoundRobinRouter::new();
//! let ip = router.resolve_next("example.com").await; // Option<IpAddr>
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Error definitions and IO context helpers
//! - [`dns`] - The lookup capability (hickory-dns, getaddrinfo, overrides)
//! - [`rotation`] - Address cache, per-domain cursors, the router
//! - [`http`] - Rewriting requests to target the selected address
//! - [`client`] - HTTP/1.1 client built on the above

pub mod base;
pub mod client;
pub mod dns;
pub mod http;
pub mod rotation;

pub use base::neterror::NetError;
pub use client::{Client, ClientBuilder, RemoteAddr};
pub use rotation::RoundRobinRouter;
