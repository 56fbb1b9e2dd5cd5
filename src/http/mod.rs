//! HTTP integration of the router.
//!
//! - [`rewrite`]: pins a request to one resolved address and moves the
//!   domain into the `Host` header

pub mod rewrite;

// Re-exports for convenience
pub use rewrite::RequestRewriter;
