//! Error context helpers.
//!
//! Extension trait that turns a bare `io::Error` into a `NetError` which
//! remembers what was being attempted.

use crate::base::neterror::NetError;
use std::io;
use std::net::SocketAddr;

/// Extension trait for adding context to IO Results.
pub trait IoResultExt<T> {
    /// Attach the connect target to an IO error.
    ///
    /// ```ignore
    /// use rotanet::base::context::IoResultExt;
    ///
    /// let stream = TcpStream::connect(addr).await
    ///     .connection_context("93.184.216.34", 80)?;
    /// ```
    fn connection_context(self, host: &str, port: u16) -> Result<T, NetError>;

    /// Same as [`connection_context`](Self::connection_context) for a resolved socket address.
    fn addr_context(self, addr: SocketAddr) -> Result<T, NetError>;

    /// Attach the domain being resolved to an IO error.
    fn dns_context(self, domain: &str) -> Result<T, NetError>;
}

impl<T> IoResultExt<T> for Result<T, io::Error> {
    fn connection_context(self, host: &str, port: u16) -> Result<T, NetError> {
        self.map_err(|e| NetError::connection_failed_to(host, port, e))
    }

    fn addr_context(self, addr: SocketAddr) -> Result<T, NetError> {
        self.map_err(|e| NetError::connection_failed_to(addr.ip().to_string(), addr.port(), e))
    }

    fn dns_context(self, domain: &str) -> Result<T, NetError> {
        self.map_err(|e| NetError::dns_failed(domain, e))
    }
}
