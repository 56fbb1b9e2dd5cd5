//! HTTP/1.1 client that spreads requests over a domain's addresses.
//!
//! Every request goes through a [`RequestRewriter`]: the TCP connection is
//! opened to the address picked by the router and the domain travels in the
//! `Host` header. Requests the router has no address for are sent the usual
//! way, resolving the hostname at connect time.
//!
//! # Example
//!
//! ```rust,ignore
//! use rotanet::Client;
//!
//! let client = Client::builder()
//!     .timeout(Duration::from_secs(10))
//!     .build();
//!
//! for _ in 0..4 {
//!     let resp = client.get("http://example.com/").await?;
//!     println!("{} via {:?}", resp.status(), resp.extensions().get::<RemoteAddr>());
//! }
//! ```

use crate::base::context::IoResultExt;
use crate::base::neterror::NetError;
use crate::dns::Resolve;
use crate::http::RequestRewriter;
use crate::rotation::{RoundRobinRouter, RouterConfig, RouterOptions};
use bytes::Bytes;
use http::header::HOST;
use http::{HeaderValue, Request, Response, Uri};
use http_body::Body;
use http_body_util::Empty;
use hyper::body::Incoming;
use hyper::client::conn::http1;
use hyper_util::rt::TokioIo;
use std::borrow::Cow;
use std::io;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;

/// Peer address a response was received from, stored in the response
/// extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteAddr(pub SocketAddr);

/// HTTP Client for making requests.
///
/// Cloning is cheap and clones share the router, so rotation continues
/// across clones.
#[derive(Clone, Debug)]
pub struct Client {
    rewriter: RequestRewriter,
    timeout: Option<Duration>,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    /// Create a new client over the default hickory-dns resolver.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// The router deciding where requests go.
    pub fn router(&self) -> &Arc<RoundRobinRouter> {
        self.rewriter.router()
    }

    /// Send a GET request with an empty body.
    pub async fn get<U: AsRef<str>>(&self, url: U) -> Result<Response<Incoming>, NetError> {
        let req = Request::get(url.as_ref())
            .body(Empty::<Bytes>::new())
            .map_err(|_| NetError::InvalidUrl)?;
        self.execute(req).await
    }

    /// Send a request. The URI must be absolute and use the `http` scheme.
    pub async fn execute<B>(&self, req: Request<B>) -> Result<Response<Incoming>, NetError>
    where
        B: Body + Send + 'static,
        B::Data: Send,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.send(req))
                .await
                .map_err(|_| NetError::ConnectionTimedOut)?,
            None => self.send(req).await,
        }
    }

    async fn send<B>(&self, mut req: Request<B>) -> Result<Response<Incoming>, NetError>
    where
        B: Body + Send + 'static,
        B::Data: Send,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        match req.uri().scheme_str() {
            Some("http") => {}
            Some(_) => return Err(NetError::DisallowedUrlScheme),
            None => return Err(NetError::InvalidUrl),
        }

        let pinned = self.rewriter.rewrite_request(&mut req).await?;

        let authority = req.uri().authority().ok_or(NetError::InvalidUrl)?.clone();
        let port = authority.port_u16().unwrap_or(80);
        let stream = match pinned {
            Some(ip) => connect_addr(SocketAddr::new(ip, port)).await?,
            None => connect_host(authority.host(), port).await?,
        };
        let remote = stream.peer_addr().connection_context(authority.host(), port)?;

        if !req.headers().contains_key(HOST) {
            let host = authority
                .as_str()
                .rsplit_once('@')
                .map_or(authority.as_str(), |(_, host)| host);
            let host = HeaderValue::from_str(host).map_err(|_| NetError::InvalidUrl)?;
            req.headers_mut().insert(HOST, host);
        }
        *req.uri_mut() = origin_form(req.uri())?;

        let (mut sender, conn) = http1::handshake(TokioIo::new(stream)).await.map_err(|e| {
            tracing::debug!(remote = %remote, error = %e, "HTTP/1.1 handshake failed");
            NetError::ConnectionFailed
        })?;

        tokio::spawn(async move {
            if let Err(e) = conn.await {
                tracing::debug!(error = %e, "connection closed with error");
            }
        });

        let mut response = sender.send_request(req).await.map_err(|e| {
            tracing::debug!(remote = %remote, error = %e, "request failed");
            NetError::ConnectionClosed
        })?;
        response.extensions_mut().insert(RemoteAddr(remote));
        Ok(response)
    }
}

async fn connect_addr(addr: SocketAddr) -> Result<TcpStream, NetError> {
    TcpStream::connect(addr).await.addr_context(addr)
}

/// Unpinned path: resolve the hostname now and take the first address that
/// accepts.
async fn connect_host(host: &str, port: u16) -> Result<TcpStream, NetError> {
    let host = host.trim_start_matches('[').trim_end_matches(']');
    if let Ok(ip) = host.parse::<IpAddr>() {
        return connect_addr(SocketAddr::new(ip, port)).await;
    }

    let addrs = tokio::net::lookup_host((host, port)).await.dns_context(host)?;

    let mut last_err = None;
    for addr in addrs {
        match connect_addr(addr).await {
            Ok(stream) => return Ok(stream),
            Err(e) => last_err = Some(e),
        }
    }
    Err(last_err.unwrap_or_else(|| {
        NetError::dns_failed(host, io::Error::new(io::ErrorKind::NotFound, "No addresses returned"))
    }))
}

/// Request target for HTTP/1.1: path and query only.
fn origin_form(uri: &Uri) -> Result<Uri, NetError> {
    let target = uri.path_and_query().map_or("/", |pq| pq.as_str());
    let target = if target.is_empty() { "/" } else { target };
    target.parse().map_err(|_| NetError::InvalidUrl)
}

/// Builder for creating a [`Client`].
#[derive(Default, Debug)]
pub struct ClientBuilder {
    router: Option<Arc<RoundRobinRouter>>,
    config: RouterConfig,
    timeout: Option<Duration>,
}

impl ClientBuilder {
    /// Share an existing router (and its rotation state) with this client.
    ///
    /// Takes precedence over the resolver, override and option settings.
    pub fn router(mut self, router: Arc<RoundRobinRouter>) -> Self {
        self.router = Some(router);
        self
    }

    /// Use a custom lookup backend.
    pub fn resolver<R: Resolve + 'static>(mut self, resolver: R) -> Self {
        self.config.resolver = Some(Arc::new(resolver));
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

    /// Set router options.
    pub fn options(mut self, options: RouterOptions) -> Self {
        self.config.options = options;
        self
    }

    /// Set request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client.
    pub fn build(self) -> Client {
        let router = self
            .router
            .unwrap_or_else(|| Arc::new(RoundRobinRouter::with_config(self.config)));

        Client {
            rewriter: RequestRewriter::new(router),
            timeout: self.timeout,
        }
    }
}
