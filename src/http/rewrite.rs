//! Request rewriting: point a request at one resolved address while
//! keeping the domain as the virtual host.
//!
//! `http://example.com:8080/a?b` with `example.com -> [1.1.1.1, 2.2.2.2]`
//! becomes `http://1.1.1.1:8080/a?b` + `Host: example.com:8080`, then
//! `http://2.2.2.2:8080/a?b` on the next request, and so on.

use crate::base::neterror::NetError;
use crate::rotation::RoundRobinRouter;
use http::header::HOST;
use http::uri::Authority;
use http::{HeaderMap, HeaderValue, Request, Uri};
use std::net::IpAddr;
use std::sync::Arc;
use url::{Host, Url};

/// Rewrites outgoing requests using a shared [`RoundRobinRouter`].
///
/// Both entry points return the address the request was pinned to, or
/// `None` when it was left untouched (host already an IP, no host, or no
/// address available). On error the request is not modified.
#[derive(Clone, Debug)]
pub struct RequestRewriter {
    router: Arc<RoundRobinRouter>,
}

impl RequestRewriter {
    pub fn new(router: Arc<RoundRobinRouter>) -> Self {
        Self { router }
    }

    pub fn router(&self) -> &Arc<RoundRobinRouter> {
        &self.router
    }

    /// Rewrite a parsed URL and its header map.
    pub async fn rewrite_url(
        &self,
        url: &mut Url,
        headers: &mut HeaderMap,
    ) -> Result<Option<IpAddr>, NetError> {
        let domain = match url.host() {
            Some(Host::Domain(domain)) => domain.to_ascii_lowercase(),
            _ => return Ok(None),
        };

        let Some(ip) = self.router.resolve_next(domain.as_str()).await else {
            return Ok(None);
        };

        // `Url::port` is None for the scheme's default port.
        let host = host_header(&domain, url.port())?;
        url.set_ip_host(ip).map_err(|_| NetError::InvalidUrl)?;
        headers.insert(HOST, host);

        if self.router.options().trace {
            tracing::debug!(domain = %domain, address = %ip, "pinned url");
        }
        Ok(Some(ip))
    }

    /// Rewrite an `http::Request` in place.
    pub async fn rewrite_request<B>(&self, req: &mut Request<B>) -> Result<Option<IpAddr>, NetError> {
        let Some(host) = req.uri().host() else {
            return Ok(None);
        };
        if is_ip_literal(host) {
            return Ok(None);
        }
        let domain = host.to_ascii_lowercase();

        let Some(ip) = self.router.resolve_next(domain.as_str()).await else {
            return Ok(None);
        };

        let host = host_header(&domain, explicit_port(req.uri()))?;
        let uri = pin_uri(req.uri(), ip)?;
        *req.uri_mut() = uri;
        req.headers_mut().insert(HOST, host);

        if self.router.options().trace {
            tracing::debug!(domain = %domain, address = %ip, "pinned request");
        }
        Ok(Some(ip))
    }
}

/// `Host` value for the virtual host, keeping an explicit port.
fn host_header(domain: &str, port: Option<u16>) -> Result<HeaderValue, NetError> {
    let value = match port {
        Some(port) => format!("{domain}:{port}"),
        None => domain.to_string(),
    };
    HeaderValue::from_str(&value).map_err(|_| NetError::InvalidUrl)
}

/// Port of `uri` unless it is the scheme's default, matching `Url::port`.
fn explicit_port(uri: &Uri) -> Option<u16> {
    let default = match uri.scheme_str() {
        Some("http") => Some(80),
        Some("https") => Some(443),
        _ => None,
    };
    uri.port_u16().filter(|&port| Some(port) != default)
}

/// `Uri::host` keeps the brackets around IPv6 literals.
fn is_ip_literal(host: &str) -> bool {
    host.trim_start_matches('[')
        .trim_end_matches(']')
        .parse::<IpAddr>()
        .is_ok()
}

/// Same URI with the host swapped for `ip`; userinfo, port, path and query kept.
fn pin_uri(uri: &Uri, ip: IpAddr) -> Result<Uri, NetError> {
    let authority = uri.authority().ok_or(NetError::InvalidUrl)?;

    let host = match ip {
        IpAddr::V4(v4) => v4.to_string(),
        IpAddr::V6(v6) => format!("[{v6}]"),
    };
    let userinfo = authority
        .as_str()
        .rsplit_once('@')
        .map(|(info, _)| format!("{info}@"))
        .unwrap_or_default();
    let port = authority
        .port_u16()
        .map(|port| format!(":{port}"))
        .unwrap_or_default();

    let pinned: Authority = format!("{userinfo}{host}{port}")
        .parse()
        .map_err(|_| NetError::InvalidUrl)?;

    let mut parts = uri.clone().into_parts();
    parts.authority = Some(pinned);
    Uri::from_parts(parts).map_err(|_| NetError::InvalidUrl)
}
