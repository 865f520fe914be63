/* src/middleware.rs */

use axum::{
    extract::{ConnectInfo, FromRequestParts, OptionalFromRequestParts, Request},
    http::{Extensions, StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use futures_util::future::BoxFuture;
use std::{
    convert::Infallible,
    net::{IpAddr, SocketAddr},
    task::{Context, Poll},
};
use tower::{Layer, Service};
use tracing::debug;

use crate::address::format_address;
use crate::error::RealIpError;
use crate::extractor::IpExtractor;

/// Extension that holds the extracted real IP address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RealIp(pub IpAddr);

impl RealIp {
    /// Get the IP address.
    pub fn ip(&self) -> IpAddr {
        self.0
    }

    /// Socket address string for this IP on `port`, IPv6 bracketed.
    pub fn address(&self, port: u16) -> String {
        format_address(self.0, port)
    }
}

/// Layer that resolves the real client IP for every request.
///
/// Proxy headers are checked with the configured [`IpExtractor`]; when none
/// of them holds an address the peer from `ConnectInfo<SocketAddr>` is used.
/// The result is stored as a [`RealIp`] request extension.
///
/// # Examples
///
/// ```rust,no_run
/// use axum::{Router, routing::get};
/// use forwarded_ip::{RealIp, RealIpLayer};
///
/// async fn handler(real_ip: RealIp) -> String {
///     real_ip.ip().to_string()
/// }
///
/// let app: Router = Router::new()
///     .route("/", get(handler))
///     .layer(RealIpLayer::default());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RealIpLayer {
    extractor: IpExtractor,
}

impl RealIpLayer {
    /// Create a layer that checks the default proxy headers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a layer with a custom extractor configuration.
    pub fn with_extractor(extractor: IpExtractor) -> Self {
        Self { extractor }
    }
}

impl<S> Layer<S> for RealIpLayer {
    type Service = RealIpService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RealIpService {
            inner,
            extractor: self.extractor.clone(),
        }
    }
}

/// Service produced by [`RealIpLayer`].
#[derive(Debug, Clone)]
pub struct RealIpService<S> {
    inner: S,
    extractor: IpExtractor,
}

impl<S> Service<Request> for RealIpService<S>
where
    S: Service<Request, Response = Response> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request) -> Self::Future {
        let resolved = match self.extractor.extract(req.headers()) {
            Some(ip) => Some(ip),
            None => {
                let peer = peer_ip(req.extensions());
                if let Some(ip) = peer {
                    debug!(%ip, "no usable proxy header, using peer address");
                }
                peer
            }
        };

        if let Some(ip) = resolved {
            req.extensions_mut().insert(RealIp(ip));
        }

        Box::pin(self.inner.call(req))
    }
}

fn peer_ip(extensions: &Extensions) -> Option<IpAddr> {
    extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
}

/// Stored [`RealIp`], else the connection peer.
fn resolve_parts(parts: &Parts) -> Option<RealIp> {
    parts
        .extensions
        .get::<RealIp>()
        .copied()
        .or_else(|| peer_ip(&parts.extensions).map(RealIp))
}

/// Axum extractor for the real IP address.
///
/// Rejects with [`RealIpError::NoValidIp`] when neither [`RealIpLayer`] nor
/// `ConnectInfo` supplied an address. Use `Option<RealIp>` to accept that
/// case instead.
impl<S> FromRequestParts<S> for RealIp
where
    S: Send + Sync,
{
    type Rejection = RealIpError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        resolve_parts(parts).ok_or(RealIpError::NoValidIp)
    }
}

impl<S> OptionalFromRequestParts<S> for RealIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(resolve_parts(parts))
    }
}

impl IntoResponse for RealIpError {
    fn into_response(self) -> Response {
        let status = match self {
            RealIpError::InvalidIpFormat(_) => StatusCode::BAD_REQUEST,
            RealIpError::NoValidIp => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}
