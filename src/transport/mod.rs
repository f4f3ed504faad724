//! Transport adapter: one HTTP exchange per call.
//!
//! The client describes a request as a [`TransportRequest`] and receives the raw
//! [`TransportResponse`]. Implementations must not interpret status codes; a
//! non-2xx answer is still `Ok`. Only a failure to obtain a response at all is
//! reported as [`crate::Error::Transport`].

use http::{HeaderMap, Method, StatusCode};
use std::time::Duration;
use url::Url;

#[cfg(feature = "async")]
pub mod async_transport;
#[cfg(feature = "blocking")]
pub mod blocking_transport;
#[cfg(feature = "metrics")]
pub(crate) mod metrics;
pub(crate) mod request;

#[cfg(feature = "async")]
pub use async_transport::{AsyncTransport, DynAsyncTransport, ReqwestAsync};
#[cfg(feature = "blocking")]
pub use blocking_transport::{BlockingTransport, DynBlockingTransport, UreqBlocking};

/// Fully resolved request handed to a transport.
#[derive(Clone, Debug)]
pub struct TransportRequest {
    pub method: Method,
    /// Absolute URL without the query string.
    pub url: Url,
    pub headers: HeaderMap,
    /// Query pairs, appended (and encoded) by the transport.
    pub query: Vec<(String, String)>,
    /// Serialized JSON payload, `Content-Type` is already in `headers`.
    pub body: Option<Vec<u8>>,
    pub timeout: Duration,
}

/// Raw outcome of an exchange, whatever the status.
#[derive(Clone, Debug)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TransportResponse {
    #[must_use]
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }
}
