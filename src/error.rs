use http::{Method, StatusCode};
use std::{error::Error as StdError, fmt};
use thiserror::Error;
use url::Url;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Copy)]
pub struct BodySnippetConfig {
    pub enabled: bool,
    pub max_bytes: usize,
}

impl Default for BodySnippetConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_bytes: 4096,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    Remote,
    Transport,
    Decode,
    InvalidConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum TransportErrorKind {
    Timeout,
    Connect,
    Other,
}

/// A response outside `2xx`.
#[derive(Debug, Clone)]
pub struct HttpError {
    pub status: StatusCode,
    pub method: Method,
    /// Sanitized URL: no query/fragment/userinfo.
    pub url: Box<Url>,
    /// `error_message` (or similar) extracted from a JSON error body.
    pub message: Option<Box<str>>,
    pub request_id: Option<Box<str>>,
    pub body_snippet: Option<Box<str>>,
}

impl HttpError {
    #[must_use]
    pub fn path(&self) -> &str {
        self.url.path()
    }
}

/// All errors returned by the SDK.
///
/// A call yields exactly one of these or a success value.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The service answered with a status outside `200..=299`.
    #[error("{0}")]
    Remote(HttpError),

    /// No response was received (connect, DNS, TLS, timeout).
    #[error("Transport error during {method} {path}: {source}")]
    Transport {
        method: Method,
        path: Box<str>,
        kind: TransportErrorKind,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    /// A payload could not be encoded, or a `2xx` body did not match the expected envelope.
    ///
    /// `status` is `None` when the outbound payload failed to serialize.
    #[error("Decode error during {method} {path}: {source}")]
    Decode {
        status: Option<StatusCode>,
        method: Method,
        path: Box<str>,
        request_id: Option<Box<str>>,
        body_snippet: Option<Box<str>>,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        message: Box<str>,
        #[source]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },
}

impl Error {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Remote(_) => ErrorKind::Remote,
            Self::Transport { .. } => ErrorKind::Transport,
            Self::Decode { .. } => ErrorKind::Decode,
            Self::InvalidConfig { .. } => ErrorKind::InvalidConfig,
        }
    }

    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Remote(e) => Some(e.status),
            Self::Decode { status, .. } => *status,
            Self::Transport { .. } | Self::InvalidConfig { .. } => None,
        }
    }

    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Self::Remote(e) => e.request_id.as_deref(),
            Self::Decode { request_id, .. } => request_id.as_deref(),
            Self::Transport { .. } | Self::InvalidConfig { .. } => None,
        }
    }

    /// `true` for a `404` answer, e.g. fetching an id that does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND) && self.kind() == ErrorKind::Remote
    }

    /// `true` for a `409`, which the service returns for a stale `version` or a duplicate id.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        self.status() == Some(StatusCode::CONFLICT) && self.kind() == ErrorKind::Remote
    }

    /// Hint for callers layering their own retry policy. The SDK never retries.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Remote(e) => matches!(
                e.status,
                StatusCode::TOO_MANY_REQUESTS
                    | StatusCode::BAD_GATEWAY
                    | StatusCode::SERVICE_UNAVAILABLE
                    | StatusCode::GATEWAY_TIMEOUT
            ),
            Self::Transport { kind, .. } => matches!(
                kind,
                TransportErrorKind::Timeout | TransportErrorKind::Connect
            ),
            _ => false,
        }
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {} ({} {})", self.status, self.method, self.path())?;
        if let Some(message) = self.message.as_deref() {
            write!(f, ": {message}")?;
        }
        if let Some(request_id) = self.request_id.as_deref() {
            write!(f, " [request-id: {request_id}]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote(status: StatusCode) -> Error {
        Error::Remote(HttpError {
            status,
            method: Method::GET,
            url: Box::new(Url::parse("https://api.form3.tech/v1/organisation/accounts/x").unwrap()),
            message: Some("record x does not exist".into()),
            request_id: Some("req-1".into()),
            body_snippet: None,
        })
    }

    #[test]
    fn remote_error_exposes_status_and_request_id() {
        let err = remote(StatusCode::NOT_FOUND);
        assert_eq!(err.kind(), ErrorKind::Remote);
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(err.request_id(), Some("req-1"));
        assert!(err.is_not_found());
        assert!(!err.is_conflict());
        assert_eq!(
            err.to_string(),
            "HTTP 404 Not Found (GET /v1/organisation/accounts/x): record x does not exist [request-id: req-1]"
        );
    }

    #[test]
    fn retry_hint_covers_gateway_errors_and_connect_failures() {
        assert!(remote(StatusCode::SERVICE_UNAVAILABLE).is_retryable());
        assert!(!remote(StatusCode::CONFLICT).is_retryable());

        let err = Error::Transport {
            method: Method::POST,
            path: "/v1/organisation/accounts".into(),
            kind: TransportErrorKind::Connect,
            source: "connection refused".into(),
        };
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(err.status(), None);
        assert!(err.is_retryable());
    }

    #[test]
    fn decode_error_for_outbound_payload_has_no_status() {
        let source: Box<dyn StdError + Send + Sync> = "bad payload".into();
        let err = Error::Decode {
            status: None,
            method: Method::POST,
            path: "/v1/organisation/accounts".into(),
            request_id: None,
            body_snippet: None,
            source,
        };
        assert_eq!(
            err.to_string(),
            "Decode error during POST /v1/organisation/accounts: bad payload"
        );
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert_eq!(err.status(), None);
    }
}
