//! High-level blocking accounts client.

use super::{DEFAULT_BASE_URL, DEFAULT_USER_AGENT, check_status, decode_json, request_headers, run_hook};
use crate::{
    BodySnippetConfig, Error, RequestHookContext, api,
    transport::{
        TransportRequest, TransportResponse,
        blocking_transport::{BlockingTransport, DynBlockingTransport, UreqBlocking},
        request::Request,
    },
    util::url::{endpoint_url, normalize_base_url},
};
use http::HeaderMap;
use serde::de::DeserializeOwned;
use std::{sync::Arc, time::Duration};
use url::Url;

#[cfg(feature = "tracing")]
use tracing::field;

/// Configures and constructs [`BlockingClient`].
///
/// Everything is resolved once in [`BlockingClientBuilder::build`]; the built
/// client never changes its configuration afterwards.
pub struct BlockingClientBuilder {
    base_url: String,
    insecure: bool,
    user_agent: String,
    timeout: Duration,
    connect_timeout: Duration,
    read_timeout: Duration,
    no_proxy: bool,
    default_headers: HeaderMap,
    body_snippet: BodySnippetConfig,
    request_hook: Option<crate::RequestHook>,
    transport: Option<DynBlockingTransport>,
}

impl Default for BlockingClientBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            insecure: false,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(30),
            no_proxy: false,
            default_headers: HeaderMap::new(),
            body_snippet: BodySnippetConfig::default(),
            request_hook: None,
            transport: None,
        }
    }
}

impl BlockingClientBuilder {
    /// Service root, e.g. `http://localhost:8080`. Defaults to [`DEFAULT_BASE_URL`].
    pub fn base_url(mut self, base: impl Into<String>) -> Self {
        self.base_url = base.into();
        self
    }

    pub fn no_system_proxy(mut self) -> Self {
        self.no_proxy = true;
        self
    }

    pub fn danger_accept_invalid_certs(mut self, yes: bool) -> Self {
        self.insecure = yes;
        self
    }

    /// Override the default `User-Agent` header.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = ua.into();
        self
    }

    pub fn timeout(mut self, value: Duration) -> Self {
        self.timeout = value;
        self
    }

    pub fn connect_timeout(mut self, value: Duration) -> Self {
        self.connect_timeout = value;
        self
    }

    pub fn read_timeout(mut self, value: Duration) -> Self {
        self.read_timeout = value;
        self
    }

    pub fn default_header(
        mut self,
        name: http::header::HeaderName,
        value: http::HeaderValue,
    ) -> Self {
        self.default_headers.insert(name, value);
        self
    }

    pub fn default_headers(mut self, headers: HeaderMap) -> Self {
        self.default_headers.extend(headers);
        self
    }

    pub fn capture_body_snippet(mut self, enabled: bool) -> Self {
        self.body_snippet.enabled = enabled;
        self
    }

    pub fn max_body_snippet_bytes(mut self, max_bytes: usize) -> Self {
        self.body_snippet.max_bytes = max_bytes;
        self
    }

    /// Add a hook invoked right before every request is sent.
    pub fn request_hook<F>(mut self, hook: F) -> Self
    where
        F: for<'a> Fn(RequestHookContext<'a>) -> Result<(), Error> + Send + Sync + 'static,
    {
        self.request_hook = Some(Arc::new(hook));
        self
    }

    /// Replace the default `ureq` transport.
    ///
    /// Timeout, proxy, TLS and user-agent settings only apply to the default transport.
    pub fn transport(mut self, transport: impl BlockingTransport) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    pub fn build(self) -> Result<BlockingClient, Error> {
        let base = normalize_base_url(&self.base_url)?;

        let transport: DynBlockingTransport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(UreqBlocking::try_new(
                self.insecure,
                &self.user_agent,
                self.timeout,
                self.connect_timeout,
                self.read_timeout,
                self.no_proxy,
            )?),
        };

        Ok(BlockingClient {
            inner: Arc::new(Inner {
                base,
                timeout: self.timeout,
                default_headers: self.default_headers,
                body_snippet: self.body_snippet,
                request_hook: self.request_hook,
                transport,
            }),
        })
    }
}

/// Blocking client; cheap to clone and safe to share across threads.
#[derive(Clone)]
pub struct BlockingClient {
    inner: Arc<Inner>,
}

struct Inner {
    base: Url,
    timeout: Duration,
    default_headers: HeaderMap,
    body_snippet: BodySnippetConfig,
    request_hook: Option<crate::RequestHook>,
    transport: DynBlockingTransport,
}

impl BlockingClient {
    #[must_use]
    pub fn builder() -> BlockingClientBuilder {
        BlockingClientBuilder::default()
    }

    /// Client for `base` with default settings.
    pub fn new(base: impl Into<String>) -> Result<Self, Error> {
        Self::builder().base_url(base).build()
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base
    }

    #[must_use]
    pub fn accounts(&self) -> api::BlockingAccountsService {
        api::BlockingAccountsService::new(self.clone())
    }

    pub(crate) fn send_json<T: DeserializeOwned>(&self, req: Request) -> Result<T, Error> {
        let (url, resp) = self.execute_request(&req)?;
        decode_json(&req.method, &url, &resp, self.inner.body_snippet)
    }

    pub(crate) fn send_unit(&self, req: Request) -> Result<(), Error> {
        let _ = self.execute_request(&req)?;
        Ok(())
    }

    /// Perform one exchange: `2xx` yields the response, anything else an error.
    pub(crate) fn execute_request(&self, req: &Request) -> Result<(Url, TransportResponse), Error> {
        #[cfg(feature = "metrics")]
        let _inflight = crate::transport::metrics::InFlightGuard::new();

        let url = endpoint_url(&self.inner.base, req.segments.iter().map(|s| s.as_str()))?;

        #[cfg(any(feature = "tracing", feature = "metrics"))]
        let start = std::time::Instant::now();
        #[cfg(feature = "tracing")]
        let span = tracing::info_span!(
            "accounts.request",
            http.method = %req.method,
            http.host = %self.inner.base.host_str().unwrap_or_default(),
            http.path = %url.path(),
            http.status = field::Empty,
            request_id = field::Empty,
            latency_ms = field::Empty,
            error_kind = field::Empty,
        );
        #[cfg(feature = "tracing")]
        let _enter = span.enter();

        let mut transport_req = TransportRequest {
            method: req.method.clone(),
            url: url.clone(),
            headers: request_headers(&self.inner.default_headers),
            query: req.query.clone(),
            body: req.body.clone(),
            timeout: self.inner.timeout,
        };

        let result = run_hook(self.inner.request_hook.as_ref(), &mut transport_req)
            .and_then(|()| self.inner.transport.send(transport_req))
            .and_then(|resp| {
                #[cfg(feature = "tracing")]
                {
                    span.record("http.status", resp.status.as_u16() as i64);
                    if let Some(rid) = crate::util::diagnostics::request_id(&resp.headers) {
                        span.record("request_id", field::display(rid));
                    }
                }
                check_status(&req.method, &url, resp, self.inner.body_snippet)
            });

        #[cfg(feature = "tracing")]
        {
            span.record("latency_ms", start.elapsed().as_millis() as i64);
            if let Err(err) = &result {
                span.record("error_kind", field::debug(err.kind()));
                tracing::debug!(error = %err, "accounts request failed");
            }
        }

        #[cfg(feature = "metrics")]
        match &result {
            Ok(resp) => crate::transport::metrics::record_outcome(
                &req.method,
                Some(resp.status),
                start.elapsed(),
                None,
            ),
            Err(err) => crate::transport::metrics::record_outcome(
                &req.method,
                err.status(),
                start.elapsed(),
                Some(err.kind()),
            ),
        }

        result.map(|resp| (url, resp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use http::{Method, StatusCode};
    use std::sync::Mutex;

    /// Records requests and replays a canned outcome.
    struct Canned {
        seen: Mutex<Vec<TransportRequest>>,
        reply: fn() -> Result<TransportResponse, Error>,
    }

    impl BlockingTransport for Canned {
        fn send(&self, req: TransportRequest) -> Result<TransportResponse, Error> {
            self.seen.lock().unwrap().push(req);
            (self.reply)()
        }
    }

    fn client_with(reply: fn() -> Result<TransportResponse, Error>) -> (BlockingClient, Arc<Canned>) {
        let canned = Arc::new(Canned {
            seen: Mutex::new(Vec::new()),
            reply,
        });
        let client = BlockingClient::builder()
            .base_url("http://accountapi:8080")
            .transport(canned.clone())
            .build()
            .unwrap();
        (client, canned)
    }

    #[test]
    fn default_base_url_is_resolved_at_build_time() {
        let client = BlockingClient::builder().build().unwrap();
        assert_eq!(client.base_url().as_str(), "https://api.form3.tech/");
    }

    #[test]
    fn invalid_base_url_fails_build() {
        let err = BlockingClient::new("accountapi:8080?x").err().unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    }

    #[test]
    fn execute_request_sends_json_api_headers_and_query() {
        let (client, canned) = client_with(|| Ok(TransportResponse::new(StatusCode::NO_CONTENT, "")));

        let req = Request::delete(["v1", "organisation", "accounts", "abc"]).query_pair("version", 0);
        client.send_unit(req).unwrap();

        let seen = canned.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].method, Method::DELETE);
        assert_eq!(
            seen[0].url.as_str(),
            "http://accountapi:8080/v1/organisation/accounts/abc"
        );
        assert_eq!(seen[0].query, vec![("version".to_string(), "0".to_string())]);
        assert_eq!(
            seen[0].headers.get(http::header::CONTENT_TYPE).unwrap(),
            crate::client::API_MEDIA_TYPE
        );
    }

    #[test]
    fn transport_failure_is_never_an_empty_success() {
        let (client, _) = client_with(|| {
            Err(Error::Transport {
                method: Method::GET,
                path: "/v1/organisation/accounts".into(),
                kind: crate::TransportErrorKind::Connect,
                source: "connection refused".into(),
            })
        });

        let err = client
            .send_json::<serde_json::Value>(Request::get(["v1", "organisation", "accounts"]))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[test]
    fn hook_error_aborts_before_transport() {
        let canned = Arc::new(Canned {
            seen: Mutex::new(Vec::new()),
            reply: || Ok(TransportResponse::new(StatusCode::OK, "{}")),
        });
        let client = BlockingClient::builder()
            .transport(canned.clone())
            .request_hook(|_ctx| {
                Err(Error::InvalidConfig {
                    message: "missing credentials".into(),
                    source: None,
                })
            })
            .build()
            .unwrap();

        let err = client
            .send_unit(Request::get(["v1", "organisation", "accounts"]))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
        assert!(canned.seen.lock().unwrap().is_empty());
    }
}
