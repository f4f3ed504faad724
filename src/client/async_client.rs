//! High-level asynchronous accounts client.

use super::{DEFAULT_BASE_URL, DEFAULT_USER_AGENT, check_status, decode_json, request_headers, run_hook};
use crate::{
    BodySnippetConfig, Error, RequestHookContext, api,
    transport::{
        TransportRequest, TransportResponse,
        async_transport::{AsyncTransport, DynAsyncTransport, ReqwestAsync},
        request::Request,
    },
    util::url::{endpoint_url, normalize_base_url},
};
use http::HeaderMap;
use serde::de::DeserializeOwned;
use std::{sync::Arc, time::Duration};
use url::Url;

#[cfg(feature = "tracing")]
use tracing::{Instrument, field};

/// Configures and constructs [`Client`].
pub struct ClientBuilder {
    base_url: String,
    insecure: bool,
    user_agent: String,
    timeout: Duration,
    connect_timeout: Duration,
    no_proxy: bool,
    default_headers: HeaderMap,
    body_snippet: BodySnippetConfig,
    request_hook: Option<crate::RequestHook>,
    transport: Option<DynAsyncTransport>,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            insecure: false,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            no_proxy: false,
            default_headers: HeaderMap::new(),
            body_snippet: BodySnippetConfig::default(),
            request_hook: None,
            transport: None,
        }
    }
}

impl ClientBuilder {
    /// Service root. Defaults to [`DEFAULT_BASE_URL`].
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

    /// Replace the default `reqwest` transport.
    pub fn transport(mut self, transport: impl AsyncTransport) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    pub fn build(self) -> Result<Client, Error> {
        let base = normalize_base_url(&self.base_url)?;

        let transport: DynAsyncTransport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestAsync::try_new(
                self.insecure,
                &self.user_agent,
                self.timeout,
                self.connect_timeout,
                self.no_proxy,
            )?),
        };

        Ok(Client {
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

/// Async client; cheap to clone and safe to share across tasks.
#[derive(Clone)]
pub struct Client {
    inner: Arc<Inner>,
}

struct Inner {
    base: Url,
    timeout: Duration,
    default_headers: HeaderMap,
    body_snippet: BodySnippetConfig,
    request_hook: Option<crate::RequestHook>,
    transport: DynAsyncTransport,
}

impl Client {
    #[must_use]
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    pub fn new(base: impl Into<String>) -> Result<Self, Error> {
        Self::builder().base_url(base).build()
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base
    }

    #[must_use]
    pub fn accounts(&self) -> api::AccountsService {
        api::AccountsService::new(self.clone())
    }

    pub(crate) async fn send_json<T: DeserializeOwned>(&self, req: Request) -> Result<T, Error> {
        let (url, resp) = self.execute_request(&req).await?;
        decode_json(&req.method, &url, &resp, self.inner.body_snippet)
    }

    pub(crate) async fn send_unit(&self, req: Request) -> Result<(), Error> {
        let _ = self.execute_request(&req).await?;
        Ok(())
    }

    pub(crate) async fn execute_request(
        &self,
        req: &Request,
    ) -> Result<(Url, TransportResponse), Error> {
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

        let mut transport_req = TransportRequest {
            method: req.method.clone(),
            url: url.clone(),
            headers: request_headers(&self.inner.default_headers),
            query: req.query.clone(),
            body: req.body.clone(),
            timeout: self.inner.timeout,
        };

        let exchange = async {
            run_hook(self.inner.request_hook.as_ref(), &mut transport_req)?;
            self.inner.transport.send(transport_req).await
        };
        #[cfg(feature = "tracing")]
        let exchange = exchange.instrument(span.clone());

        let result = exchange.await.and_then(|resp| {
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
                span.in_scope(|| tracing::debug!(error = %err, "accounts request failed"));
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
