//! Client implementations (blocking + optional async).
//!
//! Both clients share one pipeline: resolve the route against the base URL,
//! attach the JSON:API headers, run the request hook, hand the request to the
//! transport, then classify the status. `2xx` yields the raw body, anything
//! else becomes [`Error::Remote`]. Typed operations decode that body with
//! [`decode_json`].

#[cfg(feature = "async")]
pub mod async_client;
#[cfg(feature = "blocking")]
pub mod blocking_client;

#[cfg(feature = "async")]
pub use async_client::{Client, ClientBuilder};
#[cfg(feature = "blocking")]
pub use blocking_client::{BlockingClient, BlockingClientBuilder};

use crate::{
    BodySnippetConfig, Error, HttpError, RequestHook, RequestHookContext,
    transport::{TransportRequest, TransportResponse},
    util::{diagnostics, url::sanitize_url_for_error},
};
use http::{
    HeaderMap, HeaderValue, Method,
    header::{ACCEPT, CONTENT_TYPE},
};
use serde::de::DeserializeOwned;
use url::Url;

/// Production endpoint used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.form3.tech";

/// Media type of every request and response body.
pub const API_MEDIA_TYPE: &str = "application/vnd.api+json";

pub(crate) const DEFAULT_USER_AGENT: &str =
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Caller defaults first, then the JSON:API headers, which always win.
pub(crate) fn request_headers(defaults: &HeaderMap) -> HeaderMap {
    let mut headers = defaults.clone();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(API_MEDIA_TYPE));
    headers.insert(ACCEPT, HeaderValue::from_static(API_MEDIA_TYPE));
    headers
}

pub(crate) fn run_hook(hook: Option<&RequestHook>, req: &mut TransportRequest) -> Result<(), Error> {
    let Some(hook) = hook else {
        return Ok(());
    };
    hook(RequestHookContext {
        method: &req.method,
        url: &req.url,
        headers: &mut req.headers,
        query: &req.query,
        body: req.body.as_deref(),
    })
}

/// `200..=299` passes the response through, whatever its body.
pub(crate) fn check_status(
    method: &Method,
    url: &Url,
    resp: TransportResponse,
    body_snippet: BodySnippetConfig,
) -> Result<TransportResponse, Error> {
    if resp.status.is_success() {
        return Ok(resp);
    }

    Err(Error::Remote(HttpError {
        status: resp.status,
        method: method.clone(),
        url: Box::new(sanitize_url_for_error(url)),
        message: diagnostics::extract_message(&resp.body),
        request_id: diagnostics::request_id(&resp.headers),
        body_snippet: diagnostics::body_snippet(&resp.body, body_snippet),
    }))
}

pub(crate) fn decode_json<T: DeserializeOwned>(
    method: &Method,
    url: &Url,
    resp: &TransportResponse,
    body_snippet: BodySnippetConfig,
) -> Result<T, Error> {
    serde_json::from_slice(&resp.body).map_err(|source| Error::Decode {
        status: Some(resp.status),
        method: method.clone(),
        path: url.path().to_string().into_boxed_str(),
        request_id: diagnostics::request_id(&resp.headers),
        body_snippet: diagnostics::body_snippet(&resp.body, body_snippet),
        source: Box::new(source),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use http::StatusCode;
    use std::{sync::Arc, time::Duration};

    fn url() -> Url {
        Url::parse("http://accountapi:8080/v1/organisation/accounts/abc").unwrap()
    }

    #[test]
    fn success_range_is_inclusive() {
        for code in [200, 201, 204, 299] {
            let resp = TransportResponse::new(StatusCode::from_u16(code).unwrap(), Vec::<u8>::new());
            assert!(check_status(&Method::GET, &url(), resp, BodySnippetConfig::default()).is_ok());
        }
    }

    #[test]
    fn non_success_statuses_become_remote_errors() {
        for code in [199, 304, 400, 404, 409, 500] {
            let resp = TransportResponse::new(
                StatusCode::from_u16(code).unwrap(),
                r#"{"error_message":"nope"}"#,
            );
            let err = check_status(&Method::GET, &url(), resp, BodySnippetConfig::default())
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Remote);
            assert_eq!(err.status().map(|s| s.as_u16()), Some(code));
        }
    }

    #[test]
    fn remote_error_keeps_non_json_body_as_snippet() {
        let resp = TransportResponse::new(StatusCode::BAD_GATEWAY, "upstream unavailable");
        let err = check_status(&Method::DELETE, &url(), resp, BodySnippetConfig::default())
            .unwrap_err();
        let Error::Remote(http) = err else {
            panic!("expected remote error");
        };
        assert_eq!(http.message, None);
        assert_eq!(http.body_snippet.as_deref(), Some("upstream unavailable"));
        assert_eq!(http.path(), "/v1/organisation/accounts/abc");
    }

    #[test]
    fn decode_failure_reports_status_and_path() {
        let resp = TransportResponse::new(StatusCode::OK, "not json");
        let err = decode_json::<serde_json::Value>(
            &Method::GET,
            &url(),
            &resp,
            BodySnippetConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert_eq!(err.status(), Some(StatusCode::OK));
    }

    #[test]
    fn json_api_headers_override_defaults() {
        let mut defaults = HeaderMap::new();
        defaults.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        defaults.insert("x-tenant", HeaderValue::from_static("t1"));

        let headers = request_headers(&defaults);
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), API_MEDIA_TYPE);
        assert_eq!(headers.get(ACCEPT).unwrap(), API_MEDIA_TYPE);
        assert_eq!(headers.get("x-tenant").unwrap(), "t1");
    }

    #[test]
    fn hook_can_add_headers_or_abort() {
        let mut req = TransportRequest {
            method: Method::GET,
            url: url(),
            headers: HeaderMap::new(),
            query: Vec::new(),
            body: None,
            timeout: Duration::from_secs(1),
        };

        let add: RequestHook = Arc::new(|ctx: RequestHookContext<'_>| -> Result<(), Error> {
            ctx.headers
                .insert("authorization", HeaderValue::from_static("Bearer t"));
            Ok(())
        });
        run_hook(Some(&add), &mut req).unwrap();
        assert_eq!(req.headers.get("authorization").unwrap(), "Bearer t");

        let deny: RequestHook = Arc::new(|_ctx: RequestHookContext<'_>| -> Result<(), Error> {
            Err(Error::InvalidConfig {
                message: "no credentials".into(),
                source: None,
            })
        });
        assert!(matches!(
            run_hook(Some(&deny), &mut req),
            Err(Error::InvalidConfig { .. })
        ));
        assert!(run_hook(None, &mut req).is_ok());
    }
}
