//! Request counters, latency histogram and an in-flight gauge.

use crate::ErrorKind;
use http::{Method, StatusCode};
use metrics::{Gauge, SharedString, counter, gauge, histogram};
use std::time::Duration;

const INFLIGHT: &str = "accounts_sdk_inflight";
const REQUESTS: &str = "accounts_sdk_requests_total";
const DURATION: &str = "accounts_sdk_request_duration_seconds";
const ERRORS: &str = "accounts_sdk_errors_total";

/// Counts one exchange as in flight until dropped.
pub(crate) struct InFlightGuard(Gauge);

impl InFlightGuard {
    pub(crate) fn new() -> Self {
        let inflight = gauge!(INFLIGHT);
        inflight.increment(1.0);
        Self(inflight)
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.decrement(1.0);
    }
}

/// `None` means no response was received.
fn outcome_label(status: Option<StatusCode>) -> &'static str {
    let Some(status) = status else {
        return "transport";
    };
    if status.is_success() {
        "2xx"
    } else if status.is_client_error() {
        "4xx"
    } else if status.is_server_error() {
        "5xx"
    } else if status.is_redirection() {
        "3xx"
    } else if status.is_informational() {
        "1xx"
    } else {
        "other"
    }
}

fn error_label(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Remote => "remote",
        ErrorKind::Transport => "transport",
        ErrorKind::Decode => "decode",
        ErrorKind::InvalidConfig => "invalid_config",
    }
}

fn method_label(method: &Method) -> SharedString {
    if *method == Method::GET {
        SharedString::const_str("GET")
    } else if *method == Method::POST {
        SharedString::const_str("POST")
    } else if *method == Method::DELETE {
        SharedString::const_str("DELETE")
    } else {
        method.to_string().into()
    }
}

/// Record the outcome of one accounts call.
pub(crate) fn record_outcome(
    method: &Method,
    status: Option<StatusCode>,
    latency: Duration,
    error_kind: Option<ErrorKind>,
) {
    let method = method_label(method);
    let outcome = outcome_label(status);

    counter!(REQUESTS, "method" => method.clone(), "status_class" => outcome).increment(1);
    histogram!(DURATION, "method" => method.clone(), "status_class" => outcome).record(latency);

    if let Some(kind) = error_kind {
        counter!(ERRORS, "method" => method, "kind" => error_label(kind)).increment(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_labels_follow_status_class() {
        assert_eq!(outcome_label(Some(StatusCode::NO_CONTENT)), "2xx");
        assert_eq!(outcome_label(Some(StatusCode::TEMPORARY_REDIRECT)), "3xx");
        assert_eq!(outcome_label(Some(StatusCode::CONFLICT)), "4xx");
        assert_eq!(outcome_label(Some(StatusCode::BAD_GATEWAY)), "5xx");
        assert_eq!(outcome_label(None), "transport");
    }

    #[test]
    fn error_and_method_labels_are_stable() {
        assert_eq!(error_label(ErrorKind::Decode), "decode");
        assert_eq!(error_label(ErrorKind::InvalidConfig), "invalid_config");
        assert_eq!(&*method_label(&Method::DELETE), "DELETE");
        assert_eq!(&*method_label(&Method::PATCH), "PATCH");
    }

    #[test]
    fn recording_without_a_recorder_is_a_no_op() {
        let guard = InFlightGuard::new();
        record_outcome(
            &Method::GET,
            None,
            Duration::from_millis(3),
            Some(ErrorKind::Transport),
        );
        drop(guard);
    }
}
