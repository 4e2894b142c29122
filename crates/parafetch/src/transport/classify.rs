//! Per-request failure descriptor and curl error classification.

use serde::Serialize;
use std::fmt;

/// Coarse category of a per-request failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    /// Connect or total timeout expired.
    Timeout,
    /// DNS, refused connection, reset, nothing received.
    Connection,
    /// Handshake or certificate problem.
    Tls,
    /// Malformed URL, unsupported scheme, redirect loop, bad encoding.
    Protocol,
    Other,
}

/// Error descriptor attached to a failed request's `ResultInfo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferError {
    pub kind: FailureKind,
    /// Transport-specific code (the libcurl `CURLcode` for the curl transport).
    pub code: i32,
    pub message: String,
}

impl TransferError {
    pub fn new(kind: FailureKind, code: i32, message: impl Into<String>) -> Self {
        Self {
            kind,
            code,
            message: message.into(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        self.kind == FailureKind::Timeout
    }
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

impl std::error::Error for TransferError {}

impl From<curl::Error> for TransferError {
    fn from(e: curl::Error) -> Self {
        let message = match e.extra_description() {
            Some(extra) => format!("{}: {}", e.description(), extra),
            None => e.description().to_string(),
        };
        TransferError {
            kind: classify_curl_error(&e),
            code: e.code() as i32,
            message,
        }
    }
}

/// Classify a curl error into a [`FailureKind`].
pub fn classify_curl_error(e: &curl::Error) -> FailureKind {
    if e.is_operation_timedout() {
        return FailureKind::Timeout;
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
    {
        return FailureKind::Connection;
    }
    if e.is_ssl_connect_error()
        || e.is_peer_failed_verification()
        || e.is_ssl_certproblem()
        || e.is_ssl_cacert()
        || e.is_ssl_cipher()
    {
        return FailureKind::Tls;
    }
    if e.is_unsupported_protocol()
        || e.is_url_malformed()
        || e.is_too_many_redirects()
        || e.is_bad_content_encoding()
        || e.is_partial_file()
        || e.is_http2_error()
    {
        return FailureKind::Protocol;
    }
    FailureKind::Other
}
