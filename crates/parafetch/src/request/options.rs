//! Typed per-transfer options and their override semantics.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Transfer options. Every field is optional so that a per-request set can be
/// layered over the batch-wide shared set: a `Some` wins, a `None` falls through.
///
/// `buffer_response`, `no_signal`, `connect_timeout` and `timeout` are owned by
/// the scheduler and overwritten at admission whatever the caller put there.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestOptions {
    /// Include the response header block in the received body and split it
    /// off into `ResultInfo::response_headers`.
    pub capture_headers: Option<bool>,
    pub follow_redirects: Option<bool>,
    pub max_redirects: Option<u32>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    /// Value for `Accept-Encoding`; an empty string asks for every encoding curl supports.
    pub accept_encoding: Option<String>,
    pub verify_peer: Option<bool>,
    pub verbose: Option<bool>,

    #[serde(skip)]
    pub buffer_response: Option<bool>,
    #[serde(skip)]
    pub no_signal: Option<bool>,
    #[serde(skip)]
    pub connect_timeout: Option<Duration>,
    #[serde(skip)]
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    /// Layer `self` over `shared`, field by field.
    pub fn merged_over(&self, shared: &RequestOptions) -> RequestOptions {
        RequestOptions {
            capture_headers: self.capture_headers.or(shared.capture_headers),
            follow_redirects: self.follow_redirects.or(shared.follow_redirects),
            max_redirects: self.max_redirects.or(shared.max_redirects),
            user_agent: self.user_agent.clone().or_else(|| shared.user_agent.clone()),
            referer: self.referer.clone().or_else(|| shared.referer.clone()),
            accept_encoding: self
                .accept_encoding
                .clone()
                .or_else(|| shared.accept_encoding.clone()),
            verify_peer: self.verify_peer.or(shared.verify_peer),
            verbose: self.verbose.or(shared.verbose),
            buffer_response: self.buffer_response.or(shared.buffer_response),
            no_signal: self.no_signal.or(shared.no_signal),
            connect_timeout: self.connect_timeout.or(shared.connect_timeout),
            timeout: self.timeout.or(shared.timeout),
        }
    }

    /// Overwrite the scheduler-owned keys: in-memory buffering, no signals,
    /// and the same bound for connect and total time.
    pub(crate) fn with_forced_keys(mut self, timeout: Duration) -> RequestOptions {
        self.buffer_response = Some(true);
        self.no_signal = Some(true);
        self.connect_timeout = Some(timeout);
        self.timeout = Some(timeout);
        self
    }

    pub fn captures_headers(&self) -> bool {
        self.capture_headers.unwrap_or(false)
    }
}
