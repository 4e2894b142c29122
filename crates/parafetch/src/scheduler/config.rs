//! Runtime batch configuration owned by one `Scheduler`.

use std::collections::HashMap;
use std::time::Duration;

use crate::request::RequestOptions;

use super::Callback;

pub const DEFAULT_MAX_CONCURRENT: usize = 10;
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Batch-wide settings. Invalid values passed to the setters are ignored and
/// the previous value is kept; each setter reports whether it applied.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    max_concurrent: usize,
    timeout: Duration,
    poll_interval: Duration,
    shared_options: RequestOptions,
    shared_headers: HashMap<String, String>,
    default_callback: Option<Callback>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            shared_options: RequestOptions::default(),
            shared_headers: HashMap::new(),
            default_callback: None,
        }
    }
}

impl BatchConfig {
    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Per-request connect and total timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Upper bound on one blocking transport wait.
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn shared_options(&self) -> &RequestOptions {
        &self.shared_options
    }

    pub fn shared_headers(&self) -> &HashMap<String, String> {
        &self.shared_headers
    }

    pub fn default_callback(&self) -> Option<&Callback> {
        self.default_callback.as_ref()
    }

    pub fn set_max_concurrent(&mut self, max: usize) -> bool {
        if max == 0 {
            tracing::debug!("ignoring max_concurrent = 0, keeping {}", self.max_concurrent);
            return false;
        }
        self.max_concurrent = max;
        true
    }

    pub fn set_timeout_ms(&mut self, millis: u64) -> bool {
        if millis == 0 {
            tracing::debug!("ignoring timeout of 0 ms, keeping {:?}", self.timeout);
            return false;
        }
        self.timeout = Duration::from_millis(millis);
        true
    }

    pub fn set_poll_interval(&mut self, interval: Duration) -> bool {
        if interval.is_zero() {
            return false;
        }
        self.poll_interval = interval;
        true
    }

    pub fn set_shared_options(&mut self, options: RequestOptions) {
        self.shared_options = options;
    }

    /// Replace the shared headers. An empty map is ignored.
    pub fn set_shared_headers(&mut self, headers: HashMap<String, String>) -> bool {
        if headers.is_empty() {
            return false;
        }
        self.shared_headers = headers;
        true
    }

    pub fn set_callback(&mut self, callback: Callback) {
        self.default_callback = Some(callback);
    }
}
