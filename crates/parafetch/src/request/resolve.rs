//! Resolve a queued request against the batch configuration at admission.

use std::collections::HashMap;

use crate::scheduler::BatchConfig;

use super::headers::{header_lines, merge_headers};
use super::{Method, RequestOptions, RequestSpec};

/// Fully resolved descriptor the transport runs: merged headers, merged
/// options with the scheduler-owned keys forced, encoded body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub url: String,
    pub method: Method,
    pub body: Option<Vec<u8>>,
    pub headers: HashMap<String, String>,
    pub options: RequestOptions,
}

impl TransferRequest {
    /// Snapshot `config` for this request. Later config changes do not affect it.
    pub fn resolve(spec: &RequestSpec, config: &BatchConfig) -> Self {
        let options = match &spec.options {
            Some(own) => own.merged_over(config.shared_options()),
            None => config.shared_options().clone(),
        };
        Self {
            url: spec.url.clone(),
            method: spec.method(),
            body: spec.body.as_ref().map(|b| b.encode()),
            headers: merge_headers(config.shared_headers(), spec.headers.as_ref()),
            options: options.with_forced_keys(config.timeout()),
        }
    }

    pub fn header_lines(&self) -> Vec<String> {
        header_lines(&self.headers)
    }
}
