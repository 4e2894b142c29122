//! Shared/per-request header merge.

use std::collections::HashMap;

/// Merge per-request headers over the batch-wide shared headers, key by key.
/// Keys absent from `per_request` fall through to `shared`.
pub fn merge_headers(
    shared: &HashMap<String, String>,
    per_request: Option<&HashMap<String, String>>,
) -> HashMap<String, String> {
    let mut merged = shared.clone();
    if let Some(own) = per_request {
        for (k, v) in own {
            merged.insert(k.clone(), v.clone());
        }
    }
    merged
}

/// Format headers as `Name: value` lines for the transport.
pub(crate) fn header_lines(headers: &HashMap<String, String>) -> Vec<String> {
    let mut lines: Vec<String> = headers
        .iter()
        .map(|(k, v)| format!("{}: {}", k.trim(), v.trim()))
        .collect();
    lines.sort();
    lines
}
