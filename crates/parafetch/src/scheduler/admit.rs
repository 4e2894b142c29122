//! Admission window: start queued requests until the window is full.

use std::time::Instant;

use crate::error::TransportError;
use crate::registry::{InFlightEntry, RequestRegistry};
use crate::request::TransferRequest;
use crate::transport::Transport;

use super::BatchConfig;

/// Admit queued requests in insertion order while fewer than
/// `max_concurrent` are in flight. Returns how many were admitted.
pub(super) fn fill_window<T: Transport>(
    transport: &mut T,
    registry: &mut RequestRegistry,
    config: &BatchConfig,
) -> Result<usize, TransportError> {
    let mut admitted = 0;
    while registry.in_flight_len() < config.max_concurrent() {
        let Some((index, spec)) = registry.next_queued() else {
            break;
        };
        let request = TransferRequest::resolve(&spec, config);
        let handle = transport.start(&request)?;
        tracing::debug!(index, url = %spec.url(), %handle, "admitted request");
        let callback = spec
            .callback
            .clone()
            .or_else(|| config.default_callback().cloned());
        registry.admit(
            handle,
            InFlightEntry {
                index,
                spec,
                callback,
                capture_headers: request.options.captures_headers(),
                started: Instant::now(),
            },
        );
        admitted += 1;
    }
    Ok(admitted)
}
