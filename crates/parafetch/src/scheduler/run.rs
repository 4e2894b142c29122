//! The execution loop: poll the transport, dispatch completions, refill.

use std::time::Instant;

use crate::error::{BatchError, TransportError};
use crate::registry::RequestRegistry;
use crate::transport::Transport;

use super::{admit, result, BatchConfig, BatchSummary};

/// Run every queued request to completion. Callbacks fire in the order the
/// transport reports completions; the window is refilled after each drain.
pub(super) fn run_batch<T: Transport>(
    transport: &mut T,
    registry: &mut RequestRegistry,
    config: &BatchConfig,
) -> Result<BatchSummary, BatchError> {
    let batch_start = Instant::now();
    let mut summary = BatchSummary::default();

    admit::fill_window(transport, registry, config)?;
    summary.peak_in_flight = registry.in_flight_len();

    while !registry.is_done() {
        transport.poll(config.poll_interval())?;

        for completion in transport.drain_completions() {
            let handle = completion.handle;
            let entry = registry
                .complete(handle)
                .ok_or(TransportError::UnknownHandle(handle))?;
            let finished = transport.finish(handle)?;
            let callback = entry.callback.clone();
            let info = result::assemble(entry, completion.result, finished, Instant::now())?;

            summary.completed += 1;
            match &info.error {
                None => tracing::debug!(
                    index = info.index,
                    url = %info.url,
                    %handle,
                    status = info.info.response_code,
                    elapsed_ms = info.elapsed.as_millis() as u64,
                    "request completed"
                ),
                Some(e) => {
                    summary.failed += 1;
                    tracing::warn!(
                        index = info.index,
                        url = %info.url,
                        %handle,
                        kind = ?e.kind,
                        elapsed_ms = info.elapsed.as_millis() as u64,
                        "request failed: {}",
                        e
                    );
                }
            }

            if let Some(cb) = callback {
                let (index, url) = (info.index, info.url.clone());
                cb.call(info)
                    .map_err(|source| BatchError::Callback { index, url, source })?;
            }
        }

        admit::fill_window(transport, registry, config)?;
        summary.peak_in_flight = summary.peak_in_flight.max(registry.in_flight_len());
    }

    summary.elapsed = batch_start.elapsed();
    Ok(summary)
}
