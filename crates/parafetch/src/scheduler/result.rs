//! Build a ResultInfo from a completed transfer and its in-flight entry.

use std::time::{Duration, Instant};

use crate::error::BatchError;
use crate::registry::InFlightEntry;
use crate::transport::{FinishedTransfer, TransferError, TransferInfo};

/// Outcome of one request, delivered to its callback.
#[derive(Debug, Clone)]
pub struct ResultInfo {
    /// Index returned by `add_request`.
    pub index: usize,
    /// URL as enqueued.
    pub url: String,
    /// Response payload; `None` when the transfer failed.
    pub payload: Option<Vec<u8>>,
    /// Header block split off the payload when header capture was requested.
    pub response_headers: Option<Vec<u8>>,
    pub info: TransferInfo,
    /// Wall-clock time between admission and completion.
    pub elapsed: Duration,
    /// Present iff the transfer failed.
    pub error: Option<TransferError>,
    pub user_data: Option<serde_json::Value>,
}

impl ResultInfo {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Payload as text (lossy UTF-8); `None` when the transfer failed.
    pub fn text(&self) -> Option<String> {
        self.payload
            .as_deref()
            .map(|p| String::from_utf8_lossy(p).into_owned())
    }
}

pub(super) fn assemble(
    entry: InFlightEntry,
    outcome: Result<(), TransferError>,
    finished: FinishedTransfer,
    completed_at: Instant,
) -> Result<ResultInfo, BatchError> {
    let elapsed = completed_at
        .checked_duration_since(entry.started)
        .ok_or(BatchError::ClockWentBackwards { index: entry.index })?;

    let FinishedTransfer { body, info } = finished;
    let (payload, response_headers, error) = match outcome {
        Ok(()) if entry.capture_headers && !body.is_empty() => {
            let (headers, payload) = split_header_block(body, info.header_size);
            (Some(payload), Some(headers), None)
        }
        Ok(()) => (Some(body), None, None),
        Err(e) => (None, None, Some(e)),
    };

    Ok(ResultInfo {
        index: entry.index,
        url: entry.spec.url,
        payload,
        response_headers,
        info,
        elapsed,
        error,
        user_data: entry.spec.user_data,
    })
}

/// Split `body` into the leading `header_size` bytes and the rest.
fn split_header_block(mut body: Vec<u8>, header_size: u64) -> (Vec<u8>, Vec<u8>) {
    let k = usize::try_from(header_size).unwrap_or(usize::MAX).min(body.len());
    let payload = body.split_off(k);
    (body, payload)
}
