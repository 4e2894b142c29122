//! Transport seam: what the scheduler needs from the thing doing network I/O.
//!
//! The scheduler only starts transfers, asks the transport to make progress,
//! drains the transfers that finished, and collects their body and metadata.
//! [`CurlTransport`] implements this over libcurl's multi interface.

mod classify;
mod handler;
mod info;
mod multi;
#[cfg(test)]
pub(crate) mod scripted;

use std::fmt;
use std::time::Duration;

use crate::error::TransportError;
use crate::request::TransferRequest;

pub use classify::{classify_curl_error, FailureKind, TransferError};
pub use info::TransferInfo;
pub use multi::{curl_version, CurlTransport};

/// Opaque identity of one in-flight transfer, issued by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(pub(crate) usize);

impl Handle {
    pub fn new(id: usize) -> Self {
        Handle(id)
    }

    pub fn id(self) -> usize {
        self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A transfer the transport reports as done, successfully or not.
#[derive(Debug)]
pub struct Completion {
    pub handle: Handle,
    pub result: Result<(), TransferError>,
}

/// Body and metadata of a completed transfer, released from the transport.
#[derive(Debug, Default)]
pub struct FinishedTransfer {
    pub body: Vec<u8>,
    pub info: TransferInfo,
}

pub trait Transport {
    /// Begin an asynchronous transfer.
    fn start(&mut self, request: &TransferRequest) -> Result<Handle, TransportError>;

    /// Drive I/O. May block for up to `max_wait` waiting for readiness when
    /// nothing has completed yet. An error here is fatal for the whole batch.
    fn poll(&mut self, max_wait: Duration) -> Result<(), TransportError>;

    /// Transfers that completed since the last drain, in the order reported.
    fn drain_completions(&mut self) -> Vec<Completion>;

    /// Take the body and metadata of a completed transfer and release its handle.
    fn finish(&mut self, handle: Handle) -> Result<FinishedTransfer, TransportError>;

    /// Drop an unfinished transfer (batch abort).
    fn cancel(&mut self, handle: Handle);
}
