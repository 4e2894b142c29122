//! Batch-level error types.
//!
//! Per-request failures never show up here: they travel inside
//! [`ResultInfo`](crate::scheduler::ResultInfo) as a
//! [`TransferError`](crate::transport::TransferError). Everything in this
//! module stops the current `execute` call.

use crate::transport::Handle;

/// Failure of the transport's control structure, not attributable to one request.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The curl multi handle reported an error (perform, wait, add, remove).
    #[error("curl multi: {0}")]
    Multi(#[from] curl::MultiError),
    /// Configuring an easy handle failed before it could be started.
    #[error("curl easy setup: {0}")]
    Setup(#[from] curl::Error),
    /// The transport reported a completion for a handle it never issued.
    #[error("unknown transfer handle {0}")]
    UnknownHandle(Handle),
    /// Any other transport-specific failure.
    #[error("{0}")]
    Other(String),
}

/// Error returned from [`Scheduler::execute`](crate::scheduler::Scheduler::execute).
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("batch aborted by transport failure")]
    Transport(#[from] TransportError),

    /// A completion callback returned an error; the batch stopped at that point.
    #[error("callback for request {index} ({url}) failed")]
    Callback {
        index: usize,
        url: String,
        #[source]
        source: anyhow::Error,
    },

    /// Completion time was earlier than admission time. The clock is
    /// monotonic, so this is a scheduler bug rather than a network condition.
    #[error("elapsed time for request {index} is negative")]
    ClockWentBackwards { index: usize },
}

/// Error returned when a request cannot be enqueued.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("request URL must not be empty")]
    EmptyUrl,
}
