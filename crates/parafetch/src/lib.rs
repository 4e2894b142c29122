pub mod config;
pub mod error;
pub mod logging;

pub mod registry;
pub mod request;
pub mod scheduler;
pub mod transport;

pub use error::{BatchError, RequestError, TransportError};
pub use request::{Body, Method, RequestOptions, RequestSpec};
pub use scheduler::{BatchConfig, BatchSummary, Callback, ResultInfo, Scheduler};
pub use transport::{CurlTransport, FailureKind, TransferError, TransferInfo, Transport};
