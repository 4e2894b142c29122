//! Bounded-concurrency batch scheduler.
//!
//! Requests are enqueued with [`Scheduler::add_request`] and run by
//! [`Scheduler::execute`]: at most `max_concurrent` are in flight, each
//! completion fires its callback in-line, and the freed slot is refilled from
//! the queue in insertion order until the batch is drained.

mod admit;
mod callback;
mod config;
mod result;
mod run;

use std::collections::HashMap;
use std::time::Duration;

use crate::error::{BatchError, RequestError};
use crate::registry::RequestRegistry;
use crate::request::{RequestOptions, RequestSpec};
use crate::transport::{curl_version, CurlTransport, Transport};

pub use callback::Callback;
pub use config::{BatchConfig, DEFAULT_MAX_CONCURRENT, DEFAULT_POLL_INTERVAL_MS, DEFAULT_TIMEOUT_MS};
pub use result::ResultInfo;

/// Counters for one finished `execute` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Requests that produced a ResultInfo.
    pub completed: usize,
    /// Of those, how many carried a transfer error.
    pub failed: usize,
    pub peak_in_flight: usize,
    pub elapsed: Duration,
}

pub struct Scheduler<T: Transport = CurlTransport> {
    transport: T,
    config: BatchConfig,
    registry: RequestRegistry,
}

impl Scheduler<CurlTransport> {
    /// Scheduler over libcurl's multi interface.
    pub fn curl(max_concurrent: usize) -> Self {
        tracing::debug!(curl = %curl_version(), "creating curl scheduler");
        let mut scheduler = Scheduler::new(CurlTransport::new());
        scheduler.set_max_concurrent(max_concurrent);
        scheduler
    }
}

impl<T: Transport> Scheduler<T> {
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, BatchConfig::default())
    }

    pub fn with_config(transport: T, config: BatchConfig) -> Self {
        Self {
            transport,
            config,
            registry: RequestRegistry::new(),
        }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Ignored (returns false) when `max` is 0.
    pub fn set_max_concurrent(&mut self, max: usize) -> bool {
        self.config.set_max_concurrent(max)
    }

    pub fn set_shared_options(&mut self, options: RequestOptions) {
        self.config.set_shared_options(options);
    }

    /// Ignored (returns false) when `headers` is empty.
    pub fn set_shared_headers(&mut self, headers: HashMap<String, String>) -> bool {
        self.config.set_shared_headers(headers)
    }

    /// Callback for requests enqueued without their own.
    pub fn set_callback<F>(&mut self, f: F)
    where
        F: Fn(ResultInfo) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.config.set_callback(Callback::new(f));
    }

    /// Ignored (returns false) when `millis` is 0.
    pub fn set_timeout_ms(&mut self, millis: u64) -> bool {
        self.config.set_timeout_ms(millis)
    }

    pub fn set_poll_interval(&mut self, interval: Duration) -> bool {
        self.config.set_poll_interval(interval)
    }

    /// Enqueue a request; returns its stable index in the current batch.
    pub fn add_request(&mut self, spec: RequestSpec) -> Result<usize, RequestError> {
        if spec.url().trim().is_empty() {
            return Err(RequestError::EmptyUrl);
        }
        Ok(self.registry.push(spec))
    }

    /// Requests enqueued and not yet run.
    pub fn queued(&self) -> usize {
        self.registry.queued_len()
    }

    /// Discard the current batch.
    pub fn reset(&mut self) {
        self.registry.clear();
    }

    /// Run the whole batch, blocking until every request has produced a
    /// ResultInfo and fired its callback. The batch is consumed either way:
    /// on error, unfinished requests are abandoned and their transfers dropped.
    pub fn execute(&mut self) -> Result<BatchSummary, BatchError> {
        if self.registry.is_done() {
            self.registry.clear();
            return Ok(BatchSummary::default());
        }
        let total = self.registry.queued_len();
        tracing::debug!(
            requests = total,
            max_concurrent = self.config.max_concurrent(),
            "executing batch"
        );

        let outcome = run::run_batch(&mut self.transport, &mut self.registry, &self.config);
        match &outcome {
            Ok(summary) => tracing::info!(
                requests = summary.completed,
                failed = summary.failed,
                peak_in_flight = summary.peak_in_flight,
                elapsed_ms = summary.elapsed.as_millis() as u64,
                "batch completed"
            ),
            Err(e) => {
                let abandoned = self.registry.queued_len() + self.registry.in_flight_len();
                tracing::error!(abandoned, error = %e, "batch aborted");
                for handle in self.registry.drain_in_flight() {
                    self.transport.cancel(handle);
                }
            }
        }
        self.registry.clear();
        outcome
    }
}
