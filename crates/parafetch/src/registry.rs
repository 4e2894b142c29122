//! Request registry: the FIFO queue of not-yet-started requests and the
//! in-flight map from transport handle back to the originating request.

use std::collections::HashMap;
use std::time::Instant;

use crate::request::RequestSpec;
use crate::scheduler::Callback;
use crate::transport::Handle;

/// One admitted request, owned by the registry until its completion is processed.
#[derive(Debug)]
pub struct InFlightEntry {
    /// Stable index returned by `add_request`.
    pub index: usize,
    pub spec: RequestSpec,
    /// Callback resolved at admission (own, else batch default).
    pub callback: Option<Callback>,
    pub capture_headers: bool,
    pub started: Instant,
}

#[derive(Debug, Default)]
pub struct RequestRegistry {
    /// Slot per enqueued request; emptied when the request is admitted.
    slots: Vec<Option<RequestSpec>>,
    /// Index of the next request to admit.
    next: usize,
    in_flight: HashMap<Handle, InFlightEntry>,
}

impl RequestRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a request and return its stable index in the batch.
    pub fn push(&mut self, spec: RequestSpec) -> usize {
        self.slots.push(Some(spec));
        self.slots.len() - 1
    }

    /// Take the next queued request in insertion order.
    pub fn next_queued(&mut self) -> Option<(usize, RequestSpec)> {
        while self.next < self.slots.len() {
            let index = self.next;
            self.next += 1;
            if let Some(spec) = self.slots[index].take() {
                return Some((index, spec));
            }
        }
        None
    }

    pub fn admit(&mut self, handle: Handle, entry: InFlightEntry) {
        self.in_flight.insert(handle, entry);
    }

    /// Remove and return the entry for a completed handle.
    pub fn complete(&mut self, handle: Handle) -> Option<InFlightEntry> {
        self.in_flight.remove(&handle)
    }

    pub fn queued_len(&self) -> usize {
        self.slots.len() - self.next
    }

    pub fn in_flight_len(&self) -> usize {
        self.in_flight.len()
    }

    /// Total requests enqueued in this batch, admitted or not.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_done(&self) -> bool {
        self.queued_len() == 0 && self.in_flight.is_empty()
    }

    /// Remove every in-flight entry and return their handles (abort path).
    pub fn drain_in_flight(&mut self) -> Vec<Handle> {
        self.in_flight.drain().map(|(h, _)| h).collect()
    }

    /// Discard the batch: queue, consumed slots and in-flight map.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.next = 0;
        self.in_flight.clear();
    }
}
