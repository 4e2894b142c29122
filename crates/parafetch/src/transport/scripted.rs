//! In-memory transport for scheduler tests. Each URL completes after a
//! scripted number of polls with a scripted outcome.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use crate::error::TransportError;
use crate::request::TransferRequest;

use super::{Completion, FinishedTransfer, Handle, TransferError, TransferInfo, Transport};

#[derive(Debug, Clone)]
pub(crate) struct Script {
    /// Polls until completion (at least 1).
    pub polls: u32,
    pub outcome: Result<Vec<u8>, TransferError>,
    pub header_size: u64,
}

impl Script {
    pub fn ok(polls: u32, body: &[u8]) -> Self {
        Self {
            polls,
            outcome: Ok(body.to_vec()),
            header_size: 0,
        }
    }

    pub fn failed(polls: u32, error: TransferError) -> Self {
        Self {
            polls,
            outcome: Err(error),
            header_size: 0,
        }
    }

    pub fn with_header_size(mut self, n: u64) -> Self {
        self.header_size = n;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Event {
    Started(String),
    Finished(String),
    Cancelled(String),
}

struct Active {
    handle: Handle,
    url: String,
    remaining: u32,
}

#[derive(Default)]
pub(crate) struct ScriptedTransport {
    scripts: HashMap<String, Script>,
    active: Vec<Active>,
    done: HashMap<Handle, (String, Script)>,
    live: HashSet<Handle>,
    completed: Vec<Completion>,
    next: usize,
    polls: u32,
    /// Poll number (1-based) on which `poll` fails.
    pub fail_on_poll: Option<u32>,
    pub events: Vec<Event>,
    pub requests: Vec<TransferRequest>,
    pub peak_live: usize,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(mut self, url: &str, script: Script) -> Self {
        self.scripts.insert(url.to_string(), script);
        self
    }

    fn script_for(&self, url: &str) -> Script {
        self.scripts
            .get(url)
            .cloned()
            .unwrap_or_else(|| Script::ok(1, url.as_bytes()))
    }

    pub fn started_urls(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Started(u) => Some(u.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn live(&self) -> usize {
        self.live.len()
    }
}

impl Transport for ScriptedTransport {
    fn start(&mut self, request: &TransferRequest) -> Result<Handle, TransportError> {
        let handle = Handle(self.next);
        self.next += 1;
        let remaining = self.script_for(&request.url).polls.max(1);
        self.active.push(Active {
            handle,
            url: request.url.clone(),
            remaining,
        });
        self.live.insert(handle);
        self.peak_live = self.peak_live.max(self.live.len());
        self.events.push(Event::Started(request.url.clone()));
        self.requests.push(request.clone());
        Ok(handle)
    }

    fn poll(&mut self, _max_wait: Duration) -> Result<(), TransportError> {
        self.polls += 1;
        if self.fail_on_poll == Some(self.polls) {
            return Err(TransportError::Other("scripted poll failure".to_string()));
        }
        let mut still_active = Vec::new();
        for mut a in std::mem::take(&mut self.active) {
            a.remaining -= 1;
            if a.remaining == 0 {
                let script = self.script_for(&a.url);
                let result = script.outcome.as_ref().map(|_| ()).map_err(|e| e.clone());
                self.completed.push(Completion {
                    handle: a.handle,
                    result,
                });
                self.done.insert(a.handle, (a.url, script));
            } else {
                still_active.push(a);
            }
        }
        self.active = still_active;
        Ok(())
    }

    fn drain_completions(&mut self) -> Vec<Completion> {
        std::mem::take(&mut self.completed)
    }

    fn finish(&mut self, handle: Handle) -> Result<FinishedTransfer, TransportError> {
        let (url, script) = self
            .done
            .remove(&handle)
            .ok_or(TransportError::UnknownHandle(handle))?;
        self.live.remove(&handle);
        self.events.push(Event::Finished(url.clone()));
        let response_code = if script.outcome.is_ok() { 200 } else { 0 };
        Ok(FinishedTransfer {
            body: script.outcome.unwrap_or_default(),
            info: TransferInfo {
                response_code,
                effective_url: Some(url),
                header_size: script.header_size,
                ..TransferInfo::default()
            },
        })
    }

    fn cancel(&mut self, handle: Handle) {
        if self.live.remove(&handle) {
            let url = self
                .active
                .iter()
                .find(|a| a.handle == handle)
                .map(|a| a.url.clone())
                .or_else(|| self.done.get(&handle).map(|(u, _)| u.clone()))
                .unwrap_or_default();
            self.active.retain(|a| a.handle != handle);
            self.done.remove(&handle);
            self.events.push(Event::Cancelled(url));
        }
    }
}
