//! Curl multi transport: one `curl::multi::Multi`, one Easy2 handle per transfer.
//!
//! `poll` performs pending work and, when nothing has finished yet, blocks on
//! socket readiness (`Multi::wait`) instead of sleeping.

use std::collections::HashMap;
use std::time::Duration;

use curl::easy::{Easy2, List};
use curl::multi::{Easy2Handle, Multi};

use crate::error::TransportError;
use crate::request::{Method, TransferRequest};

use super::handler::Collector;
use super::{Completion, FinishedTransfer, Handle, TransferError, TransferInfo, Transport};

/// Version string of the linked libcurl.
pub fn curl_version() -> String {
    curl::Version::get().version().to_string()
}

pub struct CurlTransport {
    multi: Multi,
    active: HashMap<Handle, Easy2Handle<Collector>>,
    completed: Vec<Completion>,
    next_token: usize,
}

impl CurlTransport {
    pub fn new() -> Self {
        Self {
            multi: Multi::new(),
            active: HashMap::new(),
            completed: Vec::new(),
            next_token: 0,
        }
    }

    fn collect_messages(&mut self) {
        let completed = &mut self.completed;
        self.multi.messages(|msg| {
            let token = match msg.token() {
                Ok(t) => t,
                Err(e) => {
                    tracing::warn!("curl message without token: {}", e);
                    return;
                }
            };
            if let Some(result) = msg.result() {
                completed.push(Completion {
                    handle: Handle(token),
                    result: result.map_err(TransferError::from),
                });
            }
        });
    }
}

impl Default for CurlTransport {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply a resolved request to a fresh easy handle.
fn configure(easy: &mut Easy2<Collector>, req: &TransferRequest) -> Result<(), curl::Error> {
    let opts = &req.options;
    easy.url(&req.url)?;
    if opts.no_signal.unwrap_or(true) {
        easy.signal(false)?;
    }
    if let Some(t) = opts.connect_timeout {
        easy.connect_timeout(t)?;
    }
    if let Some(t) = opts.timeout {
        easy.timeout(t)?;
    }
    if let Some(follow) = opts.follow_redirects {
        easy.follow_location(follow)?;
    }
    if let Some(n) = opts.max_redirects {
        easy.max_redirections(n)?;
    }
    if let Some(ref ua) = opts.user_agent {
        easy.useragent(ua)?;
    }
    if let Some(ref referer) = opts.referer {
        easy.referer(referer)?;
    }
    if let Some(ref enc) = opts.accept_encoding {
        easy.accept_encoding(enc)?;
    }
    if let Some(verify) = opts.verify_peer {
        easy.ssl_verify_peer(verify)?;
    }
    if let Some(verbose) = opts.verbose {
        easy.verbose(verbose)?;
    }
    if opts.captures_headers() {
        easy.show_header(true)?;
    }
    if req.method == Method::Post {
        easy.post(true)?;
        easy.post_fields_copy(req.body.as_deref().unwrap_or_default())?;
    }
    if !req.headers.is_empty() {
        let mut list = List::new();
        for line in req.header_lines() {
            list.append(&line)?;
        }
        easy.http_headers(list)?;
    }
    Ok(())
}

impl Transport for CurlTransport {
    fn start(&mut self, request: &TransferRequest) -> Result<Handle, TransportError> {
        let mut easy = Easy2::new(Collector::default());
        configure(&mut easy, request)?;
        let handle = Handle(self.next_token);
        self.next_token += 1;
        let mut h = self.multi.add2(easy)?;
        h.set_token(handle.0)?;
        self.active.insert(handle, h);
        Ok(handle)
    }

    fn poll(&mut self, max_wait: Duration) -> Result<(), TransportError> {
        let running = self.multi.perform()?;
        self.collect_messages();
        if self.completed.is_empty() && running > 0 {
            self.multi.wait(&mut [], max_wait)?;
            self.multi.perform()?;
            self.collect_messages();
        }
        Ok(())
    }

    fn drain_completions(&mut self) -> Vec<Completion> {
        std::mem::take(&mut self.completed)
    }

    fn finish(&mut self, handle: Handle) -> Result<FinishedTransfer, TransportError> {
        let h = self
            .active
            .remove(&handle)
            .ok_or(TransportError::UnknownHandle(handle))?;
        let mut easy = self.multi.remove2(h)?;
        let info = TransferInfo::read(&mut easy);
        let body = std::mem::take(&mut easy.get_mut().body);
        Ok(FinishedTransfer { body, info })
    }

    fn cancel(&mut self, handle: Handle) {
        if let Some(h) = self.active.remove(&handle) {
            if let Err(e) = self.multi.remove2(h) {
                tracing::debug!(%handle, "curl multi remove on cancel: {}", e);
            }
        }
    }
}
