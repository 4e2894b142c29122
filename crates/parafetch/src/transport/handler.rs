//! Easy2 handler that buffers the whole response in memory.

/// Response buffer for one transfer. With header capture enabled libcurl
/// writes the header block into the same stream ahead of the payload.
#[derive(Debug, Default)]
pub(super) struct Collector {
    pub(super) body: Vec<u8>,
}

impl curl::easy::Handler for Collector {
    fn write(&mut self, data: &[u8]) -> Result<usize, curl::easy::WriteError> {
        self.body.extend_from_slice(data);
        Ok(data.len())
    }
}
