//! Transfer metadata read back from a finished easy handle.

use serde::Serialize;
use std::time::Duration;

/// Metadata about a finished transfer. Fields the transport could not
/// report are left at their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TransferInfo {
    /// Last HTTP status code received; 0 when no response arrived.
    pub response_code: u32,
    pub effective_url: Option<String>,
    pub content_type: Option<String>,
    pub primary_ip: Option<String>,
    pub redirect_count: u32,
    /// Size of the received header block(s) in bytes.
    pub header_size: u64,
    pub download_size: f64,
    /// `Content-Length` as announced by the server, if any.
    pub content_length: Option<f64>,
    pub namelookup_time: Duration,
    pub connect_time: Duration,
    pub starttransfer_time: Duration,
    pub total_time: Duration,
}

impl TransferInfo {
    pub(super) fn read<H>(easy: &mut curl::easy::Easy2<H>) -> TransferInfo {
        TransferInfo {
            response_code: easy.response_code().unwrap_or(0),
            effective_url: easy.effective_url().ok().flatten().map(str::to_string),
            content_type: easy.content_type().ok().flatten().map(str::to_string),
            primary_ip: easy.primary_ip().ok().flatten().map(str::to_string),
            redirect_count: easy.redirect_count().unwrap_or(0),
            header_size: easy.header_size().unwrap_or(0),
            download_size: easy.download_size().unwrap_or(0.0),
            // libcurl reports -1 when the length is unknown
            content_length: easy.content_length_download().ok().filter(|n| *n >= 0.0),
            namelookup_time: easy.namelookup_time().unwrap_or_default(),
            connect_time: easy.connect_time().unwrap_or_default(),
            starttransfer_time: easy.starttransfer_time().unwrap_or_default(),
            total_time: easy.total_time().unwrap_or_default(),
        }
    }
}
