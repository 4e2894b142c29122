//! Minimal HTTP/1.1 server for integration tests.
//!
//! One thread per connection, `Connection: close` on every response. Routes:
//! - `/slow/<ms>`: sleep, then answer `slept <ms>`
//! - `/echo`: answer `<METHOD> <path>` followed by the request body, if any
//! - `/header/<name>`: answer the value of request header `<name>` (or `-`)
//! - `/status/<code>`: answer with that status and an empty body
//! - anything else: `ok <path>`
//!
//! Tracks how many requests are being handled at once.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Default)]
pub struct Stats {
    active: AtomicUsize,
    peak: AtomicUsize,
    served: AtomicUsize,
}

impl Stats {
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn served(&self) -> usize {
        self.served.load(Ordering::SeqCst)
    }
}

pub struct TestServer {
    pub base: String,
    pub stats: Arc<Stats>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path.trim_start_matches('/'))
    }
}

/// Starts the server in a background thread; runs until the process exits.
pub fn start() -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let stats = Arc::new(Stats::default());
    let st = Arc::clone(&stats);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let st = Arc::clone(&st);
            thread::spawn(move || handle(stream, &st));
        }
    });
    TestServer {
        base: format!("http://127.0.0.1:{}/", port),
        stats,
    }
}

/// A URL on a port nobody listens on.
pub fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/", port)
}

struct Request {
    method: String,
    path: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

fn handle(mut stream: TcpStream, stats: &Stats) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(5)));
    let req = match read_request(&mut stream) {
        Some(r) => r,
        None => return,
    };

    let now = stats.active.fetch_add(1, Ordering::SeqCst) + 1;
    stats.peak.fetch_max(now, Ordering::SeqCst);

    let (status, body) = route(&req);
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        body.len()
    );

    stats.active.fetch_sub(1, Ordering::SeqCst);
    stats.served.fetch_add(1, Ordering::SeqCst);
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.write_all(&body);
    let _ = stream.flush();
}

fn route(req: &Request) -> (String, Vec<u8>) {
    let path = req.path.as_str();
    if let Some(ms) = path.strip_prefix("/slow/") {
        let ms: u64 = ms.parse().unwrap_or(0);
        thread::sleep(Duration::from_millis(ms));
        return ("200 OK".to_string(), format!("slept {}", ms).into_bytes());
    }
    if path.starts_with("/echo") {
        let mut body = format!("{} {}", req.method, path).into_bytes();
        if !req.body.is_empty() {
            body.push(b'\n');
            body.extend_from_slice(&req.body);
        }
        return ("200 OK".to_string(), body);
    }
    if let Some(name) = path.strip_prefix("/header/") {
        let value = req
            .headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.clone())
            .unwrap_or_else(|| "-".to_string());
        return ("200 OK".to_string(), value.into_bytes());
    }
    if let Some(code) = path.strip_prefix("/status/") {
        return (format!("{} Test", code), Vec::new());
    }
    ("200 OK".to_string(), format!("ok {}", path).into_bytes())
}

fn read_request(stream: &mut TcpStream) -> Option<Request> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let head_end = loop {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = std::str::from_utf8(&buf[..head_end]).ok()?;
    let mut lines = head.lines();
    let mut first = lines.next()?.split_whitespace();
    let method = first.next()?.to_string();
    let path = first.next()?.to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|l| l.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);
    let mut body = buf[head_end..].to_vec();
    while body.len() < content_length {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }
    body.truncate(content_length);

    Some(Request {
        method,
        path,
        headers,
        body,
    })
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
