//! Minimal HTTP/1.1 endpoint for upload tests.
//!
//! Accepts one connection, reads one request (Content-Length or chunked
//! body), answers with a fixed status and body, and hands the request back
//! through [`UploadStub::request`].

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpListener};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Request as received by the stub
#[derive(Debug, Clone, Default)]
pub struct RecordedRequest {
    pub request_line: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// True when `needle` occurs in the raw body
    pub fn body_contains(&self, needle: &[u8]) -> bool {
        !needle.is_empty() && self.body.windows(needle.len()).any(|w| w == needle)
    }
}

pub struct UploadStub {
    addr: SocketAddr,
    handle: JoinHandle<RecordedRequest>,
}

impl UploadStub {
    /// Serve one request, answering `status` with a JSON `body`.
    pub fn start(status: u16, body: &str) -> Self {
        Self::start_delayed(status, body, Duration::ZERO)
    }

    /// Like [`UploadStub::start`], waiting `delay` after reading the request.
    pub fn start_delayed(status: u16, body: &str, delay: Duration) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let body = body.to_string();

        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            stream
                .set_read_timeout(Some(Duration::from_secs(60)))
                .unwrap();
            let mut reader = BufReader::new(stream);
            let request = read_request(&mut reader);

            thread::sleep(delay);
            let mut stream = reader.into_inner();
            let response = format!(
                "HTTP/1.1 {status} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                reason(status),
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
            request
        });

        Self { addr, handle }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Wait for the request to be served and return it
    pub fn request(self) -> RecordedRequest {
        self.handle.join().expect("stub server panicked")
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        501 => "Not Implemented",
        _ => "Status",
    }
}

fn read_request<R: BufRead>(reader: &mut R) -> RecordedRequest {
    let mut request = RecordedRequest::default();

    let mut line = String::new();
    reader.read_line(&mut line).unwrap();
    request.request_line = line.trim_end().to_string();

    loop {
        line.clear();
        reader.read_line(&mut line).unwrap();
        let trimmed = line.trim_end();
        if trimmed.is_empty() {
            break;
        }
        if let Some((key, value)) = trimmed.split_once(':') {
            request
                .headers
                .push((key.trim().to_string(), value.trim().to_string()));
        }
    }

    let chunked = request
        .header("transfer-encoding")
        .is_some_and(|v| v.eq_ignore_ascii_case("chunked"));
    if chunked {
        request.body = read_chunked(reader);
    } else if let Some(length) = request.header("content-length") {
        let length: usize = length.parse().unwrap();
        let mut body = vec![0u8; length];
        reader.read_exact(&mut body).unwrap();
        request.body = body;
    }
    request
}

fn read_chunked<R: BufRead>(reader: &mut R) -> Vec<u8> {
    let mut body = Vec::new();
    let mut line = String::new();
    loop {
        line.clear();
        reader.read_line(&mut line).unwrap();
        let size_field = line.trim_end().split(';').next().unwrap_or("0");
        let size = usize::from_str_radix(size_field.trim(), 16).unwrap();
        if size == 0 {
            // trailer section ends with an empty line
            loop {
                line.clear();
                reader.read_line(&mut line).unwrap();
                if line.trim_end().is_empty() {
                    return body;
                }
            }
        }
        let start = body.len();
        body.resize(start + size, 0);
        reader.read_exact(&mut body[start..]).unwrap();
        line.clear();
        reader.read_line(&mut line).unwrap();
    }
}
