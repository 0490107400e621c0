//! HTTP response handlers.

use anyhow::{Result, anyhow};
use routelit::app::stream::BlockingStream;
use routelit::core::Action;
use serde_json::{Value, json};
use std::io::{self, Read};
use tiny_http::{Header, Request, Response, StatusCode};

const JSON: &str = "application/json";
const NDJSON: &str = "application/x-ndjson";

/// Respond with a JSON document.
pub fn send_json(request: Request, status: u16, body: &Value, cookie: Option<&str>) -> Result<()> {
    let mut response = Response::from_data(serde_json::to_vec(body)?)
        .with_status_code(StatusCode(status))
        .with_header(make_header("Content-Type", JSON)?);
    if let Some(cookie) = cookie {
        response = response.with_header(make_header("Set-Cookie", cookie)?);
    }
    request.respond(response)?;
    Ok(())
}

/// Respond with newline-delimited actions, written as they arrive.
pub fn send_stream(request: Request, stream: BlockingStream<Action>, cookie: Option<&str>) -> Result<()> {
    let mut headers = vec![make_header("Content-Type", NDJSON)?];
    if let Some(cookie) = cookie {
        headers.push(make_header("Set-Cookie", cookie)?);
    }
    let response = Response::new(StatusCode(200), headers, NdjsonReader::new(stream), None, None);
    request.respond(response)?;
    Ok(())
}

pub fn send_error(request: Request, status: u16, message: &str) -> Result<()> {
    send_json(request, status, &json!({ "error": message }), None)
}

/// Respond with 404 Not Found.
pub fn respond_not_found(request: Request) -> Result<()> {
    send_error(request, 404, "404 Not Found")
}

/// Respond with 503 Service Unavailable (server shutting down).
pub fn respond_unavailable(request: Request) -> Result<()> {
    send_error(request, 503, "503 Service Unavailable")
}

fn make_header(key: &str, value: &str) -> Result<Header> {
    Header::from_bytes(key.as_bytes(), value.as_bytes()).map_err(|()| anyhow!("invalid header `{key}`"))
}

// ============================================================================
// NDJSON body
// ============================================================================

/// `Read` adapter serialising one action per line.
struct NdjsonReader {
    stream: BlockingStream<Action>,
    line: Vec<u8>,
    pos: usize,
}

impl NdjsonReader {
    fn new(stream: BlockingStream<Action>) -> Self {
        Self {
            stream,
            line: Vec::new(),
            pos: 0,
        }
    }
}

impl Read for NdjsonReader {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        while self.pos >= self.line.len() {
            match self.stream.next() {
                None => return Ok(0),
                Some(Ok(action)) => {
                    self.line = serde_json::to_vec(&action).map_err(io::Error::other)?;
                    self.line.push(b'\n');
                    self.pos = 0;
                }
                Some(Err(e)) => return Err(io::Error::other(e.to_string())),
            }
        }
        let n = out.len().min(self.line.len() - self.pos);
        out[..n].copy_from_slice(&self.line[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}
