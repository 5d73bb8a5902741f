//! Request log middleware and its destination.
//!
//! Every request produces exactly one JSON line. The line goes to the
//! console, or (when file logging is enabled) to both the console and
//! [`LOG_FILE_NAME`] through a fan-out writer.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use axum::{
    body::HttpBody,
    extract::{ConnectInfo, Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Request log file, relative to the working directory.
pub const LOG_FILE_NAME: &str = "ocap.log";

const X_REQUEST_ID: &str = "x-request-id";

/// Writer that duplicates every write to two destinations.
#[derive(Debug)]
pub struct FanOut<A, B> {
    first: A,
    second: B,
}

impl<A: Write, B: Write> FanOut<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }

    pub fn into_inner(self) -> (A, B) {
        (self.first, self.second)
    }
}

impl<A: Write, B: Write> Write for FanOut<A, B> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.first.write_all(buf)?;
        self.second.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.first.flush()?;
        self.second.flush()
    }
}

enum Destination {
    Console,
    ConsoleAndFile { file: Mutex<File>, path: PathBuf },
}

/// Destination for request log lines.
///
/// Cloning shares the underlying file handle. The file stays open until the
/// last clone is dropped, which for the router's copy is process exit.
#[derive(Clone)]
pub struct LogSink {
    destination: Arc<Destination>,
}

impl LogSink {
    /// Console only. Touches no files.
    pub fn console() -> Self {
        Self {
            destination: Arc::new(Destination::Console),
        }
    }

    /// Console plus the file at `path`, opened for append and created if absent.
    pub fn open(path: &Path) -> io::Result<Self> {
        let mut options = OpenOptions::new();
        options.read(true).append(true).create(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o666);
        }
        let file = options.open(path)?;

        Ok(Self {
            destination: Arc::new(Destination::ConsoleAndFile {
                file: Mutex::new(file),
                path: path.to_path_buf(),
            }),
        })
    }

    /// Path of the log file, if file logging is active.
    pub fn file_path(&self) -> Option<&Path> {
        match self.destination.as_ref() {
            Destination::Console => None,
            Destination::ConsoleAndFile { path, .. } => Some(path),
        }
    }

    /// Write one line (a newline is appended) to every destination.
    pub fn write_line(&self, line: &str) -> io::Result<()> {
        let mut buf = Vec::with_capacity(line.len() + 1);
        buf.extend_from_slice(line.as_bytes());
        buf.push(b'\n');

        match self.destination.as_ref() {
            Destination::Console => io::stdout().lock().write_all(&buf),
            Destination::ConsoleAndFile { file, .. } => {
                let mut file = file
                    .lock()
                    .map_err(|_| io::Error::new(io::ErrorKind::Other, "log file lock poisoned"))?;
                let mut out = FanOut::new(io::stdout().lock(), &mut *file);
                out.write_all(&buf)?;
                out.flush()
            }
        }
    }
}

impl std::fmt::Debug for LogSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogSink")
            .field("file", &self.file_path())
            .finish()
    }
}

/// One request log line.
#[derive(Debug, Serialize)]
struct AccessLogEntry<'a> {
    time: String,
    id: &'a str,
    remote_ip: String,
    host: &'a str,
    method: &'a str,
    uri: &'a str,
    user_agent: &'a str,
    status: u16,
    latency: u64,
    latency_human: String,
    bytes_out: u64,
}

/// Middleware writing one access log line per request to the [`LogSink`].
pub async fn request_logger(State(sink): State<LogSink>, request: Request, next: Next) -> Response {
    let start = Instant::now();

    let (id, host, user_agent) = {
        let headers = request.headers();
        let header_str = |name: header::HeaderName| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("")
                .to_string()
        };
        let id = match header_str(header::HeaderName::from_static(X_REQUEST_ID)) {
            id if id.is_empty() => Uuid::new_v4().to_string(),
            id => id,
        };
        (id, header_str(header::HOST), header_str(header::USER_AGENT))
    };
    let remote_ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_default();
    let method = request.method().to_string();
    let uri = request.uri().to_string();

    let response = next.run(request).await;

    let elapsed = start.elapsed();
    let bytes_out = response
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .or_else(|| response.body().size_hint().exact())
        .unwrap_or(0);

    let entry = AccessLogEntry {
        time: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        id: &id,
        remote_ip,
        host: &host,
        method: &method,
        uri: &uri,
        user_agent: &user_agent,
        status: response.status().as_u16(),
        latency: u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX),
        latency_human: format!("{:?}", elapsed),
        bytes_out,
    };

    match serde_json::to_string(&entry) {
        Ok(line) => {
            if let Err(e) = sink.write_line(&line) {
                tracing::warn!(error = %e, "Failed to write request log");
            }
        }
        Err(e) => tracing::warn!(error = %e, "Failed to encode request log"),
    }

    response
}
