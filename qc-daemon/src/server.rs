//! HTTP Server
//!
//! A single-threaded HTTP/1.1 server built on `tiny_http`. Requests are
//! handled one at a time, in arrival order. Routing and status mapping live in
//! [`handle_request`], which works on plain readers so it can be exercised
//! without a socket.
//!
//! Request bodies are read on a helper thread under [`READ_TIMEOUT`]. A client
//! that stops sending mid-body has its connection dropped instead of holding
//! up every request queued behind it.
//!
//! # Routes
//! - `GET  /api/v1/health`   - liveness probe
//! - `POST /api/v1/evaluate` - multipart upload of a `.log` file

use std::io::{self, Read};
use std::net::ToSocketAddrs;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use serde::Serialize;
use tiny_http::{Header, Method, Request, Response, Server};
use tracing::{debug, error, info, warn};

use qc_core::constants::daemon::{ACCEPT_POLL_INTERVAL, READ_TIMEOUT};
use qc_error::{QControllerError, Result};
use qc_protocol::{
    generate_request_id, ErrorResponse, EvaluationResponse, HealthResponse, EVALUATE_PATH,
    HEALTH_PATH,
};

use crate::upload::read_log_upload;

// ============================================================================
// Configuration
// ============================================================================

/// Runtime settings for the HTTP server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: String,
    pub max_upload_bytes: usize,
    pub read_timeout: Duration,
}

impl ServerConfig {
    /// Build a config, checking that `bind` names a usable socket address
    pub fn new(bind: impl Into<String>, max_upload_bytes: usize) -> Result<Self> {
        let bind = bind.into();
        let resolves = bind
            .to_socket_addrs()
            .map(|mut addrs| addrs.next().is_some())
            .unwrap_or(false);
        if !resolves {
            return Err(QControllerError::config(format!("invalid bind address '{}'", bind)));
        }
        Ok(Self {
            bind,
            max_upload_bytes,
            read_timeout: READ_TIMEOUT,
        })
    }
}

// ============================================================================
// Replies
// ============================================================================

/// Status code and JSON body of an HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

impl Reply {
    fn json<T: Serialize>(status: u16, value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(body) => Self { status, body },
            Err(e) => Self::error(&QControllerError::from(e)),
        }
    }

    fn detail(status: u16, detail: &str) -> Self {
        let body = serde_json::to_string(&ErrorResponse::new(detail))
            .unwrap_or_else(|_| r#"{"detail":"Internal Server Error"}"#.to_string());
        Self { status, body }
    }

    fn error(err: &QControllerError) -> Self {
        Self::detail(status_for(err), &err.detail())
    }
}

/// HTTP status for a failed request
pub fn status_for(err: &QControllerError) -> u16 {
    match err {
        QControllerError::UploadTooLarge { .. } => 413,
        e if e.is_client_error() => 400,
        _ => 500,
    }
}

// ============================================================================
// Request Handling
// ============================================================================

/// Route one request and produce its reply
pub fn handle_request<R: Read>(
    method: &Method,
    url: &str,
    content_type: Option<&str>,
    declared_len: Option<usize>,
    body: R,
    max_upload_bytes: usize,
) -> Reply {
    let path = url.split('?').next().unwrap_or(url);

    match (path, method) {
        (HEALTH_PATH, Method::Get) => Reply::json(200, &HealthResponse::healthy()),
        (EVALUATE_PATH, Method::Post) => {
            match evaluate_upload(content_type, declared_len, body, max_upload_bytes) {
                Ok(result) => Reply::json(200, &result),
                Err(e) if e.is_client_error() => {
                    warn!("Evaluation rejected: {}", e);
                    Reply::error(&e)
                }
                Err(e) => {
                    error!("Unhandled error during evaluation: {}", e);
                    Reply::error(&e)
                }
            }
        }
        (HEALTH_PATH, _) | (EVALUATE_PATH, _) => Reply::detail(405, "Method Not Allowed"),
        _ => Reply::detail(404, "Not Found"),
    }
}

fn evaluate_upload<R: Read>(
    content_type: Option<&str>,
    declared_len: Option<usize>,
    body: R,
    max_upload_bytes: usize,
) -> Result<EvaluationResponse> {
    let upload = read_log_upload(content_type, declared_len, body, max_upload_bytes)?;
    info!("Evaluating uploaded file {} ({} bytes)", upload.filename, upload.content.len());

    let report = qc_core::evaluate_log(&upload.content)?;
    Ok(report.into())
}

fn header_value(request: &Request, name: &'static str) -> Option<String> {
    request
        .headers()
        .iter()
        .find(|header| header.field.equiv(name))
        .map(|header| header.value.as_str().to_string())
}

/// Outcome of reading a request body off the accept thread
pub enum BodyRead<T> {
    /// The read finished (or failed) in time; the source is handed back
    Complete { source: T, body: io::Result<Vec<u8>> },
    /// The read did not finish within the timeout
    TimedOut,
    /// No reader thread could be started
    Unavailable(io::Error),
}

/// Run `read` against `source` on a helper thread, waiting at most `timeout`
///
/// After a timeout the source stays with the helper thread and is dropped
/// once the blocked read returns.
pub fn read_body<T, F>(source: T, read: F, timeout: Duration) -> BodyRead<T>
where
    T: Send + 'static,
    F: FnOnce(&mut T) -> io::Result<Vec<u8>> + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    let spawned = thread::Builder::new()
        .name("qc-body-reader".to_string())
        .spawn(move || {
            let mut source = source;
            let body = read(&mut source);
            // Receiver is gone if the caller already gave up
            let _ = tx.send((source, body));
        });

    if let Err(e) = spawned {
        return BodyRead::Unavailable(e);
    }

    match rx.recv_timeout(timeout) {
        Ok((source, body)) => BodyRead::Complete { source, body },
        Err(_) => BodyRead::TimedOut,
    }
}

fn respond(request: Request, reply: Reply, request_id: u64) {
    let mut response = Response::from_string(reply.body).with_status_code(reply.status);
    match Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]) {
        Ok(header) => response = response.with_header(header),
        Err(()) => warn!("[{}] Could not build Content-Type header", request_id),
    }

    if let Err(e) = request.respond(response) {
        warn!("[{}] Failed to send response: {}", request_id, e);
    }
}

/// Answer a single request on the wire
fn serve(request: Request, config: &ServerConfig) {
    let request_id = generate_request_id();
    let method = request.method().clone();
    let url = request.url().to_string();
    let content_type = header_value(&request, "Content-Type");
    let declared_len = request.body_length();

    debug!(
        "[{}] {} {} (content-type={:?}, length={:?})",
        request_id, method, url, content_type, declared_len
    );

    let limit = config.max_upload_bytes as u64 + 1;
    let read = move |request: &mut Request| -> io::Result<Vec<u8>> {
        let mut raw = Vec::new();
        request.as_reader().take(limit).read_to_end(&mut raw)?;
        Ok(raw)
    };

    let (request, raw) = match read_body(request, read, config.read_timeout) {
        BodyRead::Complete { source, body: Ok(raw) } => (source, raw),
        BodyRead::Complete { source, body: Err(e) } => {
            warn!("[{}] Failed to read request body: {}", request_id, e);
            respond(source, Reply::error(&QControllerError::from(e)), request_id);
            return;
        }
        BodyRead::TimedOut => {
            warn!(
                "[{}] {} {} body not received within {:?}, dropping connection",
                request_id, method, url, config.read_timeout
            );
            return;
        }
        BodyRead::Unavailable(e) => {
            error!("[{}] Could not start body reader: {}", request_id, e);
            return;
        }
    };

    let reply = handle_request(
        &method,
        &url,
        content_type.as_deref(),
        declared_len,
        &raw[..],
        config.max_upload_bytes,
    );
    info!("[{}] {} {} -> {}", request_id, method, url, reply.status);

    respond(request, reply, request_id);
}

// ============================================================================
// Server
// ============================================================================

/// Serve requests until `shutdown` is set
pub fn run_server(config: &ServerConfig, shutdown: &AtomicBool) -> Result<()> {
    let server = Server::http(config.bind.as_str())
        .map_err(|e| QControllerError::generic(format!("Failed to bind {}: {}", config.bind, e)))?;

    info!("Listening on http://{}", config.bind);
    info!(
        "Limits: max_upload={} bytes, read_timeout={:?}",
        config.max_upload_bytes, config.read_timeout
    );

    let mut handled: u64 = 0;
    while !shutdown.load(Ordering::SeqCst) {
        match server.recv_timeout(ACCEPT_POLL_INTERVAL) {
            Ok(Some(request)) => {
                serve(request, config);
                handled += 1;
            }
            Ok(None) => {}
            Err(e) => error!("Accept error: {}", e),
        }
    }

    info!("Server stopped (handled {} requests)", handled);
    Ok(())
}
