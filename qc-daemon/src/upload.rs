//! Multipart upload extraction
//!
//! Pulls the uploaded log file out of a `multipart/form-data` request body.
//! The body is read under a hard byte limit before any parsing happens.

use std::io::{Cursor, Read};

use multipart::server::Multipart;
use tracing::{debug, warn};

use qc_error::{QControllerError, Result};
use qc_protocol::{validate_upload_filename, UPLOAD_FIELD};

/// A log file received from a client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogUpload {
    pub filename: String,
    pub content: String,
}

/// Extract the boundary from a `multipart/form-data` content type
pub fn multipart_boundary(content_type: &str) -> Option<String> {
    let mut parts = content_type.split(';');
    let mime = parts.next()?.trim();
    if !mime.eq_ignore_ascii_case("multipart/form-data") {
        return None;
    }

    parts
        .filter_map(|param| param.split_once('='))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("boundary"))
        .map(|(_, value)| value.trim().trim_matches('"').to_string())
        .filter(|boundary| !boundary.is_empty())
}

/// Read at most `max_bytes` from `body`
///
/// Fails with `UploadTooLarge` as soon as one byte past the limit is seen.
fn read_limited<R: Read>(body: R, max_bytes: usize) -> Result<Vec<u8>> {
    let mut raw = Vec::new();
    body.take(max_bytes as u64 + 1).read_to_end(&mut raw)?;
    if raw.len() > max_bytes {
        return Err(QControllerError::UploadTooLarge {
            size: raw.len(),
            max_size: max_bytes,
        });
    }
    Ok(raw)
}

/// Read the `file` field of a multipart request
///
/// # Errors
/// - `InvalidMultipart` if the request is not well-formed multipart
/// - `UploadTooLarge` if the declared or actual body exceeds `max_bytes`
/// - `MissingUpload` if no file was sent in the `file` field
/// - `InvalidFileType` if the file name does not end in `.log`
/// - `InvalidEncoding` if the file is not UTF-8
pub fn read_log_upload<R: Read>(
    content_type: Option<&str>,
    declared_len: Option<usize>,
    body: R,
    max_bytes: usize,
) -> Result<LogUpload> {
    let boundary = content_type
        .and_then(multipart_boundary)
        .ok_or_else(|| QControllerError::multipart("expected multipart/form-data with a boundary"))?;

    if let Some(size) = declared_len {
        if size > max_bytes {
            return Err(QControllerError::UploadTooLarge { size, max_size: max_bytes });
        }
    }

    let raw = read_limited(body, max_bytes)?;
    debug!("Read {} byte multipart body", raw.len());

    let mut form = Multipart::with_body(Cursor::new(raw), boundary);
    loop {
        let entry = form
            .read_entry()
            .map_err(|e| QControllerError::multipart(e.to_string()))?;
        let Some(mut field) = entry else {
            break;
        };

        if &*field.headers.name != UPLOAD_FIELD {
            debug!("Skipping form field '{}'", field.headers.name);
            continue;
        }

        let Some(filename) = field.headers.filename.clone() else {
            warn!("Form field '{}' carries no file", UPLOAD_FIELD);
            return Err(QControllerError::MissingUpload(UPLOAD_FIELD.to_string()));
        };

        if let Err(reason) = validate_upload_filename(&filename) {
            warn!("Rejected upload '{}': {}", filename, reason);
            return Err(QControllerError::InvalidFileType(filename));
        }

        let mut bytes = Vec::new();
        field.data.read_to_end(&mut bytes)?;
        let content = String::from_utf8(bytes).map_err(|_| QControllerError::InvalidEncoding)?;

        return Ok(LogUpload { filename, content });
    }

    Err(QControllerError::MissingUpload(UPLOAD_FIELD.to_string()))
}
