use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global request ID counter for correlation
static REQUEST_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Liveness check route
pub const HEALTH_PATH: &str = "/api/v1/health";

/// Log evaluation route
pub const EVALUATE_PATH: &str = "/api/v1/evaluate";

/// Multipart field carrying the uploaded log
pub const UPLOAD_FIELD: &str = "file";

/// Required extension of uploaded log files
pub const LOG_FILE_EXTENSION: &str = ".log";

/// Maximum length of an uploaded file name
const MAX_FILENAME_LENGTH: usize = 255;

/// Generate a unique request ID for correlation
pub fn generate_request_id() -> u64 {
    REQUEST_ID_COUNTER.fetch_add(1, Ordering::SeqCst)
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
}

/// Body of `GET /api/v1/health`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: HealthStatus,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self { status: HealthStatus::Healthy }
    }
}

/// Body of every non-2xx response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub detail: String,
}

impl ErrorResponse {
    pub fn new(detail: impl Into<String>) -> Self {
        Self { detail: detail.into() }
    }
}

/// Body of a successful `POST /api/v1/evaluate`
///
/// Serialized as a flat JSON object `{"<sensor>": "<label>", ...}` whose key
/// order is the order the sensors were declared in the log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvaluationResponse {
    entries: Vec<(String, String)>,
    /// Sensor name -> position in `entries`
    index: HashMap<String, usize>,
}

impl EvaluationResponse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the label of a sensor, keeping first-insert position
    pub fn insert(&mut self, sensor: impl Into<String>, label: impl Into<String>) {
        let sensor = sensor.into();
        let label = label.into();
        match self.index.get(&sensor) {
            Some(&position) => self.entries[position].1 = label,
            None => {
                self.index.insert(sensor.clone(), self.entries.len());
                self.entries.push((sensor, label));
            }
        }
    }

    pub fn get(&self, sensor: &str) -> Option<&str> {
        self.index
            .get(sensor)
            .map(|&position| self.entries[position].1.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, l)| (n.as_str(), l.as_str()))
    }
}

impl Serialize for EvaluationResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (sensor, label) in &self.entries {
            map.serialize_entry(sensor, label)?;
        }
        map.end()
    }
}

/// Validate the name of an uploaded log file
pub fn validate_upload_filename(name: &str) -> Result<(), &'static str> {
    if name.len() > MAX_FILENAME_LENGTH {
        return Err("File name too long");
    }
    if name.contains('\0') {
        return Err("File name contains null byte");
    }
    if !name.ends_with(LOG_FILE_EXTENSION) {
        return Err("File must be a .log file");
    }
    Ok(())
}
