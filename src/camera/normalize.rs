//! Raw record → [`CameraRecord`] conversion

use super::types::{CameraRecord, RawCameraRecord};
use crate::sanitize::sanitize_filename;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

const LEGACY_ENDPOINT: &str = "camv2.php";
const IMAGE_ENDPOINT: &str = "cam.php";

#[derive(Debug, Error)]
pub enum RecordNormalizationError {
    #[error("record {index} is not a JSON object")]
    NotAnObject { index: usize },

    #[error("record {index}: field '{field}' has an unsupported type")]
    InvalidField { index: usize, field: &'static str },

    #[error("record {index}: field '{field}' is not a number: {value}")]
    InvalidCoordinate {
        index: usize,
        field: &'static str,
        value: String,
    },
}

impl RecordNormalizationError {
    /// Position of the offending record in the raw list
    pub fn index(&self) -> usize {
        match self {
            Self::NotAnObject { index }
            | Self::InvalidField { index, .. }
            | Self::InvalidCoordinate { index, .. } => *index,
        }
    }
}

pub type Result<T> = std::result::Result<T, RecordNormalizationError>;

/// Outcome of normalizing a whole raw list
#[derive(Debug, Default)]
pub struct NormalizationReport {
    /// Successfully normalized records, in input order
    pub records: Vec<CameraRecord>,
    /// One entry per skipped record
    pub skipped: Vec<RecordNormalizationError>,
}

impl NormalizationReport {
    pub fn skipped_indices(&self) -> Vec<usize> {
        self.skipped.iter().map(RecordNormalizationError::index).collect()
    }
}

/// Normalize every raw record, skipping (and logging) the ones that fail.
pub fn normalize_with_report(raw_records: &[Value]) -> NormalizationReport {
    let mut report = NormalizationReport::default();

    for (index, raw) in raw_records.iter().enumerate() {
        match normalize_record(index, raw) {
            Ok(record) => report.records.push(record),
            Err(e) => {
                error!(index, error = %e, "Failed to normalize camera record");
                report.skipped.push(e);
            }
        }
    }

    debug!(
        normalized = report.records.len(),
        skipped = report.skipped.len(),
        "Normalization finished"
    );

    report
}

/// Normalize a raw list, keeping only the records that succeed.
pub fn normalize(raw_records: &[Value]) -> Vec<CameraRecord> {
    normalize_with_report(raw_records).records
}

/// Normalize the raw record found at `index`.
pub fn normalize_record(index: usize, raw: &Value) -> Result<CameraRecord> {
    if !raw.is_object() {
        return Err(RecordNormalizationError::NotAnObject { index });
    }

    let raw: RawCameraRecord = serde_json::from_value(raw.clone())
        .map_err(|_| RecordNormalizationError::NotAnObject { index })?;

    CameraRecord::from_raw(index, &raw)
}

impl CameraRecord {
    /// Build a record from its raw form, applying per-field defaults.
    pub fn from_raw(index: usize, raw: &RawCameraRecord) -> Result<Self> {
        let id = text_field(index, "id", raw.id.as_ref())?
            .unwrap_or_else(|| format!("cam_{index:03}"));
        let name = text_field(index, "nombre", raw.nombre.as_ref())?
            .unwrap_or_else(|| format!("Camara_{index:03}"));

        let source_url = match raw.url.as_ref() {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(_) => {
                return Err(RecordNormalizationError::InvalidField { index, field: "url" });
            }
        };

        let latitude = coordinate_field(index, "lat", raw.lat.as_ref())?;
        let longitude = coordinate_field(index, "lon", raw.lon.as_ref())?;

        Ok(Self {
            image_url: resolve_image_url(&source_url),
            description: format!("Cámara de tráfico en {name}, Vigo"),
            directory_key: directory_key(&id, &name),
            id,
            name,
            source_url,
            latitude,
            longitude,
        })
    }
}

/// Select the endpoint variant that serves a plain JPEG snapshot.
pub fn resolve_image_url(url: &str) -> String {
    if url.contains(LEGACY_ENDPOINT) {
        url.replace(LEGACY_ENDPOINT, IMAGE_ENDPOINT)
    } else {
        url.to_string()
    }
}

/// Folder name for a camera: `CAM_{id}_{name}`, sanitized.
pub fn directory_key(id: &str, name: &str) -> String {
    sanitize_filename(&format!("CAM_{id}_{name}"))
}

/// Scalars become text; empty strings count as absent.
fn text_field(index: usize, field: &'static str, value: Option<&Value>) -> Result<Option<String>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(_) => Err(RecordNormalizationError::InvalidField { index, field }),
    }
}

fn coordinate_field(index: usize, field: &'static str, value: Option<&Value>) -> Result<f64> {
    let invalid = |value: &Value| RecordNormalizationError::InvalidCoordinate {
        index,
        field,
        value: value.to_string(),
    };

    match value {
        None | Some(Value::Null) => Ok(0.0),
        Some(v @ Value::Number(n)) => n.as_f64().ok_or_else(|| invalid(v)),
        Some(v @ Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .ok_or_else(|| invalid(v)),
        Some(v) => Err(invalid(v)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rewrites_legacy_endpoint() {
        let records = normalize(&[json!({"url": "http://x/camv2.php?id=1"})]);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].image_url, "http://x/cam.php?id=1");
        assert_eq!(records[0].source_url, "http://x/camv2.php?id=1");
    }

    #[test]
    fn test_keeps_other_urls() {
        let records = normalize(&[json!({"url": "http://x/snapshot.jpg"})]);
        assert_eq!(records[0].image_url, "http://x/snapshot.jpg");
    }

    #[test]
    fn test_fallbacks_use_index() {
        let raw = vec![
            json!({"id": "a", "nombre": "A"}),
            json!({"id": "b", "nombre": "B"}),
            json!({}),
        ];
        let records = normalize(&raw);

        assert_eq!(records.len(), 3);
        assert_eq!(records[2].id, "cam_002");
        assert_eq!(records[2].name, "Camara_002");
        assert_eq!(records[2].image_url, "");
        assert_eq!(records[2].latitude, 0.0);
        assert_eq!(records[2].longitude, 0.0);
        assert_eq!(records[2].directory_key, "CAM_cam_002_Camara_002");
    }

    #[test]
    fn test_empty_strings_fall_back() {
        let records = normalize(&[json!({"id": "", "nombre": ""})]);
        assert_eq!(records[0].id, "cam_000");
        assert_eq!(records[0].name, "Camara_000");
    }

    #[test]
    fn test_full_record() {
        let records = normalize(&[json!({
            "id": 17,
            "nombre": "Praza de España",
            "url": "https://hoxe.vigo.org/camv2.php?c=17",
            "lat": "42.2314",
            "lon": -8.7124
        })]);

        let cam = &records[0];
        assert_eq!(cam.id, "17");
        assert_eq!(cam.name, "Praza de España");
        assert_eq!(cam.image_url, "https://hoxe.vigo.org/cam.php?c=17");
        assert!((cam.latitude - 42.2314).abs() < 1e-9);
        assert!((cam.longitude + 8.7124).abs() < 1e-9);
        assert_eq!(cam.description, "Cámara de tráfico en Praza de España, Vigo");
        assert_eq!(cam.directory_key, "CAM_17_Praza_de_Espaa");
    }

    #[test]
    fn test_bad_record_is_isolated() {
        let raw = vec![
            json!({"id": "ok", "nombre": "Fine", "lat": 42.0, "lon": -8.0}),
            json!({"id": "bad", "nombre": "Broken", "lat": "north"}),
        ];
        let report = normalize_with_report(&raw);

        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].id, "ok");
        assert_eq!(report.skipped_indices(), vec![1]);
        assert!(matches!(
            report.skipped[0],
            RecordNormalizationError::InvalidCoordinate { field: "lat", .. }
        ));
    }

    #[test]
    fn test_non_finite_coordinates_rejected() {
        let raw = vec![
            json!({"id": "1", "lat": "NaN", "lon": "-8.7"}),
            json!({"id": "2", "lat": "42.2", "lon": "inf"}),
            json!({"id": "3", "lat": "-Infinity"}),
            json!({"id": "4", "lat": "42.2", "lon": "-8.7"}),
        ];
        let report = normalize_with_report(&raw);

        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].id, "4");
        assert_eq!(report.skipped_indices(), vec![0, 1, 2]);
        assert!(matches!(
            report.skipped[1],
            RecordNormalizationError::InvalidCoordinate { field: "lon", .. }
        ));
    }

    #[test]
    fn test_non_object_and_wrong_types_skipped() {
        let raw = vec![
            json!("not a camera"),
            json!({"id": ["x"]}),
            json!({"url": 42}),
            json!([]),
            json!({"id": "keep"}),
        ];
        let report = normalize_with_report(&raw);

        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].id, "keep");
        assert_eq!(report.skipped_indices(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_directory_key_is_capped() {
        let key = directory_key("1", &"Rúa ".repeat(30));
        assert!(key.len() <= 50);
        assert!(key.starts_with("CAM_1_Ra_"));
    }
}
