use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One element of the upstream camera list, before normalization.
///
/// Every field is optional and untyped; the upstream feed gives no
/// guarantees about presence or type. Defaults are applied only in
/// [`super::normalize`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCameraRecord {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub nombre: Option<Value>,
    #[serde(default)]
    pub url: Option<Value>,
    #[serde(default)]
    pub lat: Option<Value>,
    #[serde(default)]
    pub lon: Option<Value>,
}

/// Normalized camera record
///
/// This is the shape persisted in the metadata cache and the exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraRecord {
    pub id: String,
    pub name: String,
    /// URL the snapshot is fetched from (`camv2.php` rewritten to `cam.php`)
    pub image_url: String,
    /// URL exactly as published upstream
    pub source_url: String,
    pub latitude: f64,
    pub longitude: f64,
    pub description: String,
    /// Sanitized top-level folder name for this camera's images
    pub directory_key: String,
}
