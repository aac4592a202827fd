//! Camera records
//!
//! Untyped upstream records ([`RawCameraRecord`]) are converted once, at the
//! normalization boundary, into [`CameraRecord`]s. Nothing past
//! [`normalize`] sees untyped data.

mod normalize;
mod types;

pub use normalize::{
    NormalizationReport, RecordNormalizationError, directory_key, normalize,
    normalize_record, normalize_with_report, resolve_image_url,
};
pub use types::{CameraRecord, RawCameraRecord};
