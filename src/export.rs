// SPDX-License-Identifier: MPL-2.0

//! Snapshot export
//!
//! Serializes one [`CaptureRecord`] into the fixed sidecar file set:
//!
//! ```text
//! <stem>_depthBuffer.bin   raw depth plane bytes
//! <stem>_intri.txt         [f0,...,f8]   row-major 3x3 intrinsics
//! <stem>_trans.txt         [f0,...,f15]  row-major 4x4 transform
//! <stem>_dura.txt          exposure duration text
//! <stem>_offset.txt        exposure offset text
//! ```
//!
//! The stem is the capture timestamp rendered as scalar text, not a
//! calendar date. None of the files carry a header or version field;
//! readers must know the matrix dimensions out-of-band, so the reader
//! helpers live here next to the writer.
//!
//! Failures are the caller's to observe or ignore: [`SnapshotExporter::export`]
//! returns the first write error, while [`SnapshotExporter::export_best_effort`]
//! drops it for callers that treat exports as fire-and-forget.

use crate::capture::CaptureRecord;
use crate::constants::SidecarKind;
use crate::errors::ExportError;
use crate::gallery::GallerySink;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Paths written by one successful export
#[derive(Debug, Clone)]
pub struct ExportReceipt {
    /// Shared filename stem (timestamp text)
    pub stem: String,
    /// The five sidecar paths, in write order
    pub files: Vec<PathBuf>,
}

/// Serializes capture records to sidecar file sets
///
/// Stateless apart from its gallery sink; a single export is one
/// synchronous pass with no retries or queuing. Concurrent exports at
/// distinct timestamps write disjoint file sets and do not collide.
pub struct SnapshotExporter {
    gallery: Arc<dyn GallerySink>,
}

impl SnapshotExporter {
    pub fn new(gallery: Arc<dyn GallerySink>) -> Self {
        Self { gallery }
    }

    /// Export one record into `target_dir`
    ///
    /// Dispatches the two rendered images to the gallery sink (fire-and-
    /// forget, never awaited), then writes the five sidecar files in fixed
    /// order. Stops at the first write failure; files already written stay
    /// on disk. Re-exporting an identical record overwrites the previous
    /// set byte-for-byte.
    pub fn export(
        &self,
        record: &CaptureRecord,
        target_dir: &Path,
    ) -> Result<ExportReceipt, ExportError> {
        self.gallery.submit(record.color_image.clone(), "color");
        self.gallery.submit(record.depth_visualization.clone(), "depth");
        debug!("Dispatched color and depth images to gallery");

        let stem = fmt_scalar(record.timestamp);
        let mut files = Vec::with_capacity(SidecarKind::ALL.len());

        for kind in SidecarKind::ALL {
            let path = target_dir.join(format!("{}{}", stem, kind.suffix()));
            let written = match kind {
                SidecarKind::DepthBuffer => fs::write(&path, &record.depth_buffer),
                SidecarKind::Intrinsics => {
                    fs::write(&path, format_array(&record.camera_intrinsics.flatten()))
                }
                SidecarKind::Transform => {
                    fs::write(&path, format_array(&record.camera_transform.flatten()))
                }
                SidecarKind::ExposureDuration => {
                    fs::write(&path, fmt_scalar(record.exposure_duration))
                }
                SidecarKind::ExposureOffset => {
                    fs::write(&path, fmt_scalar(record.exposure_offset))
                }
            };

            written.map_err(|e| ExportError::WriteFailed {
                path: path.clone(),
                message: e.to_string(),
            })?;
            files.push(path);
        }

        info!(
            stem = %stem,
            dir = %target_dir.display(),
            "Exported snapshot"
        );

        Ok(ExportReceipt { stem, files })
    }

    /// Export and discard the outcome
    ///
    /// Best-effort mode for callers that never act on failures; use
    /// [`export`](Self::export) to observe them instead.
    pub fn export_best_effort(&self, record: &CaptureRecord, target_dir: &Path) {
        let _ = self.export(record, target_dir);
    }
}

/// Scalar-to-text conversion used for the filename stem and exposure files
///
/// Matches the source convention for floating point description: integral
/// values keep a trailing `.0` (`12345.0`), everything else prints in
/// shortest round-trip form (`0.033`, `-0.01`).
pub fn fmt_scalar(value: f64) -> String {
    if value.is_finite() && value == value.trunc() {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

/// Render a flattened matrix as `[v0,v1,...]`
///
/// Elements print in minimal form (`1`, `0`, `231.829`), comma-joined
/// without spaces.
pub fn format_array(values: &[f32]) -> String {
    let mut out = String::from("[");
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&v.to_string());
    }
    out.push(']');
    out
}

/// Parse a `[v0,v1,...]` array file body back into floats
pub fn parse_array(text: &str) -> Result<Vec<f32>, String> {
    let trimmed = text.trim();
    let inner = trimmed
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(|| "Array text is not bracketed".to_string())?;

    if inner.trim().is_empty() {
        return Ok(Vec::new());
    }

    inner
        .split(',')
        .map(|s| {
            s.trim()
                .parse::<f32>()
                .map_err(|e| format!("Invalid element '{}': {}", s.trim(), e))
        })
        .collect()
}

/// Read a 9-element row-major intrinsics file
pub fn read_matrix3(path: &Path) -> Result<[f32; 9], ExportError> {
    let values = read_array(path, 9)?;
    let mut out = [0.0; 9];
    out.copy_from_slice(&values);
    Ok(out)
}

/// Read a 16-element row-major transform file
pub fn read_matrix4(path: &Path) -> Result<[f32; 16], ExportError> {
    let values = read_array(path, 16)?;
    let mut out = [0.0; 16];
    out.copy_from_slice(&values);
    Ok(out)
}

/// Read a scalar text file (exposure duration/offset)
pub fn read_scalar(path: &Path) -> Result<f64, ExportError> {
    let text = fs::read_to_string(path).map_err(|e| ExportError::ReadFailed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    text.trim().parse::<f64>().map_err(|e| ExportError::ReadFailed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn read_array(path: &Path, expected: usize) -> Result<Vec<f32>, ExportError> {
    let text = fs::read_to_string(path).map_err(|e| ExportError::ReadFailed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let values = parse_array(&text).map_err(|message| ExportError::ReadFailed {
        path: path.to_path_buf(),
        message,
    })?;
    if values.len() != expected {
        return Err(ExportError::ReadFailed {
            path: path.to_path_buf(),
            message: format!("Expected {} elements, found {}", expected, values.len()),
        });
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_scalar_keeps_trailing_zero() {
        assert_eq!(fmt_scalar(12345.0), "12345.0");
        assert_eq!(fmt_scalar(0.0), "0.0");
        assert_eq!(fmt_scalar(-3.0), "-3.0");
    }

    #[test]
    fn test_fmt_scalar_fractional() {
        assert_eq!(fmt_scalar(0.033), "0.033");
        assert_eq!(fmt_scalar(-0.01), "-0.01");
    }

    #[test]
    fn test_format_array_minimal_elements() {
        assert_eq!(
            format_array(&[1.0, 0.0, 0.5, -2.25]),
            "[1,0,0.5,-2.25]"
        );
    }

    #[test]
    fn test_parse_array_roundtrip() {
        let values = [1.0f32, 0.0, 231.829, -0.5];
        let parsed = parse_array(&format_array(&values)).unwrap();
        assert_eq!(parsed, values);
    }

    #[test]
    fn test_parse_array_rejects_unbracketed() {
        assert!(parse_array("1,2,3").is_err());
    }
}
