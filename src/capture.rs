// SPDX-License-Identifier: MPL-2.0

//! Capture record and sensor frame types
//!
//! A [`CaptureRecord`] bundles one set of synchronized sensor readings:
//! the raw depth plane, the rendered color and depth-visualization images,
//! the camera intrinsics and pose, and the exposure metadata for the frame.
//! Records are ephemeral - built from the provider's live state at the
//! moment of capture, handed to the exporter, and dropped.

use crate::errors::CaptureError;
use std::sync::{Arc, Mutex};

/// 3x3 camera intrinsics matrix (focal length, principal point), row-major
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraIntrinsics(pub [[f32; 3]; 3]);

impl CameraIntrinsics {
    /// Identity matrix
    pub fn identity() -> Self {
        Self([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]])
    }

    /// Pinhole intrinsics from focal lengths and principal point
    pub fn pinhole(fx: f32, fy: f32, cx: f32, cy: f32) -> Self {
        Self([[fx, 0.0, cx], [0.0, fy, cy], [0.0, 0.0, 1.0]])
    }

    /// Flatten to 9 elements in row-major order
    ///
    /// The export format fixes this order; readers must match it exactly
    /// to reconstruct the matrix.
    pub fn flatten(&self) -> [f32; 9] {
        let m = &self.0;
        [
            m[0][0], m[0][1], m[0][2], m[1][0], m[1][1], m[1][2], m[2][0], m[2][1], m[2][2],
        ]
    }
}

/// 4x4 camera pose transform (rotation + translation in world space), row-major
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTransform(pub [[f32; 4]; 4]);

impl CameraTransform {
    /// Identity matrix
    pub fn identity() -> Self {
        Self([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Identity rotation with the given translation in the last column
    pub fn translation(x: f32, y: f32, z: f32) -> Self {
        Self([
            [1.0, 0.0, 0.0, x],
            [0.0, 1.0, 0.0, y],
            [0.0, 0.0, 1.0, z],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Flatten to 16 elements in row-major order
    pub fn flatten(&self) -> [f32; 16] {
        let mut out = [0.0; 16];
        for (i, row) in self.0.iter().enumerate() {
            out[i * 4..i * 4 + 4].copy_from_slice(row);
        }
        out
    }
}

/// A rendered RGBA bitmap
///
/// Opaque to the exporter - only the gallery sink interprets the pixels.
/// Pixel data is Arc-backed so clones passed through the export path are
/// reference bumps, not copies.
#[derive(Debug, Clone)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    /// RGBA bytes, 4 per pixel, tightly packed
    pub pixels: Arc<[u8]>,
}

impl Bitmap {
    /// Create a bitmap, validating the pixel buffer size
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        if pixels.len() != (width as usize) * (height as usize) * 4 {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels: Arc::from(pixels.into_boxed_slice()),
        })
    }
}

/// A live depth image plane with lock-scoped access to its backing memory
///
/// Models a shared camera frame buffer: readers must hold the plane lock
/// for exactly the duration of their copy. [`DepthImage::copy_raw`] is the
/// only read path; the lock guard releases on every exit path, so a failed
/// copy never leaks the lock.
///
/// `bytes_per_row` may exceed `width * pixel_size` - row padding is part of
/// the plane and is preserved verbatim by `copy_raw`.
#[derive(Debug)]
pub struct DepthImage {
    width: u32,
    height: u32,
    bytes_per_row: u32,
    plane: Mutex<Vec<u8>>,
}

impl DepthImage {
    /// Wrap a raw plane buffer
    ///
    /// Fails if the buffer holds fewer than `bytes_per_row * height` bytes.
    pub fn new(
        width: u32,
        height: u32,
        bytes_per_row: u32,
        plane: Vec<u8>,
    ) -> Result<Self, CaptureError> {
        let expected = bytes_per_row as usize * height as usize;
        if plane.len() < expected {
            return Err(CaptureError::PlaneSizeMismatch {
                expected,
                actual: plane.len(),
            });
        }
        Ok(Self {
            width,
            height,
            bytes_per_row,
            plane: Mutex::new(plane),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bytes_per_row(&self) -> u32 {
        self.bytes_per_row
    }

    /// Exact byte length of one raw copy of this plane
    pub fn raw_len(&self) -> usize {
        self.bytes_per_row as usize * self.height as usize
    }

    /// Copy the raw plane bytes while holding the plane lock
    ///
    /// Copies exactly `bytes_per_row * height` bytes, including any row
    /// padding. The lock is held only for the duration of the copy.
    pub fn copy_raw(&self) -> Result<Vec<u8>, CaptureError> {
        let guard = self.plane.lock().map_err(|_| CaptureError::PlaneUnavailable)?;
        Ok(guard[..self.raw_len()].to_vec())
    }

    /// Replace the plane contents with a new frame
    ///
    /// Used by providers that recycle the plane buffer between frames.
    /// Fails without touching the plane if the new frame is too small.
    pub fn update(&self, frame: &[u8]) -> Result<(), CaptureError> {
        if frame.len() < self.raw_len() {
            return Err(CaptureError::PlaneSizeMismatch {
                expected: self.raw_len(),
                actual: frame.len(),
            });
        }
        let mut guard = self.plane.lock().map_err(|_| CaptureError::PlaneUnavailable)?;
        guard.clear();
        guard.extend_from_slice(frame);
        Ok(())
    }
}

/// One bundle of synchronized sensor readings, captured together
///
/// Produced by [`crate::provider::snapshot`], consumed by
/// [`crate::export::SnapshotExporter`].
#[derive(Debug, Clone)]
pub struct CaptureRecord {
    /// Frame timestamp in seconds; used verbatim as the export filename stem
    pub timestamp: f64,
    /// 3x3 camera intrinsics for the frame
    pub camera_intrinsics: CameraIntrinsics,
    /// 4x4 camera pose at capture time
    pub camera_transform: CameraTransform,
    /// Exposure duration in seconds
    pub exposure_duration: f64,
    /// Exposure offset reported by the sensor
    pub exposure_offset: f64,
    /// Raw depth plane copy, exactly bytes_per_row * height bytes
    pub depth_buffer: Vec<u8>,
    /// Rendered color camera image
    pub color_image: Bitmap,
    /// Rendered depth visualization image
    pub depth_visualization: Bitmap,
}
