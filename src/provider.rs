// SPDX-License-Identifier: GPL-3.0-only

//! Frame provider abstraction
//!
//! A [`FrameProvider`] exposes the latest synchronized sensor state: depth
//! plane, rendered color and depth-visualization images, intrinsics, pose
//! and exposure metadata. The real provider on device is the AR/camera
//! session; [`SyntheticProvider`] is a deterministic stand-in so the tool
//! runs (and tests run) without LiDAR hardware.

use crate::capture::{Bitmap, CameraIntrinsics, CameraTransform, CaptureRecord, DepthImage};
use crate::errors::CaptureError;
use crate::visualization::{self, VizStyle};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

/// Source of synchronized sensor frames
pub trait FrameProvider {
    /// Timestamp of the latest frame, in seconds
    fn timestamp(&self) -> f64;

    /// Camera intrinsics for the latest frame
    fn camera_intrinsics(&self) -> CameraIntrinsics;

    /// Camera pose for the latest frame
    fn camera_transform(&self) -> CameraTransform;

    /// Exposure duration for the latest frame, in seconds
    fn exposure_duration(&self) -> f64;

    /// Exposure offset reported by the sensor
    fn exposure_offset(&self) -> f64;

    /// Latest depth image plane, if one has arrived
    fn depth_image(&self) -> Option<Arc<DepthImage>>;

    /// Latest rendered color image, if one has arrived
    fn color_image(&self) -> Option<Bitmap>;

    /// Latest rendered depth visualization, if one has arrived
    fn depth_visualization(&self) -> Option<Bitmap>;
}

/// Assemble a capture record from the provider's latest state
///
/// Performs the raw depth-plane copy under the plane lock; the lock is held
/// only for the copy itself and released on every exit path.
pub fn snapshot(provider: &dyn FrameProvider) -> Result<CaptureRecord, CaptureError> {
    let depth = provider.depth_image().ok_or(CaptureError::NoDepthFrame)?;
    let color_image = provider.color_image().ok_or(CaptureError::NoColorFrame)?;
    let depth_visualization = provider
        .depth_visualization()
        .ok_or(CaptureError::NoDepthFrame)?;

    let depth_buffer = depth.copy_raw()?;

    debug!(
        timestamp = provider.timestamp(),
        depth_bytes = depth_buffer.len(),
        width = depth.width(),
        height = depth.height(),
        bytes_per_row = depth.bytes_per_row(),
        "Assembled capture record"
    );

    Ok(CaptureRecord {
        timestamp: provider.timestamp(),
        camera_intrinsics: provider.camera_intrinsics(),
        camera_transform: provider.camera_transform(),
        exposure_duration: provider.exposure_duration(),
        exposure_offset: provider.exposure_offset(),
        depth_buffer,
        color_image,
        depth_visualization,
    })
}

/// Padding appended to each synthetic depth row, in bytes
///
/// Deliberately non-zero so the raw export path is exercised with a plane
/// whose bytes_per_row exceeds width * pixel_size.
const SYNTHETIC_ROW_PAD: u32 = 8;

/// Deterministic synthetic frame source
///
/// Generates a mono16 millimeter depth ramp (near at the top, far at the
/// bottom) with padded rows, a gradient color image, plausible pinhole
/// intrinsics and a slowly advancing pose. Each [`advance`](Self::advance)
/// steps the clock and regenerates the depth plane in place.
pub struct SyntheticProvider {
    width: u32,
    height: u32,
    timestamp: f64,
    frame_index: u64,
    viz_style: VizStyle,
    depth: Arc<DepthImage>,
}

impl SyntheticProvider {
    /// Create a provider with the given depth plane dimensions
    ///
    /// The initial timestamp is the current wall clock as seconds since the
    /// Unix epoch, mirroring a sensor clock. Use
    /// [`with_timestamp`](Self::with_timestamp) for a fixed value.
    pub fn new(width: u32, height: u32, viz_style: VizStyle) -> Result<Self, CaptureError> {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0);

        let bytes_per_row = width * 2 + SYNTHETIC_ROW_PAD;
        let plane = Self::render_depth_plane(width, height, bytes_per_row, 0);
        let depth = Arc::new(DepthImage::new(width, height, bytes_per_row, plane)?);

        Ok(Self {
            width,
            height,
            timestamp,
            frame_index: 0,
            viz_style,
            depth,
        })
    }

    /// Pin the provider clock to a fixed timestamp
    pub fn with_timestamp(mut self, timestamp: f64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Step the clock by `dt` seconds and generate the next frame
    pub fn advance(&mut self, dt: f64) -> Result<(), CaptureError> {
        self.timestamp += dt;
        self.frame_index += 1;
        let plane = Self::render_depth_plane(
            self.width,
            self.height,
            self.depth.bytes_per_row(),
            self.frame_index,
        );
        self.depth.update(&plane)
    }

    /// Millimeter depth values of the current frame, row padding stripped
    pub fn depth_values_mm(&self) -> Result<Vec<u16>, CaptureError> {
        let raw = self.depth.copy_raw()?;
        let row_bytes = (self.width * 2) as usize;
        let mut values = Vec::with_capacity((self.width * self.height) as usize);
        for row in raw.chunks_exact(self.depth.bytes_per_row() as usize) {
            // pod_collect copies, so the unaligned row slice is fine
            values.extend(bytemuck::pod_collect_to_vec::<u8, u16>(&row[..row_bytes]));
        }
        Ok(values)
    }

    /// Render one mono16 depth frame into a padded plane buffer
    ///
    /// Depth ramps from ~500mm at the top to ~4500mm at the bottom, with a
    /// per-frame phase shift so consecutive frames differ. Padding bytes
    /// carry a fixed 0xAB pattern, which the raw export preserves.
    fn render_depth_plane(width: u32, height: u32, bytes_per_row: u32, frame: u64) -> Vec<u8> {
        let pad = (bytes_per_row - width * 2) as usize;
        let mut plane = Vec::with_capacity((bytes_per_row * height) as usize);
        for y in 0..height {
            let shifted = (y + frame as u32) % height;
            let depth_mm: u16 = if height > 1 {
                (500 + shifted as u64 * 4000 / (height as u64 - 1)) as u16
            } else {
                500
            };
            let row = vec![depth_mm; width as usize];
            plane.extend_from_slice(bytemuck::cast_slice(&row));
            plane.extend(std::iter::repeat(0xAB).take(pad));
        }
        plane
    }

    /// Render the gradient color image for the current frame
    fn render_color(&self) -> Option<Bitmap> {
        let mut rgba = Vec::with_capacity((self.width * self.height * 4) as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                let r = (x * 255 / self.width.max(1)) as u8;
                let g = (y * 255 / self.height.max(1)) as u8;
                let b = (self.frame_index % 256) as u8;
                rgba.extend_from_slice(&[r, g, b, 255]);
            }
        }
        Bitmap::new(self.width, self.height, rgba)
    }
}

impl FrameProvider for SyntheticProvider {
    fn timestamp(&self) -> f64 {
        self.timestamp
    }

    fn camera_intrinsics(&self) -> CameraIntrinsics {
        // Focal lengths and principal point scaled to the plane size
        CameraIntrinsics::pinhole(
            self.width as f32 * 1.2,
            self.width as f32 * 1.2,
            self.width as f32 / 2.0,
            self.height as f32 / 2.0,
        )
    }

    fn camera_transform(&self) -> CameraTransform {
        // Slow dolly along -Z so consecutive poses differ
        CameraTransform::translation(0.0, 0.0, -0.01 * self.frame_index as f32)
    }

    fn exposure_duration(&self) -> f64 {
        1.0 / 30.0
    }

    fn exposure_offset(&self) -> f64 {
        -0.5
    }

    fn depth_image(&self) -> Option<Arc<DepthImage>> {
        Some(self.depth.clone())
    }

    fn color_image(&self) -> Option<Bitmap> {
        self.render_color()
    }

    fn depth_visualization(&self) -> Option<Bitmap> {
        let values = self.depth_values_mm().ok()?;
        visualization::depth_to_rgba(&values, self.width, self.height, self.viz_style)
    }
}
