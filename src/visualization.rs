// SPDX-License-Identifier: GPL-3.0-only

//! Depth visualization
//!
//! Renders a millimeter depth plane into a viewable RGBA bitmap, either
//! with the turbo colormap (blue=near, red=far) or as grayscale
//! (bright=near, dark=far). Invalid readings render black.

use crate::capture::Bitmap;
use crate::constants::{DEPTH_COLORMAP_BANDS, DEPTH_MAX_MM, DEPTH_MAX_VALID_MM, DEPTH_MIN_MM};
use serde::{Deserialize, Serialize};

/// Rendering style for the depth visualization image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VizStyle {
    /// Turbo colormap, quantized into bands
    #[default]
    Turbo,
    /// Grayscale, near=bright
    Grayscale,
}

/// Turbo colormap: perceptually uniform rainbow (blue=near, red=far)
///
/// Based on: https://ai.googleblog.com/2019/08/turbo-improved-rainbow-colormap-for.html
/// Simplified version with polynomial approximation.
#[inline]
fn turbo(t: f32) -> [u8; 4] {
    let r = (0.13572138
        + t * (4.6153926 + t * (-42.66032 + t * (132.13108 + t * (-152.54825 + t * 59.28144)))))
        .clamp(0.0, 1.0);
    let g = (0.09140261
        + t * (2.19418 + t * (4.84296 + t * (-14.18503 + t * (4.27805 + t * 2.53377)))))
        .clamp(0.0, 1.0);
    let b = (0.1066733
        + t * (12.64194 + t * (-60.58204 + t * (109.99648 + t * (-82.52904 + t * 20.43388)))))
        .clamp(0.0, 1.0);
    [(r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8, 255]
}

/// Render depth values (in millimeters, 0 = invalid) to an RGBA bitmap
///
/// `depth_mm` must hold at least `width * height` values; extra values
/// (row padding already stripped by the caller) are ignored.
pub fn depth_to_rgba(depth_mm: &[u16], width: u32, height: u32, style: VizStyle) -> Option<Bitmap> {
    let pixel_count = (width as usize) * (height as usize);
    if depth_mm.len() < pixel_count {
        return None;
    }

    let mut rgba = Vec::with_capacity(pixel_count * 4);
    for &depth in depth_mm.iter().take(pixel_count) {
        if depth == 0 || depth > DEPTH_MAX_VALID_MM {
            // Invalid depth - black
            rgba.extend_from_slice(&[0, 0, 0, 255]);
            continue;
        }

        // Normalize to 0.0-1.0 (near=0.0, far=1.0)
        let t = (((depth as f32) - DEPTH_MIN_MM) / (DEPTH_MAX_MM - DEPTH_MIN_MM)).clamp(0.0, 1.0);

        match style {
            VizStyle::Turbo => {
                // Quantize to bands for smoother visualization
                let banded = (t * DEPTH_COLORMAP_BANDS).floor() / DEPTH_COLORMAP_BANDS;
                rgba.extend_from_slice(&turbo(banded));
            }
            VizStyle::Grayscale => {
                // Near=bright, far=dark (invert t)
                let gray = ((1.0 - t) * 255.0) as u8;
                rgba.extend_from_slice(&[gray, gray, gray, 255]);
            }
        }
    }

    Bitmap::new(width, height, rgba)
}
