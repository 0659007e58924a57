// SPDX-License-Identifier: MPL-2.0

//! depthcap - LiDAR depth snapshot capture and export
//!
//! This library provides the core functionality for the depthcap tool:
//! assembling synchronized sensor capture records and exporting them as
//! sidecar file sets alongside gallery image saves.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`capture`]: Capture record and sensor frame types
//! - [`provider`]: Frame provider seam and the synthetic demo source
//! - [`export`]: Snapshot exporter and the sidecar file format
//! - [`gallery`]: Fire-and-forget image sink
//! - [`visualization`]: Depth-to-color rendering
//! - [`storage`]: Export directory resolution and set listing
//! - [`config`]: User configuration handling

pub mod capture;
pub mod config;
pub mod constants;
pub mod errors;
pub mod export;
pub mod gallery;
pub mod provider;
pub mod storage;
pub mod visualization;

// Re-export commonly used types
pub use capture::{Bitmap, CameraIntrinsics, CameraTransform, CaptureRecord, DepthImage};
pub use config::Config;
pub use export::{ExportReceipt, SnapshotExporter};
pub use provider::{FrameProvider, SyntheticProvider, snapshot};
