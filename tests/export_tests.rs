// SPDX-License-Identifier: MPL-2.0

//! Integration tests for the snapshot export format

use depthcap::capture::{Bitmap, CameraIntrinsics, CameraTransform, CaptureRecord};
use depthcap::constants::SidecarKind;
use depthcap::export::{self, SnapshotExporter};
use depthcap::gallery::{GallerySink, NullGallery};
use std::sync::{Arc, Mutex};

/// Gallery sink that records submission labels
struct RecordingGallery {
    labels: Mutex<Vec<String>>,
}

impl RecordingGallery {
    fn new() -> Self {
        Self {
            labels: Mutex::new(Vec::new()),
        }
    }
}

impl GallerySink for RecordingGallery {
    fn submit(&self, _image: Bitmap, label: &str) {
        self.labels.lock().unwrap().push(label.to_string());
    }
}

fn test_bitmap() -> Bitmap {
    Bitmap::new(2, 2, vec![0u8; 16]).expect("valid bitmap")
}

fn scenario_record() -> CaptureRecord {
    CaptureRecord {
        timestamp: 12345.0,
        camera_intrinsics: CameraIntrinsics::identity(),
        camera_transform: CameraTransform::identity(),
        exposure_duration: 0.033,
        exposure_offset: -0.01,
        depth_buffer: vec![0xFF; 100],
        color_image: test_bitmap(),
        depth_visualization: test_bitmap(),
    }
}

fn exporter() -> SnapshotExporter {
    SnapshotExporter::new(Arc::new(NullGallery))
}

#[test]
fn test_export_writes_five_files() {
    let dir = tempfile::tempdir().unwrap();
    let receipt = exporter().export(&scenario_record(), dir.path()).unwrap();

    assert_eq!(receipt.stem, "12345.0");
    assert_eq!(receipt.files.len(), 5, "Export should write five files");
    for path in &receipt.files {
        assert!(path.exists(), "Missing export file {}", path.display());
    }

    for kind in SidecarKind::ALL {
        let expected = dir.path().join(format!("12345.0{}", kind.suffix()));
        assert!(
            expected.exists(),
            "Missing {} file {}",
            kind.display_name(),
            expected.display()
        );
    }
}

#[test]
fn test_export_concrete_scenario() {
    let dir = tempfile::tempdir().unwrap();
    exporter().export(&scenario_record(), dir.path()).unwrap();

    let read = |name: &str| std::fs::read_to_string(dir.path().join(name)).unwrap();

    assert_eq!(read("12345.0_intri.txt"), "[1,0,0,0,1,0,0,0,1]");
    assert_eq!(
        read("12345.0_trans.txt"),
        "[1,0,0,0,0,1,0,0,0,0,1,0,0,0,0,1]"
    );
    assert_eq!(read("12345.0_dura.txt"), "0.033");
    assert_eq!(read("12345.0_offset.txt"), "-0.01");

    let depth = std::fs::read(dir.path().join("12345.0_depthBuffer.bin")).unwrap();
    assert_eq!(depth.len(), 100);
    assert!(depth.iter().all(|&b| b == 0xFF));
}

#[test]
fn test_matrices_parse_back_row_major() {
    let dir = tempfile::tempdir().unwrap();
    let mut record = scenario_record();
    record.camera_intrinsics = CameraIntrinsics::pinhole(231.829, 232.779, 166.937, 123.515);
    record.camera_transform = CameraTransform::translation(0.1, -0.2, 0.3);

    exporter().export(&record, dir.path()).unwrap();

    let intrinsics =
        export::read_matrix3(&dir.path().join("12345.0_intri.txt")).unwrap();
    assert_eq!(intrinsics, record.camera_intrinsics.flatten());

    let transform = export::read_matrix4(&dir.path().join("12345.0_trans.txt")).unwrap();
    assert_eq!(transform, record.camera_transform.flatten());
}

#[test]
fn test_export_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let record = scenario_record();
    let snapshot_exporter = exporter();

    let receipt = snapshot_exporter.export(&record, dir.path()).unwrap();
    let first: Vec<Vec<u8>> = receipt
        .files
        .iter()
        .map(|p| std::fs::read(p).unwrap())
        .collect();

    // Second export with the same stem overwrites byte-for-byte
    let receipt = snapshot_exporter.export(&record, dir.path()).unwrap();
    let second: Vec<Vec<u8>> = receipt
        .files
        .iter()
        .map(|p| std::fs::read(p).unwrap())
        .collect();

    assert_eq!(first, second);
}

#[test]
fn test_export_to_missing_directory_fails_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("does").join("not").join("exist");

    let result = exporter().export(&scenario_record(), &missing);
    assert!(result.is_err(), "Export into a missing directory must fail");
}

#[test]
fn test_best_effort_swallows_failure() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");

    // Must not panic; the outcome is intentionally dropped
    exporter().export_best_effort(&scenario_record(), &missing);
}

#[test]
fn test_partial_writes_remain_after_failure() {
    let dir = tempfile::tempdir().unwrap();

    // Block the intrinsics file (written second) with a directory of the
    // same name; the depth buffer (written first) should still land.
    std::fs::create_dir(dir.path().join("12345.0_intri.txt")).unwrap();

    let result = exporter().export(&scenario_record(), dir.path());
    assert!(result.is_err());
    assert!(
        dir.path().join("12345.0_depthBuffer.bin").exists(),
        "Files written before the failure must remain"
    );
    assert!(!dir.path().join("12345.0_trans.txt").exists());
}

#[test]
fn test_gallery_receives_both_images_before_file_io() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");

    let gallery = Arc::new(RecordingGallery::new());
    let snapshot_exporter = SnapshotExporter::new(gallery.clone());

    // Even with failing file writes the gallery dispatch happens first
    let _ = snapshot_exporter.export(&scenario_record(), &missing);

    let labels = gallery.labels.lock().unwrap();
    assert_eq!(labels.as_slice(), ["color", "depth"]);
}

#[test]
fn test_fractional_timestamp_stem() {
    let dir = tempfile::tempdir().unwrap();
    let mut record = scenario_record();
    record.timestamp = 98765.25;

    let receipt = exporter().export(&record, dir.path()).unwrap();
    assert_eq!(receipt.stem, "98765.25");
    assert!(dir.path().join("98765.25_dura.txt").exists());
}
