// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for snapshot operations
//!
//! This module provides command-line functionality for:
//! - Capturing and exporting snapshots
//! - Watching the frame stream
//! - Listing and inspecting exported sets

use depthcap::capture::CaptureRecord;
use depthcap::config::Config;
use depthcap::constants::SidecarKind;
use depthcap::export::{self, SnapshotExporter};
use depthcap::gallery::{NullGallery, PicturesGallery};
use depthcap::provider::{FrameProvider, SyntheticProvider};
use depthcap::storage;
use futures::channel::mpsc;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Depth plane width of the synthetic provider (LiDAR depth map size)
const DEPTH_WIDTH: u32 = 256;
/// Depth plane height of the synthetic provider
const DEPTH_HEIGHT: u32 = 192;

/// Capture one snapshot from the synthetic provider and export it
pub fn capture(
    output: Option<PathBuf>,
    no_gallery: bool,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load();

    let target_dir = output.unwrap_or_else(|| config.resolved_export_dir());
    std::fs::create_dir_all(&target_dir)?;

    let provider = SyntheticProvider::new(DEPTH_WIDTH, DEPTH_HEIGHT, config.viz_style)?;
    let record = depthcap::snapshot(&provider)?;

    if no_gallery || !config.gallery_enabled {
        let exporter = SnapshotExporter::new(Arc::new(NullGallery));
        run_export(&exporter, &record, &target_dir, quiet)?;
        return Ok(());
    }

    // Gallery saves are spawned tasks; keep the runtime alive and drain
    // them before exit so a fast CLI run doesn't drop queued writes.
    let rt = tokio::runtime::Runtime::new()?;
    let gallery = Arc::new(PicturesGallery::new(
        storage::gallery_dir(),
        rt.handle().clone(),
    ));
    let exporter = SnapshotExporter::new(gallery.clone());
    let result = run_export(&exporter, &record, &target_dir, quiet);
    rt.block_on(gallery.flush());
    result
}

fn run_export(
    exporter: &SnapshotExporter,
    record: &CaptureRecord,
    target_dir: &Path,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if quiet {
        // Best-effort mode: outcome intentionally discarded
        exporter.export_best_effort(record, target_dir);
        return Ok(());
    }

    let receipt = exporter.export(record, target_dir)?;
    println!(
        "Snapshot {} exported to {}",
        receipt.stem,
        target_dir.display()
    );
    for path in &receipt.files {
        if let Some(name) = path.file_name() {
            println!("  {}", name.to_string_lossy());
        }
    }
    Ok(())
}

/// Per-frame statistics sent from the producer thread to the display loop
struct FrameStats {
    timestamp: f64,
    min_mm: u16,
    max_mm: u16,
}

/// Stream synthetic frames and print depth statistics
pub fn watch(timeout: Option<u64>, interval_ms: u64) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load();
    let mut provider = SyntheticProvider::new(DEPTH_WIDTH, DEPTH_HEIGHT, config.viz_style)?;

    let (mut sender, mut receiver) = mpsc::channel::<FrameStats>(10);

    // Set up Ctrl+C handler
    let stop_flag = Arc::new(AtomicBool::new(false));
    let stop_flag_clone = stop_flag.clone();
    ctrlc::set_handler(move || {
        stop_flag_clone.store(true, Ordering::SeqCst);
    })?;

    let producer_stop = stop_flag.clone();
    let interval = Duration::from_millis(interval_ms.max(1));
    let producer = std::thread::spawn(move || {
        while !producer_stop.load(Ordering::SeqCst) {
            let Ok(values) = provider.depth_values_mm() else {
                break;
            };
            let valid = values.iter().filter(|&&v| v > 0);
            let stats = FrameStats {
                timestamp: provider.timestamp(),
                min_mm: valid.clone().min().copied().unwrap_or(0),
                max_mm: valid.max().copied().unwrap_or(0),
            };
            // Drop the frame if the display loop is behind
            let _ = sender.try_send(stats);

            if provider.advance(interval.as_secs_f64()).is_err() {
                break;
            }
            std::thread::sleep(interval);
        }
    });

    println!(
        "Watching synthetic depth stream ({}x{}, press Ctrl+C to stop)",
        DEPTH_WIDTH, DEPTH_HEIGHT
    );

    let start = Instant::now();
    loop {
        if stop_flag.load(Ordering::SeqCst) {
            break;
        }
        if let Some(timeout) = timeout {
            if start.elapsed().as_secs() >= timeout {
                stop_flag.store(true, Ordering::SeqCst);
                break;
            }
        }

        match receiver.try_next() {
            Ok(Some(stats)) => {
                println!(
                    "[{:>14.3}] depth range [{}mm, {}mm]",
                    stats.timestamp, stats.min_mm, stats.max_mm
                );
            }
            Ok(None) => break, // Producer gone
            Err(_) => {
                // No frame available yet, wait a bit
                std::thread::sleep(Duration::from_millis(16));
            }
        }
    }

    let _ = producer.join();
    Ok(())
}

/// List export sets in the snapshot directory
pub fn list_exports(dir: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let dir = dir.unwrap_or_else(storage::default_snapshot_dir);
    let sets = storage::list_export_sets(&dir);

    if sets.is_empty() {
        println!("No exports found in {}", dir.display());
        return Ok(());
    }

    println!("Exports in {}:", dir.display());
    println!();
    for set in sets {
        let when = set
            .modified
            .map(|t| {
                chrono::DateTime::<chrono::Local>::from(t)
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string()
            })
            .unwrap_or_else(|| "unknown".to_string());
        let status = if set.is_complete() {
            "complete".to_string()
        } else {
            format!("{}/{} files", set.present.len(), SidecarKind::ALL.len())
        };
        println!("  {}  ({}, {})", set.stem, status, when);
    }
    Ok(())
}

/// Show the parsed contents of one export set
pub fn show_info(stem: &str, dir: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let dir = dir.unwrap_or_else(storage::default_snapshot_dir);

    let path_for = |kind: SidecarKind| dir.join(format!("{}{}", stem, kind.suffix()));

    println!("Export set {} in {}", stem, dir.display());
    println!();

    let intrinsics = export::read_matrix3(&path_for(SidecarKind::Intrinsics))?;
    println!("Intrinsics (3x3):");
    for row in intrinsics.chunks(3) {
        println!("  [{:>10.3} {:>10.3} {:>10.3}]", row[0], row[1], row[2]);
    }

    let transform = export::read_matrix4(&path_for(SidecarKind::Transform))?;
    println!("Transform (4x4):");
    for row in transform.chunks(4) {
        println!(
            "  [{:>10.3} {:>10.3} {:>10.3} {:>10.3}]",
            row[0], row[1], row[2], row[3]
        );
    }

    let duration = export::read_scalar(&path_for(SidecarKind::ExposureDuration))?;
    let offset = export::read_scalar(&path_for(SidecarKind::ExposureOffset))?;
    println!("Exposure duration: {}s", duration);
    println!("Exposure offset:   {}", offset);

    let depth_path = path_for(SidecarKind::DepthBuffer);
    let depth_len = std::fs::metadata(&depth_path)?.len();
    println!("Depth buffer:      {} bytes", depth_len);

    Ok(())
}
