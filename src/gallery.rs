// SPDX-License-Identifier: MPL-2.0

//! Gallery sink for rendered snapshot images
//!
//! The exporter hands its color and depth-visualization bitmaps to a
//! [`GallerySink`] and moves on: submission is fire-and-forget, the sink
//! picks the file names, and failures are logged, never surfaced to the
//! submitter. [`PicturesGallery`] saves PNGs under the user's pictures
//! directory on a tokio runtime; [`NullGallery`] discards everything.

use crate::capture::Bitmap;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Destination for rendered snapshot images
///
/// Implementations must not block the submitter and must not surface
/// failures through `submit` - the export path treats gallery saves as
/// best-effort.
pub trait GallerySink: Send + Sync {
    /// Queue one bitmap for saving; `label` distinguishes the image kind
    /// (e.g. "color", "depth") and may appear in the saved file name.
    fn submit(&self, image: Bitmap, label: &str);
}

/// Gallery sink that saves PNG files under a pictures directory
///
/// Each submission is spawned onto the provided runtime handle: PNG
/// encoding runs on a blocking task, the write goes through async fs, and
/// any failure is logged and dropped. File names are wall-clock derived;
/// the submitter has no name control.
pub struct PicturesGallery {
    dir: PathBuf,
    handle: tokio::runtime::Handle,
    pending: Mutex<Vec<JoinHandle<()>>>,
}

impl PicturesGallery {
    pub fn new(dir: PathBuf, handle: tokio::runtime::Handle) -> Self {
        Self {
            dir,
            handle,
            pending: Mutex::new(Vec::new()),
        }
    }

    /// Wait for all outstanding saves to finish
    ///
    /// The exporter never calls this; it exists for the application to
    /// drain pending saves before process exit, since a short-lived CLI
    /// would otherwise take its queued writes down with it.
    pub async fn flush(&self) {
        let tasks = match self.pending.lock() {
            Ok(mut pending) => pending.drain(..).collect::<Vec<_>>(),
            Err(_) => return,
        };
        for task in tasks {
            let _ = task.await;
        }
    }
}

impl GallerySink for PicturesGallery {
    fn submit(&self, image: Bitmap, label: &str) {
        let dir = self.dir.clone();
        let name = format!(
            "{}_{}.png",
            label,
            chrono::Local::now().format("%Y%m%d_%H%M%S_%3f")
        );

        let task = self.handle.spawn(async move {
            if let Err(e) = save_png(&dir, &name, image).await {
                warn!(file = %name, error = %e, "Gallery save failed");
            }
        });

        if let Ok(mut pending) = self.pending.lock() {
            // Reap tasks that already completed so the list stays small
            pending.retain(|t| !t.is_finished());
            pending.push(task);
        }
    }
}

/// Encode a bitmap as PNG on a blocking task and write it out
async fn save_png(dir: &PathBuf, name: &str, image: Bitmap) -> Result<(), String> {
    let encoded = tokio::task::spawn_blocking(move || {
        let rgba = image::RgbaImage::from_raw(image.width, image.height, image.pixels.to_vec())
            .ok_or_else(|| "Bitmap dimensions do not match pixel data".to_string())?;

        let mut buf = Vec::new();
        rgba.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .map_err(|e| format!("PNG encoding failed: {}", e))?;
        Ok::<_, String>(buf)
    })
    .await
    .map_err(|e| format!("Encoding task failed: {}", e))??;

    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| format!("Cannot create gallery directory: {}", e))?;

    let path = dir.join(name);
    tokio::fs::write(&path, encoded)
        .await
        .map_err(|e| format!("Write failed: {}", e))?;

    debug!(path = %path.display(), "Saved gallery image");
    Ok(())
}

/// Gallery sink that discards all submissions
///
/// Used when the gallery is disabled and in tests.
pub struct NullGallery;

impl GallerySink for NullGallery {
    fn submit(&self, _image: Bitmap, _label: &str) {}
}
