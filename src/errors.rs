// SPDX-License-Identifier: MPL-2.0

//! Error types for the snapshot tool

use std::fmt;
use std::path::PathBuf;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, Clone)]
pub enum AppError {
    /// Frame capture errors
    Capture(CaptureError),
    /// Snapshot export errors
    Export(ExportError),
    /// Configuration errors
    Config(String),
    /// Storage/filesystem errors
    Storage(String),
    /// Generic error with message
    Other(String),
}

/// Frame capture errors
#[derive(Debug, Clone)]
pub enum CaptureError {
    /// Provider has no depth frame yet
    NoDepthFrame,
    /// Provider has no color frame yet
    NoColorFrame,
    /// Depth plane backing buffer is smaller than bytes_per_row * height
    PlaneSizeMismatch { expected: usize, actual: usize },
    /// Depth plane lock could not be acquired
    PlaneUnavailable,
}

/// Snapshot export errors
#[derive(Debug, Clone)]
pub enum ExportError {
    /// Writing a sidecar file failed
    WriteFailed { path: PathBuf, message: String },
    /// A sidecar file could not be read back or parsed
    ReadFailed { path: PathBuf, message: String },
    /// Target directory could not be resolved or created
    DirectoryUnavailable(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Capture(e) => write!(f, "Capture error: {}", e),
            AppError::Export(e) => write!(f, "Export error: {}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Storage(msg) => write!(f, "Storage error: {}", msg),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::NoDepthFrame => write!(f, "No depth frame available"),
            CaptureError::NoColorFrame => write!(f, "No color frame available"),
            CaptureError::PlaneSizeMismatch { expected, actual } => write!(
                f,
                "Depth plane too small: expected {} bytes, have {}",
                expected, actual
            ),
            CaptureError::PlaneUnavailable => write!(f, "Depth plane lock unavailable"),
        }
    }
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::WriteFailed { path, message } => {
                write!(f, "Failed to write {}: {}", path.display(), message)
            }
            ExportError::ReadFailed { path, message } => {
                write!(f, "Failed to read {}: {}", path.display(), message)
            }
            ExportError::DirectoryUnavailable(msg) => {
                write!(f, "Target directory unavailable: {}", msg)
            }
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for CaptureError {}
impl std::error::Error for ExportError {}

// Conversions from sub-errors to AppError
impl From<CaptureError> for AppError {
    fn from(err: CaptureError) -> Self {
        AppError::Capture(err)
    }
}

impl From<ExportError> for AppError {
    fn from(err: ExportError) -> Self {
        AppError::Export(err)
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Other(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Other(msg.to_string())
    }
}

// Conversions for I/O errors
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}
