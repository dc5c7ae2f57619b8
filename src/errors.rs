// SPDX-License-Identifier: MPL-2.0

//! Error types for the scanner application

use std::fmt;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, Clone)]
pub enum AppError {
    /// Camera-related errors
    Camera(CameraError),
    /// Terminal setup or rendering errors
    Terminal(String),
    /// No code was found before the deadline (seconds waited)
    Timeout(u64),
    /// Interrupted by the user (Ctrl+C)
    Interrupted,
}

/// Camera-specific errors
#[derive(Debug, Clone)]
pub enum CameraError {
    /// No camera devices found
    NoCameraFound,
    /// Opening the device node failed
    OpenFailed(String),
    /// Device accepted none of the pixel formats we can read
    FormatNotSupported(String),
    /// Streaming stopped or a capture call failed
    StreamFailed(String),
    /// Camera is busy or in use
    Busy,
}

/// Decode outcome for a single frame attempt.
///
/// `NotFound` is the expected steady-state result while the camera is not
/// pointed at a code. `Fault` carries a decoder failure on a frame that did
/// contain a candidate; it is reported but never ends the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// No code located in the frame
    NotFound,
    /// Decoder failed on a located candidate
    Fault(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Camera(e) => write!(f, "Camera error: {}", e),
            AppError::Terminal(msg) => write!(f, "Terminal error: {}", msg),
            AppError::Timeout(secs) => write!(f, "No code found within {} seconds", secs),
            AppError::Interrupted => write!(f, "Interrupted"),
        }
    }
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::NoCameraFound => write!(f, "No camera devices found"),
            CameraError::OpenFailed(msg) => write!(f, "Failed to open camera: {}", msg),
            CameraError::FormatNotSupported(msg) => {
                write!(f, "No supported pixel format: {}", msg)
            }
            CameraError::StreamFailed(msg) => write!(f, "Capture stream failed: {}", msg),
            CameraError::Busy => write!(f, "Camera is busy"),
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::NotFound => write!(f, "No code found in frame"),
            DecodeError::Fault(msg) => write!(f, "Decoder fault: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for CameraError {}
impl std::error::Error for DecodeError {}

// Conversions from sub-errors to AppError
impl From<CameraError> for AppError {
    fn from(err: CameraError) -> Self {
        AppError::Camera(err)
    }
}

// Conversion for I/O errors raised by terminal setup and teardown
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Terminal(err.to_string())
    }
}

// Report encoding failures surface as output errors
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Terminal(err.to_string())
    }
}
