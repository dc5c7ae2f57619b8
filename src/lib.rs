// SPDX-License-Identifier: MPL-2.0

//! OpenScan - an offline QR code scanner for the terminal
//!
//! This library provides the core functionality for the OpenScan
//! application: camera capture over V4L2, single-shot QR analysis and
//! the terminal UI.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`app`]: Terminal UI and the interactive run loop
//! - [`camera`]: Frame sources and the scan session
//! - [`scan`]: Luminance grids, decoding and payload actions
//! - [`settings`]: Session-scoped user settings
//!
//! # Example
//!
//! ```ignore
//! // Interactive use goes through the binary:
//! // openscan            (terminal UI)
//! // openscan scan --json
//! ```

pub mod app;
pub mod camera;
pub mod constants;
pub mod errors;
pub mod scan;
pub mod settings;

// Re-export commonly used types
pub use camera::{Frame, FrameSource, ScanSession, SessionStreams};
pub use errors::{AppError, AppResult, CameraError, DecodeError};
pub use scan::{Decoder, PayloadAction, QrDecoder, ScanPipeline, ScanState};
pub use settings::Settings;
