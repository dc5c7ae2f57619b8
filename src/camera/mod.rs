// SPDX-License-Identifier: GPL-3.0-only

//! Camera sources and the scan session
//!
//! A source produces frames; a session fans them out to the preview stream
//! and the serial analyzer. The V4L2 source is the only hardware source;
//! tests substitute scripted ones through the `FrameSource` trait.

pub mod convert;
pub mod session;
pub mod types;
pub mod v4l2;

pub use session::{ScanSession, SessionStreams};
pub use types::{CameraDevice, Frame, PixelFormat, YuvPlanes};
pub use v4l2::{V4l2Camera, enumerate_devices};

use crate::errors::CameraError;

/// A blocking producer of camera frames
///
/// Implementations deliver frames at their own pace. Each returned frame may
/// carry a release hook; the caller owns the frame and must let that hook
/// run exactly once, through `release()` or drop.
pub trait FrameSource {
    /// Block until the next frame is available.
    fn next_frame(&mut self) -> Result<Frame, CameraError>;
}
