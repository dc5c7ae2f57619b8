// SPDX-License-Identifier: GPL-3.0-only

//! Shared types for camera sources

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// Pixel format for camera frames
///
/// Sources deliver planar luma-chroma frames wherever the hardware allows it;
/// packed and RGB formats exist for repacking and preview rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// NV12 - Semi-planar 4:2:0 (Y plane + interleaved UV plane)
    NV12,
    /// NV21 - Semi-planar 4:2:0 (Y plane + interleaved VU plane)
    NV21,
    /// I420 - Planar 4:2:0 (separate Y, U, V planes)
    I420,
    /// YUYV - Packed 4:2:2 (Y0 U Y1 V interleaved)
    /// Common raw format from webcam sensors
    YUYV,
    /// Gray8 - 8-bit grayscale (single channel)
    Gray8,
    /// RGB24 - 24-bit RGB (3 bytes per pixel, no alpha)
    RGB24,
    /// RGBA - 32-bit with alpha (4 bytes per pixel)
    RGBA,
}

impl PixelFormat {
    /// Whether frames in this format start with a directly addressable
    /// luminance plane. Only such frames can be analyzed; everything else
    /// is skipped.
    pub fn has_luma_plane(&self) -> bool {
        matches!(self, Self::NV12 | Self::NV21 | Self::I420 | Self::Gray8)
    }

    /// Parse format from a V4L2 FourCC code
    pub fn from_fourcc(fourcc: &[u8; 4]) -> Option<Self> {
        match fourcc {
            b"NV12" => Some(Self::NV12),
            b"NV21" => Some(Self::NV21),
            b"YU12" => Some(Self::I420),
            b"YUYV" => Some(Self::YUYV),
            b"GREY" => Some(Self::Gray8),
            b"RGB3" => Some(Self::RGB24),
            b"AB24" => Some(Self::RGBA),
            _ => None,
        }
    }

}

/// YUV plane offsets for multi-plane formats (NV12, NV21, I420)
///
/// Planes live at different offsets within one contiguous buffer. For NV12
/// and NV21 the chroma plane is interleaved and `v_offset`/`v_stride` are
/// unused; for I420 `uv_offset` addresses the U plane and `v_offset` the
/// V plane.
#[derive(Debug, Clone, Copy)]
pub struct YuvPlanes {
    /// Y plane offset in bytes from start of buffer
    pub y_offset: usize,
    /// Chroma plane offset in bytes (NV12/NV21: interleaved, I420: U plane)
    pub uv_offset: usize,
    /// Chroma plane stride in bytes
    pub uv_stride: u32,
    /// V plane offset in bytes (I420 only, 0 otherwise)
    pub v_offset: usize,
    /// V plane stride in bytes (I420 only)
    pub v_stride: u32,
}

/// A single frame from a camera source
///
/// A frame owns its buffer (shared for preview copies) and optionally a
/// release hook handed out by the source. The hook runs exactly once, on
/// explicit `release()` or on drop, whichever comes first. Every code path
/// that takes ownership of a frame is responsible for letting that happen;
/// none may run the hook twice.
pub struct Frame {
    pub width: u32,
    pub height: u32,
    /// Frame data, all planes contiguous
    pub data: Arc<[u8]>,
    /// Pixel format of the data
    pub format: PixelFormat,
    /// Row stride for the luma or packed data (bytes per row, may include padding)
    pub stride: u32,
    /// Additional plane offsets (for NV12/NV21/I420 formats)
    pub yuv_planes: Option<YuvPlanes>,
    /// Timestamp when the frame was captured (for latency diagnostics)
    pub captured_at: Instant,
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Frame {
    /// Create a frame with no release hook attached
    pub fn new(
        width: u32,
        height: u32,
        data: Arc<[u8]>,
        format: PixelFormat,
        stride: u32,
        yuv_planes: Option<YuvPlanes>,
    ) -> Self {
        Self {
            width,
            height,
            data,
            format,
            stride,
            yuv_planes,
            captured_at: Instant::now(),
            release: None,
        }
    }

    /// Attach a release hook. Hooks stack; earlier hooks run first.
    pub fn on_release(mut self, hook: impl FnOnce() + Send + 'static) -> Self {
        self.release = Some(match self.release.take() {
            Some(prev) => Box::new(move || {
                prev();
                hook();
            }),
            None => Box::new(hook),
        });
        self
    }

    /// Run the release hook now and consume the frame
    pub fn release(mut self) {
        if let Some(hook) = self.release.take() {
            hook();
        }
    }

    /// Copy for preview rendering. Shares the pixel buffer but carries no
    /// release hook; dropping it has no effect on the source.
    pub fn preview_clone(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            data: Arc::clone(&self.data),
            format: self.format,
            stride: self.stride,
            yuv_planes: self.yuv_planes,
            captured_at: self.captured_at,
            release: None,
        }
    }
}

impl Drop for Frame {
    fn drop(&mut self) {
        if let Some(hook) = self.release.take() {
            hook();
        }
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("format", &self.format)
            .field("stride", &self.stride)
            .field("len", &self.data.len())
            .field("armed", &self.release.is_some())
            .finish()
    }
}

/// A camera device usable for scanning
#[derive(Debug, Clone)]
pub struct CameraDevice {
    /// Human-readable device name (V4L2 card)
    pub name: String,
    /// Device node path (e.g., /dev/video0)
    pub path: String,
}
