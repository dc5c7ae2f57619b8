// SPDX-License-Identifier: GPL-3.0-only

//! V4L2 camera source
//!
//! Opens a /dev/video* node, negotiates a pixel format with a readable luma
//! plane and streams memory-mapped buffers from a background thread. Buffers
//! are copied out of the mmap arena before hand-off; packed 4:2:2 sensors
//! are repacked to NV12 so every delivered frame carries a contiguous luma
//! plane.

use std::path::Path;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, SyncSender, sync_channel};
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};
use v4l::buffer::Type;
use v4l::io::mmap::Stream as MmapStream;
use v4l::io::traits::CaptureStream;
use v4l::video::Capture;
use v4l::video::capture::Parameters;
use v4l::{Device, Format, FourCC};

use super::FrameSource;
use super::convert;
use super::types::{CameraDevice, Frame, PixelFormat, YuvPlanes};
use crate::constants::capture;
use crate::errors::CameraError;

/// Formats we ask the driver for, most convenient first: the planar
/// family streams as-is, GREY skips chroma entirely, YUYV needs a repack.
const PREFERRED_FOURCCS: [&[u8; 4]; 5] = [b"NV12", b"NV21", b"YU12", b"GREY", b"YUYV"];

type CaptureResult = Result<Frame, CameraError>;

/// V4L2 camera source
///
/// The capture thread starts lazily on the first `next_frame()` call and
/// stops when the source is dropped.
pub struct V4l2Camera {
    name: String,
    format: Format,
    pixel_format: PixelFormat,
    device: Option<Device>,
    receiver: Option<Receiver<CaptureResult>>,
    thread_handle: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for V4l2Camera {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("V4l2Camera")
            .field("name", &self.name)
            .field("format", &self.format)
            .field("pixel_format", &self.pixel_format)
            .field("started", &self.receiver.is_some())
            .finish()
    }
}

impl V4l2Camera {
    /// Open a device node and negotiate the capture format.
    pub fn open(path: &str) -> Result<Self, CameraError> {
        let device = Device::with_path(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::ResourceBusy => CameraError::Busy,
            _ => CameraError::OpenFailed(format!("{}: {}", path, e)),
        })?;

        let name = device
            .query_caps()
            .map(|caps| caps.card)
            .unwrap_or_else(|_| path.to_string());

        let (format, pixel_format) = negotiate_format(&device)?;

        // Frame rate is advisory for scanning; some drivers reject S_PARM
        let params = Parameters::with_fps(capture::REQUESTED_FPS);
        if let Err(e) = Capture::set_params(&device, &params) {
            warn!(device = %path, error = %e, "failed to set frame rate, continuing");
        }

        debug!(
            device = %path,
            format = ?pixel_format,
            width = format.width,
            height = format.height,
            stride = format.stride,
            "negotiated capture format"
        );

        Ok(Self {
            name,
            format,
            pixel_format,
            device: Some(device),
            receiver: None,
            thread_handle: None,
        })
    }

    /// Human-readable device name (V4L2 card)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Start the capture thread if not already running.
    fn ensure_started(&mut self) -> Result<(), CameraError> {
        if self.receiver.is_some() {
            return Ok(());
        }

        let device = self
            .device
            .take()
            .ok_or_else(|| CameraError::StreamFailed("device already consumed".to_string()))?;

        let format = self.format;
        let pixel_format = self.pixel_format;
        let (tx, rx) = sync_channel(capture::BUFFER_COUNT as usize);

        let handle = thread::spawn(move || {
            capture_loop(device, format, pixel_format, tx);
        });

        self.receiver = Some(rx);
        self.thread_handle = Some(handle);

        Ok(())
    }
}

impl FrameSource for V4l2Camera {
    fn next_frame(&mut self) -> Result<Frame, CameraError> {
        self.ensure_started()?;

        let receiver = self
            .receiver
            .as_ref()
            .ok_or_else(|| CameraError::StreamFailed("receiver not initialized".to_string()))?;

        match receiver.recv() {
            Ok(result) => result,
            Err(_) => Err(CameraError::StreamFailed(
                "capture thread exited".to_string(),
            )),
        }
    }
}

impl Drop for V4l2Camera {
    fn drop(&mut self) {
        // Drop the receiver to signal the thread to stop
        drop(self.receiver.take());

        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

/// Ask the driver for each preferred format until one sticks.
///
/// V4L2 never rejects S_FMT outright; unsupported formats come back
/// substituted, so acceptance is checked by comparing the returned FourCC.
fn negotiate_format(device: &Device) -> Result<(Format, PixelFormat), CameraError> {
    for fourcc in PREFERRED_FOURCCS {
        let request = Format::new(
            capture::REQUESTED_WIDTH,
            capture::REQUESTED_HEIGHT,
            FourCC::new(fourcc),
        );
        let accepted = Capture::set_format(device, &request)
            .map_err(|e| CameraError::OpenFailed(format!("set format: {}", e)))?;
        if accepted.fourcc != FourCC::new(fourcc) {
            continue;
        }
        if let Some(pixel_format) = PixelFormat::from_fourcc(fourcc) {
            return Ok((accepted, pixel_format));
        }
    }
    Err(CameraError::FormatNotSupported(
        "device offers none of NV12, NV21, YU12, GREY, YUYV".to_string(),
    ))
}

/// Background thread capture loop.
///
/// Dequeues buffers until the consumer drops the receiver or the stream
/// fails. Terminal errors are forwarded through the channel.
fn capture_loop(
    device: Device,
    format: Format,
    pixel_format: PixelFormat,
    tx: SyncSender<CaptureResult>,
) {
    let mut stream = match MmapStream::with_buffers(&device, Type::VideoCapture, capture::BUFFER_COUNT)
    {
        Ok(stream) => stream,
        Err(e) => {
            let _ = tx.send(Err(CameraError::StreamFailed(format!("mmap stream: {}", e))));
            return;
        }
    };

    loop {
        let (buf, _meta) = match CaptureStream::next(&mut stream) {
            Ok(pair) => pair,
            Err(e) => {
                let _ = tx.send(Err(CameraError::StreamFailed(format!("capture: {}", e))));
                return;
            }
        };

        // The mmap buffer is only valid until the next dequeue; copy out
        let Some(frame) = build_frame(buf, &format, pixel_format) else {
            warn!(
                len = buf.len(),
                width = format.width,
                height = format.height,
                "dropping undersized capture buffer"
            );
            continue;
        };

        // Blocking send paces capture to the consumer; Err means it is gone
        if tx.send(Ok(frame)).is_err() {
            return;
        }
    }
}

/// Copy a raw capture buffer into an owned frame, repacking if needed.
///
/// Returns None when the buffer is too short for the negotiated format.
fn build_frame(data: &[u8], format: &Format, pixel_format: PixelFormat) -> Option<Frame> {
    let width = format.width;
    let height = format.height;

    match pixel_format {
        PixelFormat::YUYV => {
            let stride = if format.stride > 0 {
                format.stride
            } else {
                width * 2
            };
            let (nv12, planes) = convert::yuyv_to_nv12(data, width, height, stride)?;
            Some(Frame::new(
                width,
                height,
                Arc::from(nv12.into_boxed_slice()),
                PixelFormat::NV12,
                width,
                Some(planes),
            ))
        }
        PixelFormat::NV12 | PixelFormat::NV21 => {
            let stride = if format.stride > 0 { format.stride } else { width };
            let y_size = stride as usize * height as usize;
            let expected = y_size + stride as usize * (height as usize / 2);
            if data.len() < expected {
                return None;
            }
            let planes = YuvPlanes {
                y_offset: 0,
                uv_offset: y_size,
                uv_stride: stride,
                v_offset: 0,
                v_stride: 0,
            };
            Some(Frame::new(
                width,
                height,
                Arc::from(&data[..expected]),
                pixel_format,
                stride,
                Some(planes),
            ))
        }
        PixelFormat::I420 => {
            let stride = if format.stride > 0 { format.stride } else { width };
            let y_size = stride as usize * height as usize;
            let c_stride = stride as usize / 2;
            let c_size = c_stride * (height as usize / 2);
            let expected = y_size + 2 * c_size;
            if data.len() < expected {
                return None;
            }
            let planes = YuvPlanes {
                y_offset: 0,
                uv_offset: y_size,
                uv_stride: c_stride as u32,
                v_offset: y_size + c_size,
                v_stride: c_stride as u32,
            };
            Some(Frame::new(
                width,
                height,
                Arc::from(&data[..expected]),
                PixelFormat::I420,
                stride,
                Some(planes),
            ))
        }
        PixelFormat::Gray8 => {
            let stride = if format.stride > 0 { format.stride } else { width };
            let expected = stride as usize * height as usize;
            if data.len() < expected {
                return None;
            }
            Some(Frame::new(
                width,
                height,
                Arc::from(&data[..expected]),
                PixelFormat::Gray8,
                stride,
                None,
            ))
        }
        _ => None,
    }
}

/// List capture-capable video devices.
///
/// Scans /dev/video* in node order. Nodes that cannot be opened, or that
/// expose none of the formats negotiation accepts (metadata companions,
/// compressed-only nodes), are skipped.
pub fn enumerate_devices() -> Vec<CameraDevice> {
    let Ok(entries) = std::fs::read_dir("/dev") else {
        return Vec::new();
    };

    let mut nodes: Vec<_> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("video"))
        })
        .collect();
    nodes.sort_by_key(|p| video_node_index(p));

    let mut devices = Vec::new();
    for path in nodes {
        let path_str = path.to_string_lossy().to_string();
        let Ok(device) = Device::with_path(&path) else {
            debug!(device = %path_str, "skipping unopenable video node");
            continue;
        };
        let Ok(caps) = device.query_caps() else {
            continue;
        };
        // Metadata-only companion nodes reject capture format enumeration
        let Ok(formats) = Capture::enum_formats(&device) else {
            continue;
        };
        let usable = formats
            .iter()
            .any(|desc| PREFERRED_FOURCCS.into_iter().any(|cc| desc.fourcc == FourCC::new(cc)));
        if !usable {
            debug!(device = %path_str, "skipping node without a readable format");
            continue;
        }
        devices.push(CameraDevice {
            name: caps.card,
            path: path_str,
        });
    }
    devices
}

/// Numeric suffix of a /dev/videoN path, for stable ordering
fn video_node_index(path: &Path) -> u32 {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.strip_prefix("video"))
        .and_then(|n| n.parse().ok())
        .unwrap_or(u32::MAX)
}
