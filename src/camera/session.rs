// SPDX-License-Identifier: GPL-3.0-only

//! Scan session
//!
//! Binds a frame source to the scan pipeline. The capture thread pulls
//! frames, clones them for preview, and parks them in a single-frame slot
//! where a newer frame displaces an unprocessed older one. The analyzer
//! thread drains the slot serially, so the decoder never runs concurrently
//! with itself. Displaced and analyzed frames alike end up released.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use futures::channel::mpsc;
use tracing::{debug, error, trace};

use super::FrameSource;
use super::types::Frame;
use crate::constants::{capture, timing};
use crate::errors::CameraError;
use crate::scan::decoder::Decoder;
use crate::scan::pipeline::ScanPipeline;

/// Holder for the newest unprocessed frame.
///
/// Same shape as a last-frame cache: a mutex around an optional frame.
/// Putting releases whatever sat there before.
struct LatestFrameSlot(Mutex<Option<Frame>>);

impl LatestFrameSlot {
    fn new() -> Self {
        Self(Mutex::new(None))
    }

    /// Park a frame, releasing any displaced predecessor. Returns true
    /// when an unprocessed frame was displaced.
    fn put(&self, frame: Frame) -> bool {
        let displaced = self.0.lock().unwrap().replace(frame);
        match displaced {
            Some(old) => {
                old.release();
                true
            }
            None => false,
        }
    }

    fn take(&self) -> Option<Frame> {
        self.0.lock().unwrap().take()
    }
}

/// Streams handed to the consumer when a session starts
pub struct SessionStreams {
    /// Preview copies of captured frames, newest last. Bounded; stale
    /// previews are dropped when the consumer falls behind.
    pub preview: mpsc::Receiver<Frame>,
    /// The scan payload. At most one message per session.
    pub results: mpsc::Receiver<String>,
}

/// A running scan session
///
/// Stops and joins its threads on drop. Results produced after the consumer
/// goes away are discarded.
pub struct ScanSession {
    stop: Arc<AtomicBool>,
    slot: Arc<LatestFrameSlot>,
    capture_handle: Option<JoinHandle<()>>,
    analyzer_handle: Option<JoinHandle<()>>,
}

impl ScanSession {
    /// Start capture and analysis threads over the given source and decoder.
    pub fn start<S, D>(source: S, decoder: D) -> (Self, SessionStreams)
    where
        S: FrameSource + Send + 'static,
        D: Decoder + Send + 'static,
    {
        let (preview_tx, preview_rx) = mpsc::channel(capture::PREVIEW_CHANNEL_CAPACITY);
        let (result_tx, result_rx) = mpsc::channel(1);

        let stop = Arc::new(AtomicBool::new(false));
        let slot = Arc::new(LatestFrameSlot::new());

        let capture_handle = {
            let stop = Arc::clone(&stop);
            let slot = Arc::clone(&slot);
            thread::spawn(move || capture_loop(source, slot, preview_tx, stop))
        };

        let analyzer_handle = {
            let stop = Arc::clone(&stop);
            let slot = Arc::clone(&slot);
            thread::spawn(move || analyzer_loop(decoder, slot, result_tx, stop))
        };

        let session = Self {
            stop,
            slot,
            capture_handle: Some(capture_handle),
            analyzer_handle: Some(analyzer_handle),
        };
        let streams = SessionStreams {
            preview: preview_rx,
            results: result_rx,
        };
        (session, streams)
    }
}

impl Drop for ScanSession {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.capture_handle.take() {
            let _ = handle.join();
        }
        if let Some(handle) = self.analyzer_handle.take() {
            let _ = handle.join();
        }
        // Both threads are gone; anything still parked gets released here
        if let Some(frame) = self.slot.take() {
            frame.release();
        }
    }
}

/// Pull frames from the source until stopped or the source fails.
fn capture_loop<S: FrameSource>(
    mut source: S,
    slot: Arc<LatestFrameSlot>,
    mut preview_tx: mpsc::Sender<Frame>,
    stop: Arc<AtomicBool>,
) {
    let mut frames: u64 = 0;
    let mut displaced: u64 = 0;

    while !stop.load(Ordering::SeqCst) {
        let frame = match source.next_frame() {
            Ok(frame) => frame,
            Err(CameraError::StreamFailed(msg)) => {
                error!(error = %msg, "camera stream ended");
                stop.store(true, Ordering::SeqCst);
                break;
            }
            Err(e) => {
                error!(error = %e, "camera source failed");
                stop.store(true, Ordering::SeqCst);
                break;
            }
        };

        // Preview keeps its own bounded lane; a full lane drops the copy
        let _ = preview_tx.try_send(frame.preview_clone());

        frames += 1;
        if slot.put(frame) {
            displaced += 1;
        }

        if frames % timing::FRAME_LOG_INTERVAL == 0 {
            trace!(frames, displaced, "capture running");
        }
    }

    debug!(frames, displaced, "capture loop finished");
}

/// Drain the slot serially, one decode attempt per frame.
fn analyzer_loop<D: Decoder>(
    decoder: D,
    slot: Arc<LatestFrameSlot>,
    mut result_tx: mpsc::Sender<String>,
    stop: Arc<AtomicBool>,
) {
    let mut pipeline = ScanPipeline::new(decoder, move |content| {
        // The consumer may already be gone; the payload is dropped then
        let _ = result_tx.try_send(content);
    });

    while !stop.load(Ordering::SeqCst) {
        match slot.take() {
            Some(frame) => pipeline.on_frame(frame),
            None => thread::sleep(timing::ANALYZER_IDLE_POLL),
        }
    }
}
