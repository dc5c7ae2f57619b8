// SPDX-License-Identifier: GPL-3.0-only

//! Scan pipeline
//!
//! Serial frame-to-result pipeline. Frames arrive one at a time, each gets
//! at most one decode attempt, and the first payload resolves the pipeline
//! for good. Every frame handed in is released on every path out; a decoder
//! failure or panic is reported and the next frame gets a fresh attempt.

use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, trace, warn};

use super::decoder::Decoder;
use super::luma::LuminanceGrid;
use crate::camera::types::Frame;
use crate::errors::DecodeError;

/// Pipeline lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// No payload produced yet; frames are analyzed as they arrive
    Idle,
    /// A payload was produced; further frames are released unexamined
    Resolved,
}

/// The frame-to-result pipeline
///
/// Owns the decoder, so decode attempts are serialized by construction.
/// Resolution is permanent; a new scan means a new pipeline.
pub struct ScanPipeline<D: Decoder> {
    decoder: D,
    state: ScanState,
    on_result: Box<dyn FnMut(String) + Send>,
}

impl<D: Decoder> ScanPipeline<D> {
    pub fn new(decoder: D, on_result: impl FnMut(String) + Send + 'static) -> Self {
        Self {
            decoder,
            state: ScanState::Idle,
            on_result: Box::new(on_result),
        }
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Analyze one frame. The frame is released on every path out of here.
    pub fn on_frame(&mut self, frame: Frame) {
        if self.state == ScanState::Resolved {
            frame.release();
            return;
        }

        if !frame.format.has_luma_plane() {
            trace!(format = ?frame.format, "skipping frame without luma plane");
            frame.release();
            return;
        }

        let Some(grid) = LuminanceGrid::from_frame(&frame) else {
            warn!(
                width = frame.width,
                height = frame.height,
                len = frame.data.len(),
                "skipping frame with inconsistent geometry"
            );
            frame.release();
            return;
        };

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.decoder.decode(&grid)));
        // The decoder may hold partial state after any outcome, panic included
        self.decoder.reset();

        match outcome {
            Ok(Ok(content)) => {
                self.state = ScanState::Resolved;
                debug!(
                    len = content.len(),
                    latency_ms = frame.captured_at.elapsed().as_millis(),
                    "scan resolved"
                );
                (self.on_result)(content);
            }
            Ok(Err(DecodeError::NotFound)) => {
                trace!("no code in frame");
            }
            Ok(Err(DecodeError::Fault(msg))) => {
                warn!(error = %msg, "decoder fault, continuing with next frame");
            }
            Err(payload) => {
                let msg = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                warn!(error = %msg, "decoder panicked, continuing with next frame");
            }
        }

        frame.release();
    }
}
