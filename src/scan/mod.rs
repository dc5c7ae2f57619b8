// SPDX-License-Identifier: GPL-3.0-only

//! Single-shot scan machinery
//!
//! Frames go in, at most one payload comes out. The pipeline drives one
//! decoder serially; payload classification sits alongside for whoever
//! consumes the result.

pub mod action;
pub mod decoder;
pub mod luma;
pub mod pipeline;

pub use action::PayloadAction;
pub use decoder::{Decoder, QrDecoder};
pub use luma::LuminanceGrid;
pub use pipeline::{ScanPipeline, ScanState};
