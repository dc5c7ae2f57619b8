// SPDX-License-Identifier: GPL-3.0-only

//! Decoder seam
//!
//! One trait, one production implementation backed by rqrr. The trait keeps
//! session plumbing testable without a camera or printed codes.

use rqrr::PreparedImage;
use tracing::trace;

use super::luma::LuminanceGrid;
use crate::errors::DecodeError;

/// A single-payload decoder, invoked at most once per frame
pub trait Decoder {
    /// Attempt to extract one payload from the grid.
    fn decode(&mut self, grid: &LuminanceGrid) -> Result<String, DecodeError>;

    /// Clear per-attempt state. Runs after every attempt, hit or miss.
    fn reset(&mut self);
}

/// QR decoder backed by rqrr
#[derive(Debug, Default)]
pub struct QrDecoder;

impl QrDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl Decoder for QrDecoder {
    fn decode(&mut self, grid: &LuminanceGrid) -> Result<String, DecodeError> {
        let image = grid
            .to_gray_image()
            .ok_or_else(|| DecodeError::Fault("grid does not match its geometry".to_string()))?;

        let mut prepared = PreparedImage::prepare(image);
        let grids = prepared.detect_grids();
        let Some(symbol) = grids.first() else {
            return Err(DecodeError::NotFound);
        };

        let (meta, content) = symbol
            .decode()
            .map_err(|e| DecodeError::Fault(e.to_string()))?;
        trace!(
            version = meta.version.0,
            ecc_level = meta.ecc_level,
            "decoded symbol"
        );
        Ok(content)
    }

    fn reset(&mut self) {
        // Detection state is rebuilt inside decode; nothing carries over
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::types::{Frame, PixelFormat};
    use std::sync::Arc;

    #[test]
    fn test_blank_frame_reports_not_found() {
        let data: Arc<[u8]> = Arc::from(vec![200u8; 64 * 64].into_boxed_slice());
        let frame = Frame::new(64, 64, data, PixelFormat::Gray8, 64, None);
        let grid = LuminanceGrid::from_frame(&frame).unwrap();

        let mut decoder = QrDecoder::new();
        assert_eq!(decoder.decode(&grid), Err(DecodeError::NotFound));
    }

    #[test]
    fn test_noise_frame_does_not_panic() {
        // Deterministic speckle: no valid symbol, decode must stay contained
        let mut bytes = vec![0u8; 64 * 64];
        let mut seed: u32 = 0x1234_5678;
        for b in bytes.iter_mut() {
            seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            *b = if seed & 0x100 == 0 { 20 } else { 230 };
        }
        let data: Arc<[u8]> = Arc::from(bytes.into_boxed_slice());
        let frame = Frame::new(64, 64, data, PixelFormat::Gray8, 64, None);
        let grid = LuminanceGrid::from_frame(&frame).unwrap();

        let mut decoder = QrDecoder::new();
        let _ = decoder.decode(&grid);
        decoder.reset();
    }
}
