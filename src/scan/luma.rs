// SPDX-License-Identifier: GPL-3.0-only

//! Luminance plane extraction
//!
//! Decoding works on luma alone. This module lifts the Y plane out of a
//! frame into a tightly packed grid, dropping stride padding and chroma.

use image::GrayImage;

use crate::camera::types::Frame;

/// Tightly packed 8-bit luminance grid cut from one frame
#[derive(Debug, Clone)]
pub struct LuminanceGrid {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl LuminanceGrid {
    /// Extract the full frame extent.
    ///
    /// Returns None when the frame format carries no directly addressable
    /// luma plane, or when the buffer is shorter than the claimed geometry.
    pub fn from_frame(frame: &Frame) -> Option<Self> {
        Self::from_frame_cropped(frame, 0, 0, frame.width, frame.height)
    }

    /// Extract a rectangular crop of the luma plane.
    pub fn from_frame_cropped(
        frame: &Frame,
        left: u32,
        top: u32,
        width: u32,
        height: u32,
    ) -> Option<Self> {
        if !frame.format.has_luma_plane() {
            return None;
        }
        if width == 0 || height == 0 {
            return None;
        }
        if left.checked_add(width)? > frame.width || top.checked_add(height)? > frame.height {
            return None;
        }

        let stride = frame.stride as usize;
        if stride < frame.width as usize {
            return None;
        }
        let y_offset = frame.yuv_planes.map(|p| p.y_offset).unwrap_or(0);

        let mut data = Vec::with_capacity(width as usize * height as usize);
        for row in 0..height as usize {
            let src_start = y_offset + (top as usize + row) * stride + left as usize;
            let src_end = src_start + width as usize;
            if src_end > frame.data.len() {
                return None;
            }
            data.extend_from_slice(&frame.data[src_start..src_end]);
        }

        Some(Self {
            data,
            width,
            height,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Luma bytes, row-major, no padding
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Owned grayscale view for decoders that consume one
    pub fn to_gray_image(&self) -> Option<GrayImage> {
        GrayImage::from_raw(self.width, self.height, self.data.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::types::{PixelFormat, YuvPlanes};
    use std::sync::Arc;

    fn frame(
        width: u32,
        height: u32,
        data: Vec<u8>,
        format: PixelFormat,
        stride: u32,
        planes: Option<YuvPlanes>,
    ) -> Frame {
        Frame::new(
            width,
            height,
            Arc::from(data.into_boxed_slice()),
            format,
            stride,
            planes,
        )
    }

    #[test]
    fn test_strips_stride_padding() {
        // 2x2 luma with 2 bytes of padding per row
        let data = vec![1, 2, 99, 99, 3, 4, 99, 99];
        let f = frame(2, 2, data, PixelFormat::Gray8, 4, None);
        let grid = LuminanceGrid::from_frame(&f).unwrap();
        assert_eq!(grid.as_bytes(), &[1, 2, 3, 4]);
        assert_eq!(grid.width(), 2);
        assert_eq!(grid.height(), 2);
    }

    #[test]
    fn test_crop_addresses_luma_only() {
        // 4x4 NV12: 16 luma bytes then 8 chroma bytes
        let mut data: Vec<u8> = (0..16).collect();
        data.extend_from_slice(&[128; 8]);
        let planes = YuvPlanes {
            y_offset: 0,
            uv_offset: 16,
            uv_stride: 4,
            v_offset: 0,
            v_stride: 0,
        };
        let f = frame(4, 4, data, PixelFormat::NV12, 4, Some(planes));
        let grid = LuminanceGrid::from_frame_cropped(&f, 1, 1, 2, 2).unwrap();
        assert_eq!(grid.as_bytes(), &[5, 6, 9, 10]);
    }

    #[test]
    fn test_honors_luma_plane_offset() {
        // Luma plane starts 4 bytes into the buffer
        let mut data = vec![99u8; 4];
        data.extend_from_slice(&[7, 8, 9, 10]);
        let planes = YuvPlanes {
            y_offset: 4,
            uv_offset: 8,
            uv_stride: 2,
            v_offset: 0,
            v_stride: 0,
        };
        let f = frame(2, 2, data, PixelFormat::NV12, 2, Some(planes));
        let grid = LuminanceGrid::from_frame(&f).unwrap();
        assert_eq!(grid.as_bytes(), &[7, 8, 9, 10]);
    }

    #[test]
    fn test_rejects_formats_without_luma_plane() {
        let f = frame(2, 2, vec![0; 16], PixelFormat::RGBA, 8, None);
        assert!(LuminanceGrid::from_frame(&f).is_none());
    }

    #[test]
    fn test_rejects_truncated_buffer() {
        let f = frame(4, 4, vec![0; 7], PixelFormat::Gray8, 4, None);
        assert!(LuminanceGrid::from_frame(&f).is_none());
    }

    #[test]
    fn test_rejects_out_of_bounds_crop() {
        let f = frame(4, 4, vec![0; 16], PixelFormat::Gray8, 4, None);
        assert!(LuminanceGrid::from_frame_cropped(&f, 2, 2, 3, 3).is_none());
        assert!(LuminanceGrid::from_frame_cropped(&f, 0, 0, 0, 4).is_none());
    }

    #[test]
    fn test_gray_image_round_trip() {
        let f = frame(2, 2, vec![10, 20, 30, 40], PixelFormat::Gray8, 2, None);
        let grid = LuminanceGrid::from_frame(&f).unwrap();
        let image = grid.to_gray_image().unwrap();
        assert_eq!(image.dimensions(), (2, 2));
        assert_eq!(image.get_pixel(1, 1).0, [40]);
    }
}
