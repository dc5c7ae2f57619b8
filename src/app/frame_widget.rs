// SPDX-License-Identifier: GPL-3.0-only

//! Camera preview rendering with half-block characters
//!
//! Each terminal cell shows two vertically stacked pixels: the upper
//! half block glyph with the foreground color carrying the top pixel
//! and the background color carrying the bottom pixel.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::Widget;

use crate::camera::{Frame, PixelFormat};

pub struct FrameWidget<'a> {
    frame: Option<&'a Frame>,
}

impl<'a> FrameWidget<'a> {
    pub fn new(frame: Option<&'a Frame>) -> Self {
        Self { frame }
    }
}

impl Widget for FrameWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let Some(frame) = self.frame else {
            let message = "Waiting for camera...";
            let x = area.x + area.width.saturating_sub(message.len() as u16) / 2;
            let y = area.y + area.height / 2;
            buf.set_string(x, y, message, Style::default().fg(Color::DarkGray));
            return;
        };

        if frame.width == 0 || frame.height == 0 {
            return;
        }

        // Aspect-fit the frame; a cell is one pixel wide and two tall.
        let avail_w = area.width as f32;
        let avail_h = area.height as f32 * 2.0;
        let scale = (avail_w / frame.width as f32).min(avail_h / frame.height as f32);
        let out_w = ((frame.width as f32 * scale) as u16).clamp(1, area.width);
        let out_h = (((frame.height as f32 * scale) as u16) / 2).clamp(1, area.height);
        let x_off = area.x + (area.width - out_w) / 2;
        let y_off = area.y + (area.height - out_h) / 2;
        let out_h_px = out_h as u32 * 2;

        for ty in 0..out_h {
            for tx in 0..out_w {
                let sx = tx as u32 * frame.width / out_w as u32;
                let sy_top = ty as u32 * 2 * frame.height / out_h_px;
                let sy_bot = (ty as u32 * 2 + 1) * frame.height / out_h_px;

                let (tr, tg, tb) = sample_rgb(frame, sx, sy_top);
                let (br, bg, bb) = sample_rgb(frame, sx, sy_bot);

                if let Some(cell) = buf.cell_mut((x_off + tx, y_off + ty)) {
                    cell.set_char('\u{2580}');
                    cell.set_fg(Color::Rgb(tr, tg, tb));
                    cell.set_bg(Color::Rgb(br, bg, bb));
                }
            }
        }
    }
}

fn at(data: &[u8], idx: usize) -> u8 {
    data.get(idx).copied().unwrap_or(0)
}

/// Sample one pixel as RGB, converting from the frame's native format.
pub fn sample_rgb(frame: &Frame, x: u32, y: u32) -> (u8, u8, u8) {
    let data: &[u8] = &frame.data;
    let stride = frame.stride as usize;
    let (x, y) = (x as usize, y as usize);

    match frame.format {
        PixelFormat::RGBA => {
            let idx = y * stride + x * 4;
            (at(data, idx), at(data, idx + 1), at(data, idx + 2))
        }
        PixelFormat::RGB24 => {
            let idx = y * stride + x * 3;
            (at(data, idx), at(data, idx + 1), at(data, idx + 2))
        }
        PixelFormat::Gray8 => {
            let luma = at(data, y * stride + x);
            (luma, luma, luma)
        }
        PixelFormat::NV12 | PixelFormat::NV21 => {
            let (y_offset, uv_offset, uv_stride) = match frame.yuv_planes {
                Some(p) => (p.y_offset, p.uv_offset, p.uv_stride as usize),
                None => (0, stride * frame.height as usize, stride),
            };
            let luma = at(data, y_offset + y * stride + x);
            let uv = uv_offset + (y / 2) * uv_stride + (x & !1);
            let (u, v) = if frame.format == PixelFormat::NV12 {
                (at(data, uv), at(data, uv + 1))
            } else {
                (at(data, uv + 1), at(data, uv))
            };
            yuv_to_rgb(luma, u, v)
        }
        PixelFormat::I420 => {
            let half = stride / 2;
            let (y_offset, u_offset, u_stride, v_offset, v_stride) = match frame.yuv_planes {
                Some(p) => (
                    p.y_offset,
                    p.uv_offset,
                    p.uv_stride as usize,
                    p.v_offset,
                    p.v_stride as usize,
                ),
                None => {
                    let y_size = stride * frame.height as usize;
                    let c_size = half * frame.height as usize / 2;
                    (0, y_size, half, y_size + c_size, half)
                }
            };
            let luma = at(data, y_offset + y * stride + x);
            let u = at(data, u_offset + (y / 2) * u_stride + x / 2);
            let v = at(data, v_offset + (y / 2) * v_stride + x / 2);
            yuv_to_rgb(luma, u, v)
        }
        PixelFormat::YUYV => {
            let base = y * stride + (x & !1) * 2;
            let luma = if x & 1 == 0 {
                at(data, base)
            } else {
                at(data, base + 2)
            };
            yuv_to_rgb(luma, at(data, base + 1), at(data, base + 3))
        }
    }
}

/// BT.601 full-range YUV to RGB.
fn yuv_to_rgb(y: u8, u: u8, v: u8) -> (u8, u8, u8) {
    let y = y as f32;
    let u = u as f32 - 128.0;
    let v = v as f32 - 128.0;

    let r = y + 1.402 * v;
    let g = y - 0.344136 * u - 0.714136 * v;
    let b = y + 1.772 * u;

    (
        r.clamp(0.0, 255.0) as u8,
        g.clamp(0.0, 255.0) as u8,
        b.clamp(0.0, 255.0) as u8,
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::camera::YuvPlanes;

    fn gray_frame(width: u32, height: u32, luma: u8) -> Frame {
        Frame::new(
            width,
            height,
            Arc::from(vec![luma; (width * height) as usize]),
            PixelFormat::Gray8,
            width,
            None,
        )
    }

    #[test]
    fn neutral_chroma_is_grayscale() {
        for luma in [0u8, 64, 128, 255] {
            assert_eq!(yuv_to_rgb(luma, 128, 128), (luma, luma, luma));
        }
    }

    #[test]
    fn conversion_clamps_to_byte_range() {
        let (r, _, _) = yuv_to_rgb(255, 128, 255);
        assert_eq!(r, 255);
        let (_, _, b) = yuv_to_rgb(0, 0, 128);
        assert_eq!(b, 0);
    }

    #[test]
    fn samples_nv12_chroma_pairs() {
        // 2x2 luma plane followed by one interleaved UV pair.
        let data: Arc<[u8]> = Arc::from(vec![100, 100, 100, 100, 128, 128]);
        let planes = YuvPlanes {
            y_offset: 0,
            uv_offset: 4,
            uv_stride: 2,
            v_offset: 0,
            v_stride: 0,
        };
        let frame = Frame::new(2, 2, data, PixelFormat::NV12, 2, Some(planes));
        assert_eq!(sample_rgb(&frame, 1, 1), (100, 100, 100));
    }

    #[test]
    fn renders_half_blocks_into_buffer() {
        let frame = gray_frame(4, 4, 200);
        let area = Rect::new(0, 0, 4, 2);
        let mut buf = Buffer::empty(area);

        FrameWidget::new(Some(&frame)).render(area, &mut buf);

        let cell = buf.cell((1, 1)).unwrap();
        assert_eq!(cell.symbol(), "\u{2580}");
        assert_eq!(cell.fg, Color::Rgb(200, 200, 200));
        assert_eq!(cell.bg, Color::Rgb(200, 200, 200));
    }

    #[test]
    fn missing_frame_draws_placeholder() {
        let area = Rect::new(0, 0, 30, 3);
        let mut buf = Buffer::empty(area);

        FrameWidget::new(None).render(area, &mut buf);

        let row: String = (0..30)
            .map(|x| buf.cell((x, 1)).unwrap().symbol().to_string())
            .collect();
        assert!(row.contains("Waiting for camera..."));
    }
}
