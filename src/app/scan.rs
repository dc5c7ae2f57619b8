// SPDX-License-Identifier: GPL-3.0-only

//! Live scanning screen
//!
//! Owns the capture session for as long as the screen is open. Preview
//! frames are drained keep-newest on every tick; the first decoded
//! payload is handed back to the application and closes the screen.

use std::time::Instant;

use futures::channel::mpsc;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::Widget;
use tracing::{error, info};

use super::frame_widget::FrameWidget;
use super::theme::Theme;
use crate::camera::{enumerate_devices, Frame, ScanSession, V4l2Camera};
use crate::constants::overlay;
use crate::errors::CameraError;
use crate::scan::QrDecoder;

pub struct ScanScreen {
    state: ScreenState,
}

enum ScreenState {
    Active {
        // Dropping the session stops capture and analysis.
        _session: ScanSession,
        preview: mpsc::Receiver<Frame>,
        results: mpsc::Receiver<String>,
        device_name: String,
        started: Instant,
        latest: Option<Frame>,
    },
    Unavailable {
        message: String,
    },
}

impl ScanScreen {
    /// Open the first available camera and start scanning.
    pub fn open() -> Self {
        let devices = enumerate_devices();
        let Some(device) = devices.first() else {
            return Self::unavailable(CameraError::NoCameraFound.to_string());
        };

        match V4l2Camera::open(&device.path) {
            Ok(camera) => {
                let device_name = camera.name().to_string();
                info!(device = %device_name, path = %device.path, "scan session starting");
                let (session, streams) = ScanSession::start(camera, QrDecoder::new());
                Self {
                    state: ScreenState::Active {
                        _session: session,
                        preview: streams.preview,
                        results: streams.results,
                        device_name,
                        started: Instant::now(),
                        latest: None,
                    },
                }
            }
            Err(e) => {
                error!(path = %device.path, error = %e, "failed to open camera");
                Self::unavailable(e.to_string())
            }
        }
    }

    fn unavailable(message: String) -> Self {
        Self {
            state: ScreenState::Unavailable { message },
        }
    }

    /// Drain both streams. Returns a decoded payload when one arrived.
    pub fn poll(&mut self) -> Option<String> {
        let mut stream_ended = false;
        let mut payload = None;

        if let ScreenState::Active {
            preview,
            results,
            latest,
            ..
        } = &mut self.state
        {
            loop {
                match preview.try_next() {
                    Ok(Some(frame)) => *latest = Some(frame),
                    Ok(None) => {
                        stream_ended = true;
                        break;
                    }
                    Err(_) => break,
                }
            }
            if !stream_ended {
                match results.try_next() {
                    Ok(Some(content)) => payload = Some(content),
                    Ok(None) => stream_ended = true,
                    Err(_) => {}
                }
            }
        }

        if stream_ended {
            error!("capture stream ended unexpectedly");
            self.state = ScreenState::Unavailable {
                message: "Camera stream ended".to_string(),
            };
        }
        payload
    }
}

pub struct ScanView<'a> {
    pub screen: &'a ScanScreen,
    pub theme: &'a Theme,
}

impl Widget for ScanView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        match &self.screen.state {
            ScreenState::Active {
                latest,
                device_name,
                started,
                ..
            } => {
                let info = format!("{}  {}s", device_name, started.elapsed().as_secs());
                let max = area.width as usize;
                let info: String = info.chars().take(max).collect();
                buf.set_string(
                    area.x,
                    area.y,
                    info,
                    Style::default().fg(self.theme.dim_text),
                );

                let preview_area = Rect {
                    x: area.x,
                    y: area.y + 1,
                    width: area.width,
                    height: area.height.saturating_sub(1),
                };
                FrameWidget::new(latest.as_ref()).render(preview_area, buf);
                if latest.is_some() {
                    draw_framing_overlay(preview_area, buf);
                }
            }
            ScreenState::Unavailable { message } => {
                let style = Style::default().fg(self.theme.text);
                let x = area.x + area.width.saturating_sub(message.len() as u16) / 2;
                let y = area.y + area.height / 2;
                buf.set_string(x, y, message, style);

                let hint = "Press Esc to go back";
                let x = area.x + area.width.saturating_sub(hint.len() as u16) / 2;
                buf.set_string(
                    x,
                    y.saturating_add(1),
                    hint,
                    Style::default().fg(self.theme.dim_text),
                );
            }
        }
    }
}

/// Draw the centered aiming square: a light border, everything outside
/// dimmed to half intensity. Guidance only, scanning uses full frames.
fn draw_framing_overlay(area: Rect, buf: &mut Buffer) {
    if area.width < 4 || area.height < 4 {
        return;
    }

    // Square side in pixels; one cell row is two pixels tall.
    let side_px = (area.width.min(area.height * 2) as f32 * overlay::FRAME_FRACTION) as u16;
    let w_cells = side_px.clamp(2, area.width);
    let h_cells = (side_px / 2).clamp(2, area.height);
    let left = area.x + (area.width - w_cells) / 2;
    let top = area.y + (area.height - h_cells) / 2;
    let right = left + w_cells - 1;
    let bottom = top + h_cells - 1;

    for y in area.y..area.y + area.height {
        for x in area.x..area.x + area.width {
            let inside = x >= left && x <= right && y >= top && y <= bottom;
            let Some(cell) = buf.cell_mut((x, y)) else {
                continue;
            };
            if inside {
                if x == left || x == right || y == top || y == bottom {
                    cell.set_char(' ');
                    cell.set_bg(Color::White);
                }
            } else {
                if let Color::Rgb(r, g, b) = cell.fg {
                    cell.set_fg(Color::Rgb(r / 2, g / 2, b / 2));
                }
                if let Color::Rgb(r, g, b) = cell.bg {
                    cell.set_bg(Color::Rgb(r / 2, g / 2, b / 2));
                }
            }
        }
    }
}
