// SPDX-License-Identifier: GPL-3.0-only

//! Terminal color palettes

use ratatui::style::Color;

use crate::settings::Settings;

/// Colors used by all screens
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub text: Color,
    pub dim_text: Color,
    pub accent: Color,
    pub status_bg: Color,
    pub status_fg: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            text: Color::White,
            dim_text: Color::Gray,
            accent: Color::Cyan,
            status_bg: Color::DarkGray,
            status_fg: Color::White,
        }
    }

    pub fn light() -> Self {
        Self {
            text: Color::Black,
            dim_text: Color::DarkGray,
            accent: Color::Blue,
            status_bg: Color::Gray,
            status_fg: Color::Black,
        }
    }

    pub fn for_settings(settings: &Settings) -> Self {
        if settings.dark_mode {
            Self::dark()
        } else {
            Self::light()
        }
    }
}
