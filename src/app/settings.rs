// SPDX-License-Identifier: GPL-3.0-only

//! Settings screen: session-scoped toggles and the source link

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Widget;

use super::theme::Theme;
use crate::constants::{app_info, SOURCE_REPOSITORY};
use crate::settings::Settings;

const ROW_AUTO_OPEN: usize = 0;
const ROW_DARK_MODE: usize = 1;
const ROW_BEEP: usize = 2;
const ROW_SOURCE: usize = 3;
const ROW_COUNT: usize = 4;

pub struct SettingsScreen {
    selected: usize,
}

impl SettingsScreen {
    pub fn new() -> Self {
        Self { selected: 0 }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.checked_sub(1).unwrap_or(ROW_COUNT - 1);
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % ROW_COUNT;
    }

    /// Toggle the selected setting. The source row returns a URL for the
    /// caller to open instead of changing anything.
    pub fn activate(&mut self, settings: &mut Settings) -> Option<&'static str> {
        match self.selected {
            ROW_AUTO_OPEN => settings.auto_open_links = !settings.auto_open_links,
            ROW_DARK_MODE => settings.dark_mode = !settings.dark_mode,
            ROW_BEEP => settings.beep_on_scan = !settings.beep_on_scan,
            ROW_SOURCE => return Some(SOURCE_REPOSITORY),
            _ => {}
        }
        None
    }
}

pub struct SettingsView<'a> {
    pub screen: &'a SettingsScreen,
    pub settings: &'a Settings,
    pub theme: &'a Theme,
}

impl SettingsView<'_> {
    fn row_label(&self, row: usize) -> String {
        let toggle = |on: bool, label: &str| {
            if on {
                format!("[x] {label}")
            } else {
                format!("[ ] {label}")
            }
        };
        match row {
            ROW_AUTO_OPEN => toggle(self.settings.auto_open_links, "Automatically open links"),
            ROW_DARK_MODE => toggle(self.settings.dark_mode, "Dark mode"),
            ROW_BEEP => toggle(self.settings.beep_on_scan, "Beep on scan"),
            ROW_SOURCE => format!("Source code  {SOURCE_REPOSITORY}"),
            _ => String::new(),
        }
    }
}

impl Widget for SettingsView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < (ROW_COUNT as u16 + 4) || area.width < 20 {
            return;
        }

        let accent = Style::default().fg(self.theme.accent);
        let text = Style::default().fg(self.theme.text);
        let dim = Style::default().fg(self.theme.dim_text);

        buf.set_string(area.x + 2, area.y + 1, "Settings", accent);

        for row in 0..ROW_COUNT {
            let y = area.y + 3 + row as u16;
            let selected = row == self.screen.selected;
            let marker = if selected { "> " } else { "  " };
            let style = if selected { accent } else { text };
            let line = format!("{marker}{}", self.row_label(row));
            let line: String = line.chars().take(area.width as usize - 2).collect();
            buf.set_string(area.x + 2, y, line, style);
        }

        let version = format!("Ver: v{}", app_info::version());
        let x = area.x + area.width.saturating_sub(version.len() as u16) / 2;
        buf.set_string(x, area.y + area.height - 1, version, dim);
    }
}
