// SPDX-License-Identifier: GPL-3.0-only

//! Landing screen with the scan entry point and the last result

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Widget;

use super::theme::Theme;
use super::ScanOutcome;
use crate::constants::APP_NAME;

pub struct HomeView<'a> {
    pub theme: &'a Theme,
    pub last_result: Option<&'a ScanOutcome>,
}

impl HomeView<'_> {
    fn set_centered(&self, buf: &mut Buffer, area: Rect, y: u16, text: &str, style: Style) {
        let text = truncated(text, area.width as usize);
        let x = area.x + area.width.saturating_sub(text.len() as u16) / 2;
        buf.set_string(x, y, text, style);
    }
}

impl Widget for HomeView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 4 || area.width < 10 {
            return;
        }

        let accent = Style::default().fg(self.theme.accent);
        let text = Style::default().fg(self.theme.text);
        let dim = Style::default().fg(self.theme.dim_text);

        let mut y = area.y + area.height / 4;
        self.set_centered(buf, area, y, APP_NAME, accent);
        y += 2;
        self.set_centered(buf, area, y, "Press 's' to start scanning a QR code.", text);

        if let Some(outcome) = self.last_result {
            y += 3;
            if y + 2 >= area.y + area.height {
                return;
            }
            self.set_centered(buf, area, y, "Last scan", dim);
            y += 1;
            self.set_centered(buf, area, y, &outcome.content, text);
            y += 1;
            let hint = if outcome.action.open_uri().is_some() {
                format!("'o' to {}", outcome.action.action_label().to_lowercase())
            } else {
                outcome.action.action_label().to_string()
            };
            self.set_centered(buf, area, y, &hint, dim);
        }
    }
}

fn truncated(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::PayloadAction;

    fn render_to_text(view: HomeView) -> String {
        let area = Rect::new(0, 0, 60, 12);
        let mut buf = Buffer::empty(area);
        view.render(area, &mut buf);
        (0..12)
            .map(|y| {
                (0..60)
                    .map(|x| buf.cell((x, y)).unwrap().symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn shows_scan_hint() {
        let theme = Theme::dark();
        let text = render_to_text(HomeView {
            theme: &theme,
            last_result: None,
        });
        assert!(text.contains("Press 's' to start scanning"));
        assert!(!text.contains("Last scan"));
    }

    #[test]
    fn shows_last_result_with_action() {
        let theme = Theme::dark();
        let outcome = ScanOutcome {
            content: "https://example.com".to_string(),
            action: PayloadAction::parse("https://example.com"),
        };
        let text = render_to_text(HomeView {
            theme: &theme,
            last_result: Some(&outcome),
        });
        assert!(text.contains("Last scan"));
        assert!(text.contains("https://example.com"));
        assert!(text.contains("'o' to open link"));
    }

    #[test]
    fn truncates_long_content() {
        assert_eq!(truncated("short", 20), "short");
        let long = "a".repeat(50);
        let cut = truncated(&long, 10);
        assert_eq!(cut.chars().count(), 10);
        assert!(cut.ends_with("..."));
    }
}
