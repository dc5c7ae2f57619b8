// SPDX-License-Identifier: MPL-2.0

//! Interactive terminal application
//!
//! Three screens: home, live scan and settings. The run loop redraws at
//! the input poll cadence; the scan screen is polled before every draw
//! so a decoded payload lands on the home screen within one frame.

pub mod frame_widget;
pub mod home;
pub mod scan;
pub mod settings;
pub mod theme;

use std::io::{self, Write};

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::Widget;
use ratatui::Terminal;
use tracing::{error, info};

use self::home::HomeView;
use self::scan::{ScanScreen, ScanView};
use self::settings::{SettingsScreen, SettingsView};
use self::theme::Theme;
use crate::constants::timing;
use crate::errors::{AppError, AppResult};
use crate::scan::PayloadAction;
use crate::settings::Settings;

/// Run the terminal UI until the user quits.
pub fn run() -> AppResult<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>) -> AppResult<()>
where
    AppError: From<B::Error>,
{
    let mut app = App::new();
    info!("terminal UI started");

    loop {
        app.tick();
        terminal.draw(|f| app.render(f))?;

        if event::poll(timing::INPUT_POLL_INTERVAL)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                info!("interrupted");
                return Ok(());
            }
            if app.handle_key(key.code) {
                return Ok(());
            }
        }
    }
}

/// A decoded payload together with its classified action.
pub(crate) struct ScanOutcome {
    pub content: String,
    pub action: PayloadAction,
}

enum Screen {
    Home,
    Scan(ScanScreen),
    Settings(SettingsScreen),
}

struct App {
    settings: Settings,
    screen: Screen,
    last_result: Option<ScanOutcome>,
}

impl App {
    fn new() -> Self {
        Self {
            settings: Settings::default(),
            screen: Screen::Home,
            last_result: None,
        }
    }

    /// Advance the active screen between draws.
    fn tick(&mut self) {
        if let Screen::Scan(scan) = &mut self.screen
            && let Some(content) = scan.poll()
        {
            self.complete_scan(content);
        }
    }

    fn complete_scan(&mut self, content: String) {
        let action = PayloadAction::parse(&content);
        info!(kind = action.kind(), len = content.len(), "scan complete");

        if self.settings.beep_on_scan {
            beep();
        }
        if self.settings.auto_open_links
            && let PayloadAction::Url(url) = &action
        {
            open_target(url);
        }

        self.last_result = Some(ScanOutcome { content, action });
        self.screen = Screen::Home;
    }

    /// Returns true when the application should exit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match &mut self.screen {
            Screen::Home => match code {
                KeyCode::Char('s') => self.screen = Screen::Scan(ScanScreen::open()),
                KeyCode::Char('t') => self.screen = Screen::Settings(SettingsScreen::new()),
                KeyCode::Char('o') => {
                    if let Some(outcome) = &self.last_result
                        && let Some(uri) = outcome.action.open_uri()
                    {
                        open_target(&uri);
                    }
                }
                KeyCode::Char('q') => return true,
                _ => {}
            },
            Screen::Scan(_) => {
                if matches!(code, KeyCode::Esc | KeyCode::Char('q')) {
                    info!("scan cancelled");
                    self.screen = Screen::Home;
                }
            }
            Screen::Settings(screen) => match code {
                KeyCode::Up => screen.select_prev(),
                KeyCode::Down => screen.select_next(),
                KeyCode::Char(' ') | KeyCode::Enter => {
                    if let Some(uri) = screen.activate(&mut self.settings) {
                        open_target(uri);
                    }
                }
                KeyCode::Esc | KeyCode::Char('q') => self.screen = Screen::Home,
                _ => {}
            },
        }
        false
    }

    fn render(&self, f: &mut ratatui::Frame) {
        let area = f.area();
        if area.width == 0 || area.height == 0 {
            return;
        }
        let theme = Theme::for_settings(&self.settings);

        let body = Rect {
            height: area.height.saturating_sub(1),
            ..area
        };
        match &self.screen {
            Screen::Home => f.render_widget(
                HomeView {
                    theme: &theme,
                    last_result: self.last_result.as_ref(),
                },
                body,
            ),
            Screen::Scan(screen) => f.render_widget(
                ScanView {
                    screen,
                    theme: &theme,
                },
                body,
            ),
            Screen::Settings(screen) => f.render_widget(
                SettingsView {
                    screen,
                    settings: &self.settings,
                    theme: &theme,
                },
                body,
            ),
        }

        let status = Rect {
            x: area.x,
            y: area.y + body.height,
            width: area.width,
            height: 1,
        };
        f.render_widget(
            StatusBar {
                message: self.status_hint(),
                bg: theme.status_bg,
                fg: theme.status_fg,
            },
            status,
        );
    }

    fn status_hint(&self) -> &'static str {
        match &self.screen {
            Screen::Home => "s scan | t settings | o open last | q quit",
            Screen::Scan(_) => "Point the camera at a QR code | Esc cancel",
            Screen::Settings(_) => "Up/Down select | Enter toggle | Esc back",
        }
    }
}

/// One-line hint bar pinned to the bottom row.
struct StatusBar<'a> {
    message: &'a str,
    bg: Color,
    fg: Color,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let style = Style::default().bg(self.bg).fg(self.fg);
        for x in area.x..area.x + area.width {
            if let Some(cell) = buf.cell_mut((x, area.y)) {
                cell.set_char(' ');
                cell.set_style(style);
            }
        }
        let message: String = self.message.chars().take(area.width as usize).collect();
        buf.set_string(area.x, area.y, message, style);
    }
}

pub(crate) fn open_target(uri: &str) {
    match open::that_detached(uri) {
        Ok(()) => info!(target = %uri, "opened with system handler"),
        Err(e) => error!(target = %uri, error = %e, "failed to open target"),
    }
}

/// ASCII BEL; the terminal decides whether it is audible.
fn beep() {
    let mut out = io::stdout();
    let _ = out.write_all(b"\x07");
    let _ = out.flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_completion_returns_home_and_keeps_result() {
        let mut app = App::new();

        app.complete_scan("tel:+15551234567".to_string());

        assert!(matches!(app.screen, Screen::Home));
        let outcome = app.last_result.as_ref().unwrap();
        assert_eq!(outcome.content, "tel:+15551234567");
        assert_eq!(
            outcome.action,
            PayloadAction::Phone("+15551234567".to_string())
        );
    }

    #[test]
    fn quit_key_only_acts_on_home() {
        let mut app = App::new();
        assert!(app.handle_key(KeyCode::Char('q')));

        app.screen = Screen::Settings(SettingsScreen::new());
        assert!(!app.handle_key(KeyCode::Char('q')));
        assert!(matches!(app.screen, Screen::Home));
    }

    #[test]
    fn settings_keys_route_to_screen() {
        let mut app = App::new();
        app.screen = Screen::Settings(SettingsScreen::new());

        assert!(!app.settings.auto_open_links);
        app.handle_key(KeyCode::Enter);
        assert!(app.settings.auto_open_links);
    }

    #[test]
    fn status_hint_follows_screen() {
        let mut app = App::new();
        assert!(app.status_hint().contains("s scan"));
        app.screen = Screen::Settings(SettingsScreen::new());
        assert!(app.status_hint().contains("Esc back"));
    }

    #[test]
    fn status_bar_fills_and_truncates() {
        let area = Rect::new(0, 0, 10, 1);
        let mut buf = Buffer::empty(area);
        StatusBar {
            message: "a longer message than fits",
            bg: Color::DarkGray,
            fg: Color::White,
        }
        .render(area, &mut buf);

        let row: String = (0..10)
            .map(|x| buf.cell((x, 0)).unwrap().symbol().to_string())
            .collect();
        assert_eq!(row, "a longer m");
        assert_eq!(buf.cell((9, 0)).unwrap().bg, Color::DarkGray);
    }
}
