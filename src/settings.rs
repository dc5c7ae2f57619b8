// SPDX-License-Identifier: GPL-3.0-only

//! Session settings
//!
//! Settings live for the lifetime of the process. Nothing is written to
//! disk; every launch starts from the defaults below.

/// User-togglable switches for the running session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// Open scanned http/https payloads in the default browser right away
    pub auto_open_links: bool,
    /// Render the interface with the dark palette
    pub dark_mode: bool,
    /// Ring the terminal bell when a code resolves
    pub beep_on_scan: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_open_links: false,
            dark_mode: true,
            beep_on_scan: true,
        }
    }
}
