// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use std::time::Duration;

/// Application display name
pub const APP_NAME: &str = "OpenScan";

/// Source repository shown on the settings screen
pub const SOURCE_REPOSITORY: &str = "https://github.com/openscan-utils/openscan";

/// Capture constants
pub mod capture {
    /// Memory-mapped buffers requested from the driver
    pub const BUFFER_COUNT: u32 = 4;

    /// Resolution requested during format negotiation. Analysis does not need
    /// more; the driver may still adjust it.
    pub const REQUESTED_WIDTH: u32 = 640;
    pub const REQUESTED_HEIGHT: u32 = 480;

    /// Frame rate requested from the driver
    pub const REQUESTED_FPS: u32 = 30;

    /// Preview frames buffered between the capture thread and the UI
    pub const PREVIEW_CHANNEL_CAPACITY: usize = 10;
}

/// Scan overlay geometry
pub mod overlay {
    /// Framing square side as a fraction of the smaller preview dimension
    pub const FRAME_FRACTION: f32 = 0.6;
}

/// Timing constants
pub mod timing {
    use super::Duration;

    /// Terminal input poll interval (~60 fps)
    pub const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(16);

    /// Analyzer sleep while the frame slot is empty
    pub const ANALYZER_IDLE_POLL: Duration = Duration::from_millis(4);

    /// Frame counter modulo for periodic capture logging
    pub const FRAME_LOG_INTERVAL: u64 = 30;

    /// Default deadline for the `scan` subcommand
    pub const DEFAULT_SCAN_TIMEOUT_SECS: u64 = 30;
}

/// Application information utilities
pub mod app_info {
    /// Get the application version from build-time environment
    pub fn version() -> &'static str {
        env!("GIT_VERSION")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_fraction_in_range() {
        assert!(overlay::FRAME_FRACTION > 0.0 && overlay::FRAME_FRACTION < 1.0);
    }

    #[test]
    fn test_version_not_empty() {
        assert!(!app_info::version().is_empty());
    }
}
