// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for headless scanning
//!
//! This module provides command-line functionality for:
//! - Listing available cameras
//! - Scanning a single code and printing it to stdout

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use openscan::camera::{enumerate_devices, ScanSession, V4l2Camera};
use openscan::constants::timing;
use openscan::errors::{AppError, AppResult, CameraError};
use openscan::scan::{PayloadAction, QrDecoder};
use serde::Serialize;
use tracing::info;

/// Machine-readable scan output for `--json`
#[derive(Debug, Serialize)]
struct ScanReport<'a> {
    content: &'a str,
    kind: &'a str,
}

/// List all available cameras
pub fn list_cameras() -> AppResult<()> {
    let cameras = enumerate_devices();

    if cameras.is_empty() {
        println!("No cameras found.");
        return Ok(());
    }

    println!("Available cameras:");
    println!();
    for (index, camera) in cameras.iter().enumerate() {
        println!("  [{}] {} ({})", index, camera.name, camera.path);
    }

    Ok(())
}

/// Scan until one code is decoded, the timeout passes or Ctrl+C arrives
pub fn scan(device: Option<String>, timeout_secs: u64, json: bool) -> AppResult<()> {
    let path = match device {
        Some(path) => path,
        None => {
            let mut devices = enumerate_devices();
            if devices.is_empty() {
                return Err(CameraError::NoCameraFound.into());
            }
            devices.remove(0).path
        }
    };

    let camera = V4l2Camera::open(&path)?;
    info!(device = %camera.name(), path = %path, timeout_secs, "headless scan starting");
    if !json {
        println!("Scanning with {} (press Ctrl+C to cancel)...", camera.name());
    }

    let (_session, mut streams) = ScanSession::start(camera, QrDecoder::new());

    let interrupted = Arc::new(AtomicBool::new(false));
    let handler_flag = interrupted.clone();
    ctrlc::set_handler(move || {
        handler_flag.store(true, Ordering::SeqCst);
    })
    .map_err(|e| AppError::Terminal(e.to_string()))?;

    // A timeout of zero waits forever.
    let deadline = (timeout_secs > 0).then(|| Instant::now() + Duration::from_secs(timeout_secs));

    loop {
        if interrupted.load(Ordering::SeqCst) {
            return Err(AppError::Interrupted);
        }
        if let Some(deadline) = deadline
            && Instant::now() >= deadline
        {
            return Err(AppError::Timeout(timeout_secs));
        }

        match streams.results.try_next() {
            Ok(Some(content)) => {
                info!(len = content.len(), "payload decoded");
                return report(&content, json);
            }
            Ok(None) => {
                return Err(CameraError::StreamFailed(
                    "capture ended before a code was found".to_string(),
                )
                .into());
            }
            Err(_) => thread::sleep(timing::INPUT_POLL_INTERVAL),
        }
    }
}

fn report(content: &str, json: bool) -> AppResult<()> {
    if json {
        let action = PayloadAction::parse(content);
        let line = serde_json::to_string(&ScanReport {
            content,
            kind: action.kind(),
        })?;
        println!("{line}");
    } else {
        println!("{content}");
    }
    Ok(())
}
