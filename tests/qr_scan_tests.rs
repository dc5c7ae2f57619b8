// SPDX-License-Identifier: MPL-2.0

//! Integration tests for the scan pipeline
//!
//! Renders a known QR symbol into raw camera frames and drives the real
//! decoder through the public API.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use openscan::camera::{Frame, FrameSource, PixelFormat, ScanSession, YuvPlanes};
use openscan::errors::CameraError;
use openscan::scan::{Decoder, LuminanceGrid, QrDecoder, ScanPipeline, ScanState};

/// Version 1 symbol encoding "HELLO", error correction level M.
const QR_HELLO: [&str; 21] = [
    "#######..###..#######",
    "#.....#.#.##..#.....#",
    "#.###.#...#...#.###.#",
    "#.###.#...##..#.###.#",
    "#.###.#.#.#.#.#.###.#",
    "#.....#..##.#.#.....#",
    "#######.#.#.#.#######",
    ".........#.##........",
    "#.#.#.#..#.#....#..#.",
    "#.#.#....##...#....#.",
    ".....##..##.#...#####",
    "#.#.##.#.##...#....#.",
    ".##..###.##.#.#.#.#..",
    "........#.##.#.#..##.",
    "#######....#.###..###",
    "#.....#...####.##....",
    "#.###.#.#.##.###..###",
    "#.###.#..#....##..##.",
    "#.###.#.#.#.#...#.#.#",
    "#.....#..##...#.#..#.",
    "#######.#.#.#.##..###",
];

/// Draw the symbol into an NV12 frame with a quiet zone, chroma neutral.
fn render_qr_nv12(module_px: usize, quiet: usize) -> Frame {
    let modules = QR_HELLO.len();
    let side = (modules + 2 * quiet) * module_px;
    let y_size = side * side;

    let mut data = vec![255u8; y_size];
    for (my, row) in QR_HELLO.iter().enumerate() {
        for (mx, cell) in row.bytes().enumerate() {
            if cell != b'#' {
                continue;
            }
            let px0 = (quiet + mx) * module_px;
            let py0 = (quiet + my) * module_px;
            for y in py0..py0 + module_px {
                let base = y * side;
                for x in px0..px0 + module_px {
                    data[base + x] = 0;
                }
            }
        }
    }
    data.resize(y_size + y_size / 2, 128);

    let planes = YuvPlanes {
        y_offset: 0,
        uv_offset: y_size,
        uv_stride: side as u32,
        v_offset: 0,
        v_stride: 0,
    };
    Frame::new(
        side as u32,
        side as u32,
        Arc::from(data),
        PixelFormat::NV12,
        side as u32,
        Some(planes),
    )
}

fn flat_gray_frame(side: u32) -> Frame {
    Frame::new(
        side,
        side,
        Arc::from(vec![127u8; (side * side) as usize]),
        PixelFormat::Gray8,
        side,
        None,
    )
}

#[test]
fn test_decoder_reads_known_symbol() {
    let frame = render_qr_nv12(8, 4);
    let grid = LuminanceGrid::from_frame(&frame).unwrap();

    let mut decoder = QrDecoder::new();
    assert_eq!(decoder.decode(&grid), Ok("HELLO".to_string()));
}

#[test]
fn test_pipeline_resolves_and_releases_frame() {
    let results: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = results.clone();
    let mut pipeline = ScanPipeline::new(QrDecoder::new(), move |content| {
        sink.lock().unwrap().push(content);
    });

    let released = Arc::new(AtomicUsize::new(0));
    let hook = released.clone();
    let frame = render_qr_nv12(8, 4).on_release(move || {
        hook.fetch_add(1, Ordering::SeqCst);
    });

    pipeline.on_frame(frame);

    assert_eq!(pipeline.state(), ScanState::Resolved);
    assert_eq!(*results.lock().unwrap(), vec!["HELLO".to_string()]);
    assert_eq!(released.load(Ordering::SeqCst), 1);
}

#[test]
fn test_resolved_pipeline_reports_exactly_once() {
    let results: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = results.clone();
    let mut pipeline = ScanPipeline::new(QrDecoder::new(), move |content| {
        sink.lock().unwrap().push(content);
    });

    pipeline.on_frame(render_qr_nv12(8, 4));
    pipeline.on_frame(render_qr_nv12(8, 4));
    pipeline.on_frame(render_qr_nv12(8, 4));

    assert_eq!(results.lock().unwrap().len(), 1);
}

#[test]
fn test_blank_frames_keep_pipeline_idle() {
    let results: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = results.clone();
    let mut pipeline = ScanPipeline::new(QrDecoder::new(), move |content| {
        sink.lock().unwrap().push(content);
    });

    for _ in 0..5 {
        pipeline.on_frame(flat_gray_frame(120));
    }

    assert_eq!(pipeline.state(), ScanState::Idle);
    assert!(results.lock().unwrap().is_empty());
}

/// Source that repeats the rendered symbol at camera pace.
struct RepeatingSource;

impl FrameSource for RepeatingSource {
    fn next_frame(&mut self) -> Result<Frame, CameraError> {
        thread::sleep(Duration::from_millis(10));
        Ok(render_qr_nv12(8, 4))
    }
}

#[test]
fn test_session_delivers_payload_end_to_end() {
    let (session, mut streams) = ScanSession::start(RepeatingSource, QrDecoder::new());

    let deadline = Instant::now() + Duration::from_secs(5);
    let payload = loop {
        match streams.results.try_next() {
            Ok(Some(payload)) => break payload,
            Ok(None) => panic!("result stream closed without a payload"),
            Err(_) => {
                assert!(Instant::now() < deadline, "no payload before deadline");
                thread::sleep(Duration::from_millis(5));
            }
        }
    };

    assert_eq!(payload, "HELLO");
    drop(session);
}
