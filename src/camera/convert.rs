// SPDX-License-Identifier: GPL-3.0-only

//! CPU pixel format repacking
//!
//! Sensors that only speak packed 4:2:2 get repacked to NV12 in the capture
//! thread, so everything downstream sees one planar family.

use super::types::YuvPlanes;

/// Repack packed YUYV 4:2:2 into tightly packed NV12.
///
/// Luma is copied for every pixel; chroma comes from even rows only, which
/// halves it vertically to 4:2:0. Returns the NV12 buffer and its plane
/// layout, or None when the source buffer is too short for the claimed
/// dimensions.
pub fn yuyv_to_nv12(
    src: &[u8],
    width: u32,
    height: u32,
    src_stride: u32,
) -> Option<(Vec<u8>, YuvPlanes)> {
    let w = width as usize;
    let h = height as usize;
    let stride = src_stride as usize;
    if w == 0 || h == 0 || stride < w * 2 || src.len() < stride * h {
        return None;
    }

    let y_size = w * h;
    let uv_size = w * (h / 2);
    let mut out = vec![0u8; y_size + uv_size];

    for row in 0..h {
        let src_row = &src[row * stride..row * stride + w * 2];
        let dst_row = &mut out[row * w..(row + 1) * w];
        for x in 0..w {
            dst_row[x] = src_row[x * 2];
        }
    }

    for pair_row in 0..h / 2 {
        let src_row = &src[pair_row * 2 * stride..pair_row * 2 * stride + w * 2];
        let dst = y_size + pair_row * w;
        let mut x = 0;
        while x + 1 < w {
            // YUYV pixel pair: [Y0, U, Y1, V]
            let base = x * 2;
            out[dst + x] = src_row[base + 1];
            out[dst + x + 1] = src_row[base + 3];
            x += 2;
        }
    }

    let planes = YuvPlanes {
        y_offset: 0,
        uv_offset: y_size,
        uv_stride: width,
        v_offset: 0,
        v_stride: 0,
    };
    Some((out, planes))
}
