// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image preprocessing for the face recognition model

use image::{DynamicImage, RgbImage};
use ndarray::Array4;

/// Square input resolution of the recognition network
pub const FACE_INPUT_SIZE: u32 = 112;

/// Per-channel mean applied after scaling to [0, 1]
pub const MEAN: f32 = 0.5;

/// Per-channel std applied after mean subtraction
pub const STD: f32 = 0.5;

/// Preprocess a face image for embedding
///
/// Steps:
/// 1. Resize to FACE_INPUT_SIZE x FACE_INPUT_SIZE with plain bilinear
///    sampling (half-pixel centers, no antialiasing, edge clamped), the
///    same geometry as OpenCV's `INTER_LINEAR`, rounded back to 8 bits
/// 2. Read channels in RGB order (the decoder's native order, which is what
///    the model was trained on)
/// 3. Normalize: (pixel / 255.0 - 0.5) / 0.5, giving values in [-1, 1]
/// 4. Convert to NCHW tensor format [1, 3, H, W]
pub fn preprocess_for_embedding(image: &DynamicImage) -> Array4<f32> {
    let size = FACE_INPUT_SIZE as usize;
    let rgb = image.to_rgb8();
    let cols = sample_axis(rgb.width(), FACE_INPUT_SIZE);
    let rows = sample_axis(rgb.height(), FACE_INPUT_SIZE);

    let mut tensor = Array4::zeros((1, 3, size, size));
    for (y, row) in rows.iter().enumerate() {
        for (x, col) in cols.iter().enumerate() {
            for c in 0..3 {
                let value = bilinear(&rgb, *col, *row, c);
                tensor[[0, c, y, x]] = normalize_channel(value);
            }
        }
    }

    tensor
}

/// Source taps for one destination coordinate along an axis
#[derive(Debug, Clone, Copy, PartialEq)]
struct Tap {
    lo: u32,
    hi: u32,
    /// Weight of `hi`; `lo` gets `1 - frac`
    frac: f32,
}

fn sample_axis(src_len: u32, dst_len: u32) -> Vec<Tap> {
    let scale = src_len as f32 / dst_len as f32;
    let last = src_len.saturating_sub(1);
    (0..dst_len)
        .map(|d| {
            let pos = (d as f32 + 0.5) * scale - 0.5;
            let base = pos.floor();
            let (lo, frac) = if base < 0.0 {
                (0, 0.0)
            } else if base as u32 >= last {
                (last, 0.0)
            } else {
                (base as u32, pos - base)
            };
            Tap {
                lo,
                hi: (lo + 1).min(last),
                frac,
            }
        })
        .collect()
}

fn bilinear(rgb: &RgbImage, col: Tap, row: Tap, channel: usize) -> u8 {
    let px = |x: u32, y: u32| rgb.get_pixel(x, y)[channel] as f32;
    let top = px(col.lo, row.lo) * (1.0 - col.frac) + px(col.hi, row.lo) * col.frac;
    let bottom = px(col.lo, row.hi) * (1.0 - col.frac) + px(col.hi, row.hi) * col.frac;
    let value = top * (1.0 - row.frac) + bottom * row.frac;
    value.round().clamp(0.0, 255.0) as u8
}

#[inline]
fn normalize_channel(value: u8) -> f32 {
    (value as f32 / 255.0 - MEAN) / STD
}
