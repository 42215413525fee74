// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image decoding and model-input preparation for face images
//!
//! This module provides:
//! - Decoding of stored and uploaded face images
//! - Preprocessing into the recognition model's NCHW input tensor

pub mod image_utils;
pub mod preprocessing;

pub use image_utils::{
    decode_base64_payload, decode_image_bytes, detect_format, read_image_file,
    DecodedImage, ImageError, MAX_IMAGE_SIZE,
};
pub use preprocessing::{preprocess_for_embedding, FACE_INPUT_SIZE};
