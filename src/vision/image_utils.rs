// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Face image decoding helpers shared by the store loader and the upload path

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageFormat, ImageReader};
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;

/// Maximum encoded face image size (10MB)
pub const MAX_IMAGE_SIZE: usize = 10 * 1024 * 1024;

/// Errors raised while turning bytes into a raster image
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Image data is too large: {0} bytes (max: {1} bytes)")]
    TooLarge(usize, usize),

    #[error("Invalid base64 encoding: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("Unsupported image format")]
    UnsupportedFormat,

    #[error("Failed to decode image: {0}")]
    DecodeFailed(String),

    #[error("Image data is empty")]
    EmptyData,

    #[error("Failed to read image file: {0}")]
    Io(#[from] std::io::Error),
}

/// A decoded image together with the container format it came from
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub image: DynamicImage,
    pub format: ImageFormat,
    pub size_bytes: usize,
}

impl DecodedImage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Decode raw image bytes, detecting the format from magic bytes
///
/// An EXIF orientation tag, when present, is applied to the pixels.
pub fn decode_image_bytes(bytes: &[u8]) -> Result<DecodedImage, ImageError> {
    if bytes.is_empty() {
        return Err(ImageError::EmptyData);
    }
    if bytes.len() > MAX_IMAGE_SIZE {
        return Err(ImageError::TooLarge(bytes.len(), MAX_IMAGE_SIZE));
    }

    let format = detect_format(bytes)?;
    let mut decoder = ImageReader::with_format(Cursor::new(bytes), format)
        .into_decoder()
        .map_err(|e| ImageError::DecodeFailed(e.to_string()))?;
    // Camera images carry their rotation in EXIF; faces must reach the model upright
    let orientation = decoder.orientation().unwrap_or(Orientation::NoTransforms);
    let mut image = DynamicImage::from_decoder(decoder)
        .map_err(|e| ImageError::DecodeFailed(e.to_string()))?;
    image.apply_orientation(orientation);

    Ok(DecodedImage {
        image,
        format,
        size_bytes: bytes.len(),
    })
}

/// Read and decode an image file from disk
///
/// The size limit is checked against file metadata before the file is read.
pub fn read_image_file(path: &Path) -> Result<DecodedImage, ImageError> {
    let len = std::fs::metadata(path)?.len() as usize;
    if len > MAX_IMAGE_SIZE {
        return Err(ImageError::TooLarge(len, MAX_IMAGE_SIZE));
    }
    let bytes = std::fs::read(path)?;
    decode_image_bytes(&bytes)
}

/// Decode a base64 payload, accepting an optional `data:image/...;base64,` prefix
///
/// Only the transport encoding is removed; the returned bytes are exactly what
/// the client encoded so they can be persisted unchanged.
pub fn decode_base64_payload(payload: &str) -> Result<Vec<u8>, ImageError> {
    let payload = strip_data_url_prefix(payload.trim());
    if payload.is_empty() {
        return Err(ImageError::EmptyData);
    }

    let bytes = STANDARD.decode(payload)?;
    if bytes.len() > MAX_IMAGE_SIZE {
        return Err(ImageError::TooLarge(bytes.len(), MAX_IMAGE_SIZE));
    }
    Ok(bytes)
}

fn strip_data_url_prefix(payload: &str) -> &str {
    match payload.strip_prefix("data:") {
        Some(rest) => rest
            .split_once(";base64,")
            .map(|(_, data)| data)
            .unwrap_or(payload),
        None => payload,
    }
}

/// Detect image format from magic bytes
pub fn detect_format(bytes: &[u8]) -> Result<ImageFormat, ImageError> {
    if bytes.len() < 4 {
        return Err(ImageError::UnsupportedFormat);
    }

    match bytes {
        [0x89, 0x50, 0x4E, 0x47, ..] => Ok(ImageFormat::Png),
        [0xFF, 0xD8, 0xFF, ..] => Ok(ImageFormat::Jpeg),
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => Ok(ImageFormat::WebP),
        [0x47, 0x49, 0x46, 0x38, x, ..] if *x == 0x37 || *x == 0x39 => Ok(ImageFormat::Gif),
        [0x42, 0x4D, ..] => Ok(ImageFormat::Bmp),
        [0x49, 0x49, 0x2A, 0x00, ..] | [0x4D, 0x4D, 0x00, 0x2A, ..] => Ok(ImageFormat::Tiff),
        _ => Err(ImageError::UnsupportedFormat),
    }
}
