// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Shared fixtures: image files on disk and model-free embedders
#![allow(dead_code)]

use face_embedding_service::{
    api::{create_app, AppState},
    embeddings::{
        Embedding, EmbeddingError, FaceEmbedder, FaceModelInfo, FACE_EMBEDDING_DIM,
    },
    faces::{FaceEmbeddingService, FaceStore},
    vision::{preprocess_for_embedding, FACE_INPUT_SIZE},
};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Deterministic embedder derived from the preprocessed tensor
///
/// Each output value is the sum of one contiguous chunk of the NCHW tensor,
/// so different images give different vectors without a model file.
pub struct StubEmbedder;

impl FaceEmbedder for StubEmbedder {
    fn embed(&self, image: &DynamicImage) -> Result<Embedding, EmbeddingError> {
        let tensor = preprocess_for_embedding(image);
        let values: Vec<f32> = tensor.iter().copied().collect();
        let chunk = values.len() / FACE_EMBEDDING_DIM;
        let raw = values
            .chunks(chunk)
            .take(FACE_EMBEDDING_DIM)
            .enumerate()
            .map(|(i, c)| c.iter().sum::<f32>() + (i as f32 + 1.0) * 1e-3)
            .collect();
        Embedding::from_raw(raw)
    }

    fn info(&self) -> FaceModelInfo {
        FaceModelInfo {
            path: "stub".to_string(),
            dimension: FACE_EMBEDDING_DIM,
            input_size: FACE_INPUT_SIZE,
        }
    }
}

/// Embedder whose model output is always the zero vector
pub struct ZeroEmbedder;

impl FaceEmbedder for ZeroEmbedder {
    fn embed(&self, _image: &DynamicImage) -> Result<Embedding, EmbeddingError> {
        Embedding::from_raw(vec![0.0; FACE_EMBEDDING_DIM])
    }

    fn info(&self) -> FaceModelInfo {
        FaceModelInfo {
            path: "zero".to_string(),
            dimension: FACE_EMBEDDING_DIM,
            input_size: FACE_INPUT_SIZE,
        }
    }
}

pub fn jpeg_bytes(width: u32, height: u32, seed: u8) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            (x as u8).wrapping_add(seed),
            (y as u8).wrapping_mul(3),
            seed.wrapping_mul(7),
        ])
    });
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut out, ImageFormat::Jpeg)
        .expect("encode jpeg");
    out.into_inner()
}

/// JPEG of at least `min_len` bytes, padded with comment segments after SOI
pub fn padded_jpeg_bytes(width: u32, height: u32, min_len: usize) -> Vec<u8> {
    let jpeg = jpeg_bytes(width, height, 9);
    let mut out = jpeg[..2].to_vec();
    let chunk = vec![b' '; 65533];
    while out.len() + jpeg.len() < min_len {
        out.extend_from_slice(&[0xFF, 0xFE, 0xFF, 0xFF]);
        out.extend_from_slice(&chunk);
    }
    out.extend_from_slice(&jpeg[2..]);
    out
}

pub fn write_jpeg(dir: &Path, name: &str, width: u32, height: u32, seed: u8) {
    std::fs::create_dir_all(dir).expect("create company dir");
    std::fs::write(dir.join(name), jpeg_bytes(width, height, seed)).expect("write jpeg");
}

pub fn service(root: &Path, embedder: impl FaceEmbedder + 'static) -> FaceEmbeddingService {
    FaceEmbeddingService::new(FaceStore::new(root, ["jpg"]), Arc::new(embedder))
}

pub fn app(root: &Path, embedder: impl FaceEmbedder + 'static) -> axum::Router {
    let state = AppState::new(
        Arc::new(service(root, embedder)),
        Duration::from_secs(30),
    );
    create_app(state)
}
