// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Face embedding computation
//!
//! The [`FaceEmbedder`] trait is the seam between request handling and the
//! inference runtime. Production code uses [`OnnxFaceEmbedder`]; tests can
//! plug in any deterministic implementation.

pub mod embedding;
pub mod error;
pub mod onnx_model;

use image::DynamicImage;
use serde::Serialize;

pub use embedding::{l2_norm, Embedding, FACE_EMBEDDING_DIM};
pub use error::EmbeddingError;
pub use onnx_model::OnnxFaceEmbedder;

/// Static description of the loaded face model
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceModelInfo {
    pub path: String,
    pub dimension: usize,
    pub input_size: u32,
}

/// Maps one face image to a unit-length embedding
///
/// Implementations are shared across requests, so they must be safe to call
/// from several blocking worker threads.
#[cfg_attr(test, mockall::automock)]
pub trait FaceEmbedder: Send + Sync {
    fn embed(&self, image: &DynamicImage) -> Result<Embedding, EmbeddingError>;

    fn info(&self) -> FaceModelInfo;
}
