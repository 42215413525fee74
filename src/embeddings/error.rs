// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use thiserror::Error;

/// Failures of the face embedding pipeline
#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// The model file is missing, unreadable, or not a usable recognition model.
    /// Fatal at startup.
    #[error("Failed to load face model: {0}")]
    ModelLoad(String),

    /// The runtime rejected the forward pass for one image
    #[error("Inference failed: {0}")]
    Inference(String),

    /// The model produced a vector that cannot be normalized (zero or non-finite norm)
    #[error("Invalid embedding: {0}")]
    InvalidEmbedding(String),

    #[error("Unexpected embedding dimension: {actual} (expected {expected})")]
    DimensionMismatch { expected: usize, actual: usize },
}

impl EmbeddingError {
    /// Short machine-readable kind used in API payloads
    pub fn kind(&self) -> &'static str {
        match self {
            EmbeddingError::ModelLoad(_) => "model_load",
            EmbeddingError::Inference(_) => "inference",
            EmbeddingError::InvalidEmbedding(_) => "invalid_embedding",
            EmbeddingError::DimensionMismatch { .. } => "dimension_mismatch",
        }
    }
}
