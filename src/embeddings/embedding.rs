// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Unit-length embedding vectors

use serde::Serialize;

use super::EmbeddingError;

/// Output dimension of the face recognition model
pub const FACE_EMBEDDING_DIM: usize = 128;

/// A unit-normalized face embedding
///
/// Only constructed through [`Embedding::from_raw`], so every instance has a
/// Euclidean norm of 1 within floating-point tolerance.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Embedding(Vec<f32>);

impl Embedding {
    /// L2-normalize a raw model output
    ///
    /// A zero or non-finite norm is rejected with
    /// [`EmbeddingError::InvalidEmbedding`] instead of producing NaN values.
    pub fn from_raw(raw: Vec<f32>) -> Result<Self, EmbeddingError> {
        if raw.is_empty() {
            return Err(EmbeddingError::InvalidEmbedding(
                "model returned an empty vector".to_string(),
            ));
        }

        let norm = l2_norm(&raw);
        if !norm.is_finite() {
            return Err(EmbeddingError::InvalidEmbedding(format!(
                "model output has non-finite norm ({})",
                norm
            )));
        }
        if norm == 0.0 {
            return Err(EmbeddingError::InvalidEmbedding(
                "model output has zero norm".to_string(),
            ));
        }

        Ok(Self(raw.into_iter().map(|v| v / norm).collect()))
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn norm(&self) -> f32 {
        l2_norm(&self.0)
    }
}

/// Euclidean norm, accumulated in f64 to keep long vectors stable
pub fn l2_norm(values: &[f32]) -> f32 {
    values
        .iter()
        .map(|v| (*v as f64) * (*v as f64))
        .sum::<f64>()
        .sqrt() as f32
}
