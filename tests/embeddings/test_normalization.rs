// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! L2 normalization properties of `Embedding::from_raw`

use face_embedding_service::embeddings::{l2_norm, Embedding, EmbeddingError, FACE_EMBEDDING_DIM};

#[test]
fn test_normalized_vectors_have_unit_norm() {
    let inputs: Vec<Vec<f32>> = vec![
        (0..FACE_EMBEDDING_DIM).map(|i| i as f32).collect(),
        (0..FACE_EMBEDDING_DIM).map(|i| (i as f32 * 0.37).sin() * 1e4).collect(),
        (0..FACE_EMBEDDING_DIM).map(|i| if i == 5 { 1e-20 } else { 0.0 }).collect(),
        vec![-3.0; FACE_EMBEDDING_DIM],
    ];

    for raw in inputs {
        let embedding = Embedding::from_raw(raw).unwrap();
        assert_eq!(embedding.len(), FACE_EMBEDDING_DIM);
        assert!((embedding.norm() - 1.0).abs() < 1e-5, "norm {}", embedding.norm());
    }
}

#[test]
fn test_direction_is_preserved() {
    let raw: Vec<f32> = (1..=FACE_EMBEDDING_DIM).map(|i| i as f32).collect();
    let norm = l2_norm(&raw);
    let embedding = Embedding::from_raw(raw.clone()).unwrap();
    for (out, input) in embedding.as_slice().iter().zip(raw.iter()) {
        assert!((out - input / norm).abs() < 1e-6);
    }
}

#[test]
fn test_zero_vector_is_rejected() {
    for _ in 0..3 {
        let result = Embedding::from_raw(vec![0.0; FACE_EMBEDDING_DIM]);
        assert!(matches!(result, Err(EmbeddingError::InvalidEmbedding(_))));
    }
}

#[test]
fn test_non_finite_values_are_rejected() {
    let mut raw = vec![1.0; FACE_EMBEDDING_DIM];
    raw[3] = f32::NAN;
    assert!(matches!(
        Embedding::from_raw(raw),
        Err(EmbeddingError::InvalidEmbedding(_))
    ));

    let mut raw = vec![1.0; FACE_EMBEDDING_DIM];
    raw[0] = f32::INFINITY;
    assert!(Embedding::from_raw(raw).is_err());
}
