// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! ONNX Face Recognition Model Wrapper
//!
//! This module provides a wrapper around ONNX Runtime for running a
//! MobileFaceNet-style face recognition network.
//!
//! Features:
//! - ONNX model loading from disk, validated with a check inference
//! - Optional CUDA acceleration (with automatic CPU fallback)
//! - 112x112 RGB preprocessing normalized to [-1, 1]
//! - L2-normalized 128-dimensional output vectors

use anyhow::Context;
use image::DynamicImage;
use ndarray::{Array4, Axis};
use ort::execution_providers::{CPUExecutionProvider, CUDAExecutionProvider};
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::{debug, info, warn};

use super::{Embedding, EmbeddingError, FaceEmbedder, FaceModelInfo, FACE_EMBEDDING_DIM};
use crate::vision::preprocessing::{preprocess_for_embedding, FACE_INPUT_SIZE};

/// ONNX-based face embedding model
///
/// The session is loaded once and shared behind `Arc<Mutex<_>>`; cloning the
/// handle is cheap and every clone runs against the same weights.
///
/// # Model Details
/// - Input: `[1, 3, 112, 112]` f32 tensor, RGB, values in [-1, 1]
/// - Output: 128 f32 values per image (raw, normalized here)
#[derive(Clone)]
pub struct OnnxFaceEmbedder {
    session: Arc<Mutex<Session>>,

    /// Name of the first graph input, discovered at load time
    input_name: String,

    model_path: PathBuf,

    dimension: usize,
}

impl std::fmt::Debug for OnnxFaceEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxFaceEmbedder")
            .field("model_path", &self.model_path)
            .field("input_name", &self.input_name)
            .field("dimension", &self.dimension)
            .finish_non_exhaustive()
    }
}

impl OnnxFaceEmbedder {
    /// Loads the face model from disk
    ///
    /// # Errors
    /// Returns [`EmbeddingError::ModelLoad`] if:
    /// - Model file not found or invalid
    /// - ONNX Runtime initialization fails
    /// - The model does not produce 128 values for a 112x112 input
    ///
    /// # Example
    /// ```ignore
    /// let embedder = OnnxFaceEmbedder::new("models/mobilefacenet.onnx", false)?;
    /// let embedding = embedder.embed(&image)?;
    /// assert_eq!(embedding.len(), 128);
    /// ```
    pub fn new<P: AsRef<Path>>(model_path: P, use_cuda: bool) -> Result<Self, EmbeddingError> {
        let model_path = model_path.as_ref();

        if !model_path.exists() {
            return Err(EmbeddingError::ModelLoad(format!(
                "ONNX model file not found: {}",
                model_path.display()
            )));
        }

        info!("🚀 Loading face model from {}", model_path.display());
        let mut session = build_session(model_path, use_cuda)
            .map_err(|e| EmbeddingError::ModelLoad(format!("{:#}", e)))?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .ok_or_else(|| EmbeddingError::ModelLoad("model declares no inputs".to_string()))?;

        // Run a blank face to confirm the input contract and output width
        let size = FACE_INPUT_SIZE as usize;
        let blank = Array4::<f32>::zeros((1, 3, size, size));
        let raw = run_forward(&mut session, &input_name, blank)
            .map_err(|e| EmbeddingError::ModelLoad(format!("check inference failed: {}", e)))?;
        if raw.len() != FACE_EMBEDDING_DIM {
            return Err(EmbeddingError::ModelLoad(format!(
                "model outputs {} values per image (expected {})",
                raw.len(),
                FACE_EMBEDDING_DIM
            )));
        }

        info!(
            "✅ Face model loaded (input '{}', {} dimensions)",
            input_name, FACE_EMBEDDING_DIM
        );

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            input_name,
            model_path: model_path.to_path_buf(),
            dimension: FACE_EMBEDDING_DIM,
        })
    }

    /// Runs the model on an already preprocessed `[1, 3, 112, 112]` tensor
    /// and returns the raw (unnormalized) output
    pub fn infer_raw(&self, tensor: Array4<f32>) -> Result<Vec<f32>, EmbeddingError> {
        let mut session = self
            .session
            .lock()
            .map_err(|_| EmbeddingError::Inference("model session lock poisoned".to_string()))?;
        run_forward(&mut session, &self.input_name, tensor)
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }
}

impl FaceEmbedder for OnnxFaceEmbedder {
    fn embed(&self, image: &DynamicImage) -> Result<Embedding, EmbeddingError> {
        let start = Instant::now();

        let tensor = preprocess_for_embedding(image);
        let raw = self.infer_raw(tensor)?;
        if raw.len() != self.dimension {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimension,
                actual: raw.len(),
            });
        }
        let embedding = Embedding::from_raw(raw)?;

        debug!(
            "⏱ Embedding for {}x{} image took {:.2}ms",
            image.width(),
            image.height(),
            start.elapsed().as_secs_f64() * 1000.0
        );
        Ok(embedding)
    }

    fn info(&self) -> FaceModelInfo {
        FaceModelInfo {
            path: self.model_path.display().to_string(),
            dimension: self.dimension,
            input_size: FACE_INPUT_SIZE,
        }
    }
}

fn build_session(model_path: &Path, use_cuda: bool) -> anyhow::Result<Session> {
    if use_cuda {
        info!("   Attempting CUDA execution provider...");
        let cuda_result = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CUDAExecutionProvider::default().build()])
            .context("Failed to set CUDA execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("Failed to set optimization level")?
            .commit_from_file(model_path);

        match cuda_result {
            Ok(session) => {
                info!("✅ CUDA execution provider initialized");
                return Ok(session);
            }
            Err(e) => {
                warn!("⚠️  CUDA execution provider failed: {}", e);
                warn!("   Falling back to CPU execution provider");
            }
        }
    }

    Session::builder()
        .context("Failed to create session builder")?
        .with_execution_providers([CPUExecutionProvider::default().build()])
        .context("Failed to set CPU execution provider")?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .context("Failed to set optimization level")?
        .with_intra_threads(4)
        .context("Failed to set intra threads")?
        .commit_from_file(model_path)
        .with_context(|| format!("Failed to load ONNX model from {}", model_path.display()))
}

/// Single forward pass; returns the first output's values for batch item 0
fn run_forward(
    session: &mut Session,
    input_name: &str,
    tensor: Array4<f32>,
) -> Result<Vec<f32>, EmbeddingError> {
    let input = Value::from_array(tensor)
        .map_err(|e| EmbeddingError::Inference(format!("failed to build input tensor: {}", e)))?;

    let outputs = session
        .run(ort::inputs![input_name => input])
        .map_err(|e| EmbeddingError::Inference(e.to_string()))?;

    let output = outputs[0]
        .try_extract_array::<f32>()
        .map_err(|e| EmbeddingError::Inference(format!("failed to extract output: {}", e)))?;

    let values = if output.ndim() >= 2 {
        output.index_axis(Axis(0), 0).iter().copied().collect()
    } else {
        output.iter().copied().collect()
    };
    Ok(values)
}
