// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Face endpoint response types

use serde::Serialize;

use crate::embeddings::{Embedding, FaceModelInfo};
use crate::faces::{CompanyEmbeddings, CompanyId, EmbeddingFailure, SkippedFile};

/// One labeled embedding in the `data` array
#[derive(Debug, Clone, Serialize)]
pub struct FaceEmbeddingEntry {
    pub label: String,
    pub embedding: Embedding,
}

/// A face that loaded but produced no embedding
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedFace {
    pub label: String,
    pub file: String,
    pub error_type: String,
    pub message: String,
}

impl From<&EmbeddingFailure> for FailedFace {
    fn from(failure: &EmbeddingFailure) -> Self {
        Self {
            label: failure.label.clone(),
            file: failure.file_name.clone(),
            error_type: failure.error.kind().to_string(),
            message: failure.error.to_string(),
        }
    }
}

/// Response from GET /api/face/embeddings
///
/// `failed` and `skipped` are left out of the JSON when empty.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddingsResponse {
    pub success: bool,
    pub company_id: CompanyId,
    pub data: Vec<FaceEmbeddingEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed: Vec<FailedFace>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedFile>,
}

impl From<CompanyEmbeddings> for EmbeddingsResponse {
    fn from(result: CompanyEmbeddings) -> Self {
        let failed = result.failed.iter().map(FailedFace::from).collect();
        Self {
            success: true,
            company_id: result.company_id,
            data: result
                .embedded
                .into_iter()
                .map(|e| FaceEmbeddingEntry {
                    label: e.label,
                    embedding: e.embedding,
                })
                .collect(),
            failed,
            skipped: result.skipped,
        }
    }
}

/// Response from POST /api/face/upload
#[derive(Debug, Clone, Serialize)]
pub struct UploadFaceResponse {
    pub success: bool,
    pub message: String,
    /// Stored file name, relative to the company directory
    pub file: String,
}

/// Response from GET /health
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub features: Vec<String>,
    pub model: FaceModelInfo,
}
