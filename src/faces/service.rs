// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Per-company embedding workflow: scan the store, embed each face

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::{CompanyId, FaceScan, FaceStore, SkippedFile, StoreError};
use crate::embeddings::{Embedding, EmbeddingError, FaceEmbedder, FaceModelInfo};
use crate::vision::decode_base64_payload;

#[derive(Debug, Clone)]
pub struct LabeledEmbedding {
    pub label: String,
    pub file_name: String,
    pub embedding: Embedding,
}

/// A face that was loaded but could not be embedded
#[derive(Debug)]
pub struct EmbeddingFailure {
    pub label: String,
    pub file_name: String,
    pub error: EmbeddingError,
}

/// Everything known about one company's faces after an embedding pass
#[derive(Debug)]
pub struct CompanyEmbeddings {
    pub company_id: CompanyId,
    pub embedded: Vec<LabeledEmbedding>,
    pub failed: Vec<EmbeddingFailure>,
    pub skipped: Vec<SkippedFile>,
}

impl CompanyEmbeddings {
    /// Faces were loaded, yet none of them produced an embedding
    pub fn all_failed(&self) -> bool {
        self.embedded.is_empty() && !self.failed.is_empty()
    }
}

/// Owns the face store and the shared model handle
///
/// The embedder is injected once at startup and shared by every request.
#[derive(Clone)]
pub struct FaceEmbeddingService {
    store: FaceStore,
    embedder: Arc<dyn FaceEmbedder>,
}

impl FaceEmbeddingService {
    pub fn new(store: FaceStore, embedder: Arc<dyn FaceEmbedder>) -> Self {
        Self { store, embedder }
    }

    pub fn store(&self) -> &FaceStore {
        &self.store
    }

    pub fn model_info(&self) -> FaceModelInfo {
        self.embedder.info()
    }

    /// Scan a company's directory and embed every face found
    ///
    /// Inference failures are collected per face; only store-level errors
    /// (an unreadable company directory) abort the call.
    pub fn company_embeddings(
        &self,
        company_id: CompanyId,
    ) -> Result<CompanyEmbeddings, StoreError> {
        info!("📥 Request for embeddings: companyId={}", company_id);
        let start = Instant::now();

        let scan = self.store.load_faces(company_id)?;
        info!(
            "🔍 Found {} face(s), skipped {} file(s)",
            scan.faces.len(),
            scan.skipped.len()
        );

        let result = self.embed_scan(scan);

        info!(
            "Embedded {} face(s) for company {} in {}ms ({} failed)",
            result.embedded.len(),
            company_id,
            start.elapsed().as_millis(),
            result.failed.len()
        );
        Ok(result)
    }

    fn embed_scan(&self, scan: FaceScan) -> CompanyEmbeddings {
        let mut embedded = Vec::with_capacity(scan.faces.len());
        let mut failed = Vec::new();

        for face in scan.faces {
            debug!(
                "🧠 Embedding for label: {}, image: {}x{}",
                face.label,
                face.image.width(),
                face.image.height()
            );
            match self.embedder.embed(&face.image) {
                Ok(embedding) => embedded.push(LabeledEmbedding {
                    label: face.label,
                    file_name: face.file_name,
                    embedding,
                }),
                Err(error) => {
                    warn!(
                        "Embedding failed for {} ({}): {}",
                        face.label, face.file_name, error
                    );
                    failed.push(EmbeddingFailure {
                        label: face.label,
                        file_name: face.file_name,
                        error,
                    });
                }
            }
        }

        CompanyEmbeddings {
            company_id: scan.company_id,
            embedded,
            failed,
            skipped: scan.skipped,
        }
    }

    /// Store a base64-encoded face image under `label` for a company
    pub fn register_face(
        &self,
        company_id: CompanyId,
        label: &str,
        image_base64: &str,
    ) -> Result<PathBuf, StoreError> {
        let bytes = decode_base64_payload(image_base64)?;
        self.store.save_face(company_id, label, &bytes)
    }
}
