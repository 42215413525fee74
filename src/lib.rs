// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod cli;
pub mod config;
pub mod embeddings;
pub mod faces;
pub mod version;
pub mod vision;

// Re-export main types
pub use api::{create_app, ApiError, AppState};
pub use config::{ModelSettings, ServerSettings, ServiceConfig, StorageSettings};
pub use embeddings::{Embedding, EmbeddingError, FaceEmbedder, FaceModelInfo, OnnxFaceEmbedder};
pub use faces::{
    CompanyEmbeddings, CompanyId, FaceEmbeddingService, FaceImage, FaceScan, FaceStore,
    SkipReason, SkippedFile, StoreError,
};
