// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Face API endpoint module
//!
//! Provides GET /api/face/embeddings and POST /api/face/upload.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::{embeddings_handler, health_handler, upload_face_handler};
pub use request::{EmbeddingsQuery, UploadFaceRequest, MAX_UPLOAD_BODY_BYTES};
pub use response::{EmbeddingsResponse, FaceEmbeddingEntry, FailedFace, HealthResponse, UploadFaceResponse};
