// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod errors;
pub mod face;
pub mod http_server;

pub use errors::{ApiError, ErrorResponse};
pub use face::{
    embeddings_handler, health_handler, upload_face_handler, EmbeddingsQuery, EmbeddingsResponse,
    HealthResponse, UploadFaceRequest, UploadFaceResponse,
};
pub use http_server::{create_app, start_server, AppState};
