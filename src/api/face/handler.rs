// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Face endpoint handlers

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    Json,
};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use super::request::{EmbeddingsQuery, UploadFaceRequest, MAX_UPLOAD_BODY_BYTES};
use super::response::{EmbeddingsResponse, FailedFace, HealthResponse, UploadFaceResponse};
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::version;

/// GET /api/face/embeddings - Embeddings for every stored face of a company
///
/// # Query
/// - `companyId`: non-negative integer naming the company directory (required)
///
/// # Response
/// - `data`: `{label, embedding}` per embedded face, in file-name order
/// - `failed`: faces whose inference failed (omitted when empty)
/// - `skipped`: files that could not be decoded (omitted when empty)
///
/// # Errors
/// - 400 Bad Request: `companyId` missing, repeated or invalid
/// - 502 Bad Gateway: faces were found but none could be embedded
/// - 500 Internal Server Error: company directory unreadable
/// - 504 Gateway Timeout: request exceeded the configured timeout
pub async fn embeddings_handler(
    State(state): State<AppState>,
    query: Result<Query<EmbeddingsQuery>, QueryRejection>,
) -> Result<Json<EmbeddingsResponse>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::ValidationError {
        field: "companyId".to_string(),
        message: e.body_text(),
    })?;
    let company_id = query.company_id().map_err(|e| {
        warn!("Embeddings request rejected: {}", e);
        e
    })?;

    let service = state.service.clone();
    let result = run_blocking(state.request_timeout, move || {
        service.company_embeddings(company_id)
    })
    .await?
    .map_err(|e| {
        error!("❌ Failed to load faces for company {}: {}", company_id, e);
        ApiError::from(e)
    })?;

    if result.all_failed() {
        warn!(
            "All {} face(s) for company {} failed to embed",
            result.failed.len(),
            company_id
        );
        let failed: Vec<FailedFace> = result.failed.iter().map(FailedFace::from).collect();
        return Err(ApiError::EmbeddingFailed {
            message: format!(
                "None of the {} face image(s) for company {} could be embedded",
                failed.len(),
                company_id
            ),
            failed: serde_json::to_value(&failed).unwrap_or_default(),
        });
    }

    info!(
        "✅ Returning {} embedding(s) for company {}",
        result.embedded.len(),
        company_id
    );
    Ok(Json(EmbeddingsResponse::from(result)))
}

/// POST /api/face/upload - Store a new face image for an employee
///
/// # Request
/// - `companyId`: company the face belongs to (required)
/// - `employeeNumber`: label for the face (required)
/// - `imageBase64`: base64 image, data URL prefix allowed (required)
///
/// # Errors
/// - 400 Bad Request: missing fields, bad label, or an undecodable image
/// - 413 Payload Too Large: body over `MAX_UPLOAD_BODY_BYTES`
/// - 500 Internal Server Error: the file could not be written
pub async fn upload_face_handler(
    State(state): State<AppState>,
    payload: Result<Json<UploadFaceRequest>, JsonRejection>,
) -> Result<Json<UploadFaceResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            warn!("Upload rejected: body over {} bytes", MAX_UPLOAD_BODY_BYTES);
            ApiError::PayloadTooLarge {
                limit: MAX_UPLOAD_BODY_BYTES,
            }
        } else {
            ApiError::InvalidRequest(e.body_text())
        }
    })?;
    let upload = request.validate()?;
    debug!(
        "Upload request for company {}, label {}",
        upload.company_id, upload.label
    );

    let service = state.service.clone();
    let company_id = upload.company_id;
    let label = upload.label.clone();
    let image_base64 = upload.image_base64.to_string();
    let path = run_blocking(state.request_timeout, move || {
        service.register_face(company_id, &label, &image_base64)
    })
    .await??;

    let file = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(Json(UploadFaceResponse {
        success: true,
        message: format!("Face for {} saved", upload.label),
        file,
    }))
}

/// GET /health - Liveness plus the loaded model description
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: version::VERSION_NUMBER.to_string(),
        features: version::FEATURES.iter().map(|f| f.to_string()).collect(),
        model: state.service.model_info(),
    })
}

/// Run CPU-bound work off the async runtime, bounded by `timeout`
///
/// On timeout the blocking task keeps running to completion; only the
/// response is abandoned.
async fn run_blocking<T, F>(timeout: Duration, work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    with_timeout(timeout, tokio::task::spawn_blocking(work))
        .await?
        .map_err(|e| {
            error!("Blocking task failed: {}", e);
            ApiError::InternalError(format!("worker task failed: {}", e))
        })
}

async fn with_timeout<T>(timeout: Duration, fut: impl Future<Output = T>) -> Result<T, ApiError> {
    tokio::time::timeout(timeout, fut).await.map_err(|_| {
        warn!("⏱️ Request exceeded {}ms", timeout.as_millis());
        ApiError::Timeout
    })
}
