// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Face endpoint request types and validation

use serde::Deserialize;

use crate::api::errors::ApiError;
use crate::faces::CompanyId;
use crate::vision::MAX_IMAGE_SIZE;

/// Longest `imageBase64` value that can still decode to `MAX_IMAGE_SIZE`
/// bytes, with room for a data URL prefix and line breaks
pub const MAX_ENCODED_IMAGE_LEN: usize = MAX_IMAGE_SIZE.div_ceil(3) * 4 + 1024;

/// Request body limit for uploads: the encoded image plus the JSON envelope
pub const MAX_UPLOAD_BODY_BYTES: usize = MAX_ENCODED_IMAGE_LEN + 64 * 1024;

/// Query string for GET /api/face/embeddings
///
/// `companyId` stays a raw string here so a missing or malformed value is
/// answered with our own JSON error instead of the extractor's rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddingsQuery {
    #[serde(default)]
    pub company_id: Option<String>,
}

impl EmbeddingsQuery {
    pub fn company_id(&self) -> Result<CompanyId, ApiError> {
        let raw = self
            .company_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ApiError::ValidationError {
                field: "companyId".to_string(),
                message: "companyId is required".to_string(),
            })?;

        raw.parse::<CompanyId>()
            .map_err(|e| ApiError::ValidationError {
                field: "companyId".to_string(),
                message: e.to_string(),
            })
    }
}

/// Body for POST /api/face/upload
///
/// `companyId` and `employeeNumber` are accepted as JSON numbers or strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadFaceRequest {
    #[serde(default)]
    pub company_id: Option<serde_json::Value>,

    #[serde(default)]
    pub employee_number: Option<serde_json::Value>,

    /// Base64 image data, optionally with a `data:image/...;base64,` prefix
    #[serde(default)]
    pub image_base64: Option<String>,
}

/// Upload fields after validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedUpload<'a> {
    pub company_id: CompanyId,
    pub label: String,
    pub image_base64: &'a str,
}

impl UploadFaceRequest {
    pub fn validate(&self) -> Result<ValidatedUpload<'_>, ApiError> {
        let company_id = match &self.company_id {
            Some(serde_json::Value::Number(n)) => n.as_u64().map(CompanyId::new),
            Some(serde_json::Value::String(s)) => s.parse::<CompanyId>().ok(),
            _ => None,
        }
        .ok_or_else(|| ApiError::ValidationError {
            field: "companyId".to_string(),
            message: "companyId must be a non-negative integer".to_string(),
        })?;

        let label = match &self.employee_number {
            Some(serde_json::Value::String(s)) => Some(s.trim().to_string()),
            Some(serde_json::Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::ValidationError {
            field: "employeeNumber".to_string(),
            message: "employeeNumber is required".to_string(),
        })?;

        let image_base64 = self
            .image_base64
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ApiError::ValidationError {
                field: "imageBase64".to_string(),
                message: "imageBase64 is required".to_string(),
            })?;

        if image_base64.len() > MAX_ENCODED_IMAGE_LEN {
            return Err(ApiError::ValidationError {
                field: "imageBase64".to_string(),
                message: format!("image exceeds maximum size of {} bytes", MAX_IMAGE_SIZE),
            });
        }

        Ok(ValidatedUpload {
            company_id,
            label,
            image_base64,
        })
    }
}
