// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use std::path::PathBuf;
use thiserror::Error;

use crate::vision::ImageError;

/// Errors from the face store that the caller has to act on
///
/// Per-file decode problems during a scan are not errors; they are reported
/// through `FaceScan::skipped`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid label '{0}': must be non-empty and must not contain '_', '.', '/' or '\\'")]
    InvalidLabel(String),

    #[error("Image format '{0}' is not an accepted face image extension")]
    UnsupportedExtension(String),

    #[error("Invalid image: {0}")]
    Image(#[from] ImageError),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}
