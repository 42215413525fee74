// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the face embedding service

/// Full version string with feature description
pub const VERSION: &str = "v0.1.0-face-embeddings-2025-10-20";

/// Semantic version number
pub const VERSION_NUMBER: &str = "0.1.0";

/// Build date
pub const BUILD_DATE: &str = "2025-10-20";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "company-face-embeddings",
    "face-upload",
    "unit-norm-embeddings",
    "skipped-file-reporting",
    "request-timeout",
    "cuda-fallback",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("Face Embedding Service {} ({})", VERSION_NUMBER, BUILD_DATE)
}
