// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Service configuration
//!
//! Defaults mirror the on-disk layout the face service has always used:
//! images under `./images/<companyId>/` and the recognition model at
//! `./models/mobilefacenet.onnx`.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_STORAGE_ROOT: &str = "./images";
pub const DEFAULT_MODEL_PATH: &str = "./models/mobilefacenet.onnx";
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_EXTENSIONS: &[&str] = &["jpg"];
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

/// Where company face images live and which files count as images
#[derive(Debug, Clone, PartialEq)]
pub struct StorageSettings {
    pub root: PathBuf,
    /// Accepted file extensions, lowercase, without the leading dot
    pub extensions: Vec<String>,
}

/// Recognition model location and runtime options
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSettings {
    pub path: PathBuf,
    /// Try the CUDA execution provider before falling back to CPU
    pub use_cuda: bool,
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq)]
pub struct ServerSettings {
    pub listen_addr: String,
    /// Upper bound on one embeddings request (scan + all inferences)
    pub request_timeout_ms: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub storage: StorageSettings,
    pub model: ModelSettings,
    pub server: ServerSettings,
}

impl ServiceConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.storage.extensions.is_empty() {
            return Err("At least one image extension must be accepted".to_string());
        }
        if let Some(bad) = self
            .storage
            .extensions
            .iter()
            .find(|ext| ext.is_empty() || ext.contains(['.', '/', '\\']))
        {
            return Err(format!("Invalid image extension: '{}'", bad));
        }
        if self.server.request_timeout_ms == 0 {
            return Err("Request timeout must be greater than 0".to_string());
        }
        self.server
            .listen_addr
            .parse::<SocketAddr>()
            .map_err(|e| format!("Invalid listen address '{}': {}", self.server.listen_addr, e))?;
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.server.request_timeout_ms)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            storage: StorageSettings {
                root: PathBuf::from(DEFAULT_STORAGE_ROOT),
                extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            },
            model: ModelSettings {
                path: PathBuf::from(DEFAULT_MODEL_PATH),
                use_cuda: false,
            },
            server: ServerSettings {
                listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
                request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            },
        }
    }
}

/// Parse a comma separated extension list such as `"jpg, .JPEG,png"`
pub fn parse_extensions(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect()
}
