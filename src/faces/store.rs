// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Filesystem-backed face store
//!
//! Layout: `<root>/<companyId>/<label>_<anything>.<ext>`. The label is the
//! part of the file stem before the first underscore.

use image::DynamicImage;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::{CompanyId, StoreError};
use crate::config::StorageSettings;
use crate::vision::{decode_image_bytes, read_image_file, ImageError};

/// A decoded face image and the identity it belongs to
#[derive(Debug, Clone)]
pub struct FaceImage {
    pub label: String,
    pub file_name: String,
    pub image: DynamicImage,
}

/// Why a candidate file was left out of a scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum SkipReason {
    /// The file could not be read from disk
    Unreadable(String),
    /// The bytes are not a decodable image
    Decode(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedFile {
    pub file_name: String,
    pub reason: SkipReason,
}

/// Result of scanning one company directory
#[derive(Debug, Clone)]
pub struct FaceScan {
    pub company_id: CompanyId,
    pub directory: PathBuf,
    /// `false` when the company has no directory yet (no faces configured)
    pub directory_found: bool,
    pub faces: Vec<FaceImage>,
    pub skipped: Vec<SkippedFile>,
}

impl FaceScan {
    fn empty(company_id: CompanyId, directory: PathBuf, directory_found: bool) -> Self {
        Self {
            company_id,
            directory,
            directory_found,
            faces: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FaceStore {
    root: PathBuf,
    extensions: Vec<String>,
}

impl FaceStore {
    /// Create a store rooted at `root` accepting the given extensions
    /// (case-insensitive, leading dot optional)
    pub fn new<I, S>(root: impl Into<PathBuf>, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            root: root.into(),
            extensions: extensions
                .into_iter()
                .map(|ext| ext.as_ref().trim().trim_start_matches('.').to_lowercase())
                .filter(|ext| !ext.is_empty())
                .collect(),
        }
    }

    pub fn from_settings(settings: &StorageSettings) -> Self {
        Self::new(settings.root.clone(), &settings.extensions)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn accepted_extensions(&self) -> &[String] {
        &self.extensions
    }

    pub fn company_dir(&self, company_id: CompanyId) -> PathBuf {
        self.root.join(company_id.to_string())
    }

    /// Whether the file name carries one of the accepted extensions
    pub fn accepts(&self, file_name: &str) -> bool {
        Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.accepts_extension(ext))
            .unwrap_or(false)
    }

    fn accepts_extension(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }

    /// Load every decodable face image of a company
    ///
    /// A missing company directory yields an empty scan. Files that cannot be
    /// read or decoded are listed in `skipped` and never abort the scan.
    /// Faces are returned sorted by file name.
    pub fn load_faces(&self, company_id: CompanyId) -> Result<FaceScan, StoreError> {
        let dir = self.company_dir(company_id);
        if !dir.try_exists().map_err(|e| StoreError::io(&dir, e))? {
            warn!("⚠️ Folder not found: {}", dir.display());
            return Ok(FaceScan::empty(company_id, dir, false));
        }

        let entries = fs::read_dir(&dir).map_err(|e| StoreError::io(&dir, e))?;
        let mut candidates: Vec<(String, PathBuf)> = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                    continue;
                }
            };
            let path = entry.path();
            let file_name = entry.file_name().to_string_lossy().into_owned();
            if path.is_file() && self.accepts(&file_name) {
                candidates.push((file_name, path));
            }
        }
        candidates.sort_by(|a, b| a.0.cmp(&b.0));

        let mut scan = FaceScan::empty(company_id, dir, true);
        for (file_name, path) in candidates {
            match read_image_file(&path) {
                Ok(decoded) => {
                    let label = extract_label(&file_name);
                    debug!(
                        "Loaded face {} ({}x{}) as '{}'",
                        file_name,
                        decoded.width(),
                        decoded.height(),
                        label
                    );
                    scan.faces.push(FaceImage {
                        label,
                        file_name,
                        image: decoded.image,
                    });
                }
                Err(e) => {
                    warn!("Skipping {}: {}", file_name, e);
                    let reason = match e {
                        ImageError::Io(io) => SkipReason::Unreadable(io.to_string()),
                        other => SkipReason::Decode(other.to_string()),
                    };
                    scan.skipped.push(SkippedFile { file_name, reason });
                }
            }
        }

        Ok(scan)
    }

    /// Persist an encoded face image for `label` in the company directory
    ///
    /// The image must decode, and its detected format must map onto one of
    /// the accepted extensions, so everything written here is picked up by
    /// [`FaceStore::load_faces`] under the same label.
    pub fn save_face(
        &self,
        company_id: CompanyId,
        label: &str,
        bytes: &[u8],
    ) -> Result<PathBuf, StoreError> {
        validate_label(label)?;

        let decoded = decode_image_bytes(bytes)?;
        let extension = decoded
            .format
            .extensions_str()
            .iter()
            .copied()
            .find(|ext| self.accepts_extension(ext))
            .ok_or_else(|| {
                StoreError::UnsupportedExtension(
                    decoded
                        .format
                        .extensions_str()
                        .first()
                        .copied()
                        .unwrap_or("unknown")
                        .to_string(),
                )
            })?;

        let dir = self.company_dir(company_id);
        fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;

        let timestamp = chrono::Utc::now().timestamp_millis();
        let mut attempt = 0u32;
        loop {
            let file_name = if attempt == 0 {
                format!("{}_{}.{}", label, timestamp, extension)
            } else {
                format!("{}_{}-{}.{}", label, timestamp, attempt, extension)
            };
            let path = dir.join(&file_name);

            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    file.write_all(bytes).map_err(|e| StoreError::io(&path, e))?;
                    info!("✅ Saved face: {}", path.display());
                    return Ok(path);
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => attempt += 1,
                Err(e) => return Err(StoreError::io(&path, e)),
            }
        }
    }
}

/// Label for a face file: the stem up to the first underscore
///
/// `alice_01.jpg` gives `alice`. A stem without an underscore, or one that
/// starts with an underscore, is used whole.
pub fn extract_label(file_name: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);

    match stem.split('_').next() {
        Some(label) if !label.is_empty() => label.to_string(),
        _ => stem.to_string(),
    }
}

fn validate_label(label: &str) -> Result<(), StoreError> {
    let invalid = label.trim().is_empty()
        || label != label.trim()
        || label.contains(['_', '.', '/', '\\']);
    if invalid {
        return Err(StoreError::InvalidLabel(label.to_string()));
    }
    Ok(())
}
