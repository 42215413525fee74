// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Company face storage and the embedding workflow built on top of it

pub mod error;
pub mod service;
pub mod store;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub use error::StoreError;
pub use service::{CompanyEmbeddings, EmbeddingFailure, FaceEmbeddingService, LabeledEmbedding};
pub use store::{extract_label, FaceImage, FaceScan, FaceStore, SkipReason, SkippedFile};

/// Tenant identifier; names the company's image directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyId(u64);

impl CompanyId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for CompanyId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for CompanyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("companyId must be a non-negative integer, got '{0}'")]
pub struct ParseCompanyIdError(pub String);

impl FromStr for CompanyId {
    type Err = ParseCompanyIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(CompanyId)
            .map_err(|_| ParseCompanyIdError(s.to_string()))
    }
}
