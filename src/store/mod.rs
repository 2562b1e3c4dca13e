// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Classflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Persistence for diagrams.
//!
//! A diagram is stored as one JSON blob under a fixed key in a [`BlobStore`]. The blob shape
//! ([`DiagramJson`]) is plain data and is kept apart from the live model; [`hydrate`] joins the
//! two. [`PersistenceBridge`] owns the load/save policy.

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::model::IdError;

mod blob;
mod json;
mod persist;
#[cfg(test)]
pub(crate) mod testing;

pub use blob::{BlobFolder, BlobStore, MemoryBlobStore, WriteDurability};
pub use json::{
    hydrate, DiagramJson, EdgeDataJson, EdgeJson, NodeDataJson, NodeJson, PositionJson,
    RelationshipTypeJson,
};
pub use persist::{LoadOutcome, PersistenceBridge, DEFAULT_STORAGE_KEY, SEED_NODE_POSITION};

#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: io::Error,
    },
    Json {
        key: String,
        source: serde_json::Error,
    },
    InvalidId {
        field: &'static str,
        value: String,
        source: Box<IdError>,
    },
    InvalidKey {
        key: String,
    },
    Encoding {
        path: PathBuf,
        source: std::string::FromUtf8Error,
    },
}

impl StoreError {
    /// The blob was read but its contents cannot be turned into a diagram.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::Json { .. } | Self::InvalidId { .. } | Self::Encoding { .. }
        )
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
            Self::Json { key, source } => write!(f, "json error in blob {key:?}: {source}"),
            Self::InvalidId {
                field,
                value,
                source,
            } => write!(f, "invalid {field} {value:?}: {source}"),
            Self::InvalidKey { key } => write!(f, "invalid storage key {key:?}"),
            Self::Encoding { path, source } => {
                write!(f, "blob at {path:?} is not utf-8: {source}")
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::InvalidId { source, .. } => Some(source),
            Self::Encoding { source, .. } => Some(source),
            Self::InvalidKey { .. } => None,
        }
    }
}
