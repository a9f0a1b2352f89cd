// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Genkou-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Genkou and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::model::ProgressPolicy;
use crate::store::WriteDurability;

pub const DEFAULT_MAX_CHAPTERS: usize = 1000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("invalid config {path:?}: {source}")]
    Parse { path: PathBuf, source: serde_json::Error },
    #[error("max_chapters must be at least 1")]
    ZeroCapacity,
}

/// Editor settings. Every field is optional in the JSON form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    pub max_chapters: usize,
    pub progress_policy: ProgressPolicy,
    /// Fsync documents written by the folder-backed store.
    pub durable_writes: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_chapters: DEFAULT_MAX_CHAPTERS,
            progress_policy: ProgressPolicy::default(),
            durable_writes: false,
        }
    }
}

impl EditorConfig {
    pub fn from_json(path: &Path, raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        Self::from_json(path, &raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_chapters == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(())
    }

    pub fn write_durability(&self) -> WriteDurability {
        if self.durable_writes {
            WriteDurability::Durable
        } else {
            WriteDurability::BestEffort
        }
    }
}
