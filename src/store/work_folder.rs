// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Genkou-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Genkou and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fs;
use std::io;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::model::{
    Chapter, ChapterId, DailyProgress, HistoryEntry, IdError, Memo, UserId, Work, WorkId,
};

const WORKS_DIR: &str = "works";
const USERS_DIR: &str = "users";
const HISTORY_DIR: &str = "history";
const WORK_FILENAME: &str = "work.json";
const CHAPTERS_FILENAME: &str = "chapters.json";
const MEMOS_FILENAME: &str = "memos.json";
const PROGRESS_FILENAME: &str = "progress.json";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("json error at {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid persisted id {value:?}: {source}")]
    InvalidId {
        value: String,
        #[source]
        source: IdError,
    },
    #[error("invalid relative path for {field}: {value:?}")]
    InvalidRelativePath { field: &'static str, value: PathBuf },
    #[error("path is outside the store root: root={root:?} path={path:?}")]
    PathOutsideRoot { root: PathBuf, path: PathBuf },
    #[error("refusing to write through symlink at {path:?}")]
    SymlinkRefused { path: PathBuf },
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WriteDurability {
    /// Fast, best-effort persistence.
    ///
    /// - Writes a temp file and renames atomically into place.
    /// - Does not perform per-file fsync/sync.
    #[default]
    BestEffort,

    /// Slower, best-effort durability.
    ///
    /// Attempts to flush written file contents and rename operations to stable storage where
    /// possible. Exact guarantees are platform/filesystem-dependent.
    Durable,
}

/// On-disk home of works, chapter history and user progress ledgers.
///
/// Layout:
///
/// ```text
/// <root>/works/<work>/work.json
/// <root>/works/<work>/chapters.json
/// <root>/works/<work>/memos.json
/// <root>/works/<work>/history/<chapter>.json
/// <root>/users/<user>/progress.json
/// ```
///
/// Chapters and memos are stored in document (creation) order; readers sort by `order`.
#[derive(Debug, Clone)]
pub struct WorkFolder {
    root: PathBuf,
    durability: WriteDurability,
}

impl WorkFolder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), durability: WriteDurability::default() }
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn durability(&self) -> WriteDurability {
        self.durability
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn work_dir(&self, work_id: &WorkId) -> PathBuf {
        self.root.join(WORKS_DIR).join(encode_persisted_id_segment(work_id.as_str()))
    }

    pub fn work_path(&self, work_id: &WorkId) -> PathBuf {
        self.work_dir(work_id).join(WORK_FILENAME)
    }

    pub fn chapters_path(&self, work_id: &WorkId) -> PathBuf {
        self.work_dir(work_id).join(CHAPTERS_FILENAME)
    }

    pub fn memos_path(&self, work_id: &WorkId) -> PathBuf {
        self.work_dir(work_id).join(MEMOS_FILENAME)
    }

    pub fn history_path(&self, work_id: &WorkId, chapter_id: &ChapterId) -> PathBuf {
        let file_stem = encode_persisted_id_segment(chapter_id.as_str());
        self.work_dir(work_id).join(HISTORY_DIR).join(format!("{file_stem}.json"))
    }

    pub fn progress_path(&self, user_id: &UserId) -> PathBuf {
        self.root
            .join(USERS_DIR)
            .join(encode_persisted_id_segment(user_id.as_str()))
            .join(PROGRESS_FILENAME)
    }

    /// Lists the works that have a directory under `works/`, sorted by id.
    pub fn list_work_ids(&self) -> Result<Vec<WorkId>, StoreError> {
        let works_dir = self.root.join(WORKS_DIR);
        let entries = match fs::read_dir(&works_dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(StoreError::Io { path: works_dir, source }),
        };

        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| StoreError::Io { path: works_dir.clone(), source })?;
            let is_dir = entry
                .file_type()
                .map_err(|source| StoreError::Io { path: entry.path(), source })?
                .is_dir();
            if !is_dir {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(ToOwned::to_owned) else {
                continue;
            };
            let Some(decoded) = decode_persisted_id_segment(&name) else {
                continue;
            };
            let id = WorkId::new(decoded.clone())
                .map_err(|source| StoreError::InvalidId { value: decoded, source })?;
            ids.push(id);
        }
        ids.sort();
        Ok(ids)
    }

    /// The work record, or `None` for a work directory without one.
    pub fn load_work(&self, work_id: &WorkId) -> Result<Option<Work>, StoreError> {
        load_json_or_default(&self.work_path(work_id))
    }

    pub fn save_work(&self, work: &Work) -> Result<(), StoreError> {
        self.save_json(&self.work_path(work.id()), work)
    }

    /// Every stored work record, sorted by id. Directories without `work.json` are skipped.
    pub fn list_works(&self) -> Result<Vec<Work>, StoreError> {
        let mut works = Vec::new();
        for work_id in self.list_work_ids()? {
            if let Some(work) = self.load_work(&work_id)? {
                works.push(work);
            }
        }
        Ok(works)
    }

    /// Removes a work directory with its chapters, memos and history. Missing works are fine.
    pub fn remove_work(&self, work_id: &WorkId) -> Result<(), StoreError> {
        let dir = self.work_dir(work_id);
        match fs::symlink_metadata(&dir) {
            Ok(meta) if meta.file_type().is_symlink() => Err(StoreError::SymlinkRefused { path: dir }),
            Ok(_) => fs::remove_dir_all(&dir).map_err(|source| StoreError::Io { path: dir, source }),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io { path: dir, source }),
        }
    }

    pub fn load_chapters(&self, work_id: &WorkId) -> Result<Vec<Chapter>, StoreError> {
        load_json_or_default(&self.chapters_path(work_id))
    }

    pub fn save_chapters(&self, work_id: &WorkId, chapters: &[Chapter]) -> Result<(), StoreError> {
        self.save_json(&self.chapters_path(work_id), &chapters)
    }

    pub fn load_memos(&self, work_id: &WorkId) -> Result<Vec<Memo>, StoreError> {
        load_json_or_default(&self.memos_path(work_id))
    }

    pub fn save_memos(&self, work_id: &WorkId, memos: &[Memo]) -> Result<(), StoreError> {
        self.save_json(&self.memos_path(work_id), &memos)
    }

    pub fn load_history(
        &self,
        work_id: &WorkId,
        chapter_id: &ChapterId,
    ) -> Result<Vec<HistoryEntry>, StoreError> {
        load_json_or_default(&self.history_path(work_id, chapter_id))
    }

    pub fn save_history(
        &self,
        work_id: &WorkId,
        chapter_id: &ChapterId,
        entries: &[HistoryEntry],
    ) -> Result<(), StoreError> {
        self.save_json(&self.history_path(work_id, chapter_id), &entries)
    }

    /// Drops the history file of a deleted chapter. Missing files are fine.
    pub fn remove_history(&self, work_id: &WorkId, chapter_id: &ChapterId) -> Result<(), StoreError> {
        let path = self.history_path(work_id, chapter_id);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    pub fn load_progress(&self, user_id: &UserId) -> Result<Vec<DailyProgress>, StoreError> {
        load_json_or_default(&self.progress_path(user_id))
    }

    pub fn save_progress(
        &self,
        user_id: &UserId,
        progress: &[DailyProgress],
    ) -> Result<(), StoreError> {
        self.save_json(&self.progress_path(user_id), &progress)
    }

    fn save_json<T: Serialize + ?Sized>(&self, path: &Path, value: &T) -> Result<(), StoreError> {
        let mut json = serde_json::to_string_pretty(value)
            .map_err(|source| StoreError::Json { path: path.to_path_buf(), source })?;
        json.push('\n');
        write_atomic_in_root(&self.root, path, json.as_bytes(), self.durability)
    }
}

fn load_json_or_default<T: DeserializeOwned + Default>(path: &Path) -> Result<T, StoreError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(T::default()),
        Err(source) => return Err(StoreError::Io { path: path.to_path_buf(), source }),
    };
    serde_json::from_str(&raw).map_err(|source| StoreError::Json { path: path.to_path_buf(), source })
}

// Path encoding and atomic write helpers.
include!("work_folder/helpers.rs");
