// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Genkou-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Genkou and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::cmp::Reverse;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::ids::{UserId, WorkId};
use super::Timestamp;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkStatus {
    #[default]
    InProgress,
    Completed,
    Suspended,
}

impl WorkStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::InProgress => "制作中",
            Self::Completed => "完了",
            Self::Suspended => "中断",
        }
    }
}

impl fmt::Display for WorkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A writer's work: the container that chapters and memos hang off.
///
/// `pinned` works list before all others. `total_chars` is a denormalized figure the
/// owner's client maintains; the backend never recomputes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Work {
    id: WorkId,
    owner: UserId,
    title: String,
    #[serde(default)]
    catchphrase: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    status: WorkStatus,
    #[serde(default)]
    pinned: bool,
    #[serde(default)]
    total_chars: usize,
    #[serde(default)]
    created_at: Option<Timestamp>,
    #[serde(default)]
    updated_at: Option<Timestamp>,
}

impl Work {
    /// A new, unpinned work with a zero character total.
    pub fn new(id: WorkId, owner: UserId, draft: WorkDraft) -> Self {
        Self {
            id,
            owner,
            title: draft.title,
            catchphrase: draft.catchphrase,
            description: draft.description,
            status: draft.status,
            pinned: false,
            total_chars: 0,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_timestamps(mut self, created_at: Timestamp, updated_at: Timestamp) -> Self {
        self.created_at = Some(created_at);
        self.updated_at = Some(updated_at);
        self
    }

    pub fn id(&self) -> &WorkId {
        &self.id
    }

    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn catchphrase(&self) -> &str {
        &self.catchphrase
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn status(&self) -> WorkStatus {
        self.status
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    pub fn set_pinned(&mut self, pinned: bool) {
        self.pinned = pinned;
    }

    pub fn total_chars(&self) -> usize {
        self.total_chars
    }

    pub fn created_at(&self) -> Option<Timestamp> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<Timestamp> {
        self.updated_at
    }

    pub fn set_updated_at(&mut self, updated_at: Option<Timestamp>) {
        self.updated_at = updated_at;
    }

    /// Merges the fields present in `patch` into this work.
    pub fn apply_patch(&mut self, patch: &WorkPatch) {
        if let Some(title) = &patch.title {
            self.title.clone_from(title);
        }
        if let Some(catchphrase) = &patch.catchphrase {
            self.catchphrase.clone_from(catchphrase);
        }
        if let Some(description) = &patch.description {
            self.description.clone_from(description);
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(total_chars) = patch.total_chars {
            self.total_chars = total_chars;
        }
    }
}

/// Fields a writer fills in when creating a work.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkDraft {
    pub title: String,
    #[serde(default)]
    pub catchphrase: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: WorkStatus,
}

impl WorkDraft {
    pub fn titled(title: impl Into<String>) -> Self {
        Self { title: title.into(), ..Self::default() }
    }
}

/// Partial work update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catchphrase: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<WorkStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_chars: Option<usize>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WorkSort {
    #[default]
    UpdatedAt,
    CreatedAt,
}

/// Pinned works first, then newest first by `sort`. Stable for equal keys.
pub fn sort_works(works: &mut [Work], sort: WorkSort) {
    works.sort_by_key(|work| {
        let stamp = match sort {
            WorkSort::UpdatedAt => work.updated_at,
            WorkSort::CreatedAt => work.created_at,
        };
        (!work.pinned, Reverse(stamp))
    });
}
