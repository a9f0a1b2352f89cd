// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Genkou-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Genkou and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};

use super::ids::MemoId;
use super::Timestamp;

/// Title given to a memo created without one.
pub const NEW_MEMO_TITLE: &str = "新規メモ";

/// Title stored when a memo is saved with a blank title.
pub const UNTITLED_MEMO_TITLE: &str = "無題のメモ";

/// A free-form note attached to a work, ordered independently of chapters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memo {
    id: MemoId,
    title: String,
    #[serde(default)]
    content: String,
    order: i64,
    #[serde(default)]
    created_at: Option<Timestamp>,
    #[serde(default)]
    updated_at: Option<Timestamp>,
}

impl Memo {
    pub fn new(id: MemoId, title: impl Into<String>, content: impl Into<String>, order: i64) -> Self {
        Self {
            id,
            title: title.into(),
            content: content.into(),
            order,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_timestamps(mut self, created_at: Timestamp, updated_at: Timestamp) -> Self {
        self.created_at = Some(created_at);
        self.updated_at = Some(updated_at);
        self
    }

    pub fn id(&self) -> &MemoId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    pub fn order(&self) -> i64 {
        self.order
    }

    pub fn set_order(&mut self, order: i64) {
        self.order = order;
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
}

/// Normalizes a user-entered memo title for storage.
pub fn memo_title_or_untitled(title: &str) -> String {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        UNTITLED_MEMO_TITLE.to_owned()
    } else {
        trimmed.to_owned()
    }
}
