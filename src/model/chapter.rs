// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Genkou-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Genkou and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};

use super::ids::ChapterId;
use super::Timestamp;

/// One ordered text unit within a work.
///
/// Chapters are displayed by ascending `order`. Orders are sort keys only: they are not
/// guaranteed to be contiguous or unique while concurrent edits are in flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    id: ChapterId,
    title: String,
    #[serde(default)]
    content: String,
    order: i64,
    #[serde(default)]
    updated_at: Option<Timestamp>,
}

impl Chapter {
    pub fn new(
        id: ChapterId,
        title: impl Into<String>,
        content: impl Into<String>,
        order: i64,
    ) -> Self {
        Self { id, title: title.into(), content: content.into(), order, updated_at: None }
    }

    /// Title assigned to a freshly created chapter (`第N話`).
    pub fn default_title(order: i64) -> String {
        format!("第{order}話")
    }

    pub fn with_updated_at(mut self, updated_at: Timestamp) -> Self {
        self.updated_at = Some(updated_at);
        self
    }

    pub fn id(&self) -> &ChapterId {
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

    pub fn updated_at(&self) -> Option<Timestamp> {
        self.updated_at
    }

    pub fn set_updated_at(&mut self, updated_at: Option<Timestamp>) {
        self.updated_at = updated_at;
    }

    /// Merges the fields present in `patch` into this chapter.
    pub fn apply_patch(&mut self, patch: &ChapterPatch) {
        if let Some(title) = &patch.title {
            self.title.clone_from(title);
        }
        if let Some(content) = &patch.content {
            self.content.clone_from(content);
        }
        if let Some(order) = patch.order {
            self.order = order;
        }
    }
}

/// Partial chapter update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

impl ChapterPatch {
    pub fn content(content: impl Into<String>) -> Self {
        Self { content: Some(content.into()), ..Self::default() }
    }

    pub fn title(title: impl Into<String>) -> Self {
        Self { title: Some(title.into()), ..Self::default() }
    }

    pub fn order(order: i64) -> Self {
        Self { order: Some(order), ..Self::default() }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.order.is_none()
    }
}
