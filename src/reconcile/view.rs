// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Genkou-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Genkou and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::{Chapter, ChapterId};
use crate::text::count_pure;

/// One rendered row of the chapter list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterRow {
    pub id: ChapterId,
    pub title: String,
    pub pure_count: usize,
    pub active: bool,
    /// Drag-to-reorder affordance; withheld while delete mode is on.
    pub draggable: bool,
    pub deletable: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChapterListView {
    pub rows: Vec<ChapterRow>,
    pub total_pure: usize,
    pub delete_mode: bool,
}

impl ChapterListView {
    pub fn build(chapters: &[Chapter], active: Option<&ChapterId>, delete_mode: bool) -> Self {
        let rows = chapters
            .iter()
            .map(|chapter| ChapterRow {
                id: chapter.id().clone(),
                title: chapter.title().to_owned(),
                pure_count: count_pure(chapter.content()),
                active: active == Some(chapter.id()),
                draggable: !delete_mode,
                deletable: delete_mode,
            })
            .collect::<Vec<_>>();
        let total_pure = rows.iter().map(|row| row.pure_count).sum();
        Self { rows, total_pure, delete_mode }
    }

    pub fn active_row(&self) -> Option<&ChapterRow> {
        self.rows.iter().find(|row| row.active)
    }
}
