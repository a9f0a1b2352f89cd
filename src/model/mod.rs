// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Genkou-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Genkou and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Document types shared by the reconciler, the backends and the store.
//!
//! Users own works and a daily progress ledger; a work holds ordered chapters and memos.

pub mod chapter;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod ids;
pub mod memo;
pub mod progress;
pub mod work;

pub use chapter::{Chapter, ChapterPatch};
pub use ids::{ChapterId, Id, IdError, MemoId, UserId, WorkId};
pub use memo::{memo_title_or_untitled, Memo, NEW_MEMO_TITLE, UNTITLED_MEMO_TITLE};
pub use progress::{DailyProgress, HistoryEntry, ProgressPolicy};
pub use work::{sort_works, Work, WorkDraft, WorkPatch, WorkSort, WorkStatus};

/// Backend-assigned write time.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
