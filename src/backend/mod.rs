// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Genkou-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Genkou and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The document backend contract.
//!
//! The backend is the source of truth for works, chapters, memos, history backups and
//! progress ledgers. Writes are asynchronous; changes come back as full snapshots on live
//! [`Subscription`]s, with no ordering guarantee relative to the write that caused them.

use std::fmt;
use std::future::Future;

use crate::model::{
    Chapter, ChapterId, ChapterPatch, DailyProgress, HistoryEntry, Memo, MemoId, Timestamp,
    UserId, Work, WorkDraft, WorkId, WorkPatch,
};
use crate::store::StoreError;

pub mod auth;
pub mod memory;
pub mod subscription;
#[cfg(test)]
pub(crate) mod testing;

pub use auth::{AuthProvider, StaticAuth};
pub use memory::MemoryBackend;
pub use subscription::Subscription;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Work,
    Chapter,
    Memo,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Work => f.write_str("work"),
            Self::Chapter => f.write_str("chapter"),
            Self::Memo => f.write_str("memo"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("backend unavailable: {reason}")]
    Unavailable { reason: String },
    #[error("{kind} not found (id={id})")]
    NotFound { kind: DocumentKind, id: String },
    #[error("permission denied: {reason}")]
    PermissionDenied { reason: String },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Hosted-document-database contract used by the reconciler and the memo board.
///
/// Every write suspends until the backend acknowledges it. Snapshot delivery is decoupled
/// from acknowledgement: a snapshot may reflect the write, a concurrent foreign write, or
/// neither yet.
pub trait Backend {
    /// Live query of the works `owner` owns, pinned first, then most recently updated.
    fn subscribe_works(&self, owner: &UserId) -> Result<Subscription<Vec<Work>>, BackendError>;

    /// Creates an unpinned work with a zero character total.
    fn create_work(
        &self,
        owner: &UserId,
        draft: &WorkDraft,
    ) -> impl Future<Output = Result<WorkId, BackendError>>;

    fn update_work(
        &self,
        work_id: &WorkId,
        patch: &WorkPatch,
    ) -> impl Future<Output = Result<Timestamp, BackendError>>;

    /// Deletes the work with its chapters, memos and history.
    fn delete_work(&self, work_id: &WorkId) -> impl Future<Output = Result<(), BackendError>>;

    /// Stores `!currently_pinned` as the pin state, leaving `updated_at` alone.
    fn toggle_work_pin(
        &self,
        work_id: &WorkId,
        currently_pinned: bool,
    ) -> impl Future<Output = Result<(), BackendError>>;

    /// Live query of a work's chapters, ascending by `order` (ties in document order).
    fn subscribe_chapters(
        &self,
        work_id: &WorkId,
    ) -> Result<Subscription<Vec<Chapter>>, BackendError>;

    /// Creates a chapter titled `第{order}話` and returns its new identity.
    fn create_chapter(
        &self,
        work_id: &WorkId,
        order: i64,
        initial_content: &str,
    ) -> impl Future<Output = Result<ChapterId, BackendError>>;

    /// Merges `patch` into the chapter; returns the update timestamp the backend stamped.
    fn update_chapter(
        &self,
        work_id: &WorkId,
        chapter_id: &ChapterId,
        patch: &ChapterPatch,
    ) -> impl Future<Output = Result<Timestamp, BackendError>>;

    fn delete_chapter(
        &self,
        work_id: &WorkId,
        chapter_id: &ChapterId,
    ) -> impl Future<Output = Result<(), BackendError>>;

    /// Adds `amount` to the user's counter for today, creating the day record if absent.
    fn increment_daily_progress(
        &self,
        user_id: &UserId,
        amount: i64,
    ) -> impl Future<Output = Result<(), BackendError>>;

    /// The most recent `days` ledger records, oldest first.
    fn recent_daily_progress(
        &self,
        user_id: &UserId,
        days: usize,
    ) -> impl Future<Output = Result<Vec<DailyProgress>, BackendError>>;

    fn save_history_backup(
        &self,
        work_id: &WorkId,
        chapter_id: &ChapterId,
        content: &str,
    ) -> impl Future<Output = Result<(), BackendError>>;

    /// History backups of a chapter, newest first.
    fn list_history(
        &self,
        work_id: &WorkId,
        chapter_id: &ChapterId,
    ) -> impl Future<Output = Result<Vec<HistoryEntry>, BackendError>>;

    /// Live query of a work's memos, ascending by `order`.
    fn subscribe_memos(&self, work_id: &WorkId) -> Result<Subscription<Vec<Memo>>, BackendError>;

    fn create_memo(
        &self,
        work_id: &WorkId,
        title: &str,
        content: &str,
        order: i64,
    ) -> impl Future<Output = Result<MemoId, BackendError>>;

    fn update_memo(
        &self,
        work_id: &WorkId,
        memo_id: &MemoId,
        title: &str,
        content: &str,
    ) -> impl Future<Output = Result<Timestamp, BackendError>>;

    /// Gives `first` the order `second_order` and `second` the order `first_order`.
    fn swap_memo_order(
        &self,
        work_id: &WorkId,
        first: &MemoId,
        first_order: i64,
        second: &MemoId,
        second_order: i64,
    ) -> impl Future<Output = Result<(), BackendError>>;

    fn delete_memo(
        &self,
        work_id: &WorkId,
        memo_id: &MemoId,
    ) -> impl Future<Output = Result<(), BackendError>>;
}
