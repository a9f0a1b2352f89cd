// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Genkou-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Genkou and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Chapter reconciler: the single owner of the active chapter and the chapter order.
//!
//! The backend pushes complete snapshots; [`ChapterReconciler::set_chapters`] merges each one
//! into the local working copy, keeps the selection valid, and resolves a pending selection
//! for a chapter that was just created. User operations go to the backend and come back as a
//! later snapshot.

use std::sync::Arc;

use chrono::Utc;

use crate::backend::{AuthProvider, Backend, BackendError};
use crate::config::EditorConfig;
use crate::model::{Chapter, ChapterId, ChapterPatch, ProgressPolicy, Timestamp, WorkId};
use crate::text::pure_delta;
use crate::workspace::event::{emit, EventSender, Notice, SaveStatus, WorkspaceEvent};

mod overlay;
mod view;

use overlay::OverlayTable;
pub use view::{ChapterListView, ChapterRow};

#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    #[error("no work is bound")]
    NoWork,
    #[error("no chapter is selected")]
    NoChapterSelected,
    #[error("chapter limit reached ({limit})")]
    CapacityExceeded { limit: usize },
    #[error(transparent)]
    Backend(#[from] BackendError),
}

pub struct ChapterReconciler<B> {
    backend: Arc<B>,
    auth: Arc<dyn AuthProvider>,
    events: EventSender,
    max_chapters: usize,
    progress_policy: ProgressPolicy,
    work_id: Option<WorkId>,
    chapters: Vec<Chapter>,
    current_chapter_id: Option<ChapterId>,
    pending_select_id: Option<ChapterId>,
    delete_mode: bool,
    overlays: OverlayTable,
}

impl<B: Backend> ChapterReconciler<B> {
    pub fn new(
        backend: Arc<B>,
        auth: Arc<dyn AuthProvider>,
        config: &EditorConfig,
        events: EventSender,
    ) -> Self {
        Self {
            backend,
            auth,
            events,
            max_chapters: config.max_chapters,
            progress_policy: config.progress_policy,
            work_id: None,
            chapters: Vec::new(),
            current_chapter_id: None,
            pending_select_id: None,
            delete_mode: false,
            overlays: OverlayTable::default(),
        }
    }

    /// Binds a work. Chapters and selection are left alone; see [`Self::reset`].
    pub fn set_work_id(&mut self, work_id: WorkId) {
        self.work_id = Some(work_id);
    }

    /// Detaches from the bound work so no further writes reach it.
    pub fn unbind(&mut self) {
        self.work_id = None;
        self.pending_select_id = None;
    }

    pub fn work_id(&self) -> Option<&WorkId> {
        self.work_id.as_ref()
    }

    /// Drops everything tied to the previous work.
    pub fn reset(&mut self) {
        self.chapters.clear();
        self.current_chapter_id = None;
        self.pending_select_id = None;
        self.delete_mode = false;
        self.overlays.clear();
        self.render();
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    pub fn current_chapter_id(&self) -> Option<&ChapterId> {
        self.current_chapter_id.as_ref()
    }

    pub fn current_chapter(&self) -> Option<&Chapter> {
        let id = self.current_chapter_id.as_ref()?;
        self.find(id)
    }

    pub fn pending_select_id(&self) -> Option<&ChapterId> {
        self.pending_select_id.as_ref()
    }

    pub fn is_delete_mode(&self) -> bool {
        self.delete_mode
    }

    pub fn total_pure(&self) -> usize {
        self.view().total_pure
    }

    pub fn view(&self) -> ChapterListView {
        ChapterListView::build(&self.chapters, self.current_chapter_id.as_ref(), self.delete_mode)
    }

    fn find(&self, id: &ChapterId) -> Option<&Chapter> {
        self.chapters.iter().find(|chapter| chapter.id() == id)
    }

    fn contains(&self, id: &ChapterId) -> bool {
        self.find(id).is_some()
    }

    fn render(&self) {
        emit(&self.events, WorkspaceEvent::ChapterListRendered(self.view()));
    }

    fn notify(&self, notice: Notice) {
        emit(&self.events, WorkspaceEvent::Notice(notice));
    }

    fn save_status(&self, status: SaveStatus) {
        emit(&self.events, WorkspaceEvent::SaveStatus(status));
    }

    /// Reconciles a snapshot delivered in ascending `order`.
    pub fn set_chapters(&mut self, snapshot: Vec<Chapter>) {
        let mut snapshot = snapshot;
        self.overlays.merge(&mut snapshot);
        self.chapters = snapshot;

        self.render();

        if self.current_chapter_id.as_ref().is_some_and(|id| !self.contains(id)) {
            tracing::debug!(chapter = ?self.current_chapter_id, "active chapter vanished");
            self.current_chapter_id = None;
        }

        if let Some(pending) = self.pending_select_id.clone() {
            if self.contains(&pending) {
                self.select_chapter(&pending);
                self.pending_select_id = None;
                return;
            }
        }

        if self.current_chapter_id.is_none() {
            if let Some(first) = self.chapters.first().map(|chapter| chapter.id().clone()) {
                self.select_chapter(&first);
            }
        }

        tracing::debug!(
            chapters = self.chapters.len(),
            current = ?self.current_chapter_id,
            pending = ?self.pending_select_id,
            "chapters reconciled"
        );
    }

    /// Activates `id` if it is present. Returns false for an unknown id.
    ///
    /// Re-selecting the active chapter re-renders without a change notification, so a
    /// background snapshot never clobbers the editor buffer.
    pub fn select_chapter(&mut self, id: &ChapterId) -> bool {
        let Some(chapter) = self.find(id).cloned() else {
            return false;
        };
        let changed = self.current_chapter_id.as_ref() != Some(id);
        self.current_chapter_id = Some(id.clone());
        self.render();
        if changed {
            emit(&self.events, WorkspaceEvent::ChapterChanged(chapter));
        }
        true
    }

    /// Requests a new chapter after the last one; the next snapshot containing it selects it.
    pub async fn add_chapter(&mut self) -> Result<ChapterId, ReconcileError> {
        let work_id = self.work_id.clone().ok_or(ReconcileError::NoWork)?;
        if self.chapters.len() >= self.max_chapters {
            let limit = self.max_chapters;
            self.notify(Notice::CapacityExceeded { limit });
            return Err(ReconcileError::CapacityExceeded { limit });
        }

        let order = self.chapters.last().map_or(1, |chapter| chapter.order() + 1);
        match self.backend.create_chapter(&work_id, order, "").await {
            Ok(id) => {
                tracing::info!(work = %work_id, chapter = %id, order, "chapter requested");
                self.pending_select_id = Some(id.clone());
                Ok(id)
            }
            Err(err) => {
                tracing::warn!(work = %work_id, error = %err, "failed to create chapter");
                self.notify(Notice::ChapterCreateFailed);
                Err(err.into())
            }
        }
    }

    /// Applies `patch` to the active chapter locally, then writes it to the backend.
    ///
    /// A content change records its pure-count delta to the current user's daily ledger,
    /// subject to the progress policy, whether or not the write succeeds. A failed write
    /// keeps the local patch.
    pub async fn update_current_chapter(
        &mut self,
        patch: ChapterPatch,
    ) -> Result<Timestamp, ReconcileError> {
        let work_id = self.work_id.clone().ok_or(ReconcileError::NoWork)?;
        let chapter_id = self.current_chapter_id.clone().ok_or(ReconcileError::NoChapterSelected)?;
        let Some(chapter) = self.chapters.iter_mut().find(|chapter| chapter.id() == &chapter_id)
        else {
            return Err(ReconcileError::NoChapterSelected);
        };

        let delta = patch.content.as_deref().map(|content| pure_delta(chapter.content(), content));
        chapter.apply_patch(&patch);
        let ticket = self.overlays.record(&chapter_id, &patch, Utc::now());

        self.save_status(SaveStatus::Saving);
        let result = self.backend.update_chapter(&work_id, &chapter_id, &patch).await;
        match &result {
            Ok(stamp) => {
                self.overlays.acknowledge(&ticket, *stamp);
                self.save_status(SaveStatus::Saved);
            }
            Err(err) => {
                tracing::warn!(work = %work_id, chapter = %chapter_id, error = %err, "chapter save failed");
                self.overlays.fail(&ticket);
                self.save_status(SaveStatus::Failed);
                self.notify(Notice::SaveFailed);
            }
        }

        if let Some(amount) = delta.and_then(|delta| self.progress_policy.admit(delta)) {
            self.record_progress(amount).await;
        }

        Ok(result?)
    }

    async fn record_progress(&self, amount: i64) {
        let Some(user_id) = self.auth.current_user() else {
            tracing::debug!(amount, "no signed-in user; progress not recorded");
            return;
        };
        if let Err(err) = self.backend.increment_daily_progress(&user_id, amount).await {
            tracing::warn!(user = %user_id, amount, error = %err, "failed to record progress");
        }
    }

    /// Explicit save: writes the active chapter's title and content and keeps a history
    /// backup of the content.
    pub async fn commit_current_chapter(&mut self) -> Result<Timestamp, ReconcileError> {
        let work_id = self.work_id.clone().ok_or(ReconcileError::NoWork)?;
        let chapter = self.current_chapter().cloned().ok_or(ReconcileError::NoChapterSelected)?;
        let patch = ChapterPatch {
            title: Some(chapter.title().to_owned()),
            content: Some(chapter.content().to_owned()),
            order: None,
        };
        let ticket = self.overlays.record(chapter.id(), &patch, Utc::now());

        self.save_status(SaveStatus::Saving);
        let saved = async {
            let stamp = self.backend.update_chapter(&work_id, chapter.id(), &patch).await?;
            self.backend.save_history_backup(&work_id, chapter.id(), chapter.content()).await?;
            Ok::<_, BackendError>(stamp)
        }
        .await;

        match saved {
            Ok(stamp) => {
                self.overlays.acknowledge(&ticket, stamp);
                self.save_status(SaveStatus::Saved);
                Ok(stamp)
            }
            Err(err) => {
                tracing::warn!(work = %work_id, chapter = %chapter.id(), error = %err, "chapter commit failed");
                self.overlays.fail(&ticket);
                self.save_status(SaveStatus::Failed);
                self.notify(Notice::SaveFailed);
                Err(err.into())
            }
        }
    }

    /// Swaps the `order` values of the chapters at two list positions with two backend
    /// writes. The local list only changes with the next snapshot.
    ///
    /// Returns false without touching the backend for equal or stale indices.
    pub async fn reorder_chapters(
        &mut self,
        from_index: usize,
        to_index: usize,
    ) -> Result<bool, ReconcileError> {
        if from_index == to_index {
            return Ok(false);
        }
        let work_id = self.work_id.clone().ok_or(ReconcileError::NoWork)?;
        let (Some(first), Some(second)) =
            (self.chapters.get(from_index), self.chapters.get(to_index))
        else {
            return Ok(false);
        };
        let (first_id, first_order) = (first.id().clone(), first.order());
        let (second_id, second_order) = (second.id().clone(), second.order());

        let first_write =
            self.backend.update_chapter(&work_id, &first_id, &ChapterPatch::order(second_order)).await;
        let second_write =
            self.backend.update_chapter(&work_id, &second_id, &ChapterPatch::order(first_order)).await;

        match first_write.and(second_write) {
            Ok(_) => {
                tracing::debug!(from = %first_id, to = %second_id, "chapter orders swapped");
                Ok(true)
            }
            Err(err) => {
                tracing::warn!(work = %work_id, error = %err, "chapter reorder failed");
                self.notify(Notice::ReorderFailed);
                Err(err.into())
            }
        }
    }

    /// Deletes `id` after `confirm` approves it. Returns false for an unknown id or a
    /// declined confirmation.
    pub async fn delete_chapter(
        &mut self,
        id: &ChapterId,
        confirm: impl FnOnce(&Chapter) -> bool,
    ) -> Result<bool, ReconcileError> {
        let work_id = self.work_id.clone().ok_or(ReconcileError::NoWork)?;
        let Some(chapter) = self.find(id) else {
            return Ok(false);
        };
        if !confirm(chapter) {
            return Ok(false);
        }

        if let Err(err) = self.backend.delete_chapter(&work_id, id).await {
            tracing::warn!(work = %work_id, chapter = %id, error = %err, "chapter delete failed");
            self.notify(Notice::ChapterDeleteFailed);
            return Err(err.into());
        }

        tracing::info!(work = %work_id, chapter = %id, "chapter deleted");
        self.overlays.forget_chapter(id);
        if self.current_chapter_id.as_ref() == Some(id) {
            self.current_chapter_id = None;
            self.render();
        }
        Ok(true)
    }

    pub fn toggle_delete_mode(&mut self) -> bool {
        self.delete_mode = !self.delete_mode;
        self.render();
        self.delete_mode
    }
}
