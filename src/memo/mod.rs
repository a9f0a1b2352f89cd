// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Genkou-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Genkou and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Memo board: free-form notes attached to a work, ordered by an explicit key.

use std::sync::Arc;

use chrono::Utc;

use crate::backend::{Backend, BackendError};
use crate::model::{memo_title_or_untitled, Memo, MemoId, Timestamp, WorkId, NEW_MEMO_TITLE};
use crate::workspace::event::{emit, EventSender, Notice, WorkspaceEvent};

#[derive(Debug, thiserror::Error)]
pub enum MemoError {
    #[error("no work is bound")]
    NoWork,
    #[error(transparent)]
    Backend(#[from] BackendError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoRow {
    pub id: MemoId,
    pub title: String,
    pub can_move_up: bool,
    pub can_move_down: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoListView {
    pub rows: Vec<MemoRow>,
}

impl MemoListView {
    pub fn build(memos: &[Memo]) -> Self {
        let last = memos.len().saturating_sub(1);
        let rows = memos
            .iter()
            .enumerate()
            .map(|(index, memo)| MemoRow {
                id: memo.id().clone(),
                title: memo.title().to_owned(),
                can_move_up: index > 0,
                can_move_down: index < last,
            })
            .collect();
        Self { rows }
    }
}

pub struct MemoBoard<B> {
    backend: Arc<B>,
    events: EventSender,
    work_id: Option<WorkId>,
    memos: Vec<Memo>,
}

impl<B: Backend> MemoBoard<B> {
    pub fn new(backend: Arc<B>, events: EventSender) -> Self {
        Self { backend, events, work_id: None, memos: Vec::new() }
    }

    pub fn set_work_id(&mut self, work_id: WorkId) {
        self.work_id = Some(work_id);
    }

    pub fn unbind(&mut self) {
        self.work_id = None;
    }

    pub fn reset(&mut self) {
        self.memos.clear();
        self.render();
    }

    pub fn memos(&self) -> &[Memo] {
        &self.memos
    }

    pub fn view(&self) -> MemoListView {
        MemoListView::build(&self.memos)
    }

    fn render(&self) {
        emit(&self.events, WorkspaceEvent::MemosRendered(self.view()));
    }

    fn work(&self) -> Result<WorkId, MemoError> {
        self.work_id.clone().ok_or(MemoError::NoWork)
    }

    /// Replaces the board with a snapshot, ascending by order with ties kept stable.
    pub fn set_memos(&mut self, snapshot: Vec<Memo>) {
        let mut snapshot = snapshot;
        snapshot.sort_by_key(Memo::order);
        self.memos = snapshot;
        self.render();
    }

    /// Creates a memo ordered after every existing one by creation time.
    pub async fn create_memo(&mut self, title: &str, content: &str) -> Result<MemoId, MemoError> {
        let work_id = self.work()?;
        let title = if title.trim().is_empty() { NEW_MEMO_TITLE } else { title.trim() };
        let order = Utc::now().timestamp_millis();

        match self.backend.create_memo(&work_id, title, content, order).await {
            Ok(id) => {
                tracing::info!(work = %work_id, memo = %id, "memo created");
                Ok(id)
            }
            Err(err) => {
                tracing::warn!(work = %work_id, error = %err, "memo create failed");
                emit(&self.events, WorkspaceEvent::Notice(Notice::MemoSaveFailed));
                Err(err.into())
            }
        }
    }

    pub async fn update_memo(
        &mut self,
        id: &MemoId,
        title: &str,
        content: &str,
    ) -> Result<Timestamp, MemoError> {
        let work_id = self.work()?;
        let title = memo_title_or_untitled(title);

        match self.backend.update_memo(&work_id, id, &title, content).await {
            Ok(stamp) => Ok(stamp),
            Err(err) => {
                tracing::warn!(work = %work_id, memo = %id, error = %err, "memo save failed");
                emit(&self.events, WorkspaceEvent::Notice(Notice::MemoSaveFailed));
                Err(err.into())
            }
        }
    }

    /// Deletes `id` after `confirm` approves it. Returns false for an unknown id or a
    /// declined confirmation.
    pub async fn delete_memo(
        &mut self,
        id: &MemoId,
        confirm: impl FnOnce(&Memo) -> bool,
    ) -> Result<bool, MemoError> {
        let work_id = self.work()?;
        let Some(memo) = self.memos.iter().find(|memo| memo.id() == id) else {
            return Ok(false);
        };
        if !confirm(memo) {
            return Ok(false);
        }

        match self.backend.delete_memo(&work_id, id).await {
            Ok(()) => {
                tracing::info!(work = %work_id, memo = %id, "memo deleted");
                Ok(true)
            }
            Err(err) => {
                tracing::warn!(work = %work_id, memo = %id, error = %err, "memo delete failed");
                emit(&self.events, WorkspaceEvent::Notice(Notice::MemoDeleteFailed));
                Err(err.into())
            }
        }
    }

    pub async fn move_memo_up(&mut self, index: usize) -> Result<bool, MemoError> {
        match index.checked_sub(1) {
            Some(above) => self.swap(index, above).await,
            None => Ok(false),
        }
    }

    pub async fn move_memo_down(&mut self, index: usize) -> Result<bool, MemoError> {
        match index.checked_add(1) {
            Some(below) => self.swap(index, below).await,
            None => Ok(false),
        }
    }

    async fn swap(&mut self, index: usize, neighbor: usize) -> Result<bool, MemoError> {
        let work_id = self.work()?;
        let (Some(memo), Some(other)) = (self.memos.get(index), self.memos.get(neighbor)) else {
            return Ok(false);
        };
        self.backend
            .swap_memo_order(&work_id, memo.id(), memo.order(), other.id(), other.order())
            .await
            .map_err(|err| {
                tracing::warn!(work = %work_id, error = %err, "memo reorder failed");
                emit(&self.events, WorkspaceEvent::Notice(Notice::MemoSaveFailed));
                MemoError::from(err)
            })?;
        Ok(true)
    }
}
