// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Genkou-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Genkou and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Scripted backend for reconciler and memo board tests.
//!
//! Records every call, hands out predictable ids (`w1`.. / `c1`.. / `m1`..), and never
//! publishes snapshots on its own: tests push them explicitly to model arbitrary delivery
//! order.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{TimeDelta, TimeZone, Utc};
use tokio::sync::watch;

use super::{Backend, BackendError, Subscription};
use crate::model::{
    Chapter, ChapterId, ChapterPatch, DailyProgress, HistoryEntry, Memo, MemoId, Timestamp,
    UserId, Work, WorkDraft, WorkId, WorkPatch,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    CreateWork { owner: UserId, draft: WorkDraft },
    UpdateWork { work: WorkId, patch: WorkPatch },
    DeleteWork { work: WorkId },
    ToggleWorkPin { work: WorkId, currently_pinned: bool },
    CreateChapter { work: WorkId, order: i64, content: String },
    UpdateChapter { work: WorkId, chapter: ChapterId, patch: ChapterPatch },
    DeleteChapter { work: WorkId, chapter: ChapterId },
    IncrementProgress { user: UserId, amount: i64 },
    SaveHistory { work: WorkId, chapter: ChapterId, content: String },
    CreateMemo { work: WorkId, title: String, content: String, order: i64 },
    UpdateMemo { work: WorkId, memo: MemoId, title: String, content: String },
    SwapMemoOrder { work: WorkId, first: MemoId, first_order: i64, second: MemoId, second_order: i64 },
    DeleteMemo { work: WorkId, memo: MemoId },
}

#[derive(Debug)]
struct RecordingState {
    calls: Vec<Call>,
    next_work: u32,
    next_chapter: u32,
    next_memo: u32,
    ticks: i64,
    fail_writes: bool,
    subscribed: Vec<WorkId>,
    history: Vec<HistoryEntry>,
    work_tx: watch::Sender<Vec<Work>>,
    chapter_tx: watch::Sender<Vec<Chapter>>,
    memo_tx: watch::Sender<Vec<Memo>>,
}

#[derive(Debug, Clone)]
pub(crate) struct RecordingBackend {
    inner: Arc<Mutex<RecordingState>>,
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingBackend {
    pub(crate) fn new() -> Self {
        let (work_tx, _) = watch::channel(Vec::new());
        let (chapter_tx, _) = watch::channel(Vec::new());
        let (memo_tx, _) = watch::channel(Vec::new());
        let state = RecordingState {
            calls: Vec::new(),
            next_work: 1,
            next_chapter: 1,
            next_memo: 1,
            ticks: 0,
            fail_writes: false,
            subscribed: Vec::new(),
            history: Vec::new(),
            work_tx,
            chapter_tx,
            memo_tx,
        };
        Self { inner: Arc::new(Mutex::new(state)) }
    }

    fn state(&self) -> MutexGuard<'_, RecordingState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fixed clock origin; the n-th write is stamped `epoch() + n` seconds.
    pub(crate) fn epoch() -> Timestamp {
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).single().unwrap_or_default()
    }

    pub(crate) fn stamp(tick: i64) -> Timestamp {
        Self::epoch() + TimeDelta::seconds(tick)
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    pub(crate) fn clear_calls(&self) {
        self.state().calls.clear();
    }

    pub(crate) fn set_fail_writes(&self, fail: bool) {
        self.state().fail_writes = fail;
    }

    pub(crate) fn subscribed_works(&self) -> Vec<WorkId> {
        self.state().subscribed.clone()
    }

    pub(crate) fn work_subscribers(&self) -> usize {
        self.state().work_tx.receiver_count()
    }

    pub(crate) fn push_works(&self, works: Vec<Work>) {
        self.state().work_tx.send_replace(works);
    }

    pub(crate) fn chapter_subscribers(&self) -> usize {
        self.state().chapter_tx.receiver_count()
    }

    pub(crate) fn memo_subscribers(&self) -> usize {
        self.state().memo_tx.receiver_count()
    }

    pub(crate) fn push_chapters(&self, chapters: Vec<Chapter>) {
        self.state().chapter_tx.send_replace(chapters);
    }

    pub(crate) fn push_memos(&self, memos: Vec<Memo>) {
        self.state().memo_tx.send_replace(memos);
    }

    fn write(&self, call: Call) -> Result<Timestamp, BackendError> {
        let mut state = self.state();
        state.calls.push(call);
        if state.fail_writes {
            return Err(BackendError::Unavailable { reason: "offline".to_owned() });
        }
        state.ticks += 1;
        Ok(Self::stamp(state.ticks))
    }
}

impl Backend for RecordingBackend {
    fn subscribe_works(&self, _owner: &UserId) -> Result<Subscription<Vec<Work>>, BackendError> {
        Ok(Subscription::new("works", self.state().work_tx.subscribe()))
    }

    async fn create_work(
        &self,
        owner: &UserId,
        draft: &WorkDraft,
    ) -> Result<WorkId, BackendError> {
        self.write(Call::CreateWork { owner: owner.clone(), draft: draft.clone() })?;
        let mut state = self.state();
        let id = format!("w{}", state.next_work);
        state.next_work += 1;
        WorkId::new(id).map_err(|err| BackendError::Unavailable { reason: err.to_string() })
    }

    async fn update_work(
        &self,
        work_id: &WorkId,
        patch: &WorkPatch,
    ) -> Result<Timestamp, BackendError> {
        self.write(Call::UpdateWork { work: work_id.clone(), patch: patch.clone() })
    }

    async fn delete_work(&self, work_id: &WorkId) -> Result<(), BackendError> {
        self.write(Call::DeleteWork { work: work_id.clone() })?;
        Ok(())
    }

    async fn toggle_work_pin(
        &self,
        work_id: &WorkId,
        currently_pinned: bool,
    ) -> Result<(), BackendError> {
        self.write(Call::ToggleWorkPin { work: work_id.clone(), currently_pinned })?;
        Ok(())
    }

    fn subscribe_chapters(
        &self,
        work_id: &WorkId,
    ) -> Result<Subscription<Vec<Chapter>>, BackendError> {
        let mut state = self.state();
        state.subscribed.push(work_id.clone());
        Ok(Subscription::new("chapters", state.chapter_tx.subscribe()))
    }

    async fn create_chapter(
        &self,
        work_id: &WorkId,
        order: i64,
        initial_content: &str,
    ) -> Result<ChapterId, BackendError> {
        self.write(Call::CreateChapter {
            work: work_id.clone(),
            order,
            content: initial_content.to_owned(),
        })?;
        let mut state = self.state();
        let id = format!("c{}", state.next_chapter);
        state.next_chapter += 1;
        ChapterId::new(id).map_err(|err| BackendError::Unavailable { reason: err.to_string() })
    }

    async fn update_chapter(
        &self,
        work_id: &WorkId,
        chapter_id: &ChapterId,
        patch: &ChapterPatch,
    ) -> Result<Timestamp, BackendError> {
        self.write(Call::UpdateChapter {
            work: work_id.clone(),
            chapter: chapter_id.clone(),
            patch: patch.clone(),
        })
    }

    async fn delete_chapter(
        &self,
        work_id: &WorkId,
        chapter_id: &ChapterId,
    ) -> Result<(), BackendError> {
        self.write(Call::DeleteChapter { work: work_id.clone(), chapter: chapter_id.clone() })?;
        Ok(())
    }

    async fn increment_daily_progress(
        &self,
        user_id: &UserId,
        amount: i64,
    ) -> Result<(), BackendError> {
        self.write(Call::IncrementProgress { user: user_id.clone(), amount })?;
        Ok(())
    }

    async fn recent_daily_progress(
        &self,
        user_id: &UserId,
        days: usize,
    ) -> Result<Vec<DailyProgress>, BackendError> {
        let total = self
            .state()
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::IncrementProgress { user, amount } if user == user_id => Some(*amount),
                _ => None,
            })
            .sum::<i64>();
        if days == 0 || total == 0 {
            return Ok(Vec::new());
        }
        Ok(vec![DailyProgress { date: Self::epoch().date_naive(), count: total }])
    }

    async fn save_history_backup(
        &self,
        work_id: &WorkId,
        chapter_id: &ChapterId,
        content: &str,
    ) -> Result<(), BackendError> {
        let timestamp = self.write(Call::SaveHistory {
            work: work_id.clone(),
            chapter: chapter_id.clone(),
            content: content.to_owned(),
        })?;
        self.state().history.push(HistoryEntry { content: content.to_owned(), timestamp });
        Ok(())
    }

    async fn list_history(
        &self,
        _work_id: &WorkId,
        _chapter_id: &ChapterId,
    ) -> Result<Vec<HistoryEntry>, BackendError> {
        let mut history = self.state().history.clone();
        history.reverse();
        Ok(history)
    }

    fn subscribe_memos(&self, work_id: &WorkId) -> Result<Subscription<Vec<Memo>>, BackendError> {
        let mut state = self.state();
        state.subscribed.push(work_id.clone());
        Ok(Subscription::new("memos", state.memo_tx.subscribe()))
    }

    async fn create_memo(
        &self,
        work_id: &WorkId,
        title: &str,
        content: &str,
        order: i64,
    ) -> Result<MemoId, BackendError> {
        self.write(Call::CreateMemo {
            work: work_id.clone(),
            title: title.to_owned(),
            content: content.to_owned(),
            order,
        })?;
        let mut state = self.state();
        let id = format!("m{}", state.next_memo);
        state.next_memo += 1;
        MemoId::new(id).map_err(|err| BackendError::Unavailable { reason: err.to_string() })
    }

    async fn update_memo(
        &self,
        work_id: &WorkId,
        memo_id: &MemoId,
        title: &str,
        content: &str,
    ) -> Result<Timestamp, BackendError> {
        self.write(Call::UpdateMemo {
            work: work_id.clone(),
            memo: memo_id.clone(),
            title: title.to_owned(),
            content: content.to_owned(),
        })
    }

    async fn swap_memo_order(
        &self,
        work_id: &WorkId,
        first: &MemoId,
        first_order: i64,
        second: &MemoId,
        second_order: i64,
    ) -> Result<(), BackendError> {
        self.write(Call::SwapMemoOrder {
            work: work_id.clone(),
            first: first.clone(),
            first_order,
            second: second.clone(),
            second_order,
        })?;
        Ok(())
    }

    async fn delete_memo(&self, work_id: &WorkId, memo_id: &MemoId) -> Result<(), BackendError> {
        self.write(Call::DeleteMemo { work: work_id.clone(), memo: memo_id.clone() })?;
        Ok(())
    }
}
