// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Genkou-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Genkou and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! In-process backend with live snapshot channels.
//!
//! State lives in memory; with a [`WorkFolder`] attached, every accepted write is persisted
//! before it is published, and works are loaded lazily on first access.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{NaiveDate, SubsecRound, TimeDelta, Utc};
use tokio::sync::watch;

use super::{Backend, BackendError, DocumentKind, Subscription};
use crate::model::{
    sort_works, Chapter, ChapterId, ChapterPatch, DailyProgress, HistoryEntry, Memo, MemoId,
    Timestamp, UserId, Work, WorkDraft, WorkId, WorkPatch, WorkSort,
};
use crate::store::WorkFolder;

#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    inner: Arc<Mutex<MemoryState>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    folder: Option<WorkFolder>,
    catalog: Option<BTreeMap<WorkId, Work>>,
    shelves: HashMap<UserId, watch::Sender<Vec<Work>>>,
    works: HashMap<WorkId, WorkDocs>,
    progress: HashMap<UserId, BTreeMap<NaiveDate, i64>>,
    last_stamp: Option<Timestamp>,
}

#[derive(Debug)]
struct WorkDocs {
    chapters: Vec<Chapter>,
    memos: Vec<Memo>,
    history: HashMap<ChapterId, Vec<HistoryEntry>>,
    chapter_tx: watch::Sender<Vec<Chapter>>,
    memo_tx: watch::Sender<Vec<Memo>>,
}

impl WorkDocs {
    fn new(chapters: Vec<Chapter>, memos: Vec<Memo>) -> Self {
        let (chapter_tx, _) = watch::channel(sorted_chapters(&chapters));
        let (memo_tx, _) = watch::channel(sorted_memos(&memos));
        Self { chapters, memos, history: HashMap::new(), chapter_tx, memo_tx }
    }

    fn publish_chapters(&self) {
        self.chapter_tx.send_replace(sorted_chapters(&self.chapters));
    }

    fn publish_memos(&self) {
        self.memo_tx.send_replace(sorted_memos(&self.memos));
    }

    fn chapter_index(&self, chapter_id: &ChapterId) -> Result<usize, BackendError> {
        self.chapters.iter().position(|c| c.id() == chapter_id).ok_or_else(|| {
            BackendError::NotFound { kind: DocumentKind::Chapter, id: chapter_id.to_string() }
        })
    }

    fn memo_index(&self, memo_id: &MemoId) -> Result<usize, BackendError> {
        self.memos.iter().position(|m| m.id() == memo_id).ok_or_else(|| BackendError::NotFound {
            kind: DocumentKind::Memo,
            id: memo_id.to_string(),
        })
    }
}

/// Stable sort, so equal orders keep document (creation) order.
fn sorted_chapters(chapters: &[Chapter]) -> Vec<Chapter> {
    let mut sorted = chapters.to_vec();
    sorted.sort_by_key(Chapter::order);
    sorted
}

fn owned_works(catalog: &BTreeMap<WorkId, Work>, owner: &UserId) -> Vec<Work> {
    let mut works =
        catalog.values().filter(|work| work.owner() == owner).cloned().collect::<Vec<_>>();
    sort_works(&mut works, WorkSort::UpdatedAt);
    works
}

fn work_not_found(work_id: &WorkId) -> BackendError {
    BackendError::NotFound { kind: DocumentKind::Work, id: work_id.to_string() }
}

fn sorted_memos(memos: &[Memo]) -> Vec<Memo> {
    let mut sorted = memos.to_vec();
    sorted.sort_by_key(Memo::order);
    sorted
}

impl MemoryState {
    /// Server clock: microsecond resolution, strictly increasing.
    fn next_stamp(&mut self) -> Timestamp {
        let now = Utc::now().trunc_subsecs(6);
        let stamp = match self.last_stamp {
            Some(last) if now <= last => last + TimeDelta::microseconds(1),
            _ => now,
        };
        self.last_stamp = Some(stamp);
        stamp
    }

    fn next_id(&mut self, prefix: char) -> String {
        let stamp = self.next_stamp();
        format!("{prefix}{:x}", stamp.timestamp_micros())
    }

    fn catalog_mut(&mut self) -> Result<&mut BTreeMap<WorkId, Work>, BackendError> {
        if self.catalog.is_none() {
            let works = match &self.folder {
                Some(folder) => folder.list_works()?,
                None => Vec::new(),
            };
            tracing::debug!(works = works.len(), "work catalog loaded");
            self.catalog = Some(works.into_iter().map(|work| (work.id().clone(), work)).collect());
        }
        self.catalog.as_mut().ok_or_else(|| BackendError::Unavailable {
            reason: "work catalog could not be loaded".to_owned(),
        })
    }

    fn publish_works(&mut self, owner: &UserId) -> Result<(), BackendError> {
        let works = owned_works(self.catalog_mut()?, owner);
        if let Some(tx) = self.shelves.get(owner) {
            tx.send_replace(works);
        }
        Ok(())
    }

    /// Persists `work` and replaces its catalog entry.
    fn commit_work(&mut self, work: Work) -> Result<(), BackendError> {
        if let Some(folder) = &self.folder {
            folder.save_work(&work)?;
        }
        let owner = work.owner().clone();
        self.catalog_mut()?.insert(work.id().clone(), work);
        self.publish_works(&owner)
    }

    fn work_mut(&mut self, work_id: &WorkId) -> Result<&mut WorkDocs, BackendError> {
        if !self.works.contains_key(work_id) {
            let (chapters, memos) = match &self.folder {
                Some(folder) => (folder.load_chapters(work_id)?, folder.load_memos(work_id)?),
                None => (Vec::new(), Vec::new()),
            };
            tracing::debug!(work = %work_id, chapters = chapters.len(), "work loaded");
            self.works.insert(work_id.clone(), WorkDocs::new(chapters, memos));
        }
        self.works.get_mut(work_id).ok_or_else(|| BackendError::Unavailable {
            reason: format!("work {work_id} could not be loaded"),
        })
    }

    fn history_mut(
        &mut self,
        work_id: &WorkId,
        chapter_id: &ChapterId,
    ) -> Result<&mut Vec<HistoryEntry>, BackendError> {
        let cached = self.work_mut(work_id)?.history.contains_key(chapter_id);
        let loaded = match &self.folder {
            Some(folder) if !cached => folder.load_history(work_id, chapter_id)?,
            _ => Vec::new(),
        };
        let docs = self.work_mut(work_id)?;
        Ok(docs.history.entry(chapter_id.clone()).or_insert(loaded))
    }

    fn ledger_mut(&mut self, user_id: &UserId) -> Result<&mut BTreeMap<NaiveDate, i64>, BackendError> {
        if !self.progress.contains_key(user_id) {
            let days = match &self.folder {
                Some(folder) => folder.load_progress(user_id)?,
                None => Vec::new(),
            };
            let ledger = days.into_iter().map(|day| (day.date, day.count)).collect();
            self.progress.insert(user_id.clone(), ledger);
        }
        self.progress.get_mut(user_id).ok_or_else(|| BackendError::Unavailable {
            reason: format!("progress ledger for {user_id} could not be loaded"),
        })
    }

    fn persist_chapters(&self, work_id: &WorkId, chapters: &[Chapter]) -> Result<(), BackendError> {
        if let Some(folder) = &self.folder {
            folder.save_chapters(work_id, chapters)?;
        }
        Ok(())
    }

    fn persist_memos(&self, work_id: &WorkId, memos: &[Memo]) -> Result<(), BackendError> {
        if let Some(folder) = &self.folder {
            folder.save_memos(work_id, memos)?;
        }
        Ok(())
    }
}

fn ledger_to_days(ledger: &BTreeMap<NaiveDate, i64>) -> Vec<DailyProgress> {
    ledger.iter().map(|(&date, &count)| DailyProgress { date, count }).collect()
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backs the in-memory state with a work folder.
    pub fn with_folder(folder: WorkFolder) -> Self {
        let state = MemoryState { folder: Some(folder), ..MemoryState::default() };
        Self { inner: Arc::new(Mutex::new(state)) }
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Works owned by `owner`, pinned first, then most recently updated.
    pub fn works(&self, owner: &UserId) -> Result<Vec<Work>, BackendError> {
        let mut state = self.state();
        Ok(owned_works(state.catalog_mut()?, owner))
    }

    /// Current chapters of a work, in display order.
    pub fn chapters(&self, work_id: &WorkId) -> Result<Vec<Chapter>, BackendError> {
        let mut state = self.state();
        Ok(sorted_chapters(&state.work_mut(work_id)?.chapters))
    }

    /// Current memos of a work, in display order.
    pub fn memos(&self, work_id: &WorkId) -> Result<Vec<Memo>, BackendError> {
        let mut state = self.state();
        Ok(sorted_memos(&state.work_mut(work_id)?.memos))
    }

    /// Number of live chapter subscriptions on a work.
    pub fn chapter_subscriber_count(&self, work_id: &WorkId) -> usize {
        self.state().works.get(work_id).map_or(0, |docs| docs.chapter_tx.receiver_count())
    }

    /// Number of live memo subscriptions on a work.
    pub fn memo_subscriber_count(&self, work_id: &WorkId) -> usize {
        self.state().works.get(work_id).map_or(0, |docs| docs.memo_tx.receiver_count())
    }
}

impl Backend for MemoryBackend {
    fn subscribe_works(&self, owner: &UserId) -> Result<Subscription<Vec<Work>>, BackendError> {
        let mut state = self.state();
        let works = owned_works(state.catalog_mut()?, owner);
        let tx = state.shelves.entry(owner.clone()).or_insert_with(|| watch::channel(works).0);
        Ok(Subscription::new("works", tx.subscribe()))
    }

    async fn create_work(
        &self,
        owner: &UserId,
        draft: &WorkDraft,
    ) -> Result<WorkId, BackendError> {
        let mut state = self.state();
        let raw_id = state.next_id('w');
        let stamp = state.next_stamp();
        let work_id = WorkId::new(raw_id).map_err(|err| BackendError::Unavailable {
            reason: format!("generated work id is invalid: {err}"),
        })?;
        let work =
            Work::new(work_id.clone(), owner.clone(), draft.clone()).with_timestamps(stamp, stamp);
        state.commit_work(work)?;
        tracing::info!(work = %work_id, owner = %owner, "work created");
        Ok(work_id)
    }

    async fn update_work(
        &self,
        work_id: &WorkId,
        patch: &WorkPatch,
    ) -> Result<Timestamp, BackendError> {
        let mut state = self.state();
        let stamp = state.next_stamp();
        let mut work =
            state.catalog_mut()?.get(work_id).cloned().ok_or_else(|| work_not_found(work_id))?;
        work.apply_patch(patch);
        work.set_updated_at(Some(stamp));
        state.commit_work(work)?;
        Ok(stamp)
    }

    async fn delete_work(&self, work_id: &WorkId) -> Result<(), BackendError> {
        let mut state = self.state();
        let owner = state.catalog_mut()?.get(work_id).map(|work| work.owner().clone());
        if let Some(folder) = &state.folder {
            folder.remove_work(work_id)?;
        }
        state.catalog_mut()?.remove(work_id);
        // Dropping the documents closes every live chapter and memo subscription on the work.
        state.works.remove(work_id);
        if let Some(owner) = owner {
            state.publish_works(&owner)?;
        }
        tracing::info!(work = %work_id, "work deleted");
        Ok(())
    }

    async fn toggle_work_pin(
        &self,
        work_id: &WorkId,
        currently_pinned: bool,
    ) -> Result<(), BackendError> {
        let mut state = self.state();
        let mut work =
            state.catalog_mut()?.get(work_id).cloned().ok_or_else(|| work_not_found(work_id))?;
        work.set_pinned(!currently_pinned);
        state.commit_work(work)
    }

    fn subscribe_chapters(
        &self,
        work_id: &WorkId,
    ) -> Result<Subscription<Vec<Chapter>>, BackendError> {
        let mut state = self.state();
        let docs = state.work_mut(work_id)?;
        Ok(Subscription::new("chapters", docs.chapter_tx.subscribe()))
    }

    async fn create_chapter(
        &self,
        work_id: &WorkId,
        order: i64,
        initial_content: &str,
    ) -> Result<ChapterId, BackendError> {
        let mut state = self.state();
        let raw_id = state.next_id('c');
        let stamp = state.next_stamp();
        let chapter_id = ChapterId::new(raw_id).map_err(|err| BackendError::Unavailable {
            reason: format!("generated chapter id is invalid: {err}"),
        })?;
        let chapter =
            Chapter::new(chapter_id.clone(), Chapter::default_title(order), initial_content, order)
                .with_updated_at(stamp);

        let mut chapters = state.work_mut(work_id)?.chapters.clone();
        chapters.push(chapter);
        state.persist_chapters(work_id, &chapters)?;

        let docs = state.work_mut(work_id)?;
        docs.chapters = chapters;
        docs.publish_chapters();
        tracing::info!(work = %work_id, chapter = %chapter_id, order, "chapter created");
        Ok(chapter_id)
    }

    async fn update_chapter(
        &self,
        work_id: &WorkId,
        chapter_id: &ChapterId,
        patch: &ChapterPatch,
    ) -> Result<Timestamp, BackendError> {
        let mut state = self.state();
        let stamp = state.next_stamp();

        let docs = state.work_mut(work_id)?;
        let index = docs.chapter_index(chapter_id)?;
        let mut chapters = docs.chapters.clone();
        chapters[index].apply_patch(patch);
        chapters[index].set_updated_at(Some(stamp));
        state.persist_chapters(work_id, &chapters)?;

        let docs = state.work_mut(work_id)?;
        docs.chapters = chapters;
        docs.publish_chapters();
        Ok(stamp)
    }

    async fn delete_chapter(
        &self,
        work_id: &WorkId,
        chapter_id: &ChapterId,
    ) -> Result<(), BackendError> {
        let mut state = self.state();
        let docs = state.work_mut(work_id)?;
        let Ok(index) = docs.chapter_index(chapter_id) else {
            return Ok(());
        };
        let mut chapters = docs.chapters.clone();
        chapters.remove(index);
        state.persist_chapters(work_id, &chapters)?;
        if let Some(folder) = &state.folder {
            folder.remove_history(work_id, chapter_id)?;
        }

        let docs = state.work_mut(work_id)?;
        docs.chapters = chapters;
        docs.history.remove(chapter_id);
        docs.publish_chapters();
        tracing::info!(work = %work_id, chapter = %chapter_id, "chapter deleted");
        Ok(())
    }

    async fn increment_daily_progress(
        &self,
        user_id: &UserId,
        amount: i64,
    ) -> Result<(), BackendError> {
        if amount == 0 {
            return Ok(());
        }
        let today = chrono::Local::now().date_naive();

        let mut state = self.state();
        let mut ledger = state.ledger_mut(user_id)?.clone();
        *ledger.entry(today).or_insert(0) += amount;
        if let Some(folder) = &state.folder {
            folder.save_progress(user_id, &ledger_to_days(&ledger))?;
        }
        *state.ledger_mut(user_id)? = ledger;
        tracing::debug!(user = %user_id, amount, %today, "daily progress incremented");
        Ok(())
    }

    async fn recent_daily_progress(
        &self,
        user_id: &UserId,
        days: usize,
    ) -> Result<Vec<DailyProgress>, BackendError> {
        let mut state = self.state();
        let ledger = state.ledger_mut(user_id)?;
        let mut recent = ledger
            .iter()
            .rev()
            .take(days)
            .map(|(&date, &count)| DailyProgress { date, count })
            .collect::<Vec<_>>();
        recent.reverse();
        Ok(recent)
    }

    async fn save_history_backup(
        &self,
        work_id: &WorkId,
        chapter_id: &ChapterId,
        content: &str,
    ) -> Result<(), BackendError> {
        let mut state = self.state();
        let timestamp = state.next_stamp();
        let mut entries = state.history_mut(work_id, chapter_id)?.clone();
        entries.push(HistoryEntry { content: content.to_owned(), timestamp });
        if let Some(folder) = &state.folder {
            folder.save_history(work_id, chapter_id, &entries)?;
        }
        *state.history_mut(work_id, chapter_id)? = entries;
        Ok(())
    }

    async fn list_history(
        &self,
        work_id: &WorkId,
        chapter_id: &ChapterId,
    ) -> Result<Vec<HistoryEntry>, BackendError> {
        let mut state = self.state();
        let mut entries = state.history_mut(work_id, chapter_id)?.clone();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(entries)
    }

    fn subscribe_memos(&self, work_id: &WorkId) -> Result<Subscription<Vec<Memo>>, BackendError> {
        let mut state = self.state();
        let docs = state.work_mut(work_id)?;
        Ok(Subscription::new("memos", docs.memo_tx.subscribe()))
    }

    async fn create_memo(
        &self,
        work_id: &WorkId,
        title: &str,
        content: &str,
        order: i64,
    ) -> Result<MemoId, BackendError> {
        let mut state = self.state();
        let raw_id = state.next_id('m');
        let stamp = state.next_stamp();
        let memo_id = MemoId::new(raw_id).map_err(|err| BackendError::Unavailable {
            reason: format!("generated memo id is invalid: {err}"),
        })?;
        let memo = Memo::new(memo_id.clone(), title, content, order).with_timestamps(stamp, stamp);

        let mut memos = state.work_mut(work_id)?.memos.clone();
        memos.push(memo);
        state.persist_memos(work_id, &memos)?;

        let docs = state.work_mut(work_id)?;
        docs.memos = memos;
        docs.publish_memos();
        Ok(memo_id)
    }

    async fn update_memo(
        &self,
        work_id: &WorkId,
        memo_id: &MemoId,
        title: &str,
        content: &str,
    ) -> Result<Timestamp, BackendError> {
        let mut state = self.state();
        let stamp = state.next_stamp();

        let docs = state.work_mut(work_id)?;
        let index = docs.memo_index(memo_id)?;
        let mut memos = docs.memos.clone();
        memos[index].set_title(title);
        memos[index].set_content(content);
        memos[index].set_updated_at(Some(stamp));
        state.persist_memos(work_id, &memos)?;

        let docs = state.work_mut(work_id)?;
        docs.memos = memos;
        docs.publish_memos();
        Ok(stamp)
    }

    async fn swap_memo_order(
        &self,
        work_id: &WorkId,
        first: &MemoId,
        first_order: i64,
        second: &MemoId,
        second_order: i64,
    ) -> Result<(), BackendError> {
        let mut state = self.state();
        let stamp = state.next_stamp();

        let docs = state.work_mut(work_id)?;
        let first_index = docs.memo_index(first)?;
        let second_index = docs.memo_index(second)?;
        let mut memos = docs.memos.clone();
        memos[first_index].set_order(second_order);
        memos[first_index].set_updated_at(Some(stamp));
        memos[second_index].set_order(first_order);
        memos[second_index].set_updated_at(Some(stamp));
        state.persist_memos(work_id, &memos)?;

        let docs = state.work_mut(work_id)?;
        docs.memos = memos;
        docs.publish_memos();
        Ok(())
    }

    async fn delete_memo(&self, work_id: &WorkId, memo_id: &MemoId) -> Result<(), BackendError> {
        let mut state = self.state();
        let docs = state.work_mut(work_id)?;
        let Ok(index) = docs.memo_index(memo_id) else {
            return Ok(());
        };
        let mut memos = docs.memos.clone();
        memos.remove(index);
        state.persist_memos(work_id, &memos)?;

        let docs = state.work_mut(work_id)?;
        docs.memos = memos;
        docs.publish_memos();
        Ok(())
    }
}

#[cfg(test)]
mod tests;
