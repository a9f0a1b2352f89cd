// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Genkou-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Genkou and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! One open work: its live subscriptions, the chapter reconciler, and the memo board.
//!
//! Opening subscribes; closing, switching works, or dropping the workspace unsubscribes, so
//! a stale subscription can never reconcile into a session bound to another work.

use std::sync::Arc;

use crate::backend::{AuthProvider, Backend, BackendError, Subscription};
use crate::config::EditorConfig;
use crate::memo::MemoBoard;
use crate::model::{
    Chapter, ChapterId, ChapterPatch, DailyProgress, HistoryEntry, Memo, Timestamp, WorkId,
};
use crate::reconcile::{ChapterReconciler, ReconcileError};

pub mod event;

pub use event::{event_channel, EventReceiver, EventSender, Notice, SaveStatus, WorkspaceEvent};

type Subscriptions = (Subscription<Vec<Chapter>>, Subscription<Vec<Memo>>);

enum Delivery {
    Chapters(Option<Vec<Chapter>>),
    Memos(Option<Vec<Memo>>),
}

pub struct Workspace<B> {
    backend: Arc<B>,
    auth: Arc<dyn AuthProvider>,
    work_id: WorkId,
    chapters: ChapterReconciler<B>,
    memos: MemoBoard<B>,
    chapter_sub: Option<Subscription<Vec<Chapter>>>,
    memo_sub: Option<Subscription<Vec<Memo>>>,
}

impl<B: Backend> Workspace<B> {
    /// Opens `work_id`: binds the reconciler and memo board and subscribes to both streams.
    pub fn open(
        backend: Arc<B>,
        auth: Arc<dyn AuthProvider>,
        config: &EditorConfig,
        work_id: WorkId,
    ) -> Result<(Self, EventReceiver), BackendError> {
        let (events, receiver) = event_channel();
        let chapters = ChapterReconciler::new(backend.clone(), auth.clone(), config, events.clone());
        let memos = MemoBoard::new(backend.clone(), events);
        let mut workspace = Self {
            backend,
            auth,
            work_id: work_id.clone(),
            chapters,
            memos,
            chapter_sub: None,
            memo_sub: None,
        };
        let subscriptions = workspace.subscribe(&work_id)?;
        workspace.attach(work_id, subscriptions);
        Ok((workspace, receiver))
    }

    fn subscribe(&self, work_id: &WorkId) -> Result<Subscriptions, BackendError> {
        let chapter_sub = self.backend.subscribe_chapters(work_id).map_err(|err| {
            tracing::warn!(work = %work_id, error = %err, "chapter subscription failed");
            err
        })?;
        let memo_sub = self.backend.subscribe_memos(work_id).map_err(|err| {
            tracing::warn!(work = %work_id, error = %err, "memo subscription failed");
            err
        })?;
        Ok((chapter_sub, memo_sub))
    }

    fn attach(&mut self, work_id: WorkId, (chapter_sub, memo_sub): Subscriptions) {
        self.chapters.set_work_id(work_id.clone());
        self.memos.set_work_id(work_id.clone());
        self.chapter_sub = Some(chapter_sub);
        self.memo_sub = Some(memo_sub);
        tracing::info!(work = %work_id, "work opened");
        self.work_id = work_id;
    }

    fn detach(&mut self) {
        if let Some(sub) = self.chapter_sub.take() {
            sub.unsubscribe();
        }
        if let Some(sub) = self.memo_sub.take() {
            sub.unsubscribe();
        }
        self.chapters.unbind();
        self.memos.unbind();
    }

    pub fn work_id(&self) -> &WorkId {
        &self.work_id
    }

    pub fn is_open(&self) -> bool {
        self.chapter_sub.is_some() || self.memo_sub.is_some()
    }

    pub fn chapters(&self) -> &ChapterReconciler<B> {
        &self.chapters
    }

    pub fn chapters_mut(&mut self) -> &mut ChapterReconciler<B> {
        &mut self.chapters
    }

    pub fn memos(&self) -> &MemoBoard<B> {
        &self.memos
    }

    pub fn memos_mut(&mut self) -> &mut MemoBoard<B> {
        &mut self.memos
    }

    /// Waits for the next chapter or memo snapshot and reconciles it.
    ///
    /// Returns false once both subscriptions have ended or the workspace is closed.
    pub async fn pump(&mut self) -> bool {
        let delivery = match (self.chapter_sub.as_mut(), self.memo_sub.as_mut()) {
            (Some(chapter_sub), Some(memo_sub)) => tokio::select! {
                snapshot = chapter_sub.next() => Delivery::Chapters(snapshot),
                snapshot = memo_sub.next() => Delivery::Memos(snapshot),
            },
            (Some(chapter_sub), None) => Delivery::Chapters(chapter_sub.next().await),
            (None, Some(memo_sub)) => Delivery::Memos(memo_sub.next().await),
            (None, None) => return false,
        };
        self.deliver(delivery);
        true
    }

    /// Reconciles every snapshot that has already been published, without waiting.
    pub fn pump_ready(&mut self) -> usize {
        let mut applied = 0;
        loop {
            let chapters = self.chapter_sub.as_mut().and_then(Subscription::try_next);
            let memos = self.memo_sub.as_mut().and_then(Subscription::try_next);
            if chapters.is_none() && memos.is_none() {
                return applied;
            }
            if let Some(snapshot) = chapters {
                self.deliver(Delivery::Chapters(Some(snapshot)));
                applied += 1;
            }
            if let Some(snapshot) = memos {
                self.deliver(Delivery::Memos(Some(snapshot)));
                applied += 1;
            }
        }
    }

    fn deliver(&mut self, delivery: Delivery) {
        match delivery {
            Delivery::Chapters(Some(snapshot)) => self.chapters.set_chapters(snapshot),
            Delivery::Memos(Some(snapshot)) => self.memos.set_memos(snapshot),
            Delivery::Chapters(None) => {
                tracing::warn!(work = %self.work_id, "chapter subscription ended");
                self.chapter_sub = None;
            }
            Delivery::Memos(None) => {
                tracing::warn!(work = %self.work_id, "memo subscription ended");
                self.memo_sub = None;
            }
        }
    }

    /// Opens `work_id` in place of the current work.
    ///
    /// The new work is subscribed before the current one is released; on failure the
    /// workspace stays on the current work untouched.
    pub fn switch_work(&mut self, work_id: WorkId) -> Result<(), BackendError> {
        let subscriptions = self.subscribe(&work_id)?;
        self.detach();
        self.chapters.reset();
        self.memos.reset();
        self.attach(work_id, subscriptions);
        Ok(())
    }

    /// Unsubscribes and unbinds; later writes fail with `NoWork` until `switch_work`.
    pub fn close(&mut self) {
        if self.is_open() {
            tracing::info!(work = %self.work_id, "work closed");
        }
        self.detach();
    }

    /// History backups of a chapter, newest first.
    pub async fn history(&self, chapter_id: &ChapterId) -> Result<Vec<HistoryEntry>, BackendError> {
        self.backend.list_history(&self.work_id, chapter_id).await
    }

    /// Replaces the active chapter's content with a backup after `confirm` approves it.
    pub async fn restore_history(
        &mut self,
        entry: &HistoryEntry,
        confirm: impl FnOnce(&HistoryEntry) -> bool,
    ) -> Result<Option<Timestamp>, ReconcileError> {
        if self.chapters.current_chapter().is_none() {
            return Err(ReconcileError::NoChapterSelected);
        }
        if !confirm(entry) {
            return Ok(None);
        }
        let patch = ChapterPatch::content(entry.content.clone());
        self.chapters.update_current_chapter(patch).await.map(Some)
    }

    /// The signed-in user's most recent daily progress records, oldest first.
    pub async fn recent_progress(&self, days: usize) -> Result<Vec<DailyProgress>, BackendError> {
        match self.auth.current_user() {
            Some(user_id) => self.backend.recent_daily_progress(&user_id, days).await,
            None => Ok(Vec::new()),
        }
    }
}

impl<B> Drop for Workspace<B> {
    fn drop(&mut self) {
        if let Some(sub) = self.chapter_sub.take() {
            sub.unsubscribe();
        }
        if let Some(sub) = self.memo_sub.take() {
            sub.unsubscribe();
        }
    }
}
