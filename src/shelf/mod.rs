// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Genkou-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Genkou and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The signed-in writer's shelf: a live list of the works they own.
//!
//! The shelf only manages work records. Opening one hands its id to a
//! [`Workspace`](crate::workspace::Workspace).

use std::sync::Arc;

use crate::backend::{AuthProvider, Backend, BackendError, Subscription};
use crate::model::{
    sort_works, Timestamp, Work, WorkDraft, WorkId, WorkPatch, WorkSort, WorkStatus,
};
use crate::workspace::event::{emit, EventSender, Notice, WorkspaceEvent};

#[derive(Debug, thiserror::Error)]
pub enum ShelfError {
    #[error("no user is signed in")]
    NoUser,
    #[error("work title is empty")]
    EmptyTitle,
    #[error(transparent)]
    Backend(#[from] BackendError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkRow {
    pub id: WorkId,
    pub title: String,
    pub status: WorkStatus,
    pub pinned: bool,
    pub total_chars: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkListView {
    pub rows: Vec<WorkRow>,
}

impl WorkListView {
    /// Rows for `works` in the given order, keeping only `filter` when set.
    pub fn build(works: &[Work], filter: Option<WorkStatus>) -> Self {
        let rows = works
            .iter()
            .filter(|work| filter.map_or(true, |status| work.status() == status))
            .map(|work| WorkRow {
                id: work.id().clone(),
                title: work.title().to_owned(),
                status: work.status(),
                pinned: work.is_pinned(),
                total_chars: work.total_chars(),
            })
            .collect();
        Self { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub struct WorkShelf<B> {
    backend: Arc<B>,
    auth: Arc<dyn AuthProvider>,
    events: EventSender,
    sort: WorkSort,
    filter: Option<WorkStatus>,
    works: Vec<Work>,
    subscription: Option<Subscription<Vec<Work>>>,
}

impl<B: Backend> WorkShelf<B> {
    pub fn new(backend: Arc<B>, auth: Arc<dyn AuthProvider>, events: EventSender) -> Self {
        Self {
            backend,
            auth,
            events,
            sort: WorkSort::default(),
            filter: None,
            works: Vec::new(),
            subscription: None,
        }
    }

    /// Subscribes to the signed-in user's works, replacing any earlier subscription.
    pub fn open(&mut self) -> Result<(), ShelfError> {
        let owner = self.auth.current_user().ok_or(ShelfError::NoUser)?;
        let subscription = self.backend.subscribe_works(&owner).map_err(|err| {
            tracing::warn!(owner = %owner, error = %err, "work subscription failed");
            err
        })?;
        self.close();
        self.subscription = Some(subscription);
        Ok(())
    }

    pub fn close(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
        self.works.clear();
    }

    pub fn is_open(&self) -> bool {
        self.subscription.is_some()
    }

    /// Waits for the next snapshot. Returns false once the subscription is gone.
    pub async fn pump(&mut self) -> bool {
        let Some(subscription) = self.subscription.as_mut() else {
            return false;
        };
        match subscription.next().await {
            Some(snapshot) => {
                self.set_works(snapshot);
                true
            }
            None => {
                tracing::warn!("work subscription ended");
                self.subscription = None;
                false
            }
        }
    }

    /// Applies the latest published snapshot, if any, without waiting.
    pub fn pump_ready(&mut self) -> bool {
        match self.subscription.as_mut().and_then(Subscription::try_next) {
            Some(snapshot) => {
                self.set_works(snapshot);
                true
            }
            None => false,
        }
    }

    pub fn set_works(&mut self, snapshot: Vec<Work>) {
        self.works = snapshot;
        sort_works(&mut self.works, self.sort);
        self.render();
    }

    pub fn set_sort(&mut self, sort: WorkSort) {
        self.sort = sort;
        sort_works(&mut self.works, sort);
        self.render();
    }

    pub fn set_filter(&mut self, filter: Option<WorkStatus>) {
        self.filter = filter;
        self.render();
    }

    /// All works in display order, regardless of the status filter.
    pub fn works(&self) -> &[Work] {
        &self.works
    }

    pub fn view(&self) -> WorkListView {
        WorkListView::build(&self.works, self.filter)
    }

    fn render(&self) {
        emit(&self.events, WorkspaceEvent::WorksRendered(self.view()));
    }

    fn notify(&self, notice: Notice) {
        emit(&self.events, WorkspaceEvent::Notice(notice));
    }

    pub async fn create_work(&mut self, draft: WorkDraft) -> Result<WorkId, ShelfError> {
        let owner = self.auth.current_user().ok_or(ShelfError::NoUser)?;
        let title = draft.title.trim().to_owned();
        if title.is_empty() {
            self.notify(Notice::TitleRequired);
            return Err(ShelfError::EmptyTitle);
        }
        let draft = WorkDraft { title, ..draft };

        self.backend.create_work(&owner, &draft).await.map_err(|err| {
            tracing::warn!(owner = %owner, error = %err, "work create failed");
            self.notify(Notice::WorkSaveFailed);
            ShelfError::from(err)
        })
    }

    pub async fn update_work(
        &mut self,
        work_id: &WorkId,
        patch: WorkPatch,
    ) -> Result<Timestamp, ShelfError> {
        let mut patch = patch;
        if let Some(title) = patch.title.as_mut() {
            let trimmed = title.trim();
            if trimmed.is_empty() {
                self.notify(Notice::TitleRequired);
                return Err(ShelfError::EmptyTitle);
            }
            *title = trimmed.to_owned();
        }

        self.backend.update_work(work_id, &patch).await.map_err(|err| {
            tracing::warn!(work = %work_id, error = %err, "work save failed");
            self.notify(Notice::WorkSaveFailed);
            ShelfError::from(err)
        })
    }

    /// Deletes a listed work after `confirm` approves it. Returns false for an unknown id or
    /// a declined confirmation.
    pub async fn delete_work(
        &mut self,
        work_id: &WorkId,
        confirm: impl FnOnce(&Work) -> bool,
    ) -> Result<bool, ShelfError> {
        let Some(work) = self.works.iter().find(|work| work.id() == work_id) else {
            return Ok(false);
        };
        if !confirm(work) {
            return Ok(false);
        }

        match self.backend.delete_work(work_id).await {
            Ok(()) => {
                tracing::info!(work = %work_id, "work deleted");
                Ok(true)
            }
            Err(err) => {
                tracing::warn!(work = %work_id, error = %err, "work delete failed");
                self.notify(Notice::WorkDeleteFailed);
                Err(err.into())
            }
        }
    }

    /// Flips the pin of a listed work from its last known state. Unknown ids are a no-op.
    pub async fn toggle_pin(&mut self, work_id: &WorkId) -> Result<bool, ShelfError> {
        let Some(pinned) =
            self.works.iter().find(|work| work.id() == work_id).map(Work::is_pinned)
        else {
            return Ok(false);
        };
        self.backend.toggle_work_pin(work_id, pinned).await.map_err(|err| {
            tracing::warn!(work = %work_id, error = %err, "work pin failed");
            self.notify(Notice::WorkSaveFailed);
            ShelfError::from(err)
        })?;
        Ok(true)
    }
}
