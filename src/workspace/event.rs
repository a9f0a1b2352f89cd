// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Genkou-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Genkou and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use tokio::sync::mpsc;

use crate::memo::MemoListView;
use crate::model::Chapter;
use crate::reconcile::ChapterListView;
use crate::shelf::WorkListView;

/// Everything the workspace reports to its presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceEvent {
    ChapterListRendered(ChapterListView),
    /// The active chapter changed identity; the editor buffer should be reloaded.
    ChapterChanged(Chapter),
    SaveStatus(SaveStatus),
    Notice(Notice),
    MemosRendered(MemoListView),
    WorksRendered(WorkListView),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    Saving,
    Saved,
    Failed,
}

/// User-facing message. `Display` yields the text shown to the writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    CapacityExceeded { limit: usize },
    ChapterCreateFailed,
    SaveFailed,
    ChapterDeleteFailed,
    ReorderFailed,
    MemoSaveFailed,
    MemoDeleteFailed,
    TitleRequired,
    WorkSaveFailed,
    WorkDeleteFailed,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityExceeded { limit } => write!(f, "最大{limit}話までです。"),
            Self::ChapterCreateFailed => f.write_str("話の作成に失敗しました。"),
            Self::SaveFailed => f.write_str("保存失敗"),
            Self::ChapterDeleteFailed => f.write_str("話の削除に失敗しました。"),
            Self::ReorderFailed => f.write_str("並び替えに失敗しました。"),
            Self::MemoSaveFailed => f.write_str("保存に失敗しました"),
            Self::MemoDeleteFailed | Self::WorkDeleteFailed => f.write_str("削除に失敗しました"),
            Self::TitleRequired => f.write_str("タイトルを入力してください"),
            Self::WorkSaveFailed => f.write_str("保存に失敗しました"),
        }
    }
}

pub type EventSender = mpsc::UnboundedSender<WorkspaceEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<WorkspaceEvent>;

pub fn event_channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}

/// Sends an event, tolerating a presentation layer that has gone away.
pub(crate) fn emit(events: &EventSender, event: WorkspaceEvent) {
    if events.send(event).is_err() {
        tracing::trace!("workspace event dropped: no receiver");
    }
}

#[cfg(test)]
mod tests {
    use super::Notice;

    #[test]
    fn notices_render_user_text() {
        assert_eq!(Notice::CapacityExceeded { limit: 1000 }.to_string(), "最大1000話までです。");
        assert_eq!(Notice::ChapterCreateFailed.to_string(), "話の作成に失敗しました。");
        assert_eq!(Notice::SaveFailed.to_string(), "保存失敗");
        assert_eq!(Notice::TitleRequired.to_string(), "タイトルを入力してください");
    }
}
