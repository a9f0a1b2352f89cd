// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Genkou-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Genkou and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rstest::{fixture, rstest};

use super::MemoryBackend;
use crate::backend::{Backend, BackendError, DocumentKind};
use crate::model::fixtures::{cid, mid, uid, wid};
use crate::model::{ChapterPatch, WorkDraft, WorkId, WorkPatch, WorkStatus};
use crate::store::WorkFolder;
use crate::test_utils::TempDir;

#[fixture]
fn work() -> WorkId {
    wid("w1")
}

#[rstest]
#[tokio::test]
async fn subscription_sees_current_snapshot_then_writes(work: WorkId) {
    let backend = MemoryBackend::new();
    let mut sub = backend.subscribe_chapters(&work).unwrap();
    assert_eq!(sub.next().await, Some(Vec::new()));

    let id = backend.create_chapter(&work, 1, "").await.unwrap();
    let snapshot = sub.next().await.unwrap();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].id(), &id);
    assert_eq!(snapshot[0].title(), "第1話");
    assert!(snapshot[0].updated_at().is_some());
}

#[rstest]
#[tokio::test]
async fn snapshots_are_sorted_by_order(work: WorkId) {
    let backend = MemoryBackend::new();
    let late = backend.create_chapter(&work, 5, "").await.unwrap();
    let early = backend.create_chapter(&work, 2, "").await.unwrap();

    let ids = backend.chapters(&work).unwrap().iter().map(|c| c.id().clone()).collect::<Vec<_>>();
    assert_eq!(ids, vec![early, late]);
}

#[rstest]
#[tokio::test]
async fn update_stamps_increase_and_merge_patch(work: WorkId) {
    let backend = MemoryBackend::new();
    let id = backend.create_chapter(&work, 1, "前").await.unwrap();

    let first = backend.update_chapter(&work, &id, &ChapterPatch::content("後")).await.unwrap();
    let second = backend.update_chapter(&work, &id, &ChapterPatch::title("序章")).await.unwrap();
    assert!(second > first);

    let chapters = backend.chapters(&work).unwrap();
    assert_eq!(chapters[0].content(), "後");
    assert_eq!(chapters[0].title(), "序章");
    assert_eq!(chapters[0].updated_at(), Some(second));
}

#[rstest]
#[tokio::test]
async fn updating_a_missing_chapter_is_not_found(work: WorkId) {
    let backend = MemoryBackend::new();
    let err = backend.update_chapter(&work, &cid("nope"), &ChapterPatch::order(1)).await;
    assert!(matches!(
        err,
        Err(BackendError::NotFound { kind: DocumentKind::Chapter, ref id }) if id == "nope"
    ));
}

#[rstest]
#[tokio::test]
async fn deleting_a_chapter_drops_its_history(work: WorkId) {
    let backend = MemoryBackend::new();
    let id = backend.create_chapter(&work, 1, "").await.unwrap();
    backend.save_history_backup(&work, &id, "一").await.unwrap();
    backend.save_history_backup(&work, &id, "二").await.unwrap();

    let history = backend.list_history(&work, &id).await.unwrap();
    assert_eq!(history.iter().map(|h| h.content.as_str()).collect::<Vec<_>>(), ["二", "一"]);

    backend.delete_chapter(&work, &id).await.unwrap();
    backend.delete_chapter(&work, &id).await.unwrap();
    assert!(backend.chapters(&work).unwrap().is_empty());
    assert!(backend.list_history(&work, &id).await.unwrap().is_empty());
}

#[tokio::test]
async fn daily_progress_accumulates_per_day() {
    let backend = MemoryBackend::new();
    let user = uid("u1");

    backend.increment_daily_progress(&user, 5).await.unwrap();
    backend.increment_daily_progress(&user, -2).await.unwrap();
    backend.increment_daily_progress(&user, 0).await.unwrap();

    let days = backend.recent_daily_progress(&user, 7).await.unwrap();
    assert_eq!(days.len(), 1);
    assert_eq!(days[0].count, 3);
    assert_eq!(days[0].date, chrono::Local::now().date_naive());
    assert!(backend.recent_daily_progress(&uid("u2"), 7).await.unwrap().is_empty());
}

#[rstest]
#[tokio::test]
async fn memo_swap_exchanges_orders(work: WorkId) {
    let backend = MemoryBackend::new();
    let first = backend.create_memo(&work, "人物", "", 10).await.unwrap();
    let second = backend.create_memo(&work, "設定", "", 20).await.unwrap();

    backend.swap_memo_order(&work, &first, 10, &second, 20).await.unwrap();
    let memos = backend.memos(&work).unwrap();
    assert_eq!(memos[0].id(), &second);
    assert_eq!(memos[0].order(), 10);
    assert_eq!(memos[1].id(), &first);
    assert_eq!(memos[1].order(), 20);

    backend.update_memo(&work, &first, "人物表", "主人公").await.unwrap();
    backend.delete_memo(&work, &second).await.unwrap();
    let memos = backend.memos(&work).unwrap();
    assert_eq!(memos.len(), 1);
    assert_eq!(memos[0].title(), "人物表");
    assert_eq!(memos[0].content(), "主人公");

    let missing = backend.update_memo(&work, &mid("gone"), "", "").await;
    assert!(matches!(missing, Err(BackendError::NotFound { kind: DocumentKind::Memo, .. })));
}

#[rstest]
#[tokio::test]
async fn dropping_subscription_releases_receiver(work: WorkId) {
    let backend = MemoryBackend::new();
    let sub = backend.subscribe_chapters(&work).unwrap();
    let memos = backend.subscribe_memos(&work).unwrap();
    assert_eq!(backend.chapter_subscriber_count(&work), 1);
    assert_eq!(backend.memo_subscriber_count(&work), 1);

    sub.unsubscribe();
    drop(memos);
    assert_eq!(backend.chapter_subscriber_count(&work), 0);
    assert_eq!(backend.memo_subscriber_count(&work), 0);
}

#[rstest]
#[tokio::test]
async fn folder_backed_state_survives_reopen(work: WorkId) {
    let tmp = TempDir::new("memory-backend");
    let user = uid("u1");
    let chapter_id = {
        let backend = MemoryBackend::with_folder(WorkFolder::new(tmp.path()));
        let id = backend.create_chapter(&work, 1, "冒頭").await.unwrap();
        backend.save_history_backup(&work, &id, "冒頭").await.unwrap();
        backend.create_memo(&work, "メモ", "", 1).await.unwrap();
        backend.increment_daily_progress(&user, 2).await.unwrap();
        id
    };

    let reopened = MemoryBackend::with_folder(WorkFolder::new(tmp.path()));
    let chapters = reopened.chapters(&work).unwrap();
    assert_eq!(chapters.len(), 1);
    assert_eq!(chapters[0].id(), &chapter_id);
    assert_eq!(chapters[0].content(), "冒頭");
    assert_eq!(reopened.memos(&work).unwrap().len(), 1);
    assert_eq!(reopened.list_history(&work, &chapter_id).await.unwrap().len(), 1);
    assert_eq!(reopened.recent_daily_progress(&user, 1).await.unwrap()[0].count, 2);
}

#[tokio::test]
async fn work_subscription_lists_only_the_owners_works_pinned_first() {
    let backend = MemoryBackend::new();
    let (me, other) = (uid("u1"), uid("u2"));
    let mut shelf = backend.subscribe_works(&me).unwrap();
    assert_eq!(shelf.next().await, Some(Vec::new()));

    let first = backend.create_work(&me, &WorkDraft::titled("一作目")).await.unwrap();
    let second = backend.create_work(&me, &WorkDraft::titled("二作目")).await.unwrap();
    backend.create_work(&other, &WorkDraft::titled("他人の作品")).await.unwrap();

    let ids = |works: Vec<crate::model::Work>| {
        works.iter().map(|w| w.id().clone()).collect::<Vec<_>>()
    };
    assert_eq!(ids(backend.works(&me).unwrap()), vec![second.clone(), first.clone()]);

    backend.toggle_work_pin(&first, false).await.unwrap();
    let snapshot = shelf.try_next().unwrap();
    assert_eq!(ids(snapshot.clone()), vec![first, second]);
    assert!(snapshot[0].is_pinned());
    assert_eq!(snapshot[0].total_chars(), 0);
}

#[tokio::test]
async fn pin_toggle_keeps_updated_at_and_update_bumps_it() {
    let backend = MemoryBackend::new();
    let me = uid("u1");
    let id = backend.create_work(&me, &WorkDraft::titled("星の海")).await.unwrap();
    let created = backend.works(&me).unwrap()[0].updated_at();

    backend.toggle_work_pin(&id, true).await.unwrap();
    let work = backend.works(&me).unwrap().remove(0);
    assert!(!work.is_pinned());
    assert_eq!(work.updated_at(), created);

    let patch = WorkPatch { status: Some(WorkStatus::Completed), ..WorkPatch::default() };
    let stamp = backend.update_work(&id, &patch).await.unwrap();
    let work = backend.works(&me).unwrap().remove(0);
    assert_eq!(work.status(), WorkStatus::Completed);
    assert_eq!(work.updated_at(), Some(stamp));
    assert!(Some(stamp) > created);

    let err = backend.update_work(&wid("nope"), &patch).await;
    assert!(matches!(err, Err(BackendError::NotFound { kind: DocumentKind::Work, .. })));
}

#[tokio::test]
async fn deleting_a_work_closes_its_document_subscriptions() {
    let tmp = TempDir::new("memory-works");
    let backend = MemoryBackend::with_folder(WorkFolder::new(tmp.path()));
    let me = uid("u1");
    let id = backend.create_work(&me, &WorkDraft::titled("消す作品")).await.unwrap();
    backend.create_chapter(&id, 1, "本文").await.unwrap();
    let mut chapters = backend.subscribe_chapters(&id).unwrap();
    assert_eq!(chapters.next().await.map(|c| c.len()), Some(1));

    backend.delete_work(&id).await.unwrap();
    assert_eq!(chapters.next().await, None);
    assert!(backend.works(&me).unwrap().is_empty());
    assert!(!WorkFolder::new(tmp.path()).work_dir(&id).exists());
    backend.delete_work(&id).await.unwrap();
}

#[tokio::test]
async fn works_survive_reopen() {
    let tmp = TempDir::new("memory-works");
    let me = uid("u1");
    let id = {
        let backend = MemoryBackend::with_folder(WorkFolder::new(tmp.path()));
        let id = backend.create_work(&me, &WorkDraft::titled("長編")).await.unwrap();
        backend.toggle_work_pin(&id, false).await.unwrap();
        id
    };

    let reopened = MemoryBackend::with_folder(WorkFolder::new(tmp.path()));
    let works = reopened.works(&me).unwrap();
    assert_eq!(works.len(), 1);
    assert_eq!(works[0].id(), &id);
    assert_eq!(works[0].title(), "長編");
    assert!(works[0].is_pinned());
}
