//! Store contract tests against the in-memory adapter.

use super::helpers::{category, clock, start, store, user};
use chrono::Duration;
use questline::quest::{
    adapters::{clock::ManualClock, memory::InMemoryQuestStore},
    domain::{EvidenceUri, Quest, QuestDuration, QuestStatus, StorageId},
    ports::{QuestStore, QuestStoreError},
};
use rstest::rstest;

fn quest_for(assignee: &str, clock: &ManualClock) -> Quest {
    Quest::new_system(
        user(assignee),
        category("Water Conservation"),
        QuestDuration::from_secs(3600).expect("positive duration"),
        clock,
    )
    .expect("deadline in range")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn insert_assigns_increasing_storage_ids(store: InMemoryQuestStore, clock: ManualClock) {
    let first = store
        .insert(&quest_for("U1", &clock))
        .await
        .expect("first insert should succeed");
    let second = store
        .insert(&quest_for("U1", &clock))
        .await
        .expect("second insert should succeed");

    assert!(second.value() > first.value());
    let found = store
        .find_by_storage_id(first)
        .await
        .expect("lookup should succeed")
        .expect("quest should exist");
    assert_eq!(found.storage_id(), Some(first));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_quest_id_is_rejected(store: InMemoryQuestStore, clock: ManualClock) {
    let quest = quest_for("U1", &clock);
    store.insert(&quest).await.expect("insert should succeed");

    let result = store.insert(&quest).await;

    assert!(matches!(
        result,
        Err(QuestStoreError::DuplicateQuest(id)) if id == quest.quest_id()
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_replaces_the_stored_record(store: InMemoryQuestStore, clock: ManualClock) {
    let mut quest = quest_for("U1", &clock);
    let storage_id = store.insert(&quest).await.expect("insert should succeed");
    quest
        .assign_storage_id(storage_id)
        .expect("first assignment should succeed");
    quest
        .complete(
            EvidenceUri::new("gs://bucket/proof.jpg").expect("valid uri"),
            &clock,
        )
        .expect("pending quest should complete");

    store
        .update(storage_id, &quest)
        .await
        .expect("update should succeed");

    let found = store
        .find_by_quest_id(quest.quest_id())
        .await
        .expect("lookup should succeed");
    assert_eq!(found, Some(quest));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_of_missing_record_reports_not_found(store: InMemoryQuestStore, clock: ManualClock) {
    let result = store
        .update(StorageId::new(99), &quest_for("U1", &clock))
        .await;

    assert!(matches!(
        result,
        Err(QuestStoreError::NotFound(id)) if id == StorageId::new(99)
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_reports_how_many_records_were_removed(
    store: InMemoryQuestStore,
    clock: ManualClock,
) {
    let quest = quest_for("U1", &clock);
    store.insert(&quest).await.expect("insert should succeed");

    let first = store
        .delete_by_quest_id(quest.quest_id())
        .await
        .expect("delete should succeed");
    let second = store
        .delete_by_quest_id(quest.quest_id())
        .await
        .expect("repeat delete should succeed");

    assert_eq!((first, second), (1, 0));
    assert!(
        store
            .find_by_quest_id(quest.quest_id())
            .await
            .expect("lookup should succeed")
            .is_none()
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn user_queries_filter_by_status_oldest_first(
    store: InMemoryQuestStore,
    clock: ManualClock,
) {
    let older = quest_for("U1", &clock);
    clock.advance(Duration::minutes(1));
    let mut completed = quest_for("U1", &clock);
    completed
        .complete(EvidenceUri::new("gs://bucket/a.jpg").expect("valid uri"), &clock)
        .expect("pending quest should complete");
    clock.advance(Duration::minutes(1));
    let newer = quest_for("U1", &clock);
    let other = quest_for("U2", &clock);
    for quest in [&newer, &completed, &other, &older] {
        store.insert(quest).await.expect("insert should succeed");
    }

    let pending = store
        .find_pending_for_user(&user("U1"))
        .await
        .expect("query should succeed");
    let all = store
        .find_for_user(&user("U1"), None)
        .await
        .expect("query should succeed");

    let pending_ids: Vec<_> = pending.iter().map(Quest::quest_id).collect();
    assert_eq!(pending_ids, vec![older.quest_id(), newer.quest_id()]);
    assert_eq!(all.len(), 3);
    assert!(all.iter().all(|quest| quest.assignee_id() == &user("U1")));
    assert_eq!(
        all.iter()
            .filter(|quest| quest.status() == QuestStatus::Completed)
            .count(),
        1
    );
    assert_eq!(all.first().map(Quest::created_at), Some(start()));
}
