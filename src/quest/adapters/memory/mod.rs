//! In-memory quest store for tests and single-process deployments.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::quest::{
    domain::{Quest, QuestId, QuestStatus, StorageId, UserId},
    ports::{QuestStore, QuestStoreError, QuestStoreResult},
};

/// Thread-safe in-memory quest store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryQuestStore {
    state: Arc<RwLock<InMemoryQuestState>>,
}

#[derive(Debug, Default)]
struct InMemoryQuestState {
    next_storage_id: i64,
    records: HashMap<StorageId, Quest>,
    quest_index: HashMap<QuestId, StorageId>,
}

impl InMemoryQuestStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored quests.
    ///
    /// # Errors
    ///
    /// Returns [`QuestStoreError::Persistence`] when the lock is poisoned.
    pub fn len(&self) -> QuestStoreResult<usize> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.records.len())
    }

    /// Returns `true` when no quests are stored.
    ///
    /// # Errors
    ///
    /// Returns [`QuestStoreError::Persistence`] when the lock is poisoned.
    pub fn is_empty(&self) -> QuestStoreResult<bool> {
        Ok(self.len()? == 0)
    }
}

fn poisoned<E: ToString>(err: E) -> QuestStoreError {
    QuestStoreError::persistence(std::io::Error::other(err.to_string()))
}

/// Returns a copy of `quest` carrying the store-assigned identifier.
fn with_storage_id(quest: &Quest, storage_id: StorageId) -> QuestStoreResult<Quest> {
    let mut stored = quest.clone();
    if stored.storage_id() != Some(storage_id) {
        stored
            .assign_storage_id(storage_id)
            .map_err(QuestStoreError::persistence)?;
    }
    Ok(stored)
}

#[async_trait]
impl QuestStore for InMemoryQuestStore {
    async fn insert(&self, quest: &Quest) -> QuestStoreResult<StorageId> {
        let mut state = self.state.write().map_err(poisoned)?;
        if state.quest_index.contains_key(&quest.quest_id()) {
            return Err(QuestStoreError::DuplicateQuest(quest.quest_id()));
        }

        state.next_storage_id += 1;
        let storage_id = StorageId::new(state.next_storage_id);
        let stored = with_storage_id(quest, storage_id)?;
        state.quest_index.insert(quest.quest_id(), storage_id);
        state.records.insert(storage_id, stored);
        Ok(storage_id)
    }

    async fn update(&self, storage_id: StorageId, quest: &Quest) -> QuestStoreResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        let previous_quest_id = state
            .records
            .get(&storage_id)
            .map(Quest::quest_id)
            .ok_or(QuestStoreError::NotFound(storage_id))?;

        if previous_quest_id != quest.quest_id() {
            if state.quest_index.contains_key(&quest.quest_id()) {
                return Err(QuestStoreError::DuplicateQuest(quest.quest_id()));
            }
            state.quest_index.remove(&previous_quest_id);
            state.quest_index.insert(quest.quest_id(), storage_id);
        }

        let stored = with_storage_id(quest, storage_id)?;
        state.records.insert(storage_id, stored);
        Ok(())
    }

    async fn find_by_quest_id(&self, quest_id: QuestId) -> QuestStoreResult<Option<Quest>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state
            .quest_index
            .get(&quest_id)
            .and_then(|storage_id| state.records.get(storage_id))
            .cloned())
    }

    async fn find_by_storage_id(&self, storage_id: StorageId) -> QuestStoreResult<Option<Quest>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.records.get(&storage_id).cloned())
    }

    async fn find_for_user(
        &self,
        assignee_id: &UserId,
        status: Option<QuestStatus>,
    ) -> QuestStoreResult<Vec<Quest>> {
        let state = self.state.read().map_err(poisoned)?;
        let mut matches: Vec<Quest> = state
            .records
            .values()
            .filter(|quest| quest.assignee_id() == assignee_id)
            .filter(|quest| status.is_none_or(|wanted| quest.status() == wanted))
            .cloned()
            .collect();
        matches.sort_by_key(|quest| (quest.created_at(), quest.storage_id()));
        Ok(matches)
    }

    async fn delete_by_quest_id(&self, quest_id: QuestId) -> QuestStoreResult<u64> {
        let mut state = self.state.write().map_err(poisoned)?;
        let Some(storage_id) = state.quest_index.remove(&quest_id) else {
            return Ok(0);
        };
        Ok(u64::from(state.records.remove(&storage_id).is_some()))
    }
}
