//! Store port for quest persistence and lookup.

use crate::quest::domain::{Quest, QuestId, QuestStatus, StorageId, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for quest store operations.
pub type QuestStoreResult<T> = Result<T, QuestStoreError>;

/// Quest persistence contract.
///
/// Implementations need only equality lookups and existence checks.
/// `delete_by_quest_id` must be idempotent so that the loser of two
/// concurrent retirements observes a count of zero.
#[async_trait]
pub trait QuestStore: Send + Sync {
    /// Stores a new quest and returns its store-assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns [`QuestStoreError::DuplicateQuest`] when the quest identifier
    /// already exists.
    async fn insert(&self, quest: &Quest) -> QuestStoreResult<StorageId>;

    /// Overwrites the record stored under `storage_id`.
    ///
    /// # Errors
    ///
    /// Returns [`QuestStoreError::NotFound`] when no record has that
    /// identifier.
    async fn update(&self, storage_id: StorageId, quest: &Quest) -> QuestStoreResult<()>;

    /// Finds a quest by application-level identifier.
    async fn find_by_quest_id(&self, quest_id: QuestId) -> QuestStoreResult<Option<Quest>>;

    /// Finds a quest by store-assigned identifier.
    async fn find_by_storage_id(&self, storage_id: StorageId) -> QuestStoreResult<Option<Quest>>;

    /// Returns every pending quest assigned to `assignee_id`.
    async fn find_pending_for_user(&self, assignee_id: &UserId) -> QuestStoreResult<Vec<Quest>> {
        self.find_for_user(assignee_id, Some(QuestStatus::Pending))
            .await
    }

    /// Returns quests assigned to `assignee_id`, optionally filtered by
    /// status, oldest first.
    async fn find_for_user(
        &self,
        assignee_id: &UserId,
        status: Option<QuestStatus>,
    ) -> QuestStoreResult<Vec<Quest>>;

    /// Deletes the quest with `quest_id` and returns how many records were
    /// removed (`0` or `1`).
    async fn delete_by_quest_id(&self, quest_id: QuestId) -> QuestStoreResult<u64>;
}

/// Errors returned by quest store implementations.
#[derive(Debug, Clone, Error)]
pub enum QuestStoreError {
    /// A quest with the same identifier already exists.
    #[error("duplicate quest identifier: {0}")]
    DuplicateQuest(QuestId),

    /// No record has the storage identifier.
    #[error("quest record not found: {0}")]
    NotFound(StorageId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl QuestStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
