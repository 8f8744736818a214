//! Quest generation for system-issued and nominated quests.

use crate::quest::domain::{Quest, QuestCategory, QuestDomainError, QuestDuration, UserId};
use chrono::Duration;
use mockable::Clock;
use std::sync::Arc;
use tracing::debug;

/// Produces new pending quests without touching persistence.
///
/// Categories are supplied by the caller so that random selection stays
/// outside the generator.
#[derive(Clone)]
pub struct QuestGenerator<C>
where
    C: Clock + Send + Sync,
{
    clock: Arc<C>,
}

impl<C> QuestGenerator<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a generator stamping quests with `clock`.
    #[must_use]
    pub const fn new(clock: Arc<C>) -> Self {
        Self { clock }
    }

    /// Generates a system quest for `assignee_id`.
    ///
    /// # Errors
    ///
    /// Returns [`QuestDomainError::InvalidDuration`] when `duration` is not a
    /// positive number of microseconds or the deadline is out of range.
    pub fn generate_system_quest(
        &self,
        assignee_id: UserId,
        category: QuestCategory,
        duration: Duration,
    ) -> Result<Quest, QuestDomainError> {
        let lifetime = QuestDuration::new(duration)?;
        let quest = Quest::new_system(assignee_id, category, lifetime, &*self.clock)?;
        debug!(
            quest_id = %quest.quest_id(),
            assignee_id = %quest.assignee_id(),
            category = %quest.target_category(),
            "generated system quest"
        );
        Ok(quest)
    }

    /// Generates a quest for `next_assignee_id`, nominated by the assignee
    /// of `predecessor`.
    ///
    /// # Errors
    ///
    /// Returns [`QuestDomainError::Precondition`] when `predecessor` is not
    /// completed or has no completion evidence, and
    /// [`QuestDomainError::InvalidDuration`] when `duration` is rejected.
    pub fn generate_nomination_quest(
        &self,
        predecessor: &Quest,
        next_assignee_id: UserId,
        category: QuestCategory,
        duration: Duration,
    ) -> Result<Quest, QuestDomainError> {
        predecessor.nomination_evidence()?;
        let lifetime = QuestDuration::new(duration)?;
        let quest =
            Quest::new_nomination(predecessor, next_assignee_id, category, lifetime, &*self.clock)?;
        debug!(
            quest_id = %quest.quest_id(),
            predecessor_quest_id = %predecessor.quest_id(),
            assignee_id = %quest.assignee_id(),
            "generated nomination quest"
        );
        Ok(quest)
    }
}
