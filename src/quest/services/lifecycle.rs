//! Service layer for quest completion, expiry, and nomination chaining.

use super::{QuestGenerator, QuestPolicy};
use crate::quest::{
    domain::{
        EvidenceUri, Quest, QuestCategory, QuestDomainError, QuestId, QuestStatus, UserId,
    },
    ports::{QuestPicker, QuestStore, QuestStoreError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Request payload for completing a quest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompleteQuestRequest {
    evidence_uri: EvidenceUri,
    friends_of_assignee: Vec<UserId>,
}

impl CompleteQuestRequest {
    /// Creates a request carrying the stored proof of completion.
    #[must_use]
    pub const fn new(evidence_uri: EvidenceUri) -> Self {
        Self {
            evidence_uri,
            friends_of_assignee: Vec::new(),
        }
    }

    /// Sets the assignee's friends, as supplied by the social graph.
    #[must_use]
    pub fn with_friends(mut self, friends: impl IntoIterator<Item = UserId>) -> Self {
        self.friends_of_assignee = friends.into_iter().collect();
        self
    }

    /// Returns the evidence reference.
    #[must_use]
    pub const fn evidence_uri(&self) -> &EvidenceUri {
        &self.evidence_uri
    }

    /// Returns the friends supplied with the request.
    #[must_use]
    pub fn friends_of_assignee(&self) -> &[UserId] {
        &self.friends_of_assignee
    }
}

/// How a continuation quest came about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContinuationKind {
    /// A completion nominated one of the assignee's friends.
    Nomination,
    /// A completion with no eligible friends renewed the assignee's quest.
    SelfRenewal,
    /// An expired quest was replaced by a system quest.
    ExpiryReplacement,
}

/// Outcome of retiring a quest: the retired record and its continuation.
///
/// The continuation has not been persisted; pass it to
/// [`QuestLifecycleService::store_quest`] or an equivalent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestTransition {
    retired: Quest,
    next: Quest,
    kind: ContinuationKind,
}

impl QuestTransition {
    /// Returns the retired quest in its terminal status.
    #[must_use]
    pub const fn retired(&self) -> &Quest {
        &self.retired
    }

    /// Returns the continuation quest.
    #[must_use]
    pub const fn next(&self) -> &Quest {
        &self.next
    }

    /// Returns how the continuation came about.
    #[must_use]
    pub const fn kind(&self) -> ContinuationKind {
        self.kind
    }

    /// Consumes the transition, returning the continuation.
    #[must_use]
    pub fn into_next(self) -> Quest {
        self.next
    }
}

/// Service-level errors for quest lifecycle operations.
#[derive(Debug, Error)]
pub enum QuestLifecycleError {
    /// Domain validation or a transition guard failed.
    #[error(transparent)]
    Domain(#[from] QuestDomainError),
    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] QuestStoreError),
    /// Another caller retired the quest first.
    #[error("quest {0} was already retired")]
    AlreadyRetired(QuestId),
    /// No live record has the quest identifier.
    #[error("quest not found: {0}")]
    QuestNotFound(QuestId),
}

/// Result type for quest lifecycle service operations.
pub type QuestLifecycleResult<T> = Result<T, QuestLifecycleError>;

/// Quest lifecycle orchestration service.
///
/// Expiry always takes precedence over completion: a quest whose deadline
/// has passed is retired and replaced, never completed.
#[derive(Clone)]
pub struct QuestLifecycleService<S, P, C>
where
    S: QuestStore,
    P: QuestPicker,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    picker: Arc<P>,
    clock: Arc<C>,
    generator: QuestGenerator<C>,
    policy: QuestPolicy,
}

impl<S, P, C> QuestLifecycleService<S, P, C>
where
    S: QuestStore,
    P: QuestPicker,
    C: Clock + Send + Sync,
{
    /// Creates a service with the default [`QuestPolicy`].
    #[must_use]
    pub fn new(store: Arc<S>, picker: Arc<P>, clock: Arc<C>) -> Self {
        Self {
            store,
            picker,
            generator: QuestGenerator::new(Arc::clone(&clock)),
            clock,
            policy: QuestPolicy::default(),
        }
    }

    /// Replaces the policy.
    #[must_use]
    pub fn with_policy(mut self, policy: QuestPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Issues and persists a first system quest for a new user.
    ///
    /// # Errors
    ///
    /// Returns [`QuestLifecycleError`] when generation or persistence fails.
    pub async fn issue_onboarding_quest(&self, assignee_id: UserId) -> QuestLifecycleResult<Quest> {
        let category = self.pick_category()?;
        let quest = self.generator.generate_system_quest(
            assignee_id,
            category,
            self.policy.system_duration.as_duration(),
        )?;
        let stored = self.store_quest(quest).await?;
        info!(
            quest_id = %stored.quest_id(),
            assignee_id = %stored.assignee_id(),
            "issued onboarding quest"
        );
        Ok(stored)
    }

    /// Inserts a quest and returns it with its store-assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns [`QuestLifecycleError::Store`] when the insert fails and
    /// [`QuestLifecycleError::Domain`] when the quest was already saved.
    pub async fn store_quest(&self, mut quest: Quest) -> QuestLifecycleResult<Quest> {
        if quest.storage_id().is_some() {
            return Err(QuestDomainError::StorageIdAlreadyAssigned(quest.quest_id()).into());
        }
        let storage_id = self.store.insert(&quest).await?;
        quest.assign_storage_id(storage_id)?;
        Ok(quest)
    }

    /// Retrieves a live quest by identifier.
    ///
    /// Returns `Ok(None)` once the quest has been retired.
    ///
    /// # Errors
    ///
    /// Returns [`QuestLifecycleError::Store`] when the lookup fails.
    pub async fn find_by_quest_id(&self, quest_id: QuestId) -> QuestLifecycleResult<Option<Quest>> {
        Ok(self.store.find_by_quest_id(quest_id).await?)
    }

    /// Records points granted by the scoring collaborator on a live quest.
    ///
    /// Only pending quests have live records. Completed and expired quests
    /// are deleted on retirement, so they cannot be scored through the
    /// store; score a completion from its [`QuestTransition::retired`] quest
    /// instead.
    ///
    /// # Errors
    ///
    /// Returns [`QuestLifecycleError::QuestNotFound`] when no live record
    /// exists, or [`QuestLifecycleError::Store`] when the update fails.
    pub async fn record_points(&self, quest_id: QuestId, points: i64) -> QuestLifecycleResult<Quest> {
        let mut quest = self
            .store
            .find_by_quest_id(quest_id)
            .await?
            .ok_or(QuestLifecycleError::QuestNotFound(quest_id))?;
        let storage_id = quest
            .storage_id()
            .ok_or(QuestLifecycleError::QuestNotFound(quest_id))?;
        quest.award_points(points);
        self.store.update(storage_id, &quest).await?;
        Ok(quest)
    }

    /// Completes a quest and derives its continuation.
    ///
    /// An expired quest is routed to [`Self::expire`] instead. Otherwise the
    /// quest is marked completed and its continuation derived; only then is
    /// the quest saved for audit and deleted. The continuation nominates a
    /// random eligible friend, or renews the assignee's own quest when no
    /// friend is eligible.
    ///
    /// # Errors
    ///
    /// Returns [`QuestDomainError::InvalidTransition`] when the quest is not
    /// pending, [`QuestLifecycleError::AlreadyRetired`] when a concurrent
    /// caller retired the quest first, and [`QuestLifecycleError::Store`] for
    /// persistence failures.
    pub async fn complete(
        &self,
        mut quest: Quest,
        request: CompleteQuestRequest,
    ) -> QuestLifecycleResult<QuestTransition> {
        let quest_id = quest.quest_id();
        let from = quest.status();
        if quest.is_expired_at(self.clock.utc()) {
            info!(%quest_id, "completion submitted after deadline, expiring instead");
            return self
                .expire(quest)
                .await?
                .ok_or(QuestLifecycleError::Domain(QuestDomainError::InvalidTransition {
                    quest_id,
                    from,
                    to: QuestStatus::Completed,
                }));
        }

        let CompleteQuestRequest {
            evidence_uri,
            friends_of_assignee,
        } = request;
        quest.complete(evidence_uri, &*self.clock)?;

        let eligible = eligible_friends(quest.assignee_id(), &friends_of_assignee);
        let category = self.pick_category()?;
        let (next, kind) = match self.picker.pick_friend(&eligible) {
            Some(friend) => {
                let next = self.generator.generate_nomination_quest(
                    &quest,
                    friend.clone(),
                    category,
                    self.policy.nomination_duration.as_duration(),
                )?;
                (next, ContinuationKind::Nomination)
            }
            None => {
                let next = self
                    .generator
                    .generate_system_quest(
                        quest.assignee_id().clone(),
                        category,
                        self.policy.system_duration.as_duration(),
                    )?
                    .continuing_from(quest_id);
                (next, ContinuationKind::SelfRenewal)
            }
        };

        self.save_for_audit(&mut quest).await?;
        self.retire(&quest).await?;

        info!(
            %quest_id,
            next_quest_id = %next.quest_id(),
            next_assignee_id = %next.assignee_id(),
            ?kind,
            "quest completed"
        );
        Ok(QuestTransition {
            retired: quest,
            next,
            kind,
        })
    }

    /// Retires an expired pending quest and derives a system replacement.
    ///
    /// Returns `Ok(None)` without side effects when the quest is not pending
    /// or its deadline has not passed. A quest that was never stored has no
    /// record to delete and is replaced all the same.
    ///
    /// # Errors
    ///
    /// Returns [`QuestLifecycleError::AlreadyRetired`] when a concurrent
    /// caller retired the quest first, and [`QuestLifecycleError::Store`] for
    /// persistence failures.
    pub async fn expire(&self, mut quest: Quest) -> QuestLifecycleResult<Option<QuestTransition>> {
        let quest_id = quest.quest_id();
        if quest.status() != QuestStatus::Pending {
            debug!(%quest_id, status = %quest.status(), "expiry skipped for non-pending quest");
            return Ok(None);
        }
        if !quest.is_expired_at(self.clock.utc()) {
            debug!(%quest_id, "expiry skipped, deadline not reached");
            return Ok(None);
        }

        quest.expire(&*self.clock)?;
        let category = self.pick_category()?;
        let next = self
            .generator
            .generate_system_quest(
                quest.assignee_id().clone(),
                category,
                self.policy.system_duration.as_duration(),
            )?
            .continuing_from(quest_id);
        self.retire(&quest).await?;

        info!(
            %quest_id,
            next_quest_id = %next.quest_id(),
            assignee_id = %next.assignee_id(),
            "quest expired"
        );
        Ok(Some(QuestTransition {
            retired: quest,
            next,
            kind: ContinuationKind::ExpiryReplacement,
        }))
    }

    /// Returns the live pending quests for a user, replacing expired ones.
    ///
    /// Each stale quest is expired and its replacement persisted. Quests
    /// retired concurrently by another caller are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`QuestLifecycleError`] when a lookup, expiry, or insert
    /// fails.
    pub async fn refresh_pending_for_user(
        &self,
        assignee_id: &UserId,
    ) -> QuestLifecycleResult<Vec<Quest>> {
        let pending = self.store.find_pending_for_user(assignee_id).await?;
        let now = self.clock.utc();
        let mut live = Vec::with_capacity(pending.len());
        for quest in pending {
            if !quest.is_expired_at(now) {
                live.push(quest);
                continue;
            }
            match self.expire(quest).await {
                Ok(Some(transition)) => live.push(self.store_quest(transition.into_next()).await?),
                Ok(None) => {}
                Err(QuestLifecycleError::AlreadyRetired(quest_id)) => {
                    debug!(%quest_id, "stale quest already retired elsewhere");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(live)
    }

    fn pick_category(&self) -> QuestLifecycleResult<QuestCategory> {
        self.picker
            .pick_category(&self.policy.category_pool)
            .cloned()
            .ok_or(QuestLifecycleError::Domain(QuestDomainError::EmptyCategoryPool))
    }

    /// Writes the terminal record before deletion, inserting it if it was
    /// never saved.
    async fn save_for_audit(&self, quest: &mut Quest) -> QuestLifecycleResult<()> {
        match quest.storage_id() {
            Some(storage_id) => match self.store.update(storage_id, quest).await {
                Ok(()) => Ok(()),
                Err(QuestStoreError::NotFound(_)) => {
                    warn!(quest_id = %quest.quest_id(), "quest record vanished before completion");
                    Err(QuestLifecycleError::AlreadyRetired(quest.quest_id()))
                }
                Err(err) => Err(err.into()),
            },
            None => {
                let storage_id = self.store.insert(quest).await?;
                quest.assign_storage_id(storage_id)?;
                Ok(())
            }
        }
    }

    /// Deletes the live record. Zero deletions for a saved quest means
    /// another caller won.
    async fn retire(&self, quest: &Quest) -> QuestLifecycleResult<()> {
        let quest_id = quest.quest_id();
        let removed = self.store.delete_by_quest_id(quest_id).await?;
        if removed > 0 {
            return Ok(());
        }
        if quest.storage_id().is_none() {
            debug!(%quest_id, "retired quest was never stored");
            return Ok(());
        }
        warn!(%quest_id, "quest already retired by a concurrent caller");
        Err(QuestLifecycleError::AlreadyRetired(quest_id))
    }
}

/// Returns the distinct friends other than the assignee, in input order.
fn eligible_friends(assignee_id: &UserId, friends: &[UserId]) -> Vec<UserId> {
    let mut eligible: Vec<UserId> = Vec::with_capacity(friends.len());
    for friend in friends {
        if friend != assignee_id && !eligible.contains(friend) {
            eligible.push(friend.clone());
        }
    }
    eligible
}
