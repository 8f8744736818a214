//! Quest aggregate root and its lifecycle status.

use super::{
    EvidenceUri, InvalidRecordError, ParseQuestStatusError, QuestCategory, QuestDomainError,
    QuestDuration, QuestId, StorageId, UserId, is_expired,
};
use chrono::{DateTime, Duration, SubsecRound, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Quest lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestStatus {
    /// Quest is open and awaiting completion.
    Pending,
    /// Quest was completed with evidence.
    Completed,
    /// Quest passed its deadline and was retired by the system.
    ExpiredBySystem,
}

impl QuestStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::ExpiredBySystem => "expired_by_system",
        }
    }

    /// Returns `true` for statuses with no outgoing transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::ExpiredBySystem)
    }

    /// Returns `true` when a quest may move from `self` to `target`.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Completed | Self::ExpiredBySystem)
        )
    }
}

impl fmt::Display for QuestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for QuestStatus {
    type Error = ParseQuestStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "expired_by_system" => Ok(Self::ExpiredBySystem),
            _ => Err(ParseQuestStatusError(value.to_owned())),
        }
    }
}

/// Quest aggregate root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quest {
    quest_id: QuestId,
    storage_id: Option<StorageId>,
    assignee_id: UserId,
    nominator_id: Option<UserId>,
    nomination_evidence_uri: Option<EvidenceUri>,
    predecessor_quest_id: Option<QuestId>,
    target_category: QuestCategory,
    status: QuestStatus,
    completion_evidence_uri: Option<EvidenceUri>,
    created_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
    closed_at: Option<DateTime<Utc>>,
    points_awarded: Option<i64>,
}

/// Parameter object for reconstructing a persisted quest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedQuestData {
    /// Application-level identifier.
    pub quest_id: QuestId,
    /// Store-assigned identifier, if the quest has been saved.
    pub storage_id: Option<StorageId>,
    /// User who must complete the quest.
    pub assignee_id: UserId,
    /// User whose completion nominated this quest.
    pub nominator_id: Option<UserId>,
    /// Evidence of the nominator's completion.
    pub nomination_evidence_uri: Option<EvidenceUri>,
    /// Quest whose retirement produced this one.
    pub predecessor_quest_id: Option<QuestId>,
    /// Requested deed category.
    pub target_category: QuestCategory,
    /// Lifecycle status.
    pub status: QuestStatus,
    /// Evidence of this quest's completion.
    pub completion_evidence_uri: Option<EvidenceUri>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Deadline, absent for legacy permanent quests.
    pub expires_at: Option<DateTime<Utc>>,
    /// Timestamp of the terminal transition.
    pub closed_at: Option<DateTime<Utc>>,
    /// Points granted by the scoring collaborator.
    pub points_awarded: Option<i64>,
}

impl Quest {
    /// Creates a pending system-issued quest for `assignee_id`.
    ///
    /// # Errors
    ///
    /// Returns [`QuestDomainError::InvalidDuration`] when the deadline would
    /// fall outside the representable range.
    pub fn new_system(
        assignee_id: UserId,
        target_category: QuestCategory,
        duration: QuestDuration,
        clock: &impl Clock,
    ) -> Result<Self, QuestDomainError> {
        let created_at = now_micros(clock);
        let expires_at = duration.deadline_from(created_at)?;
        Ok(Self {
            quest_id: QuestId::new(),
            storage_id: None,
            assignee_id,
            nominator_id: None,
            nomination_evidence_uri: None,
            predecessor_quest_id: None,
            target_category,
            status: QuestStatus::Pending,
            completion_evidence_uri: None,
            created_at,
            expires_at: Some(expires_at),
            closed_at: None,
            points_awarded: None,
        })
    }

    /// Creates a pending quest nominated by the assignee of `predecessor`.
    ///
    /// The predecessor's completion evidence is carried forward as the new
    /// quest's nomination evidence.
    ///
    /// # Errors
    ///
    /// Returns [`QuestDomainError::Precondition`] unless `predecessor` is
    /// completed and carries completion evidence, and
    /// [`QuestDomainError::InvalidDuration`] when the deadline is out of range.
    pub fn new_nomination(
        predecessor: &Self,
        assignee_id: UserId,
        target_category: QuestCategory,
        duration: QuestDuration,
        clock: &impl Clock,
    ) -> Result<Self, QuestDomainError> {
        let evidence = predecessor.nomination_evidence()?.clone();

        let mut quest = Self::new_system(assignee_id, target_category, duration, clock)?;
        quest.nominator_id = Some(predecessor.assignee_id.clone());
        quest.nomination_evidence_uri = Some(evidence);
        quest.predecessor_quest_id = Some(predecessor.quest_id);
        Ok(quest)
    }

    /// Reconstructs a quest from persisted storage, checking record
    /// invariants.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidRecordError`] when evidence does not agree with the
    /// status or the deadline does not follow creation.
    pub fn from_persisted(data: PersistedQuestData) -> Result<Self, InvalidRecordError> {
        let is_completed = data.status == QuestStatus::Completed;
        if is_completed != data.completion_evidence_uri.is_some() {
            return Err(InvalidRecordError::InconsistentCompletionEvidence(
                data.status,
            ));
        }
        if data.nomination_evidence_uri.is_some() && data.nominator_id.is_none() {
            return Err(InvalidRecordError::NominationEvidenceWithoutNominator);
        }
        if data
            .expires_at
            .is_some_and(|deadline| deadline <= data.created_at)
        {
            return Err(InvalidRecordError::ExpiryNotAfterCreation);
        }

        Ok(Self {
            quest_id: data.quest_id,
            storage_id: data.storage_id,
            assignee_id: data.assignee_id,
            nominator_id: data.nominator_id,
            nomination_evidence_uri: data.nomination_evidence_uri,
            predecessor_quest_id: data.predecessor_quest_id,
            target_category: data.target_category,
            status: data.status,
            completion_evidence_uri: data.completion_evidence_uri,
            created_at: data.created_at,
            expires_at: data.expires_at,
            closed_at: data.closed_at,
            points_awarded: data.points_awarded,
        })
    }

    /// Returns the evidence a nomination from this quest would carry.
    ///
    /// # Errors
    ///
    /// Returns [`QuestDomainError::Precondition`] unless the quest is
    /// completed and carries completion evidence.
    pub fn nomination_evidence(&self) -> Result<&EvidenceUri, QuestDomainError> {
        if self.status != QuestStatus::Completed {
            return Err(QuestDomainError::Precondition {
                quest_id: self.quest_id,
                reason: "predecessor is not completed",
            });
        }
        self.completion_evidence_uri
            .as_ref()
            .ok_or(QuestDomainError::Precondition {
                quest_id: self.quest_id,
                reason: "predecessor has no completion evidence",
            })
    }

    /// Records the quest that this one continues.
    #[must_use]
    pub fn continuing_from(mut self, predecessor: QuestId) -> Self {
        self.predecessor_quest_id = Some(predecessor);
        self
    }

    /// Returns the quest identifier.
    #[must_use]
    pub const fn quest_id(&self) -> QuestId {
        self.quest_id
    }

    /// Returns the store-assigned identifier, if saved.
    #[must_use]
    pub const fn storage_id(&self) -> Option<StorageId> {
        self.storage_id
    }

    /// Returns the assignee.
    #[must_use]
    pub const fn assignee_id(&self) -> &UserId {
        &self.assignee_id
    }

    /// Returns the nominating user, if any.
    #[must_use]
    pub const fn nominator_id(&self) -> Option<&UserId> {
        self.nominator_id.as_ref()
    }

    /// Returns the nominator's completion evidence, if any.
    #[must_use]
    pub const fn nomination_evidence_uri(&self) -> Option<&EvidenceUri> {
        self.nomination_evidence_uri.as_ref()
    }

    /// Returns the predecessor quest identifier, if any.
    #[must_use]
    pub const fn predecessor_quest_id(&self) -> Option<QuestId> {
        self.predecessor_quest_id
    }

    /// Returns the requested deed category.
    #[must_use]
    pub const fn target_category(&self) -> &QuestCategory {
        &self.target_category
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> QuestStatus {
        self.status
    }

    /// Returns this quest's completion evidence, if completed.
    #[must_use]
    pub const fn completion_evidence_uri(&self) -> Option<&EvidenceUri> {
        self.completion_evidence_uri.as_ref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the deadline, if any.
    #[must_use]
    pub const fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Returns the timestamp of the terminal transition, if any.
    #[must_use]
    pub const fn closed_at(&self) -> Option<DateTime<Utc>> {
        self.closed_at
    }

    /// Returns the awarded points, if scored.
    #[must_use]
    pub const fn points_awarded(&self) -> Option<i64> {
        self.points_awarded
    }

    /// Returns `true` when the deadline has passed at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        is_expired(self, now)
    }

    /// Returns the time left before the deadline, clamped at zero.
    ///
    /// Returns `None` for quests without a deadline.
    #[must_use]
    pub fn remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.expires_at
            .map(|deadline| (deadline - now).max(Duration::zero()))
    }

    /// Marks the quest completed with the supplied evidence.
    ///
    /// Expiry precedence is enforced by the lifecycle service; this method
    /// only validates the status transition.
    ///
    /// # Errors
    ///
    /// Returns [`QuestDomainError::InvalidTransition`] unless the quest is
    /// pending.
    pub fn complete(
        &mut self,
        evidence_uri: EvidenceUri,
        clock: &impl Clock,
    ) -> Result<(), QuestDomainError> {
        self.ensure_transition(QuestStatus::Completed)?;
        self.status = QuestStatus::Completed;
        self.completion_evidence_uri = Some(evidence_uri);
        self.closed_at = Some(now_micros(clock));
        Ok(())
    }

    /// Marks the quest as retired by the system after its deadline.
    ///
    /// # Errors
    ///
    /// Returns [`QuestDomainError::InvalidTransition`] unless the quest is
    /// pending.
    pub fn expire(&mut self, clock: &impl Clock) -> Result<(), QuestDomainError> {
        self.ensure_transition(QuestStatus::ExpiredBySystem)?;
        self.status = QuestStatus::ExpiredBySystem;
        self.closed_at = Some(now_micros(clock));
        Ok(())
    }

    /// Records the store-assigned identifier after the first insert.
    ///
    /// # Errors
    ///
    /// Returns [`QuestDomainError::StorageIdAlreadyAssigned`] when an
    /// identifier is already present.
    pub fn assign_storage_id(&mut self, storage_id: StorageId) -> Result<(), QuestDomainError> {
        if self.storage_id.is_some() {
            return Err(QuestDomainError::StorageIdAlreadyAssigned(self.quest_id));
        }
        self.storage_id = Some(storage_id);
        Ok(())
    }

    /// Records points granted by the scoring collaborator.
    pub const fn award_points(&mut self, points: i64) {
        self.points_awarded = Some(points);
    }

    fn ensure_transition(&self, target: QuestStatus) -> Result<(), QuestDomainError> {
        if self.status.can_transition_to(target) {
            return Ok(());
        }
        Err(QuestDomainError::InvalidTransition {
            quest_id: self.quest_id,
            from: self.status,
            to: target,
        })
    }
}

/// Reads the clock at the microsecond precision stores keep.
fn now_micros(clock: &impl Clock) -> DateTime<Utc> {
    clock.utc().trunc_subsecs(6)
}
