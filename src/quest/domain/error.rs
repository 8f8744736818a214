//! Error types for quest domain validation, transitions, and record loading.

use super::{QuestId, QuestStatus};
use thiserror::Error;

/// Errors returned while constructing or transitioning quests.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QuestDomainError {
    /// The requested quest duration is not positive, is finer than a
    /// microsecond, or puts the deadline out of range.
    #[error("invalid quest duration of {seconds}s")]
    InvalidDuration {
        /// Requested duration in whole seconds.
        seconds: i64,
    },

    /// A nomination was requested from a predecessor that cannot nominate.
    #[error("quest {quest_id} cannot nominate: {reason}")]
    Precondition {
        /// The predecessor quest.
        quest_id: QuestId,
        /// Which precondition failed.
        reason: &'static str,
    },

    /// The quest is not in a state that permits the requested transition.
    #[error("invalid quest transition for {quest_id}: {from} -> {to}")]
    InvalidTransition {
        /// The quest being transitioned.
        quest_id: QuestId,
        /// Current status.
        from: QuestStatus,
        /// Requested status.
        to: QuestStatus,
    },

    /// An identifier value was blank.
    #[error("{0} must not be empty")]
    EmptyIdentifier(&'static str),

    /// A category pool was built without any categories.
    #[error("category pool must contain at least one category")]
    EmptyCategoryPool,

    /// The quest already carries a storage identifier.
    #[error("quest {0} already has a storage identifier")]
    StorageIdAlreadyAssigned(QuestId),
}

/// Errors returned while loading a quest from its persisted record.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvalidRecordError {
    /// A required field is absent.
    #[error("quest record is missing required field '{0}'")]
    MissingField(&'static str),

    /// The quest identifier is not a UUID.
    #[error("malformed quest identifier in field '{field}': {value}")]
    MalformedQuestId {
        /// The offending field.
        field: &'static str,
        /// The raw value.
        value: String,
    },

    /// The status string is not a known quest status.
    #[error(transparent)]
    UnknownStatus(#[from] ParseQuestStatusError),

    /// A field value failed domain validation.
    #[error("invalid value in field '{field}': {source}")]
    InvalidField {
        /// The offending field.
        field: &'static str,
        /// The underlying validation failure.
        source: QuestDomainError,
    },

    /// A timestamp could not be parsed.
    #[error("unparseable timestamp '{0}'")]
    MalformedTimestamp(String),

    /// Completion evidence presence disagrees with the status.
    #[error("completion evidence must be present if and only if status is completed (status {0})")]
    InconsistentCompletionEvidence(QuestStatus),

    /// Nomination evidence was recorded without a nominator.
    #[error("nomination evidence requires a nominator")]
    NominationEvidenceWithoutNominator,

    /// The expiry timestamp does not follow the creation timestamp.
    #[error("expires_at must be strictly after created_at")]
    ExpiryNotAfterCreation,

    /// The payload is not a well-formed record.
    #[error("malformed quest record: {0}")]
    Malformed(String),
}

/// Error returned while parsing quest statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown quest status: {0}")]
pub struct ParseQuestStatusError(pub String);
