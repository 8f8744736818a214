//! Domain model for the quest lifecycle.
//!
//! Quests are issued by the system or through a friend's nomination, move
//! one way from pending to a terminal status, and are never updated after
//! retirement. Persistence and randomness stay outside this boundary.

mod category;
mod error;
mod expiry;
mod ids;
mod quest;
mod record;

pub use category::{CategoryPool, QuestCategory, STANDARD_CATEGORIES};
pub use error::{InvalidRecordError, ParseQuestStatusError, QuestDomainError};
pub use expiry::{QuestDuration, is_expired};
pub use ids::{EvidenceUri, QuestId, StorageId, UserId};
pub use quest::{PersistedQuestData, Quest, QuestStatus};
pub use record::{QuestRecord, parse_utc_timestamp};
