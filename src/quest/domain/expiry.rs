//! Quest deadlines: validated durations and the expiry predicate.

use super::{Quest, QuestDomainError};
use chrono::{DateTime, Duration, Utc};

/// Unix seconds of 9999-12-31T23:59:59Z, the last instant RFC 3339 can write.
const LATEST_DEADLINE_SECS: i64 = 253_402_300_799;

/// Strictly positive lifetime of a quest, in whole microseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QuestDuration(Duration);

impl QuestDuration {
    /// Lifetime given to quests when no other duration is configured.
    pub const DEFAULT_SECONDS: i64 = 24 * 60 * 60;

    /// Creates a validated duration.
    ///
    /// # Errors
    ///
    /// Returns [`QuestDomainError::InvalidDuration`] when the duration is zero,
    /// negative, or finer than a microsecond.
    pub fn new(duration: Duration) -> Result<Self, QuestDomainError> {
        if duration <= Duration::zero() || duration.subsec_nanos().rem_euclid(1_000) != 0 {
            return Err(QuestDomainError::InvalidDuration {
                seconds: duration.num_seconds(),
            });
        }
        Ok(Self(duration))
    }

    /// Creates a validated duration from whole seconds.
    ///
    /// # Errors
    ///
    /// Returns [`QuestDomainError::InvalidDuration`] when `seconds` is not
    /// positive or too large to represent.
    pub fn from_secs(seconds: i64) -> Result<Self, QuestDomainError> {
        let duration =
            Duration::try_seconds(seconds).ok_or(QuestDomainError::InvalidDuration { seconds })?;
        Self::new(duration)
    }

    /// Returns the wrapped duration.
    #[must_use]
    pub const fn as_duration(self) -> Duration {
        self.0
    }

    /// Returns the deadline for a quest created at `created_at`.
    ///
    /// # Errors
    ///
    /// Returns [`QuestDomainError::InvalidDuration`] when the deadline
    /// overflows or falls after the year 9999.
    pub fn deadline_from(
        self,
        created_at: DateTime<Utc>,
    ) -> Result<DateTime<Utc>, QuestDomainError> {
        created_at
            .checked_add_signed(self.0)
            .filter(|deadline| deadline.timestamp() <= LATEST_DEADLINE_SECS)
            .ok_or(QuestDomainError::InvalidDuration {
                seconds: self.0.num_seconds(),
            })
    }
}

impl Default for QuestDuration {
    fn default() -> Self {
        Self(Duration::seconds(Self::DEFAULT_SECONDS))
    }
}

/// Returns `true` when `quest` has a deadline and `now` is past it.
///
/// A quest without `expires_at` never expires. Domain constructors always set
/// a deadline, so this only applies to records loaded from older data.
#[must_use]
pub fn is_expired(quest: &Quest, now: DateTime<Utc>) -> bool {
    quest.expires_at().is_some_and(|deadline| now > deadline)
}
