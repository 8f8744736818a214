//! Configuration for quest durations and category selection.

use crate::quest::domain::{CategoryPool, QuestDuration};

/// Tunables applied by the lifecycle service when issuing quests.
///
/// # Examples
///
/// ```
/// use questline::quest::services::QuestPolicy;
///
/// let policy = QuestPolicy::default();
/// assert_eq!(policy.system_duration.as_duration().num_hours(), 24);
/// assert_eq!(policy.category_pool.len(), 8);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuestPolicy {
    /// Lifetime of onboarding, self-renewal, and expiry-replacement quests.
    pub system_duration: QuestDuration,
    /// Lifetime of quests issued through a nomination.
    pub nomination_duration: QuestDuration,
    /// Categories continuation quests are drawn from.
    pub category_pool: CategoryPool,
}

impl QuestPolicy {
    /// Creates a policy that gives every quest the same lifetime.
    #[must_use]
    pub fn with_duration(duration: QuestDuration) -> Self {
        Self {
            system_duration: duration,
            nomination_duration: duration,
            ..Self::default()
        }
    }

    /// Replaces the category pool.
    #[must_use]
    pub fn with_category_pool(mut self, category_pool: CategoryPool) -> Self {
        self.category_pool = category_pool;
        self
    }
}
