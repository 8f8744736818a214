//! Selection port for the random choices made while chaining quests.

use crate::quest::domain::{CategoryPool, QuestCategory, UserId};

/// Chooses the nominated friend and the category of the next quest.
///
/// Implementations should choose uniformly. Keeping the choice behind a port
/// leaves the lifecycle service deterministic for a given picker.
pub trait QuestPicker: Send + Sync {
    /// Picks one friend from `candidates`, or `None` when the slice is empty.
    fn pick_friend<'a>(&self, candidates: &'a [UserId]) -> Option<&'a UserId>;

    /// Picks one category from `pool`, or `None` when the pool is empty.
    fn pick_category<'a>(&self, pool: &'a CategoryPool) -> Option<&'a QuestCategory>;
}
