//! Uniform random picker backed by `rand`.

use crate::quest::{
    domain::{CategoryPool, QuestCategory, UserId},
    ports::QuestPicker,
};
use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};
use std::sync::{Mutex, PoisonError};

/// Picks friends and categories uniformly at random.
#[derive(Debug)]
pub struct RandomPicker {
    rng: Mutex<StdRng>,
}

impl RandomPicker {
    /// Creates a picker seeded from the operating system.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Creates a picker with a fixed seed so that choices can be replayed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn choose<'a, T>(&self, items: &'a [T]) -> Option<&'a T> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        items.choose(&mut *rng)
    }
}

impl Default for RandomPicker {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl QuestPicker for RandomPicker {
    fn pick_friend<'a>(&self, candidates: &'a [UserId]) -> Option<&'a UserId> {
        self.choose(candidates)
    }

    fn pick_category<'a>(&self, pool: &'a CategoryPool) -> Option<&'a QuestCategory> {
        self.choose(pool.as_slice())
    }
}
