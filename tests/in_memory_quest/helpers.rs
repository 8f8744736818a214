//! Shared helpers for in-memory quest integration tests.

use chrono::{DateTime, TimeZone, Utc};
use questline::quest::{
    adapters::{clock::ManualClock, memory::InMemoryQuestStore, picker::RandomPicker},
    domain::{QuestCategory, UserId},
    services::{QuestLifecycleService, QuestPolicy},
};
use rstest::fixture;
use std::sync::Arc;

/// Service type used by the integration tests.
pub type TestService = QuestLifecycleService<InMemoryQuestStore, RandomPicker, ManualClock>;

/// Service plus handles on the store and clock it uses.
pub struct Setup {
    pub service: TestService,
    pub store: Arc<InMemoryQuestStore>,
    pub clock: ManualClock,
}

/// Fixed starting instant for the manual clock.
#[must_use]
pub fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 1, 9, 30, 0)
        .single()
        .expect("valid fixed timestamp")
}

/// Builds a user identifier, panicking on blank input.
#[must_use]
pub fn user(id: &str) -> UserId {
    UserId::new(id).expect("valid user id")
}

/// Builds a category, panicking on blank input.
#[must_use]
pub fn category(label: &str) -> QuestCategory {
    QuestCategory::new(label).expect("valid category")
}

/// Wires a service with the given policy over a fresh store.
#[must_use]
pub fn setup_with_policy(policy: QuestPolicy) -> Setup {
    let store = Arc::new(InMemoryQuestStore::new());
    let clock = ManualClock::new(start());
    let service = QuestLifecycleService::new(
        Arc::clone(&store),
        Arc::new(RandomPicker::seeded(2026)),
        Arc::new(clock.clone()),
    )
    .with_policy(policy);
    Setup {
        service,
        store,
        clock,
    }
}

/// Provides a service with the default policy.
#[fixture]
pub fn setup() -> Setup {
    setup_with_policy(QuestPolicy::default())
}

/// Provides a fresh store.
#[fixture]
pub fn store() -> InMemoryQuestStore {
    InMemoryQuestStore::new()
}

/// Provides a clock frozen at [`start`].
#[fixture]
pub fn clock() -> ManualClock {
    ManualClock::new(start())
}
