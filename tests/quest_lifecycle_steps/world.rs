//! Shared world state for quest lifecycle BDD scenarios.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use questline::quest::{
    adapters::{clock::ManualClock, memory::InMemoryQuestStore, picker::RandomPicker},
    domain::{Quest, UserId},
    services::{QuestLifecycleError, QuestLifecycleService, QuestTransition},
};
use rstest::fixture;

/// Service type used by the BDD world.
pub type TestQuestService = QuestLifecycleService<InMemoryQuestStore, RandomPicker, ManualClock>;

/// Scenario world for quest lifecycle behaviour tests.
pub struct QuestWorld {
    pub service: TestQuestService,
    pub store: Arc<InMemoryQuestStore>,
    pub clock: ManualClock,
    pub quest: Option<Quest>,
    pub last_transition: Option<QuestTransition>,
    pub last_expiry_skipped: bool,
    pub last_error: Option<QuestLifecycleError>,
}

impl QuestWorld {
    /// Creates a world with a fresh store and a clock at a fixed instant.
    #[must_use]
    pub fn new() -> Self {
        let start = Utc
            .with_ymd_and_hms(2026, 3, 14, 12, 0, 0)
            .single()
            .expect("valid fixed timestamp");
        let store = Arc::new(InMemoryQuestStore::new());
        let clock = ManualClock::new(start);
        let service = QuestLifecycleService::new(
            Arc::clone(&store),
            Arc::new(RandomPicker::seeded(7)),
            Arc::new(clock.clone()),
        );

        Self {
            service,
            store,
            clock,
            quest: None,
            last_transition: None,
            last_expiry_skipped: false,
            last_error: None,
        }
    }

    /// Returns the quest set up by the scenario.
    ///
    /// # Errors
    ///
    /// Returns an error when no quest has been created yet.
    pub fn quest(&self) -> Result<&Quest, eyre::Report> {
        self.quest
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing quest in scenario world"))
    }

    /// Returns the last transition produced by a step.
    ///
    /// # Errors
    ///
    /// Returns an error when no transition was recorded.
    pub fn transition(&self) -> Result<&QuestTransition, eyre::Report> {
        self.last_transition
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing transition in scenario world"))
    }
}

impl Default for QuestWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> QuestWorld {
    QuestWorld::default()
}

/// Splits a comma-separated list of user identifiers.
///
/// # Errors
///
/// Returns an error when an entry is blank.
pub fn parse_users(list: &str) -> Result<Vec<UserId>, eyre::Report> {
    list.split(',')
        .map(str::trim)
        .map(|id| UserId::new(id).map_err(eyre::Report::from))
        .collect()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
