//! Application services for quest generation and lifecycle orchestration.

mod generator;
mod lifecycle;
mod policy;

pub use generator::QuestGenerator;
pub use lifecycle::{
    CompleteQuestRequest, ContinuationKind, QuestLifecycleError, QuestLifecycleResult,
    QuestLifecycleService, QuestTransition,
};
pub use policy::QuestPolicy;
