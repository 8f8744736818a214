//! BDD scenarios for the quest lifecycle.

mod given;
mod then;
#[path = "world.rs"]
mod world_state;

use rstest_bdd_macros::scenario;
use world_state::{QuestWorld, world};

#[scenario(
    path = "tests/features/quest_lifecycle.feature",
    name = "Expired quest is replaced by a system quest"
)]
#[tokio::test(flavor = "multi_thread")]
async fn expired_quest_is_replaced(world: QuestWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/quest_lifecycle.feature",
    name = "Expiry before the deadline leaves the quest alone"
)]
#[tokio::test(flavor = "multi_thread")]
async fn expiry_before_deadline_is_ignored(world: QuestWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/quest_lifecycle.feature",
    name = "Completing a quest nominates a friend"
)]
#[tokio::test(flavor = "multi_thread")]
async fn completion_nominates_friend(world: QuestWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/quest_lifecycle.feature",
    name = "Completing a quest without friends renews it"
)]
#[tokio::test(flavor = "multi_thread")]
async fn completion_without_friends_renews(world: QuestWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/quest_lifecycle.feature",
    name = "Late completion is treated as expiry"
)]
#[tokio::test(flavor = "multi_thread")]
async fn late_completion_expires(world: QuestWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/quest_lifecycle.feature",
    name = "A quest cannot be completed twice"
)]
#[tokio::test(flavor = "multi_thread")]
async fn double_completion_is_rejected(world: QuestWorld) {
    let _ = world;
}
