//! Then steps for quest lifecycle BDD scenarios.

use super::world_state::{QuestWorld, parse_users, run_async};
use questline::quest::{
    domain::{QuestStatus, UserId},
    ports::QuestStore,
    services::QuestLifecycleError,
};
use rstest_bdd_macros::then;

#[then(r#"a replacement quest is issued to "{assignee}""#)]
fn replacement_issued(world: &QuestWorld, assignee: String) -> Result<(), eyre::Report> {
    let transition = world.transition()?;
    let original = world.quest()?;
    eyre::ensure!(transition.next().assignee_id() == &UserId::new(assignee)?);
    eyre::ensure!(transition.next().quest_id() != original.quest_id());
    eyre::ensure!(transition.next().status() == QuestStatus::Pending);
    eyre::ensure!(transition.next().predecessor_quest_id() == Some(original.quest_id()));
    Ok(())
}

#[then("no replacement quest is issued")]
fn no_replacement(world: &QuestWorld) -> Result<(), eyre::Report> {
    eyre::ensure!(world.last_expiry_skipped, "expected expiry to be skipped");
    eyre::ensure!(world.last_transition.is_none());
    eyre::ensure!(world.last_error.is_none(), "unexpected error: {:?}", world.last_error);
    Ok(())
}

#[then("the original quest is no longer stored")]
fn original_removed(world: &QuestWorld) -> Result<(), eyre::Report> {
    let quest_id = world.quest()?.quest_id();
    let found = run_async(world.store.find_by_quest_id(quest_id))?;
    eyre::ensure!(found.is_none(), "quest {quest_id} is still stored");
    Ok(())
}

#[then("the original quest is still stored")]
fn original_kept(world: &QuestWorld) -> Result<(), eyre::Report> {
    let original = world.quest()?;
    let found = run_async(world.store.find_by_quest_id(original.quest_id()))?;
    eyre::ensure!(found.as_ref() == Some(original), "expected {original:?}, found {found:?}");
    Ok(())
}

#[then(r#"the next quest is a nomination from "{nominator}" with evidence "{evidence}""#)]
fn next_is_nomination(
    world: &QuestWorld,
    nominator: String,
    evidence: String,
) -> Result<(), eyre::Report> {
    let next = world.transition()?.next();
    eyre::ensure!(next.nominator_id() == Some(&UserId::new(nominator)?));
    eyre::ensure!(
        next.nomination_evidence_uri().map(|uri| uri.as_str()) == Some(evidence.as_str())
    );
    Ok(())
}

#[then(r#"the next quest is assigned to one of "{candidates}""#)]
fn next_assigned_to_one_of(world: &QuestWorld, candidates: String) -> Result<(), eyre::Report> {
    let next = world.transition()?.next();
    let candidates = parse_users(&candidates)?;
    eyre::ensure!(
        candidates.contains(next.assignee_id()),
        "assignee {} not among {candidates:?}",
        next.assignee_id()
    );
    Ok(())
}

#[then("the next quest has no nominator")]
fn next_has_no_nominator(world: &QuestWorld) -> Result<(), eyre::Report> {
    let next = world.transition()?.next();
    eyre::ensure!(next.nominator_id().is_none());
    eyre::ensure!(next.nomination_evidence_uri().is_none());
    Ok(())
}

#[then("the original quest was expired by the system")]
fn original_expired(world: &QuestWorld) -> Result<(), eyre::Report> {
    let retired = world.transition()?.retired();
    eyre::ensure!(retired.status() == QuestStatus::ExpiredBySystem);
    eyre::ensure!(retired.completion_evidence_uri().is_none());
    Ok(())
}

#[then("the completion fails because the quest was already retired")]
fn completion_already_retired(world: &QuestWorld) -> Result<(), eyre::Report> {
    let quest_id = world.quest()?.quest_id();
    let error = world
        .last_error
        .as_ref()
        .ok_or_else(|| eyre::eyre!("expected the completion to fail"))?;
    eyre::ensure!(
        matches!(error, QuestLifecycleError::AlreadyRetired(id) if *id == quest_id),
        "expected AlreadyRetired, got {error:?}"
    );
    eyre::ensure!(world.last_transition.is_none());
    Ok(())
}
