//! Given steps for quest lifecycle BDD scenarios.

use super::world_state::{QuestWorld, run_async};
use eyre::WrapErr;
use questline::quest::{
    domain::{EvidenceUri, Quest, QuestCategory, QuestDuration, UserId},
    services::CompleteQuestRequest,
};
use rstest_bdd_macros::given;

#[given(r#"a quest for "{assignee}" in category "{category}" lasting {seconds:i64} seconds"#)]
fn quest_for_user(
    world: &mut QuestWorld,
    assignee: String,
    category: String,
    seconds: i64,
) -> Result<(), eyre::Report> {
    let quest = Quest::new_system(
        UserId::new(assignee)?,
        QuestCategory::new(category)?,
        QuestDuration::from_secs(seconds)?,
        &world.clock,
    )?;
    let stored = run_async(world.service.store_quest(quest)).wrap_err("store scenario quest")?;
    world.quest = Some(stored);
    Ok(())
}

#[given(r#"the quest has been completed with evidence "{evidence}""#)]
fn quest_already_completed(world: &mut QuestWorld, evidence: String) -> Result<(), eyre::Report> {
    let quest = world.quest()?.clone();
    let transition = run_async(
        world
            .service
            .complete(quest, CompleteQuestRequest::new(EvidenceUri::new(evidence)?)),
    )
    .wrap_err("complete quest in scenario setup")?;
    world.last_transition = Some(transition);
    Ok(())
}
