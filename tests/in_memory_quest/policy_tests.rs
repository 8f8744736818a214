//! Tests for lifecycle policy knobs.

use super::helpers::{category, setup_with_policy, start, user};
use chrono::Duration;
use questline::quest::{
    domain::{CategoryPool, EvidenceUri, QuestDuration},
    services::{CompleteQuestRequest, QuestPolicy},
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn single_category_pool_is_always_used() -> eyre::Result<()> {
    let pool = CategoryPool::new([category("Tree Planting")])?;
    let setup = setup_with_policy(QuestPolicy::default().with_category_pool(pool));

    let onboarding = setup.service.issue_onboarding_quest(user("U1")).await?;
    let transition = setup
        .service
        .complete(
            onboarding.clone(),
            CompleteQuestRequest::new(EvidenceUri::new("gs://deeds/tree.jpg")?),
        )
        .await?;

    eyre::ensure!(onboarding.target_category() == &category("Tree Planting"));
    eyre::ensure!(transition.next().target_category() == &category("Tree Planting"));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn nomination_and_system_durations_apply_separately() -> eyre::Result<()> {
    let policy = QuestPolicy {
        system_duration: QuestDuration::from_secs(3600)?,
        nomination_duration: QuestDuration::from_secs(7200)?,
        ..QuestPolicy::default()
    };
    let setup = setup_with_policy(policy);

    let onboarding = setup.service.issue_onboarding_quest(user("U1")).await?;
    let transition = setup
        .service
        .complete(
            onboarding.clone(),
            CompleteQuestRequest::new(EvidenceUri::new("gs://deeds/a.jpg")?)
                .with_friends([user("U2")]),
        )
        .await?;

    eyre::ensure!(onboarding.expires_at() == Some(start() + Duration::hours(1)));
    eyre::ensure!(transition.next().expires_at() == Some(start() + Duration::hours(2)));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn uniform_duration_policy_shortens_every_quest() -> eyre::Result<()> {
    let setup = setup_with_policy(QuestPolicy::with_duration(QuestDuration::from_secs(60)?));

    let quest = setup.service.issue_onboarding_quest(user("U1")).await?;
    setup.clock.advance(Duration::seconds(61));
    let transition = setup
        .service
        .expire(quest)
        .await?
        .ok_or_else(|| eyre::eyre!("expected the quest to expire"))?;

    eyre::ensure!(
        transition.next().expires_at()
            == Some(start() + Duration::seconds(61) + Duration::seconds(60))
    );
    Ok(())
}
