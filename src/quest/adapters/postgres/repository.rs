//! `PostgreSQL` store implementation for quest records.

use super::{
    models::{NewQuestRow, QuestRow},
    schema::quests,
};
use crate::quest::{
    domain::{
        EvidenceUri, PersistedQuestData, Quest, QuestCategory, QuestId, QuestStatus, StorageId,
        UserId,
    },
    ports::{QuestStore, QuestStoreError, QuestStoreResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by quest adapters.
pub type QuestPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed quest store.
#[derive(Debug, Clone)]
pub struct PostgresQuestStore {
    pool: QuestPgPool,
}

impl PostgresQuestStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: QuestPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> QuestStoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> QuestStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(QuestStoreError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(QuestStoreError::persistence)?
    }
}

#[async_trait]
impl QuestStore for PostgresQuestStore {
    async fn insert(&self, quest: &Quest) -> QuestStoreResult<StorageId> {
        let quest_id = quest.quest_id();
        let new_row = to_new_row(quest);

        self.run_blocking(move |connection| {
            diesel::insert_into(quests::table)
                .values(&new_row)
                .returning(quests::storage_id)
                .get_result::<i64>(connection)
                .map(StorageId::new)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        QuestStoreError::DuplicateQuest(quest_id)
                    }
                    _ => QuestStoreError::persistence(err),
                })
        })
        .await
    }

    async fn update(&self, storage_id: StorageId, quest: &Quest) -> QuestStoreResult<()> {
        let quest_id = quest.quest_id();
        let changes = to_new_row(quest);

        self.run_blocking(move |connection| {
            let updated = diesel::update(quests::table.find(storage_id.value()))
                .set(&changes)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        QuestStoreError::DuplicateQuest(quest_id)
                    }
                    _ => QuestStoreError::persistence(err),
                })?;
            if updated == 0 {
                return Err(QuestStoreError::NotFound(storage_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_quest_id(&self, quest_id: QuestId) -> QuestStoreResult<Option<Quest>> {
        self.run_blocking(move |connection| {
            let row = quests::table
                .filter(quests::quest_id.eq(quest_id.into_inner()))
                .select(QuestRow::as_select())
                .first::<QuestRow>(connection)
                .optional()
                .map_err(QuestStoreError::persistence)?;
            row.map(row_to_quest).transpose()
        })
        .await
    }

    async fn find_by_storage_id(&self, storage_id: StorageId) -> QuestStoreResult<Option<Quest>> {
        self.run_blocking(move |connection| {
            let row = quests::table
                .find(storage_id.value())
                .select(QuestRow::as_select())
                .first::<QuestRow>(connection)
                .optional()
                .map_err(QuestStoreError::persistence)?;
            row.map(row_to_quest).transpose()
        })
        .await
    }

    async fn find_for_user(
        &self,
        assignee_id: &UserId,
        status: Option<QuestStatus>,
    ) -> QuestStoreResult<Vec<Quest>> {
        let assignee = assignee_id.as_str().to_owned();
        self.run_blocking(move |connection| {
            let mut query = quests::table
                .filter(quests::assignee_id.eq(assignee))
                .select(QuestRow::as_select())
                .order((quests::created_at.asc(), quests::storage_id.asc()))
                .into_boxed();
            if let Some(wanted) = status {
                query = query.filter(quests::status.eq(wanted.as_str()));
            }
            let rows = query
                .load::<QuestRow>(connection)
                .map_err(QuestStoreError::persistence)?;
            rows.into_iter().map(row_to_quest).collect()
        })
        .await
    }

    async fn delete_by_quest_id(&self, quest_id: QuestId) -> QuestStoreResult<u64> {
        self.run_blocking(move |connection| {
            let deleted =
                diesel::delete(quests::table.filter(quests::quest_id.eq(quest_id.into_inner())))
                    .execute(connection)
                    .map_err(QuestStoreError::persistence)?;
            u64::try_from(deleted).map_err(QuestStoreError::persistence)
        })
        .await
    }
}

fn to_new_row(quest: &Quest) -> NewQuestRow {
    NewQuestRow {
        quest_id: quest.quest_id().into_inner(),
        assignee_id: quest.assignee_id().as_str().to_owned(),
        nominator_id: quest.nominator_id().map(|id| id.as_str().to_owned()),
        nomination_evidence_uri: quest
            .nomination_evidence_uri()
            .map(|uri| uri.as_str().to_owned()),
        predecessor_quest_id: quest.predecessor_quest_id().map(QuestId::into_inner),
        target_category: quest.target_category().as_str().to_owned(),
        status: quest.status().as_str().to_owned(),
        completion_evidence_uri: quest
            .completion_evidence_uri()
            .map(|uri| uri.as_str().to_owned()),
        created_at: quest.created_at(),
        expires_at: quest.expires_at(),
        closed_at: quest.closed_at(),
        points_awarded: quest.points_awarded(),
    }
}

fn row_to_quest(row: QuestRow) -> QuestStoreResult<Quest> {
    let QuestRow {
        storage_id,
        quest_id,
        assignee_id,
        nominator_id,
        nomination_evidence_uri,
        predecessor_quest_id,
        target_category,
        status,
        completion_evidence_uri,
        created_at,
        expires_at,
        closed_at,
        points_awarded,
    } = row;

    let data = PersistedQuestData {
        quest_id: QuestId::from_uuid(quest_id),
        storage_id: Some(StorageId::new(storage_id)),
        assignee_id: UserId::new(assignee_id).map_err(QuestStoreError::persistence)?,
        nominator_id: nominator_id
            .map(UserId::new)
            .transpose()
            .map_err(QuestStoreError::persistence)?,
        nomination_evidence_uri: nomination_evidence_uri
            .map(EvidenceUri::new)
            .transpose()
            .map_err(QuestStoreError::persistence)?,
        predecessor_quest_id: predecessor_quest_id.map(QuestId::from_uuid),
        target_category: QuestCategory::new(target_category)
            .map_err(QuestStoreError::persistence)?,
        status: QuestStatus::try_from(status.as_str()).map_err(QuestStoreError::persistence)?,
        completion_evidence_uri: completion_evidence_uri
            .map(EvidenceUri::new)
            .transpose()
            .map_err(QuestStoreError::persistence)?,
        created_at,
        expires_at,
        closed_at,
        points_awarded,
    };
    Quest::from_persisted(data).map_err(QuestStoreError::persistence)
}
