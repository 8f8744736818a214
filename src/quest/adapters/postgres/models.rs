//! Diesel row models for quest persistence.

use super::schema::quests;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for quest records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = quests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct QuestRow {
    /// Store-assigned identifier.
    pub storage_id: i64,
    /// Application-level quest identifier.
    pub quest_id: uuid::Uuid,
    /// Assigned user.
    pub assignee_id: String,
    /// Nominating user.
    pub nominator_id: Option<String>,
    /// Nominator's completion evidence reference.
    pub nomination_evidence_uri: Option<String>,
    /// Quest whose retirement produced this one.
    pub predecessor_quest_id: Option<uuid::Uuid>,
    /// Requested deed category.
    pub target_category: String,
    /// Lifecycle status.
    pub status: String,
    /// Completion evidence reference.
    pub completion_evidence_uri: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Deadline.
    pub expires_at: Option<DateTime<Utc>>,
    /// Terminal transition timestamp.
    pub closed_at: Option<DateTime<Utc>>,
    /// Points granted by the scoring collaborator.
    pub points_awarded: Option<i64>,
}

/// Insert and update model for quest records.
///
/// `None` values are written as `NULL` on update so that clearing a field
/// is persisted.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = quests)]
#[diesel(treat_none_as_null = true)]
pub struct NewQuestRow {
    /// Application-level quest identifier.
    pub quest_id: uuid::Uuid,
    /// Assigned user.
    pub assignee_id: String,
    /// Nominating user.
    pub nominator_id: Option<String>,
    /// Nominator's completion evidence reference.
    pub nomination_evidence_uri: Option<String>,
    /// Quest whose retirement produced this one.
    pub predecessor_quest_id: Option<uuid::Uuid>,
    /// Requested deed category.
    pub target_category: String,
    /// Lifecycle status.
    pub status: String,
    /// Completion evidence reference.
    pub completion_evidence_uri: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Deadline.
    pub expires_at: Option<DateTime<Utc>>,
    /// Terminal transition timestamp.
    pub closed_at: Option<DateTime<Utc>>,
    /// Points granted by the scoring collaborator.
    pub points_awarded: Option<i64>,
}
