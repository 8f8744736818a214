//! Flat persisted form of a quest and conversion to and from the aggregate.
//!
//! Every attribute is written, absent values as explicit `null`. Loading
//! accepts naive timestamps and treats them as UTC.

use super::{
    EvidenceUri, InvalidRecordError, PersistedQuestData, Quest, QuestCategory, QuestDomainError,
    QuestId, QuestStatus, StorageId, UserId,
};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Naive timestamp layouts accepted on load, in order of preference.
const NAIVE_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Flat mapping of every quest attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestRecord {
    /// Application-level identifier; generated on load when absent.
    #[serde(default)]
    pub quest_id: Option<String>,
    /// Store-assigned identifier.
    #[serde(default)]
    pub storage_id: Option<i64>,
    /// User who must complete the quest. Required.
    #[serde(default)]
    pub assignee_id: Option<String>,
    /// Nominating user.
    #[serde(default)]
    pub nominator_id: Option<String>,
    /// Nominator's completion evidence.
    #[serde(default)]
    pub nomination_evidence_uri: Option<String>,
    /// Quest whose retirement produced this one.
    #[serde(default)]
    pub predecessor_quest_id: Option<String>,
    /// Requested deed category. Required.
    #[serde(default)]
    pub target_category: Option<String>,
    /// Lifecycle status; `pending` when absent.
    #[serde(default)]
    pub status: Option<String>,
    /// This quest's completion evidence.
    #[serde(default)]
    pub completion_evidence_uri: Option<String>,
    /// Creation timestamp. Required.
    #[serde(default, with = "lenient_utc")]
    pub created_at: Option<DateTime<Utc>>,
    /// Deadline.
    #[serde(default, with = "lenient_utc")]
    pub expires_at: Option<DateTime<Utc>>,
    /// Terminal transition timestamp.
    #[serde(default, with = "lenient_utc")]
    pub closed_at: Option<DateTime<Utc>>,
    /// Points granted by the scoring collaborator.
    #[serde(default)]
    pub points_awarded: Option<i64>,
}

impl Quest {
    /// Converts the quest into its flat persisted form.
    #[must_use]
    pub fn to_record(&self) -> QuestRecord {
        QuestRecord {
            quest_id: Some(self.quest_id().to_string()),
            storage_id: self.storage_id().map(StorageId::value),
            assignee_id: Some(self.assignee_id().as_str().to_owned()),
            nominator_id: self.nominator_id().map(|id| id.as_str().to_owned()),
            nomination_evidence_uri: self
                .nomination_evidence_uri()
                .map(|uri| uri.as_str().to_owned()),
            predecessor_quest_id: self.predecessor_quest_id().map(|id| id.to_string()),
            target_category: Some(self.target_category().as_str().to_owned()),
            status: Some(self.status().as_str().to_owned()),
            completion_evidence_uri: self
                .completion_evidence_uri()
                .map(|uri| uri.as_str().to_owned()),
            created_at: Some(self.created_at()),
            expires_at: self.expires_at(),
            closed_at: self.closed_at(),
            points_awarded: self.points_awarded(),
        }
    }

    /// Serializes the quest record as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidRecordError::Malformed`] if serialization fails.
    pub fn to_json(&self) -> Result<String, InvalidRecordError> {
        serde_json::to_string(&self.to_record())
            .map_err(|err| InvalidRecordError::Malformed(err.to_string()))
    }

    /// Loads a quest from a JSON record.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidRecordError`] when the payload is not a record or the
    /// record is invalid.
    pub fn from_json(payload: &str) -> Result<Self, InvalidRecordError> {
        let record: QuestRecord = serde_json::from_str(payload)
            .map_err(|err| InvalidRecordError::Malformed(err.to_string()))?;
        Self::try_from(record)
    }
}

impl TryFrom<QuestRecord> for Quest {
    type Error = InvalidRecordError;

    fn try_from(record: QuestRecord) -> Result<Self, Self::Error> {
        let assignee_raw = record
            .assignee_id
            .ok_or(InvalidRecordError::MissingField("assignee_id"))?;
        let category_raw = record
            .target_category
            .ok_or(InvalidRecordError::MissingField("target_category"))?;
        let created_at = record
            .created_at
            .ok_or(InvalidRecordError::MissingField("created_at"))?;

        let quest_id = match record.quest_id {
            Some(raw) => parse_quest_id("quest_id", &raw)?,
            None => QuestId::new(),
        };
        let predecessor_quest_id = record
            .predecessor_quest_id
            .map(|raw| parse_quest_id("predecessor_quest_id", &raw))
            .transpose()?;
        let status = match record.status {
            Some(raw) => QuestStatus::try_from(raw.as_str())?,
            None => QuestStatus::Pending,
        };

        let data = PersistedQuestData {
            quest_id,
            storage_id: record.storage_id.map(StorageId::new),
            assignee_id: field("assignee_id", UserId::new(assignee_raw))?,
            nominator_id: record
                .nominator_id
                .map(|raw| field("nominator_id", UserId::new(raw)))
                .transpose()?,
            nomination_evidence_uri: record
                .nomination_evidence_uri
                .map(|raw| field("nomination_evidence_uri", EvidenceUri::new(raw)))
                .transpose()?,
            predecessor_quest_id,
            target_category: field("target_category", QuestCategory::new(category_raw))?,
            status,
            completion_evidence_uri: record
                .completion_evidence_uri
                .map(|raw| field("completion_evidence_uri", EvidenceUri::new(raw)))
                .transpose()?,
            created_at,
            expires_at: record.expires_at,
            closed_at: record.closed_at,
            points_awarded: record.points_awarded,
        };
        Self::from_persisted(data)
    }
}

fn field<T>(
    name: &'static str,
    result: Result<T, QuestDomainError>,
) -> Result<T, InvalidRecordError> {
    result.map_err(|source| InvalidRecordError::InvalidField {
        field: name,
        source,
    })
}

fn parse_quest_id(name: &'static str, raw: &str) -> Result<QuestId, InvalidRecordError> {
    Uuid::parse_str(raw.trim())
        .map(QuestId::from_uuid)
        .map_err(|_| InvalidRecordError::MalformedQuestId {
            field: name,
            value: raw.to_owned(),
        })
}

/// Parses a timestamp, normalizing offsets to UTC and reading naive values as
/// UTC.
///
/// # Errors
///
/// Returns [`InvalidRecordError::MalformedTimestamp`] when no supported layout
/// matches.
pub fn parse_utc_timestamp(value: &str) -> Result<DateTime<Utc>, InvalidRecordError> {
    let trimmed = value.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(trimmed, layout).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| InvalidRecordError::MalformedTimestamp(value.to_owned()))
}

mod lenient_utc {
    use super::parse_utc_timestamp;
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(timestamp) => serializer
                .serialize_some(&timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        raw.map(|value| parse_utc_timestamp(&value).map_err(serde::de::Error::custom))
            .transpose()
    }
}
