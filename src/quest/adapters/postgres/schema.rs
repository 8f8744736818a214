//! Diesel schema for quest persistence.

diesel::table! {
    /// Live quest records, one row per quest.
    quests (storage_id) {
        /// Store-assigned identifier.
        storage_id -> Int8,
        /// Application-level quest identifier.
        quest_id -> Uuid,
        /// Assigned user.
        #[max_length = 255]
        assignee_id -> Varchar,
        /// Nominating user.
        #[max_length = 255]
        nominator_id -> Nullable<Varchar>,
        /// Nominator's completion evidence reference.
        nomination_evidence_uri -> Nullable<Text>,
        /// Quest whose retirement produced this one.
        predecessor_quest_id -> Nullable<Uuid>,
        /// Requested deed category.
        #[max_length = 255]
        target_category -> Varchar,
        /// Lifecycle status.
        #[max_length = 50]
        status -> Varchar,
        /// Completion evidence reference.
        completion_evidence_uri -> Nullable<Text>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Deadline.
        expires_at -> Nullable<Timestamptz>,
        /// Terminal transition timestamp.
        closed_at -> Nullable<Timestamptz>,
        /// Points granted by the scoring collaborator.
        points_awarded -> Nullable<Int8>,
    }
}
