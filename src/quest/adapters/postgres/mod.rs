//! `PostgreSQL` adapter for quest persistence.

mod models;
mod repository;
mod schema;

pub use repository::{PostgresQuestStore, QuestPgPool};
