//! Port contracts for quest lifecycle management.
//!
//! Ports define infrastructure-agnostic interfaces used by quest services.

pub mod picker;
pub mod store;

pub use picker::QuestPicker;
pub use store::{QuestStore, QuestStoreError, QuestStoreResult};
