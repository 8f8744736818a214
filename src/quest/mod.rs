//! Quest lifecycle management.
//!
//! A quest is a time-boxed good deed assigned to a user. Completing one
//! nominates a random friend (carrying the completion evidence forward) or,
//! with no eligible friends, renews the user's own quest. A quest past its
//! deadline is retired and replaced by a system quest, and expiry always
//! wins over a late completion. Retired records are deleted; continuations
//! are new quests linked through `predecessor_quest_id`. The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
