//! Questline: good-deed quests that expire, complete, and chain to friends.
//!
//! The crate implements the quest lifecycle state machine: a pending quest
//! either completes (nominating a friend or renewing itself) or expires (and
//! is replaced by a system quest). HTTP, image storage, classification, and
//! the social graph are collaborators that feed the core through plain
//! values.
//!
//! # Architecture
//!
//! Questline follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, randomness,
//!   clocks)
//!
//! # Modules
//!
//! - [`quest`]: Quest records, expiry, generation, and lifecycle orchestration

pub mod quest;
