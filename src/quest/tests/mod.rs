//! Unit tests for the quest module.
