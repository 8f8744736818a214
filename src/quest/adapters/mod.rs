//! Adapter implementations for quest ports.

pub mod clock;
pub mod memory;
pub mod picker;
pub mod postgres;
