//! Shared utilities

pub mod range;
pub mod time;

pub use range::{range_by_tick, Ticked};
