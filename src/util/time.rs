//! Tick/time utilities for demo records

/// Tick rate of every in-record timestamp
pub const TICK_RATE: i32 = 100; // 100 ticks per second

/// Ticks from `from` to `to`, widened so any pair of record ticks fits
pub fn tick_span(from: i32, to: i32) -> i64 {
    i64::from(to) - i64::from(from)
}

/// Convert a tick delta or a summed tick count to seconds
pub fn ticks_to_secs(ticks: i64) -> f64 {
    ticks as f64 / TICK_RATE as f64
}

/// Convert seconds to whole ticks
pub const fn secs_to_ticks(secs: i32) -> i32 {
    secs * TICK_RATE
}

/// Linear interpolation between `a` and `b`
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
