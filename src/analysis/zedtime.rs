//! Zed-time statistics

use serde::Serialize;
use tracing::warn;

use crate::record::ZedtimeWindow;
use crate::util::time::{tick_span, ticks_to_secs};

/// Length of a zed-time window that was never extended, in seconds
pub const BASE_ZEDTIME_SECS: f64 = 3.0;

/// Zed-time statistics over a wave or a session.
/// Min/max fields are `None` when there is no data.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ZedtimeAnalytics {
    pub count: u32,
    pub total_duration: f64,
    pub min_duration: Option<f64>,
    pub max_duration: Option<f64>,
    pub avg_duration: f64,
    /// Number of windows that have a predecessor
    pub gap_count: u32,
    pub total_gap: f64,
    pub min_gap: Option<f64>,
    pub max_gap: Option<f64>,
    pub avg_gap: f64,
    pub total_extends: u32,
    pub avg_extends_count: f64,
    pub avg_extend_duration: f64,
}

fn fold_min(current: Option<f64>, value: f64) -> Option<f64> {
    Some(current.map_or(value, |c| c.min(value)))
}

fn fold_max(current: Option<f64>, value: f64) -> Option<f64> {
    Some(current.map_or(value, |c| c.max(value)))
}

/// Ticks from the end of each window to the start of the next one
pub fn ticks_since_last(windows: &[ZedtimeWindow]) -> Vec<i64> {
    windows
        .windows(2)
        .map(|pair| tick_span(pair[0].end_tick, pair[1].start_tick))
        .collect()
}

impl ZedtimeAnalytics {
    /// Statistics over tick-ordered windows
    pub fn from_windows(windows: &[ZedtimeWindow]) -> Self {
        let mut stats = Self::default();

        for window in windows {
            stats.count += 1;
            stats.total_duration += window.duration;
            stats.min_duration = fold_min(stats.min_duration, window.duration);
            stats.max_duration = fold_max(stats.max_duration, window.duration);
            stats.total_extends += window.extends_count;
        }

        for (i, ticks) in ticks_since_last(windows).into_iter().enumerate() {
            if ticks < 0 {
                warn!(
                    start_tick = windows[i + 1].start_tick,
                    previous_end = windows[i].end_tick,
                    ticks,
                    "Zed-time window starts before the previous one ended"
                );
            }
            let gap = ticks_to_secs(ticks);
            stats.gap_count += 1;
            stats.total_gap += gap;
            stats.min_gap = fold_min(stats.min_gap, gap);
            stats.max_gap = fold_max(stats.max_gap, gap);
        }

        stats.update_averages();
        stats
    }

    /// Combine per-wave statistics, skipping waves without min/max data
    pub fn merge<'a>(parts: impl IntoIterator<Item = &'a ZedtimeAnalytics>) -> Self {
        let mut stats = Self::default();

        for part in parts {
            stats.count += part.count;
            stats.total_duration += part.total_duration;
            stats.gap_count += part.gap_count;
            stats.total_gap += part.total_gap;
            stats.total_extends += part.total_extends;

            if let Some(v) = part.min_duration {
                stats.min_duration = fold_min(stats.min_duration, v);
            }
            if let Some(v) = part.max_duration {
                stats.max_duration = fold_max(stats.max_duration, v);
            }
            if let Some(v) = part.min_gap {
                stats.min_gap = fold_min(stats.min_gap, v);
            }
            if let Some(v) = part.max_gap {
                stats.max_gap = fold_max(stats.max_gap, v);
            }
        }

        stats.update_averages();
        stats
    }

    fn update_averages(&mut self) {
        if self.count > 0 {
            self.avg_duration = self.total_duration / self.count as f64;
            self.avg_extends_count = self.total_extends as f64 / self.count as f64;
        }
        if self.gap_count > 0 {
            self.avg_gap = self.total_gap / self.gap_count as f64;
        }
        self.avg_extend_duration = if self.avg_extends_count > 0.0 {
            (self.avg_duration - BASE_ZEDTIME_SECS) / self.avg_extends_count
        } else {
            0.0
        };
    }
}
