//! Windowed difficulty score
//!
//! A window of [`PERIOD_TICKS`] slides across the wave in [`STEP_TICKS`]
//! steps. Each bucket scores the kill mix, kill speed and zed-time coverage of
//! its window; the bucket scores are then smoothed with an exponentially
//! decaying memory of the preceding buckets.

use serde::Serialize;
use tracing::warn;

use crate::record::{Kill, Wave, ZedtimeWindow};
use crate::util::range::last_less_or_equal_index;
use crate::util::range_by_tick;
use crate::util::time::{lerp, secs_to_ticks, tick_span, TICK_RATE};

use super::summary::KillMix;

pub const PERIOD_TICKS: i32 = 500;
pub const STEP_TICKS: i32 = 100;

/// Kills per point of the density curve
const DENSITY_KILLS: usize = 40;
/// Wave size at which the size bonus saturates
const WAVE_SIZE_CAP: i32 = 411;
const ZEDTIME_MAX_MULTIPLIER: f64 = 4.0;
const ZEDTIME_COOLDOWN_TICKS: i32 = secs_to_ticks(20);
const SPEED_LOOKBACK_TICKS: i32 = secs_to_ticks(30);
const SMOOTHING_SPAN: usize = 15;
/// Buckets scored per wave (about 2.8 h of ticks); later windows are dropped
pub const MAX_BUCKETS: usize = 100_000;

const PLAYER_BONUS: [f64; 7] = [0.0, 3.5, 2.75, 2.25, 1.6, 1.25, 1.0];

/// One scored window
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DifficultyBucket {
    /// Window start
    pub tick: i32,
    pub raw: f64,
    pub smoothed: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DifficultyAnalytics {
    /// Mean smoothed bucket score
    pub score: f64,
    /// Highest smoothed bucket score
    pub peak: f64,
    pub buckets: Vec<DifficultyBucket>,
}

pub fn wave_size_bonus(size: i32) -> f64 {
    if size <= 20 {
        return 0.1;
    }
    lerp(0.1, 1.0, size.min(WAVE_SIZE_CAP) as f64 / WAVE_SIZE_CAP as f64)
}

/// Smaller teams get a larger bonus; beyond six players it keeps shrinking
pub fn player_bonus(players: usize) -> f64 {
    match PLAYER_BONUS.get(players) {
        Some(bonus) => *bonus,
        None => lerp(1.0, 0.5, (players - 6).min(6) as f64 / 6.0),
    }
}

/// Kill-mix bonus, not clamped above
pub fn zeds_bonus(mix: &KillMix, size_bonus: f64, density_ratio: f64) -> f64 {
    let total = mix.trash + mix.medium + mix.large;
    if total == 0 {
        return 0.0;
    }

    let weighted = (mix.trash + mix.medium * 2 + mix.large * 5) as f64 / total as f64;
    ((weighted - 1.0) / 4.0).max(0.0) * size_bonus * density_ratio
}

/// Multiplier from how much of `[from, to]` is covered by zed-time.
///
/// The 20 s after a zed-time window count with a weight falling linearly
/// from 1 to 0.
pub fn zt_bonus(from: i32, to: i32, zedtimes: &[ZedtimeWindow]) -> f64 {
    let len = tick_span(from, to) as f64;
    if len <= 0.0 {
        return 1.0;
    }

    let cooldown_ticks = i64::from(ZEDTIME_COOLDOWN_TICKS);
    let cooldown = cooldown_ticks as f64;
    let (from, to) = (i64::from(from), i64::from(to));
    let mut covered = 0.0;

    for zt in zedtimes {
        let (zt_start, zt_end) = (i64::from(zt.start_tick), i64::from(zt.end_tick));
        let active = (to.min(zt_end) - from.max(zt_start)).max(0);
        covered += active as f64;

        let a = from.max(zt_end);
        let b = to.min(zt_end + cooldown_ticks);
        if a < b {
            let (da, db) = ((a - zt_end) as f64, (b - zt_end) as f64);
            covered += (db - da) - (db * db - da * da) / (2.0 * cooldown);
        }
    }

    1.0 + (ZEDTIME_MAX_MULTIPLIER - 1.0) * (covered / len).min(1.0)
}

/// Zed-time windows that start before the wave ends and whose cooldown tail
/// reaches into the wave
pub(crate) fn zedtimes_near(all: &[ZedtimeWindow], wave: &Wave) -> Vec<ZedtimeWindow> {
    let Some(last) = last_less_or_equal_index(all, wave.end_tick, |z| z.start_tick) else {
        return Vec::new();
    };
    all[..=last]
        .iter()
        .filter(|z| z.end_tick.saturating_add(ZEDTIME_COOLDOWN_TICKS) >= wave.start_tick)
        .copied()
        .collect()
}

/// Kill rate over the last (up to) 40 kills at every kill of the wave
struct DensityCurve<'a> {
    kills: &'a [Kill],
    values: Vec<f64>,
    mean: f64,
}

impl<'a> DensityCurve<'a> {
    fn new(kills: &'a [Kill]) -> Self {
        let values: Vec<f64> = (0..kills.len())
            .map(|i| {
                let n = (i + 1).min(DENSITY_KILLS);
                let ticks = tick_span(kills[i + 1 - n].tick, kills[i].tick);
                let span = ticks as f64 / TICK_RATE as f64;
                n as f64 / span.max(1.0)
            })
            .collect();

        let mean = if values.is_empty() {
            0.0
        } else {
            values.iter().sum::<f64>() / values.len() as f64
        };

        Self {
            kills,
            values,
            mean,
        }
    }

    /// Curve value at the last kill up to `tick`, relative to the curve mean
    fn ratio_at(&self, tick: i32) -> f64 {
        if self.mean <= 0.0 {
            return 1.0;
        }
        let value = last_less_or_equal_index(self.kills, tick, |k| k.tick)
            .map(|idx| self.values[idx])
            .unwrap_or(0.0);
        value / self.mean
    }
}

/// Decaying-memory smoothing.
///
/// Buckets are visited from last to first; every bucket adds
/// `exp(-i/15) * raw[k - i]` for the 15 buckets before it, always reading the
/// raw, unsmoothed scores.
pub fn smooth_scores(raw: &[f64]) -> Vec<f64> {
    let mut smoothed = vec![0.0; raw.len()];

    for k in (0..raw.len()).rev() {
        let memory: f64 = (1..=SMOOTHING_SPAN.min(k))
            .map(|i| (-(i as f64) / SMOOTHING_SPAN as f64).exp() * raw[k - i])
            .sum();
        smoothed[k] = raw[k] + memory;
    }

    smoothed
}

/// Score a wave given its kills, the zed-time windows that may touch it, the
/// wave size and the number of active players
pub(crate) fn difficulty(
    wave: &Wave,
    kills: &[Kill],
    zedtimes: &[ZedtimeWindow],
    wave_size: i32,
    players: usize,
) -> DifficultyAnalytics {
    let size_bonus = wave_size_bonus(wave_size);
    let team_bonus = player_bonus(players);
    let density = DensityCurve::new(kills);

    let mut ticks = Vec::new();
    let mut raw = Vec::new();
    let wave_end = i64::from(wave.end_tick);
    let mut cursor = i64::from(wave.start_tick);

    while cursor < wave_end {
        if ticks.len() == MAX_BUCKETS {
            warn!(
                start_tick = wave.start_tick,
                end_tick = wave.end_tick,
                scored_until = cursor,
                "Wave too long, difficulty buckets truncated"
            );
            break;
        }

        // both bounds lie within [wave.start_tick, wave.end_tick]
        let start = cursor as i32;
        let end = (cursor + i64::from(PERIOD_TICKS)).min(wave_end) as i32;

        let mix = KillMix::from_kills(range_by_tick(kills, start, end));
        let zeds = zeds_bonus(&mix, size_bonus, density.ratio_at(end));

        let recent = range_by_tick(kills, end.saturating_sub(SPEED_LOOKBACK_TICKS), end).len();
        let speed = recent as f64 / 30.0 * team_bonus * lerp(0.1, 1.0, zeds);

        let zt = zt_bonus(start, end, zedtimes);

        ticks.push(start);
        raw.push(1.0 * (1.0 + zeds) + 1.5 * speed * zt);
        cursor += i64::from(STEP_TICKS);
    }

    let smoothed = smooth_scores(&raw);
    let buckets: Vec<DifficultyBucket> = ticks
        .into_iter()
        .zip(raw)
        .zip(smoothed)
        .map(|((tick, raw), smoothed)| DifficultyBucket {
            tick,
            raw,
            smoothed,
        })
        .collect();

    if buckets.is_empty() {
        return DifficultyAnalytics::default();
    }

    let score = buckets.iter().map(|b| b.smoothed).sum::<f64>() / buckets.len() as f64;
    let peak = buckets
        .iter()
        .map(|b| b.smoothed)
        .fold(f64::NEG_INFINITY, f64::max);

    DifficultyAnalytics {
        score,
        peak,
        buckets,
    }
}
