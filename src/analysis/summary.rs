//! Kill composition and wave progress summary

use serde::Serialize;

use crate::demo::ZedTier;
use crate::record::{HealthChange, Kill, Record, Wave};
use crate::util::range::{filter_by_equality, last_less_or_equal_index};

use super::WaveSlices;

/// Kill counts per zed tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KillMix {
    pub trash: u32,
    pub medium: u32,
    pub large: u32,
    pub boss: u32,
    /// Zeds outside the known taxonomy
    pub unknown: u32,
}

impl KillMix {
    pub fn from_kills(kills: &[Kill]) -> Self {
        let mut mix = Self::default();
        for kill in kills {
            match kill.zed.tier() {
                Some(ZedTier::Trash) => mix.trash += 1,
                Some(ZedTier::Medium) => mix.medium += 1,
                Some(ZedTier::Large) => mix.large += 1,
                Some(ZedTier::Boss) => mix.boss += 1,
                None => mix.unknown += 1,
            }
        }
        mix
    }

    pub fn total(&self) -> u32 {
        self.trash + self.medium + self.large + self.boss + self.unknown
    }

    pub fn add(&mut self, other: &KillMix) {
        self.trash += other.trash;
        self.medium += other.medium;
        self.large += other.large;
        self.boss += other.boss;
        self.unknown += other.unknown;
    }
}

/// Per-wave (or per-session) summary
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub wave_size: i32,
    pub zeds_left: i32,
    /// `1 - zeds_left / wave_size`, not clamped
    pub completion_percent: f64,
    /// Seconds
    pub duration: f64,
    pub total_kills: u32,
    pub kills: KillMix,
    pub trash_percent: f64,
    pub medium_percent: f64,
    pub large_percent: f64,
    pub boss_percent: f64,
    pub avg_kills_per_second: f64,
    pub deaths: u32,
    pub husk_rages: u32,
    /// Health plus armor lost by all players
    pub damage_taken: u64,
}

impl Summary {
    /// Recompute every derived ratio from the raw counts
    pub(crate) fn update_ratios(&mut self) {
        self.total_kills = self.kills.total();

        self.completion_percent = if self.wave_size == 0 {
            0.0
        } else {
            1.0 - self.zeds_left as f64 / self.wave_size as f64
        };

        let total = self.total_kills as f64;
        let pct = |n: u32| if total > 0.0 { n as f64 / total } else { 0.0 };
        self.trash_percent = pct(self.kills.trash);
        self.medium_percent = pct(self.kills.medium);
        self.large_percent = pct(self.kills.large);
        self.boss_percent = pct(self.kills.boss);

        self.avg_kills_per_second = if self.duration > 0.0 {
            total / self.duration
        } else {
            0.0
        };
    }
}

pub(crate) fn summarize(record: &Record, slices: &WaveSlices<'_>) -> Summary {
    let wave = slices.wave;

    let mut summary = Summary {
        wave_size: slices.zeds_left.first().map(|s| s.zeds_left).unwrap_or(0),
        zeds_left: slices.zeds_left.last().map(|s| s.zeds_left).unwrap_or(0),
        duration: wave.duration(),
        kills: KillMix::from_kills(slices.kills),
        deaths: slices.deaths.len() as u32,
        husk_rages: slices.husk_rages.len() as u32,
        damage_taken: damage_taken(&record.health_changes, slices.health_changes, wave),
        ..Summary::default()
    };
    summary.update_ratios();
    summary
}

/// Sum of per-player health+armor drops inside the wave.
///
/// Each player's first in-wave sample is compared against their last sample
/// before the wave, when there is one.
fn damage_taken(all: &[HealthChange], in_wave: &[HealthChange], wave: &Wave) -> u64 {
    let mut users: Vec<u8> = in_wave.iter().map(|h| h.user_id).collect();
    users.sort_unstable();
    users.dedup();

    let pool = |h: &HealthChange| h.health as i64 + h.armor as i64;
    let mut damage = 0u64;

    for user_id in users {
        let history = filter_by_equality(all, |h| h.user_id, user_id);
        let mut previous = wave
            .start_tick
            .checked_sub(1)
            .and_then(|before| last_less_or_equal_index(&history, before, |h| h.tick))
            .map(|idx| pool(history[idx]));

        for sample in filter_by_equality(in_wave, |h| h.user_id, user_id) {
            let current = pool(sample);
            if let Some(prev) = previous {
                if current < prev {
                    damage += (prev - current) as u64;
                }
            }
            previous = Some(current);
        }
    }

    damage
}
