//! Session-wide aggregation of wave results

use serde::Serialize;

use super::buffs::{aggregate_ratio, merge_uptime, BuffsUptime};
use super::summary::{KillMix, Summary};
use super::zedtime::ZedtimeAnalytics;
use super::WaveAnalysis;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionDifficulty {
    /// Duration-weighted mean of wave scores
    pub score: f64,
    pub peak: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionAnalysis {
    pub session_id: i32,
    pub waves: Vec<WaveAnalysis>,
    pub summary: Summary,
    pub zedtime: ZedtimeAnalytics,
    pub difficulty: SessionDifficulty,
    /// Per (player, perk), summed over all waves
    pub buffs: Vec<BuffsUptime>,
    /// Buffed share of all tracked ticks, medic self-buffs excluded
    pub buffs_uptime_ratio: f64,
}

pub(crate) fn summarize_session(waves: &[WaveAnalysis]) -> Summary {
    let mut summary = Summary::default();
    let mut kills = KillMix::default();

    for wave in waves {
        let s = &wave.summary;
        summary.wave_size += s.wave_size;
        summary.zeds_left += s.zeds_left;
        summary.duration += s.duration;
        summary.deaths += s.deaths;
        summary.husk_rages += s.husk_rages;
        summary.damage_taken += s.damage_taken;
        kills.add(&s.kills);
    }

    summary.kills = kills;
    summary.update_ratios();
    summary
}

pub(crate) fn session_difficulty(waves: &[WaveAnalysis]) -> SessionDifficulty {
    if waves.is_empty() {
        return SessionDifficulty::default();
    }

    let total_duration: f64 = waves.iter().map(|w| w.summary.duration).sum();
    let score = if total_duration > 0.0 {
        waves
            .iter()
            .map(|w| w.difficulty.score * w.summary.duration)
            .sum::<f64>()
            / total_duration
    } else {
        waves.iter().map(|w| w.difficulty.score).sum::<f64>() / waves.len() as f64
    };
    let peak = waves
        .iter()
        .map(|w| w.difficulty.peak)
        .fold(0.0, f64::max);

    SessionDifficulty { score, peak }
}

pub(crate) fn aggregate(session_id: i32, waves: Vec<WaveAnalysis>) -> SessionAnalysis {
    let summary = summarize_session(&waves);
    let zedtime = ZedtimeAnalytics::merge(waves.iter().map(|w| &w.zedtime));
    let difficulty = session_difficulty(&waves);
    let buffs = merge_uptime(waves.iter().flat_map(|w| w.buffs.iter()));
    let buffs_uptime_ratio = aggregate_ratio(&buffs);

    SessionAnalysis {
        session_id,
        waves,
        summary,
        zedtime,
        difficulty,
        buffs,
        buffs_uptime_ratio,
    }
}
