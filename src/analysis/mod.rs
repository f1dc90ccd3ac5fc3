//! Wave and session analytics

pub mod buffs;
pub mod difficulty;
pub mod session;
pub mod summary;
pub mod zedtime;

pub use buffs::BuffsUptime;
pub use difficulty::{DifficultyAnalytics, DifficultyBucket};
pub use session::{SessionAnalysis, SessionDifficulty};
pub use summary::{KillMix, Summary};
pub use zedtime::ZedtimeAnalytics;

use serde::Serialize;
use tracing::debug;

use crate::record::{
    BuffChange, ConnectionKind, Death, HealthChange, HuskRage, Kill, Record, Wave, ZedsLeftSample,
    ZedtimeWindow,
};
use crate::util::range::{filter_by_equality, last_less_or_equal_index};
use crate::util::range_by_tick;

/// Everything computed for one wave
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaveAnalysis {
    pub wave: Wave,
    /// Players connected at some point during the wave
    pub players: usize,
    pub summary: Summary,
    pub zedtime: ZedtimeAnalytics,
    pub buffs: Vec<BuffsUptime>,
    pub difficulty: DifficultyAnalytics,
}

/// The record's event lists cut down to one wave
pub(crate) struct WaveSlices<'a> {
    pub wave: &'a Wave,
    pub zeds_left: &'a [ZedsLeftSample],
    pub kills: &'a [Kill],
    pub deaths: &'a [Death],
    pub buffs: &'a [BuffChange],
    pub zedtimes: &'a [ZedtimeWindow],
    pub health_changes: &'a [HealthChange],
    pub husk_rages: &'a [HuskRage],
}

impl<'a> WaveSlices<'a> {
    fn new(record: &'a Record, wave: &'a Wave) -> Self {
        let (from, to) = (wave.start_tick, wave.end_tick);
        Self {
            wave,
            zeds_left: range_by_tick(&record.zeds_left, from, to),
            kills: range_by_tick(&record.kills, from, to),
            deaths: range_by_tick(&record.deaths, from, to),
            buffs: range_by_tick(&record.buffs, from, to),
            zedtimes: range_by_tick(&record.zedtimes, from, to),
            health_changes: range_by_tick(&record.health_changes, from, to),
            husk_rages: range_by_tick(&record.husk_rages, from, to),
        }
    }
}

/// User ids connected at wave start or joining during the wave
pub fn active_players(record: &Record, wave: &Wave) -> Vec<u8> {
    let mut ids: Vec<u8> = record.players.iter().map(|p| p.user_id).collect();
    ids.sort_unstable();
    ids.dedup();

    ids.into_iter()
        .filter(|&user_id| {
            let log = filter_by_equality(&record.connections, |c| c.user_id, user_id);
            let connected_at_start = last_less_or_equal_index(&log, wave.start_tick, |c| c.tick)
                .map_or(false, |idx| log[idx].kind == ConnectionKind::Join);
            let joined_during = log.iter().any(|c| {
                c.kind == ConnectionKind::Join
                    && c.tick > wave.start_tick
                    && c.tick <= wave.end_tick
            });
            connected_at_start || joined_during
        })
        .collect()
}

/// Analyze a single wave of the record
pub fn analyze_wave(record: &Record, wave: &Wave) -> WaveAnalysis {
    let slices = WaveSlices::new(record, wave);
    let active = active_players(record, wave);

    let summary = summary::summarize(record, &slices);
    let zedtime = ZedtimeAnalytics::from_windows(slices.zedtimes);
    let buffs = buffs::buffs_uptime(record, &slices, &active);

    let nearby = difficulty::zedtimes_near(&record.zedtimes, wave);
    let difficulty =
        difficulty::difficulty(wave, slices.kills, &nearby, summary.wave_size, active.len());

    debug!(
        session_id = record.session_id(),
        wave = wave.wave,
        attempt = wave.attempt,
        kills = summary.total_kills,
        players = active.len(),
        difficulty = difficulty.score,
        "Analyzed wave"
    );

    WaveAnalysis {
        wave: *wave,
        players: active.len(),
        summary,
        zedtime,
        buffs,
        difficulty,
    }
}

/// Analyze every wave of the record and aggregate the results
pub fn analyze_session(record: &Record) -> SessionAnalysis {
    let waves: Vec<WaveAnalysis> = record
        .waves
        .iter()
        .map(|wave| analyze_wave(record, wave))
        .collect();

    session::aggregate(record.session_id(), waves)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::testing::RecordWriter;
    use crate::demo::{decode, Perk, UserType};

    const STEAM_A: &str = "76561198000000001";
    const STEAM_B: &str = "76561198000000002";

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    /// Cyst = trash, Husk = medium, Scrake = large, Hans = boss
    const CYST: u8 = 1;
    const HUSK: u8 = 11;
    const SCRAKE: u8 = 15;
    const HANS: u8 = 18;

    fn sample_record() -> Vec<u8> {
        RecordWriter::new(42)
            .player_join(0, 1, UserType::Steam, STEAM_A)
            .player_join(0, 2, UserType::Steam, STEAM_B)
            .perk_change(10, 1, 2)
            .perk_change(10, 2, 4)
            .wave_start(100, 1, 40)
            .kill(200, 1, CYST)
            .buff(250, 1, 2)
            .kill(300, 2, HUSK)
            .zedtime_start(400)
            .kill(450, 1, SCRAKE)
            .zedtime_extend(600)
            .zedtime_end(900)
            .buff(1000, 1, 0)
            .buff(1100, 2, 1)
            .health_change(1200, 1, 100, 50, 0)
            .health_change(1300, 1, 70, 40, CYST)
            .player_died(1500, 2, SCRAKE)
            .buff(1600, 2, 1)
            .zeds_left(1900, 10)
            .wave_start(2000, 2, 60)
            .kill(2100, 1, HANS)
            .zedtime_start(2200)
            .zedtime_end(2500)
            .husk_rage(2600, 1)
            .zeds_left(4000, 0)
            .finish()
    }

    #[test]
    fn end_to_end_single_wave() {
        let raw = RecordWriter::new(42)
            .wave_start(100, 1, 50)
            .kill(150, 2, CYST)
            .zeds_left(500, 0)
            .finish();

        let record = decode(&raw).expect("valid record");
        assert_eq!(record.session_id(), 42);
        assert_eq!(
            record.waves,
            vec![Wave {
                wave: 1,
                attempt: 1,
                start_tick: 100,
                end_tick: 500
            }]
        );

        let analysis = analyze_session(&record);
        let summary = &analysis.waves[0].summary;
        assert_eq!(summary.total_kills, 1);
        assert_eq!(summary.trash_percent, 1.0);
        assert_eq!(summary.duration, 4.0);
        assert_eq!(summary.wave_size, 50);
        assert_eq!(summary.zeds_left, 0);
        assert_eq!(summary.completion_percent, 1.0);
        assert_eq!(summary.avg_kills_per_second, 0.25);
    }

    #[test]
    fn analysis_is_deterministic() {
        let raw = sample_record();
        let first = analyze_session(&decode(&raw).expect("valid"));
        let second = analyze_session(&decode(&raw).expect("valid"));
        assert_eq!(first, second);
    }

    #[test]
    fn wave_summary_classifies_kills() {
        let record = decode(&sample_record()).expect("valid");
        let analysis = analyze_wave(&record, &record.waves[0]);
        let s = &analysis.summary;

        assert_eq!(s.wave_size, 40);
        assert_eq!(s.zeds_left, 10);
        assert!(close(s.completion_percent, 0.75));
        assert_eq!(s.total_kills, 3);
        assert_eq!((s.kills.trash, s.kills.medium, s.kills.large), (1, 1, 1));
        assert!(close(s.trash_percent, 1.0 / 3.0));
        assert_eq!(s.boss_percent, 0.0);
        assert_eq!(s.duration, 18.99);
        assert_eq!(s.deaths, 1);
        assert_eq!(s.damage_taken, 40);
        assert_eq!(analysis.players, 2);
        assert_eq!(analysis.zedtime.count, 1);
        assert_eq!(analysis.zedtime.max_duration, Some(5.0));
    }

    #[test]
    fn completion_percent_is_not_clamped() {
        // zeds-left growing past the announced size drives completion negative
        let raw = RecordWriter::new(1)
            .wave_start(0, 1, 10)
            .zeds_left(100, 15)
            .finish();
        let record = decode(&raw).expect("valid");
        let analysis = analyze_wave(&record, &record.waves[0]);
        assert!(close(analysis.summary.completion_percent, -0.5));
    }

    #[test]
    fn completion_percent_within_unit_range_for_consistent_data() {
        let record = decode(&sample_record()).expect("valid");
        for wave in &record.waves {
            let pct = analyze_wave(&record, wave).summary.completion_percent;
            assert!((0.0..=1.0).contains(&pct));
        }
    }

    #[test]
    fn zero_wave_size_and_kills_use_guarded_defaults() {
        let raw = RecordWriter::new(1)
            .wave_start(0, 1, 0)
            .zeds_left(300, 0)
            .finish();
        let record = decode(&raw).expect("valid");
        let s = analyze_wave(&record, &record.waves[0]).summary;
        assert_eq!(s.completion_percent, 0.0);
        assert_eq!(s.trash_percent, 0.0);
        assert_eq!(s.avg_kills_per_second, 0.0);
    }

    #[test]
    fn buff_uptime_per_player() {
        let record = decode(&sample_record()).expect("valid");
        let analysis = analyze_wave(&record, &record.waves[0]);

        let commando = analysis
            .buffs
            .iter()
            .find(|b| b.user_id == 1)
            .expect("player 1");
        assert_eq!(commando.perk, Some(Perk::Commando));
        // buffed from 250 until the buff drops at 1000
        assert_eq!(commando.buffed_ticks, 750);
        assert_eq!(commando.total_ticks, 1899);

        let medic = analysis
            .buffs
            .iter()
            .find(|b| b.user_id == 2)
            .expect("player 2");
        assert_eq!(medic.perk, Some(Perk::FieldMedic));
        // buffed at 1100, dead at 1500; the buff after death is ignored
        assert_eq!(medic.buffed_ticks, 400);
    }

    #[test]
    fn buffed_ticks_never_exceed_wave_duration() {
        let record = decode(&sample_record()).expect("valid");
        for wave in &record.waves {
            for entry in analyze_wave(&record, wave).buffs {
                assert!(entry.buffed_ticks <= wave.duration_ticks());
            }
        }
    }

    #[test]
    fn disconnected_players_are_not_active() {
        let raw = RecordWriter::new(1)
            .player_join(0, 1, UserType::Steam, STEAM_A)
            .player_join(0, 2, UserType::Steam, STEAM_B)
            .player_disconnect(50, 2)
            .wave_start(100, 1, 10)
            .player_join(150, 3, UserType::Epic, "epicepicepicepicep")
            .zeds_left(500, 0)
            .finish();
        let record = decode(&raw).expect("valid");
        assert_eq!(active_players(&record, &record.waves[0]), vec![1, 3]);
    }

    #[test]
    fn session_aggregates_waves() {
        let record = decode(&sample_record()).expect("valid");
        let session = analyze_session(&record);

        assert_eq!(session.session_id, 42);
        assert_eq!(session.waves.len(), 2);
        assert_eq!(session.summary.total_kills, 4);
        assert_eq!(session.summary.kills.boss, 1);
        assert_eq!(session.summary.wave_size, 100);
        assert_eq!(session.summary.husk_rages, 1);
        assert_eq!(session.zedtime.count, 2);
        assert_eq!(session.zedtime.min_duration, Some(3.0));
        assert_eq!(session.zedtime.max_duration, Some(5.0));

        // medic uptime is listed but left out of the aggregate ratio
        assert!(session.buffs.iter().any(|b| b.perk == Some(Perk::FieldMedic)));
        let commando: Vec<&BuffsUptime> = session
            .buffs
            .iter()
            .filter(|b| b.perk != Some(Perk::FieldMedic))
            .collect();
        let expected = commando.iter().map(|b| b.buffed_ticks).sum::<i64>() as f64
            / commando.iter().map(|b| b.total_ticks).sum::<i64>() as f64;
        assert!(close(session.buffs_uptime_ratio, expected));

        assert!(session.difficulty.score > 0.0);
        assert!(session.difficulty.peak >= session.waves[0].difficulty.peak);
    }

    #[test]
    fn record_without_waves_gives_empty_session() {
        let record = decode(&RecordWriter::new(9).kill(10, 1, CYST).finish()).expect("valid");
        let session = analyze_session(&record);
        assert!(session.waves.is_empty());
        assert_eq!(session.summary.total_kills, 0);
        assert_eq!(session.summary.completion_percent, 0.0);
        assert_eq!(session.difficulty, SessionDifficulty::default());
    }
}
