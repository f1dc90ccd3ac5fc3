//! Buff uptime accounting
//!
//! Every active player gets a timeline of buff-level changes for the wave,
//! seeded with a level-0 point at wave start and cut short by a death point
//! when the player dies. Uptime accrues between consecutive points while the
//! earlier point has buffs active.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::demo::Perk;
use crate::record::{Record, Wave};
use crate::util::range::{filter_by_equality, last_less_or_equal_index};
use crate::util::time::tick_span;

use super::WaveSlices;

/// Buffs seen last are assumed to linger this long (5 s) before decaying
pub const BUFF_DECAY_TICKS: i32 = 500;

/// Buffed ticks over total ticks for one (player, perk)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuffsUptime {
    pub user_id: u8,
    pub perk: Option<Perk>,
    pub buffed_ticks: i64,
    pub total_ticks: i64,
}

impl BuffsUptime {
    /// Medic buffs are attributable to teammates
    pub fn is_self_buffing(&self) -> bool {
        self.perk == Some(Perk::FieldMedic)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Buffs(u8),
    Dead,
}

#[derive(Debug, Clone, Copy)]
struct TimelinePoint {
    tick: i32,
    level: Level,
}

/// Scratch state of one player for one wave
#[derive(Debug, Default)]
struct PlayerSlot {
    death_tick: Option<i32>,
    timeline: Vec<TimelinePoint>,
}

/// Per-wave scratch arena indexed by the record's user id
struct PlayerArena {
    slots: Vec<Option<PlayerSlot>>,
}

impl PlayerArena {
    fn new(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self { slots }
    }

    fn activate(&mut self, user_id: u8, wave_start: i32) {
        if let Some(slot) = self.slots.get_mut(user_id as usize) {
            *slot = Some(PlayerSlot {
                death_tick: None,
                timeline: vec![TimelinePoint {
                    tick: wave_start,
                    level: Level::Buffs(0),
                }],
            });
        }
    }

    /// `None` for ids outside the table or players not active in the wave
    fn get_mut(&mut self, user_id: u8) -> Option<&mut PlayerSlot> {
        self.slots.get_mut(user_id as usize)?.as_mut()
    }

    fn into_active(self) -> impl Iterator<Item = (u8, PlayerSlot)> {
        self.slots
            .into_iter()
            .enumerate()
            .filter_map(|(idx, slot)| slot.map(|s| (idx as u8, s)))
    }
}

fn accrue(timeline: &[TimelinePoint], wave_end: i32) -> i64 {
    let mut buffed = 0i64;

    for pair in timeline.windows(2) {
        if let Level::Buffs(n) = pair[0].level {
            if n > 0 {
                buffed += tick_span(pair[0].tick, pair[1].tick);
            }
        }
    }

    if let Some(last) = timeline.last() {
        if let Level::Buffs(n) = last.level {
            if n > 0 {
                buffed += tick_span(last.tick, wave_end).clamp(0, i64::from(BUFF_DECAY_TICKS));
            }
        }
    }

    buffed
}

/// Perk the player was on at the end of the wave
fn perk_for(record: &Record, user_id: u8, wave: &Wave) -> Option<Perk> {
    let changes = filter_by_equality(&record.perk_changes, |p| p.user_id, user_id);
    last_less_or_equal_index(&changes, wave.end_tick, |p| p.tick).map(|idx| changes[idx].perk)
}

pub(crate) fn buffs_uptime(
    record: &Record,
    slices: &WaveSlices<'_>,
    active: &[u8],
) -> Vec<BuffsUptime> {
    let wave = slices.wave;
    let capacity = record.max_user_id().map_or(0, |id| id as usize + 1);
    let mut arena = PlayerArena::new(capacity);

    for &user_id in active {
        arena.activate(user_id, wave.start_tick);
    }

    for death in slices.deaths {
        if let Some(slot) = arena.get_mut(death.user_id) {
            slot.death_tick.get_or_insert(death.tick);
        }
    }

    for buff in slices.buffs {
        if let Some(slot) = arena.get_mut(buff.user_id) {
            if slot.death_tick.map_or(true, |dead| buff.tick < dead) {
                slot.timeline.push(TimelinePoint {
                    tick: buff.tick,
                    level: Level::Buffs(buff.max_buffs),
                });
            }
        }
    }

    arena
        .into_active()
        .map(|(user_id, mut slot)| {
            if let Some(tick) = slot.death_tick {
                slot.timeline.push(TimelinePoint {
                    tick,
                    level: Level::Dead,
                });
            }

            BuffsUptime {
                user_id,
                perk: perk_for(record, user_id, wave),
                buffed_ticks: accrue(&slot.timeline, wave.end_tick),
                total_ticks: wave.duration_ticks(),
            }
        })
        .collect()
}

/// Sum uptime per (player, perk) across waves
pub(crate) fn merge_uptime<'a>(
    parts: impl IntoIterator<Item = &'a BuffsUptime>,
) -> Vec<BuffsUptime> {
    let mut totals: BTreeMap<(u8, Option<Perk>), (i64, i64)> = BTreeMap::new();

    for part in parts {
        let entry = totals.entry((part.user_id, part.perk)).or_default();
        entry.0 += part.buffed_ticks;
        entry.1 += part.total_ticks;
    }

    totals
        .into_iter()
        .map(|((user_id, perk), (buffed_ticks, total_ticks))| BuffsUptime {
            user_id,
            perk,
            buffed_ticks,
            total_ticks,
        })
        .collect()
}

/// Uptime ratio across all entries, medic self-buffs excluded
pub(crate) fn aggregate_ratio(entries: &[BuffsUptime]) -> f64 {
    let (buffed, total) = entries
        .iter()
        .filter(|e| !e.is_self_buffing())
        .fold((0i64, 0i64), |(b, t), e| (b + e.buffed_ticks, t + e.total_ticks));

    if total > 0 {
        buffed as f64 / total as f64
    } else {
        0.0
    }
}
