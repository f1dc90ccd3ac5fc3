//! Builds a [`Record`] from the raw event list in a single stable pass

use tracing::debug;

use crate::demo::{EventPayload, Header, RawEvent};

use super::{
    BuffChange, ConnectionEvent, ConnectionKind, Death, HealthChange, HuskRage, Kill, PerkChange,
    Player, Record, Wave, ZedsLeftSample, ZedtimeWindow,
};

/// Zed-time window that has started but not ended yet
#[derive(Debug, Clone, Copy)]
struct OpenZedtime {
    start_tick: i32,
    extends_count: u32,
}

/// Wave start before end ticks are known
#[derive(Debug, Clone, Copy)]
struct WaveStart {
    wave: u8,
    tick: i32,
}

/// Partition raw events into per-category, tick-ordered lists
pub fn build(header: Header, events: &[RawEvent]) -> Record {
    let final_tick = events.last().map(|e| e.tick).unwrap_or(0);

    let mut record = Record {
        header,
        final_tick,
        players: Vec::new(),
        connections: Vec::new(),
        waves: Vec::new(),
        zeds_left: Vec::new(),
        zedtimes: Vec::new(),
        kills: Vec::new(),
        deaths: Vec::new(),
        perk_changes: Vec::new(),
        buffs: Vec::new(),
        health_changes: Vec::new(),
        husk_rages: Vec::new(),
    };

    let mut wave_starts = Vec::new();
    let mut open_zedtime: Option<OpenZedtime> = None;
    let mut unknown = 0usize;

    for event in events {
        let tick = event.tick;
        match &event.payload {
            EventPayload::PlayerJoin {
                user_id,
                user_type,
                unique_id,
            } => {
                let known = record
                    .players
                    .iter()
                    .any(|p| p.user_id == *user_id && &p.unique_id == unique_id);
                if !known {
                    record.players.push(Player {
                        user_id: *user_id,
                        user_type: *user_type,
                        unique_id: unique_id.clone(),
                    });
                }
                record.connections.push(ConnectionEvent {
                    tick,
                    user_id: *user_id,
                    kind: ConnectionKind::Join,
                });
            }
            EventPayload::PlayerDisconnect { user_id } => {
                record.connections.push(ConnectionEvent {
                    tick,
                    user_id: *user_id,
                    kind: ConnectionKind::Disconnect,
                });
            }
            EventPayload::PerkChange { user_id, perk } => {
                record.perk_changes.push(PerkChange {
                    tick,
                    user_id: *user_id,
                    perk: *perk,
                });
            }
            EventPayload::PlayerDied { user_id, cause } => {
                record.deaths.push(Death {
                    tick,
                    user_id: *user_id,
                    cause: *cause,
                });
            }
            EventPayload::WaveStart { wave, zeds_left } => {
                wave_starts.push(WaveStart { wave: *wave, tick });
                // the wave start announces the initial wave size
                record.zeds_left.push(ZedsLeftSample {
                    tick,
                    zeds_left: *zeds_left,
                });
            }
            EventPayload::ZedsLeft { zeds_left } => {
                record.zeds_left.push(ZedsLeftSample {
                    tick,
                    zeds_left: *zeds_left,
                });
            }
            EventPayload::Kill { user_id, zed } => {
                record.kills.push(Kill {
                    tick,
                    user_id: *user_id,
                    zed: *zed,
                });
            }
            EventPayload::Buff { user_id, max_buffs } => {
                record.buffs.push(BuffChange {
                    tick,
                    user_id: *user_id,
                    max_buffs: *max_buffs,
                });
            }
            EventPayload::HealthChange {
                user_id,
                health,
                armor,
                hit_by,
            } => {
                record.health_changes.push(HealthChange {
                    tick,
                    user_id: *user_id,
                    health: *health,
                    armor: *armor,
                    hit_by: *hit_by,
                });
            }
            EventPayload::HuskRage { user_id } => {
                record.husk_rages.push(HuskRage {
                    tick,
                    user_id: *user_id,
                });
            }
            EventPayload::ZedtimeStart => {
                if let Some(open) = open_zedtime.take() {
                    debug!(tick, "Zed-time restarted before ending");
                    record
                        .zedtimes
                        .push(ZedtimeWindow::new(open.start_tick, tick, open.extends_count));
                }
                open_zedtime = Some(OpenZedtime {
                    start_tick: tick,
                    extends_count: 0,
                });
            }
            EventPayload::ZedtimeExtend => match open_zedtime.as_mut() {
                Some(open) => open.extends_count += 1,
                None => debug!(tick, "Zed-time extend without an open window"),
            },
            EventPayload::ZedtimeEnd => match open_zedtime.take() {
                Some(open) => record
                    .zedtimes
                    .push(ZedtimeWindow::new(open.start_tick, tick, open.extends_count)),
                None => debug!(tick, "Zed-time end without an open window"),
            },
            // forward-compatible tags are decoded but not exposed
            EventPayload::Unknown { .. } => unknown += 1,
        }
    }

    if let Some(open) = open_zedtime {
        record
            .zedtimes
            .push(ZedtimeWindow::new(open.start_tick, final_tick, open.extends_count));
    }

    record.waves = derive_waves(&wave_starts, final_tick);

    debug!(
        session_id = record.header.session_id,
        players = record.players.len(),
        waves = record.waves.len(),
        kills = record.kills.len(),
        unknown,
        "Built match record"
    );

    record
}

/// Each wave ends one tick before the next one starts; the last one ends at
/// the final tick of the record.
fn derive_waves(starts: &[WaveStart], final_tick: i32) -> Vec<Wave> {
    let mut waves: Vec<Wave> = Vec::with_capacity(starts.len());

    for (i, start) in starts.iter().enumerate() {
        let end_tick = match starts.get(i + 1) {
            Some(next) => next.tick.saturating_sub(1),
            None => final_tick,
        };
        let attempt = 1 + waves.iter().filter(|w| w.wave == start.wave).count() as u32;

        waves.push(Wave {
            wave: start.wave,
            attempt,
            start_tick: start.tick,
            end_tick: end_tick.max(start.tick),
        });
    }

    waves
}
