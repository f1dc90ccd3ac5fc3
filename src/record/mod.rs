//! Match record - the semantic view of a decoded demo
//!
//! Every list is sorted ascending by tick because the source stream is
//! append-only with non-decreasing ticks.

pub mod builder;

pub use builder::build;

use serde::Serialize;

use crate::demo::{Header, Perk, UserType, ZedType};
use crate::util::time::{tick_span, ticks_to_secs};
use crate::util::Ticked;

/// Player as announced by a join event.
/// `user_id` is a table-local index, only meaningful inside one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Player {
    pub user_id: u8,
    pub user_type: UserType,
    /// Platform account id
    pub unique_id: String,
}

/// One attempt at one wave
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Wave {
    pub wave: u8,
    /// 1 for the first try, +1 every time the same wave starts again
    pub attempt: u32,
    pub start_tick: i32,
    pub end_tick: i32,
}

impl Wave {
    pub fn duration_ticks(&self) -> i64 {
        tick_span(self.start_tick, self.end_tick)
    }

    /// Duration in seconds
    pub fn duration(&self) -> f64 {
        ticks_to_secs(self.duration_ticks())
    }
}

/// A zed-time (slow motion) window
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ZedtimeWindow {
    pub start_tick: i32,
    pub end_tick: i32,
    /// Seconds
    pub duration: f64,
    pub extends_count: u32,
}

impl ZedtimeWindow {
    pub fn new(start_tick: i32, end_tick: i32, extends_count: u32) -> Self {
        Self {
            start_tick,
            end_tick,
            duration: ticks_to_secs(tick_span(start_tick, end_tick)),
            extends_count,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ZedsLeftSample {
    pub tick: i32,
    pub zeds_left: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Kill {
    pub tick: i32,
    pub user_id: u8,
    pub zed: ZedType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Death {
    pub tick: i32,
    pub user_id: u8,
    pub cause: ZedType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PerkChange {
    pub tick: i32,
    pub user_id: u8,
    pub perk: Perk,
}

/// Change of the number of active buffs on a player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BuffChange {
    pub tick: i32,
    pub user_id: u8,
    pub max_buffs: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HealthChange {
    pub tick: i32,
    pub user_id: u8,
    pub health: u16,
    pub armor: u16,
    pub hit_by: ZedType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HuskRage {
    pub tick: i32,
    pub user_id: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionKind {
    Join,
    Disconnect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConnectionEvent {
    pub tick: i32,
    pub user_id: u8,
    pub kind: ConnectionKind,
}

macro_rules! impl_ticked {
    ($($ty:ty),* $(,)?) => {
        $(impl Ticked for $ty {
            fn tick(&self) -> i32 {
                self.tick
            }
        })*
    };
}

impl_ticked!(
    ZedsLeftSample,
    Kill,
    Death,
    PerkChange,
    BuffChange,
    HealthChange,
    HuskRage,
    ConnectionEvent,
);

impl Ticked for ZedtimeWindow {
    fn tick(&self) -> i32 {
        self.start_tick
    }
}

/// Decoded match record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub header: Header,
    /// Tick of the last decoded event
    pub final_tick: i32,
    pub players: Vec<Player>,
    pub connections: Vec<ConnectionEvent>,
    pub waves: Vec<Wave>,
    pub zeds_left: Vec<ZedsLeftSample>,
    pub zedtimes: Vec<ZedtimeWindow>,
    pub kills: Vec<Kill>,
    pub deaths: Vec<Death>,
    pub perk_changes: Vec<PerkChange>,
    pub buffs: Vec<BuffChange>,
    pub health_changes: Vec<HealthChange>,
    pub husk_rages: Vec<HuskRage>,
}

impl Record {
    pub fn session_id(&self) -> i32 {
        self.header.session_id
    }

    /// Most recent player announced under `user_id`
    pub fn player(&self, user_id: u8) -> Option<&Player> {
        self.players.iter().rev().find(|p| p.user_id == user_id)
    }

    /// Largest user id seen anywhere in the player table
    pub fn max_user_id(&self) -> Option<u8> {
        self.players.iter().map(|p| p.user_id).max()
    }
}
