//! Byte-level record writer for tests

use super::header::MAGIC;
use super::protocol::{EventTag, UserType};

/// Builds a record buffer event by event
pub struct RecordWriter {
    buf: Vec<u8>,
}

impl RecordWriter {
    pub fn new(session_id: i32) -> Self {
        let mut buf = MAGIC.to_vec();
        buf.push(1);
        buf.extend_from_slice(&session_id.to_be_bytes());
        buf.push(0);
        Self { buf }
    }

    fn event(mut self, tick: i32, tag: EventTag, body: &[u8]) -> Self {
        self.buf.extend_from_slice(&tick.to_be_bytes());
        self.buf.push(tag.as_byte());
        self.buf.extend_from_slice(body);
        self.buf.push(0);
        self
    }

    pub fn player_join(self, tick: i32, user_id: u8, user_type: UserType, unique_id: &str) -> Self {
        let type_byte = match user_type {
            UserType::Steam => 1,
            UserType::Epic => 2,
            UserType::Other(b) => b,
        };
        let mut body = vec![user_id, type_byte];
        let mut id = unique_id.as_bytes().to_vec();
        id.resize(user_type.unique_id_len(), 0);
        body.extend_from_slice(&id);
        self.event(tick, EventTag::PlayerJoin, &body)
    }

    pub fn player_disconnect(self, tick: i32, user_id: u8) -> Self {
        self.event(tick, EventTag::PlayerDisconnect, &[user_id])
    }

    pub fn perk_change(self, tick: i32, user_id: u8, perk: u8) -> Self {
        self.event(tick, EventTag::PerkChange, &[user_id, perk])
    }

    pub fn player_died(self, tick: i32, user_id: u8, cause: u8) -> Self {
        self.event(tick, EventTag::PlayerDied, &[user_id, cause])
    }

    pub fn wave_start(self, tick: i32, wave: u8, zeds_left: i32) -> Self {
        let mut body = vec![wave];
        body.extend_from_slice(&zeds_left.to_be_bytes());
        self.event(tick, EventTag::WaveStart, &body)
    }

    pub fn zeds_left(self, tick: i32, zeds_left: i32) -> Self {
        self.event(tick, EventTag::ZedsLeft, &zeds_left.to_be_bytes())
    }

    pub fn kill(self, tick: i32, user_id: u8, zed: u8) -> Self {
        self.event(tick, EventTag::Kill, &[user_id, zed])
    }

    pub fn buff(self, tick: i32, user_id: u8, max_buffs: u8) -> Self {
        self.event(tick, EventTag::Buff, &[user_id, max_buffs])
    }

    pub fn health_change(
        self,
        tick: i32,
        user_id: u8,
        health: u16,
        armor: u16,
        hit_by: u8,
    ) -> Self {
        let mut body = vec![user_id];
        body.extend_from_slice(&health.to_be_bytes());
        body.extend_from_slice(&armor.to_be_bytes());
        body.push(hit_by);
        self.event(tick, EventTag::HealthChange, &body)
    }

    pub fn husk_rage(self, tick: i32, user_id: u8) -> Self {
        self.event(tick, EventTag::HuskRage, &[user_id])
    }

    pub fn zedtime_start(self, tick: i32) -> Self {
        self.event(tick, EventTag::ZedtimeStart, &[])
    }

    pub fn zedtime_extend(self, tick: i32) -> Self {
        self.event(tick, EventTag::ZedtimeExtend, &[])
    }

    pub fn zedtime_end(self, tick: i32) -> Self {
        self.event(tick, EventTag::ZedtimeEnd, &[])
    }

    pub fn unknown(self, tick: i32, tag: u8) -> Self {
        self.event(tick, EventTag::Unknown(tag), &[])
    }

    pub fn finish(self) -> Vec<u8> {
        self.buf
    }
}
