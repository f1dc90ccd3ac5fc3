//! Event stream decoder
//!
//! Layout after the header: `tick: i32 BE | tag: u8 | payload | 0x00`, repeated
//! until the buffer is exhausted. The payload size is fixed by the tag, except
//! for player joins whose unique id length depends on the user type.

use bytes::Buf;
use tracing::debug;

use super::error::DecodeError;
use super::header::{Header, HEADER_SIZE};
use super::protocol::{
    player_join_size, EventPayload, EventTag, Perk, RawEvent, UserType, ZedType,
};

/// tick(4) + tag(1)
const EVENT_PREFIX_SIZE: usize = 5;

/// Decoder over a complete, already-buffered record
pub struct EventDecoder<'a> {
    data: &'a [u8],
    cursor: usize,
}

impl<'a> EventDecoder<'a> {
    /// Start decoding events right after the header
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            cursor: HEADER_SIZE.min(data.len()),
        }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.cursor
    }

    /// Bytes consumed so far
    pub fn position(&self) -> usize {
        self.cursor
    }

    fn require(&self, expected_size: usize) -> Result<(), DecodeError> {
        if self.remaining() < expected_size {
            return Err(DecodeError::TruncatedEvent {
                pos: self.cursor,
                expected_size,
                actual_size: self.remaining(),
            });
        }
        Ok(())
    }

    /// Decode the next event, `None` once the buffer is exhausted
    pub fn next_event(&mut self) -> Result<Option<RawEvent>, DecodeError> {
        if self.remaining() == 0 {
            return Ok(None);
        }

        self.require(EVENT_PREFIX_SIZE)?;
        let mut prefix = &self.data[self.cursor..self.cursor + EVENT_PREFIX_SIZE];
        let tick = prefix.get_i32();
        let tag = EventTag::from_byte(prefix.get_u8());
        self.cursor += EVENT_PREFIX_SIZE;

        let size = match tag.fixed_payload_size() {
            Some(size) => size,
            None => {
                // player join: the user type byte decides the size
                self.require(2)?;
                player_join_size(UserType::from_byte(self.data[self.cursor + 1]))
            }
        };
        self.require(size)?;

        let body_end = self.cursor + size - 1;
        let terminator = self.data[body_end];
        if terminator != 0 {
            return Err(DecodeError::MalformedTerminator {
                pos: body_end,
                actual: terminator,
            });
        }

        let payload = decode_payload(tag, &self.data[self.cursor..body_end]);
        self.cursor += size;

        Ok(Some(RawEvent { tick, payload }))
    }
}

/// Decode a payload body (terminator already stripped and validated).
/// `body` has exactly the size the tag requires.
fn decode_payload(tag: EventTag, mut body: &[u8]) -> EventPayload {
    match tag {
        EventTag::PlayerJoin => {
            let user_id = body.get_u8();
            let user_type = UserType::from_byte(body.get_u8());
            // unique ids are ASCII, padded with NULs when shorter than the slot
            let unique_id = String::from_utf8_lossy(body)
                .trim_end_matches('\0')
                .to_string();
            EventPayload::PlayerJoin {
                user_id,
                user_type,
                unique_id,
            }
        }
        EventTag::PlayerDisconnect => EventPayload::PlayerDisconnect {
            user_id: body.get_u8(),
        },
        EventTag::PerkChange => EventPayload::PerkChange {
            user_id: body.get_u8(),
            perk: Perk::from_byte(body.get_u8()),
        },
        EventTag::PlayerDied => EventPayload::PlayerDied {
            user_id: body.get_u8(),
            cause: ZedType::from_byte(body.get_u8()),
        },
        EventTag::WaveStart => EventPayload::WaveStart {
            wave: body.get_u8(),
            zeds_left: body.get_i32(),
        },
        EventTag::ZedsLeft => EventPayload::ZedsLeft {
            zeds_left: body.get_i32(),
        },
        EventTag::Kill => EventPayload::Kill {
            user_id: body.get_u8(),
            zed: ZedType::from_byte(body.get_u8()),
        },
        EventTag::Buff => EventPayload::Buff {
            user_id: body.get_u8(),
            max_buffs: body.get_u8(),
        },
        EventTag::HealthChange => EventPayload::HealthChange {
            user_id: body.get_u8(),
            health: body.get_u16(),
            armor: body.get_u16(),
            hit_by: ZedType::from_byte(body.get_u8()),
        },
        EventTag::HuskRage => EventPayload::HuskRage {
            user_id: body.get_u8(),
        },
        EventTag::ZedtimeStart => EventPayload::ZedtimeStart,
        EventTag::ZedtimeExtend => EventPayload::ZedtimeExtend,
        EventTag::ZedtimeEnd => EventPayload::ZedtimeEnd,
        EventTag::Unknown(tag) => EventPayload::Unknown { tag },
    }
}

/// Decode the header and every event of a record.
///
/// Aborts on the first error; on success the whole buffer has been consumed.
pub fn decode_events(raw: &[u8]) -> Result<(Header, Vec<RawEvent>), DecodeError> {
    let header = Header::parse(raw)?;

    let mut decoder = EventDecoder::new(raw);
    let mut events = Vec::new();
    while let Some(event) = decoder.next_event()? {
        events.push(event);
    }

    debug!(
        session_id = header.session_id,
        version = header.version,
        events = events.len(),
        bytes = decoder.position(),
        "Decoded demo record"
    );

    Ok((header, events))
}
