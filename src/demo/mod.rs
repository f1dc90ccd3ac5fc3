//! Demo record decoding

pub mod decoder;
pub mod error;
pub mod header;
pub mod protocol;

#[cfg(test)]
pub(crate) mod testing;

pub use decoder::{decode_events, EventDecoder};
pub use error::{DecodeError, HeaderError};
pub use header::Header;
pub use protocol::{EventPayload, EventTag, Perk, RawEvent, UserType, ZedTier, ZedType};

use crate::record::{build, Record};

/// Decode a complete record buffer into a match record
pub fn decode(raw: &[u8]) -> Result<Record, DecodeError> {
    let (header, events) = decode_events(raw)?;
    Ok(build(header, &events))
}
