//! Record header parsing

use bytes::Buf;
use serde::Serialize;

use super::error::HeaderError;

/// ASCII magic every record starts with
pub const MAGIC: [u8; 6] = *b"kf2rec";

/// magic(6) + version(1) + session_id(4) + terminator(1)
pub const HEADER_SIZE: usize = 12;

/// Fixed record header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Header {
    pub version: u8,
    pub session_id: i32,
}

impl Header {
    /// Parse and validate the header at the start of `raw`
    pub fn parse(raw: &[u8]) -> Result<Self, HeaderError> {
        if raw.len() < HEADER_SIZE {
            return Err(HeaderError::TooShort { len: raw.len() });
        }

        let mut buf = &raw[..HEADER_SIZE];
        let mut magic = [0u8; 6];
        buf.copy_to_slice(&mut magic);
        if magic != MAGIC {
            return Err(HeaderError::BadMagic { found: magic });
        }

        let version = buf.get_u8();
        let session_id = buf.get_i32();

        let terminator = buf.get_u8();
        if terminator != 0 {
            return Err(HeaderError::BadTerminator { actual: terminator });
        }

        Ok(Self {
            version,
            session_id,
        })
    }
}
