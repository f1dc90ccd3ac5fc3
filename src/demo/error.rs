//! Decode errors
//!
//! Every error is fatal for the record being decoded: decoding stops at the
//! first one and no partial record is handed out.

/// Problems with the fixed 12-byte record header
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HeaderError {
    #[error("Header too short: {len} bytes")]
    TooShort { len: usize },

    #[error("Bad magic: {found:?}")]
    BadMagic { found: [u8; 6] },

    #[error("Header terminator is {actual:#04x}, expected 0x00")]
    BadTerminator { actual: u8 },
}

/// Record decoding errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("Invalid header: {0}")]
    Header(#[from] HeaderError),

    #[error("Truncated event at byte {pos}: needs {expected_size} bytes, {actual_size} left")]
    TruncatedEvent {
        pos: usize,
        expected_size: usize,
        actual_size: usize,
    },

    #[error("Missing zero terminator at byte {pos} (found {actual:#04x})")]
    MalformedTerminator { pos: usize, actual: u8 },
}
