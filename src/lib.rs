//! KF2 demo record analytics
//!
//! Decodes the binary "demo record" a wave-survival match server writes and
//! turns it into per-wave and per-session analytics:
//! - `demo`: header and tagged event decoding
//! - `record`: semantic, tick-ordered match record
//! - `analysis`: summaries, zed-time stats, buff uptime and difficulty score
//! - `runner`: batch analysis of a directory of records into JSON reports

pub mod analysis;
pub mod config;
pub mod demo;
pub mod record;
pub mod runner;
pub mod util;

use crate::analysis::{analyze_session, SessionAnalysis};
use crate::demo::DecodeError;

/// Decode a record buffer and analyze all of its waves
pub fn analyze(raw: &[u8]) -> Result<SessionAnalysis, DecodeError> {
    let record = demo::decode(raw)?;
    Ok(analyze_session(&record))
}
