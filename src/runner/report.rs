//! JSON report handed to the persistence side

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analysis::SessionAnalysis;
use crate::demo::Perk;
use crate::record::Record;
use crate::util::time::ticks_to_secs;

/// Buff uptime of one (session, player, perk), in seconds
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuffUptimeRow {
    pub session_id: i32,
    /// Record-local index
    pub user_id: u8,
    /// Platform account id, used to resolve the durable user
    pub unique_id: Option<String>,
    pub perk: Option<Perk>,
    pub buffed_secs: f64,
    pub total_secs: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// File the record was read from
    pub source: String,
    pub session_id: i32,
    pub analyzed_at: DateTime<Utc>,
    pub analysis: SessionAnalysis,
    pub buff_uptime_rows: Vec<BuffUptimeRow>,
}

impl AnalysisReport {
    pub fn new(source: String, record: &Record, analysis: SessionAnalysis) -> Self {
        let buff_uptime_rows = buff_uptime_rows(record, &analysis);
        Self {
            source,
            session_id: analysis.session_id,
            analyzed_at: Utc::now(),
            analysis,
            buff_uptime_rows,
        }
    }
}

pub fn buff_uptime_rows(record: &Record, analysis: &SessionAnalysis) -> Vec<BuffUptimeRow> {
    analysis
        .buffs
        .iter()
        .map(|entry| BuffUptimeRow {
            session_id: analysis.session_id,
            user_id: entry.user_id,
            unique_id: record.player(entry.user_id).map(|p| p.unique_id.clone()),
            perk: entry.perk,
            buffed_secs: ticks_to_secs(entry.buffed_ticks),
            total_secs: ticks_to_secs(entry.total_ticks),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze_session;
    use crate::demo::testing::RecordWriter;
    use crate::demo::{decode, UserType};

    #[test]
    fn rows_carry_platform_id_and_seconds() {
        let raw = RecordWriter::new(77)
            .player_join(0, 3, UserType::Steam, "76561198000000003")
            .perk_change(5, 3, 9)
            .wave_start(100, 1, 30)
            .buff(200, 3, 1)
            .buff(400, 3, 0)
            .zeds_left(1100, 0)
            .finish();
        let record = decode(&raw).expect("valid");
        let analysis = analyze_session(&record);

        let rows = buff_uptime_rows(&record, &analysis);
        assert_eq!(
            rows,
            vec![BuffUptimeRow {
                session_id: 77,
                user_id: 3,
                unique_id: Some("76561198000000003".to_string()),
                perk: Some(Perk::Swat),
                buffed_secs: 2.0,
                total_secs: 10.0,
            }]
        );
    }
}
