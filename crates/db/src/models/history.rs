//! History row model (`history` table).

use pitlane_core::types::Timestamp;
use pitlane_core::HistoryRecord;
use sqlx::FromRow;

/// A row from the `history` table.
#[derive(Debug, Clone, FromRow)]
pub struct HistoryRow {
    pub timestamp: Timestamp,
    pub circuit: String,
    pub weather_qualifying: String,
    pub weather_race: String,
    pub selected_setup_id: Option<String>,
    pub is_favorite: bool,
}

impl From<HistoryRow> for HistoryRecord {
    fn from(row: HistoryRow) -> Self {
        HistoryRecord {
            timestamp: row.timestamp,
            circuit: row.circuit,
            weather_qualifying: row.weather_qualifying,
            weather_race: row.weather_race,
            selected_setup_id: row.selected_setup_id,
            is_favorite: row.is_favorite,
        }
    }
}
