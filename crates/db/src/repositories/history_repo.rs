//! Repository for the `history` table.

use pitlane_core::types::Timestamp;
use pitlane_core::HistoryRecord;
use sqlx::SqlitePool;

use crate::models::history::HistoryRow;

/// Column list for history queries.
const COLUMNS: &str =
    "timestamp, circuit, weather_qualifying, weather_race, selected_setup_id, is_favorite";

/// Provides data access for the user's setup history.
pub struct HistoryRepo;

impl HistoryRepo {
    /// Insert an entry, replacing any entry recorded at the same timestamp.
    pub async fn insert(pool: &SqlitePool, record: &HistoryRecord) -> Result<(), sqlx::Error> {
        let query = format!(
            "INSERT INTO history ({COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT (timestamp) DO UPDATE SET
                circuit = excluded.circuit,
                weather_qualifying = excluded.weather_qualifying,
                weather_race = excluded.weather_race,
                selected_setup_id = excluded.selected_setup_id,
                is_favorite = excluded.is_favorite"
        );
        sqlx::query(&query)
            .bind(record.timestamp)
            .bind(&record.circuit)
            .bind(&record.weather_qualifying)
            .bind(&record.weather_race)
            .bind(&record.selected_setup_id)
            .bind(record.is_favorite)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// List every entry, newest first.
    pub async fn list_all(pool: &SqlitePool) -> Result<Vec<HistoryRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM history ORDER BY timestamp DESC");
        let rows = sqlx::query_as::<_, HistoryRow>(&query)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(HistoryRecord::from).collect())
    }

    /// Find the entry recorded at exactly `timestamp`.
    pub async fn find_by_timestamp(
        pool: &SqlitePool,
        timestamp: Timestamp,
    ) -> Result<Option<HistoryRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM history WHERE timestamp = ?1");
        let row = sqlx::query_as::<_, HistoryRow>(&query)
            .bind(timestamp)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(HistoryRecord::from))
    }

    /// Delete one entry. Returns `true` if a row was deleted.
    pub async fn delete(pool: &SqlitePool, timestamp: Timestamp) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM history WHERE timestamp = ?1")
            .bind(timestamp)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every entry. Returns the number of rows removed.
    pub async fn delete_all(pool: &SqlitePool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM history").execute(pool).await?;
        Ok(result.rows_affected())
    }
}
