//! Repository for the `setups` table.

use pitlane_core::{QueryShape, SetupQuery, SetupRecord};
use sqlx::{Executor, Sqlite, SqlitePool};

use crate::models::setup::SetupRow;

/// Column list for setups queries.
const COLUMNS: &str = "source_url, source_name, source_published_at, source_community_rating, \
    game_version, patch, circuit, weather_qualifying, weather_race, style, \
    aero_front, aero_rear, \
    transmission_on_throttle, transmission_off_throttle, transmission_engine_braking, \
    geometry_front_camber, geometry_rear_camber, geometry_front_toe, geometry_rear_toe, \
    suspension_front_spring, suspension_rear_spring, suspension_front_arb, suspension_rear_arb, \
    suspension_front_ride_height, suspension_rear_ride_height, \
    brakes_pressure, brakes_bias, tyres_front_psi, tyres_rear_psi, notes, score";

/// Provides data access for cached setups.
pub struct SetupRepo;

impl SetupRepo {
    /// Insert a setup, replacing every column of an existing row with the
    /// same `source_url`.
    ///
    /// Takes any executor so a batch can run inside one transaction.
    pub async fn upsert<'e, E>(executor: E, record: &SetupRecord) -> Result<(), sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let query = format!(
            "INSERT INTO setups ({COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10,
                     ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20,
                     ?21, ?22, ?23, ?24, ?25, ?26, ?27, ?28, ?29, ?30, ?31)
             ON CONFLICT (source_url) DO UPDATE SET
                source_name = excluded.source_name,
                source_published_at = excluded.source_published_at,
                source_community_rating = excluded.source_community_rating,
                game_version = excluded.game_version,
                patch = excluded.patch,
                circuit = excluded.circuit,
                weather_qualifying = excluded.weather_qualifying,
                weather_race = excluded.weather_race,
                style = excluded.style,
                aero_front = excluded.aero_front,
                aero_rear = excluded.aero_rear,
                transmission_on_throttle = excluded.transmission_on_throttle,
                transmission_off_throttle = excluded.transmission_off_throttle,
                transmission_engine_braking = excluded.transmission_engine_braking,
                geometry_front_camber = excluded.geometry_front_camber,
                geometry_rear_camber = excluded.geometry_rear_camber,
                geometry_front_toe = excluded.geometry_front_toe,
                geometry_rear_toe = excluded.geometry_rear_toe,
                suspension_front_spring = excluded.suspension_front_spring,
                suspension_rear_spring = excluded.suspension_rear_spring,
                suspension_front_arb = excluded.suspension_front_arb,
                suspension_rear_arb = excluded.suspension_rear_arb,
                suspension_front_ride_height = excluded.suspension_front_ride_height,
                suspension_rear_ride_height = excluded.suspension_rear_ride_height,
                brakes_pressure = excluded.brakes_pressure,
                brakes_bias = excluded.brakes_bias,
                tyres_front_psi = excluded.tyres_front_psi,
                tyres_rear_psi = excluded.tyres_rear_psi,
                notes = excluded.notes,
                score = excluded.score"
        );
        sqlx::query(&query)
            .bind(&record.source.url)
            .bind(&record.source.name)
            .bind(record.source.published_at)
            .bind(record.source.community_rating)
            .bind(&record.game_version)
            .bind(&record.patch)
            .bind(&record.circuit)
            .bind(&record.weather_qualifying)
            .bind(&record.weather_race)
            .bind(record.style.as_str())
            .bind(record.aero.front)
            .bind(record.aero.rear)
            .bind(record.transmission.on_throttle)
            .bind(record.transmission.off_throttle)
            .bind(record.transmission.engine_braking)
            .bind(record.suspension_geometry.front_camber)
            .bind(record.suspension_geometry.rear_camber)
            .bind(record.suspension_geometry.front_toe)
            .bind(record.suspension_geometry.rear_toe)
            .bind(record.suspension.front_spring)
            .bind(record.suspension.rear_spring)
            .bind(record.suspension.front_anti_roll_bar)
            .bind(record.suspension.rear_anti_roll_bar)
            .bind(record.suspension.front_ride_height)
            .bind(record.suspension.rear_ride_height)
            .bind(record.brakes.pressure)
            .bind(record.brakes.bias)
            .bind(record.tyres.front_psi)
            .bind(record.tyres.rear_psi)
            .bind(&record.notes)
            .bind(record.score)
            .execute(executor)
            .await?;
        Ok(())
    }

    /// Shape a stored setup is currently filed under, if it exists.
    pub async fn find_shape<'e, E>(
        executor: E,
        source_url: &str,
    ) -> Result<Option<QueryShape>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row: Option<(String, String, String)> = sqlx::query_as(
            "SELECT circuit, weather_qualifying, weather_race FROM setups WHERE source_url = ?1",
        )
        .bind(source_url)
        .fetch_optional(executor)
        .await?;
        Ok(row.map(|(circuit, weather_qualifying, weather_race)| QueryShape {
            circuit,
            weather_qualifying,
            weather_race,
        }))
    }

    /// Upsert a batch inside one transaction; either every record lands or
    /// none does.
    ///
    /// Returns the shapes the replaced rows were filed under before the
    /// write, so callers can invalidate views of rows that moved away.
    pub async fn upsert_many(
        pool: &SqlitePool,
        records: &[SetupRecord],
    ) -> Result<Vec<QueryShape>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut previous = Vec::new();
        for record in records {
            if let Some(shape) = Self::find_shape(&mut *tx, &record.source.url).await? {
                previous.push(shape);
            }
            Self::upsert(&mut *tx, record).await?;
        }
        tx.commit().await?;
        Ok(previous)
    }

    /// One page of setups matching `query`, best first.
    ///
    /// Ordered by score, then newest publication, then URL so that equal
    /// rows still have a stable position across pages.
    pub async fn find_page(
        pool: &SqlitePool,
        query: &SetupQuery,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<SetupRecord>, sqlx::Error> {
        let sql = format!(
            "SELECT {COLUMNS} FROM setups
             WHERE circuit = ?1 AND weather_qualifying = ?2 AND weather_race = ?3
               AND (?4 IS NULL OR style = ?4)
             ORDER BY score DESC, source_published_at DESC, source_url ASC
             LIMIT ?5 OFFSET ?6"
        );
        let rows = sqlx::query_as::<_, SetupRow>(&sql)
            .bind(&query.circuit)
            .bind(&query.weather_qualifying)
            .bind(&query.weather_race)
            .bind(query.style.map(|style| style.as_str()))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;
        rows.into_iter().map(into_record).collect()
    }

    /// Count setups matching `query`.
    pub async fn count(pool: &SqlitePool, query: &SetupQuery) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM setups
             WHERE circuit = ?1 AND weather_qualifying = ?2 AND weather_race = ?3
               AND (?4 IS NULL OR style = ?4)",
        )
        .bind(&query.circuit)
        .bind(&query.weather_qualifying)
        .bind(&query.weather_race)
        .bind(query.style.map(|style| style.as_str()))
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }

    /// Find a setup by its source URL.
    pub async fn find_by_source_url(
        pool: &SqlitePool,
        source_url: &str,
    ) -> Result<Option<SetupRecord>, sqlx::Error> {
        let sql = format!("SELECT {COLUMNS} FROM setups WHERE source_url = ?1");
        sqlx::query_as::<_, SetupRow>(&sql)
            .bind(source_url)
            .fetch_optional(pool)
            .await?
            .map(into_record)
            .transpose()
    }

    /// Delete every setup for a circuit. Returns the number of rows removed.
    pub async fn delete_by_circuit(pool: &SqlitePool, circuit: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM setups WHERE circuit = ?1")
            .bind(circuit)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Delete every setup. Returns the number of rows removed.
    pub async fn delete_all(pool: &SqlitePool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM setups").execute(pool).await?;
        Ok(result.rows_affected())
    }
}

fn into_record(row: SetupRow) -> Result<SetupRecord, sqlx::Error> {
    SetupRecord::try_from(row).map_err(|e| sqlx::Error::Decode(Box::new(e)))
}
