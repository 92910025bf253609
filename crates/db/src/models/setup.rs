//! Setup row model (`setups` table).

use pitlane_core::setup::{
    Aerodynamics, Brakes, SetupRecord, SetupStyle, SourceMeta, Suspension, SuspensionGeometry,
    Transmission, Tyres,
};
use pitlane_core::types::Timestamp;
use pitlane_core::CoreError;
use sqlx::FromRow;

/// A row from the `setups` table.
#[derive(Debug, Clone, FromRow)]
pub struct SetupRow {
    pub source_url: String,
    pub source_name: String,
    pub source_published_at: Timestamp,
    pub source_community_rating: Option<f64>,
    pub game_version: String,
    pub patch: Option<String>,
    pub circuit: String,
    pub weather_qualifying: String,
    pub weather_race: String,
    pub style: String,
    pub aero_front: i32,
    pub aero_rear: i32,
    pub transmission_on_throttle: i32,
    pub transmission_off_throttle: i32,
    pub transmission_engine_braking: i32,
    pub geometry_front_camber: f64,
    pub geometry_rear_camber: f64,
    pub geometry_front_toe: f64,
    pub geometry_rear_toe: f64,
    pub suspension_front_spring: i32,
    pub suspension_rear_spring: i32,
    pub suspension_front_arb: i32,
    pub suspension_rear_arb: i32,
    pub suspension_front_ride_height: i32,
    pub suspension_rear_ride_height: i32,
    pub brakes_pressure: i32,
    pub brakes_bias: i32,
    pub tyres_front_psi: f64,
    pub tyres_rear_psi: f64,
    pub notes: Option<String>,
    pub score: f64,
}

impl TryFrom<SetupRow> for SetupRecord {
    type Error = CoreError;

    fn try_from(row: SetupRow) -> Result<Self, Self::Error> {
        Ok(SetupRecord {
            source: SourceMeta {
                url: row.source_url,
                name: row.source_name,
                published_at: row.source_published_at,
                community_rating: row.source_community_rating,
            },
            game_version: row.game_version,
            patch: row.patch,
            circuit: row.circuit,
            weather_qualifying: row.weather_qualifying,
            weather_race: row.weather_race,
            style: SetupStyle::from_str_value(&row.style)?,
            aero: Aerodynamics {
                front: row.aero_front,
                rear: row.aero_rear,
            },
            transmission: Transmission {
                on_throttle: row.transmission_on_throttle,
                off_throttle: row.transmission_off_throttle,
                engine_braking: row.transmission_engine_braking,
            },
            suspension_geometry: SuspensionGeometry {
                front_camber: row.geometry_front_camber,
                rear_camber: row.geometry_rear_camber,
                front_toe: row.geometry_front_toe,
                rear_toe: row.geometry_rear_toe,
            },
            suspension: Suspension {
                front_spring: row.suspension_front_spring,
                rear_spring: row.suspension_rear_spring,
                front_anti_roll_bar: row.suspension_front_arb,
                rear_anti_roll_bar: row.suspension_rear_arb,
                front_ride_height: row.suspension_front_ride_height,
                rear_ride_height: row.suspension_rear_ride_height,
            },
            brakes: Brakes {
                pressure: row.brakes_pressure,
                bias: row.brakes_bias,
            },
            tyres: Tyres {
                front_psi: row.tyres_front_psi,
                rear_psi: row.tyres_rear_psi,
            },
            notes: row.notes,
            score: row.score,
        })
    }
}
