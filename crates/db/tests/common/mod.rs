use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use pitlane_core::setup::{
    Aerodynamics, Brakes, SetupRecord, SetupStyle, SourceMeta, Suspension, SuspensionGeometry,
    Transmission, Tyres,
};
use pitlane_db::{HistoryStore, SetupStore};
use pitlane_events::EventBus;
use sqlx::SqlitePool;

pub fn published(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, day, 12, 0, 0).unwrap()
}

pub fn setup(url: &str, circuit: &str, score: f64) -> SetupRecord {
    SetupRecord {
        source: SourceMeta {
            url: url.to_string(),
            name: "SimRacingSetups".to_string(),
            published_at: published(1),
            community_rating: Some(4.2),
        },
        game_version: "F1 24".to_string(),
        patch: Some("1.13".to_string()),
        circuit: circuit.to_string(),
        weather_qualifying: "Dry".to_string(),
        weather_race: "Dry".to_string(),
        style: SetupStyle::Balanced,
        aero: Aerodynamics { front: 25, rear: 20 },
        transmission: Transmission {
            on_throttle: 50,
            off_throttle: 50,
            engine_braking: 55,
        },
        suspension_geometry: SuspensionGeometry {
            front_camber: -3.2,
            rear_camber: -1.8,
            front_toe: 0.05,
            rear_toe: 0.15,
        },
        suspension: Suspension {
            front_spring: 35,
            rear_spring: 15,
            front_anti_roll_bar: 9,
            rear_anti_roll_bar: 8,
            front_ride_height: 25,
            rear_ride_height: 50,
        },
        brakes: Brakes {
            pressure: 100,
            bias: 55,
        },
        tyres: Tyres {
            front_psi: 30.0,
            rear_psi: 22.0,
        },
        notes: Some("Balanced downforce for the fast corners.".to_string()),
        score,
    }
}

#[allow(dead_code)]
pub fn stores(pool: SqlitePool) -> (SetupStore, HistoryStore, Arc<EventBus>) {
    let bus = Arc::new(EventBus::default());
    (
        SetupStore::new(pool.clone(), Arc::clone(&bus)),
        HistoryStore::new(pool, Arc::clone(&bus)),
        bus,
    )
}
