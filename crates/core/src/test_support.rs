use chrono::{TimeZone, Utc};

use crate::setup::{
    Aerodynamics, Brakes, SetupRecord, SetupStyle, SourceMeta, Suspension, SuspensionGeometry,
    Transmission, Tyres,
};

pub(crate) fn sample_record(url: &str, circuit: &str, score: f64) -> SetupRecord {
    SetupRecord {
        source: SourceMeta {
            url: url.to_string(),
            name: "F1Laps".to_string(),
            published_at: Utc.with_ymd_and_hms(2024, 9, 1, 12, 0, 0).unwrap(),
            community_rating: Some(4.5),
        },
        game_version: "F1 24".to_string(),
        patch: Some("1.13".to_string()),
        circuit: circuit.to_string(),
        weather_qualifying: "Dry".to_string(),
        weather_race: "Dry".to_string(),
        style: SetupStyle::LowDownforce,
        aero: Aerodynamics { front: 15, rear: 10 },
        transmission: Transmission {
            on_throttle: 45,
            off_throttle: 45,
            engine_braking: 50,
        },
        suspension_geometry: SuspensionGeometry {
            front_camber: -3.5,
            rear_camber: -2.0,
            front_toe: 0.0,
            rear_toe: 0.1,
        },
        suspension: Suspension {
            front_spring: 41,
            rear_spring: 11,
            front_anti_roll_bar: 11,
            rear_anti_roll_bar: 10,
            front_ride_height: 20,
            rear_ride_height: 47,
        },
        brakes: Brakes {
            pressure: 100,
            bias: 54,
        },
        tyres: Tyres {
            front_psi: 29.5,
            rear_psi: 21.5,
        },
        notes: None,
        score,
    }
}
