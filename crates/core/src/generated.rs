//! AI-generated setups.
//!
//! [`GeneratedSetup`] mirrors the JSON object the setup prompt asks the
//! model to return. It carries free-text strategy and track details that a
//! cached [`SetupRecord`] does not, so it is handed to the details view as
//! is and only converted to a record when it is cached or saved.

use serde::{Deserialize, Serialize};

use crate::setup::{
    Aerodynamics, Brakes, SetupRecord, SetupStyle, SourceMeta, Suspension, SuspensionGeometry,
    Transmission, Tyres,
};
use crate::types::Timestamp;

/// Score assigned to AI-generated setups, which carry no community rating.
pub const DEFAULT_AI_SCORE: f64 = 4.5;

/// Weather used when the model leaves `weatherCondition` empty.
pub const DEFAULT_WEATHER: &str = "Dry";

/// Wing level below which both wings count as low downforce.
const LOW_DOWNFORCE_WING_MAX: i32 = 20;

/// Wing level above which either wing counts as high downforce.
const HIGH_DOWNFORCE_WING_MIN: i32 = 35;

/// One structured setup recovered from a model response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedSetup {
    pub track_name: String,
    #[serde(default)]
    pub car_model: String,
    #[serde(default)]
    pub game_version: String,
    /// `"<qualifying> / <race>"`.
    #[serde(default)]
    pub weather_condition: String,
    /// `"QUALIFYING"` or `"RACE"`.
    #[serde(default)]
    pub setup_type: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub is_favorite: bool,

    pub front_wing_aero: i32,
    pub rear_wing_aero: i32,

    pub on_throttle: i32,
    pub off_throttle: i32,
    pub engine_braking: i32,

    pub front_camber: f64,
    pub rear_camber: f64,
    pub front_toe: f64,
    pub rear_toe: f64,

    pub front_suspension: i32,
    pub rear_suspension: i32,
    pub front_anti_roll_bar: i32,
    pub rear_anti_roll_bar: i32,
    pub front_ride_height: i32,
    pub rear_ride_height: i32,

    pub brake_pressure: i32,
    pub front_brake_bias: i32,

    pub front_left_tyre_psi: f64,
    pub front_right_tyre_psi: f64,
    pub rear_left_tyre_psi: f64,
    pub rear_right_tyre_psi: f64,

    #[serde(default)]
    pub tyre_strategy: String,
    #[serde(default)]
    pub key_pointers: String,
    #[serde(default)]
    pub creator_notes: String,

    #[serde(default)]
    pub track_length: String,
    #[serde(default)]
    pub track_corners: String,
    #[serde(default)]
    pub track_drs_zones: String,
    #[serde(default)]
    pub track_ideal_laps: String,
}

impl GeneratedSetup {
    /// Split `weather_condition` into `(qualifying, race)`.
    ///
    /// Race falls back to qualifying, qualifying falls back to
    /// [`DEFAULT_WEATHER`].
    pub fn conditions(&self) -> (String, String) {
        let mut parts = self
            .weather_condition
            .split('/')
            .map(str::trim)
            .filter(|part| !part.is_empty());
        let qualifying = parts.next().unwrap_or(DEFAULT_WEATHER).to_string();
        let race = parts.next().map(str::to_string).unwrap_or_else(|| qualifying.clone());
        (qualifying, race)
    }

    /// Classify the setup from its wing levels.
    pub fn style(&self) -> SetupStyle {
        let (front, rear) = (self.front_wing_aero, self.rear_wing_aero);
        if front < LOW_DOWNFORCE_WING_MAX && rear < LOW_DOWNFORCE_WING_MAX {
            SetupStyle::LowDownforce
        } else if front > HIGH_DOWNFORCE_WING_MIN || rear > HIGH_DOWNFORCE_WING_MIN {
            SetupStyle::Balanced
        } else {
            SetupStyle::TyreSave
        }
    }

    /// Notes text combining the model's free-text fields.
    pub fn combined_notes(&self) -> String {
        format!(
            "{}\n\nTyre Strategy: {}\n\nCreator Notes: {}",
            self.key_pointers, self.tyre_strategy, self.creator_notes
        )
    }

    /// Convert into a cacheable record filed under the track and weather the
    /// model reported.
    pub fn to_setup_record(&self, provider: &str, generated_at: Timestamp) -> SetupRecord {
        let (weather_qualifying, weather_race) = self.conditions();
        self.record_under(
            provider,
            generated_at,
            &self.track_name,
            weather_qualifying,
            weather_race,
        )
    }

    /// Convert into a record filed under an explicit circuit and weather
    /// pair, regardless of what the model echoed back.
    pub fn record_under(
        &self,
        provider: &str,
        generated_at: Timestamp,
        circuit: &str,
        weather_qualifying: String,
        weather_race: String,
    ) -> SetupRecord {
        SetupRecord {
            source: SourceMeta {
                url: ai_source_url(provider, circuit, generated_at),
                name: format!("AI Generated - {}", self.car_model),
                published_at: generated_at,
                community_rating: None,
            },
            game_version: self.game_version.clone(),
            patch: None,
            circuit: circuit.to_string(),
            weather_qualifying,
            weather_race,
            style: self.style(),
            aero: Aerodynamics {
                front: self.front_wing_aero,
                rear: self.rear_wing_aero,
            },
            transmission: Transmission {
                on_throttle: self.on_throttle,
                off_throttle: self.off_throttle,
                engine_braking: self.engine_braking,
            },
            suspension_geometry: SuspensionGeometry {
                front_camber: self.front_camber,
                rear_camber: self.rear_camber,
                front_toe: self.front_toe,
                rear_toe: self.rear_toe,
            },
            suspension: Suspension {
                front_spring: self.front_suspension,
                rear_spring: self.rear_suspension,
                front_anti_roll_bar: self.front_anti_roll_bar,
                rear_anti_roll_bar: self.rear_anti_roll_bar,
                front_ride_height: self.front_ride_height,
                rear_ride_height: self.rear_ride_height,
            },
            brakes: Brakes {
                pressure: self.brake_pressure,
                bias: self.front_brake_bias,
            },
            tyres: Tyres {
                front_psi: (self.front_left_tyre_psi + self.front_right_tyre_psi) / 2.0,
                rear_psi: (self.rear_left_tyre_psi + self.rear_right_tyre_psi) / 2.0,
            },
            notes: Some(self.combined_notes()),
            score: DEFAULT_AI_SCORE,
        }
    }
}

/// Pseudo-URL identifying an AI-generated setup: `ai://<provider>/<circuit>/<epoch millis>`.
pub fn ai_source_url(provider: &str, circuit: &str, generated_at: Timestamp) -> String {
    format!(
        "ai://{provider}/{circuit}/{}",
        generated_at.timestamp_millis()
    )
}
