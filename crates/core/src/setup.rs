//! Car setup records and their embedded parameter groups.
//!
//! A [`SetupRecord`] is a complete, ranked car setup for one
//! circuit/weather combination. Its identity is the URL it was sourced
//! from ([`SourceMeta::url`]); storing a record whose URL already exists
//! replaces the old one wholesale.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Stored string values for [`SetupStyle`].
pub const STYLE_LOW_DOWNFORCE: &str = "LOW_DOWNFORCE";
pub const STYLE_BALANCED: &str = "BALANCED";
pub const STYLE_TYRE_SAVE: &str = "TYRE_SAVE";

/// All valid style strings.
pub const VALID_STYLES: &[&str] = &[STYLE_LOW_DOWNFORCE, STYLE_BALANCED, STYLE_TYRE_SAVE];

// ---------------------------------------------------------------------------
// SetupStyle
// ---------------------------------------------------------------------------

/// Setup philosophy tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SetupStyle {
    LowDownforce,
    Balanced,
    TyreSave,
}

impl SetupStyle {
    /// Convert from a stored string value.
    pub fn from_str_value(s: &str) -> Result<Self, CoreError> {
        match s {
            STYLE_LOW_DOWNFORCE => Ok(Self::LowDownforce),
            STYLE_BALANCED => Ok(Self::Balanced),
            STYLE_TYRE_SAVE => Ok(Self::TyreSave),
            _ => Err(CoreError::Validation(format!(
                "Invalid setup style '{s}'. Must be one of: {}",
                VALID_STYLES.join(", ")
            ))),
        }
    }

    /// Convert to the stored string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LowDownforce => STYLE_LOW_DOWNFORCE,
            Self::Balanced => STYLE_BALANCED,
            Self::TyreSave => STYLE_TYRE_SAVE,
        }
    }
}

// ---------------------------------------------------------------------------
// Parameter groups
// ---------------------------------------------------------------------------

/// Front and rear wing levels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aerodynamics {
    pub front: i32,
    pub rear: i32,
}

/// Differential settings, all percentages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transmission {
    pub on_throttle: i32,
    pub off_throttle: i32,
    pub engine_braking: i32,
}

/// Camber and toe angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SuspensionGeometry {
    pub front_camber: f64,
    pub rear_camber: f64,
    pub front_toe: f64,
    pub rear_toe: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Suspension {
    pub front_spring: i32,
    pub rear_spring: i32,
    pub front_anti_roll_bar: i32,
    pub rear_anti_roll_bar: i32,
    pub front_ride_height: i32,
    pub rear_ride_height: i32,
}

/// Brake pressure and front bias, both percentages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Brakes {
    pub pressure: i32,
    pub bias: i32,
}

/// Tyre pressures in PSI.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tyres {
    pub front_psi: f64,
    pub rear_psi: f64,
}

// ---------------------------------------------------------------------------
// SetupRecord
// ---------------------------------------------------------------------------

/// Where a setup came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceMeta {
    /// Unique key of the record.
    pub url: String,
    pub name: String,
    pub published_at: Timestamp,
    pub community_rating: Option<f64>,
}

/// A fully specified car setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetupRecord {
    pub source: SourceMeta,
    pub game_version: String,
    pub patch: Option<String>,
    pub circuit: String,
    pub weather_qualifying: String,
    pub weather_race: String,
    pub style: SetupStyle,
    pub aero: Aerodynamics,
    pub transmission: Transmission,
    pub suspension_geometry: SuspensionGeometry,
    pub suspension: Suspension,
    pub brakes: Brakes,
    pub tyres: Tyres,
    pub notes: Option<String>,
    /// Ranking score, higher is better.
    pub score: f64,
}

impl SetupRecord {
    pub fn source_url(&self) -> &str {
        &self.source.url
    }

    /// Reject values the store cannot rank.
    ///
    /// SQLite stores NaN as NULL, so a non-finite score or rating would
    /// otherwise surface as a constraint failure or a silently missing
    /// rating.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !self.score.is_finite() {
            return Err(CoreError::Validation(format!(
                "score of {} must be finite, got {}",
                self.source.url, self.score
            )));
        }
        if let Some(rating) = self.source.community_rating {
            if !rating.is_finite() {
                return Err(CoreError::Validation(format!(
                    "community rating of {} must be finite, got {rating}",
                    self.source.url
                )));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
