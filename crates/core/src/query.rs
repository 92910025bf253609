//! Cache filters.
//!
//! A [`SetupQuery`] selects cached setups by exact circuit and weather
//! strings, optionally narrowed to one [`SetupStyle`]. Its
//! [`QueryShape`] (the style-less triple) is what store change
//! notifications are keyed by.

use serde::{Deserialize, Serialize};

use crate::setup::{SetupRecord, SetupStyle};

/// The `(circuit, weather_qualifying, weather_race)` triple a stored row
/// is filed under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryShape {
    pub circuit: String,
    pub weather_qualifying: String,
    pub weather_race: String,
}

impl QueryShape {
    /// The shape a stored record belongs to.
    pub fn of(record: &SetupRecord) -> Self {
        Self {
            circuit: record.circuit.clone(),
            weather_qualifying: record.weather_qualifying.clone(),
            weather_race: record.weather_race.clone(),
        }
    }
}

/// Filter used to read from and populate the setup cache.
///
/// String comparison is exact and case-sensitive. A `None` style matches
/// every style.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SetupQuery {
    pub circuit: String,
    pub weather_qualifying: String,
    pub weather_race: String,
    pub style: Option<SetupStyle>,
}

impl SetupQuery {
    pub fn new(
        circuit: impl Into<String>,
        weather_qualifying: impl Into<String>,
        weather_race: impl Into<String>,
    ) -> Self {
        Self {
            circuit: circuit.into(),
            weather_qualifying: weather_qualifying.into(),
            weather_race: weather_race.into(),
            style: None,
        }
    }

    /// Narrow the query to a single style.
    pub fn with_style(mut self, style: SetupStyle) -> Self {
        self.style = Some(style);
        self
    }

    pub fn shape(&self) -> QueryShape {
        QueryShape {
            circuit: self.circuit.clone(),
            weather_qualifying: self.weather_qualifying.clone(),
            weather_race: self.weather_race.clone(),
        }
    }

    /// Whether `record` would be returned by this query.
    pub fn matches(&self, record: &SetupRecord) -> bool {
        record.circuit == self.circuit
            && record.weather_qualifying == self.weather_qualifying
            && record.weather_race == self.weather_race
            && self.style.map_or(true, |style| record.style == style)
    }
}
