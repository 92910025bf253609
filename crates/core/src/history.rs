//! User setup-selection history.

use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

/// One snapshot of what the user looked at.
///
/// Keyed by `timestamp`; a later write with the same timestamp replaces the
/// earlier one. `selected_setup_id` is a weak reference to a setup's source
/// URL and may dangle once that setup is cleared from the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub timestamp: Timestamp,
    pub circuit: String,
    pub weather_qualifying: String,
    pub weather_race: String,
    pub selected_setup_id: Option<String>,
    pub is_favorite: bool,
}
