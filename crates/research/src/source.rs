//! Setup providers.
//!
//! A [`SetupSource`] answers "which setups exist for these conditions".
//! It may be slow and it may legitimately return nothing; only transport or
//! response problems are errors.

use async_trait::async_trait;
use chrono::Utc;
use pitlane_core::{SetupQuery, SetupRecord};

use crate::error::ResearchError;
use crate::generator::{SetupGenerator, RACE_SESSION};

/// Slow external provider of setups.
#[async_trait]
pub trait SetupSource: Send + Sync {
    /// Setups for `query`. An empty list is a normal outcome.
    async fn fetch(&self, query: &SetupQuery) -> Result<Vec<SetupRecord>, ResearchError>;
}

/// The production source: one AI-generated race setup per fetch, filed
/// under the circuit and weather that were asked for.
#[async_trait]
impl SetupSource for SetupGenerator {
    async fn fetch(&self, query: &SetupQuery) -> Result<Vec<SetupRecord>, ResearchError> {
        let generated = self
            .generate(
                &query.circuit,
                RACE_SESSION,
                &query.weather_qualifying,
                &query.weather_race,
            )
            .await?;

        let record = generated.record_under(
            self.provider(),
            Utc::now(),
            &query.circuit,
            query.weather_qualifying.clone(),
            query.weather_race.clone(),
        );

        // The model picks the style; a styled query only keeps a match.
        Ok(query
            .matches(&record)
            .then_some(record)
            .into_iter()
            .collect())
    }
}

/// In-memory source over a fixed list of records.
#[derive(Debug, Clone, Default)]
pub struct StaticSetupSource {
    records: Vec<SetupRecord>,
}

impl StaticSetupSource {
    pub fn new(records: Vec<SetupRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl SetupSource for StaticSetupSource {
    async fn fetch(&self, query: &SetupQuery) -> Result<Vec<SetupRecord>, ResearchError> {
        Ok(self
            .records
            .iter()
            .filter(|record| query.matches(record))
            .cloned()
            .collect())
    }
}
