//! AI setup generation: prompt, deadline, recovery.

use std::sync::Arc;
use std::time::Duration;

use pitlane_core::extract::recover_as;
use pitlane_core::GeneratedSetup;

use crate::error::ResearchError;
use crate::model::TextModel;
use crate::prompt::setup_prompt;

/// Deadline for one generation round trip.
pub const GENERATION_TIMEOUT: Duration = Duration::from_secs(60);

/// Session type used when the cache asks for setups.
pub const RACE_SESSION: &str = "Race";

/// Produces [`GeneratedSetup`]s from a [`TextModel`].
#[derive(Clone)]
pub struct SetupGenerator {
    model: Arc<dyn TextModel>,
    timeout: Duration,
}

impl SetupGenerator {
    pub fn new(model: Arc<dyn TextModel>) -> Self {
        Self {
            model,
            timeout: GENERATION_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn provider(&self) -> &str {
        self.model.provider()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// One round trip to the model, recovered into a [`GeneratedSetup`].
    ///
    /// Fails with [`ResearchError::Timeout`] when the model does not answer
    /// in time and [`ResearchError::MalformedResponse`] when no setup object
    /// can be recovered from the answer.
    pub async fn generate(
        &self,
        circuit: &str,
        session_type: &str,
        weather_qualifying: &str,
        weather_race: &str,
    ) -> Result<GeneratedSetup, ResearchError> {
        tracing::debug!(
            circuit,
            session_type,
            weather_qualifying,
            weather_race,
            provider = self.provider(),
            "Requesting AI setup"
        );

        let prompt = setup_prompt(circuit, session_type, weather_qualifying, weather_race);
        let raw = self.complete(&prompt).await?;

        match recover_as::<GeneratedSetup>(&raw) {
            Ok(setup) => {
                tracing::info!(circuit, track = %setup.track_name, "AI setup generated");
                Ok(setup)
            }
            Err(e) => {
                tracing::warn!(circuit, error = %e, "Could not recover setup from AI response");
                Err(ResearchError::MalformedResponse {
                    reason: e.to_string(),
                    raw,
                })
            }
        }
    }

    /// Run `prompt` through the model under this generator's deadline.
    pub(crate) async fn complete(&self, prompt: &str) -> Result<String, ResearchError> {
        match tokio::time::timeout(self.timeout, self.model.generate(prompt)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    provider = self.provider(),
                    timeout_secs = self.timeout.as_secs(),
                    "AI call timed out"
                );
                Err(ResearchError::Timeout {
                    after: self.timeout,
                })
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod test_model {
    use async_trait::async_trait;

    use super::*;

    /// Model that replies with a fixed text, or never replies.
    pub(crate) enum ScriptedModel {
        Reply(String),
        Fail(u16),
        Hang,
    }

    #[async_trait]
    impl TextModel for ScriptedModel {
        fn provider(&self) -> &str {
            "scripted"
        }

        async fn generate(&self, _prompt: &str) -> Result<String, ResearchError> {
            match self {
                Self::Reply(text) => Ok(text.clone()),
                Self::Fail(status) => Err(ResearchError::Api {
                    status: *status,
                    body: "unavailable".to_string(),
                }),
                Self::Hang => std::future::pending().await,
            }
        }
    }

    pub(crate) const MONZA_JSON: &str = r#"{
        "trackName": "Monza",
        "carModel": "Ferrari SF-24",
        "gameVersion": "F1 24",
        "weatherCondition": "Dry / Dry",
        "setupType": "RACE",
        "frontWingAero": 5, "rearWingAero": 8,
        "onThrottle": 100, "offThrottle": 60, "engineBraking": 40,
        "frontCamber": -3.0, "rearCamber": -1.5, "frontToe": 0.0, "rearToe": 0.1,
        "frontSuspension": 35, "rearSuspension": 5,
        "frontAntiRollBar": 17, "rearAntiRollBar": 4,
        "frontRideHeight": 35, "rearRideHeight": 41,
        "brakePressure": 100, "frontBrakeBias": 54,
        "frontLeftTyrePsi": 22.5, "frontRightTyrePsi": 22.5,
        "rearLeftTyrePsi": 20.0, "rearRightTyrePsi": 21.0,
        "tyreStrategy": "Medium to Hard, 1-stop.",
        "keyPointers": "Low downforce.",
        "creatorNotes": "Straight-line speed first.",
    }"#;

    pub(crate) fn generator(model: ScriptedModel) -> SetupGenerator {
        SetupGenerator::new(Arc::new(model))
    }
}
