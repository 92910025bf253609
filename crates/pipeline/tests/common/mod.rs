#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use pitlane_core::setup::{
    Aerodynamics, Brakes, SetupRecord, SetupStyle, SourceMeta, Suspension, SuspensionGeometry,
    Transmission, Tyres,
};
use pitlane_core::SetupQuery;
use pitlane_events::EventBus;
use pitlane_pipeline::{PipelineConfig, SetupService};
use pitlane_research::{ResearchError, SetupGenerator, SetupSource, StaticSetupSource, TextModel};
use sqlx::SqlitePool;
use tokio::sync::Semaphore;

pub const PAGE_SIZE: u64 = 3;

pub fn monza() -> SetupQuery {
    SetupQuery::new("Monza", "Dry", "Dry")
}

pub fn setup(url: &str, circuit: &str, score: f64) -> SetupRecord {
    SetupRecord {
        source: SourceMeta {
            url: url.to_string(),
            name: "F1Laps".to_string(),
            published_at: Utc.with_ymd_and_hms(2024, 10, 2, 18, 0, 0).unwrap(),
            community_rating: Some(4.8),
        },
        game_version: "F1 24".to_string(),
        patch: None,
        circuit: circuit.to_string(),
        weather_qualifying: "Dry".to_string(),
        weather_race: "Dry".to_string(),
        style: SetupStyle::LowDownforce,
        aero: Aerodynamics { front: 4, rear: 6 },
        transmission: Transmission {
            on_throttle: 100,
            off_throttle: 55,
            engine_braking: 45,
        },
        suspension_geometry: SuspensionGeometry {
            front_camber: -3.0,
            rear_camber: -1.6,
            front_toe: 0.0,
            rear_toe: 0.1,
        },
        suspension: Suspension {
            front_spring: 30,
            rear_spring: 8,
            front_anti_roll_bar: 15,
            rear_anti_roll_bar: 6,
            front_ride_height: 32,
            rear_ride_height: 40,
        },
        brakes: Brakes {
            pressure: 100,
            bias: 55,
        },
        tyres: Tyres {
            front_psi: 22.5,
            rear_psi: 20.5,
        },
        notes: Some("Trim the wings for the straights.".to_string()),
        score,
    }
}

// ---------------------------------------------------------------------------
// Provider stubs
// ---------------------------------------------------------------------------

/// Source that blocks each fetch until the test releases it.
pub struct GatedSource {
    records: Vec<SetupRecord>,
    gate: Semaphore,
    calls: AtomicUsize,
}

impl GatedSource {
    pub fn new(records: Vec<SetupRecord>) -> Arc<Self> {
        Arc::new(Self {
            records,
            gate: Semaphore::new(0),
            calls: AtomicUsize::new(0),
        })
    }

    /// Let `n` pending or future fetches through.
    pub fn release(&self, n: usize) {
        self.gate.add_permits(n);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SetupSource for GatedSource {
    async fn fetch(&self, query: &SetupQuery) -> Result<Vec<SetupRecord>, ResearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let permit = self
            .gate
            .acquire()
            .await
            .map_err(|e| ResearchError::Upstream(e.to_string()))?;
        permit.forget();
        Ok(self
            .records
            .iter()
            .filter(|r| query.matches(r))
            .cloned()
            .collect())
    }
}

/// Source that always fails.
pub struct FailingSource;

#[async_trait]
impl SetupSource for FailingSource {
    async fn fetch(&self, _query: &SetupQuery) -> Result<Vec<SetupRecord>, ResearchError> {
        Err(ResearchError::Api {
            status: 502,
            body: "bad gateway".to_string(),
        })
    }
}

/// Source that never answers.
pub struct SilentSource;

#[async_trait]
impl SetupSource for SilentSource {
    async fn fetch(&self, _query: &SetupQuery) -> Result<Vec<SetupRecord>, ResearchError> {
        std::future::pending().await
    }
}

/// Text model that always gives the same answer.
pub struct CannedModel(pub String);

#[async_trait]
impl TextModel for CannedModel {
    fn provider(&self) -> &str {
        "canned"
    }

    async fn generate(&self, _prompt: &str) -> Result<String, ResearchError> {
        Ok(self.0.clone())
    }
}

pub const SPA_JSON: &str = r#"Sure! Here is a setup:
```json
{
    "trackName": "Spa",
    "carModel": "McLaren MCL38",
    "gameVersion": "F1 24",
    "weatherCondition": "Wet / Dry",
    "setupType": "RACE",
    "frontWingAero": 30, "rearWingAero": 28,
    "onThrottle": 70, "offThrottle": 55, "engineBraking": 50,
    "frontCamber": -2.8, "rearCamber": -1.4, "frontToe": 0.05, "rearToe": 0.2,
    "frontSuspension": 24, "rearSuspension": 10,
    "frontAntiRollBar": 10, "rearAntiRollBar": 8,
    "frontRideHeight": 30, "rearRideHeight": 44,
    "brakePressure": 95, "frontBrakeBias": 56,
    "frontLeftTyrePsi": 23.0, "frontRightTyrePsi": 23.0,
    "rearLeftTyrePsi": 21.0, "rearRightTyrePsi": 21.0,
    "tyreStrategy": "Inters then Mediums.",
    "keyPointers": "Careful through Eau Rouge.",
    "creatorNotes": "Wet qualifying focus.",
    "trackLength": "7.004 km",
}
```"#;

// ---------------------------------------------------------------------------
// Service wiring
// ---------------------------------------------------------------------------

pub fn config() -> PipelineConfig {
    PipelineConfig {
        page_size: PAGE_SIZE,
        fetch_timeout: Duration::from_secs(5),
        ..PipelineConfig::default()
    }
}

pub fn service_with(pool: SqlitePool, source: Arc<dyn SetupSource>) -> SetupService {
    let generator = SetupGenerator::new(Arc::new(CannedModel(SPA_JSON.to_string())));
    SetupService::new(pool, Arc::new(EventBus::default()), source, generator, &config())
}

pub fn service(pool: SqlitePool, records: Vec<SetupRecord>) -> SetupService {
    service_with(pool, Arc::new(StaticSetupSource::new(records)))
}
