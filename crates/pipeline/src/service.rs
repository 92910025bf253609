//! The inbound surface of the setup pipeline.
//!
//! [`SetupService`] is what a screen or view model talks to. It owns the
//! stores, the cache coordinator, the AI generator and the handoff slot,
//! and [`SetupService::connect`] wires all of them from a
//! [`PipelineConfig`].

use std::sync::Arc;

use chrono::Utc;
use futures::stream::BoxStream;
use pitlane_core::types::Timestamp;
use pitlane_core::{CoreError, GeneratedSetup, HistoryRecord, SetupQuery, SetupRecord};
use pitlane_db::{HistoryStore, SetupStore, StoreError};
use pitlane_events::EventBus;
use pitlane_research::{GeminiApi, SetupAssistant, SetupGenerator, SetupSource};

use crate::config::PipelineConfig;
use crate::coordinator::CacheCoordinator;
use crate::error::ServiceError;
use crate::handoff::HandoffSlot;
use crate::history_feed::history_feed;
use crate::paging::SetupPager;

pub struct SetupService {
    setups: SetupStore,
    history: HistoryStore,
    coordinator: CacheCoordinator,
    generator: SetupGenerator,
    assistant: SetupAssistant,
    handoff: HandoffSlot<GeneratedSetup>,
    page_size: u64,
}

impl SetupService {
    /// Assemble a service from already-built parts.
    ///
    /// `source` feeds the cache; `generator` serves direct AI requests and
    /// the assistant. In production both are the same Gemini-backed
    /// generator.
    pub fn new(
        pool: pitlane_db::DbPool,
        bus: Arc<EventBus>,
        source: Arc<dyn SetupSource>,
        generator: SetupGenerator,
        config: &PipelineConfig,
    ) -> Self {
        let setups = SetupStore::new(pool.clone(), Arc::clone(&bus));
        let history = HistoryStore::new(pool, bus);
        let coordinator = CacheCoordinator::new(source, setups.clone(), config.fetch_timeout);

        Self {
            setups,
            history,
            coordinator,
            assistant: SetupAssistant::new(generator.clone()),
            generator,
            handoff: HandoffSlot::new(),
            page_size: config.page_size,
        }
    }

    /// Open the database, apply migrations and wire the Gemini provider.
    pub async fn connect(config: &PipelineConfig) -> Result<Self, ServiceError> {
        let pool = pitlane_db::create_pool(&config.database_url)
            .await
            .map_err(StoreError::from)?;
        pitlane_db::run_migrations(&pool)
            .await
            .map_err(StoreError::from)?;
        tracing::info!(database_url = %config.database_url, "Setup database ready");

        if config.gemini_api_key.is_empty() {
            tracing::warn!("GEMINI_API_KEY is empty; AI requests will be rejected upstream");
        }
        let api = GeminiApi::new(
            config.gemini_api_url.clone(),
            config.gemini_api_key.clone(),
            config.gemini_model.clone(),
            config.ai_timeout,
        )?;
        let generator = SetupGenerator::new(Arc::new(api)).with_timeout(config.ai_timeout);
        let source: Arc<dyn SetupSource> = Arc::new(generator.clone());
        let bus = Arc::new(EventBus::new(config.event_bus_capacity));

        Ok(Self::new(pool, bus, source, generator, config))
    }

    pub fn setup_store(&self) -> &SetupStore {
        &self.setups
    }

    pub fn history_store(&self) -> &HistoryStore {
        &self.history
    }

    pub fn coordinator(&self) -> &CacheCoordinator {
        &self.coordinator
    }

    // -----------------------------------------------------------------------
    // Setups
    // -----------------------------------------------------------------------

    /// Open a live view of cached setups and refresh them in the background.
    ///
    /// The pager subscribes before the refresh starts, so the refreshed
    /// rows always reach it. Dropping the pager does not stop the refresh.
    pub fn request_setups(&self, query: SetupQuery) -> SetupPager {
        let pager = SetupPager::new(self.setups.clone(), query.clone(), self.page_size);
        self.coordinator.spawn_refresh(query);
        pager
    }

    /// A cached setup by source URL.
    pub async fn request_setup_detail(&self, source_url: &str) -> Result<SetupRecord, ServiceError> {
        self.setups
            .get_by_key(source_url)
            .await?
            .ok_or_else(|| {
                CoreError::NotFound {
                    entity: "Setup",
                    key: source_url.to_string(),
                }
                .into()
            })
    }

    /// Generate a setup now and place it in the handoff slot.
    pub async fn request_ai_setup(
        &self,
        circuit: &str,
        session_type: &str,
        weather_qualifying: &str,
        weather_race: &str,
    ) -> Result<GeneratedSetup, ServiceError> {
        let generated = self
            .generator
            .generate(circuit, session_type, weather_qualifying, weather_race)
            .await?;
        self.handoff.set(generated.clone());
        Ok(generated)
    }

    /// Persist a setup, e.g. when the user favourites it.
    pub async fn save_setup(&self, record: &SetupRecord) -> Result<(), ServiceError> {
        self.setups.upsert_one(record).await?;
        Ok(())
    }

    /// Convert a generated setup into a record and persist it.
    pub async fn save_generated(&self, generated: &GeneratedSetup) -> Result<SetupRecord, ServiceError> {
        let record = generated.to_setup_record(self.generator.provider(), Utc::now());
        self.setups.upsert_one(&record).await?;
        tracing::info!(source_url = %record.source.url, "Generated setup saved");
        Ok(record)
    }

    pub async fn clear_circuit(&self, circuit: &str) -> Result<u64, ServiceError> {
        Ok(self.setups.delete_by_circuit(circuit).await?)
    }

    pub async fn clear_all_setups(&self) -> Result<u64, ServiceError> {
        Ok(self.setups.delete_all().await?)
    }

    // -----------------------------------------------------------------------
    // Handoff slot
    // -----------------------------------------------------------------------

    pub fn handoff_setup(&self) -> Option<GeneratedSetup> {
        self.handoff.get()
    }

    pub fn set_handoff_setup(&self, setup: GeneratedSetup) {
        self.handoff.set(setup);
    }

    pub fn clear_handoff_setup(&self) {
        self.handoff.clear();
    }

    /// Read the handoff value once, leaving the slot empty.
    pub fn take_handoff_setup(&self) -> Option<GeneratedSetup> {
        self.handoff.take()
    }

    // -----------------------------------------------------------------------
    // History
    // -----------------------------------------------------------------------

    /// Live history list, newest first.
    pub fn request_history(&self) -> BoxStream<'static, Result<Vec<HistoryRecord>, StoreError>> {
        history_feed(self.history.clone())
    }

    pub async fn record_history(&self, entry: &HistoryRecord) -> Result<(), ServiceError> {
        self.history.insert(entry).await?;
        Ok(())
    }

    pub async fn history_by_timestamp(
        &self,
        timestamp: Timestamp,
    ) -> Result<Option<HistoryRecord>, ServiceError> {
        Ok(self.history.get_by_timestamp(timestamp).await?)
    }

    pub async fn delete_history(&self, timestamp: Timestamp) -> Result<bool, ServiceError> {
        Ok(self.history.delete_one(timestamp).await?)
    }

    pub async fn clear_history(&self) -> Result<u64, ServiceError> {
        Ok(self.history.delete_all().await?)
    }

    // -----------------------------------------------------------------------
    // Assistant and lifecycle
    // -----------------------------------------------------------------------

    pub async fn ask_assistant(&self, message: &str) -> Result<String, ServiceError> {
        Ok(self.assistant.ask(message).await?)
    }

    /// Cancel background refreshes and wait for them to stop.
    pub async fn shutdown(&self) {
        self.coordinator.shutdown().await;
    }
}
