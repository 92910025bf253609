//! Direct request/response calls on the setup service.

mod common;

use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use chrono::{TimeZone, Utc};
use common::{monza, service, setup, CannedModel, SPA_JSON};
use futures::StreamExt;
use pitlane_core::{CoreError, HistoryRecord, SetupStyle};
use pitlane_events::EventBus;
use pitlane_pipeline::{PipelineConfig, ServiceError, SetupService};
use pitlane_research::{ResearchError, SetupGenerator, StaticSetupSource};
use sqlx::SqlitePool;

fn history_entry(minute: u32, circuit: &str) -> HistoryRecord {
    HistoryRecord {
        timestamp: Utc.with_ymd_and_hms(2025, 2, 1, 20, minute, 0).unwrap(),
        circuit: circuit.to_string(),
        weather_qualifying: "Dry".to_string(),
        weather_race: "Dry".to_string(),
        selected_setup_id: None,
        is_favorite: false,
    }
}

// ---------------------------------------------------------------------------
// Setup details and maintenance
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn detail_miss_is_not_found(pool: SqlitePool) {
    let svc = service(pool, Vec::new());

    let err = svc
        .request_setup_detail("https://nowhere.example")
        .await
        .unwrap_err();

    assert_matches!(
        err,
        ServiceError::Core(CoreError::NotFound { entity: "Setup", key }) if key == "https://nowhere.example"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn saved_setup_is_returned_by_detail(pool: SqlitePool) {
    let svc = service(pool, Vec::new());
    let record = setup("https://example.com/monza", "Monza", 0.8);

    svc.save_setup(&record).await.unwrap();

    assert_eq!(
        svc.request_setup_detail("https://example.com/monza")
            .await
            .unwrap(),
        record
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn clear_circuit_and_clear_all(pool: SqlitePool) {
    let svc = service(pool, Vec::new());
    svc.save_setup(&setup("https://example.com/m", "Monza", 0.8))
        .await
        .unwrap();
    svc.save_setup(&setup("https://example.com/s", "Spa", 0.8))
        .await
        .unwrap();

    assert_eq!(svc.clear_circuit("Monza").await.unwrap(), 1);
    assert_matches!(
        svc.request_setup_detail("https://example.com/m").await,
        Err(ServiceError::Core(CoreError::NotFound { .. }))
    );
    assert_eq!(svc.clear_all_setups().await.unwrap(), 1);
}

// ---------------------------------------------------------------------------
// AI setups and the handoff slot
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn ai_setup_lands_in_handoff_slot(pool: SqlitePool) {
    let svc = service(pool, Vec::new());

    let generated = svc
        .request_ai_setup("Spa", "Race", "Wet", "Dry")
        .await
        .unwrap();

    assert_eq!(generated.track_name, "Spa");
    assert_eq!(generated.track_length, "7.004 km");
    assert_eq!(generated.track_corners, "");
    assert_eq!(svc.handoff_setup(), Some(generated.clone()));
    assert_eq!(svc.take_handoff_setup(), Some(generated));
    assert_eq!(svc.handoff_setup(), None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn malformed_ai_answer_is_reported_and_slot_untouched(pool: SqlitePool) {
    let generator = SetupGenerator::new(Arc::new(CannedModel("No idea, sorry.".to_string())));
    let svc = SetupService::new(
        pool,
        Arc::new(EventBus::default()),
        Arc::new(StaticSetupSource::default()),
        generator,
        &PipelineConfig::default(),
    );

    let err = svc
        .request_ai_setup("Spa", "Race", "Dry", "Dry")
        .await
        .unwrap_err();

    assert_matches!(
        err,
        ServiceError::Provider(ResearchError::MalformedResponse { raw, .. }) if raw == "No idea, sorry."
    );
    assert!(svc.handoff_setup().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn handoff_keeps_only_the_latest_value(pool: SqlitePool) {
    let svc = service(pool, Vec::new());
    let a = svc
        .request_ai_setup("Spa", "Race", "Wet", "Dry")
        .await
        .unwrap();
    let mut b = a.clone();
    b.track_name = "Suzuka".to_string();

    svc.set_handoff_setup(a);
    svc.set_handoff_setup(b.clone());

    assert_eq!(svc.handoff_setup(), Some(b));
    svc.clear_handoff_setup();
    assert_eq!(svc.handoff_setup(), None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn saving_generated_setup_files_it_under_its_weather(pool: SqlitePool) {
    let svc = service(pool, Vec::new());
    let generated = svc
        .request_ai_setup("Spa", "Race", "Wet", "Dry")
        .await
        .unwrap();

    let record = svc.save_generated(&generated).await.unwrap();

    assert!(record.source_url().starts_with("ai://canned/Spa/"));
    assert_eq!(record.weather_qualifying, "Wet");
    assert_eq!(record.weather_race, "Dry");
    assert_eq!(record.style, SetupStyle::TyreSave);
    assert_eq!(record.score, 4.5);
    assert_eq!(
        svc.request_setup_detail(record.source_url()).await.unwrap(),
        record
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn assistant_answers_through_the_model(pool: SqlitePool) {
    let svc = service(pool, Vec::new());
    let answer = svc.ask_assistant("What about Spa?").await.unwrap();
    assert!(answer.starts_with("Sure!"));
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn history_stream_follows_writes(pool: SqlitePool) {
    let svc = service(pool, Vec::new());
    let mut feed = svc.request_history();

    let initial = feed.next().await.unwrap().unwrap();
    assert!(initial.is_empty());

    svc.record_history(&history_entry(1, "Monza")).await.unwrap();
    let after_first = tokio::time::timeout(Duration::from_secs(2), feed.next())
        .await
        .expect("feed emits after a write")
        .unwrap()
        .unwrap();
    assert_eq!(after_first.len(), 1);

    svc.record_history(&history_entry(5, "Spa")).await.unwrap();
    let after_second = tokio::time::timeout(Duration::from_secs(2), feed.next())
        .await
        .expect("feed emits after a write")
        .unwrap()
        .unwrap();
    let circuits: Vec<_> = after_second.iter().map(|h| h.circuit.as_str()).collect();
    assert_eq!(circuits, vec!["Spa", "Monza"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn history_lookup_and_deletes(pool: SqlitePool) {
    let svc = service(pool, Vec::new());
    let entry = history_entry(1, "Monza");
    svc.record_history(&entry).await.unwrap();
    svc.record_history(&history_entry(2, "Spa")).await.unwrap();

    assert_eq!(
        svc.history_by_timestamp(entry.timestamp).await.unwrap(),
        Some(entry.clone())
    );
    assert!(svc.delete_history(entry.timestamp).await.unwrap());
    assert!(svc
        .history_by_timestamp(entry.timestamp)
        .await
        .unwrap()
        .is_none());
    assert_eq!(svc.clear_history().await.unwrap(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn shutdown_stops_background_refreshes(pool: SqlitePool) {
    let svc = service(pool, vec![setup("https://example.com/a", "Monza", 0.9)]);
    svc.shutdown().await;

    let mut pager = svc.request_setups(monza());
    let page = pager.next_page().await.unwrap();
    assert!(page.records.is_empty());
    assert_eq!(svc.coordinator().in_flight(), 0);
}

#[tokio::test]
async fn connect_wires_a_fresh_database() {
    let config = PipelineConfig {
        database_url: "sqlite::memory:".to_string(),
        ..PipelineConfig::default()
    };
    let svc = SetupService::connect(&config).await.unwrap();

    assert!(svc
        .setup_store()
        .query_page(&monza(), 0, 10)
        .await
        .unwrap()
        .is_empty());
    svc.shutdown().await;
}
