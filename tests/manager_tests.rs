use std::sync::Arc;
use std::time::Duration;

use avatar_affect_engine::config::SessionConfig;
use avatar_affect_engine::{
    AffectEngine, Emotion, EmotionUpdate, EngineConfig, InteractionRequest, Language,
    ModelAssetTable, SessionManager,
};

fn manager() -> SessionManager {
    SessionManager::new(Arc::new(ModelAssetTable::builtin()))
}

#[tokio::test]
async fn test_unknown_model_turn_uses_default_assets() {
    let engine = AffectEngine::new();
    let request = InteractionRequest::new("viewer-1", "정말 기뻐요")
        .with_language(Language::Ko)
        .with_model("missing_model");

    let decision = engine.process(&request).unwrap();
    assert_eq!(decision.primary_emotion, Emotion::Joy);
    assert_eq!(decision.expression_index, 0);
    assert_eq!(engine.session("viewer-1").unwrap().model_name(), "haru");
}

#[tokio::test]
async fn test_engine_creates_sessions_lazily() {
    let engine = AffectEngine::new();
    assert!(engine.session("viewer-1").is_none());

    engine
        .process(&InteractionRequest::new("viewer-1", "hello"))
        .unwrap();

    let handle = engine.session("viewer-1").unwrap();
    assert_eq!(handle.session_id(), "viewer-1");
    assert_eq!(engine.sessions().session_count(), 1);
}

#[tokio::test]
async fn test_engine_session_removal() {
    let engine = AffectEngine::new();
    engine
        .process(&InteractionRequest::new("viewer-1", "hello"))
        .unwrap();

    assert!(engine.remove_session("viewer-1"));
    assert!(engine.session("viewer-1").is_none());

    // removing twice is not an error
    assert!(!engine.remove_session("viewer-1"));
    assert!(!engine.remove_session("never-existed"));
}

#[test]
fn test_session_ids_lists_every_session() {
    let manager = manager();
    manager.create_session("viewer-1", None);
    manager.create_session("viewer-2", Some("natori"));

    let ids = manager.session_ids();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&"viewer-1".to_string()));
    assert!(ids.contains(&"viewer-2".to_string()));
}

#[tokio::test(start_paused = true)]
async fn test_cleanup_below_threshold_removes_nothing() {
    let manager = manager();
    manager.create_session("viewer-1", None);

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(manager.cleanup_inactive(Duration::from_secs(50)), 0);
    assert_eq!(manager.session_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_engine_cleanup_uses_configured_threshold() {
    let config = EngineConfig {
        session: SessionConfig {
            idle_threshold_ms: 1000,
        },
        ..Default::default()
    };
    let engine = AffectEngine::with_config(config);

    engine
        .process(&InteractionRequest::new("viewer-1", "hello"))
        .unwrap();
    assert_eq!(engine.cleanup_idle_sessions(), 0);

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(engine.cleanup_idle_sessions(), 1);
    assert!(engine.session("viewer-1").is_none());
}

#[test]
fn test_all_session_states_snapshots_every_session() {
    let manager = manager();
    manager.create_session("viewer-1", None);
    let handle = manager.create_session("viewer-2", None);
    handle
        .update_emotion(EmotionUpdate::new(Emotion::Thinking, 0.6))
        .unwrap();

    let snapshots = manager.all_session_states();
    assert_eq!(snapshots.len(), 2);

    let second = snapshots
        .iter()
        .find(|s| s.session_id == "viewer-2")
        .unwrap();
    assert_eq!(second.state.emotion, Emotion::Thinking);
    assert_eq!(second.history_len, 1);
}

#[tokio::test]
async fn test_engine_metrics_aggregate_processed_turns() {
    let engine = AffectEngine::new();
    engine
        .process(&InteractionRequest::new("viewer-1", "happy").with_language(Language::En))
        .unwrap();
    engine
        .process(&InteractionRequest::new("viewer-2", "sad").with_language(Language::En))
        .unwrap();

    let metrics = engine.global_metrics();
    assert_eq!(metrics.active_sessions, 2);
    // each turn commits an emotion update and a motion start
    assert_eq!(metrics.total_state_changes, 4);
    assert_eq!(metrics.total_errors, 0);
    assert!((metrics.mean_health - 1.0).abs() < 1e-9);
}
