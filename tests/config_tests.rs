use std::io::Write;

use avatar_affect_engine::{
    AffectEngine, Emotion, EngineConfig, EngineError, InteractionRequest, Language, Lexicon,
    ModelAssetTable,
};

#[test]
fn test_config_loads_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
        [selection]
        anti_repeat_probability = 0.5

        [animation]
        emotion_hold_ms = 4000

        [session]
        idle_threshold_ms = 120000
        "#
    )
    .unwrap();

    let config = EngineConfig::from_path(file.path()).unwrap();
    assert_eq!(config.selection.anti_repeat_probability, 0.5);
    assert_eq!(config.animation.emotion_hold_ms, 4000);
    assert_eq!(config.session.idle_threshold_ms, 120_000);
    // untouched sections keep their defaults
    assert_eq!(config.motion.special_intensity_cutoff, 0.8);
}

#[test]
fn test_missing_config_file_is_io_error() {
    let result = EngineConfig::from_path("/nonexistent/affect/engine.toml");
    assert!(matches!(result, Err(EngineError::ConfigIo(_))));
}

#[test]
fn test_invalid_value_names_the_field() {
    let result = EngineConfig::from_toml_str(
        r#"
        [animation]
        blend_ratio = 1.5
        "#,
    );

    match result {
        Err(EngineError::Config(message)) => {
            assert!(message.contains("animation.blend_ratio"), "got: {}", message)
        }
        other => panic!("expected a config error, got {:?}", other),
    }
}

#[test]
fn test_zero_idle_threshold_rejected() {
    let result = EngineConfig::from_toml_str(
        r#"
        [session]
        idle_threshold_ms = 0
        "#,
    );
    assert!(matches!(result, Err(EngineError::Config(_))));
}

#[tokio::test]
async fn test_engine_honors_file_config() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
        [animation]
        emotion_hold_ms = 0
        "#
    )
    .unwrap();

    let engine = AffectEngine::from_config_path(file.path()).unwrap();
    assert_eq!(engine.config().animation.emotion_hold_ms, 0);

    let decision = engine
        .process(&InteractionRequest::new("viewer-1", "happy").with_language(Language::En))
        .unwrap();
    // a zero hold disables the reversion timer
    assert_eq!(decision.duration_ms, 0);
}

#[test]
fn test_builtin_lexicon_covers_every_emotion_per_language() {
    let lexicon = Lexicon::builtin();
    for emotion in Emotion::ALL {
        for language in Language::ALL {
            assert!(
                !lexicon.triggers_for(emotion, Some(language)).is_empty(),
                "no {} triggers for {}",
                language.as_str(),
                emotion
            );
        }
    }
}

#[test]
fn test_builtin_assets_default_model() {
    let assets = ModelAssetTable::builtin();
    assert_eq!(assets.default_model(), "haru");
    assert_eq!(assets.motion_duration_ms("haru", "Idle"), 4000);
    assert_eq!(assets.motion_duration_ms("natori", "TapBody"), 2800);
}
