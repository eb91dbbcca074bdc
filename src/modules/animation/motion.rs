use tracing::debug;

use crate::config::engine_config::MotionConfig;
use crate::config::{ModelAssetTable, MotionSet};
use crate::modules::emotion::types::{Emotion, MotionRef};

/// Mystical-family emotions under a fortune-flavored context take the
/// special motion regardless of intensity; missing tiers degrade to primary.
pub fn select(
    assets: &ModelAssetTable,
    model: &str,
    emotion: Emotion,
    intensity: f32,
    fortune_flavored: bool,
    config: &MotionConfig,
) -> MotionRef {
    let set = assets.motion_set(model, emotion);

    let chosen = match set {
        MotionSet { special: Some(m), .. }
            if fortune_flavored && emotion.is_mystical_family() =>
        {
            m
        }
        MotionSet { special: Some(m), .. } if intensity > config.special_intensity_cutoff => m,
        MotionSet { secondary: Some(m), .. } if intensity < config.secondary_intensity_cutoff => m,
        _ => &set.primary,
    };

    debug!(model, emotion = %emotion, intensity, group = %chosen.group, "motion selected");
    chosen.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assets() -> ModelAssetTable {
        ModelAssetTable::builtin()
    }

    fn config() -> MotionConfig {
        MotionConfig::default()
    }

    #[test]
    fn test_high_intensity_prefers_special() {
        let motion = select(&assets(), "haru", Emotion::Joy, 0.9, false, &config());
        let set = assets().motion_set("haru", Emotion::Joy).clone();
        assert_eq!(motion, set.special.unwrap());
    }

    #[test]
    fn test_low_intensity_prefers_secondary() {
        let motion = select(&assets(), "haru", Emotion::Joy, 0.2, false, &config());
        let set = assets().motion_set("haru", Emotion::Joy).clone();
        assert_eq!(motion, set.secondary.unwrap());
    }

    #[test]
    fn test_mid_intensity_uses_primary() {
        let motion = select(&assets(), "haru", Emotion::Joy, 0.6, false, &config());
        assert_eq!(motion, assets().motion_set("haru", Emotion::Joy).primary);
    }

    #[test]
    fn test_cutoffs_are_strict() {
        let at_special = select(&assets(), "haru", Emotion::Joy, 0.8, false, &config());
        let at_secondary = select(&assets(), "haru", Emotion::Joy, 0.4, false, &config());
        let primary = assets().motion_set("haru", Emotion::Joy).primary.clone();
        assert_eq!(at_special, primary);
        assert_eq!(at_secondary, primary);
    }

    #[test]
    fn test_fortune_context_prefers_special_for_mystical_family() {
        let motion = select(&assets(), "haru", Emotion::Mystical, 0.2, true, &config());
        let set = assets().motion_set("haru", Emotion::Mystical).clone();
        assert_eq!(motion, set.special.unwrap());

        let thinking = select(&assets(), "haru", Emotion::Thinking, 0.2, true, &config());
        let thinking_set = assets().motion_set("haru", Emotion::Thinking).clone();
        assert_eq!(thinking, thinking_set.special.unwrap());
    }

    #[test]
    fn test_fortune_context_leaves_other_emotions_alone() {
        let motion = select(&assets(), "haru", Emotion::Joy, 0.6, true, &config());
        assert_eq!(motion, assets().motion_set("haru", Emotion::Joy).primary);
    }

    #[test]
    fn test_missing_special_degrades_to_primary() {
        let motion = select(&assets(), "haru", Emotion::Sadness, 0.95, false, &config());
        assert_eq!(motion, assets().motion_set("haru", Emotion::Sadness).primary);
    }

    #[test]
    fn test_missing_secondary_degrades_to_primary() {
        let motion = select(&assets(), "haru", Emotion::Anger, 0.2, false, &config());
        assert_eq!(motion, assets().motion_set("haru", Emotion::Anger).primary);
    }

    #[test]
    fn test_unknown_model_uses_default_tables() {
        let fallback = select(&assets(), "miku", Emotion::Joy, 0.6, false, &config());
        let haru = select(&assets(), "haru", Emotion::Joy, 0.6, false, &config());
        assert_eq!(fallback, haru);
    }
}
