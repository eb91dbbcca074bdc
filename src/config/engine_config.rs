use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

fn default_anti_repeat_probability() -> f32 {
    0.3
}

fn default_secondary_threshold() -> f32 {
    0.3
}

fn default_special_intensity_cutoff() -> f32 {
    0.8
}

fn default_secondary_intensity_cutoff() -> f32 {
    0.4
}

fn default_blend_ratio() -> f32 {
    0.8
}

fn default_emotion_hold_ms() -> u64 {
    8000
}

fn default_fade_ms() -> u64 {
    500
}

fn default_idle_threshold_ms() -> u64 {
    600_000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionConfig {
    #[serde(default = "default_anti_repeat_probability")]
    pub anti_repeat_probability: f32,
    #[serde(default = "default_secondary_threshold")]
    pub secondary_threshold: f32,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            anti_repeat_probability: default_anti_repeat_probability(),
            secondary_threshold: default_secondary_threshold(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotionConfig {
    #[serde(default = "default_special_intensity_cutoff")]
    pub special_intensity_cutoff: f32,
    #[serde(default = "default_secondary_intensity_cutoff")]
    pub secondary_intensity_cutoff: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            special_intensity_cutoff: default_special_intensity_cutoff(),
            secondary_intensity_cutoff: default_secondary_intensity_cutoff(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationConfig {
    #[serde(default = "default_blend_ratio")]
    pub blend_ratio: f32,
    /// Hold before a decided emotion reverts; zero disables reversion.
    #[serde(default = "default_emotion_hold_ms")]
    pub emotion_hold_ms: u64,
    #[serde(default = "default_fade_ms")]
    pub fade_in_ms: u64,
    #[serde(default = "default_fade_ms")]
    pub fade_out_ms: u64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            blend_ratio: default_blend_ratio(),
            emotion_hold_ms: default_emotion_hold_ms(),
            fade_in_ms: default_fade_ms(),
            fade_out_ms: default_fade_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_idle_threshold_ms")]
    pub idle_threshold_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_threshold_ms: default_idle_threshold_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EngineConfig {
    #[serde(default)]
    pub selection: SelectionConfig,
    #[serde(default)]
    pub motion: MotionConfig,
    #[serde(default)]
    pub animation: AnimationConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml_str(raw: &str) -> EngineResult<Self> {
        let config: EngineConfig =
            toml::from_str(raw).map_err(|e| EngineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let raw = std::fs::read_to_string(path.as_ref())
            .map_err(|e| EngineError::ConfigIo(e.to_string()))?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> EngineResult<()> {
        let unit_ranged = [
            ("selection.anti_repeat_probability", self.selection.anti_repeat_probability),
            ("selection.secondary_threshold", self.selection.secondary_threshold),
            ("animation.blend_ratio", self.animation.blend_ratio),
            ("motion.special_intensity_cutoff", self.motion.special_intensity_cutoff),
            ("motion.secondary_intensity_cutoff", self.motion.secondary_intensity_cutoff),
        ];

        for (name, value) in unit_ranged {
            if !(0.0..=1.0).contains(&value) {
                return Err(EngineError::Config(format!(
                    "'{}' has value {}, but must be between 0.0 and 1.0",
                    name, value
                )));
            }
        }

        if self.motion.secondary_intensity_cutoff >= self.motion.special_intensity_cutoff {
            return Err(EngineError::Config(format!(
                "'motion.secondary_intensity_cutoff' ({}) must be below 'motion.special_intensity_cutoff' ({})",
                self.motion.secondary_intensity_cutoff, self.motion.special_intensity_cutoff
            )));
        }

        if self.session.idle_threshold_ms == 0 {
            return Err(EngineError::Config(
                "'session.idle_threshold_ms' must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
