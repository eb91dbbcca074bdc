pub mod context_weights;
pub mod engine_config;
pub mod lexicon;
pub mod model_assets;

pub use context_weights::{ContextProfile, ContextWeightTable};
pub use engine_config::{AnimationConfig, EngineConfig, MotionConfig, SelectionConfig, SessionConfig};
pub use lexicon::Lexicon;
pub use model_assets::{ModelAssetTable, ModelProfile, MotionSet, DEFAULT_MOTION_DURATION_MS};
