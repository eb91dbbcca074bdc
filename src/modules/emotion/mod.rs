pub mod analyzer;
pub mod context;
pub mod intensity;
pub mod selector;
pub mod types;

pub use selector::{Selection, SelectorRng, StdSelectorRng};
pub use types::{
    AnalysisResult, Emotion, EmotionDecision, FortuneOutcome, InteractionRequest, Language,
    ModifierHit, ModifierLevel, MotionRef,
};
