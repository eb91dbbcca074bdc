pub mod config;
pub mod engine;
pub mod error;
pub mod modules;

#[cfg(test)]
pub(crate) mod _test_mock;

pub use config::{ContextWeightTable, EngineConfig, Lexicon, ModelAssetTable};
pub use engine::AffectEngine;
pub use error::{EngineError, EngineResult, OpError, OpResult};
pub use modules::emotion::{
    AnalysisResult, Emotion, EmotionDecision, FortuneOutcome, InteractionRequest, Language,
    ModifierLevel, MotionRef, Selection, SelectorRng, StdSelectorRng,
};
pub use modules::state::{
    CurrentState, EmotionUpdate, GlobalMetrics, HistoryEntry, HistoryKind, MotionRequest,
    SessionHandle, SessionManager, SessionMetrics, SessionSnapshot,
};
