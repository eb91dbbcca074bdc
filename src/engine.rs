use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::{ContextWeightTable, EngineConfig, Lexicon, ModelAssetTable};
use crate::error::{EngineResult, OpResult};
use crate::modules::animation::motion;
use crate::modules::emotion::selector::{SelectorRng, StdSelectorRng};
use crate::modules::emotion::types::{
    Emotion, EmotionDecision, InteractionRequest, Language, ModifierLevel,
};
use crate::modules::emotion::{analyzer, context, intensity, selector};
use crate::modules::state::manager::{GlobalMetrics, SessionManager};
use crate::modules::state::session::{EmotionUpdate, MotionRequest, SessionHandle};

const ANTI_REPEAT_CONFIDENCE_FACTOR: f32 = 0.8;

pub struct AffectEngine {
    config: EngineConfig,
    lexicon: RwLock<Arc<Lexicon>>,
    contexts: ContextWeightTable,
    assets: Arc<ModelAssetTable>,
    sessions: SessionManager,
    rng: Mutex<Box<dyn SelectorRng>>,
}

impl AffectEngine {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let assets = Arc::new(ModelAssetTable::builtin());
        AffectEngine {
            config,
            lexicon: RwLock::new(Arc::new(Lexicon::builtin())),
            contexts: ContextWeightTable::builtin(),
            assets: Arc::clone(&assets),
            sessions: SessionManager::new(assets),
            rng: Mutex::new(Box::new(StdSelectorRng::from_entropy())),
        }
    }

    pub fn from_config_path(path: impl AsRef<std::path::Path>) -> EngineResult<Self> {
        Ok(Self::with_config(EngineConfig::from_path(path)?))
    }

    pub fn with_seed(self, seed: u64) -> Self {
        self.with_rng(Box::new(StdSelectorRng::with_seed(seed)))
    }

    pub fn with_rng(mut self, rng: Box<dyn SelectorRng>) -> Self {
        self.rng = Mutex::new(rng);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Runs one conversational turn end to end, creating the session on
    /// first contact. If a higher-priority motion is still playing the new
    /// motion is skipped, but the returned decision still names it.
    pub fn process(&self, request: &InteractionRequest) -> OpResult<EmotionDecision> {
        let lexicon = self.lexicon.read().clone();
        let analysis = analyzer::analyze(&lexicon, &request.text, request.language);
        let adjusted = context::adjust(
            &self.contexts,
            &analysis.scores,
            &request.context_type,
            request.fortune.as_ref(),
        );

        let session = self
            .sessions
            .create_session(&request.session_id, request.model.as_deref());
        let previous = session.last_decided_emotion();

        let selection = {
            let mut rng = self.rng.lock();
            selector::select(&adjusted, previous, &self.config.selection, rng.as_mut())
        };

        let intensity = intensity::calculate(selection.primary, &analysis.modifiers, &request.text);
        let confidence = if selection.anti_repeat_applied {
            analysis.confidence * ANTI_REPEAT_CONFIDENCE_FACTOR
        } else {
            analysis.confidence
        };

        let fortune_flavored = self.contexts.is_fortune_flavored(&request.context_type);
        let model_name = session.model_name();
        let motion_ref = motion::select(
            &self.assets,
            &model_name,
            selection.primary,
            intensity,
            fortune_flavored,
            &self.config.motion,
        );
        let priority = derive_priority(intensity, fortune_flavored, &self.config);

        let update = EmotionUpdate::new(selection.primary, intensity)
            .with_secondary(selection.secondary)
            .with_duration(self.config.animation.emotion_hold_ms)
            .with_blend_ratio(self.config.animation.blend_ratio)
            .with_fades(self.config.animation.fade_in_ms, self.config.animation.fade_out_ms);
        let motion_request = MotionRequest::new(motion_ref.group.clone(), motion_ref.index, priority);

        let applied = session.apply_decision(update, motion_request)?;
        if !applied.motion_started {
            debug!(
                session_id = %request.session_id,
                group = %motion_ref.group,
                "selected motion skipped, a higher-priority motion is playing"
            );
        }

        Ok(EmotionDecision {
            decision_id: Uuid::new_v4(),
            session_id: request.session_id.clone(),
            primary_emotion: selection.primary,
            secondary_emotion: selection.secondary,
            intensity: applied.emotion.intensity,
            confidence,
            expression_index: applied.emotion.expression_index,
            motion: motion_ref,
            duration_ms: self.config.animation.emotion_hold_ms,
            fade_in_ms: self.config.animation.fade_in_ms,
            fade_out_ms: self.config.animation.fade_out_ms,
            parameters: applied.emotion.parameters,
            created_at: Utc::now(),
        })
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    pub fn create_session(&self, session_id: &str, model: Option<&str>) -> SessionHandle {
        self.sessions.create_session(session_id, model)
    }

    pub fn session(&self, session_id: &str) -> Option<SessionHandle> {
        self.sessions.session(session_id)
    }

    pub fn remove_session(&self, session_id: &str) -> bool {
        self.sessions.remove_session(session_id)
    }

    pub fn cleanup_idle_sessions(&self) -> usize {
        self.sessions
            .cleanup_inactive(Duration::from_millis(self.config.session.idle_threshold_ms))
    }

    pub fn global_metrics(&self) -> GlobalMetrics {
        self.sessions.global_metrics()
    }

    /// The lexicon is rebuilt and swapped atomically; analyses already
    /// running keep their consistent view.
    pub fn extend_lexicon(&self, emotion: Emotion, language: Language, words: &[&str]) {
        let mut guard = self.lexicon.write();
        let next = guard.extended_with_triggers(emotion, language, words);
        *guard = Arc::new(next);
        info!(emotion = %emotion, language = language.as_str(), added = words.len(), "lexicon triggers extended");
    }

    pub fn extend_modifiers(&self, level: ModifierLevel, words: &[&str]) {
        let mut guard = self.lexicon.write();
        let next = guard.extended_with_modifiers(level, words);
        *guard = Arc::new(next);
        info!(added = words.len(), "lexicon modifiers extended");
    }
}

impl Default for AffectEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn derive_priority(intensity: f32, fortune_flavored: bool, config: &EngineConfig) -> u8 {
    let base = if intensity >= config.motion.special_intensity_cutoff {
        3
    } else if intensity >= 0.5 {
        2
    } else {
        1
    };
    if fortune_flavored {
        base + 1
    } else {
        base
    }
}
