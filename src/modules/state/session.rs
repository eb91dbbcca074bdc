use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::config::ModelAssetTable;
use crate::error::{OpError, OpResult};
use crate::modules::animation::parameters;
use crate::modules::emotion::types::Emotion;
use crate::modules::state::history::{HistoryEntry, HistoryKind, StateHistory};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentState {
    pub emotion: Emotion,
    pub intensity: f32,
    pub expression_index: u32,
    pub motion_group: Option<String>,
    pub motion_index: Option<u32>,
    pub is_motion_playing: bool,
    pub mood: f32,
    pub energy: f32,
    pub focus: f32,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SessionMetrics {
    pub state_changes: u64,
    pub error_count: u64,
    pub operations: u64,
    pub avg_response_time_ms: f64,
}

impl SessionMetrics {
    fn record_duration(&mut self, elapsed: Duration) {
        self.operations += 1;
        let ms = elapsed.as_secs_f64() * 1000.0;
        self.avg_response_time_ms += (ms - self.avg_response_time_ms) / self.operations as f64;
    }

    pub fn health_score(&self) -> f64 {
        let attempts = self.state_changes + self.error_count;
        if attempts == 0 {
            1.0
        } else {
            1.0 - self.error_count as f64 / attempts as f64
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub model_name: String,
    pub state: CurrentState,
    pub parameters: HashMap<String, f32>,
    pub metrics: SessionMetrics,
    pub created_at: DateTime<Utc>,
    pub history_len: usize,
    pub pending_timers: usize,
}

#[derive(Debug, Clone)]
pub struct EmotionUpdate {
    pub emotion: Emotion,
    pub secondary: Option<Emotion>,
    pub intensity: f32,
    /// Hold before reverting to the pre-update display state. Zero holds
    /// indefinitely and cancels any reversion still scheduled.
    pub duration_ms: u64,
    pub blend_ratio: f32,
    pub fade_in_ms: u64,
    pub fade_out_ms: u64,
}

impl EmotionUpdate {
    pub fn new(emotion: Emotion, intensity: f32) -> Self {
        EmotionUpdate {
            emotion,
            secondary: None,
            intensity,
            duration_ms: 0,
            blend_ratio: 0.8,
            fade_in_ms: 500,
            fade_out_ms: 500,
        }
    }

    pub fn with_secondary(mut self, secondary: Option<Emotion>) -> Self {
        self.secondary = secondary;
        self
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn with_blend_ratio(mut self, blend_ratio: f32) -> Self {
        self.blend_ratio = blend_ratio;
        self
    }

    pub fn with_fades(mut self, fade_in_ms: u64, fade_out_ms: u64) -> Self {
        self.fade_in_ms = fade_in_ms;
        self.fade_out_ms = fade_out_ms;
        self
    }
}

#[derive(Debug, Clone)]
pub struct MotionRequest {
    pub group: String,
    pub index: u32,
    pub priority: u8,
}

impl MotionRequest {
    pub fn new(group: impl Into<String>, index: u32, priority: u8) -> Self {
        MotionRequest {
            group: group.into(),
            index,
            priority,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EmotionApplied {
    pub intensity: f32,
    pub expression_index: u32,
    pub parameters: HashMap<String, f32>,
}

#[derive(Debug, Clone)]
pub struct CombinedApplied {
    pub emotion: EmotionApplied,
    pub motion_started: bool,
}

#[derive(Debug, Clone)]
struct RevertSnapshot {
    emotion: Emotion,
    intensity: f32,
    expression_index: u32,
    parameters: HashMap<String, f32>,
}

/// One outstanding timer per dimension. Arming bumps `seq` and aborts the
/// previous handle; a woken task that finds a newer `seq` must do nothing,
/// since abort alone cannot stop a task already past its sleep.
#[derive(Debug, Default)]
struct TimerSlot {
    seq: u64,
    handle: Option<JoinHandle<()>>,
}

impl TimerSlot {
    fn next_seq(&mut self) -> u64 {
        self.disarm();
        self.seq
    }

    fn disarm(&mut self) {
        self.seq += 1;
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    fn is_pending(&self) -> bool {
        self.handle.as_ref().map_or(false, |h| !h.is_finished())
    }
}

struct SessionRecord {
    session_id: String,
    model_name: String,
    assets: Arc<ModelAssetTable>,
    current: CurrentState,
    parameters: HashMap<String, f32>,
    motion_priority: Option<u8>,
    history: StateHistory,
    metrics: SessionMetrics,
    created_at: DateTime<Utc>,
    last_update: Instant,
    emotion_revert: TimerSlot,
    parameter_revert: TimerSlot,
    motion_end: TimerSlot,
}

#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<Mutex<SessionRecord>>,
}

impl SessionHandle {
    pub fn new(
        session_id: impl Into<String>,
        model_name: impl Into<String>,
        assets: Arc<ModelAssetTable>,
    ) -> Self {
        let session_id = session_id.into();
        let model_name = model_name.into();
        let current = default_state(&assets, &model_name);

        SessionHandle {
            inner: Arc::new(Mutex::new(SessionRecord {
                session_id,
                model_name,
                assets,
                current,
                parameters: parameters::neutral_baseline(),
                motion_priority: None,
                history: StateHistory::new(),
                metrics: SessionMetrics::default(),
                created_at: Utc::now(),
                last_update: Instant::now(),
                emotion_revert: TimerSlot::default(),
                parameter_revert: TimerSlot::default(),
                motion_end: TimerSlot::default(),
            })),
        }
    }

    /// A positive duration schedules reversion to the pre-update display
    /// state, replacing any reversion already scheduled; zero cancels it
    /// instead. Must run inside a tokio runtime when `duration_ms` is
    /// positive.
    pub fn update_emotion(&self, update: EmotionUpdate) -> OpResult<EmotionApplied> {
        let started = std::time::Instant::now();
        let mut rec = self.inner.lock();

        match rec.apply_emotion_update(&update) {
            Ok((applied, snapshot)) => {
                if update.duration_ms > 0 {
                    self.arm_emotion_revert(&mut rec, update.duration_ms, snapshot);
                } else {
                    rec.emotion_revert.disarm();
                }
                rec.commit_op(started);
                Ok(applied)
            }
            Err(e) => {
                rec.fail_op(started, &e);
                Err(e)
            }
        }
    }

    /// Starts a motion unless one with equal or higher priority is already
    /// playing; a rejection mutates nothing. Must run inside a tokio runtime.
    pub fn trigger_motion(&self, request: MotionRequest) -> OpResult<()> {
        let started = std::time::Instant::now();
        let mut rec = self.inner.lock();

        if let Some(active) = rec.motion_blocking(request.priority) {
            debug!(
                session_id = %rec.session_id,
                active,
                requested = request.priority,
                "motion rejected by priority arbitration"
            );
            rec.metrics.record_duration(started.elapsed());
            return Err(OpError::MotionRejected {
                active,
                requested: request.priority,
            });
        }

        let duration_ms = rec.apply_motion_start(&request);
        self.arm_motion_end(&mut rec, duration_ms);
        rec.commit_op(started);
        Ok(())
    }

    /// Merges parameter channels into the live map. A positive duration
    /// schedules restoration of the pre-call map, replacing any restoration
    /// already scheduled; zero cancels it instead. The fade values are
    /// display hints recorded with the change. Must run inside a tokio
    /// runtime when `duration_ms` is positive.
    pub fn set_parameters(
        &self,
        params: HashMap<String, f32>,
        duration_ms: u64,
        fade_in_ms: u64,
        fade_out_ms: u64,
    ) -> OpResult<()> {
        let started = std::time::Instant::now();
        let mut rec = self.inner.lock();

        match rec.apply_parameters(&params, fade_in_ms, fade_out_ms) {
            Ok(previous) => {
                if duration_ms > 0 {
                    self.arm_parameter_revert(&mut rec, duration_ms, previous);
                } else {
                    rec.parameter_revert.disarm();
                }
                rec.commit_op(started);
                Ok(())
            }
            Err(e) => {
                rec.fail_op(started, &e);
                Err(e)
            }
        }
    }

    /// Emotion update plus motion trigger as one unit: the motion's
    /// admissibility is checked first, and a rejection leaves the emotion
    /// untouched too. Must run inside a tokio runtime.
    pub fn set_combined_state(
        &self,
        update: EmotionUpdate,
        motion: MotionRequest,
    ) -> OpResult<EmotionApplied> {
        let started = std::time::Instant::now();
        let mut rec = self.inner.lock();

        if let Some(active) = rec.motion_blocking(motion.priority) {
            rec.metrics.record_duration(started.elapsed());
            return Err(OpError::MotionRejected {
                active,
                requested: motion.priority,
            });
        }

        match rec.apply_emotion_update(&update) {
            Ok((applied, snapshot)) => {
                if update.duration_ms > 0 {
                    self.arm_emotion_revert(&mut rec, update.duration_ms, snapshot);
                } else {
                    rec.emotion_revert.disarm();
                }
                let duration_ms = rec.apply_motion_start(&motion);
                self.arm_motion_end(&mut rec, duration_ms);
                rec.commit_op(started);
                Ok(applied)
            }
            Err(e) => {
                rec.fail_op(started, &e);
                Err(e)
            }
        }
    }

    /// Engine turn: the emotion always applies; a motion blocked by
    /// arbitration is reported through `motion_started`, not as a failure.
    /// Must run inside a tokio runtime.
    pub fn apply_decision(
        &self,
        update: EmotionUpdate,
        motion: MotionRequest,
    ) -> OpResult<CombinedApplied> {
        let started = std::time::Instant::now();
        let mut rec = self.inner.lock();

        match rec.apply_emotion_update(&update) {
            Ok((applied, snapshot)) => {
                if update.duration_ms > 0 {
                    self.arm_emotion_revert(&mut rec, update.duration_ms, snapshot);
                } else {
                    rec.emotion_revert.disarm();
                }
                let motion_started = if rec.motion_blocking(motion.priority).is_none() {
                    let duration_ms = rec.apply_motion_start(&motion);
                    self.arm_motion_end(&mut rec, duration_ms);
                    true
                } else {
                    false
                };
                rec.commit_op(started);
                Ok(CombinedApplied {
                    emotion: applied,
                    motion_started,
                })
            }
            Err(e) => {
                rec.fail_op(started, &e);
                Err(e)
            }
        }
    }

    /// Cancels every outstanding timer and restores the default state;
    /// reset itself appends no history entry.
    pub fn reset(&self, keep_history: bool) {
        let mut rec = self.inner.lock();
        rec.emotion_revert.disarm();
        rec.parameter_revert.disarm();
        rec.motion_end.disarm();

        rec.current = default_state(&rec.assets, &rec.model_name);
        rec.parameters = parameters::neutral_baseline();
        rec.motion_priority = None;
        if !keep_history {
            rec.history.clear();
        }
        rec.metrics.state_changes += 1;
        rec.last_update = Instant::now();
        debug!(session_id = %rec.session_id, keep_history, "session reset");
    }

    pub fn current_state(&self) -> CurrentState {
        self.inner.lock().current.clone()
    }

    pub fn parameters(&self) -> HashMap<String, f32> {
        self.inner.lock().parameters.clone()
    }

    pub fn history(&self, limit: usize, kind: Option<HistoryKind>) -> Vec<HistoryEntry> {
        self.inner.lock().history.recent(limit, kind)
    }

    pub fn metrics(&self) -> SessionMetrics {
        self.inner.lock().metrics
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let rec = self.inner.lock();
        SessionSnapshot {
            session_id: rec.session_id.clone(),
            model_name: rec.model_name.clone(),
            state: rec.current.clone(),
            parameters: rec.parameters.clone(),
            metrics: rec.metrics,
            created_at: rec.created_at,
            history_len: rec.history.len(),
            pending_timers: rec.pending_timers(),
        }
    }

    pub fn session_id(&self) -> String {
        self.inner.lock().session_id.clone()
    }

    pub fn model_name(&self) -> String {
        self.inner.lock().model_name.clone()
    }

    pub fn last_decided_emotion(&self) -> Option<Emotion> {
        self.inner.lock().history.last_decided_emotion()
    }

    pub fn pending_timers(&self) -> usize {
        self.inner.lock().pending_timers()
    }

    pub fn idle_for(&self) -> Duration {
        self.inner.lock().last_update.elapsed()
    }

    fn arm_emotion_revert(&self, rec: &mut SessionRecord, duration_ms: u64, snapshot: RevertSnapshot) {
        let seq = rec.emotion_revert.next_seq();
        let weak = Arc::downgrade(&self.inner);
        rec.emotion_revert.handle = Some(tokio::spawn(revert_emotion_after(
            weak,
            Duration::from_millis(duration_ms),
            seq,
            snapshot,
        )));
    }

    fn arm_parameter_revert(
        &self,
        rec: &mut SessionRecord,
        duration_ms: u64,
        previous: HashMap<String, f32>,
    ) {
        let seq = rec.parameter_revert.next_seq();
        let weak = Arc::downgrade(&self.inner);
        rec.parameter_revert.handle = Some(tokio::spawn(revert_parameters_after(
            weak,
            Duration::from_millis(duration_ms),
            seq,
            previous,
        )));
    }

    fn arm_motion_end(&self, rec: &mut SessionRecord, duration_ms: u64) {
        let seq = rec.motion_end.next_seq();
        let weak = Arc::downgrade(&self.inner);
        rec.motion_end.handle = Some(tokio::spawn(end_motion_after(
            weak,
            Duration::from_millis(duration_ms),
            seq,
        )));
    }
}

impl SessionRecord {
    fn apply_emotion_update(
        &mut self,
        update: &EmotionUpdate,
    ) -> OpResult<(EmotionApplied, RevertSnapshot)> {
        if !update.intensity.is_finite() {
            return Err(OpError::Internal("non-finite intensity".to_string()));
        }
        if !update.blend_ratio.is_finite() || !(0.0..=1.0).contains(&update.blend_ratio) {
            return Err(OpError::Internal(format!(
                "blend ratio {} outside 0.0..=1.0",
                update.blend_ratio
            )));
        }

        let intensity = update.intensity.clamp(0.1, 1.0);
        let snapshot = RevertSnapshot {
            emotion: self.current.emotion,
            intensity: self.current.intensity,
            expression_index: self.current.expression_index,
            parameters: self.parameters.clone(),
        };

        let expression_index = self.assets.expression_index(&self.model_name, update.emotion);
        let next_parameters = parameters::synthesize(
            update.emotion,
            update.secondary,
            intensity,
            update.blend_ratio,
        );

        self.current.emotion = update.emotion;
        self.current.intensity = intensity;
        self.current.expression_index = expression_index;
        self.apply_affect_drift(update.emotion, intensity);
        self.parameters = next_parameters;
        self.history.push(
            HistoryKind::EmotionUpdate,
            json!({
                "emotion": update.emotion,
                "secondary": update.secondary,
                "intensity": intensity,
                "fade_in_ms": update.fade_in_ms,
                "fade_out_ms": update.fade_out_ms,
            }),
        );
        self.metrics.state_changes += 1;

        let applied = EmotionApplied {
            intensity,
            expression_index,
            parameters: self.parameters.clone(),
        };
        Ok((applied, snapshot))
    }

    // drift is long-lived; reversion timers never restore it
    fn apply_affect_drift(&mut self, emotion: Emotion, intensity: f32) {
        let (mood, energy, focus) = affect_deltas(emotion);
        self.current.mood = (self.current.mood + mood * intensity).clamp(0.0, 1.0);
        self.current.energy = (self.current.energy + energy * intensity).clamp(0.0, 1.0);
        self.current.focus = (self.current.focus + focus * intensity).clamp(0.0, 1.0);
    }

    fn motion_blocking(&self, requested: u8) -> Option<u8> {
        if !self.current.is_motion_playing {
            return None;
        }
        self.motion_priority.filter(|active| requested <= *active)
    }

    fn apply_motion_start(&mut self, request: &MotionRequest) -> u64 {
        let duration_ms = self
            .assets
            .motion_duration_ms(&self.model_name, &request.group);

        self.current.motion_group = Some(request.group.clone());
        self.current.motion_index = Some(request.index);
        self.current.is_motion_playing = true;
        self.motion_priority = Some(request.priority);
        self.history.push(
            HistoryKind::MotionTrigger,
            json!({
                "group": request.group,
                "index": request.index,
                "priority": request.priority,
                "duration_ms": duration_ms,
            }),
        );
        self.metrics.state_changes += 1;
        duration_ms
    }

    fn apply_parameters(
        &mut self,
        params: &HashMap<String, f32>,
        fade_in_ms: u64,
        fade_out_ms: u64,
    ) -> OpResult<HashMap<String, f32>> {
        if let Some((name, value)) = params.iter().find(|(_, v)| !v.is_finite()) {
            return Err(OpError::Internal(format!(
                "non-finite value {} for channel {}",
                value, name
            )));
        }

        let previous = self.parameters.clone();
        for (name, value) in params {
            self.parameters.insert(name.clone(), *value);
        }
        self.history.push(
            HistoryKind::ParameterUpdate,
            json!({
                "channels": params.keys().collect::<Vec<_>>(),
                "fade_in_ms": fade_in_ms,
                "fade_out_ms": fade_out_ms,
            }),
        );
        self.metrics.state_changes += 1;
        Ok(previous)
    }

    fn pending_timers(&self) -> usize {
        [&self.emotion_revert, &self.parameter_revert, &self.motion_end]
            .iter()
            .filter(|slot| slot.is_pending())
            .count()
    }

    fn commit_op(&mut self, started: std::time::Instant) {
        self.metrics.record_duration(started.elapsed());
        self.last_update = Instant::now();
    }

    fn fail_op(&mut self, started: std::time::Instant, error: &OpError) {
        self.metrics.record_duration(started.elapsed());
        self.metrics.error_count += 1;
        warn!(session_id = %self.session_id, %error, "session operation failed");
    }
}

fn default_state(assets: &ModelAssetTable, model_name: &str) -> CurrentState {
    CurrentState {
        emotion: Emotion::Neutral,
        intensity: 0.5,
        expression_index: assets.expression_index(model_name, Emotion::Neutral),
        motion_group: None,
        motion_index: None,
        is_motion_playing: false,
        mood: 0.5,
        energy: 0.6,
        focus: 0.5,
    }
}

fn affect_deltas(emotion: Emotion) -> (f32, f32, f32) {
    match emotion {
        Emotion::Joy => (0.10, 0.08, 0.02),
        Emotion::Sadness => (-0.10, -0.08, -0.04),
        Emotion::Anger => (-0.08, 0.10, -0.06),
        Emotion::Surprise => (0.02, 0.10, 0.04),
        Emotion::Fear => (-0.08, 0.06, -0.08),
        Emotion::Disgust => (-0.06, -0.02, -0.02),
        Emotion::Neutral => (0.0, 0.0, 0.0),
        Emotion::Thinking => (0.0, -0.02, 0.10),
        Emotion::Mystical => (0.04, 0.02, 0.08),
        Emotion::Comfort => (0.08, -0.04, 0.02),
    }
}

async fn revert_emotion_after(
    weak: Weak<Mutex<SessionRecord>>,
    delay: Duration,
    seq: u64,
    snapshot: RevertSnapshot,
) {
    tokio::time::sleep(delay).await;
    let Some(inner) = weak.upgrade() else { return };
    let mut rec = inner.lock();
    if rec.emotion_revert.seq != seq {
        return;
    }
    rec.emotion_revert.handle = None;

    rec.current.emotion = snapshot.emotion;
    rec.current.intensity = snapshot.intensity;
    rec.current.expression_index = snapshot.expression_index;
    rec.parameters = snapshot.parameters;
    rec.history.push(
        HistoryKind::EmotionRevert,
        json!({ "emotion": snapshot.emotion, "intensity": snapshot.intensity }),
    );
    rec.metrics.state_changes += 1;
    debug!(session_id = %rec.session_id, emotion = %snapshot.emotion, "emotion hold elapsed, reverted");
}

async fn revert_parameters_after(
    weak: Weak<Mutex<SessionRecord>>,
    delay: Duration,
    seq: u64,
    previous: HashMap<String, f32>,
) {
    tokio::time::sleep(delay).await;
    let Some(inner) = weak.upgrade() else { return };
    let mut rec = inner.lock();
    if rec.parameter_revert.seq != seq {
        return;
    }
    rec.parameter_revert.handle = None;

    rec.parameters = previous;
    rec.history.push(HistoryKind::ParameterRevert, json!({}));
    rec.metrics.state_changes += 1;
    debug!(session_id = %rec.session_id, "parameter hold elapsed, reverted");
}

async fn end_motion_after(weak: Weak<Mutex<SessionRecord>>, delay: Duration, seq: u64) {
    tokio::time::sleep(delay).await;
    let Some(inner) = weak.upgrade() else { return };
    let mut rec = inner.lock();
    if rec.motion_end.seq != seq {
        return;
    }
    rec.motion_end.handle = None;

    rec.current.is_motion_playing = false;
    rec.motion_priority = None;
    rec.history.push(HistoryKind::MotionEnd, json!({}));
    rec.metrics.state_changes += 1;
    debug!(session_id = %rec.session_id, "motion finished");
}
