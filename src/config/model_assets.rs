use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::modules::emotion::types::{Emotion, MotionRef};

pub const DEFAULT_MOTION_DURATION_MS: u64 = 3000;

#[derive(Debug, Clone)]
pub struct MotionSet {
    pub primary: MotionRef,
    pub secondary: Option<MotionRef>,
    pub special: Option<MotionRef>,
}

#[derive(Debug, Clone)]
pub struct ModelProfile {
    pub name: String,
    expressions: HashMap<Emotion, u32>,
    motions: HashMap<Emotion, MotionSet>,
    group_durations: HashMap<String, u64>,
}

impl ModelProfile {
    fn new(name: &str) -> Self {
        ModelProfile {
            name: name.to_string(),
            expressions: HashMap::new(),
            motions: HashMap::new(),
            group_durations: HashMap::new(),
        }
    }

    fn expression(mut self, emotion: Emotion, index: u32) -> Self {
        self.expressions.insert(emotion, index);
        self
    }

    fn motion(mut self, emotion: Emotion, set: MotionSet) -> Self {
        self.motions.insert(emotion, set);
        self
    }

    fn group_duration(mut self, group: &str, duration_ms: u64) -> Self {
        self.group_durations.insert(group.to_string(), duration_ms);
        self
    }
}

/// Unknown model names resolve to the default model; emotions a model has
/// no row for resolve to its neutral row.
#[derive(Debug, Clone)]
pub struct ModelAssetTable {
    models: HashMap<String, ModelProfile>,
    default_model: String,
}

impl ModelAssetTable {
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    pub fn resolve_model<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        match requested {
            Some(name) if self.models.contains_key(name) => name,
            _ => &self.default_model,
        }
    }

    fn profile(&self, model: &str) -> &ModelProfile {
        self.models
            .get(model)
            .unwrap_or_else(|| &self.models[&self.default_model])
    }

    pub fn expression_index(&self, model: &str, emotion: Emotion) -> u32 {
        let profile = self.profile(model);
        profile
            .expressions
            .get(&emotion)
            .or_else(|| profile.expressions.get(&Emotion::Neutral))
            .copied()
            .unwrap_or(0)
    }

    pub fn motion_set(&self, model: &str, emotion: Emotion) -> &MotionSet {
        let profile = self.profile(model);
        profile
            .motions
            .get(&emotion)
            .or_else(|| profile.motions.get(&Emotion::Neutral))
            .unwrap_or_else(|| {
                let fallback = &self.models[&self.default_model];
                fallback
                    .motions
                    .get(&emotion)
                    .or_else(|| fallback.motions.get(&Emotion::Neutral))
                    .expect("default model must define a neutral motion set")
            })
    }

    pub fn motion_duration_ms(&self, model: &str, group: &str) -> u64 {
        self.profile(model)
            .group_durations
            .get(group)
            .copied()
            .unwrap_or(DEFAULT_MOTION_DURATION_MS)
    }
}

fn motion(group: &str, index: u32, file: &str) -> MotionRef {
    MotionRef::new(group, index, file)
}

fn set(primary: MotionRef, secondary: Option<MotionRef>, special: Option<MotionRef>) -> MotionSet {
    MotionSet {
        primary,
        secondary,
        special,
    }
}

lazy_static! {
    static ref BUILTIN: ModelAssetTable = {
        use Emotion::*;

        let haru = ModelProfile::new("haru")
            .expression(Joy, 0)
            .expression(Sadness, 1)
            .expression(Anger, 2)
            .expression(Surprise, 3)
            .expression(Fear, 4)
            .expression(Disgust, 5)
            .expression(Neutral, 6)
            .expression(Thinking, 7)
            .expression(Mystical, 3)
            .expression(Comfort, 0)
            .motion(Joy, set(
                motion("TapBody", 0, "haru_g_m06.motion3.json"),
                Some(motion("Idle", 1, "haru_g_m02.motion3.json")),
                Some(motion("Special", 0, "haru_g_m15.motion3.json")),
            ))
            .motion(Sadness, set(
                motion("Idle", 2, "haru_g_m03.motion3.json"),
                Some(motion("Idle", 0, "haru_g_m01.motion3.json")),
                None,
            ))
            .motion(Anger, set(
                motion("TapBody", 1, "haru_g_m07.motion3.json"),
                None,
                Some(motion("Special", 1, "haru_g_m16.motion3.json")),
            ))
            .motion(Surprise, set(
                motion("FlickHead", 0, "haru_g_m09.motion3.json"),
                Some(motion("Idle", 1, "haru_g_m02.motion3.json")),
                Some(motion("Special", 2, "haru_g_m17.motion3.json")),
            ))
            .motion(Fear, set(
                motion("FlickHead", 1, "haru_g_m10.motion3.json"),
                Some(motion("Idle", 0, "haru_g_m01.motion3.json")),
                None,
            ))
            .motion(Disgust, set(
                motion("TapBody", 2, "haru_g_m08.motion3.json"),
                None,
                None,
            ))
            .motion(Neutral, set(
                motion("Idle", 0, "haru_g_m01.motion3.json"),
                Some(motion("Idle", 1, "haru_g_m02.motion3.json")),
                None,
            ))
            .motion(Thinking, set(
                motion("Idle", 3, "haru_g_m04.motion3.json"),
                Some(motion("Idle", 0, "haru_g_m01.motion3.json")),
                Some(motion("Special", 3, "haru_g_m18.motion3.json")),
            ))
            .motion(Mystical, set(
                motion("Special", 4, "haru_g_m19.motion3.json"),
                Some(motion("Idle", 3, "haru_g_m04.motion3.json")),
                Some(motion("Special", 5, "haru_g_m20.motion3.json")),
            ))
            .motion(Comfort, set(
                motion("Idle", 4, "haru_g_m05.motion3.json"),
                Some(motion("Idle", 0, "haru_g_m01.motion3.json")),
                None,
            ))
            .group_duration("Idle", 4000)
            .group_duration("TapBody", 3000)
            .group_duration("FlickHead", 2500)
            .group_duration("Special", 5000);

        let natori = ModelProfile::new("natori")
            .expression(Joy, 1)
            .expression(Sadness, 2)
            .expression(Surprise, 4)
            .expression(Neutral, 0)
            .expression(Mystical, 5)
            .motion(Joy, set(
                motion("TapBody", 0, "natori_m03.motion3.json"),
                Some(motion("Idle", 1, "natori_m02.motion3.json")),
                None,
            ))
            .motion(Surprise, set(
                motion("FlickHead", 0, "natori_m05.motion3.json"),
                None,
                Some(motion("Special", 0, "natori_m08.motion3.json")),
            ))
            .motion(Neutral, set(
                motion("Idle", 0, "natori_m01.motion3.json"),
                Some(motion("Idle", 2, "natori_m04.motion3.json")),
                None,
            ))
            .motion(Mystical, set(
                motion("Special", 1, "natori_m09.motion3.json"),
                Some(motion("Idle", 0, "natori_m01.motion3.json")),
                Some(motion("Special", 2, "natori_m10.motion3.json")),
            ))
            .group_duration("Idle", 3500)
            .group_duration("TapBody", 2800)
            .group_duration("Special", 4500);

        let mut models = HashMap::new();
        models.insert(haru.name.clone(), haru);
        models.insert(natori.name.clone(), natori);

        ModelAssetTable {
            models,
            default_model: "haru".to_string(),
        }
    };
}
