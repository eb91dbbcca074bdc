use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::modules::emotion::types::Emotion;

/// Weights multiply analyzer scores for the emotions they name; emotions
/// absent from the map pass through unchanged.
#[derive(Debug, Clone)]
pub struct ContextProfile {
    pub weights: HashMap<Emotion, f32>,
    pub fortune_flavored: bool,
}

impl ContextProfile {
    fn new(fortune_flavored: bool, weights: &[(Emotion, f32)]) -> Self {
        ContextProfile {
            weights: weights.iter().copied().collect(),
            fortune_flavored,
        }
    }

    pub fn identity() -> Self {
        ContextProfile {
            weights: HashMap::new(),
            fortune_flavored: false,
        }
    }
}

/// Unknown context types resolve to the identity profile rather than an
/// error.
#[derive(Debug, Clone)]
pub struct ContextWeightTable {
    profiles: HashMap<String, ContextProfile>,
}

impl ContextWeightTable {
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    pub fn profile(&self, context_type: &str) -> &ContextProfile {
        self.profiles.get(context_type).unwrap_or(&IDENTITY)
    }

    pub fn is_fortune_flavored(&self, context_type: &str) -> bool {
        self.profile(context_type).fortune_flavored
    }
}

lazy_static! {
    static ref IDENTITY: ContextProfile = ContextProfile::identity();
    static ref BUILTIN: ContextWeightTable = {
        use Emotion::*;

        let mut profiles = HashMap::new();
        profiles.insert(
            "conversation".to_string(),
            ContextProfile::new(false, &[(Joy, 1.1), (Comfort, 1.1)]),
        );
        profiles.insert(
            "greeting".to_string(),
            ContextProfile::new(false, &[(Joy, 1.3), (Comfort, 1.2), (Surprise, 1.1)]),
        );
        profiles.insert(
            "consultation".to_string(),
            ContextProfile::new(false, &[(Thinking, 1.3), (Comfort, 1.2), (Sadness, 1.1)]),
        );
        profiles.insert(
            "fortune_daily".to_string(),
            ContextProfile::new(true, &[(Mystical, 1.4), (Thinking, 1.2), (Joy, 1.1)]),
        );
        profiles.insert(
            "fortune_love".to_string(),
            ContextProfile::new(true, &[(Comfort, 1.3), (Joy, 1.2), (Mystical, 1.2)]),
        );
        profiles.insert(
            "fortune_career".to_string(),
            ContextProfile::new(true, &[(Thinking, 1.3), (Mystical, 1.2), (Fear, 1.1)]),
        );
        profiles.insert(
            "fortune_health".to_string(),
            ContextProfile::new(true, &[(Comfort, 1.3), (Mystical, 1.2), (Sadness, 1.1)]),
        );

        ContextWeightTable { profiles }
    };
}
