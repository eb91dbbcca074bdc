use crate::modules::emotion::types::{Emotion, ModifierHit};

const LONG_TEXT_CHARS: usize = 100;
const SHORT_TEXT_CHARS: usize = 20;

pub fn base_intensity(emotion: Emotion) -> f32 {
    match emotion {
        Emotion::Joy => 0.7,
        Emotion::Sadness => 0.6,
        Emotion::Anger => 0.8,
        Emotion::Surprise => 0.9,
        Emotion::Fear => 0.7,
        Emotion::Disgust => 0.6,
        Emotion::Neutral => 0.4,
        Emotion::Thinking => 0.5,
        Emotion::Mystical => 0.8,
        Emotion::Comfort => 0.5,
    }
}

/// Base constant for the emotion, scaled cumulatively by every matched
/// modifier and by text length, clamped to [0.1, 1.0].
pub fn calculate(emotion: Emotion, modifiers: &[ModifierHit], text: &str) -> f32 {
    let mut intensity = base_intensity(emotion);

    for hit in modifiers {
        intensity *= hit.level.intensity_factor();
    }

    let chars = text.chars().count();
    if chars > LONG_TEXT_CHARS {
        intensity *= 1.1;
    } else if chars < SHORT_TEXT_CHARS {
        intensity *= 0.9;
    }

    intensity.clamp(0.1, 1.0)
}
