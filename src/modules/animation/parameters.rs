use std::collections::HashMap;

use crate::modules::emotion::types::Emotion;

/// Channel names follow Live2D Cubism conventions; angle channels are in
/// degrees, everything else in normalized units.
pub fn template(emotion: Emotion) -> &'static [(&'static str, f32)] {
    match emotion {
        Emotion::Joy => &[
            ("ParamMouthForm", 1.0),
            ("ParamMouthOpenY", 0.6),
            ("ParamEyeLOpen", 1.0),
            ("ParamEyeROpen", 1.0),
            ("ParamCheek", 0.8),
            ("ParamBrowLY", 0.4),
            ("ParamBrowRY", 0.4),
        ],
        Emotion::Sadness => &[
            ("ParamMouthForm", -0.8),
            ("ParamEyeLOpen", 0.5),
            ("ParamEyeROpen", 0.5),
            ("ParamBrowLY", -0.6),
            ("ParamBrowRY", -0.6),
            ("ParamBodyAngleZ", -3.0),
        ],
        Emotion::Anger => &[
            ("ParamMouthForm", -1.0),
            ("ParamEyeLOpen", 0.8),
            ("ParamEyeROpen", 0.8),
            ("ParamBrowLY", -0.8),
            ("ParamBrowRY", -0.8),
            ("ParamBrowLForm", -0.7),
            ("ParamBrowRForm", -0.7),
        ],
        Emotion::Surprise => &[
            ("ParamEyeLOpen", 1.5),
            ("ParamEyeROpen", 1.5),
            ("ParamMouthOpenY", 0.9),
            ("ParamBrowLY", 0.8),
            ("ParamBrowRY", 0.8),
        ],
        Emotion::Fear => &[
            ("ParamEyeLOpen", 1.3),
            ("ParamEyeROpen", 1.3),
            ("ParamMouthForm", -0.5),
            ("ParamBrowLY", 0.6),
            ("ParamBrowRY", 0.6),
            ("ParamBodyAngleX", -2.0),
        ],
        Emotion::Disgust => &[
            ("ParamMouthForm", -0.9),
            ("ParamEyeLOpen", 0.6),
            ("ParamEyeROpen", 0.6),
            ("ParamBrowLForm", -0.5),
            ("ParamBrowRForm", -0.5),
        ],
        Emotion::Neutral => &[
            ("ParamMouthForm", 0.0),
            ("ParamEyeLOpen", 1.0),
            ("ParamEyeROpen", 1.0),
        ],
        Emotion::Thinking => &[
            ("ParamEyeBallX", 0.7),
            ("ParamEyeBallY", 0.5),
            ("ParamMouthForm", -0.2),
            ("ParamAngleZ", 8.0),
        ],
        Emotion::Mystical => &[
            ("ParamEyeLOpen", 0.7),
            ("ParamEyeROpen", 0.7),
            ("ParamMouthForm", 0.3),
            ("ParamAngleY", -5.0),
            ("ParamBodyAngleZ", 3.0),
        ],
        Emotion::Comfort => &[
            ("ParamMouthForm", 0.6),
            ("ParamEyeLOpen", 0.8),
            ("ParamEyeROpen", 0.8),
            ("ParamCheek", 0.4),
            ("ParamAngleZ", 4.0),
        ],
    }
}

fn scaled(emotion: Emotion, intensity: f32) -> HashMap<String, f32> {
    template(emotion)
        .iter()
        .map(|(name, value)| (name.to_string(), value * intensity))
        .collect()
}

pub fn neutral_baseline() -> HashMap<String, f32> {
    scaled(Emotion::Neutral, 0.5)
}

/// Both templates are scaled by intensity, then blended channel-wise as
/// `primary * ratio + secondary * (1 - ratio)`; a channel present on only
/// one side keeps that side's weight.
pub fn synthesize(
    primary: Emotion,
    secondary: Option<Emotion>,
    intensity: f32,
    blend_ratio: f32,
) -> HashMap<String, f32> {
    let primary_map = scaled(primary, intensity);
    let Some(secondary) = secondary else {
        return primary_map;
    };

    let secondary_map = scaled(secondary, intensity);
    let mut blended: HashMap<String, f32> = HashMap::new();

    for name in primary_map.keys().chain(secondary_map.keys()) {
        if blended.contains_key(name) {
            continue;
        }
        let p = primary_map.get(name).copied().unwrap_or(0.0);
        let s = secondary_map.get(name).copied().unwrap_or(0.0);
        blended.insert(name.clone(), p * blend_ratio + s * (1.0 - blend_ratio));
    }

    blended
}
