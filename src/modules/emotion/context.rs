use std::collections::HashMap;

use tracing::debug;

use crate::config::ContextWeightTable;
use crate::modules::emotion::types::{Emotion, FortuneOutcome};

const FORTUNE_NEUTRAL_SCORE: f32 = 0.5;

/// Context weights multiply only the emotions they name; an unknown context
/// type is the identity. A fortune boost inserts its emotion at the neutral
/// default score before scaling when the map lacks it.
pub fn adjust(
    table: &ContextWeightTable,
    scores: &HashMap<Emotion, f32>,
    context_type: &str,
    fortune: Option<&FortuneOutcome>,
) -> HashMap<Emotion, f32> {
    let profile = table.profile(context_type);
    let mut adjusted = scores.clone();

    for (emotion, weight) in &profile.weights {
        if let Some(value) = adjusted.get_mut(emotion) {
            *value *= weight;
        }
    }

    if let Some(score) = fortune.and_then(|f| f.overall_score) {
        if score >= 80 {
            boost(&mut adjusted, Emotion::Joy, 1.3);
        } else if score >= 60 {
            boost(&mut adjusted, Emotion::Joy, 1.1);
        }
        if score <= 30 {
            boost(&mut adjusted, Emotion::Sadness, 1.2);
        }
        debug!(context_type, fortune_score = score, "applied fortune boost");
    }

    adjusted
}

fn boost(scores: &mut HashMap<Emotion, f32>, emotion: Emotion, factor: f32) {
    let value = scores.entry(emotion).or_insert(FORTUNE_NEUTRAL_SCORE);
    *value *= factor;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ContextWeightTable {
        ContextWeightTable::builtin()
    }

    fn fortune(overall: u8) -> FortuneOutcome {
        FortuneOutcome {
            fortune_type: "daily".to_string(),
            overall_score: Some(overall),
            category_scores: HashMap::new(),
        }
    }

    #[test]
    fn test_context_weight_multiplies_present_emotions() {
        let mut scores = HashMap::new();
        scores.insert(Emotion::Joy, 2.0);
        scores.insert(Emotion::Fear, 1.0);

        let adjusted = adjust(&table(), &scores, "greeting", None);

        assert!((adjusted[&Emotion::Joy] - 2.6).abs() < 1e-6);
        assert_eq!(adjusted[&Emotion::Fear], 1.0);
    }

    #[test]
    fn test_unknown_context_is_identity() {
        let mut scores = HashMap::new();
        scores.insert(Emotion::Anger, 1.5);

        let adjusted = adjust(&table(), &scores, "no_such_context", None);
        assert_eq!(adjusted, scores);
    }

    #[test]
    fn test_high_fortune_score_boosts_joy() {
        let mut scores = HashMap::new();
        scores.insert(Emotion::Neutral, 0.5);

        let adjusted = adjust(&table(), &scores, "fortune_daily", Some(&fortune(90)));

        // 0.5 default entry, then x1.3
        assert!((adjusted[&Emotion::Joy] - 0.65).abs() < 1e-6);
    }

    #[test]
    fn test_good_fortune_score_boosts_joy_mildly() {
        let mut scores = HashMap::new();
        scores.insert(Emotion::Joy, 1.0);

        let adjusted = adjust(&table(), &scores, "conversation", Some(&fortune(65)));

        // conversation weight 1.1, then fortune x1.1
        assert!((adjusted[&Emotion::Joy] - 1.21).abs() < 1e-6);
    }

    #[test]
    fn test_low_fortune_score_boosts_sadness() {
        let mut scores = HashMap::new();
        scores.insert(Emotion::Sadness, 1.0);

        let adjusted = adjust(&table(), &scores, "fortune_daily", Some(&fortune(20)));
        assert!((adjusted[&Emotion::Sadness] - 1.2).abs() < 1e-6);
    }

    #[test]
    fn test_mid_fortune_score_changes_nothing() {
        let mut scores = HashMap::new();
        scores.insert(Emotion::Neutral, 0.5);

        let adjusted = adjust(&table(), &scores, "no_such_context", Some(&fortune(50)));
        assert_eq!(adjusted, scores);
    }

    #[test]
    fn test_fortune_without_overall_score_changes_nothing() {
        let mut scores = HashMap::new();
        scores.insert(Emotion::Neutral, 0.5);
        let outcome = FortuneOutcome {
            fortune_type: "daily".to_string(),
            overall_score: None,
            category_scores: HashMap::new(),
        };

        let adjusted = adjust(&table(), &scores, "fortune_daily", Some(&outcome));
        assert_eq!(adjusted, scores);
    }
}
