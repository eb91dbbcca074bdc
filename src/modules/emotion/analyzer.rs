use std::collections::HashMap;

use tracing::debug;

use crate::config::Lexicon;
use crate::modules::emotion::types::{AnalysisResult, Emotion, Language, ModifierHit};

/// Every substring occurrence of a trigger adds 1.0 to its emotion's score;
/// matched modifiers then scale the totals, and confidence grows per unique
/// matched keyword.
pub fn analyze(lexicon: &Lexicon, text: &str, hint: Option<Language>) -> AnalysisResult {
    let lowered = text.to_lowercase();

    let modifiers = collect_modifier_hits(lexicon, &lowered);
    let mut scores: HashMap<Emotion, f32> = HashMap::new();
    let mut matched_keywords: Vec<String> = Vec::new();

    for emotion in Emotion::ALL {
        let mut score = 0.0f32;
        for trigger in lexicon.triggers_for(emotion, hint) {
            let hits = lowered.matches(trigger).count();
            if hits > 0 {
                score += hits as f32;
                if !matched_keywords.iter().any(|k| k == trigger) {
                    matched_keywords.push(trigger.to_string());
                }
            }
        }
        if score > 0.0 {
            for hit in &modifiers {
                score *= hit.level.score_factor();
            }
            scores.insert(emotion, score);
        }
    }

    if scores.is_empty() {
        debug!(text_len = text.chars().count(), "no lexicon hits, defaulting to neutral");
        return AnalysisResult::neutral();
    }

    let confidence = (0.5 + 0.1 * matched_keywords.len() as f32).min(1.0);
    debug!(
        emotions = scores.len(),
        keywords = matched_keywords.len(),
        modifiers = modifiers.len(),
        confidence,
        "text analysis complete"
    );

    AnalysisResult {
        scores,
        matched_keywords,
        modifiers,
        confidence,
    }
}

fn collect_modifier_hits(lexicon: &Lexicon, lowered: &str) -> Vec<ModifierHit> {
    let mut hits = Vec::new();
    for (level, words) in lexicon.modifier_entries() {
        for word in words {
            if lowered.contains(word.as_str()) {
                hits.push(ModifierHit {
                    level,
                    token: word.clone(),
                });
            }
        }
    }
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::emotion::types::ModifierLevel;

    fn lexicon() -> Lexicon {
        Lexicon::builtin()
    }

    #[test]
    fn test_korean_joy_with_high_modifier() {
        let result = analyze(&lexicon(), "정말 기쁘고 행복해요", Some(Language::Ko));

        // two joy triggers at 1.0 each, then the high modifier at x1.5
        assert_eq!(result.scores.get(&Emotion::Joy), Some(&3.0));
        assert_eq!(result.matched_keywords.len(), 2);
        assert_eq!(result.modifiers.len(), 1);
        assert_eq!(result.modifiers[0].level, ModifierLevel::High);
        assert!((result.confidence - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_no_hits_defaults_to_neutral() {
        let result = analyze(&lexicon(), "zzzz qqqq", None);
        assert_eq!(result.scores.get(&Emotion::Neutral), Some(&0.5));
        assert_eq!(result.confidence, 0.5);
        assert!(result.matched_keywords.is_empty());
        assert!(result.modifiers.is_empty());
    }

    #[test]
    fn test_empty_text_defaults_to_neutral() {
        let result = analyze(&lexicon(), "", None);
        assert_eq!(result.scores.get(&Emotion::Neutral), Some(&0.5));
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let result = analyze(&lexicon(), "I am SO HAPPY today", Some(Language::En));
        assert!(result.scores.contains_key(&Emotion::Joy));
    }

    #[test]
    fn test_repeated_trigger_counts_occurrences() {
        let result = analyze(&lexicon(), "happy happy happy", Some(Language::En));
        assert_eq!(result.scores.get(&Emotion::Joy), Some(&3.0));
        assert!((result.confidence - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_low_modifier_dampens_score() {
        let result = analyze(&lexicon(), "조금 힘들어요", Some(Language::Ko));
        assert_eq!(result.scores.get(&Emotion::Sadness), Some(&0.8));
        assert_eq!(result.modifiers[0].level, ModifierLevel::Low);
    }

    #[test]
    fn test_multiple_emotions_scored_independently() {
        let result = analyze(&lexicon(), "happy but worried", Some(Language::En));
        assert!(result.scores.contains_key(&Emotion::Joy));
        assert!(result.scores.contains_key(&Emotion::Fear));
    }

    #[test]
    fn test_language_hint_excludes_other_languages() {
        let result = analyze(&lexicon(), "happy", Some(Language::Ko));
        assert_eq!(result.scores.get(&Emotion::Neutral), Some(&0.5));
        assert!(result.matched_keywords.is_empty());
    }

    #[test]
    fn test_confidence_caps_at_one() {
        let text = "happy glad great awesome wonderful love wow amazing";
        let result = analyze(&lexicon(), text, Some(Language::En));
        assert!(result.matched_keywords.len() >= 6);
        assert_eq!(result.confidence, 1.0);
    }

    #[test]
    fn test_extended_lexicon_reaches_analysis() {
        let extended = lexicon().extended_with_triggers(Emotion::Joy, Language::En, &["stoked"]);
        let result = analyze(&extended, "totally stoked", Some(Language::En));
        assert_eq!(result.scores.get(&Emotion::Joy), Some(&1.5));
    }
}
