use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineError;

/// Declaration order is the canonical ordering wherever a stable tie-break
/// is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Joy,
    Sadness,
    Anger,
    Surprise,
    Fear,
    Disgust,
    Neutral,
    Thinking,
    Mystical,
    Comfort,
}

impl Emotion {
    pub const ALL: [Emotion; 10] = [
        Emotion::Joy,
        Emotion::Sadness,
        Emotion::Anger,
        Emotion::Surprise,
        Emotion::Fear,
        Emotion::Disgust,
        Emotion::Neutral,
        Emotion::Thinking,
        Emotion::Mystical,
        Emotion::Comfort,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Joy => "joy",
            Emotion::Sadness => "sadness",
            Emotion::Anger => "anger",
            Emotion::Surprise => "surprise",
            Emotion::Fear => "fear",
            Emotion::Disgust => "disgust",
            Emotion::Neutral => "neutral",
            Emotion::Thinking => "thinking",
            Emotion::Mystical => "mystical",
            Emotion::Comfort => "comfort",
        }
    }

    /// Anti-repetition substitutes; never empty, never the emotion itself.
    pub fn alternatives(&self) -> &'static [Emotion] {
        match self {
            Emotion::Joy => &[Emotion::Surprise, Emotion::Comfort],
            Emotion::Sadness => &[Emotion::Thinking, Emotion::Neutral],
            Emotion::Anger => &[Emotion::Disgust, Emotion::Surprise],
            Emotion::Surprise => &[Emotion::Joy, Emotion::Mystical],
            Emotion::Fear => &[Emotion::Surprise, Emotion::Thinking],
            Emotion::Disgust => &[Emotion::Anger, Emotion::Neutral],
            Emotion::Neutral => &[Emotion::Thinking, Emotion::Comfort],
            Emotion::Thinking => &[Emotion::Neutral, Emotion::Mystical],
            Emotion::Mystical => &[Emotion::Thinking, Emotion::Surprise],
            Emotion::Comfort => &[Emotion::Joy, Emotion::Neutral],
        }
    }

    pub fn is_mystical_family(&self) -> bool {
        matches!(self, Emotion::Mystical | Emotion::Thinking)
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Emotion {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "joy" => Ok(Emotion::Joy),
            "sadness" => Ok(Emotion::Sadness),
            "anger" => Ok(Emotion::Anger),
            "surprise" => Ok(Emotion::Surprise),
            "fear" => Ok(Emotion::Fear),
            "disgust" => Ok(Emotion::Disgust),
            "neutral" => Ok(Emotion::Neutral),
            "thinking" => Ok(Emotion::Thinking),
            "mystical" => Ok(Emotion::Mystical),
            "comfort" => Ok(Emotion::Comfort),
            other => Err(EngineError::UnknownEmotion(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Ko,
    En,
    Ja,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Ko, Language::En, Language::Ja];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Ko => "ko",
            Language::En => "en",
            Language::Ja => "ja",
        }
    }
}

impl FromStr for Language {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ko" => Ok(Language::Ko),
            "en" => Ok(Language::En),
            "ja" => Ok(Language::Ja),
            other => Err(EngineError::UnknownLanguage(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModifierLevel {
    High,
    Medium,
    Low,
}

impl ModifierLevel {
    pub fn score_factor(&self) -> f32 {
        match self {
            ModifierLevel::High => 1.5,
            ModifierLevel::Medium => 1.2,
            ModifierLevel::Low => 0.8,
        }
    }

    pub fn intensity_factor(&self) -> f32 {
        match self {
            ModifierLevel::High => 1.3,
            ModifierLevel::Medium => 1.1,
            ModifierLevel::Low => 0.8,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModifierHit {
    pub level: ModifierLevel,
    pub token: String,
}

/// A text with no trigger hits produces the neutral default rather than an
/// error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub scores: HashMap<Emotion, f32>,
    pub matched_keywords: Vec<String>,
    pub modifiers: Vec<ModifierHit>,
    pub confidence: f32,
}

impl AnalysisResult {
    pub fn neutral() -> Self {
        let mut scores = HashMap::new();
        scores.insert(Emotion::Neutral, 0.5);
        AnalysisResult {
            scores,
            matched_keywords: Vec::new(),
            modifiers: Vec::new(),
            confidence: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FortuneOutcome {
    pub fortune_type: String,
    pub overall_score: Option<u8>,
    #[serde(default)]
    pub category_scores: HashMap<String, u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionRequest {
    pub session_id: String,
    pub text: String,
    pub language: Option<Language>,
    pub context_type: String,
    pub model: Option<String>,
    pub fortune: Option<FortuneOutcome>,
}

impl InteractionRequest {
    pub fn new(session_id: impl Into<String>, text: impl Into<String>) -> Self {
        InteractionRequest {
            session_id: session_id.into(),
            text: text.into(),
            language: None,
            context_type: "conversation".to_string(),
            model: None,
            fortune: None,
        }
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    pub fn with_context(mut self, context_type: impl Into<String>) -> Self {
        self.context_type = context_type.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_fortune(mut self, fortune: FortuneOutcome) -> Self {
        self.fortune = Some(fortune);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotionRef {
    pub group: String,
    pub index: u32,
    pub file: String,
}

impl MotionRef {
    pub fn new(group: impl Into<String>, index: u32, file: impl Into<String>) -> Self {
        MotionRef {
            group: group.into(),
            index,
            file: file.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmotionDecision {
    pub decision_id: Uuid,
    pub session_id: String,
    pub primary_emotion: Emotion,
    pub secondary_emotion: Option<Emotion>,
    pub intensity: f32,
    pub confidence: f32,
    pub expression_index: u32,
    pub motion: MotionRef,
    pub duration_ms: u64,
    pub fade_in_ms: u64,
    pub fade_out_ms: u64,
    pub parameters: HashMap<String, f32>,
    pub created_at: DateTime<Utc>,
}
