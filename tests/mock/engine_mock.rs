use avatar_affect_engine::{FortuneOutcome, InteractionRequest, Language, SelectorRng};

/// Selector RNG with a fixed outcome for every roll.
pub struct ScriptedRng {
    chance_outcome: bool,
    pick_index: usize,
}

impl ScriptedRng {
    pub fn new(chance_outcome: bool, pick_index: usize) -> Self {
        Self {
            chance_outcome,
            pick_index,
        }
    }

    pub fn always_fire() -> Self {
        Self::new(true, 0)
    }

    pub fn never_fire() -> Self {
        Self::new(false, 0)
    }

    pub fn with_pick(mut self, pick_index: usize) -> Self {
        self.pick_index = pick_index;
        self
    }
}

impl SelectorRng for ScriptedRng {
    fn chance(&mut self, _probability: f32) -> bool {
        self.chance_outcome
    }

    fn pick(&mut self, len: usize) -> usize {
        self.pick_index.min(len - 1)
    }
}

pub struct TestTurnData;

impl TestTurnData {
    pub fn korean_joy(session_id: &str) -> InteractionRequest {
        InteractionRequest::new(session_id, "정말 기쁘고 행복해요")
            .with_language(Language::Ko)
            .with_context("conversation")
    }

    pub fn korean_joy_plain(session_id: &str) -> InteractionRequest {
        InteractionRequest::new(session_id, "기뻐요")
            .with_language(Language::Ko)
            .with_context("conversation")
    }

    pub fn english_sadness(session_id: &str) -> InteractionRequest {
        InteractionRequest::new(session_id, "I feel so sad and lonely today")
            .with_language(Language::En)
            .with_context("consultation")
    }

    pub fn japanese_surprise(session_id: &str) -> InteractionRequest {
        InteractionRequest::new(session_id, "本当にびっくりした")
            .with_language(Language::Ja)
            .with_context("conversation")
    }

    pub fn gibberish(session_id: &str) -> InteractionRequest {
        InteractionRequest::new(session_id, "zzz qqq 750").with_context("conversation")
    }

    pub fn flat_fortune(session_id: &str, overall_score: u8) -> InteractionRequest {
        InteractionRequest::new(session_id, "음...")
            .with_language(Language::Ko)
            .with_context("fortune_daily")
            .with_fortune(FortuneOutcome {
                fortune_type: "daily".to_string(),
                overall_score: Some(overall_score),
                category_scores: Default::default(),
            })
    }

    pub fn mystical_fortune(session_id: &str) -> InteractionRequest {
        InteractionRequest::new(session_id, "오늘의 운세가 궁금해요")
            .with_language(Language::Ko)
            .with_context("fortune_daily")
    }
}
