use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::modules::emotion::types::{Emotion, Language, ModifierLevel};

/// All tokens are stored lowercased; matching is substring-based so Korean
/// and Japanese stems match their conjugated forms. Extension produces a
/// new value rather than mutating in place.
#[derive(Debug, Clone)]
pub struct Lexicon {
    triggers: HashMap<(Emotion, Language), Vec<String>>,
    modifiers: HashMap<ModifierLevel, Vec<String>>,
}

impl Lexicon {
    fn empty() -> Self {
        Lexicon {
            triggers: HashMap::new(),
            modifiers: HashMap::new(),
        }
    }

    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    /// A language hint restricts matching to that language's list; without
    /// one, every language is scanned.
    pub fn triggers_for(&self, emotion: Emotion, hint: Option<Language>) -> Vec<&str> {
        let languages: &[Language] = match hint {
            Some(ref l) => std::slice::from_ref(l),
            None => &Language::ALL,
        };
        languages
            .iter()
            .filter_map(|lang| self.triggers.get(&(emotion, *lang)))
            .flatten()
            .map(String::as_str)
            .collect()
    }

    pub fn modifier_entries(&self) -> impl Iterator<Item = (ModifierLevel, &[String])> {
        [ModifierLevel::High, ModifierLevel::Medium, ModifierLevel::Low]
            .into_iter()
            .filter_map(|level| self.modifiers.get(&level).map(|words| (level, words.as_slice())))
    }

    pub fn extended_with_triggers(
        &self,
        emotion: Emotion,
        language: Language,
        words: &[&str],
    ) -> Self {
        let mut next = self.clone();
        next.push_triggers(emotion, language, words);
        next
    }

    pub fn extended_with_modifiers(&self, level: ModifierLevel, words: &[&str]) -> Self {
        let mut next = self.clone();
        next.push_modifiers(level, words);
        next
    }

    fn push_triggers(&mut self, emotion: Emotion, language: Language, words: &[&str]) {
        let list = self.triggers.entry((emotion, language)).or_default();
        for word in words {
            let token = word.to_lowercase();
            if !token.is_empty() && !list.contains(&token) {
                list.push(token);
            }
        }
    }

    fn push_modifiers(&mut self, level: ModifierLevel, words: &[&str]) {
        let list = self.modifiers.entry(level).or_default();
        for word in words {
            let token = word.to_lowercase();
            if !token.is_empty() && !list.contains(&token) {
                list.push(token);
            }
        }
    }
}

lazy_static! {
    static ref BUILTIN: Lexicon = {
        use Emotion::*;
        use Language::*;

        let mut lex = Lexicon::empty();

        lex.push_triggers(Joy, Ko, &["기쁘", "기뻐", "행복", "좋아", "신나", "즐겁", "최고", "감사"]);
        lex.push_triggers(Joy, En, &["happy", "glad", "great", "awesome", "wonderful", "love"]);
        lex.push_triggers(Joy, Ja, &["嬉し", "楽し", "幸せ", "最高"]);

        lex.push_triggers(Sadness, Ko, &["슬프", "슬퍼", "우울", "눈물", "힘들", "외로", "속상"]);
        lex.push_triggers(Sadness, En, &["sad", "depressed", "lonely", "miserable", "tears", "unhappy"]);
        lex.push_triggers(Sadness, Ja, &["悲し", "寂し", "辛い", "泣"]);

        lex.push_triggers(Anger, Ko, &["화나", "화났", "짜증", "분노", "열받", "싫어"]);
        lex.push_triggers(Anger, En, &["angry", "furious", "annoyed", "hate", "outrageous"]);
        lex.push_triggers(Anger, Ja, &["怒", "腹立", "むかつ", "嫌い"]);

        lex.push_triggers(Surprise, Ko, &["놀라", "깜짝", "대박", "세상에"]);
        lex.push_triggers(Surprise, En, &["wow", "surprised", "amazing", "unbelievable", "incredible"]);
        lex.push_triggers(Surprise, Ja, &["びっくり", "驚", "まさか", "すごい"]);

        lex.push_triggers(Fear, Ko, &["무서", "두려", "불안", "걱정"]);
        lex.push_triggers(Fear, En, &["scared", "afraid", "terrified", "anxious", "worried", "nervous"]);
        lex.push_triggers(Fear, Ja, &["怖い", "不安", "心配"]);

        lex.push_triggers(Disgust, Ko, &["역겹", "더럽", "징그"]);
        lex.push_triggers(Disgust, En, &["disgusting", "gross", "nasty", "revolting"]);
        lex.push_triggers(Disgust, Ja, &["気持ち悪", "汚い"]);

        lex.push_triggers(Neutral, Ko, &["그렇군", "알겠", "보통", "그냥"]);
        lex.push_triggers(Neutral, En, &["okay", "i see", "alright", "anyway"]);
        lex.push_triggers(Neutral, Ja, &["なるほど", "そうですか", "ふむ"]);

        lex.push_triggers(Thinking, Ko, &["글쎄", "생각", "고민", "궁금", "어떨까"]);
        lex.push_triggers(Thinking, En, &["hmm", "wonder", "thinking", "curious", "perhaps"]);
        lex.push_triggers(Thinking, Ja, &["うーん", "考え", "どうかな", "気になる"]);

        lex.push_triggers(Mystical, Ko, &["운명", "신비", "기운", "별자리", "운세", "점괘"]);
        lex.push_triggers(Mystical, En, &["destiny", "fate", "mystic", "cosmic", "fortune"]);
        lex.push_triggers(Mystical, Ja, &["運命", "神秘", "占い", "星座"]);

        lex.push_triggers(Comfort, Ko, &["괜찮", "편안", "따뜻", "위로", "포근", "안심"]);
        lex.push_triggers(Comfort, En, &["comfort", "cozy", "warm", "relax", "calm", "soothing"]);
        lex.push_triggers(Comfort, Ja, &["安心", "落ち着", "癒し", "温か"]);

        lex.push_modifiers(ModifierLevel::High, &[
            "정말", "진짜", "너무", "완전", "매우",
            "very", "really", "extremely", "totally", "absolutely",
            "とても", "本当に", "すごく", "めっちゃ",
        ]);
        lex.push_modifiers(ModifierLevel::Medium, &[
            "꽤", "상당히", "많이",
            "quite", "pretty", "fairly", "rather",
            "かなり", "結構",
        ]);
        lex.push_modifiers(ModifierLevel::Low, &[
            "조금", "약간", "살짝",
            "slightly", "a little", "a bit", "somewhat",
            "少し", "ちょっと",
        ]);

        lex
    };
}
