use std::cmp::Ordering;
use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::config::engine_config::SelectionConfig;
use crate::modules::emotion::types::Emotion;

/// Randomness seam for the anti-repetition branch.
#[cfg_attr(test, mockall::automock)]
pub trait SelectorRng: Send {
    fn chance(&mut self, probability: f32) -> bool;

    /// Uniform index below `len`; `len` is never zero.
    fn pick(&mut self, len: usize) -> usize;
}

pub struct StdSelectorRng {
    rng: StdRng,
}

impl StdSelectorRng {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl SelectorRng for StdSelectorRng {
    fn chance(&mut self, probability: f32) -> bool {
        self.rng.gen::<f32>() < probability
    }

    fn pick(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub primary: Emotion,
    pub secondary: Option<Emotion>,
    pub anti_repeat_applied: bool,
}

/// Primary is the highest score, ties resolving to the earlier emotion in
/// `Emotion::ALL` order. When the primary would repeat the previous turn,
/// the anti-repetition roll may swap in one of its alternatives and demote
/// the original to secondary.
pub fn select(
    scores: &HashMap<Emotion, f32>,
    previous: Option<Emotion>,
    config: &SelectionConfig,
    rng: &mut dyn SelectorRng,
) -> Selection {
    // visit in canonical order so the stable sort breaks ties deterministically
    let mut ranked: Vec<(Emotion, f32)> = Emotion::ALL
        .iter()
        .filter_map(|e| scores.get(e).map(|v| (*e, *v)))
        .collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    let Some(&(top, top_score)) = ranked.first() else {
        return Selection {
            primary: Emotion::Neutral,
            secondary: None,
            anti_repeat_applied: false,
        };
    };

    let mut primary = top;
    let mut secondary = ranked
        .iter()
        .skip(1)
        .find(|(_, score)| *score > config.secondary_threshold)
        .map(|(emotion, _)| *emotion);
    let mut anti_repeat_applied = false;

    if previous == Some(primary) && rng.chance(config.anti_repeat_probability) {
        let alternatives = primary.alternatives();
        let substitute = alternatives[rng.pick(alternatives.len())];
        debug!(
            repeated = %primary,
            substitute = %substitute,
            "anti-repetition substitution"
        );
        secondary = Some(primary);
        primary = substitute;
        anti_repeat_applied = true;
    }

    debug!(primary = %primary, ?secondary, top_score, "emotion selected");

    Selection {
        primary,
        secondary,
        anti_repeat_applied,
    }
}
