use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::modules::emotion::types::Emotion;

pub const HISTORY_CAPACITY: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryKind {
    EmotionUpdate,
    EmotionRevert,
    MotionTrigger,
    MotionEnd,
    ParameterUpdate,
    ParameterRevert,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub kind: HistoryKind,
    pub payload: serde_json::Value,
    pub at: DateTime<Utc>,
}

/// Bounded record of session state changes; at capacity the oldest entry
/// is evicted first.
#[derive(Debug, Clone, Default)]
pub struct StateHistory {
    entries: VecDeque<HistoryEntry>,
}

impl StateHistory {
    pub fn new() -> Self {
        StateHistory {
            entries: VecDeque::with_capacity(HISTORY_CAPACITY),
        }
    }

    pub fn push(&mut self, kind: HistoryKind, payload: serde_json::Value) {
        if self.entries.len() == HISTORY_CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(HistoryEntry {
            kind,
            payload,
            at: Utc::now(),
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// The most recent `limit` entries, oldest first.
    pub fn recent(&self, limit: usize, kind: Option<HistoryKind>) -> Vec<HistoryEntry> {
        let filtered: Vec<&HistoryEntry> = self
            .entries
            .iter()
            .filter(|entry| kind.map_or(true, |k| entry.kind == k))
            .collect();
        let skip = filtered.len().saturating_sub(limit);
        filtered.into_iter().skip(skip).cloned().collect()
    }

    pub fn last_decided_emotion(&self) -> Option<Emotion> {
        self.entries
            .iter()
            .rev()
            .find(|entry| entry.kind == HistoryKind::EmotionUpdate)
            .and_then(|entry| entry.payload.get("emotion"))
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }
}
