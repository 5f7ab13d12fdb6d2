//! Canned-answer help chat.
//!
//! Answers are picked by keyword, checked in a fixed priority order. The
//! conversation is kept in a bounded log that drops its oldest entries.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

pub const OLDPEAK_ANSWER: &str = "Oldpeak is ST depression induced by exercise relative to rest.";
pub const CHEST_PAIN_ANSWER: &str = "Chest pain type indicates the type of angina experienced.";
pub const FALLBACK_ANSWER: &str = "I'm here to help with heart-related input questions.";

/// Keyword table, first match wins.
const KEYWORD_ANSWERS: &[(&str, &str)] = &[
    ("oldpeak", OLDPEAK_ANSWER),
    ("chest pain", CHEST_PAIN_ANSWER),
];

/// Default number of exchanges kept in a [`ChatLog`].
pub const DEFAULT_CHAT_CAPACITY: usize = 100;

/// Pick the canned answer for a question.
#[must_use]
pub fn answer_for(question: &str) -> &'static str {
    let lowered = question.to_lowercase();
    KEYWORD_ANSWERS
        .iter()
        .find(|(keyword, _)| lowered.contains(*keyword))
        .map_or(FALLBACK_ANSWER, |&(_, answer)| answer)
}

/// One question/answer exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatEntry {
    pub question: String,
    pub answer: String,
    pub asked_at: chrono::DateTime<chrono::Utc>,
}

/// Ordered chat history with a fixed capacity.
#[derive(Debug, Clone)]
pub struct ChatLog {
    entries: VecDeque<ChatEntry>,
    capacity: usize,
}

impl Default for ChatLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CHAT_CAPACITY)
    }
}

impl ChatLog {
    /// Create a log holding at most `capacity` entries (at least one).
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an entry, evicting the oldest one when full.
    ///
    /// Returns the evicted entry, if any.
    pub fn push(&mut self, entry: ChatEntry) -> Option<ChatEntry> {
        let evicted = if self.entries.len() == self.capacity {
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(entry);
        evicted
    }

    /// Entries from oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &ChatEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn latest(&self) -> Option<&ChatEntry> {
        self.entries.back()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
