//! Chat assistant: answers side-panel questions and keeps the history.

use crate::domain::chat::{answer_for, ChatEntry, ChatLog};

/// Keyword-matched help assistant with a bounded history.
#[derive(Debug, Clone, Default)]
pub struct ChatAssistant {
    log: ChatLog,
}

impl ChatAssistant {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            log: ChatLog::with_capacity(capacity),
        }
    }

    /// Answer a question and append the exchange to the history.
    ///
    /// Empty input is ignored and returns `None`. Anything else, including
    /// whitespace, is stored as typed.
    pub fn ask(&mut self, question: &str) -> Option<&ChatEntry> {
        if question.is_empty() {
            return None;
        }

        let entry = ChatEntry {
            question: question.to_string(),
            answer: answer_for(question).to_string(),
            asked_at: chrono::Utc::now(),
        };
        if self.log.push(entry).is_some() {
            tracing::debug!("Chat history full, dropped oldest exchange");
        }
        self.log.latest()
    }

    #[must_use]
    pub fn history(&self) -> &ChatLog {
        &self.log
    }
}
