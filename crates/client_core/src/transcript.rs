//! Per-suspect chat log and its line rendering.

use chrono::{DateTime, Local};
use shared::domain::Speaker;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub speaker: Speaker,
    /// Display label; for suspect replies this is the suspect selected at receipt time.
    pub label: String,
    pub text: String,
    pub at: DateTime<Local>,
}

impl ChatMessage {
    pub fn render(&self) -> String {
        format!("[{}] {}: {}", self.at.format("%H:%M:%S"), self.label, self.text)
    }
}

pub const DETECTIVE_LABEL: &str = "DETECTIVE";
pub const SYSTEM_LABEL: &str = "SYSTEM";

/// Ordered in receipt order; never reordered.
#[derive(Debug, Default, Clone)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    pub fn push_detective(&mut self, text: impl Into<String>) {
        self.push(Speaker::Detective, DETECTIVE_LABEL.to_string(), text.into());
    }

    pub fn push_suspect(&mut self, name: &str, text: impl Into<String>) {
        self.push(Speaker::Suspect, name.to_string(), text.into());
    }

    pub fn push_system(&mut self, text: impl Into<String>) {
        self.push(Speaker::System, SYSTEM_LABEL.to_string(), text.into());
    }

    fn push(&mut self, speaker: Speaker, label: String, text: String) {
        self.messages.push(ChatMessage {
            speaker,
            label,
            text,
            at: Local::now(),
        });
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_prefixes_time_and_label() {
        let mut transcript = Transcript::default();
        transcript.push_suspect("Jack Domador", "No sé nada.");
        let line = transcript.last().expect("message").render();
        assert!(line.starts_with('['));
        assert!(line.ends_with("] Jack Domador: No sé nada."));
    }

    #[test]
    fn keeps_receipt_order() {
        let mut transcript = Transcript::default();
        transcript.push_detective("one");
        transcript.push_system("two");
        transcript.push_suspect("X", "three");
        let speakers: Vec<_> = transcript.messages().iter().map(|m| m.speaker).collect();
        assert_eq!(
            speakers,
            vec![Speaker::Detective, Speaker::System, Speaker::Suspect]
        );
    }
}
