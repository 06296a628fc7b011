//! # Conversation Transcript
//!
//! The message list a chat session works on. A transcript owns its id
//! counter, so ids are unique and increase with creation time.
//!
//! ```text
//! Transcript
//! ├── messages: Vec<Message>   // in display order
//! └── next_id: MessageId       // never reused, never reset
//! ```
//!
//! Delivery status only moves forward:
//!
//! ```text
//! Sending → Sent → Delivered → Read
//! ```
//!
//! The thinking placeholder is a twin-side entry with `thinking = true` and
//! empty text. At most one exists at a time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type MessageId = u64;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Twin,
}

/// Delivery status of a user message. Ordering follows the lifecycle.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Sending,
    Sent,
    Delivered,
    Read,
}

impl DeliveryStatus {
    /// Short marker shown next to a message.
    pub fn glyph(self) -> &'static str {
        match self {
            DeliveryStatus::Sending => "…",
            DeliveryStatus::Sent => "✓",
            DeliveryStatus::Delivered => "✓✓",
            DeliveryStatus::Read => "read",
        }
    }
}

/// What happens when the user picks a suggested follow-up.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionEffect {
    RunSimulation,
    ShowProgress,
    SetGoal,
    OpenJournal,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SuggestedAction {
    pub label: String,
    pub effect: SuggestionEffect,
}

impl SuggestedAction {
    pub fn new(label: &str, effect: SuggestionEffect) -> Self {
        Self {
            label: label.to_string(),
            effect,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Message {
    pub id: MessageId,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    /// Only user messages carry a delivery status.
    pub status: Option<DeliveryStatus>,
    pub thinking: bool,
    pub actions: Vec<SuggestedAction>,
}

#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<Message>,
    next_id: MessageId,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transcript seeded with one twin greeting.
    pub fn with_greeting(greeting: &str) -> Self {
        let mut transcript = Self::new();
        if !greeting.trim().is_empty() {
            transcript.push_twin(greeting.to_string(), Vec::new());
        }
        transcript
    }

    /// Drops every message. The id counter keeps counting.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    fn allocate_id(&mut self) -> MessageId {
        self.next_id += 1;
        self.next_id
    }

    fn push(
        &mut self,
        text: String,
        sender: Sender,
        status: Option<DeliveryStatus>,
        thinking: bool,
        actions: Vec<SuggestedAction>,
    ) -> MessageId {
        let id = self.allocate_id();
        self.messages.push(Message {
            id,
            text,
            sender,
            timestamp: Utc::now(),
            status,
            thinking,
            actions,
        });
        id
    }

    /// Appends a user message in the `Sending` state.
    pub fn push_user(&mut self, text: String) -> MessageId {
        self.push(text, Sender::User, Some(DeliveryStatus::Sending), false, Vec::new())
    }

    /// Appends a twin reply. Replies carry no delivery status.
    pub fn push_twin(&mut self, text: String, actions: Vec<SuggestedAction>) -> MessageId {
        self.push(text, Sender::Twin, None, false, actions)
    }

    /// Inserts the thinking placeholder. Returns `None` if one is already present.
    pub fn begin_thinking(&mut self) -> Option<MessageId> {
        if self.thinking().is_some() {
            return None;
        }
        Some(self.push(String::new(), Sender::Twin, None, true, Vec::new()))
    }

    /// Removes the thinking placeholder. Returns whether one was present.
    pub fn end_thinking(&mut self) -> bool {
        let before = self.messages.len();
        self.messages.retain(|m| !m.thinking);
        self.messages.len() != before
    }

    pub fn thinking(&self) -> Option<&Message> {
        self.messages.iter().find(|m| m.thinking)
    }

    /// Moves a user message forward to `to`. Backward or sideways moves are
    /// ignored and return `false`.
    pub fn advance_status(&mut self, id: MessageId, to: DeliveryStatus) -> bool {
        let Some(message) = self.messages.iter_mut().find(|m| m.id == id) else {
            return false;
        };
        match message.status {
            Some(current) if to > current => {
                message.status = Some(to);
                true
            }
            _ => false,
        }
    }

    /// Called when the twin answers `answered`: that message is `Read`, and
    /// every earlier user message already `Sent` is `Delivered`.
    pub fn acknowledge(&mut self, answered: MessageId) {
        let earlier: Vec<MessageId> = self
            .messages
            .iter()
            .filter(|m| m.id < answered && m.status == Some(DeliveryStatus::Sent))
            .map(|m| m.id)
            .collect();
        for id in earlier {
            self.advance_status(id, DeliveryStatus::Delivered);
        }
        self.advance_status(answered, DeliveryStatus::Read);
    }

    pub fn count_by(&self, sender: Sender) -> usize {
        self.messages
            .iter()
            .filter(|m| m.sender == sender && !m.thinking)
            .count()
    }

    /// The suggested actions attached to the most recent twin reply.
    pub fn latest_actions(&self) -> &[SuggestedAction] {
        self.messages
            .iter()
            .rev()
            .find(|m| m.sender == Sender::Twin && !m.thinking)
            .map(|m| m.actions.as_slice())
            .unwrap_or(&[])
    }
}
