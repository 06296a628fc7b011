//! # Reply Rules
//!
//! How the twin answers. A [`ReplyTable`] is an ordered list of tagged rules;
//! the first rule whose keywords match the user's text produces the reply,
//! otherwise the table's fallback text is used.
//!
//! ```text
//! "can you predict my week?"
//!     │ lowercase
//!     ▼
//! simulation? ── yes ──► Reply { text, actions: [Run Simulation] }
//!     │ no
//!     ▼
//! progress? goal? journal? ... ── none ──► Reply { fallback, [] }
//! ```
//!
//! Reply generation is reached through the [`ReplySource`] trait so a real
//! backend can replace the scripted table without touching the session.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use crate::core::keywords;
use crate::core::message::{SuggestedAction, SuggestionEffect};
use crate::core::mood::Mood;

/// Placeholder in rule text replaced with the twin's current mood label.
const MOOD_PLACEHOLDER: &str = "{mood}";
/// Placeholder replaced with the profile sketch built from check-ins.
const PROFILE_PLACEHOLDER: &str = "{profile}";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub actions: Vec<SuggestedAction>,
}

#[derive(Debug, Clone)]
pub struct ReplyRule {
    /// Tag used in logs.
    pub name: &'static str,
    pub keywords: Vec<&'static str>,
    pub text: &'static str,
    pub actions: Vec<SuggestedAction>,
}

impl ReplyRule {
    pub fn new(name: &'static str, keywords: &[&'static str], text: &'static str) -> Self {
        Self {
            name,
            keywords: keywords.to_vec(),
            text,
            actions: Vec::new(),
        }
    }

    pub fn with_action(mut self, label: &str, effect: SuggestionEffect) -> Self {
        self.actions.push(SuggestedAction::new(label, effect));
        self
    }

    fn matches(&self, text_lower: &str) -> bool {
        keywords::any(text_lower, &self.keywords)
    }

    fn render(&self, request: &ReplyRequest<'_>) -> Reply {
        Reply {
            text: fill(self.text, request),
            actions: self.actions.clone(),
        }
    }
}

fn fill(template: &str, request: &ReplyRequest<'_>) -> String {
    template
        .replace(MOOD_PLACEHOLDER, request.mood.label())
        .replace(PROFILE_PLACEHOLDER, request.profile)
}

#[derive(Debug, Clone)]
pub struct ReplyTable {
    rules: Vec<ReplyRule>,
    fallback: &'static str,
}

impl Default for ReplyTable {
    fn default() -> Self {
        Self::new(default_rules(), DEFAULT_REPLY)
    }
}

impl ReplyTable {
    pub fn new(rules: Vec<ReplyRule>, fallback: &'static str) -> Self {
        Self { rules, fallback }
    }

    /// Name of the first rule matching `text`, if any.
    pub fn matching_rule(&self, text: &str) -> Option<&'static str> {
        let lower = text.to_lowercase();
        self.rules.iter().find(|r| r.matches(&lower)).map(|r| r.name)
    }

    pub fn reply(&self, request: &ReplyRequest<'_>) -> Reply {
        let lower = request.text.to_lowercase();
        match self.rules.iter().find(|r| r.matches(&lower)) {
            Some(rule) => rule.render(request),
            None => Reply {
                text: fill(self.fallback, request),
                actions: Vec::new(),
            },
        }
    }

    /// Suggested actions of the first matching rule, without the text.
    pub fn actions_for(&self, text: &str) -> Vec<SuggestedAction> {
        let lower = text.to_lowercase();
        self.rules
            .iter()
            .find(|r| r.matches(&lower))
            .map(|r| r.actions.clone())
            .unwrap_or_default()
    }
}

pub const DEFAULT_REPLY: &str = "I understand what you're saying. To get the most out of our \
    conversation, try asking me 'what if' questions, about your progress and goals, or how \
    your journal has been going.";

pub fn default_rules() -> Vec<ReplyRule> {
    vec![
        ReplyRule::new(
            "simulation",
            &["what if", "what would happen", "simulate", "predict"],
            "Let's look ahead. Based on your recent patterns I can predict a few likely \
             outcomes for that scenario: steady routines point to a positive trend, while \
             sudden changes tend to cost you energy for a week or two. Want me to run a \
             full simulation?",
        )
        .with_action("Run Simulation", SuggestionEffect::RunSimulation),
        ReplyRule::new(
            "progress",
            &["progress", "improve", "improvement", "growth"],
            "You've been making steady progress. Your check-ins show more good days than \
             last month. Want to see the details?",
        )
        .with_action("View Progress", SuggestionEffect::ShowProgress),
        ReplyRule::new(
            "goal",
            &["goal", "goals", "habit", "habits", "plan"],
            "Goals work best when they're small and specific. What's one thing you'd like \
             to do more of this week?",
        )
        .with_action("Set a Goal", SuggestionEffect::SetGoal),
        ReplyRule::new(
            "journal",
            &["journal", "write", "writing", "reflect"],
            "Writing things down helps me understand you better. A few lines about today \
             would be a great start.",
        )
        .with_action("Open Journal", SuggestionEffect::OpenJournal),
        ReplyRule::new(
            "profile",
            &["who am i", "my personality", "my traits", "know about me"],
            "Here's how I see you so far. {profile}",
        ),
        ReplyRule::new(
            "help",
            &["help", "how do i", "how does this work", "what can you do"],
            "I'm your Digital Twin. Ask me 'what if' questions, talk about your goals and \
             progress, or check in with /checkin <mood> to log how you feel.",
        ),
        ReplyRule::new(
            "greeting",
            &["hello", "hi", "hey", "greetings"],
            "Hello! I'm your Digital Twin. How can I help you today?",
        ),
        ReplyRule::new(
            "farewell",
            &["bye", "goodbye", "see you", "farewell"],
            "Goodbye! Looking forward to our next conversation.",
        ),
        ReplyRule::new(
            "thanks",
            &["thank you", "thanks"],
            "You're welcome! I'm here to help.",
        ),
        ReplyRule::new(
            "wellbeing",
            &["how are you"],
            "I'm feeling {mood} right now, thanks for asking. How are you feeling today?",
        ),
    ]
}

// ============================================================================
// Reply sources
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyError {
    /// The source did not answer within the configured timeout.
    Timeout(Duration),
    /// The source answered with an error.
    Backend(String),
}

impl fmt::Display for ReplyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplyError::Timeout(after) => {
                write!(f, "no reply after {}ms", after.as_millis())
            }
            ReplyError::Backend(msg) => write!(f, "reply failed: {msg}"),
        }
    }
}

impl std::error::Error for ReplyError {}

/// Everything a source needs to answer one message.
#[derive(Debug, Clone, Copy)]
pub struct ReplyRequest<'a> {
    pub text: &'a str,
    pub mood: Mood,
    /// Profile sketch from the user's check-ins.
    pub profile: &'a str,
}

#[async_trait]
pub trait ReplySource: Send + Sync {
    fn name(&self) -> &str;

    async fn reply(&self, request: ReplyRequest<'_>) -> Result<Reply, ReplyError>;
}

/// Answers from a [`ReplyTable`]. Never fails.
#[derive(Debug, Default)]
pub struct ScriptedReplies {
    table: ReplyTable,
}

impl ScriptedReplies {
    pub fn new(table: ReplyTable) -> Self {
        Self { table }
    }
}

#[async_trait]
impl ReplySource for ScriptedReplies {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn reply(&self, request: ReplyRequest<'_>) -> Result<Reply, ReplyError> {
        if let Some(rule) = self.table.matching_rule(request.text) {
            log::debug!("Reply rule matched: {}", rule);
        }
        Ok(self.table.reply(&request))
    }
}
