//! # Application State
//!
//! Core business state for the twin. Domain logic only, no TUI types.
//! Presentation state (scroll offsets, input buffer, panel focus) lives in
//! the `tui` module.
//!
//! ```text
//! App
//! ├── twin_name: String               // shown in the title bar
//! ├── transcript: Transcript          // the conversation
//! ├── mood: Mood                      // twin's current mood
//! ├── mood_generation: u64            // bumps on every mood update
//! ├── classifier: MoodClassifier      // keyword → mood
//! ├── replies: Arc<dyn ReplySource>   // where replies come from
//! ├── pending: Option<Exchange>       // exchange being answered
//! ├── queue: VecDeque<Exchange>       // submissions waiting their turn
//! ├── checkins: CheckInLog            // mood check-ins (persisted)
//! ├── avatar: AvatarConfig            // appearance (persisted on save)
//! ├── avatar_dirty: bool              // edited since last save
//! ├── last_scenario: Option<String>   // text that offered a simulation
//! └── status_message: String          // status bar text
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::core::avatar::AvatarConfig;
use crate::core::checkin::CheckInLog;
use crate::core::config::ResolvedConfig;
use crate::core::message::{MessageId, Transcript};
use crate::core::mood::{Mood, MoodClassifier};
use crate::core::replies::ReplySource;

/// One user submission waiting for (or receiving) its reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub message_id: MessageId,
    pub text: String,
}

pub struct App {
    pub twin_name: String,
    pub greeting: String,
    pub transcript: Transcript,
    pub mood: Mood,
    pub mood_generation: u64,
    pub classifier: MoodClassifier,
    pub replies: Arc<dyn ReplySource>,
    pub pending: Option<Exchange>,
    pub queue: VecDeque<Exchange>,
    pub checkins: CheckInLog,
    pub avatar: AvatarConfig,
    pub avatar_dirty: bool,
    pub last_scenario: Option<String>,
    pub status_message: String,
}

impl App {
    pub fn new(replies: Arc<dyn ReplySource>, twin_name: String, greeting: String) -> Self {
        Self {
            transcript: Transcript::with_greeting(&greeting),
            twin_name,
            greeting,
            mood: Mood::default(),
            mood_generation: 0,
            classifier: MoodClassifier::default(),
            replies,
            pending: None,
            queue: VecDeque::new(),
            checkins: CheckInLog::default(),
            avatar: AvatarConfig::default(),
            avatar_dirty: false,
            last_scenario: None,
            status_message: String::from("Say hello, or type /help"),
        }
    }

    pub fn from_config(replies: Arc<dyn ReplySource>, config: &ResolvedConfig) -> Self {
        Self::new(replies, config.twin_name.clone(), config.greeting.clone())
    }

    /// True while the twin owes at least one reply.
    pub fn is_busy(&self) -> bool {
        self.pending.is_some() || !self.queue.is_empty()
    }

    /// True while the thinking placeholder is in the transcript.
    pub fn is_thinking(&self) -> bool {
        self.transcript.thinking().is_some()
    }
}
