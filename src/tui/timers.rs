//! # Session Timers
//!
//! Carries out the timer effects the reducer asks for. Each timer is a
//! tokio task that sleeps, then sends an [`Action`] back to the event loop
//! over the same channel the rest of the adapter uses.
//!
//! ```text
//! Effect::ScheduleSent(id)        ─ sent_delay ─────► Action::MessageSent
//! Effect::ScheduleThinking(id)    ─ thinking_delay ─► Action::ThinkingStarted
//! Effect::RequestReply(job)       ─ reply_delay ────► ReplySource::reply
//!                                   (bounded by reply_timeout)
//!                                                  ─► ReplyReady / ReplyFailed
//! Effect::ScheduleMoodReset{gen}  ─ mood_reset ─────► Action::MoodExpired
//! ```
//!
//! Every task's `AbortHandle` is kept. Dropping the `TimerSet` aborts
//! whatever is still pending, so nothing fires into a dead session.

use log::{debug, warn};
use std::sync::{Arc, mpsc};
use std::time::Duration;

use tokio::task::AbortHandle;

use crate::core::action::{Action, Effect, ReplyJob};
use crate::core::config::Timing;
use crate::core::replies::{ReplyError, ReplyRequest, ReplySource};

pub struct TimerSet {
    tx: mpsc::Sender<Action>,
    timing: Timing,
    replies: Arc<dyn ReplySource>,
    tasks: Vec<AbortHandle>,
    /// Only one mood reset may be pending; a newer one replaces it.
    mood_reset: Option<AbortHandle>,
}

impl TimerSet {
    pub fn new(tx: mpsc::Sender<Action>, timing: Timing, replies: Arc<dyn ReplySource>) -> Self {
        Self {
            tx,
            timing,
            replies,
            tasks: Vec::new(),
            mood_reset: None,
        }
    }

    /// Starts the timer for `effect`. Returns false for non-timer effects,
    /// which the caller handles itself.
    pub fn schedule(&mut self, effect: &Effect) -> bool {
        match effect {
            Effect::ScheduleSent(id) => {
                self.after(self.timing.sent_delay, Action::MessageSent(*id));
            }
            Effect::ScheduleThinking(id) => {
                self.after(self.timing.thinking_delay, Action::ThinkingStarted(*id));
            }
            Effect::RequestReply(job) => self.request_reply(job.clone()),
            Effect::ScheduleMoodReset { generation } => self.mood_reset(*generation),
            _ => return false,
        }
        true
    }

    /// Number of timers that have not fired yet.
    pub fn pending(&mut self) -> usize {
        self.tasks.retain(|h| !h.is_finished());
        let reset = self.mood_reset.as_ref().is_some_and(|h| !h.is_finished());
        self.tasks.len() + usize::from(reset)
    }

    pub fn abort_all(&mut self) {
        let count = self.tasks.len();
        for handle in self.tasks.drain(..) {
            handle.abort();
        }
        if let Some(handle) = self.mood_reset.take() {
            handle.abort();
        }
        if count > 0 {
            debug!("Aborted {} pending timers", count);
        }
    }

    fn track(&mut self, handle: AbortHandle) {
        self.tasks.retain(|h| !h.is_finished());
        self.tasks.push(handle);
    }

    fn after(&mut self, delay: Duration, action: Action) {
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if tx.send(action).is_err() {
                warn!("Timer fired after the event loop closed");
            }
        });
        self.track(handle.abort_handle());
    }

    fn request_reply(&mut self, job: ReplyJob) {
        let tx = self.tx.clone();
        let source = self.replies.clone();
        let delay = self.timing.reply_delay;
        let timeout = self.timing.reply_timeout;

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let request = ReplyRequest {
                text: &job.text,
                mood: job.mood,
                profile: &job.profile,
            };
            let message_id = job.message_id;
            let action = match tokio::time::timeout(timeout, source.reply(request)).await {
                Ok(Ok(reply)) => Action::ReplyReady { message_id, reply },
                Ok(Err(error)) => Action::ReplyFailed { message_id, error },
                Err(_) => {
                    warn!(
                        "Reply source '{}' timed out for message #{}",
                        source.name(),
                        message_id
                    );
                    Action::ReplyFailed {
                        message_id,
                        error: ReplyError::Timeout(timeout),
                    }
                }
            };
            if tx.send(action).is_err() {
                warn!("Failed to deliver reply for message #{}: receiver dropped", message_id);
            }
        });
        self.track(handle.abort_handle());
    }

    fn mood_reset(&mut self, generation: u64) {
        if let Some(previous) = self.mood_reset.take() {
            previous.abort();
        }
        let tx = self.tx.clone();
        let delay = self.timing.mood_reset;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(Action::MoodExpired { generation });
        });
        self.mood_reset = Some(handle.abort_handle());
    }
}

impl Drop for TimerSet {
    fn drop(&mut self) {
        self.abort_all();
    }
}
