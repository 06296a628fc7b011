//! # Actions and the Reducer
//!
//! Everything that can happen to a chat session is an [`Action`]. The
//! reducer [`update`] applies one action to [`App`] and returns the
//! [`Effect`]s the adapter must carry out (timers, saves, quitting).
//! The reducer itself never sleeps or touches the disk.
//!
//! One exchange, with default timing:
//!
//! ```text
//! Submit ──► user msg (Sending)   effects: ScheduleSent, ScheduleThinking
//!   300ms  MessageSent      ──► Sent
//!   600ms  ThinkingStarted  ──► placeholder + mood   effect: RequestReply
//!  1800ms  ReplyReady       ──► reply, Read          effect: ScheduleMoodReset
//!  9800ms  MoodExpired      ──► Neutral (if generation still current)
//! ```
//!
//! Submissions made while an exchange is pending are queued and started
//! in order once the current reply lands.

use chrono::Local;
use log::{debug, info, warn};

use crate::core::avatar::{AvatarConfig, AvatarField};
use crate::core::checkin::CheckIn;
use crate::core::command::{self, Command, CommandError, HELP_TEXT};
use crate::core::message::{DeliveryStatus, MessageId, SuggestionEffect};
use crate::core::mood::Mood;
use crate::core::replies::{Reply, ReplyError};
use crate::core::simulation;
use crate::core::state::{App, Exchange};

const GOAL_PROMPT: &str = "Let's pick one small goal for this week. Specific beats ambitious: \
    \"walk for 20 minutes after lunch\" is easier to keep than \"exercise more\". \
    Tell me yours and I'll ask how it went.";

const JOURNAL_PROMPT: &str = "Journal notes ride along with your check-ins. Try \
    /checkin <mood> [1-10] followed by a few words about today.";

const NO_SCENARIO: &str = "Ask me a 'what if' question first, then I can run a simulation on it.";

#[derive(Debug, Clone)]
pub enum Action {
    /// Text typed into the input box. Slash commands are handled here too.
    Submit(String),
    MessageSent(MessageId),
    ThinkingStarted(MessageId),
    ReplyReady {
        message_id: MessageId,
        reply: Reply,
    },
    ReplyFailed {
        message_id: MessageId,
        error: ReplyError,
    },
    MoodExpired {
        generation: u64,
    },
    TriggerSuggestion(SuggestionEffect),
    CycleAvatar {
        field: AvatarField,
        forward: bool,
    },
    SetAvatar {
        field: AvatarField,
        value: String,
    },
    /// The adapter owns the RNG; the reducer just takes the result.
    RandomizeAvatar(AvatarConfig),
    SaveAvatar,
    AvatarSaved,
    Quit,
}

/// Request for the adapter to fetch one reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyJob {
    pub message_id: MessageId,
    pub text: String,
    pub mood: Mood,
    pub profile: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Send `MessageSent` after the sent delay.
    ScheduleSent(MessageId),
    /// Send `ThinkingStarted` after the thinking delay.
    ScheduleThinking(MessageId),
    /// Wait the reply delay, ask the reply source, send `ReplyReady`/`ReplyFailed`.
    RequestReply(ReplyJob),
    /// Send `MoodExpired` after the mood reset delay, replacing any earlier one.
    ScheduleMoodReset { generation: u64 },
    SaveCheckIns,
    SaveAvatar(AvatarConfig),
    OpenAvatarPanel,
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Vec<Effect> {
    match action {
        Action::Submit(text) => submit(app, &text),
        Action::MessageSent(id) => {
            app.transcript.advance_status(id, DeliveryStatus::Sent);
            Vec::new()
        }
        Action::ThinkingStarted(id) => start_thinking(app, id),
        Action::ReplyReady { message_id, reply } => finish_exchange(app, message_id, Ok(reply)),
        Action::ReplyFailed { message_id, error } => {
            finish_exchange(app, message_id, Err(error))
        }
        Action::MoodExpired { generation } => {
            if generation == app.mood_generation && app.mood != Mood::Neutral {
                debug!("Mood {} expired (generation {})", app.mood, generation);
                app.mood = Mood::Neutral;
            }
            Vec::new()
        }
        Action::TriggerSuggestion(effect) => {
            trigger_suggestion(app, effect);
            Vec::new()
        }
        Action::CycleAvatar { field, forward } => {
            app.avatar.cycle(field, forward);
            app.avatar_dirty = true;
            Vec::new()
        }
        Action::SetAvatar { field, value } => {
            set_avatar(app, field, &value);
            Vec::new()
        }
        Action::RandomizeAvatar(avatar) => {
            app.avatar = avatar;
            app.avatar_dirty = true;
            app.status_message = String::from("Avatar randomized (s to save)");
            Vec::new()
        }
        Action::SaveAvatar => vec![Effect::SaveAvatar(app.avatar)],
        Action::AvatarSaved => {
            app.avatar_dirty = false;
            app.status_message = String::from("Avatar saved");
            Vec::new()
        }
        Action::Quit => {
            info!("Quit requested");
            vec![Effect::Quit]
        }
    }
}

fn submit(app: &mut App, text: &str) -> Vec<Effect> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }
    if let Some(parsed) = command::parse(text) {
        return run_command(app, parsed);
    }

    let message_id = app.transcript.push_user(text.to_string());
    let exchange = Exchange {
        message_id,
        text: text.to_string(),
    };
    let mut effects = vec![Effect::ScheduleSent(message_id)];

    if app.pending.is_none() {
        debug!("Starting exchange for message #{}", message_id);
        app.pending = Some(exchange);
        effects.push(Effect::ScheduleThinking(message_id));
    } else {
        debug!("Queued message #{} behind the pending exchange", message_id);
        app.queue.push_back(exchange);
    }
    effects
}

fn start_thinking(app: &mut App, id: MessageId) -> Vec<Effect> {
    let Some(exchange) = app.pending.clone().filter(|e| e.message_id == id) else {
        debug!("Ignoring stale thinking timer for message #{}", id);
        return Vec::new();
    };
    if app.transcript.begin_thinking().is_none() {
        warn!("Thinking placeholder already present for message #{}", id);
        return Vec::new();
    }
    // Can't think about a message that never left
    app.transcript.advance_status(id, DeliveryStatus::Sent);

    if let Some(mood) = app.classifier.detect(&exchange.text) {
        app.mood = mood;
        app.mood_generation += 1;
        debug!("Mood → {} (generation {})", mood, app.mood_generation);
    }

    vec![Effect::RequestReply(ReplyJob {
        message_id: id,
        text: exchange.text,
        mood: app.mood,
        profile: app.checkins.profile(),
    })]
}

fn finish_exchange(
    app: &mut App,
    message_id: MessageId,
    result: Result<Reply, ReplyError>,
) -> Vec<Effect> {
    let Some(exchange) = app.pending.take_if(|e| e.message_id == message_id) else {
        debug!("Ignoring reply for message #{} (not pending)", message_id);
        return Vec::new();
    };
    app.transcript.end_thinking();

    match result {
        Ok(reply) => {
            if reply
                .actions
                .iter()
                .any(|a| a.effect == SuggestionEffect::RunSimulation)
            {
                app.last_scenario = Some(exchange.text);
            }
            app.transcript.push_twin(reply.text, reply.actions);
            app.transcript.acknowledge(message_id);
        }
        Err(error) => {
            warn!("Reply for message #{} failed: {}", message_id, error);
            app.transcript.push_twin(
                format!("Sorry, I couldn't come up with a reply ({error}). Try asking again."),
                Vec::new(),
            );
            app.transcript.advance_status(message_id, DeliveryStatus::Delivered);
        }
    }

    let mut effects = Vec::new();
    if app.mood != Mood::Neutral {
        effects.push(Effect::ScheduleMoodReset {
            generation: app.mood_generation,
        });
    }
    if let Some(next) = app.queue.pop_front() {
        debug!("Starting queued exchange for message #{}", next.message_id);
        effects.push(Effect::ScheduleThinking(next.message_id));
        app.pending = Some(next);
    }
    effects
}

fn trigger_suggestion(app: &mut App, effect: SuggestionEffect) {
    info!("Suggestion triggered: {:?}", effect);
    let text = match effect {
        SuggestionEffect::RunSimulation => match &app.last_scenario {
            Some(scenario) => simulation::simulate(scenario, &app.checkins.stats()).render(),
            None => NO_SCENARIO.to_string(),
        },
        SuggestionEffect::ShowProgress => app.checkins.summary(),
        SuggestionEffect::SetGoal => GOAL_PROMPT.to_string(),
        SuggestionEffect::OpenJournal => JOURNAL_PROMPT.to_string(),
    };
    app.transcript.push_twin(text, Vec::new());
}

fn set_avatar(app: &mut App, field: AvatarField, value: &str) {
    match app.avatar.set(field, value) {
        Ok(()) => {
            app.avatar_dirty = true;
            app.status_message = format!("{}: {}", field.label(), app.avatar.get(field));
        }
        Err(e) => app.status_message = e.to_string(),
    }
}

fn run_command(app: &mut App, parsed: Result<Command, CommandError>) -> Vec<Effect> {
    let command = match parsed {
        Ok(command) => command,
        Err(e) => {
            app.status_message = e.to_string();
            return Vec::new();
        }
    };
    debug!("Command: {:?}", command);

    match command {
        Command::CheckIn {
            mood,
            intensity,
            note,
        } => {
            let today = Local::now().date_naive();
            let replacing = app.checkins.has_checked_in(today);
            let entry = CheckIn {
                mood,
                intensity,
                note,
                date: today,
            };
            if let Err(e) = app.checkins.record(entry) {
                app.status_message = e.to_string();
                return Vec::new();
            }
            let verb = if replacing { "Updated today's check-in" } else { "Checked in" };
            app.transcript.push_twin(
                format!("{verb}: feeling {mood} at {intensity}/10. Thanks for telling me."),
                Vec::new(),
            );
            app.status_message = format!("{verb}: {mood}");
            vec![Effect::SaveCheckIns]
        }
        Command::Stats => {
            app.transcript.push_twin(app.checkins.summary(), Vec::new());
            Vec::new()
        }
        Command::Avatar(None) => vec![Effect::OpenAvatarPanel],
        Command::Avatar(Some((field, value))) => {
            set_avatar(app, field, &value);
            Vec::new()
        }
        Command::Clear => {
            if app.is_busy() {
                app.status_message = format!("Wait for {} to reply before clearing", app.twin_name);
                return Vec::new();
            }
            app.transcript.clear();
            if !app.greeting.trim().is_empty() {
                app.transcript.push_twin(app.greeting.clone(), Vec::new());
            }
            app.last_scenario = None;
            app.status_message = String::from("Conversation cleared");
            Vec::new()
        }
        Command::Help => {
            app.transcript.push_twin(HELP_TEXT.to_string(), Vec::new());
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::{Sender, SuggestedAction};
    use crate::test_support::test_app;

    fn reply(text: &str) -> Reply {
        Reply {
            text: text.to_string(),
            actions: Vec::new(),
        }
    }

    fn last_text(app: &App) -> &str {
        &app.transcript.messages().last().unwrap().text
    }

    /// Submits `text` and returns the new message id.
    fn submit_text(app: &mut App, text: &str) -> MessageId {
        update(app, Action::Submit(text.to_string()));
        app.transcript.messages().last().unwrap().id
    }

    #[test]
    fn test_blank_submit_is_noop() {
        let mut app = test_app();
        let before = app.transcript.len();
        for text in ["", "   ", "\n\t"] {
            assert!(update(&mut app, Action::Submit(text.into())).is_empty());
        }
        assert_eq!(app.transcript.len(), before);
        assert!(!app.is_busy());
    }

    #[test]
    fn test_submit_starts_exchange() {
        let mut app = test_app();
        let effects = update(&mut app, Action::Submit("  hello  ".into()));
        let id = app.transcript.messages().last().unwrap().id;

        assert_eq!(effects, vec![Effect::ScheduleSent(id), Effect::ScheduleThinking(id)]);
        let msg = app.transcript.get(id).unwrap();
        assert_eq!(msg.text, "hello");
        assert_eq!(msg.sender, Sender::User);
        assert_eq!(msg.status, Some(DeliveryStatus::Sending));
        assert_eq!(app.pending.as_ref().map(|e| e.message_id), Some(id));
    }

    #[test]
    fn test_submit_while_pending_is_queued() {
        let mut app = test_app();
        let first = submit_text(&mut app, "hello");
        let effects = update(&mut app, Action::Submit("second".into()));
        let second = app.transcript.messages().last().unwrap().id;

        assert_eq!(effects, vec![Effect::ScheduleSent(second)]);
        assert_eq!(app.pending.as_ref().map(|e| e.message_id), Some(first));
        assert_eq!(app.queue.len(), 1);
        assert_eq!(app.transcript.count_by(Sender::User), 2);
    }

    #[test]
    fn test_message_sent_advances_status() {
        let mut app = test_app();
        let id = submit_text(&mut app, "hello");
        update(&mut app, Action::MessageSent(id));
        assert_eq!(app.transcript.get(id).unwrap().status, Some(DeliveryStatus::Sent));
    }

    #[test]
    fn test_thinking_inserts_placeholder_and_classifies() {
        let mut app = test_app();
        let id = submit_text(&mut app, "I'm so happy today");
        let effects = update(&mut app, Action::ThinkingStarted(id));

        assert!(app.is_thinking());
        assert_eq!(app.mood, Mood::Happy);
        assert_eq!(app.mood_generation, 1);
        assert_eq!(
            effects,
            vec![Effect::RequestReply(ReplyJob {
                message_id: id,
                text: "I'm so happy today".into(),
                mood: Mood::Happy,
                profile: app.checkins.profile(),
            })]
        );
    }

    #[test]
    fn test_no_keyword_leaves_mood_alone() {
        let mut app = test_app();
        app.mood = Mood::Relaxed;
        let id = submit_text(&mut app, "the sky is blue");
        update(&mut app, Action::ThinkingStarted(id));
        assert_eq!(app.mood, Mood::Relaxed);
        assert_eq!(app.mood_generation, 0);
    }

    #[test]
    fn test_stale_thinking_timer_is_ignored() {
        let mut app = test_app();
        submit_text(&mut app, "hello");
        assert!(update(&mut app, Action::ThinkingStarted(999)).is_empty());
        assert!(!app.is_thinking());
    }

    #[test]
    fn test_reply_replaces_placeholder() {
        let mut app = test_app();
        let id = submit_text(&mut app, "hello");
        update(&mut app, Action::MessageSent(id));
        update(&mut app, Action::ThinkingStarted(id));
        let effects = update(
            &mut app,
            Action::ReplyReady {
                message_id: id,
                reply: reply("Hi!"),
            },
        );

        assert!(effects.is_empty());
        assert!(!app.is_thinking());
        assert!(!app.is_busy());
        assert_eq!(last_text(&app), "Hi!");
        assert_eq!(app.transcript.get(id).unwrap().status, Some(DeliveryStatus::Read));
        assert_eq!(app.transcript.count_by(Sender::Twin), 2);
    }

    #[test]
    fn test_reply_schedules_mood_reset_and_next_exchange() {
        let mut app = test_app();
        let first = submit_text(&mut app, "so excited, can't wait");
        let second = submit_text(&mut app, "also this");
        update(&mut app, Action::ThinkingStarted(first));

        let effects = update(
            &mut app,
            Action::ReplyReady {
                message_id: first,
                reply: reply("Nice"),
            },
        );
        assert_eq!(
            effects,
            vec![
                Effect::ScheduleMoodReset { generation: 1 },
                Effect::ScheduleThinking(second),
            ]
        );
        assert_eq!(app.pending.as_ref().map(|e| e.message_id), Some(second));
        assert!(app.queue.is_empty());
    }

    #[test]
    fn test_reply_for_unknown_message_is_ignored() {
        let mut app = test_app();
        let id = submit_text(&mut app, "hello");
        update(&mut app, Action::ThinkingStarted(id));
        let effects = update(
            &mut app,
            Action::ReplyReady {
                message_id: id + 100,
                reply: reply("??"),
            },
        );
        assert!(effects.is_empty());
        assert!(app.is_thinking());
    }

    #[test]
    fn test_reply_failure_posts_message() {
        let mut app = test_app();
        let id = submit_text(&mut app, "hello");
        update(&mut app, Action::ThinkingStarted(id));
        update(
            &mut app,
            Action::ReplyFailed {
                message_id: id,
                error: ReplyError::Backend("offline".into()),
            },
        );
        assert!(!app.is_thinking());
        assert!(last_text(&app).contains("offline"));
        assert_eq!(
            app.transcript.get(id).unwrap().status,
            Some(DeliveryStatus::Delivered)
        );
    }

    #[test]
    fn test_mood_reset_respects_generation() {
        let mut app = test_app();
        app.mood = Mood::Sad;
        app.mood_generation = 3;

        update(&mut app, Action::MoodExpired { generation: 2 });
        assert_eq!(app.mood, Mood::Sad);

        update(&mut app, Action::MoodExpired { generation: 3 });
        assert_eq!(app.mood, Mood::Neutral);
    }

    #[test]
    fn test_simulation_reply_remembers_scenario() {
        let mut app = test_app();
        let id = submit_text(&mut app, "what if I change jobs");
        update(&mut app, Action::ThinkingStarted(id));
        update(
            &mut app,
            Action::ReplyReady {
                message_id: id,
                reply: Reply {
                    text: "Want a simulation?".into(),
                    actions: vec![SuggestedAction::new(
                        "Run Simulation",
                        SuggestionEffect::RunSimulation,
                    )],
                },
            },
        );
        assert_eq!(app.last_scenario.as_deref(), Some("what if I change jobs"));

        update(&mut app, Action::TriggerSuggestion(SuggestionEffect::RunSimulation));
        assert!(last_text(&app).starts_with("Simulation (career): what if I change jobs"));
    }

    #[test]
    fn test_simulation_without_scenario() {
        let mut app = test_app();
        update(&mut app, Action::TriggerSuggestion(SuggestionEffect::RunSimulation));
        assert_eq!(last_text(&app), NO_SCENARIO);
    }

    #[test]
    fn test_guidance_suggestions() {
        let mut app = test_app();
        update(&mut app, Action::TriggerSuggestion(SuggestionEffect::SetGoal));
        assert_eq!(last_text(&app), GOAL_PROMPT);
        update(&mut app, Action::TriggerSuggestion(SuggestionEffect::OpenJournal));
        assert_eq!(last_text(&app), JOURNAL_PROMPT);
        update(&mut app, Action::TriggerSuggestion(SuggestionEffect::ShowProgress));
        assert!(last_text(&app).starts_with("No check-ins yet"));
    }

    #[test]
    fn test_checkin_command_records_and_saves() {
        let mut app = test_app();
        let effects = update(&mut app, Action::Submit("/checkin happy 8 good run".into()));
        assert_eq!(effects, vec![Effect::SaveCheckIns]);
        assert_eq!(app.checkins.entries.len(), 1);
        assert_eq!(app.checkins.entries[0].note.as_deref(), Some("good run"));
        assert!(last_text(&app).starts_with("Checked in: feeling happy at 8/10"));
        // Commands never become user messages
        assert_eq!(app.transcript.count_by(Sender::User), 0);

        update(&mut app, Action::Submit("/checkin sad 3".into()));
        assert_eq!(app.checkins.entries.len(), 1);
        assert!(last_text(&app).starts_with("Updated today's check-in"));
    }

    #[test]
    fn test_checkin_bad_intensity_sets_status() {
        let mut app = test_app();
        let effects = update(&mut app, Action::Submit("/checkin happy 11".into()));
        assert!(effects.is_empty());
        assert!(app.checkins.entries.is_empty());
        assert!(app.status_message.contains("out of range"));
    }

    #[test]
    fn test_unknown_command_sets_status() {
        let mut app = test_app();
        let before = app.transcript.len();
        update(&mut app, Action::Submit("/dance".into()));
        assert!(app.status_message.contains("unknown command"));
        assert_eq!(app.transcript.len(), before);
    }

    #[test]
    fn test_stats_and_help_commands() {
        let mut app = test_app();
        update(&mut app, Action::Submit("/stats".into()));
        assert!(last_text(&app).starts_with("No check-ins yet"));
        update(&mut app, Action::Submit("/help".into()));
        assert_eq!(last_text(&app), HELP_TEXT);
    }

    #[test]
    fn test_clear_refused_while_busy() {
        let mut app = test_app();
        submit_text(&mut app, "hello");
        update(&mut app, Action::Submit("/clear".into()));
        assert!(app.status_message.starts_with("Wait for Echo"));
        assert_eq!(app.transcript.count_by(Sender::User), 1);
    }

    #[test]
    fn test_clear_reseeds_greeting_and_keeps_ids() {
        let mut app = test_app();
        let id = submit_text(&mut app, "hello");
        update(&mut app, Action::ThinkingStarted(id));
        update(
            &mut app,
            Action::ReplyReady {
                message_id: id,
                reply: reply("hi"),
            },
        );

        update(&mut app, Action::Submit("/clear".into()));
        assert_eq!(app.transcript.len(), 1);
        assert_eq!(last_text(&app), app.greeting);
        assert!(app.transcript.messages()[0].id > id);
    }

    #[test]
    fn test_avatar_commands() {
        let mut app = test_app();
        assert_eq!(
            update(&mut app, Action::Submit("/avatar".into())),
            vec![Effect::OpenAvatarPanel]
        );

        update(&mut app, Action::Submit("/avatar hair_color red".into()));
        assert_eq!(app.avatar.get(AvatarField::HairColor), "red");
        assert!(app.avatar_dirty);
        assert_eq!(app.status_message, "Hair color: red");

        update(&mut app, Action::Submit("/avatar outfit pajamas".into()));
        assert!(app.status_message.contains("not a valid outfit"));
    }

    #[test]
    fn test_avatar_edit_and_save_cycle() {
        let mut app = test_app();
        update(
            &mut app,
            Action::CycleAvatar {
                field: AvatarField::Accessory,
                forward: true,
            },
        );
        assert_eq!(app.avatar.get(AvatarField::Accessory), "glasses");
        assert!(app.avatar_dirty);

        let effects = update(&mut app, Action::SaveAvatar);
        assert_eq!(effects, vec![Effect::SaveAvatar(app.avatar)]);
        update(&mut app, Action::AvatarSaved);
        assert!(!app.avatar_dirty);
    }

    #[test]
    fn test_randomize_replaces_avatar() {
        let mut app = test_app();
        let mut avatar = AvatarConfig::default();
        avatar.set(AvatarField::Outfit, "sporty").unwrap();
        update(&mut app, Action::RandomizeAvatar(avatar));
        assert_eq!(app.avatar, avatar);
        assert!(app.avatar_dirty);
    }

    #[test]
    fn test_quit_returns_quit_effect() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Quit), vec![Effect::Quit]);
    }
}
