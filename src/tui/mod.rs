//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! turns keyboard events into `core::Action` values and carries out the
//! `Effect`s the reducer returns (timers, saves, quitting).
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! - **Busy** (timers pending): polls every ~80ms so timer actions and the
//!   thinking animation show up promptly.
//! - **Idle**: sleeps up to 500ms and only redraws on events.

mod component;
mod components;
mod event;
mod timers;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use rand::Rng;

use crate::api::{ApiClient, ApiReplies};
use crate::core::action::{Action, Effect, update};
use crate::core::avatar::AvatarConfig;
use crate::core::config::{ReplyBackend, ResolvedConfig};
use crate::core::replies::{ReplySource, ScriptedReplies};
use crate::core::state::App;
use crate::core::storage::Store;
use crate::tui::component::EventHandler;
use crate::tui::components::{
    AvatarEvent, AvatarPanelState, InputBox, InputEvent, MessageListState,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};
pub use crate::tui::timers::TimerSet;

const INPUT_PLACEHOLDER: &str = "Type a message, or /help";

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub message_list: MessageListState,
    pub input_box: InputBox,
    /// Avatar side panel (None = hidden). Takes keyboard focus while open.
    pub avatar_panel: Option<AvatarPanelState>,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            message_list: MessageListState::new(),
            input_box: InputBox::new(INPUT_PLACEHOLDER),
            avatar_panel: None,
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture, DisableBracketedPaste);
    }
}

/// Turns one terminal event into reducer actions. Presentation-only events
/// (scrolling, panel navigation, editing) are handled here and yield none.
fn route_event<R: Rng + ?Sized>(
    event: &TuiEvent,
    app: &App,
    tui: &mut TuiState,
    rng: &mut R,
) -> Vec<Action> {
    match event {
        TuiEvent::Resize => return Vec::new(),
        TuiEvent::ForceQuit => return vec![Action::Quit],
        TuiEvent::ToggleAvatarPanel => {
            tui.avatar_panel = match tui.avatar_panel.take() {
                Some(_) => None,
                None => Some(AvatarPanelState::new()),
            };
            return Vec::new();
        }
        TuiEvent::Suggestion(index) => {
            return app
                .transcript
                .latest_actions()
                .get(*index)
                .map(|action| vec![Action::TriggerSuggestion(action.effect)])
                .unwrap_or_default();
        }
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown
        | TuiEvent::ScrollToBottom => {
            tui.message_list.handle_event(event);
            return Vec::new();
        }
        _ => {}
    }

    if let Some(panel) = tui.avatar_panel.as_mut() {
        return match panel.handle_event(event) {
            Some(AvatarEvent::Cycle { field, forward }) => {
                vec![Action::CycleAvatar { field, forward }]
            }
            Some(AvatarEvent::Randomize) => vec![Action::RandomizeAvatar(AvatarConfig::random(rng))],
            Some(AvatarEvent::Save) => vec![Action::SaveAvatar],
            Some(AvatarEvent::Close) => {
                tui.avatar_panel = None;
                Vec::new()
            }
            None => Vec::new(),
        };
    }

    if matches!(event, TuiEvent::Escape) {
        tui.message_list.handle_event(&TuiEvent::ScrollToBottom);
        return Vec::new();
    }

    match tui.input_box.handle_event(event) {
        Some(InputEvent::Submit(text)) => {
            // Follow the conversation again when the user speaks
            tui.message_list.handle_event(&TuiEvent::ScrollToBottom);
            vec![Action::Submit(text)]
        }
        Some(InputEvent::ContentChanged) | None => Vec::new(),
    }
}

/// Everything the event loop needs to carry out effects.
struct Runtime {
    timers: TimerSet,
    store: Store,
}

impl Runtime {
    /// Applies `action` and every action its effects lead to.
    /// Returns true when the session should end.
    fn dispatch(&mut self, app: &mut App, tui: &mut TuiState, action: Action) -> bool {
        let mut queue = vec![action];
        let mut quit = false;
        while let Some(action) = queue.pop() {
            debug!("Dispatching {:?}", action);
            for effect in update(app, action) {
                if self.timers.schedule(&effect) {
                    continue;
                }
                match effect {
                    Effect::SaveCheckIns => {
                        if let Err(e) = self.store.save_checkins(&app.checkins) {
                            warn!("Failed to save check-ins: {}", e);
                            app.status_message = format!("Could not save check-ins: {}", e);
                        }
                    }
                    Effect::SaveAvatar(avatar) => {
                        match avatar.save(|a| self.store.save_avatar(a)) {
                            Ok(()) => queue.push(Action::AvatarSaved),
                            Err(e) => {
                                warn!("Failed to save avatar: {}", e);
                                app.status_message = format!("Could not save avatar: {}", e);
                            }
                        }
                    }
                    Effect::OpenAvatarPanel => {
                        tui.avatar_panel.get_or_insert_with(AvatarPanelState::new);
                    }
                    Effect::Quit => quit = true,
                    Effect::ScheduleSent(_)
                    | Effect::ScheduleThinking(_)
                    | Effect::RequestReply(_)
                    | Effect::ScheduleMoodReset { .. } => {}
                }
            }
        }
        quit
    }
}

/// Restores check-ins and the saved avatar. Unreadable files are logged and
/// the session starts fresh.
fn load_persisted(app: &mut App, store: &Store) {
    match store.load_checkins() {
        Ok(checkins) => app.checkins = checkins,
        Err(e) => warn!("Could not load check-ins: {}", e),
    }
    match store.load_avatar() {
        Ok(Some(avatar)) => app.avatar = avatar,
        Ok(None) => {}
        Err(e) => warn!("Could not load avatar: {}", e),
    }
}

/// The reply source picked by `[api] replies`. The backend source reuses
/// the saved login so its requests carry the access token.
fn reply_source(config: &ResolvedConfig, store: &Store) -> Arc<dyn ReplySource> {
    match config.replies {
        ReplyBackend::Scripted => Arc::new(ScriptedReplies::default()),
        ReplyBackend::Backend => {
            let client = ApiClient::new(config.api_base_url.clone())
                .with_session_file(store.auth_path());
            Arc::new(ApiReplies::new(client))
        }
    }
}

pub fn run(config: ResolvedConfig, store: Store) -> std::io::Result<()> {
    let replies = reply_source(&config, &store);
    info!(
        "Starting session with '{}' (replies: {}, data: {})",
        config.twin_name,
        replies.name(),
        store.dir().display()
    );

    let mut app = App::from_config(replies.clone(), &config);
    load_persisted(&mut app, &store);
    let mut tui = TuiState::new();

    let (tx, rx) = mpsc::channel();
    let mut runtime = Runtime {
        timers: TimerSet::new(tx, config.timing, replies),
        store,
    };
    let mut rng = rand::thread_rng();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    let start_time = Instant::now();
    let mut needs_redraw = true;

    'session: loop {
        let busy = runtime.timers.pending() > 0;
        if app.is_thinking() {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 4.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        let timeout = if busy {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            for action in route_event(&event, &app, &mut tui, &mut rng) {
                if runtime.dispatch(&mut app, &mut tui, action) {
                    break 'session;
                }
            }
        }

        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            if runtime.dispatch(&mut app, &mut tui, action) {
                break 'session;
            }
        }
    }

    runtime.timers.abort_all();
    ratatui::restore();
    info!("Session ended");
    Ok(())
}
