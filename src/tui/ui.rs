use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{AvatarPanel, MessageList, SuggestionBar, TitleBar};

/// Width of the avatar side panel when it is open.
const AVATAR_PANEL_WIDTH: u16 = 36;
const INPUT_HEIGHT: u16 = 3;

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    use Constraint::{Length, Min};

    let actions = app.transcript.latest_actions();
    let suggestions_height = if actions.is_empty() { 0 } else { 1 };

    let [title_area, main_area, suggestions_area, input_area] = Layout::vertical([
        Length(1),
        Min(0),
        Length(suggestions_height),
        Length(INPUT_HEIGHT),
    ])
    .areas(frame.area());

    let mut title_bar = TitleBar::new(
        app.twin_name.clone(),
        app.mood,
        app.status_message.clone(),
    );
    title_bar.busy = app.is_busy();
    title_bar.has_unseen_content = tui.message_list.has_unseen_content();
    title_bar.render(frame, title_area);

    let chat_area = match tui.avatar_panel.as_mut() {
        Some(panel_state) => {
            let [chat_area, panel_area] =
                Layout::horizontal([Min(0), Length(AVATAR_PANEL_WIDTH)]).areas(main_area);
            AvatarPanel::new(panel_state, &app.avatar, app.avatar_dirty).render(frame, panel_area);
            chat_area
        }
        None => main_area,
    };

    MessageList::new(
        &mut tui.message_list,
        app.transcript.messages(),
        &app.twin_name,
        spinner_frame,
    )
    .render(frame, chat_area);

    if !actions.is_empty() {
        SuggestionBar::new(actions).render(frame, suggestions_area);
    }

    tui.input_box.render(frame, input_area);
}
