//! # TitleBar Component
//!
//! One-line bar at the top: the twin's name, its mood face and label, and the
//! current status text.
//!
//! ```text
//!  Echo (^_^) happy | typing... | ↓ New
//! ```
//!
//! Stateless: every field is a prop taken from `App` or `TuiState` each
//! frame. The mood segment is colored so a mood change is visible at a
//! glance.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::core::mood::Mood;
use crate::tui::component::Component;

pub struct TitleBar {
    pub twin_name: String,
    pub mood: Mood,
    pub status_message: String,
    /// The twin owes at least one reply.
    pub busy: bool,
    pub has_unseen_content: bool,
}

impl TitleBar {
    pub fn new(twin_name: String, mood: Mood, status_message: String) -> Self {
        Self {
            twin_name,
            mood,
            status_message,
            busy: false,
            has_unseen_content: false,
        }
    }
}

pub fn mood_color(mood: Mood) -> Color {
    match mood {
        Mood::Happy => Color::Yellow,
        Mood::Sad => Color::Blue,
        Mood::Angry => Color::Red,
        Mood::Neutral => Color::Gray,
        Mood::Excited => Color::Magenta,
        Mood::Relaxed => Color::Green,
        Mood::Anxious => Color::LightRed,
        Mood::Tired => Color::DarkGray,
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let name = Span::styled(
            format!(" {} ", self.twin_name),
            Style::default().add_modifier(Modifier::BOLD),
        );
        let mood = Span::styled(
            format!("{} {}", self.mood.face(), self.mood.label()),
            Style::default().fg(mood_color(self.mood)),
        );

        let mut spans = vec![name, mood];
        if self.busy {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(
                "typing...",
                Style::default().add_modifier(Modifier::ITALIC),
            ));
        }
        if !self.status_message.is_empty() {
            spans.push(Span::raw(format!(" | {}", self.status_message)));
        }
        if self.has_unseen_content {
            spans.push(Span::styled(" | ↓ New", Style::default().fg(Color::Cyan)));
        }

        frame.render_widget(Line::from(spans), area);
    }
}
