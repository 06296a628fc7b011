//! # InputBox Component
//!
//! Single-line text entry at the bottom of the screen.
//!
//! ## Responsibilities
//!
//! - Capture text input (typed characters and bracketed paste)
//! - Handle editing: backspace, delete, cursor movement
//! - Handle submission (Enter)
//! - Recall earlier submissions with Up/Down
//! - Scroll horizontally so the cursor always stays visible
//!
//! The buffer, cursor and history are internal state. The placeholder hint
//! shown while the buffer is empty is a prop.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Paragraph};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Border columns on each side of the text.
const BORDER_OFFSET: u16 = 1;

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// User submitted the text (Enter pressed)
    Submit(String),
    /// Buffer or cursor changed
    ContentChanged,
}

pub struct InputBox {
    pub buffer: String,
    /// Shown dimmed while the buffer is empty (Prop)
    pub placeholder: String,
    /// Cursor position as byte offset in buffer (0..=buffer.len())
    cursor: usize,
    /// First visible character when the text is wider than the box
    scroll: usize,
    history: Vec<String>,
    /// Index into `history` while recalling; `None` when editing fresh text
    history_index: Option<usize>,
}

impl InputBox {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            buffer: String::new(),
            placeholder: placeholder.into(),
            cursor: 0,
            scroll: 0,
            history: Vec::new(),
            history_index: None,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn set_buffer(&mut self, text: String) {
        self.cursor = text.len();
        self.buffer = text;
    }

    /// Cursor column counted in characters.
    fn cursor_column(&self) -> usize {
        self.buffer[..self.cursor].chars().count()
    }

    /// Keeps the cursor column inside the visible window of `width` chars.
    fn update_scroll(&mut self, width: usize) {
        if width == 0 {
            self.scroll = 0;
            return;
        }
        let column = self.cursor_column();
        if column < self.scroll {
            self.scroll = column;
        } else if column >= self.scroll + width {
            self.scroll = column + 1 - width;
        }
    }

    fn visible_text(&self, width: usize) -> String {
        self.buffer.chars().skip(self.scroll).take(width).collect()
    }

    fn recall(&mut self, older: bool) -> bool {
        if self.history.is_empty() {
            return false;
        }
        let next = match (self.history_index, older) {
            (None, true) => Some(self.history.len() - 1),
            (None, false) => return false,
            (Some(0), true) => return false,
            (Some(i), true) => Some(i - 1),
            (Some(i), false) if i + 1 < self.history.len() => Some(i + 1),
            (Some(_), false) => None,
        };
        self.history_index = next;
        let text = next.map(|i| self.history[i].clone()).unwrap_or_default();
        self.set_buffer(text);
        true
    }
}

fn prev_char_boundary(s: &str, pos: usize) -> usize {
    s[..pos].char_indices().next_back().map_or(0, |(i, _)| i)
}

fn next_char_boundary(s: &str, pos: usize) -> usize {
    s[pos..].chars().next().map_or(pos, |c| pos + c.len_utf8())
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let width = area.width.saturating_sub(BORDER_OFFSET * 2) as usize;
        self.update_scroll(width);

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title(" Message ");

        let paragraph = if self.buffer.is_empty() {
            Paragraph::new(self.placeholder.as_str()).style(
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )
        } else {
            Paragraph::new(self.visible_text(width)).style(Style::default().fg(Color::Green))
        };
        frame.render_widget(paragraph.block(block), area);

        let column = (self.cursor_column() - self.scroll) as u16;
        frame.set_cursor_position((area.x + BORDER_OFFSET + column, area.y + BORDER_OFFSET));
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                self.buffer.insert(self.cursor, *c);
                self.cursor += c.len_utf8();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                // Single-line box: newlines become spaces
                let text = text.replace(['\r', '\n'], " ");
                self.buffer.insert_str(self.cursor, &text);
                self.cursor += text.len();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Backspace => (self.cursor > 0).then(|| {
                let prev = prev_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(prev..self.cursor);
                self.cursor = prev;
                InputEvent::ContentChanged
            }),
            TuiEvent::Delete => (self.cursor < self.buffer.len()).then(|| {
                let next = next_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(self.cursor..next);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorLeft => (self.cursor > 0).then(|| {
                self.cursor = prev_char_boundary(&self.buffer, self.cursor);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorRight => (self.cursor < self.buffer.len()).then(|| {
                self.cursor = next_char_boundary(&self.buffer, self.cursor);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorHome => (self.cursor != 0).then(|| {
                self.cursor = 0;
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorEnd => (self.cursor != self.buffer.len()).then(|| {
                self.cursor = self.buffer.len();
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorUp => self.recall(true).then_some(InputEvent::ContentChanged),
            TuiEvent::CursorDown => self.recall(false).then_some(InputEvent::ContentChanged),
            TuiEvent::Submit => {
                if self.buffer.trim().is_empty() {
                    return None;
                }
                let text = std::mem::take(&mut self.buffer);
                self.cursor = 0;
                self.scroll = 0;
                self.history_index = None;
                if self.history.last() != Some(&text) {
                    self.history.push(text.clone());
                }
                Some(InputEvent::Submit(text))
            }
            _ => None,
        }
    }
}
