//! # MessageList Component
//!
//! Scrollable view of the transcript.
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and the transcript (props).
//! Since `Component::render` takes `&mut self`, the height cache and scroll
//! state are updated during the render pass, like Ratatui's `StatefulWidget`.

use std::collections::HashMap;

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::message::{Message as ChatMessage, MessageId};
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::Message;
use crate::tui::event::TuiEvent;

/// Layout and scroll state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    pub scroll_state: ScrollViewState,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
    /// Total height of all messages from the last render
    pub content_height: u16,
    heights: HeightCache,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            stick_to_bottom: true,
            viewport_height: 0,
            content_height: 0,
            heights: HeightCache::default(),
        }
    }

    fn max_offset(&self) -> u16 {
        self.content_height.saturating_sub(self.viewport_height)
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Re-engage auto-scroll once the user has scrolled back to the bottom.
    pub fn repin_if_at_bottom(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// True when the user has scrolled up and content sits below the viewport.
    pub fn has_unseen_content(&self) -> bool {
        !self.stick_to_bottom && self.scroll_state.offset().y < self.max_offset()
    }
}

impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollToBottom => {
                self.stick_to_bottom = true;
                let max_y = self.max_offset();
                self.scroll_state.set_offset(Position { x: 0, y: max_y });
            }
            _ => {}
        }
        None
    }
}

/// Message heights keyed by id. Message text never changes after it is
/// posted, so an entry stays valid until the width changes.
#[derive(Default)]
struct HeightCache {
    width: u16,
    by_id: HashMap<MessageId, u16>,
}

impl HeightCache {
    fn height(&mut self, message: &ChatMessage, width: u16) -> u16 {
        if self.width != width {
            self.width = width;
            self.by_id.clear();
        }
        *self
            .by_id
            .entry(message.id)
            .or_insert_with(|| Message::calculate_height(message, width))
    }

    /// Drops entries for messages no longer in the transcript.
    fn retain(&mut self, messages: &[ChatMessage]) {
        if self.by_id.len() > messages.len() {
            self.by_id
                .retain(|id, _| messages.iter().any(|m| m.id == *id));
        }
    }
}

/// Sum of message heights, saturating at `u16::MAX` on very long sessions.
fn total_height(heights: &[u16]) -> u16 {
    heights.iter().fold(0u16, |sum, &h| sum.saturating_add(h))
}

/// Scrollable conversation view component.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub messages: &'a [ChatMessage],
    pub twin_name: &'a str,
    pub spinner_frame: usize,
}

impl<'a> MessageList<'a> {
    pub fn new(
        state: &'a mut MessageListState,
        messages: &'a [ChatMessage],
        twin_name: &'a str,
        spinner_frame: usize,
    ) -> Self {
        Self {
            state,
            messages,
            twin_name,
            spinner_frame,
        }
    }
}

impl<'a> Component for MessageList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // scrollbar column

        self.state.heights.retain(self.messages);
        let heights: Vec<u16> = self
            .messages
            .iter()
            .map(|m| self.state.heights.height(m, content_width))
            .collect();
        let total_height = total_height(&heights);

        self.state.content_height = total_height;
        self.state.viewport_height = area.height;
        if !self.state.stick_to_bottom {
            self.state.clamp_scroll();
        }

        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut y_offset: u16 = 0;
        for (message, height) in self.messages.iter().zip(heights) {
            let rect = Rect::new(0, y_offset, content_width, height);
            scroll_view.render_widget(
                Message::new(message, self.twin_name, self.spinner_frame),
                rect,
            );
            y_offset = y_offset.saturating_add(height);
        }

        if self.state.stick_to_bottom {
            let max_y = self.state.max_offset();
            self.state.scroll_state.set_offset(Position { x: 0, y: max_y });
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}
