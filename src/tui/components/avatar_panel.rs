//! # Avatar Panel
//!
//! Side panel for editing the avatar. Toggled with Ctrl+A.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `AvatarPanelState` lives in `TuiState` while the panel is open
//! - `AvatarPanel` is created each frame with borrowed state
//!
//! The panel never edits the avatar itself. It emits [`AvatarEvent`]s that
//! the event loop turns into reducer actions.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Padding, Paragraph, Wrap};

use crate::core::avatar::{AvatarConfig, AvatarField};
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

pub struct AvatarPanelState {
    pub selected: AvatarField,
    list_state: ListState,
}

impl Default for AvatarPanelState {
    fn default() -> Self {
        Self::new()
    }
}

impl AvatarPanelState {
    pub fn new() -> Self {
        Self {
            selected: AvatarField::ALL[0],
            list_state: ListState::default().with_selected(Some(0)),
        }
    }

    fn select(&mut self, field: AvatarField) {
        self.selected = field;
        let index = AvatarField::ALL.iter().position(|f| *f == field);
        self.list_state.select(index);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvatarEvent {
    Cycle { field: AvatarField, forward: bool },
    Randomize,
    Save,
    Close,
}

impl EventHandler for AvatarPanelState {
    type Event = AvatarEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::CursorUp | TuiEvent::BackTab => {
                self.select(self.selected.prev());
                None
            }
            TuiEvent::CursorDown | TuiEvent::Tab => {
                self.select(self.selected.next());
                None
            }
            TuiEvent::CursorLeft => Some(AvatarEvent::Cycle {
                field: self.selected,
                forward: false,
            }),
            TuiEvent::CursorRight | TuiEvent::Submit => Some(AvatarEvent::Cycle {
                field: self.selected,
                forward: true,
            }),
            TuiEvent::InputChar('r' | 'R') => Some(AvatarEvent::Randomize),
            TuiEvent::InputChar('s' | 'S') => Some(AvatarEvent::Save),
            TuiEvent::Escape => Some(AvatarEvent::Close),
            _ => None,
        }
    }
}

pub struct AvatarPanel<'a> {
    state: &'a mut AvatarPanelState,
    avatar: &'a AvatarConfig,
    dirty: bool,
}

impl<'a> AvatarPanel<'a> {
    pub fn new(state: &'a mut AvatarPanelState, avatar: &'a AvatarConfig, dirty: bool) -> Self {
        Self {
            state,
            avatar,
            dirty,
        }
    }
}

impl<'a> Component for AvatarPanel<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let title = if self.dirty { " Avatar * " } else { " Avatar " };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(title)
            .title_bottom(Line::from(" ←→ change  r random  s save ").centered())
            .padding(Padding::horizontal(1));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [list_area, summary_area] =
            Layout::vertical([Constraint::Length(AvatarField::ALL.len() as u16 + 1), Constraint::Min(0)])
                .areas(inner);

        let label_width = AvatarField::ALL
            .iter()
            .map(|f| f.label().len())
            .max()
            .unwrap_or(0);

        let items: Vec<ListItem> = AvatarField::ALL
            .iter()
            .map(|field| {
                let style = if *field == self.state.selected {
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD | Modifier::REVERSED)
                } else {
                    Style::default().fg(Color::Gray)
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{:<label_width$}  ", field.label()), style),
                    Span::styled(self.avatar.get(*field), style.fg(Color::Cyan)),
                ]))
            })
            .collect();
        frame.render_stateful_widget(List::new(items), list_area, &mut self.state.list_state);

        let summary = Paragraph::new(self.avatar.describe())
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: true });
        frame.render_widget(summary, summary_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn rendered(state: &mut AvatarPanelState, avatar: &AvatarConfig, dirty: bool) -> String {
        let backend = TestBackend::new(36, 16);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| AvatarPanel::new(state, avatar, dirty).render(f, f.area()))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_navigation_wraps() {
        let mut state = AvatarPanelState::new();
        assert_eq!(state.selected, AvatarField::SkinTone);
        assert_eq!(state.handle_event(&TuiEvent::CursorUp), None);
        assert_eq!(state.selected, AvatarField::Accessory);
        state.handle_event(&TuiEvent::Tab);
        assert_eq!(state.selected, AvatarField::SkinTone);
        state.handle_event(&TuiEvent::CursorDown);
        assert_eq!(state.selected, AvatarField::HairStyle);
    }

    #[test]
    fn test_keys_map_to_events() {
        let mut state = AvatarPanelState::new();
        state.handle_event(&TuiEvent::CursorDown);
        assert_eq!(
            state.handle_event(&TuiEvent::CursorLeft),
            Some(AvatarEvent::Cycle {
                field: AvatarField::HairStyle,
                forward: false
            })
        );
        assert_eq!(
            state.handle_event(&TuiEvent::CursorRight),
            Some(AvatarEvent::Cycle {
                field: AvatarField::HairStyle,
                forward: true
            })
        );
        assert_eq!(
            state.handle_event(&TuiEvent::InputChar('r')),
            Some(AvatarEvent::Randomize)
        );
        assert_eq!(
            state.handle_event(&TuiEvent::InputChar('s')),
            Some(AvatarEvent::Save)
        );
        assert_eq!(state.handle_event(&TuiEvent::Escape), Some(AvatarEvent::Close));
        assert_eq!(state.handle_event(&TuiEvent::InputChar('x')), None);
    }

    #[test]
    fn test_renders_every_field() {
        let mut state = AvatarPanelState::new();
        let avatar = AvatarConfig::default();
        let text = rendered(&mut state, &avatar, false);
        for field in AvatarField::ALL {
            assert!(text.contains(field.label()), "missing {}", field.label());
        }
        assert!(text.contains("oval"));
        assert!(!text.contains("Avatar *"));
    }

    #[test]
    fn test_dirty_marker() {
        let mut state = AvatarPanelState::new();
        let text = rendered(&mut state, &AvatarConfig::default(), true);
        assert!(text.contains("Avatar *"));
    }
}
