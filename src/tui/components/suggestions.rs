//! One-line bar listing the latest reply's suggested actions with the
//! function key that triggers each.
//!
//! ```text
//!  F1 Run Simulation   F2 View Progress
//! ```

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::core::message::SuggestedAction;
use crate::tui::component::Component;

/// Only F1..F4 are bound.
pub const MAX_SUGGESTIONS: usize = 4;

pub struct SuggestionBar<'a> {
    pub actions: &'a [SuggestedAction],
}

impl<'a> SuggestionBar<'a> {
    pub fn new(actions: &'a [SuggestedAction]) -> Self {
        Self { actions }
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl<'a> Component for SuggestionBar<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let key_style = Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let label_style = Style::default().fg(Color::Cyan);

        let mut spans = vec![Span::raw(" ")];
        for (i, action) in self.actions.iter().take(MAX_SUGGESTIONS).enumerate() {
            if i > 0 {
                spans.push(Span::raw("   "));
            }
            spans.push(Span::styled(format!("F{}", i + 1), key_style));
            spans.push(Span::styled(format!(" {}", action.label), label_style));
        }
        frame.render_widget(Line::from(spans), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::SuggestionEffect;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn rendered(actions: &[SuggestedAction]) -> String {
        let backend = TestBackend::new(80, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| SuggestionBar::new(actions).render(f, f.area()))
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
    fn test_lists_actions_with_keys() {
        let actions = vec![
            SuggestedAction::new("Run Simulation", SuggestionEffect::RunSimulation),
            SuggestedAction::new("View Progress", SuggestionEffect::ShowProgress),
        ];
        let text = rendered(&actions);
        assert!(text.starts_with(" F1 Run Simulation   F2 View Progress"));
    }

    #[test]
    fn test_caps_at_four_keys() {
        let actions: Vec<SuggestedAction> = (0..6)
            .map(|_| SuggestedAction::new("Go", SuggestionEffect::SetGoal))
            .collect();
        let text = rendered(&actions);
        assert!(text.contains("F4 Go"));
        assert!(!text.contains("F5"));
    }
}
