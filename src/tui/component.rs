use ratatui::Frame;
use ratatui::layout::Rect;

/// A reusable UI component.
///
/// Components receive data as props (struct fields), may borrow persistent
/// state (`&mut State` fields) and render into a `Rect`.
///
/// `render` takes `&mut self` so a component can update its layout cache or
/// scroll offsets during the render pass, like Ratatui's `StatefulWidget`.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A component that turns low-level terminal events into its own events.
pub trait EventHandler {
    type Event;

    fn handle_event(&mut self, event: &super::event::TuiEvent) -> Option<Self::Event>;
}
