use chrono::Local;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget};

use crate::core::message::{Message as ChatMessage, Sender};
use crate::tui::component::Component;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

const THINKING_FRAMES: [&str; 4] = ["thinking", "thinking.", "thinking..", "thinking..."];

/// One wrapped row of a message body.
#[derive(Debug, PartialEq, Eq)]
enum BodyLine {
    Text(String),
    Action(String),
}

/// Renders one transcript entry as a bordered box.
///
/// Created fresh each frame by `MessageList`. Text is wrapped with
/// `textwrap` both for [`calculate_height`](Self::calculate_height) and for
/// rendering, so the predicted height always matches what is drawn.
#[derive(Clone, Copy)]
pub struct Message<'a> {
    pub message: &'a ChatMessage,
    pub twin_name: &'a str,
    pub spinner_frame: usize,
}

impl<'a> Message<'a> {
    pub fn new(message: &'a ChatMessage, twin_name: &'a str, spinner_frame: usize) -> Self {
        Self {
            message,
            twin_name,
            spinner_frame,
        }
    }

    pub fn calculate_height(message: &ChatMessage, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            // Too narrow for borders; still take a row
            return 1;
        }
        let lines = body_lines(message, content_width, 0);
        (lines.len() as u16).max(1) + VERTICAL_OVERHEAD
    }

    fn title(&self) -> String {
        let time = self
            .message
            .timestamp
            .with_timezone(&Local)
            .format("%H:%M");
        match self.message.sender {
            Sender::User => match self.message.status {
                Some(status) => format!(" you {time} {} ", status.glyph()),
                None => format!(" you {time} "),
            },
            Sender::Twin if self.message.thinking => format!(" {} ", self.twin_name),
            Sender::Twin => format!(" {} {time} ", self.twin_name),
        }
    }
}

pub fn sender_style(message: &ChatMessage) -> Style {
    if message.thinking {
        return Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC);
    }
    match message.sender {
        Sender::User => Style::default().fg(Color::Green),
        Sender::Twin => Style::default().fg(Color::Blue),
    }
}

/// Wrapped body text followed by the suggested actions.
fn body_lines(message: &ChatMessage, content_width: u16, spinner_frame: usize) -> Vec<BodyLine> {
    if message.thinking {
        let frame = THINKING_FRAMES[spinner_frame % THINKING_FRAMES.len()];
        return vec![BodyLine::Text(frame.to_string())];
    }

    let options = textwrap::Options::new(content_width as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace);

    let mut lines: Vec<BodyLine> = textwrap::wrap(message.text.trim(), &options)
        .into_iter()
        .map(|l| BodyLine::Text(l.into_owned()))
        .collect();
    for action in &message.actions {
        let label = format!("→ {}", action.label);
        lines.extend(
            textwrap::wrap(&label, &options)
                .into_iter()
                .map(|l| BodyLine::Action(l.into_owned())),
        );
    }
    lines
}

impl<'a> Widget for Message<'a> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let style = sender_style(self.message);
        let border_style = style.add_modifier(Modifier::DIM);
        let action_style = Style::default().fg(Color::Cyan);

        let block = Block::bordered()
            .title(self.title())
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));
        let inner_area = block.inner(area);
        block.render(area, buf);

        if inner_area.width == 0 {
            return;
        }
        let lines: Vec<Line> = body_lines(self.message, inner_area.width, self.spinner_frame)
            .into_iter()
            .map(|line| match line {
                BodyLine::Text(text) => Line::styled(text, style),
                BodyLine::Action(text) => Line::styled(text, action_style),
            })
            .collect();

        Paragraph::new(lines).render(inner_area, buf);
    }
}

impl<'a> Component for Message<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(*self, area);
    }
}
