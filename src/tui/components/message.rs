use chrono::{DateTime, Local, TimeZone};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};

use crate::api::types::parse_timestamp;
use crate::api::{Message, Role};

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

pub const NOT_DELIVERED: &str = " not delivered · Ctrl+R to retry ";

/// A stateless component that renders one transcript entry with role-based styling.
///
/// # Styling
///
/// - **User** (cyan): the person asking
/// - **Assistant** (green): the server's reply
/// - **Failed** (red border): a user message that never reached the server
///
/// # Height Calculation
///
/// [`calculate_height`](Self::calculate_height) predicts the rendered height with
/// `textwrap` options that match `Paragraph` wrapping, so `MessageList` can lay
/// out the scroll canvas without rendering.
#[derive(Clone, Copy)]
pub struct MessageBlock<'a> {
    pub message: &'a Message,
    /// Set for optimistic user messages whose send failed
    pub failed: bool,
}

impl<'a> MessageBlock<'a> {
    pub fn new(message: &'a Message, failed: bool) -> Self {
        Self { message, failed }
    }

    /// Calculate the height required for a message given a width.
    pub fn calculate_height(message: &Message, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            // Too narrow for borders + padding; still take up a row.
            return 1;
        }

        let content = message.content.trim();
        if content.is_empty() {
            return VERTICAL_OVERHEAD;
        }

        let options = textwrap::Options::new(usize::from(content_width))
            .break_words(true)
            .word_separator(textwrap::WordSeparator::AsciiSpace);

        let lines = textwrap::wrap(content, options);
        u16::try_from(lines.len()).unwrap_or(u16::MAX).max(1) + VERTICAL_OVERHEAD
    }
}

pub fn role_style(role: Role) -> Style {
    match role {
        Role::User => Style::default().fg(Color::Cyan),
        Role::Assistant => Style::default().fg(Color::Green),
    }
}

fn role_label(role: Role) -> &'static str {
    match role {
        Role::User => "You",
        Role::Assistant => "MedChat",
    }
}

/// Format a timestamp as a local wall-clock time like `09:05 AM`.
/// Unparseable timestamps render as an empty string.
pub fn format_clock(timestamp: &str) -> String {
    parse_timestamp(timestamp)
        .map(|utc| clock_in(&utc.with_timezone(&Local)))
        .unwrap_or_default()
}

fn clock_in<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    time.format("%I:%M %p").to_string()
}

impl<'a> Widget for MessageBlock<'a> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let style = role_style(self.message.role);
        let border_style = if self.failed {
            Style::default().fg(Color::Red)
        } else {
            style.add_modifier(Modifier::DIM)
        };

        let clock = format_clock(&self.message.timestamp);
        let title = if clock.is_empty() {
            format!(" {} ", role_label(self.message.role))
        } else {
            format!(" {} · {} ", role_label(self.message.role), clock)
        };

        let mut block = Block::bordered()
            .title(title)
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title_style(style.add_modifier(Modifier::BOLD))
            .padding(Padding::horizontal(CONTENT_PAD_H));
        if self.failed {
            block = block.title_bottom(
                Line::from(NOT_DELIVERED)
                    .style(Style::default().fg(Color::Red).add_modifier(Modifier::ITALIC))
                    .right_aligned(),
            );
        }

        let inner_area = block.inner(area);
        block.render(area, buf);

        Paragraph::new(self.message.content.trim())
            .wrap(Wrap { trim: true })
            .render(inner_area, buf);
    }
}
