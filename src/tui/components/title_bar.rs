//! # TitleBar Component
//!
//! Single-line bar at the top of the chat pane.
//!
//! ```text
//! MedChat ● online │ Waiting for reply...
//! ```
//!
//! Purely presentational: all three props come from `App` and are set by
//! the parent each frame.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::core::state::ServerStatus;
use crate::tui::component::Component;

pub const APP_NAME: &str = "MedChat";

/// Top status bar.
///
/// # Props
///
/// - `server_status`: result of the last health check
/// - `status_message`: transient status from `App` (may be empty)
/// - `title`: title of the active conversation, if any
pub struct TitleBar<'a> {
    pub server_status: ServerStatus,
    pub status_message: &'a str,
    pub title: Option<&'a str>,
}

impl<'a> TitleBar<'a> {
    pub fn new(
        server_status: ServerStatus,
        status_message: &'a str,
        title: Option<&'a str>,
    ) -> Self {
        Self {
            server_status,
            status_message,
            title,
        }
    }

    fn status_color(&self) -> Color {
        match self.server_status {
            ServerStatus::Unknown => Color::Yellow,
            ServerStatus::Online => Color::Green,
            ServerStatus::Offline => Color::Red,
        }
    }
}

impl<'a> Component for TitleBar<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let separator = Span::styled(" │ ", Style::default().fg(Color::DarkGray));

        let mut spans = vec![
            Span::styled(
                APP_NAME,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::styled("●", Style::default().fg(self.status_color())),
            Span::styled(
                format!(" {}", self.server_status.label()),
                Style::default().fg(Color::Gray),
            ),
        ];
        if let Some(title) = self.title {
            spans.push(separator.clone());
            spans.push(Span::styled(title.to_string(), Style::default().fg(Color::White)));
        }
        if !self.status_message.is_empty() {
            spans.push(separator);
            spans.push(Span::styled(
                self.status_message.to_string(),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}
