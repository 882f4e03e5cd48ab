use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::component::Component;

/// One-line banner for `App.error`. Only laid out while there is an error.
pub struct ErrorBanner<'a> {
    pub message: &'a str,
    /// The trailing message can be resent with Ctrl+R
    pub retryable: bool,
}

impl<'a> ErrorBanner<'a> {
    pub fn new(message: &'a str, retryable: bool) -> Self {
        Self { message, retryable }
    }

    fn hint(&self) -> &'static str {
        if self.retryable {
            "  Ctrl+R retry · Esc dismiss"
        } else {
            "  Esc dismiss"
        }
    }
}

impl<'a> Component for ErrorBanner<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let banner_style = Style::default().fg(Color::White).bg(Color::Red);
        let line = Line::from(vec![
            Span::styled(" ⚠ ", banner_style.add_modifier(Modifier::BOLD)),
            Span::styled(self.message.to_string(), banner_style),
            Span::styled(self.hint(), banner_style.add_modifier(Modifier::DIM)),
        ]);
        frame.render_widget(Paragraph::new(line).style(banner_style), area);
    }
}
