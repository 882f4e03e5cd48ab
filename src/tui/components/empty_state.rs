use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;

use crate::tui::component::Component;

pub const HEADLINE: &str = "Welcome to MedChat";

const LINES: [&str; 4] = [
    "Ask a question about symptoms, medications or general health.",
    "Answers are for information only and are not medical advice.",
    "",
    "Enter send · Shift+Enter newline · Tab conversations · Ctrl+N new chat",
];

/// Welcome view drawn in place of the transcript while it is empty.
pub struct EmptyState;

impl Component for EmptyState {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut lines = vec![
            Line::from(HEADLINE).style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Line::raw(""),
        ];
        lines.extend(
            LINES
                .iter()
                .map(|l| Line::from(*l).style(Style::default().fg(Color::Gray))),
        );

        let height = u16::try_from(lines.len()).unwrap_or(u16::MAX);
        let [_, center, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .areas(area);

        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), center);
    }
}
