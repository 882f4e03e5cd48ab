//! # Sidebar Component
//!
//! Conversation list on the left of the screen. Tab moves focus here.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `SidebarState` lives in `TuiState` (selection, delete confirmation)
//! - `Sidebar` is created each frame with the conversation list as a prop
//!
//! The sidebar never mutates `App`; it emits `SidebarEvent`s that the event
//! loop turns into `Action`s.

use chrono::{DateTime, Local};
use ratatui::Frame;
use ratatui::layout::{Alignment, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, List, ListItem, ListState, Padding, Paragraph};
use unicode_width::UnicodeWidthChar;

use crate::api::Conversation;
use crate::api::types::parse_timestamp;
use crate::tui::component::Component;
use crate::tui::event::TuiEvent;

/// Each entry is a title row plus a details row.
const ITEM_HEIGHT: u16 = 2;
pub const EMPTY_TEXT: &str = "No conversations yet";

/// Events emitted by the sidebar.
#[derive(Debug, Clone, PartialEq)]
pub enum SidebarEvent {
    Select(String),
    Delete(String),
    New,
    /// Give focus back to the input box
    Dismiss,
}

/// Persistent state for the sidebar.
#[derive(Debug, Default)]
pub struct SidebarState {
    pub selected: usize,
    pub confirm_delete: bool,
    pub list_state: ListState,
    /// Where the list was last drawn, for mouse hit testing
    list_area: Rect,
}

impl SidebarState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the selection inside a list of `len` entries.
    pub fn clamp(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
            self.list_state.select(None);
        } else {
            self.selected = self.selected.min(len - 1);
            self.list_state.select(Some(self.selected));
        }
    }

    /// Point the selection at `id` if it is in the list.
    pub fn select_id(&mut self, conversations: &[Conversation], id: &str) {
        if let Some(index) = conversations.iter().position(|c| c.id == id) {
            self.selected = index;
            self.list_state.select(Some(index));
        }
    }

    /// Handle a key event while the sidebar has focus.
    pub fn handle_event(
        &mut self,
        event: &TuiEvent,
        conversations: &[Conversation],
    ) -> Option<SidebarEvent> {
        // Any key other than 'd' cancels a pending delete
        if !matches!(event, TuiEvent::InputChar('d')) {
            self.confirm_delete = false;
        }
        self.clamp(conversations.len());

        match event {
            TuiEvent::Escape => Some(SidebarEvent::Dismiss),
            TuiEvent::CursorUp | TuiEvent::ScrollUp => {
                if !conversations.is_empty() {
                    self.selected = self.selected.saturating_sub(1);
                    self.list_state.select(Some(self.selected));
                }
                None
            }
            TuiEvent::CursorDown | TuiEvent::ScrollDown => {
                if !conversations.is_empty() {
                    self.selected = (self.selected + 1).min(conversations.len() - 1);
                    self.list_state.select(Some(self.selected));
                }
                None
            }
            TuiEvent::Submit => conversations
                .get(self.selected)
                .map(|c| SidebarEvent::Select(c.id.clone())),
            TuiEvent::InputChar('n') => Some(SidebarEvent::New),
            TuiEvent::InputChar('d') => {
                let id = conversations.get(self.selected)?.id.clone();
                if self.confirm_delete {
                    self.confirm_delete = false;
                    Some(SidebarEvent::Delete(id))
                } else {
                    self.confirm_delete = true;
                    None
                }
            }
            _ => None,
        }
    }

    /// Map a mouse click to a conversation. Works whether or not the sidebar has focus.
    pub fn handle_click(
        &mut self,
        column: u16,
        row: u16,
        conversations: &[Conversation],
    ) -> Option<SidebarEvent> {
        if !self.list_area.contains(Position::new(column, row)) {
            return None;
        }
        let index =
            usize::from((row - self.list_area.y) / ITEM_HEIGHT) + self.list_state.offset();
        let conversation = conversations.get(index)?;
        self.selected = index;
        self.confirm_delete = false;
        self.list_state.select(Some(index));
        Some(SidebarEvent::Select(conversation.id.clone()))
    }
}

/// Transient render wrapper for the sidebar.
pub struct Sidebar<'a> {
    pub state: &'a mut SidebarState,
    pub conversations: &'a [Conversation],
    /// Id of the conversation shown in the transcript
    pub active_id: Option<&'a str>,
    pub focused: bool,
    /// Reference point for relative dates
    pub now: DateTime<Local>,
}

impl<'a> Sidebar<'a> {
    pub fn new(
        state: &'a mut SidebarState,
        conversations: &'a [Conversation],
        active_id: Option<&'a str>,
        focused: bool,
    ) -> Self {
        Self {
            state,
            conversations,
            active_id,
            focused,
            now: Local::now(),
        }
    }

    fn help_text(&self) -> &'static str {
        if !self.focused {
            " Tab to browse "
        } else if self.state.confirm_delete {
            " d again to delete · Esc cancel "
        } else {
            " n new · dd delete "
        }
    }

    fn item(&self, index: usize, conversation: &Conversation, width: usize) -> ListItem<'static> {
        let is_active = self.active_id == Some(conversation.id.as_str());
        let is_selected = self.focused && index == self.state.selected;

        let marker = if is_active { "▌" } else { " " };
        let mut title_style = if is_active {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        if is_selected {
            let fg = if self.state.confirm_delete {
                Color::Red
            } else {
                Color::Cyan
            };
            title_style = title_style.fg(fg).add_modifier(Modifier::REVERSED);
        }

        let details = format!(
            "{} • {}",
            message_count_label(conversation.messages.len()),
            format_relative_date(&conversation.updated_at, &self.now)
        );

        ListItem::new(vec![
            Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::Green)),
                Span::styled(
                    truncate_to_width(&conversation.title, width.saturating_sub(1)),
                    title_style,
                ),
            ]),
            Line::from(vec![
                Span::raw(" "),
                Span::styled(details, Style::default().fg(Color::DarkGray)),
            ]),
        ])
    }
}

impl<'a> Component for Sidebar<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let border_color = if self.focused {
            Color::Cyan
        } else {
            Color::DarkGray
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color))
            .title(" Conversations ")
            .title_bottom(Line::from(self.help_text()).centered())
            .padding(Padding::horizontal(1));

        let inner = block.inner(area);
        self.state.list_area = inner;

        if self.conversations.is_empty() {
            let empty = Paragraph::new(EMPTY_TEXT)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        self.state.clamp(self.conversations.len());
        let width = usize::from(inner.width);
        let items: Vec<ListItem> = self
            .conversations
            .iter()
            .enumerate()
            .map(|(i, c)| self.item(i, c, width))
            .collect();

        frame.render_stateful_widget(
            List::new(items).block(block),
            area,
            &mut self.state.list_state,
        );
    }
}

fn message_count_label(count: usize) -> String {
    match count {
        1 => "1 message".to_string(),
        n => format!("{n} messages"),
    }
}

/// Describe a timestamp relative to `now` in calendar days (local time).
///
/// Same day → "Today", the day before → "Yesterday", two to six days back →
/// short weekday ("Mon"), anything else → month and day ("Mar 4").
/// Unparseable input → "Unknown".
pub fn format_relative_date(timestamp: &str, now: &DateTime<Local>) -> String {
    let Some(time) = parse_timestamp(timestamp).map(|t| t.with_timezone(&Local)) else {
        return "Unknown".to_string();
    };
    let days = now
        .date_naive()
        .signed_duration_since(time.date_naive())
        .num_days();
    match days {
        0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        2..=6 => time.format("%a").to_string(),
        _ => time.format("%b %-d").to_string(),
    }
}

/// Cut `s` to at most `max_width` display columns, ending in "..." when cut.
fn truncate_to_width(s: &str, max_width: usize) -> String {
    let width: usize = s.chars().map(|c| c.width().unwrap_or(0)).sum();
    if width <= max_width {
        return s.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max_width - 3 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::conversation;
    use chrono::{Duration, TimeZone};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn now() -> DateTime<Local> {
        // Midday so a one-hour DST shift never changes the calendar day
        Local.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).single().unwrap()
    }

    fn days_ago(days: i64) -> String {
        (now() - Duration::days(days)).to_rfc3339()
    }

    fn list() -> Vec<Conversation> {
        vec![conversation("a", 2), conversation("b", 1), conversation("c", 4)]
    }

    fn render_to_string(sidebar: &mut Sidebar, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| sidebar.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_relative_date_buckets() {
        let now = now();
        assert_eq!(format_relative_date(&days_ago(0), &now), "Today");
        assert_eq!(format_relative_date(&days_ago(1), &now), "Yesterday");
        // 2024-05-07 was a Tuesday
        assert_eq!(format_relative_date(&days_ago(3), &now), "Tue");
        assert_eq!(format_relative_date(&days_ago(6), &now), "Sat");
        assert_eq!(format_relative_date(&days_ago(7), &now), "May 3");
        assert_eq!(format_relative_date(&days_ago(40), &now), "Mar 31");
    }

    #[test]
    fn test_relative_date_unparseable() {
        assert_eq!(format_relative_date("yesterday-ish", &now()), "Unknown");
        assert_eq!(format_relative_date("", &now()), "Unknown");
    }

    #[test]
    fn test_navigation_and_select() {
        let conversations = list();
        let mut state = SidebarState::new();

        assert_eq!(state.handle_event(&TuiEvent::CursorDown, &conversations), None);
        assert_eq!(state.handle_event(&TuiEvent::CursorDown, &conversations), None);
        assert_eq!(state.handle_event(&TuiEvent::CursorDown, &conversations), None);
        assert_eq!(state.selected, 2, "selection stops at the last entry");

        assert_eq!(
            state.handle_event(&TuiEvent::Submit, &conversations),
            Some(SidebarEvent::Select("c".to_string()))
        );
        state.handle_event(&TuiEvent::CursorUp, &conversations);
        assert_eq!(state.selected, 1);
    }

    #[test]
    fn test_delete_needs_two_presses() {
        let conversations = list();
        let mut state = SidebarState::new();

        assert_eq!(state.handle_event(&TuiEvent::InputChar('d'), &conversations), None);
        assert!(state.confirm_delete);
        assert_eq!(
            state.handle_event(&TuiEvent::InputChar('d'), &conversations),
            Some(SidebarEvent::Delete("a".to_string()))
        );
        assert!(!state.confirm_delete);
    }

    #[test]
    fn test_other_key_cancels_delete() {
        let conversations = list();
        let mut state = SidebarState::new();

        state.handle_event(&TuiEvent::InputChar('d'), &conversations);
        state.handle_event(&TuiEvent::CursorDown, &conversations);
        assert!(!state.confirm_delete);
        assert_eq!(state.handle_event(&TuiEvent::InputChar('d'), &conversations), None);
    }

    #[test]
    fn test_empty_list_emits_nothing_but_new_and_dismiss() {
        let mut state = SidebarState::new();
        assert_eq!(state.handle_event(&TuiEvent::Submit, &[]), None);
        assert_eq!(state.handle_event(&TuiEvent::InputChar('d'), &[]), None);
        assert_eq!(state.handle_event(&TuiEvent::InputChar('d'), &[]), None);
        assert_eq!(state.handle_event(&TuiEvent::InputChar('n'), &[]), Some(SidebarEvent::New));
        assert_eq!(state.handle_event(&TuiEvent::Escape, &[]), Some(SidebarEvent::Dismiss));
    }

    #[test]
    fn test_selection_clamped_after_removal() {
        let mut conversations = list();
        let mut state = SidebarState::new();
        state.selected = 2;
        conversations.truncate(1);
        state.clamp(conversations.len());
        assert_eq!(state.selected, 0);
        state.clamp(0);
        assert_eq!(state.list_state.selected(), None);
    }

    #[test]
    fn test_click_selects_row() {
        let conversations = list();
        let mut state = SidebarState::new();
        let mut sidebar = Sidebar::new(&mut state, &conversations, None, false);
        render_to_string(&mut sidebar, 30, 12);

        // Inner list starts at (2, 1); second entry occupies rows 3-4
        assert_eq!(
            state.handle_click(5, 4, &conversations),
            Some(SidebarEvent::Select("b".to_string()))
        );
        assert_eq!(state.selected, 1);
        // Border and rows past the end are ignored
        assert_eq!(state.handle_click(0, 0, &conversations), None);
        assert_eq!(state.handle_click(5, 9, &conversations), None);
    }

    #[test]
    fn test_render_lists_titles_and_details() {
        let conversations = list();
        let mut state = SidebarState::new();
        let mut sidebar = Sidebar::new(&mut state, &conversations, Some("b"), true);
        sidebar.now = now();
        let text = render_to_string(&mut sidebar, 36, 12);

        assert!(text.contains("Conversation a"));
        assert!(text.contains("1 message •"));
        assert!(text.contains("4 messages •"));
        assert!(text.contains("dd delete"));
    }

    #[test]
    fn test_render_empty_state() {
        let mut state = SidebarState::new();
        let mut sidebar = Sidebar::new(&mut state, &[], None, false);
        let text = render_to_string(&mut sidebar, 30, 8);
        assert!(text.contains(EMPTY_TEXT));
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("a longer title", 8), "a lon...");
        assert_eq!(truncate_to_width("日本語のタイトル", 7), "日本...");
        assert_eq!(truncate_to_width("abc", 2), "..");
    }
}
