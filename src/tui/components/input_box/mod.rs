//! # InputBox Component
//!
//! The message draft.
//!
//! ## Responsibilities
//!
//! - Capture text input
//! - Handle editing (backspace, delete, cursor movement, paste)
//! - Handle submission (Enter), trimming the draft and refusing blank text
//! - Show a character count, or a placeholder when empty
//!
//! ## State Management
//!
//! The draft and cursor are internal state. `disabled` is a prop set from
//! `App.is_loading`: while it is on, the box still accepts typing but
//! swallows Enter, so at most one send is in flight.

mod wrap;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Padding, Paragraph};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

use wrap::{
    MAX_VISIBLE_ROWS, VERTICAL_OVERHEAD, cursor_row_col, inner_width, layout_rows,
    next_char_boundary, offset_at_column, prev_char_boundary,
};

pub const PLACEHOLDER: &str = "Ask me about any medical topic...";

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// User submitted trimmed, non-blank text
    Submit(String),
    /// Draft or cursor changed
    ContentChanged,
}

/// Multi-line text input.
///
/// # Props
///
/// - `disabled`: a reply is pending; Enter is ignored
/// - `focused`: draw the terminal cursor here
///
/// # State
///
/// - `buffer`: current draft
/// - `cursor`: byte offset into `buffer`, always on a char boundary
/// - `scroll`: first visible row when the draft outgrows the box
pub struct InputBox {
    pub buffer: String,
    pub disabled: bool,
    pub focused: bool,
    cursor: usize,
    scroll: usize,
    /// Width from the last render, used for Up/Down between renders
    last_width: u16,
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBox {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            disabled: false,
            focused: true,
            cursor: 0,
            scroll: 0,
            last_width: 0,
        }
    }

    /// Height needed for the current draft, between 1 and `MAX_VISIBLE_ROWS`
    /// rows plus borders.
    pub fn calculate_height(&self, area_width: u16) -> u16 {
        let rows = layout_rows(&self.buffer, inner_width(area_width)).len();
        let visible = u16::try_from(rows).unwrap_or(u16::MAX).min(MAX_VISIBLE_ROWS);
        visible + VERTICAL_OVERHEAD
    }

    /// Number of characters (not bytes) in the draft.
    pub fn char_count(&self) -> usize {
        self.buffer.chars().count()
    }

    fn title(&self) -> String {
        match self.char_count() {
            0 => " Message ".to_string(),
            1 => " Message (1 char) ".to_string(),
            n => format!(" Message ({n} chars) "),
        }
    }

    fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
        self.scroll = 0;
    }

    /// Keep the cursor row inside the visible window.
    fn update_scroll(&mut self, cursor_row: usize) {
        let visible = usize::from(MAX_VISIBLE_ROWS);
        if cursor_row < self.scroll {
            self.scroll = cursor_row;
        } else if cursor_row >= self.scroll + visible {
            self.scroll = cursor_row + 1 - visible;
        }
    }

    /// Move the cursor one visual row up (`-1`) or down (`1`), keeping its column.
    /// Returns false when already on the first or last row.
    fn move_vertically(&mut self, direction: isize) -> bool {
        let rows = layout_rows(&self.buffer, inner_width(self.last_width));
        let (row, col) = cursor_row_col(&self.buffer, &rows, self.cursor);
        let Some(target) = row.checked_add_signed(direction).filter(|r| *r < rows.len()) else {
            return false;
        };
        self.cursor = offset_at_column(&self.buffer, rows[target], col);
        true
    }

    fn line_start(&self) -> usize {
        self.buffer[..self.cursor]
            .rfind('\n')
            .map(|i| i + 1)
            .unwrap_or(0)
    }

    fn line_end(&self) -> usize {
        self.buffer[self.cursor..]
            .find('\n')
            .map(|i| self.cursor + i)
            .unwrap_or(self.buffer.len())
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.last_width = area.width;
        let width = inner_width(area.width);
        let rows = layout_rows(&self.buffer, width);
        let (cursor_row, cursor_col) = cursor_row_col(&self.buffer, &rows, self.cursor);
        self.update_scroll(cursor_row);

        let border_color = if self.disabled {
            Color::DarkGray
        } else if self.focused {
            Color::Cyan
        } else {
            Color::Gray
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color))
            .padding(Padding::horizontal(1))
            .title(self.title());

        let paragraph = if self.buffer.is_empty() {
            Paragraph::new(PLACEHOLDER).style(
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )
        } else {
            let lines: Vec<Line> = rows
                .iter()
                .skip(self.scroll)
                .take(usize::from(MAX_VISIBLE_ROWS))
                .map(|r| Line::raw(&self.buffer[r.start..r.end]))
                .collect();
            Paragraph::new(lines)
        };
        frame.render_widget(paragraph.block(block), area);

        if self.focused && !self.disabled {
            // Border + left padding
            let x = area.x + 2 + u16::try_from(cursor_col).unwrap_or(0).min(width);
            let y = area.y + 1 + u16::try_from(cursor_row - self.scroll).unwrap_or(0);
            frame.set_cursor_position((x, y));
        }
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                self.buffer.insert(self.cursor, *c);
                self.cursor += c.len_utf8();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                // Terminals send CR line endings in bracketed paste
                let text = text.replace("\r\n", "\n").replace('\r', "\n");
                self.buffer.insert_str(self.cursor, &text);
                self.cursor += text.len();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Backspace => (self.cursor > 0).then(|| {
                let prev = prev_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(prev..self.cursor);
                self.cursor = prev;
                InputEvent::ContentChanged
            }),
            TuiEvent::Delete => (self.cursor < self.buffer.len()).then(|| {
                let next = next_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(self.cursor..next);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorLeft => (self.cursor > 0).then(|| {
                self.cursor = prev_char_boundary(&self.buffer, self.cursor);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorRight => (self.cursor < self.buffer.len()).then(|| {
                self.cursor = next_char_boundary(&self.buffer, self.cursor);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorHome => {
                let start = self.line_start();
                (self.cursor != start).then(|| {
                    self.cursor = start;
                    InputEvent::ContentChanged
                })
            }
            TuiEvent::CursorEnd => {
                let end = self.line_end();
                (self.cursor != end).then(|| {
                    self.cursor = end;
                    InputEvent::ContentChanged
                })
            }
            TuiEvent::CursorUp => self.move_vertically(-1).then_some(InputEvent::ContentChanged),
            TuiEvent::CursorDown => self.move_vertically(1).then_some(InputEvent::ContentChanged),
            TuiEvent::Submit => {
                let text = self.buffer.trim();
                if self.disabled || text.is_empty() {
                    return None;
                }
                let text = text.to_string();
                self.clear();
                Some(InputEvent::Submit(text))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn typed(text: &str) -> InputBox {
        let mut input = InputBox::new();
        for c in text.chars() {
            input.handle_event(&TuiEvent::InputChar(c));
        }
        input
    }

    fn render_to_string(input: &mut InputBox, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| input.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_handle_input() {
        let mut input = InputBox::new();

        assert_eq!(
            input.handle_event(&TuiEvent::InputChar('a')),
            Some(InputEvent::ContentChanged)
        );
        input.handle_event(&TuiEvent::InputChar('b'));
        assert_eq!(input.buffer, "ab");

        input.handle_event(&TuiEvent::Backspace);
        assert_eq!(input.buffer, "a");
    }

    #[test]
    fn test_submit_trims_and_clears() {
        let mut input = typed("  what is a fever?\n ");

        let res = input.handle_event(&TuiEvent::Submit);
        assert_eq!(res, Some(InputEvent::Submit("what is a fever?".to_string())));
        assert!(input.buffer.is_empty());
        assert_eq!(input.char_count(), 0);
    }

    #[test]
    fn test_blank_submit_is_ignored() {
        let mut input = typed("   \n\t");
        assert_eq!(input.handle_event(&TuiEvent::Submit), None);
        assert_eq!(input.buffer, "   \n\t", "blank draft is left as typed");
    }

    #[test]
    fn test_disabled_keeps_draft_on_submit() {
        let mut input = typed("hello");
        input.disabled = true;

        assert_eq!(input.handle_event(&TuiEvent::Submit), None);
        assert_eq!(input.buffer, "hello");

        input.disabled = false;
        assert_eq!(
            input.handle_event(&TuiEvent::Submit),
            Some(InputEvent::Submit("hello".to_string()))
        );
    }

    #[test]
    fn test_editing_in_the_middle_of_multibyte_text() {
        let mut input = typed("héllo");
        input.handle_event(&TuiEvent::CursorHome);
        input.handle_event(&TuiEvent::CursorRight);
        input.handle_event(&TuiEvent::CursorRight);
        input.handle_event(&TuiEvent::Backspace);
        assert_eq!(input.buffer, "hllo");
        input.handle_event(&TuiEvent::Delete);
        assert_eq!(input.buffer, "hlo");
    }

    #[test]
    fn test_paste_normalizes_line_endings() {
        let mut input = InputBox::new();
        input.handle_event(&TuiEvent::Paste("one\r\ntwo\rthree".to_string()));
        assert_eq!(input.buffer, "one\ntwo\nthree");
        assert_eq!(input.char_count(), 13);
    }

    #[test]
    fn test_home_and_end_stay_on_current_line() {
        let mut input = typed("first\nsecond");
        input.handle_event(&TuiEvent::CursorHome);
        input.handle_event(&TuiEvent::InputChar('>'));
        assert_eq!(input.buffer, "first\n>second");
        assert_eq!(input.handle_event(&TuiEvent::CursorEnd), Some(InputEvent::ContentChanged));
        assert_eq!(input.handle_event(&TuiEvent::CursorEnd), None);
    }

    #[test]
    fn test_up_and_down_move_between_lines() {
        let mut input = typed("abc\nde");
        input.last_width = 40;

        assert!(input.handle_event(&TuiEvent::CursorUp).is_some());
        input.handle_event(&TuiEvent::InputChar('X'));
        assert_eq!(input.buffer, "abXc\nde");

        assert!(input.handle_event(&TuiEvent::CursorUp).is_none());
        assert!(input.handle_event(&TuiEvent::CursorDown).is_some());
        assert!(input.handle_event(&TuiEvent::CursorDown).is_none());
    }

    #[test]
    fn test_height_grows_then_caps() {
        let mut input = InputBox::new();
        assert_eq!(input.calculate_height(40), 1 + VERTICAL_OVERHEAD);

        input.buffer = "a\nb\nc".to_string();
        assert_eq!(input.calculate_height(40), 3 + VERTICAL_OVERHEAD);

        input.buffer = "line\n".repeat(20);
        assert_eq!(input.calculate_height(40), MAX_VISIBLE_ROWS + VERTICAL_OVERHEAD);
    }

    #[test]
    fn test_render_shows_placeholder_when_empty() {
        let mut input = InputBox::new();
        let text = render_to_string(&mut input, 50, 3);
        assert!(text.contains(PLACEHOLDER));
        assert!(!text.contains("chars"));
    }

    #[test]
    fn test_render_shows_char_count() {
        let mut input = typed("ok");
        let text = render_to_string(&mut input, 50, 3);
        assert!(text.contains("Message (2 chars)"));
        assert!(text.contains("ok"));
        assert!(!text.contains(PLACEHOLDER));
    }

    #[test]
    fn test_long_draft_scrolls_to_cursor() {
        let mut input = typed(&(1..=8).map(|i| format!("row{i}")).collect::<Vec<_>>().join("\n"));
        let text = render_to_string(&mut input, 30, MAX_VISIBLE_ROWS + VERTICAL_OVERHEAD);
        assert!(text.contains("row8"));
        assert!(!text.contains("row1"));
    }
}
