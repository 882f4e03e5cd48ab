//! # MessageList Component
//!
//! Scrollable view of the active transcript.
//!
//! ## Responsibilities
//!
//! - Display the transcript, flagging undelivered messages
//! - Show a "Thinking..." row while a reply is pending
//! - Keep scroll state and stick to the bottom on new content
//! - Cache message heights so long transcripts stay cheap to draw
//!
//! ## Architecture
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and the transcript (props).
//! `Component::render` takes `&mut self`, so the layout cache and scroll
//! state are refreshed during the render pass.

use std::collections::BTreeSet;

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::api::Message;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::MessageBlock;
use crate::tui::event::TuiEvent;

const SPINNER: [&str; 4] = ["◐", "◓", "◑", "◒"];
pub const THINKING_LABEL: &str = "Thinking...";
/// Rows reserved under the transcript for the thinking indicator.
const THINKING_HEIGHT: u16 = 2;

/// Layout and scroll state for the message list.
/// Persisted in `TuiState`.
pub struct MessageListState {
    pub scroll_state: ScrollViewState,
    pub layout: LayoutCache,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::new(),
            stick_to_bottom: true,
            viewport_height: 0,
        }
    }

    fn max_offset(&self) -> u16 {
        self.layout
            .total_height()
            .saturating_sub(self.viewport_height)
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Re-engage auto-scroll once the user scrolls back to the bottom.
    pub fn repin_if_at_bottom(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Jump back to the newest message (used when the view is swapped).
    pub fn reset(&mut self) {
        self.scroll_state = ScrollViewState::default();
        self.stick_to_bottom = true;
    }
}

/// Scrollable transcript component.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub messages: &'a [Message],
    pub failed: &'a BTreeSet<usize>,
    pub is_loading: bool,
    /// `App::view_generation`, used to invalidate cached heights
    pub generation: u64,
    pub spinner_frame: usize,
}

impl<'a> MessageList<'a> {
    pub fn new(
        state: &'a mut MessageListState,
        messages: &'a [Message],
        failed: &'a BTreeSet<usize>,
        is_loading: bool,
        generation: u64,
        spinner_frame: usize,
    ) -> Self {
        Self {
            state,
            messages,
            failed,
            is_loading,
            generation,
            spinner_frame,
        }
    }

    fn thinking_line(&self) -> Line<'static> {
        let spinner = SPINNER[self.spinner_frame % SPINNER.len()];
        Line::from(vec![
            Span::styled(format!(" {spinner} "), Style::default().fg(Color::Green)),
            Span::styled(
                THINKING_LABEL,
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ),
        ])
    }
}

impl<'a> Component for MessageList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar safe area
        let count = self.messages.len();

        // 1. Update layout cache
        let layout = &mut self.state.layout;
        let reusable = layout.reusable_count(count, content_width, self.generation);
        layout.heights.truncate(reusable);
        for message in self.messages.iter().skip(layout.heights.len()) {
            layout
                .heights
                .push(MessageBlock::calculate_height(message, content_width));
        }
        layout.rebuild_prefix_heights();
        layout.update_metadata(count, content_width, self.generation);

        let total_height = self.state.layout.total_height();
        let indicator_height = if self.is_loading { THINKING_HEIGHT } else { 0 };
        let canvas_height = total_height + indicator_height;

        // 2. Clamp scroll offset
        self.state.viewport_height = area.height;
        if self.state.stick_to_bottom {
            self.state.scroll_state.set_offset(Position {
                x: 0,
                y: canvas_height.saturating_sub(area.height),
            });
        } else {
            self.state.clamp_scroll();
        }

        let scroll_offset = self.state.scroll_state.offset().y;
        let visible_range = self.state.layout.visible_range(scroll_offset, area.height);

        // 3. Render visible messages into a ScrollView
        let mut scroll_view = ScrollView::new(Size::new(content_width, canvas_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut y_offset = match visible_range.start {
            0 => 0,
            start => self.state.layout.prefix_heights[start - 1],
        };
        for i in visible_range {
            let height = self.state.layout.heights[i];
            let rect = Rect::new(0, y_offset, content_width, height);
            let block = MessageBlock::new(&self.messages[i], self.failed.contains(&i));
            scroll_view.render_widget(block, rect);
            y_offset += height;
        }

        if self.is_loading {
            let rect = Rect::new(0, total_height, content_width, THINKING_HEIGHT);
            scroll_view.render_widget(Paragraph::new(self.thinking_line()), rect);
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}

/// Event handling lives on the persistent state; `MessageList` is rebuilt every frame.
impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp | TuiEvent::CursorUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown | TuiEvent::CursorDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            _ => {}
        }
        None
    }
}

/// Cached message heights for the current width and transcript.
pub struct LayoutCache {
    pub heights: Vec<u16>,
    pub prefix_heights: Vec<u16>,
    message_count: usize,
    content_width: u16,
    generation: u64,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutCache {
    pub fn new() -> Self {
        Self {
            heights: Vec::new(),
            prefix_heights: Vec::new(),
            message_count: 0,
            content_width: 0,
            generation: 0,
        }
    }

    /// How many cached heights are still valid.
    ///
    /// Messages are only ever appended within one view, so a wider or
    /// narrower terminal, a swapped view or a shrunk transcript throws the
    /// whole cache away while plain growth keeps it.
    pub fn reusable_count(
        &self,
        message_count: usize,
        content_width: u16,
        generation: u64,
    ) -> usize {
        if self.content_width != content_width
            || self.generation != generation
            || message_count < self.message_count
        {
            return 0;
        }
        self.heights.len().min(message_count)
    }

    pub fn update_metadata(&mut self, message_count: usize, content_width: u16, generation: u64) {
        self.message_count = message_count;
        self.content_width = content_width;
        self.generation = generation;
    }

    pub fn rebuild_prefix_heights(&mut self) {
        self.prefix_heights = self
            .heights
            .iter()
            .scan(0u16, |acc, &h| {
                *acc = acc.saturating_add(h);
                Some(*acc)
            })
            .collect();
    }

    pub fn total_height(&self) -> u16 {
        self.prefix_heights.last().copied().unwrap_or(0)
    }

    /// Indices of messages overlapping the viewport, padded by half a screen each way.
    pub fn visible_range(
        &self,
        scroll_offset: u16,
        viewport_height: u16,
    ) -> std::ops::Range<usize> {
        let buffer = viewport_height / 2;
        let buffered_start = scroll_offset.saturating_sub(buffer);
        let buffered_end = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(buffer);

        let start = self
            .prefix_heights
            .partition_point(|&end| end <= buffered_start);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < buffered_end)
            .saturating_add(1)
            .min(self.prefix_heights.len());

        start..end
    }
}
