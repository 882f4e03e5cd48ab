//! Screen layout and the per-frame draw.
//!
//! ```text
//! ┌ Conversations ┐ MedChat ● online │ Title │ status
//! │▌Conversation  │ ┌ You · 09:05 AM ───────────────┐
//! │ 4 messages •  │ │ ...                           │
//! │               │ └───────────────────────────────┘
//! │               │  ⚠ error banner (only when set)
//! │               │ ╭ Message ──────────────────────╮
//! └ n new ────────┘ ╰───────────────────────────────╯
//! ```

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};

use crate::core::state::App;
use crate::tui::component::Component;
use crate::tui::components::{EmptyState, ErrorBanner, MessageList, Sidebar, TitleBar};
use crate::tui::{Focus, TuiState};

/// The chat pane never gets narrower than this; the sidebar is hidden instead.
pub const MIN_CHAT_WIDTH: u16 = 40;

/// Where each piece of the screen goes for a given frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Areas {
    pub sidebar: Option<Rect>,
    pub title: Rect,
    pub transcript: Rect,
    pub error: Option<Rect>,
    pub input: Rect,
}

/// Split the screen. `input_height` comes from `InputBox::calculate_height`
/// for the chat pane width.
pub fn layout(
    area: Rect,
    sidebar_width: u16,
    has_error: bool,
    input_height: impl Fn(u16) -> u16,
) -> Areas {
    let (sidebar, chat) = if area.width >= sidebar_width.saturating_add(MIN_CHAT_WIDTH) {
        let [sidebar, chat] =
            Layout::horizontal([Constraint::Length(sidebar_width), Constraint::Min(0)]).areas(area);
        (Some(sidebar), chat)
    } else {
        (None, area)
    };

    let [title, transcript, error, input] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(u16::from(has_error)),
        Constraint::Length(input_height(chat.width)),
    ])
    .areas(chat);

    Areas {
        sidebar,
        title,
        transcript,
        error: has_error.then_some(error),
        input,
    }
}

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    let input_box = &tui.input_box;
    let areas = layout(frame.area(), tui.sidebar_width, app.error.is_some(), |w| {
        input_box.calculate_height(w)
    });

    if let Some(area) = areas.sidebar {
        Sidebar::new(
            &mut tui.sidebar,
            &app.conversations,
            app.current_id(),
            tui.focus == Focus::Sidebar,
        )
        .render(frame, area);
    }

    let title = app.current_conversation.as_ref().map(|c| c.title.as_str());
    TitleBar::new(app.server_status, &app.status_message, title).render(frame, areas.title);

    if app.messages.is_empty() && !app.is_loading {
        EmptyState.render(frame, areas.transcript);
    } else {
        MessageList::new(
            &mut tui.message_list,
            &app.messages,
            &app.failed,
            app.is_loading,
            app.view_generation,
            spinner_frame,
        )
        .render(frame, areas.transcript);
    }

    if let (Some(area), Some(error)) = (areas.error, app.error.as_deref()) {
        ErrorBanner::new(error, app.retryable_index().is_some()).render(frame, area);
    }

    tui.input_box.disabled = app.is_loading;
    tui.input_box.focused = tui.focus == Focus::Input;
    tui.input_box.render(frame, areas.input);
}
