//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates terminal events into `core::Action` values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Event Loop
//!
//! ```text
//! terminal event ─► component ─► Action ─► update() ─► Effect
//!                                   ▲                    │
//!                                   │            tokio::spawn(perform)
//!                                   └──── mpsc ◄─────────┘
//! ```
//!
//! All state changes happen on this thread. Network calls run as tokio
//! tasks and report back through an `std::sync::mpsc` channel that is
//! drained once per loop iteration.
//!
//! ## Redraw Strategy
//!
//! - **Loading**: draws every ~80ms so the thinking spinner moves.
//! - **Idle**: sleeps up to 500ms and only redraws on events, results or resize.
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call, making blinking cursors appear erratic during continuous redraws.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::api::{ChatService, HttpChatService};
use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::App;
use crate::core::sync;
use crate::tui::component::EventHandler;
use crate::tui::components::{InputBox, InputEvent, MessageListState, SidebarEvent, SidebarState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// Which pane receives key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    Sidebar,
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub message_list: MessageListState,
    pub input_box: InputBox,
    pub sidebar: SidebarState,
    pub focus: Focus,
    pub sidebar_width: u16,
    /// `App::view_generation` the message list was last synced to
    seen_generation: u64,
}

impl TuiState {
    pub fn new(sidebar_width: u16) -> Self {
        Self {
            message_list: MessageListState::new(),
            input_box: InputBox::new(),
            sidebar: SidebarState::new(),
            focus: Focus::Input, // User expects to type immediately
            sidebar_width,
            seen_generation: 0,
        }
    }

    /// Bring presentation state in line with `App` after an update.
    fn sync(&mut self, app: &App) {
        if self.seen_generation != app.view_generation {
            self.seen_generation = app.view_generation;
            self.message_list.reset();
            if let Some(id) = app.current_id() {
                self.sidebar.select_id(&app.conversations, id);
            }
        }
        self.sidebar.clamp(app.conversations.len());
        self.input_box.disabled = app.is_loading;
    }
}

/// Translate a terminal event into an `Action`, updating component state on the way.
///
/// Returns `None` when the event was fully handled by a component (scrolling,
/// editing, focus changes).
fn route_event(event: &TuiEvent, app: &App, tui: &mut TuiState) -> Option<Action> {
    match event {
        TuiEvent::ForceQuit => return Some(Action::Quit),
        TuiEvent::NewConversation => {
            tui.focus = Focus::Input;
            return Some(Action::NewConversation);
        }
        TuiEvent::Refresh => return Some(Action::RefreshConversation),
        TuiEvent::Retry => return Some(Action::RetryFailed),
        TuiEvent::ToggleFocus => {
            tui.focus = match tui.focus {
                Focus::Input => Focus::Sidebar,
                Focus::Sidebar => Focus::Input,
            };
            tui.sidebar.confirm_delete = false;
            return None;
        }
        TuiEvent::MouseClick(column, row) => {
            let sidebar_event = tui.sidebar.handle_click(*column, *row, &app.conversations);
            if sidebar_event.is_some() {
                tui.focus = Focus::Sidebar;
            }
            return sidebar_event.and_then(|e| sidebar_action(e, tui));
        }
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown
            if tui.focus == Focus::Input =>
        {
            tui.message_list.handle_event(event);
            return None;
        }
        TuiEvent::ScrollPageUp | TuiEvent::ScrollPageDown => {
            tui.message_list.handle_event(event);
            return None;
        }
        TuiEvent::Resize => return None,
        _ => {}
    }

    match tui.focus {
        Focus::Sidebar => {
            let sidebar_event = tui.sidebar.handle_event(event, &app.conversations)?;
            sidebar_action(sidebar_event, tui)
        }
        Focus::Input => {
            if matches!(event, TuiEvent::Escape) {
                return app.error.is_some().then_some(Action::DismissError);
            }
            match tui.input_box.handle_event(event) {
                Some(InputEvent::Submit(text)) => Some(Action::Submit(text)),
                Some(InputEvent::ContentChanged) => None,
                None => {
                    // Up/Down past the draft's first/last row scroll the transcript
                    if matches!(event, TuiEvent::CursorUp | TuiEvent::CursorDown) {
                        tui.message_list.handle_event(event);
                    }
                    None
                }
            }
        }
    }
}

fn sidebar_action(event: SidebarEvent, tui: &mut TuiState) -> Option<Action> {
    match event {
        SidebarEvent::Select(id) => {
            tui.focus = Focus::Input;
            Some(Action::SelectConversation(id))
        }
        SidebarEvent::Delete(id) => Some(Action::DeleteConversation(id)),
        SidebarEvent::New => {
            tui.focus = Focus::Input;
            Some(Action::NewConversation)
        }
        SidebarEvent::Dismiss => {
            tui.focus = Focus::Input;
            None
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Enable Kitty keyboard protocol unconditionally (allows Shift+Enter detection)
        // Terminals that don't support it ignore the escape sequence
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,                        // Show cursor for input editing
            // Non-blinking: avoids blink timer reset from continuous redraws
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!(
            "Terminal modes enabled (mouse, bracketed paste, steady block cursor, keyboard enhancement)"
        );
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

/// Run an action through `update()` and start whatever effect it asks for.
/// Returns true when the app should quit.
fn dispatch(
    app: &mut App,
    tui: &mut TuiState,
    action: Action,
    service: &Arc<dyn ChatService>,
    tx: &mpsc::Sender<Action>,
) -> bool {
    debug!("Dispatching action: {:?}", action);
    let effect = update(app, action);
    tui.sync(app);
    match effect {
        Effect::Quit => true,
        Effect::None => false,
        effect => {
            spawn_effect(effect, Arc::clone(service), tx.clone());
            false
        }
    }
}

/// Run one effect on the tokio runtime and post the resulting action back.
fn spawn_effect(effect: Effect, service: Arc<dyn ChatService>, tx: mpsc::Sender<Action>) {
    debug!("Spawning effect: {:?}", effect);
    tokio::spawn(async move {
        if let Some(action) = sync::perform(service.as_ref(), effect).await
            && tx.send(action).is_err()
        {
            warn!("Failed to deliver effect result: receiver dropped");
        }
    });
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    info!("Using chat server at {}", config.base_url);
    let service: Arc<dyn ChatService> = Arc::new(HttpChatService::new(config.base_url.clone()));
    let mut app = App::new();
    let mut tui = TuiState::new(config.sidebar_width);

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = match TerminalModeGuard::new() {
        Ok(guard) => Some(guard),
        Err(e) => {
            warn!("Failed to enable terminal modes: {}", e);
            None
        }
    };

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    for action in [Action::LoadConversations, Action::CheckHealth] {
        dispatch(&mut app, &mut tui, action, &service, &tx);
    }

    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    'event_loop: loop {
        let animating = app.is_loading;
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 8.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        // Short timeout while the spinner runs, long when idle
        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain all pending events before the next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if let Some(action) = route_event(&event, &app, &mut tui)
                && dispatch(&mut app, &mut tui, action, &service, &tx)
            {
                break 'event_loop;
            }
        }

        // Results from background tasks
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            if dispatch(&mut app, &mut tui, action, &service, &tx) {
                break 'event_loop;
            }
        }
    }

    info!("Shutting down");
    ratatui::restore();
    Ok(())
}
