use ratatui::Frame;
use ratatui::layout::Rect;

use super::event::TuiEvent;

/// A piece of the screen.
///
/// Components receive their data as props (struct fields), may hold
/// references to persistent state owned by `TuiState`, and draw themselves
/// into the `Rect` they are given.
///
/// `render` takes `&mut self` so a component can refresh caches (line
/// heights, list offsets) during the render pass, the same way ratatui's
/// `StatefulWidget` does.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A component that reacts to terminal events.
///
/// Components never touch `App` directly: they translate a low-level
/// `TuiEvent` into their own intent type and hand it to the caller.
pub trait EventHandler {
    /// The intent this component emits.
    type Event;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event>;
}
