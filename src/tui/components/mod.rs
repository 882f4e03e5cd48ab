//! # TUI Components
//!
//! All UI pieces of the terminal interface.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Display components that receive all data as struct fields:
//! - `TitleBar`: app name, server status and status message
//! - `MessageBlock`: a single transcript entry
//! - `ErrorBanner`: the current error, one line
//! - `EmptyState`: welcome text for an empty transcript
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components that keep local state and emit events upward:
//! - `InputBox`: multi-line draft, emits `InputEvent::Submit`
//! - `MessageList`: scrollable transcript with layout caching
//! - `Sidebar`: conversation list, emits `SidebarEvent`s
//!
//! Stateful components that are rebuilt every frame keep their persistent
//! part in a `*State` struct owned by `TuiState`.
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── title_bar.rs     (top status bar)
//! ├── message.rs       (single message renderer)
//! ├── message_list.rs  (scrollable transcript)
//! ├── sidebar.rs       (conversation list)
//! ├── error_banner.rs  (error line)
//! ├── empty_state.rs   (welcome view)
//! └── input_box/       (draft editor)
//! ```

mod empty_state;
mod error_banner;
mod title_bar;
pub use empty_state::EmptyState;
pub use error_banner::ErrorBanner;
pub use title_bar::TitleBar;

pub mod input_box;
pub mod message;
pub mod message_list;
pub mod sidebar;
pub use input_box::{InputBox, InputEvent};
pub use message_list::{MessageList, MessageListState};
pub use sidebar::{Sidebar, SidebarEvent, SidebarState};
