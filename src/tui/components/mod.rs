//! # TUI Components
//!
//! Components in this directory follow two patterns:
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Display components that receive all data as fields, built fresh each frame:
//! - `TitleBar`: twin name, mood face and status
//! - `Message`: one transcript entry
//! - `SuggestionBar`: function-key hints for the latest suggested actions
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components whose persistent state lives in `TuiState` and turns
//! `TuiEvent`s into their own events:
//! - `InputBox`: single-line text entry with history
//! - `MessageList`: scrollable transcript with a height cache
//! - `AvatarPanel`: side panel for editing the avatar
//!
//! Components never touch `App` directly. The event loop reads their events
//! and dispatches reducer actions.
//!
//! ```text
//! components/
//! ├── mod.rs
//! ├── title_bar.rs
//! ├── message.rs
//! ├── message_list.rs
//! ├── suggestions.rs
//! ├── input_box.rs
//! └── avatar_panel.rs
//! ```

mod title_bar;
pub use title_bar::TitleBar;

pub mod avatar_panel;
pub mod input_box;
pub mod message;
pub mod message_list;
pub mod suggestions;
pub use avatar_panel::{AvatarEvent, AvatarPanel, AvatarPanelState};
pub use input_box::{InputBox, InputEvent};
pub use message_list::{MessageList, MessageListState};
pub use suggestions::SuggestionBar;
