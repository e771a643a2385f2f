//! # TUI Components
//!
//! All widgets of the chat screen.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Created each frame from the data they display:
//! - `TitleBar`: title, connection indicator, endpoint
//! - `Message`: one chat entry with its time
//!
//! ### Stateful Components (Event-Driven)
//!
//! Persisted in `TuiState` across frames:
//! - `InputBox`: draft editing, emits `InputEvent`
//! - `MessageList`: scrollable history (state in `MessageListState`)
//! - `SendButton`: remembers where it was drawn for click hit testing
//!
//! Components receive external data as props, never by reaching into `App`.
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs
//! ├── title_bar.rs     (title + status dot)
//! ├── message.rs       (single message bubble)
//! ├── message_list.rs  (scrollable history)
//! ├── send_button.rs   ([ Send ])
//! └── input_box/       (draft editor)
//! ```

mod title_bar;
pub use title_bar::TitleBar;

pub mod input_box;
pub mod message;
pub use input_box::{InputBox, InputEvent};
pub mod message_list;
pub use message_list::{MessageList, MessageListState};
pub mod send_button;
pub use send_button::SendButton;
