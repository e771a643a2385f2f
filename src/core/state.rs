//! # Application State
//!
//! Core chat state. Domain logic only - no TUI or socket types.
//! Presentation state (scroll offsets, cursor) lives in the `tui` module.
//!
//! ```text
//! App
//! ├── messages: MessageStore   // append-only history
//! ├── connected: bool          // true between open and close
//! ├── draft: String            // unsent input
//! └── endpoint: String         // shown in the title bar
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use crate::core::store::MessageStore;

pub struct App {
    pub messages: MessageStore,
    pub connected: bool,
    pub draft: String,
    pub endpoint: String,
}

impl App {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            messages: MessageStore::new(),
            connected: false,
            draft: String::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Submit gating: open connection and a draft with visible content.
    pub fn can_send(&self) -> bool {
        self.connected && !self.draft.trim().is_empty()
    }
}
