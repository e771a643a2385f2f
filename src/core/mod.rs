//! # Core Application Logic
//!
//! This module contains the chat's business logic.
//! It knows nothing about any specific UI technology or socket library.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  No sockets. No UI.     │
//!                    └───────────┬─────────────┘
//!                                │
//!                  ┌─────────────┴─────────────┐
//!                  ▼                           ▼
//!           ┌────────────┐              ┌────────────┐
//!           │    TUI     │              │ Transport  │
//!           │  Adapter   │              │ (listeners │
//!           │ (ratatui)  │              │  → Action) │
//!           └────────────┘              └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all chat state in one place
//! - [`action`]: The `Action` enum and `update()` reducer
//! - [`message`]: Inbound decoding into `DisplayMessage`
//! - [`envelope`]: The outbound `sendMessage` envelope
//! - [`store`]: Append-only `MessageStore`
//! - [`config`]: Ambient settings (logging, display)

pub mod action;
pub mod config;
pub mod envelope;
pub mod message;
pub mod state;
pub mod store;
