//! Effect handlers for the TUI runtime.
//!
//! Handlers are pure async functions that return `UiEvent`. The runtime
//! spawns them with `spawn_task` and sends the result to the inbox. They
//! never touch `AppState`.

pub mod auth;

pub use auth::*;
