//! Shared building blocks for the TUI.

pub mod task;

pub use task::*;
