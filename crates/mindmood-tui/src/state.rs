//! Application state composition.
//!
//! ```text
//! AppState
//! ├── form: FormState        (sign-in / sign-up form)
//! ├── task_seq: TaskSeq      (async task id generator)
//! ├── tasks: Tasks           (task lifecycle state)
//! ├── spinner_frame: usize   (submit spinner animation)
//! └── should_quit: bool
//! ```

use crate::common::{TaskSeq, Tasks};
use crate::signin::FormState;

/// Combined application state for the TUI.
#[derive(Debug, Default)]
pub struct AppState {
    pub form: FormState,
    pub task_seq: TaskSeq,
    pub tasks: Tasks,
    pub spinner_frame: usize,
    pub should_quit: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while the event loop should poll at frame rate.
    pub fn is_busy(&self) -> bool {
        self.form.submitting || self.tasks.is_any_running()
    }
}
