//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! They represent I/O and task spawning only (no direct UI mutations).

use std::fmt;

use mindmood_core::supabase::{AuthMode, Session};

use crate::common::TaskId;

/// Effects returned by the reducer for the runtime to execute.
pub enum UiEffect {
    /// Leave the form without signing in.
    Quit,

    /// Sign in or register with the validated credentials.
    Authenticate {
        task: TaskId,
        email: String,
        password: String,
        mode: AuthMode,
    },

    /// Request a password recovery email.
    SendPasswordReset { task: TaskId, email: String },

    /// Authentication finished; hand the session to the app.
    EnterApp { session: Session },
}

impl fmt::Debug for UiEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quit => f.write_str("Quit"),
            Self::Authenticate {
                task, email, mode, ..
            } => f
                .debug_struct("Authenticate")
                .field("task", task)
                .field("email", email)
                .field("password", &"***")
                .field("mode", mode)
                .finish(),
            Self::SendPasswordReset { task, email } => f
                .debug_struct("SendPasswordReset")
                .field("task", task)
                .field("email", email)
                .finish(),
            Self::EnterApp { session } => f
                .debug_struct("EnterApp")
                .field("user_id", &session.user.id)
                .finish_non_exhaustive(),
        }
    }
}
