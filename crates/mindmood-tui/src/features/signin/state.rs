//! Sign-in form state.

use mindmood_core::supabase::AuthMode;
use mindmood_core::validation::{Field, FieldErrors};

/// Character drawn in place of each hidden password character.
pub const PASSWORD_MASK: char = '•';

/// Where the form is in its submit cycle.
///
/// Validation happens synchronously inside submit, so it has no phase of
/// its own: a submit either stays `Idle` (with field errors) or moves to
/// `Submitting`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormPhase {
    #[default]
    Idle,
    Submitting,
    /// Authenticated; the form is finished.
    Done,
}

/// State owned by the sign-in / sign-up form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub email: String,
    pub password: String,
    pub password_visible: bool,
    pub mode: AuthMode,
    pub field_errors: FieldErrors,
    /// True while a backend request is in flight. Gates re-entry.
    pub submitting: bool,
    pub focus: Field,
    /// Backend failure not tied to a single field.
    pub form_error: Option<String>,
    /// Informational message (confirmation or recovery email sent).
    pub notice: Option<String>,
    pub phase: FormPhase,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Email => &self.email,
            Field::Password => &self.password,
        }
    }

    pub(crate) fn value_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Email => &mut self.email,
            Field::Password => &mut self.password,
        }
    }

    /// The password as it should be displayed.
    pub fn password_display(&self) -> String {
        if self.password_visible {
            self.password.clone()
        } else {
            PASSWORD_MASK.to_string().repeat(self.password.chars().count())
        }
    }

    /// The recovery link is only offered when signing in.
    pub fn forgot_password_visible(&self) -> bool {
        self.mode == AuthMode::SignIn
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            AuthMode::SignIn => "Sign In",
            AuthMode::SignUp => "Create Account",
        }
    }

    pub fn subtitle(&self) -> &'static str {
        match self.mode {
            AuthMode::SignIn => "Welcome back to your wellness journey",
            AuthMode::SignUp => "Join MindMood to start your wellness journey",
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match self.mode {
            AuthMode::SignIn => "Continue",
            AuthMode::SignUp => "Create Account",
        }
    }

    pub fn switch_prompt(&self) -> &'static str {
        match self.mode {
            AuthMode::SignIn => "Don't have an account?",
            AuthMode::SignUp => "Already have an account?",
        }
    }

    pub fn switch_action(&self) -> &'static str {
        match self.mode {
            AuthMode::SignIn => "Sign Up",
            AuthMode::SignUp => "Sign In",
        }
    }
}
