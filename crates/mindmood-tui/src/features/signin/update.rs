//! Sign-in form reducer.
//!
//! Every operation takes the form state by `&mut` and returns the effects the
//! runtime should execute. Nothing here performs I/O.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use mindmood_core::supabase::{AuthError, AuthMode, AuthOutcome};
use mindmood_core::validation::{self, Field, FieldErrors};

use super::state::{FormPhase, FormState};
use crate::common::TaskSeq;
use crate::effects::UiEffect;

/// Stores a new value for `field` and clears that field's error.
///
/// Never re-validates; errors only appear again on the next submit.
pub fn update_field(form: &mut FormState, field: Field, value: String) {
    *form.value_mut(field) = value;
    form.field_errors.clear(field);
}

pub fn toggle_password_visibility(form: &mut FormState) {
    form.password_visible = !form.password_visible;
}

/// Switches between sign-in and sign-up, dropping every error and notice.
pub fn toggle_mode(form: &mut FormState) {
    form.mode = form.mode.toggled();
    form.field_errors = FieldErrors::default();
    form.form_error = None;
    form.notice = None;
}

/// Validates both fields and, if they pass, starts authentication.
///
/// No-op while a request is already in flight.
pub fn submit(form: &mut FormState, seq: &mut TaskSeq) -> Vec<UiEffect> {
    if form.submitting {
        return vec![];
    }

    form.form_error = None;
    form.notice = None;
    form.field_errors = validation::validate_credentials(&form.email, &form.password);

    if !form.field_errors.is_empty() {
        form.phase = FormPhase::Idle;
        focus_first_error(form);
        return vec![];
    }

    form.submitting = true;
    form.phase = FormPhase::Submitting;
    vec![UiEffect::Authenticate {
        task: seq.next_id(),
        email: form.email.clone(),
        password: form.password.clone(),
        mode: form.mode,
    }]
}

/// Sends a recovery email for the entered address. Sign-in mode only.
pub fn request_password_reset(form: &mut FormState, seq: &mut TaskSeq) -> Vec<UiEffect> {
    if form.submitting || !form.forgot_password_visible() {
        return vec![];
    }

    form.form_error = None;
    form.notice = None;
    form.field_errors = FieldErrors {
        email: validation::validate_email(&form.email),
        password: None,
    };

    if !form.field_errors.is_empty() {
        form.focus = Field::Email;
        return vec![];
    }

    form.submitting = true;
    form.phase = FormPhase::Submitting;
    vec![UiEffect::SendPasswordReset {
        task: seq.next_id(),
        email: form.email.clone(),
    }]
}

/// Leaves the form. Ignored while a request is in flight.
pub fn back(form: &FormState) -> Vec<UiEffect> {
    if form.submitting {
        return vec![];
    }
    vec![UiEffect::Quit]
}

/// Applies the outcome of an `Authenticate` effect.
pub fn handle_auth_result(
    form: &mut FormState,
    result: Result<AuthOutcome, AuthError>,
) -> Vec<UiEffect> {
    form.submitting = false;

    match result {
        Ok(AuthOutcome::SignedIn(session)) => {
            form.phase = FormPhase::Done;
            vec![UiEffect::EnterApp { session }]
        }
        Ok(AuthOutcome::ConfirmationRequired { email }) => {
            form.phase = FormPhase::Idle;
            form.mode = AuthMode::SignIn;
            form.field_errors = FieldErrors::default();
            form.notice = Some(format!(
                "Check {email} for a confirmation link, then sign in."
            ));
            vec![]
        }
        Err(error) => {
            form.phase = FormPhase::Idle;
            form.form_error = Some(error.message().to_string());
            vec![]
        }
    }
}

/// Applies the outcome of a `SendPasswordReset` effect.
pub fn handle_password_reset_result(
    form: &mut FormState,
    email: &str,
    result: Result<(), AuthError>,
) -> Vec<UiEffect> {
    form.submitting = false;
    form.phase = FormPhase::Idle;

    match result {
        Ok(()) => form.notice = Some(format!("Password reset instructions sent to {email}.")),
        Err(error) => form.form_error = Some(error.message().to_string()),
    }
    vec![]
}

/// Maps a key press to a form operation.
///
/// Ctrl+C always leaves. Everything else is ignored while a request is in
/// flight or after the form is done.
pub fn handle_key(form: &mut FormState, seq: &mut TaskSeq, key: KeyEvent) -> Vec<UiEffect> {
    if key.kind == KeyEventKind::Release {
        return vec![];
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    if ctrl && key.code == KeyCode::Char('c') {
        return vec![UiEffect::Quit];
    }
    if form.submitting || form.phase == FormPhase::Done {
        return vec![];
    }

    match key.code {
        KeyCode::Esc => back(form),
        KeyCode::Enter => submit(form, seq),
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            form.focus = form.focus.next();
            vec![]
        }
        KeyCode::Char('p') if ctrl => {
            toggle_password_visibility(form);
            vec![]
        }
        KeyCode::Char('t') if ctrl => {
            toggle_mode(form);
            vec![]
        }
        KeyCode::Char('f') if ctrl => request_password_reset(form, seq),
        KeyCode::Backspace => {
            let field = form.focus;
            let mut value = form.value(field).to_string();
            if value.pop().is_some() {
                update_field(form, field, value);
            }
            vec![]
        }
        KeyCode::Char(c) if !ctrl && !alt => {
            let field = form.focus;
            let mut value = form.value(field).to_string();
            value.push(c);
            update_field(form, field, value);
            vec![]
        }
        _ => vec![],
    }
}

/// Appends pasted text to the focused field. Line breaks are dropped.
pub fn handle_paste(form: &mut FormState, text: &str) {
    if form.submitting || form.phase == FormPhase::Done {
        return;
    }
    let pasted: String = text.chars().filter(|c| !matches!(c, '\n' | '\r')).collect();
    if pasted.is_empty() {
        return;
    }
    let field = form.focus;
    let value = format!("{}{pasted}", form.value(field));
    update_field(form, field, value);
}

fn focus_first_error(form: &mut FormState) {
    if form.field_errors.email.is_some() {
        form.focus = Field::Email;
    } else if form.field_errors.password.is_some() {
        form.focus = Field::Password;
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyEventState;
    use mindmood_core::supabase::{Session, User};
    use mindmood_core::validation::FieldError;

    use super::*;

    fn make_key_event(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent {
            code: KeyCode::Char(c),
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn filled(email: &str, password: &str) -> FormState {
        FormState {
            email: email.to_string(),
            password: password.to_string(),
            ..FormState::new()
        }
    }

    fn session() -> Session {
        Session {
            access_token: "access".to_string(),
            token_type: "bearer".to_string(),
            refresh_token: "refresh".to_string(),
            expires_in: 3600,
            expires_at: None,
            user: User {
                id: uuid::Uuid::nil(),
                email: Some("a@b.co".to_string()),
                email_confirmed_at: None,
                created_at: None,
                user_metadata: serde_json::Value::Null,
            },
        }
    }

    #[test]
    fn test_empty_submit_flags_both_fields_required() {
        let mut form = FormState::new();
        let effects = submit(&mut form, &mut TaskSeq::default());

        assert!(effects.is_empty());
        assert_eq!(form.field_errors.email, Some(FieldError::Required));
        assert_eq!(form.field_errors.password, Some(FieldError::Required));
        assert!(!form.submitting);
        assert_eq!(form.phase, FormPhase::Idle);
    }

    #[test]
    fn test_malformed_email_is_invalid_format() {
        let mut form = filled("a@b", "123456");
        let effects = submit(&mut form, &mut TaskSeq::default());

        assert!(effects.is_empty());
        assert_eq!(form.field_errors.email, Some(FieldError::InvalidFormat));
        assert_eq!(form.field_errors.password, None);
        assert_eq!(form.focus, Field::Email);
    }

    #[test]
    fn test_short_password_is_too_short() {
        let mut form = filled("a@b.co", "12345");
        submit(&mut form, &mut TaskSeq::default());

        assert_eq!(form.field_errors.email, None);
        assert_eq!(form.field_errors.password, Some(FieldError::TooShort));
        assert_eq!(form.focus, Field::Password);
    }

    #[test]
    fn test_valid_submit_emits_single_authenticate() {
        let mut form = filled("a@b.co", "123456");
        let mut seq = TaskSeq::default();

        let effects = submit(&mut form, &mut seq);

        assert!(form.submitting);
        assert_eq!(form.phase, FormPhase::Submitting);
        assert!(form.field_errors.is_empty());
        match effects.as_slice() {
            [
                UiEffect::Authenticate {
                    task: _,
                    email,
                    password,
                    mode: AuthMode::SignIn,
                },
            ] => {
                assert_eq!(email, "a@b.co");
                assert_eq!(password, "123456");
            }
            other => panic!("unexpected effects {other:?}"),
        }
    }

    #[test]
    fn test_submit_while_submitting_is_noop() {
        let mut form = filled("a@b.co", "123456");
        let mut seq = TaskSeq::default();
        submit(&mut form, &mut seq);
        let before = form.clone();

        let effects = submit(&mut form, &mut seq);

        assert!(effects.is_empty());
        assert_eq!(form, before);
    }

    #[test]
    fn test_field_errors_replaced_wholesale() {
        let mut form = FormState::new();
        let mut seq = TaskSeq::default();
        submit(&mut form, &mut seq);
        assert!(form.field_errors.password.is_some());

        form.email = "bad".to_string();
        form.password = "123456".to_string();
        submit(&mut form, &mut seq);

        assert_eq!(form.field_errors.email, Some(FieldError::InvalidFormat));
        assert_eq!(form.field_errors.password, None);
    }

    #[test]
    fn test_update_field_clears_only_that_error() {
        let mut form = FormState::new();
        submit(&mut form, &mut TaskSeq::default());

        update_field(&mut form, Field::Email, "x".to_string());

        assert_eq!(form.email, "x");
        assert_eq!(form.field_errors.email, None);
        assert_eq!(form.field_errors.password, Some(FieldError::Required));
    }

    #[test]
    fn test_update_field_does_not_revalidate() {
        let mut form = FormState::new();
        update_field(&mut form, Field::Email, "not-an-email".to_string());
        assert!(form.field_errors.is_empty());
    }

    #[test]
    fn test_toggle_mode_clears_errors_and_messages() {
        let mut form = FormState::new();
        submit(&mut form, &mut TaskSeq::default());
        form.form_error = Some("boom".to_string());
        form.notice = Some("hi".to_string());

        toggle_mode(&mut form);

        assert_eq!(form.mode, AuthMode::SignUp);
        assert!(form.field_errors.is_empty());
        assert!(form.form_error.is_none());
        assert!(form.notice.is_none());

        submit(&mut form, &mut TaskSeq::default());
        assert!(!form.field_errors.is_empty());

        toggle_mode(&mut form);
        assert_eq!(form.mode, AuthMode::SignIn);
        assert!(form.field_errors.is_empty());
    }

    #[test]
    fn test_toggle_password_visibility() {
        let mut form = FormState::new();
        toggle_password_visibility(&mut form);
        assert!(form.password_visible);
        toggle_password_visibility(&mut form);
        assert!(!form.password_visible);
    }

    #[test]
    fn test_success_reaches_done_and_enters_app() {
        let mut form = filled("a@b.co", "123456");
        submit(&mut form, &mut TaskSeq::default());

        let effects = handle_auth_result(&mut form, Ok(AuthOutcome::SignedIn(session())));

        assert!(!form.submitting);
        assert_eq!(form.phase, FormPhase::Done);
        assert!(matches!(effects.as_slice(), [UiEffect::EnterApp { .. }]));
    }

    #[test]
    fn test_failure_returns_to_idle_keeping_inputs() {
        let mut form = filled("a@b.co", "123456");
        submit(&mut form, &mut TaskSeq::default());

        let effects = handle_auth_result(
            &mut form,
            Err(AuthError::Rejected("Invalid login credentials".to_string())),
        );

        assert!(effects.is_empty());
        assert!(!form.submitting);
        assert_eq!(form.phase, FormPhase::Idle);
        assert_eq!(form.email, "a@b.co");
        assert_eq!(form.password, "123456");
        assert_eq!(form.form_error.as_deref(), Some("Invalid login credentials"));
    }

    #[test]
    fn test_confirmation_switches_to_sign_in_with_notice() {
        let mut form = filled("new@b.co", "123456");
        form.mode = AuthMode::SignUp;
        submit(&mut form, &mut TaskSeq::default());

        let effects = handle_auth_result(
            &mut form,
            Ok(AuthOutcome::ConfirmationRequired {
                email: "new@b.co".to_string(),
            }),
        );

        assert!(effects.is_empty());
        assert_eq!(form.mode, AuthMode::SignIn);
        assert_eq!(form.phase, FormPhase::Idle);
        assert_eq!(form.email, "new@b.co");
        assert_eq!(form.password, "123456");
        assert!(form.notice.as_deref().unwrap().contains("new@b.co"));
    }

    #[test]
    fn test_resubmit_allowed_after_failure() {
        let mut form = filled("a@b.co", "123456");
        let mut seq = TaskSeq::default();
        submit(&mut form, &mut seq);
        handle_auth_result(&mut form, Err(AuthError::Unreachable("offline".to_string())));

        let effects = submit(&mut form, &mut seq);

        assert_eq!(effects.len(), 1);
        assert!(form.form_error.is_none());
    }

    #[test]
    fn test_forgot_password_only_in_sign_in() {
        let mut form = filled("a@b.co", "");
        form.mode = AuthMode::SignUp;
        let effects = request_password_reset(&mut form, &mut TaskSeq::default());

        assert!(effects.is_empty());
        assert!(!form.submitting);
    }

    #[test]
    fn test_forgot_password_validates_email_only() {
        let mut form = filled("nope", "");
        let effects = request_password_reset(&mut form, &mut TaskSeq::default());

        assert!(effects.is_empty());
        assert_eq!(form.field_errors.email, Some(FieldError::InvalidFormat));
        assert_eq!(form.field_errors.password, None);
    }

    #[test]
    fn test_forgot_password_emits_reset_and_reports_notice() {
        let mut form = filled("a@b.co", "");
        let effects = request_password_reset(&mut form, &mut TaskSeq::default());

        assert!(form.submitting);
        assert!(matches!(
            effects.as_slice(),
            [UiEffect::SendPasswordReset { email, .. }] if email == "a@b.co"
        ));

        handle_password_reset_result(&mut form, "a@b.co", Ok(()));
        assert!(!form.submitting);
        assert!(form.notice.as_deref().unwrap().contains("a@b.co"));
    }

    #[test]
    fn test_back_ignored_while_submitting() {
        let mut form = filled("a@b.co", "123456");
        assert!(matches!(back(&form).as_slice(), [UiEffect::Quit]));

        submit(&mut form, &mut TaskSeq::default());
        assert!(back(&form).is_empty());
    }

    #[test]
    fn test_typing_goes_to_focused_field() {
        let mut form = FormState::new();
        let mut seq = TaskSeq::default();
        for c in "a@b.co".chars() {
            handle_key(&mut form, &mut seq, make_key_event(KeyCode::Char(c)));
        }
        handle_key(&mut form, &mut seq, make_key_event(KeyCode::Tab));
        for c in "secret!".chars() {
            handle_key(&mut form, &mut seq, make_key_event(KeyCode::Char(c)));
        }
        handle_key(&mut form, &mut seq, make_key_event(KeyCode::Backspace));

        assert_eq!(form.email, "a@b.co");
        assert_eq!(form.password, "secret");
        assert_eq!(form.focus, Field::Password);
    }

    #[test]
    fn test_enter_submits_and_locks_input() {
        let mut form = filled("a@b.co", "123456");
        let mut seq = TaskSeq::default();

        let effects = handle_key(&mut form, &mut seq, make_key_event(KeyCode::Enter));
        assert_eq!(effects.len(), 1);

        assert!(handle_key(&mut form, &mut seq, make_key_event(KeyCode::Char('x'))).is_empty());
        assert!(handle_key(&mut form, &mut seq, make_key_event(KeyCode::Esc)).is_empty());
        assert_eq!(form.email, "a@b.co");
        assert!(matches!(
            handle_key(&mut form, &mut seq, ctrl('c')).as_slice(),
            [UiEffect::Quit]
        ));
    }

    #[test]
    fn test_control_shortcuts() {
        let mut form = FormState::new();
        let mut seq = TaskSeq::default();

        handle_key(&mut form, &mut seq, ctrl('p'));
        assert!(form.password_visible);

        handle_key(&mut form, &mut seq, ctrl('t'));
        assert_eq!(form.mode, AuthMode::SignUp);
        assert!(form.email.is_empty());
    }

    #[test]
    fn test_backspace_on_empty_keeps_error() {
        let mut form = FormState::new();
        let mut seq = TaskSeq::default();
        submit(&mut form, &mut seq);

        handle_key(&mut form, &mut seq, make_key_event(KeyCode::Backspace));
        assert_eq!(form.field_errors.email, Some(FieldError::Required));
    }

    #[test]
    fn test_paste_strips_newlines() {
        let mut form = FormState::new();
        handle_paste(&mut form, "a@b.co\n");
        assert_eq!(form.email, "a@b.co");
    }
}
