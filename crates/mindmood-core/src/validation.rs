//! Credential validation for the sign-in / sign-up form.
//!
//! Validation is purely local: a failing field never reaches the backend.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Minimum accepted password length, in UTF-16 code units.
pub const MIN_PASSWORD_LEN: usize = 6;

/// `local@domain.tld`, where each part is a run of non-whitespace, non-`@` characters.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("compile email regex")
});

/// Form input fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Field {
    #[default]
    Email,
    Password,
}

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Field::Email => "Email",
            Field::Password => "Password",
        }
    }

    /// Returns the other field (focus cycling).
    pub fn next(self) -> Self {
        match self {
            Field::Email => Field::Password,
            Field::Password => Field::Email,
        }
    }
}

/// Field-level validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    /// Input is empty.
    Required,
    /// Email does not have the `local@domain.tld` shape.
    InvalidFormat,
    /// Password is shorter than [`MIN_PASSWORD_LEN`].
    TooShort,
}

impl FieldError {
    /// User-facing message for this error on `field`.
    pub fn message(self, field: Field) -> &'static str {
        match (field, self) {
            (Field::Email, FieldError::Required) => "Email is required",
            (Field::Email, _) => "Please enter a valid email",
            (Field::Password, FieldError::Required) => "Password is required",
            (Field::Password, _) => "Password must be at least 6 characters",
        }
    }
}

/// Per-field validation result. Replaced wholesale on every validation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub email: Option<FieldError>,
    pub password: Option<FieldError>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.password.is_none()
    }

    pub fn get(&self, field: Field) -> Option<FieldError> {
        match field {
            Field::Email => self.email,
            Field::Password => self.password,
        }
    }

    /// Clears the error for one field, leaving the other untouched.
    pub fn clear(&mut self, field: Field) {
        match field {
            Field::Email => self.email = None,
            Field::Password => self.password = None,
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = [
            self.email.map(|e| e.message(Field::Email)),
            self.password.map(|e| e.message(Field::Password)),
        ]
        .into_iter()
        .flatten()
        .collect();
        write!(f, "{}", messages.join("; "))
    }
}

/// Returns true when `email` matches the `local@domain.tld` shape.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Validates the email field.
pub fn validate_email(email: &str) -> Option<FieldError> {
    if email.is_empty() {
        Some(FieldError::Required)
    } else if !is_valid_email(email) {
        Some(FieldError::InvalidFormat)
    } else {
        None
    }
}

/// Validates the password field.
pub fn validate_password(password: &str) -> Option<FieldError> {
    if password.is_empty() {
        Some(FieldError::Required)
    } else if password.encode_utf16().count() < MIN_PASSWORD_LEN {
        Some(FieldError::TooShort)
    } else {
        None
    }
}

/// Validates both fields in one pass.
pub fn validate_credentials(email: &str, password: &str) -> FieldErrors {
    FieldErrors {
        email: validate_email(email),
        password: validate_password(password),
    }
}
