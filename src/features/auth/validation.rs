//! Form input for the auth flows and the checks that run before any request leaves
//! the client. Failures are reported per field so each form can show them inline.

use crate::app_lib::{AppError, FieldErrors};
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use std::sync::LazyLock;

pub const MIN_PASSWORD_CHARS: usize = 6;
pub const MIN_NAME_CHARS: usize = 2;
pub const MAX_NAME_CHARS: usize = 100;

static EMAIL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());
static PHONE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^[67]\d{7}$").ok());

#[must_use]
pub fn valid_email(email: &str) -> bool {
    EMAIL.as_ref().is_some_and(|re| re.is_match(email))
}

#[must_use]
pub fn valid_phone(phone: &str) -> bool {
    PHONE.as_ref().is_some_and(|re| re.is_match(phone))
}

/// Normalizes emails so the same account is not addressed two ways.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn check_email(errors: &mut FieldErrors, email: &str) {
    if email.is_empty() {
        errors.add("email", "Email is required.");
    } else if !valid_email(email) {
        errors.add("email", "Email format is invalid.");
    }
}

/// Login form input.
pub struct Credentials {
    email: String,
    password: SecretString,
}

impl Credentials {
    #[must_use]
    pub fn new(email: &str, password: impl Into<String>) -> Self {
        Self {
            email: normalize_email(email),
            password: SecretString::from(password.into()),
        }
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn password(&self) -> &str {
        self.password.expose_secret()
    }

    /// # Errors
    /// Returns `AppError::Validation` when email or password is missing.
    pub fn validate(&self) -> Result<(), AppError> {
        let mut errors = FieldErrors::new();
        if self.email.is_empty() {
            errors.add("email", "Email is required.");
        }
        if self.password().trim().is_empty() {
            errors.add("password", "Password is required.");
        }
        errors.into_result()
    }
}

/// Registration form input.
pub struct Registration {
    display_name: String,
    email: String,
    password: SecretString,
    confirmation: SecretString,
    phone: Option<String>,
}

impl Registration {
    #[must_use]
    pub fn new(
        display_name: &str,
        email: &str,
        password: impl Into<String>,
        confirmation: impl Into<String>,
    ) -> Self {
        Self {
            display_name: display_name.trim().to_string(),
            email: normalize_email(email),
            password: SecretString::from(password.into()),
            confirmation: SecretString::from(confirmation.into()),
            phone: None,
        }
    }

    /// Sets the optional phone number; blank input means none.
    #[must_use]
    pub fn with_phone(mut self, phone: &str) -> Self {
        let phone = phone.trim();
        self.phone = (!phone.is_empty()).then(|| phone.to_string());
        self
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn password(&self) -> &str {
        self.password.expose_secret()
    }

    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    /// # Errors
    /// Returns `AppError::Validation` listing every field that failed.
    pub fn validate(&self) -> Result<(), AppError> {
        let mut errors = FieldErrors::new();

        let name_chars = self.display_name.chars().count();
        if name_chars == 0 {
            errors.add("display_name", "Name is required.");
        } else if !(MIN_NAME_CHARS..=MAX_NAME_CHARS).contains(&name_chars) {
            errors.add(
                "display_name",
                format!("Name must be between {MIN_NAME_CHARS} and {MAX_NAME_CHARS} characters."),
            );
        }

        check_email(&mut errors, &self.email);

        if self.password().chars().count() < MIN_PASSWORD_CHARS {
            errors.add(
                "password",
                format!("Password must be at least {MIN_PASSWORD_CHARS} characters."),
            );
        }
        if self.password() != self.confirmation.expose_secret() {
            errors.add("confirmation", "Passwords do not match.");
        }

        if let Some(phone) = &self.phone {
            if !valid_phone(phone) {
                errors.add("phone", "Phone format is invalid (e.g. 70123456).");
            }
        }

        errors.into_result()
    }
}

/// Password reset request input.
pub struct PasswordReset {
    email: String,
}

impl PasswordReset {
    #[must_use]
    pub fn new(email: &str) -> Self {
        Self {
            email: normalize_email(email),
        }
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// # Errors
    /// Returns `AppError::Validation` for a missing or malformed email.
    pub fn validate(&self) -> Result<(), AppError> {
        let mut errors = FieldErrors::new();
        check_email(&mut errors, &self.email);
        errors.into_result()
    }
}
