//! Uniform error shape for every session and gateway operation. Each variant carries
//! a user-facing message; callers present it and let the user retry by resubmitting.
//! Nothing here is fatal to the process.

use std::{collections::BTreeMap, fmt};

/// Per-field validation messages produced before any network call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message for `field`, keeping the first one reported.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    /// Converts into `Err(AppError::Validation)` when any field failed.
    ///
    /// # Errors
    /// Returns the collected field errors when at least one was recorded.
    pub fn into_result(self) -> Result<(), AppError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self))
        }
    }
}

#[derive(Clone, Debug)]
pub enum AppError {
    Config(String),
    Network(String),
    Timeout(String),
    Http { status: u16, message: String },
    Unauthorized(String),
    Parse(String),
    Serialization(String),
    Storage(String),
    Validation(FieldErrors),
    Superseded,
}

impl AppError {
    /// The user-facing message, without the category prefix used by `Display`.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            AppError::Config(message)
            | AppError::Network(message)
            | AppError::Timeout(message)
            | AppError::Unauthorized(message)
            | AppError::Parse(message)
            | AppError::Serialization(message)
            | AppError::Storage(message)
            | AppError::Http { message, .. } => message,
            AppError::Validation(errors) => errors
                .iter()
                .next()
                .map_or("Invalid input.", |(_, message)| message),
            AppError::Superseded => "Superseded by a newer request.",
        }
    }

    /// Invalid credentials or an expired token.
    #[must_use]
    pub fn is_auth(&self) -> bool {
        matches!(self, AppError::Unauthorized(_))
    }

    /// Connectivity failures, timeouts included.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, AppError::Network(_) | AppError::Timeout(_))
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(message) => write!(formatter, "Config error: {message}"),
            AppError::Network(message) => write!(formatter, "Network error: {message}"),
            AppError::Timeout(message) => write!(formatter, "Timeout: {message}"),
            AppError::Http { status, message } => {
                write!(formatter, "Request failed ({status}): {message}")
            }
            AppError::Unauthorized(message) => write!(formatter, "Unauthorized: {message}"),
            AppError::Parse(message) => write!(formatter, "Response error: {message}"),
            AppError::Serialization(message) => {
                write!(formatter, "Request error: {message}")
            }
            AppError::Storage(message) => write!(formatter, "Storage error: {message}"),
            AppError::Validation(errors) => {
                write!(formatter, "Invalid input:")?;
                for (field, message) in errors.iter() {
                    write!(formatter, " {field}: {message};")?;
                }
                Ok(())
            }
            AppError::Superseded => write!(formatter, "Superseded by a newer request"),
        }
    }
}

impl std::error::Error for AppError {}
