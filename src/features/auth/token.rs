use secrecy::{ExposeSecret, SecretString};
use std::fmt;

/// Opaque credential issued by the backend. The value is only exposed when it is
/// written to the `Authorization` header or the persisted slot.
pub struct AuthToken(SecretString);

impl AuthToken {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretString::from(value.into()))
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// Returns `None` for blank tokens; a blank value never authenticates anything.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self::new(trimmed))
        }
    }
}

impl Clone for AuthToken {
    fn clone(&self) -> Self {
        Self::new(self.expose())
    }
}

impl PartialEq for AuthToken {
    fn eq(&self, other: &Self) -> bool {
        self.expose() == other.expose()
    }
}

impl Eq for AuthToken {}

impl fmt::Debug for AuthToken {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("AuthToken([REDACTED])")
    }
}
