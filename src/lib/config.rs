//! Build-time configuration for the API base URL with runtime overrides. Runtime
//! values are read from `COVER_*` environment variables (if present) so the same
//! binary can target another backend without rebuilding. Configuration values are
//! public; do not store secrets here.

use std::{env, str::FromStr, time::Duration};

/// Fallback used when neither the build nor the environment names a backend.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api";
/// Default request timeout applied by the gateway.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_TOKEN_KEY: &str = "token";
pub const DEFAULT_USER_KEY: &str = "user";

/// Whether a successful registration also signs the user in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RegisterMode {
    /// The register response carries a token and user; the session is set from it.
    AutoLogin,
    /// Registration only creates the account; the caller must `login` next.
    #[default]
    RequireLogin,
}

impl FromStr for RegisterMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "auto" | "auto-login" | "auto_login" => Ok(Self::AutoLogin),
            "require" | "require-login" | "require_login" | "manual" => Ok(Self::RequireLogin),
            other => Err(format!("invalid register mode: {other}")),
        }
    }
}

/// Backend paths, relative to the API base URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
    pub login: String,
    pub register: String,
    pub me: String,
    pub reset_password: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            login: "/auth/login".to_string(),
            register: "/auth/register".to_string(),
            me: "/auth/me".to_string(),
            reset_password: "/auth/reset-password".to_string(),
        }
    }
}

/// Client configuration derived from build-time values and runtime overrides.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_base_url: String,
    pub timeout: Duration,
    pub token_key: String,
    pub user_key: String,
    pub register_mode: RegisterMode,
    pub endpoints: Endpoints,
}

impl Default for AppConfig {
    fn default() -> Self {
        let api_base_url = option_env!("COVER_API_BASE_URL").unwrap_or(DEFAULT_API_BASE_URL);

        Self {
            api_base_url: api_base_url.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            token_key: DEFAULT_TOKEN_KEY.to_string(),
            user_key: DEFAULT_USER_KEY.to_string(),
            register_mode: RegisterMode::default(),
            endpoints: Endpoints::default(),
        }
    }
}

impl AppConfig {
    /// Loads build-time defaults and applies runtime overrides from the environment.
    #[must_use]
    pub fn load() -> Self {
        let mut config = Self::default();
        apply_runtime_overrides(&mut config, runtime_config());
        config
    }

    /// Returns a copy pointing at another backend, used by tests and the CLI.
    #[must_use]
    pub fn with_base_url(mut self, api_base_url: impl Into<String>) -> Self {
        self.api_base_url = api_base_url.into();
        self
    }

    #[must_use]
    pub fn with_register_mode(mut self, register_mode: RegisterMode) -> Self {
        self.register_mode = register_mode;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Default)]
struct RuntimeConfig {
    api_base_url: Option<String>,
    timeout_secs: Option<u64>,
    token_key: Option<String>,
    user_key: Option<String>,
    register_mode: Option<RegisterMode>,
}

fn apply_runtime_overrides(config: &mut AppConfig, runtime: RuntimeConfig) {
    if let Some(value) = runtime.api_base_url {
        config.api_base_url = value;
    }
    if let Some(value) = runtime.timeout_secs {
        config.timeout = Duration::from_secs(value);
    }
    if let Some(value) = runtime.token_key {
        config.token_key = value;
    }
    if let Some(value) = runtime.user_key {
        config.user_key = value;
    }
    if let Some(value) = runtime.register_mode {
        config.register_mode = value;
    }
}

fn runtime_config() -> RuntimeConfig {
    RuntimeConfig {
        api_base_url: read_runtime_value("COVER_API_BASE_URL"),
        timeout_secs: read_runtime_value("COVER_TIMEOUT_SECS")
            .and_then(|value| value.parse::<u64>().ok())
            .filter(|secs| *secs > 0),
        token_key: read_runtime_value("COVER_TOKEN_KEY"),
        user_key: read_runtime_value("COVER_USER_KEY"),
        register_mode: read_runtime_value("COVER_REGISTER_MODE")
            .and_then(|value| value.parse().ok()),
    }
}

fn read_runtime_value(key: &str) -> Option<String> {
    let value = env::var(key).ok()?;
    normalize_runtime_value(&value)
}

fn normalize_runtime_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{
        AppConfig, Endpoints, RegisterMode, RuntimeConfig, apply_runtime_overrides,
        normalize_runtime_value,
    };
    use std::time::Duration;

    fn base_config() -> AppConfig {
        AppConfig {
            api_base_url: "https://api.default".to_string(),
            timeout: Duration::from_secs(10),
            token_key: "token".to_string(),
            user_key: "user".to_string(),
            register_mode: RegisterMode::RequireLogin,
            endpoints: Endpoints::default(),
        }
    }

    #[test]
    fn normalize_runtime_value_trims_and_rejects_empty() {
        assert_eq!(normalize_runtime_value(""), None);
        assert_eq!(normalize_runtime_value("   "), None);
        assert_eq!(
            normalize_runtime_value("  https://api.cover.club "),
            Some("https://api.cover.club".to_string())
        );
    }

    #[test]
    fn apply_runtime_overrides_ignores_empty_values() {
        let mut config = base_config();
        let runtime = RuntimeConfig {
            api_base_url: normalize_runtime_value(""),
            token_key: normalize_runtime_value("  "),
            ..RuntimeConfig::default()
        };

        apply_runtime_overrides(&mut config, runtime);

        assert_eq!(config.api_base_url, "https://api.default");
        assert_eq!(config.token_key, "token");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.register_mode, RegisterMode::RequireLogin);
    }

    #[test]
    fn apply_runtime_overrides_overwrites_when_present() {
        let mut config = base_config();
        let runtime = RuntimeConfig {
            api_base_url: normalize_runtime_value("https://api.override"),
            timeout_secs: Some(3),
            token_key: normalize_runtime_value("cover_token"),
            user_key: normalize_runtime_value("cover_user"),
            register_mode: Some(RegisterMode::AutoLogin),
        };

        apply_runtime_overrides(&mut config, runtime);

        assert_eq!(config.api_base_url, "https://api.override");
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.token_key, "cover_token");
        assert_eq!(config.user_key, "cover_user");
        assert_eq!(config.register_mode, RegisterMode::AutoLogin);
    }

    #[test]
    fn load_reads_environment() {
        temp_env::with_vars(
            [
                ("COVER_API_BASE_URL", Some("https://api.env")),
                ("COVER_TIMEOUT_SECS", Some("0")),
                ("COVER_TOKEN_KEY", None),
                ("COVER_USER_KEY", None),
                ("COVER_REGISTER_MODE", Some("auto-login")),
            ],
            || {
                let config = AppConfig::load();
                assert_eq!(config.api_base_url, "https://api.env");
                // zero is rejected, the default stays
                assert_eq!(config.timeout, Duration::from_secs(10));
                assert_eq!(config.token_key, "token");
                assert_eq!(config.register_mode, RegisterMode::AutoLogin);
            },
        );
    }

    #[test]
    fn register_mode_parses_aliases() {
        assert_eq!("auto".parse::<RegisterMode>(), Ok(RegisterMode::AutoLogin));
        assert_eq!(
            " Require-Login ".parse::<RegisterMode>(),
            Ok(RegisterMode::RequireLogin)
        );
        assert!("sometimes".parse::<RegisterMode>().is_err());
    }
}
