use crate::{
    app_lib::{AppConfig, FileStore},
    features::auth::SessionManager,
    routes::Navigator,
};
use anyhow::Result;
use directories::ProjectDirs;
use std::{path::PathBuf, sync::Arc, time::Duration};

/// Settings shared by every subcommand.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub api_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub session_file: PathBuf,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(session_file: PathBuf) -> Self {
        Self {
            api_url: None,
            timeout_secs: None,
            session_file,
        }
    }

    /// Environment-derived config with command line flags applied on top.
    #[must_use]
    pub fn config(&self) -> AppConfig {
        let mut config = AppConfig::load();
        if let Some(api_url) = &self.api_url {
            config = config.with_base_url(api_url.clone());
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        config
    }

    /// Session manager backed by the session file.
    /// # Errors
    /// Returns an error if the API base URL is invalid.
    pub fn session(
        &self,
        config: &AppConfig,
        navigator: Arc<dyn Navigator>,
    ) -> Result<SessionManager> {
        let storage = Arc::new(FileStore::new(self.session_file.clone()));
        Ok(SessionManager::new(config, storage, navigator)?)
    }
}

/// Per-user location of the session file, if the platform has one.
#[must_use]
pub fn default_session_file() -> Option<PathBuf> {
    ProjectDirs::from("club", "cover", "cover").map(|dirs| dirs.data_local_dir().join("session.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_args() {
        let args = GlobalArgs::new(PathBuf::from("/tmp/cover-session.json"));
        assert_eq!(args.session_file, PathBuf::from("/tmp/cover-session.json"));
        assert!(args.api_url.is_none());
        assert!(args.timeout_secs.is_none());
    }

    #[test]
    fn test_flags_override_environment() {
        temp_env::with_vars(
            [
                ("COVER_API_BASE_URL", Some("https://env.cover.club/api")),
                ("COVER_TIMEOUT_SECS", Some("30")),
            ],
            || {
                let mut args = GlobalArgs::new(PathBuf::from("/tmp/cover-session.json"));
                let config = args.config();
                assert_eq!(config.api_base_url, "https://env.cover.club/api");
                assert_eq!(config.timeout, Duration::from_secs(30));

                args.api_url = Some("https://flag.cover.club/api".to_string());
                args.timeout_secs = Some(5);
                let config = args.config();
                assert_eq!(config.api_base_url, "https://flag.cover.club/api");
                assert_eq!(config.timeout, Duration::from_secs(5));
            },
        );
    }

    #[test]
    fn test_session_rejects_bad_url() {
        let args = GlobalArgs::new(PathBuf::from("/tmp/cover-session.json"));
        let config = AppConfig::default().with_base_url("localhost:3000");
        let history = Arc::new(crate::routes::History::default());
        assert!(args.session(&config, history).is_err());
    }
}
