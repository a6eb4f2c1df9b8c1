use std::{env, path::PathBuf, time::Duration};

#[derive(Clone, Debug)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub session_file: Option<PathBuf>,
    pub login_path: String,
}

impl Config {
    /// Loads a `.env` file if one exists, then reads the environment.
    pub fn load() -> Self {
        if let Err(e) = dotenvy::dotenv() {
            log::debug!("No .env file loaded: {}", e);
        }
        Self::from_env()
    }

    pub fn from_env() -> Self {
        Self {
            api_base_url: env::var("EDUSYNC_API_BASE_URL")
                .unwrap_or_else(|_| "https://localhost:7118".to_string()),
            request_timeout_secs: env::var("EDUSYNC_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
            session_file: env::var("EDUSYNC_SESSION_FILE")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            login_path: env::var("EDUSYNC_LOGIN_PATH").unwrap_or_else(|_| "/login".to_string()),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Base URL without a trailing slash, ready for `format!("{}{}", base, path)`.
    pub fn base_url(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:9".to_string(),
            request_timeout_secs: 5,
            session_file: None,
            login_path: "/login".to_string(),
        }
    }
}
