use config::{Config, Environment};

const DEFAULT_GEMINI_MODEL: &str = "gemini-3-flash-preview";
const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub environment: String,
    pub frontend_urls: Vec<String>,
    pub session_secret: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub ai_timeout_secs: u64,
    pub session_idle_minutes: u64,
    pub max_sessions: usize,
}

#[derive(Debug)]
pub enum ConfigError {
    MissingVariable(String),
    InvalidFormat(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingVariable(var) => write!(f, "Missing environment variable: {}", var),
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid format: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::InvalidFormat(err.to_string())
    }
}

fn optional_string(settings: &Config, key: &str) -> Option<String> {
    settings
        .get_string(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let settings = Config::builder()
            .add_source(Environment::default())
            .build()?;

        Self::from_settings(&settings)
    }

    /// Reads lower-cased keys (`server_port`, `session_secret`, ...) from any config source.
    pub fn from_settings(settings: &Config) -> Result<Self, ConfigError> {
        let session_secret = optional_string(settings, "session_secret")
            .ok_or_else(|| ConfigError::MissingVariable("SESSION_SECRET".to_string()))?;

        let environment =
            optional_string(settings, "environment").unwrap_or_else(|| "development".to_string());

        let port = optional_string(settings, "server_port")
            .unwrap_or_else(|| "8080".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidFormat("SERVER_PORT must be a valid port number".to_string()))?;

        let ai_timeout_secs = optional_string(settings, "ai_timeout_secs")
            .unwrap_or_else(|| "20".to_string())
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or_else(|| ConfigError::InvalidFormat("AI_TIMEOUT_SECS must be a positive number of seconds".to_string()))?;

        let session_idle_minutes = optional_string(settings, "session_idle_minutes")
            .unwrap_or_else(|| "120".to_string())
            .parse::<u64>()
            .ok()
            .filter(|minutes| *minutes > 0)
            .ok_or_else(|| ConfigError::InvalidFormat("SESSION_IDLE_MINUTES must be a positive number of minutes".to_string()))?;

        let max_sessions = optional_string(settings, "max_sessions")
            .unwrap_or_else(|| "1000".to_string())
            .parse::<usize>()
            .ok()
            .filter(|max| *max > 0)
            .ok_or_else(|| ConfigError::InvalidFormat("MAX_SESSIONS must be a positive number".to_string()))?;

        // Parse allowed origins
        let frontend_urls = optional_string(settings, "cors_allowed_origins")
            .unwrap_or_else(|| "http://localhost:3000".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(AppConfig {
            port,
            environment,
            frontend_urls,
            session_secret,
            gemini_api_key: optional_string(settings, "gemini_api_key"),
            gemini_model: optional_string(settings, "gemini_model")
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_base_url: optional_string(settings, "gemini_base_url")
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            ai_timeout_secs,
            session_idle_minutes,
            max_sessions,
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(pairs: &[(&str, &str)]) -> Config {
        let mut builder = Config::builder();
        for (key, value) in pairs {
            builder = builder.set_override(*key, *value).unwrap();
        }
        builder.build().unwrap()
    }

    #[test]
    fn applies_defaults_around_the_required_secret() {
        let config = AppConfig::from_settings(&settings(&[("session_secret", "s3cret")])).unwrap();

        assert_eq!(config.port, 8080);
        assert!(config.is_development());
        assert_eq!(config.frontend_urls, ["http://localhost:3000"]);
        assert_eq!(config.gemini_api_key, None);
        assert_eq!(config.gemini_model, DEFAULT_GEMINI_MODEL);
        assert_eq!(config.ai_timeout_secs, 20);
        assert_eq!(config.session_idle_minutes, 120);
        assert_eq!(config.max_sessions, 1000);
    }

    #[test]
    fn secret_is_required() {
        let err = AppConfig::from_settings(&settings(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVariable(var) if var == "SESSION_SECRET"));
    }

    #[test]
    fn rejects_malformed_numbers() {
        let err = AppConfig::from_settings(&settings(&[
            ("session_secret", "s3cret"),
            ("server_port", "eighty"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFormat(_)));

        let err = AppConfig::from_settings(&settings(&[
            ("session_secret", "s3cret"),
            ("ai_timeout_secs", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFormat(_)));

        let err = AppConfig::from_settings(&settings(&[
            ("session_secret", "s3cret"),
            ("max_sessions", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFormat(_)));
    }

    #[test]
    fn splits_origins_and_blank_key_counts_as_missing() {
        let config = AppConfig::from_settings(&settings(&[
            ("session_secret", "s3cret"),
            ("cors_allowed_origins", "http://a.test, http://b.test,"),
            ("gemini_api_key", "  "),
            ("environment", "production"),
        ]))
        .unwrap();

        assert_eq!(config.frontend_urls, ["http://a.test", "http://b.test"]);
        assert_eq!(config.gemini_api_key, None);
        assert!(!config.is_development());
    }
}
