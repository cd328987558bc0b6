use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub wiki: WikiConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3001".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            wiki: WikiConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Upstream encyclopedia API settings.
#[derive(Debug, Clone, PartialEq)]
pub struct WikiConfig {
    /// Endpoint template; `{lang}` is replaced with the request language.
    pub api_url: String,
    pub user_agent: String,
    pub timeout: Duration,
    pub default_lang: String,
    pub suggestion_limit: usize,
}

pub const DEFAULT_API_URL: &str = "https://{lang}.wikipedia.org/w/api.php";
pub const DEFAULT_USER_AGENT: &str = "WikiReliability/1.0 (+https://github.com/wikicred)";

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(15),
            default_lang: "en".to_string(),
            suggestion_limit: 8,
        }
    }
}

impl WikiConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let api_url = env::var("WIKI_API_URL").unwrap_or(defaults.api_url);
        let user_agent = env::var("WIKI_USER_AGENT").unwrap_or(defaults.user_agent);

        let timeout = match env::var("WIKI_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or(ConfigError::InvalidTimeout)?,
            Err(_) => defaults.timeout,
        };

        let default_lang = match env::var("WIKI_DEFAULT_LANG") {
            Ok(raw) => {
                let lang = raw.trim().to_ascii_lowercase();
                if !is_language_code(&lang) {
                    return Err(ConfigError::InvalidLanguage(raw));
                }
                lang
            }
            Err(_) => defaults.default_lang,
        };

        let suggestion_limit = match env::var("WIKI_SUGGESTION_LIMIT") {
            Ok(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|limit| *limit > 0)
                .ok_or(ConfigError::InvalidLimit)?,
            Err(_) => defaults.suggestion_limit,
        };

        Ok(Self {
            api_url,
            user_agent,
            timeout,
            default_lang,
            suggestion_limit,
        })
    }

    /// Endpoint for one language edition.
    pub fn endpoint(&self, lang: &str) -> String {
        self.api_url.replace("{lang}", lang)
    }
}

/// Language subdomains are lowercase ASCII letters and hyphens (`en`, `fi`, `zh-min-nan`).
pub fn is_language_code(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= 16
        && value
            .chars()
            .all(|ch| ch.is_ascii_lowercase() || ch == '-')
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidTimeout,
    InvalidLimit,
    InvalidLanguage(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidTimeout => {
                write!(f, "WIKI_TIMEOUT_SECS must be a positive number of seconds")
            }
            ConfigError::InvalidLimit => {
                write!(f, "WIKI_SUGGESTION_LIMIT must be a positive integer")
            }
            ConfigError::InvalidLanguage(value) => {
                write!(f, "WIKI_DEFAULT_LANG '{value}' is not a language code")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
