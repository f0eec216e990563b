use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Main configuration structure for the curator client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub chat: ChatConfig,
    pub studio: StudioConfig,
    pub notices: NoticeConfig,
    pub directory: DirectoryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the curator backend, e.g. `http://localhost:8000`.
    pub base_url: String,
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Conversation list page length.
    pub page_size: usize,
    /// Conversations kept before auto-prune deletes the oldest.
    pub retention_limit: usize,
    /// Cadence of the task status poll.
    pub poll_interval_ms: u64,
    /// Fixed first line of every transcript.
    pub welcome_message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudioConfig {
    pub poll_interval_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoticeConfig {
    /// How long a transient notice stays visible.
    pub ttl_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Path to the museum directory JSON document, if one is installed.
    pub data_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                base_url: "http://localhost:8000".to_string(),
                request_timeout_seconds: 30,
            },
            chat: ChatConfig {
                page_size: 5,
                retention_limit: 10,
                poll_interval_ms: 2000,
                welcome_message:
                    "Hello! I am the gallery curator. Ask me about the collection, or describe \
                     an image to create."
                        .to_string(),
            },
            studio: StudioConfig {
                poll_interval_ms: 2000,
            },
            notices: NoticeConfig { ttl_ms: 3000 },
            directory: DirectoryConfig { data_path: None },
        }
    }
}

impl Config {
    /// Load configuration from file with environment variable overrides.
    /// Always returns a usable config - never fails.
    pub fn load() -> Self {
        // .env discovery: current directory first, then the parent (the
        // client is often started from a subdirectory of a checkout).
        let env_paths = [".env", "../.env"];
        let mut env_loaded = false;
        for path in &env_paths {
            if dotenvy::from_path(path).is_ok() {
                tracing::info!("Loaded .env from: {}", path);
                env_loaded = true;
                break;
            }
        }
        if !env_loaded {
            tracing::debug!("No .env file found - continuing with process env only");
        }

        let config_path =
            env::var("CURATOR_CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());

        let mut config = if Path::new(&config_path).exists() {
            match fs::read_to_string(&config_path) {
                Ok(contents) => match serde_yaml::from_str::<Config>(&contents) {
                    Ok(config) => {
                        tracing::info!("Loaded configuration from {}", config_path);
                        config
                    }
                    Err(e) => {
                        tracing::error!(
                            "Failed to parse config file {}: {} - using defaults",
                            config_path,
                            e
                        );
                        Self::default()
                    }
                },
                Err(e) => {
                    tracing::error!(
                        "Failed to read config file {}: {} - using defaults",
                        config_path,
                        e
                    );
                    Self::default()
                }
            }
        } else {
            tracing::debug!("Config file not found at {} - using defaults", config_path);
            Self::default()
        };

        config.apply_env_overrides();

        // Validate configuration - log warnings but don't fail
        if let Err(e) = config.validate() {
            tracing::warn!("Config validation warnings: {} - continuing anyway", e);
        }

        config
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(base_url) = env::var("CURATOR_BASE_URL") {
            self.server.base_url = base_url;
        }
        if let Ok(timeout) = env::var("CURATOR_REQUEST_TIMEOUT_SECONDS") {
            if let Ok(secs) = timeout.parse() {
                self.server.request_timeout_seconds = secs;
            }
        }

        if let Ok(page_size) = env::var("CURATOR_PAGE_SIZE") {
            if let Ok(size) = page_size.parse() {
                self.chat.page_size = size;
            }
        }
        if let Ok(limit) = env::var("CURATOR_RETENTION_LIMIT") {
            if let Ok(n) = limit.parse() {
                self.chat.retention_limit = n;
            }
        }
        if let Ok(interval) = env::var("CURATOR_POLL_INTERVAL_MS") {
            if let Ok(ms) = interval.parse() {
                self.chat.poll_interval_ms = ms;
            }
        }
        if let Ok(welcome) = env::var("CURATOR_WELCOME_MESSAGE") {
            self.chat.welcome_message = welcome;
        }

        if let Ok(interval) = env::var("CURATOR_STUDIO_POLL_INTERVAL_MS") {
            if let Ok(ms) = interval.parse() {
                self.studio.poll_interval_ms = ms;
            }
        }

        if let Ok(ttl) = env::var("CURATOR_NOTICE_TTL_MS") {
            if let Ok(ms) = ttl.parse() {
                self.notices.ttl_ms = ms;
            }
        }

        if let Ok(path) = env::var("CURATOR_MUSEUM_DATA") {
            self.directory.data_path = Some(path);
        }
    }

    /// Validate configuration
    fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        if self.server.base_url.is_empty() {
            return Err("Server base_url cannot be empty".into());
        }
        if self.chat.page_size == 0 {
            return Err("Chat page_size cannot be 0".into());
        }
        if self.chat.retention_limit == 0 {
            return Err("Chat retention_limit cannot be 0".into());
        }
        if self.chat.poll_interval_ms == 0 {
            return Err("Chat poll_interval_ms cannot be 0".into());
        }
        if self.studio.poll_interval_ms == 0 {
            return Err("Studio poll_interval_ms cannot be 0".into());
        }
        Ok(())
    }

    pub fn chat_poll_interval(&self) -> Duration {
        Duration::from_millis(self.chat.poll_interval_ms)
    }

    pub fn studio_poll_interval(&self) -> Duration {
        Duration::from_millis(self.studio.poll_interval_ms)
    }

    pub fn notice_ttl(&self) -> Duration {
        Duration::from_millis(self.notices.ttl_ms)
    }
}
