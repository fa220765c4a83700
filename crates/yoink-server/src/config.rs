use serde::Deserialize;

/// Top-level server configuration, loaded from `yoink.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    pub dictionary: DictionaryConfig,
    pub limits: LimitsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:5177".to_string(),
            dictionary: DictionaryConfig::default(),
            limits: LimitsConfig::default(),
        }
    }
}

/// Dictionary sources: text URLs, one word per line, case-insensitive.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DictionaryConfig {
    pub urls: Vec<String>,
    pub fetch_timeout_secs: u64,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            urls: Vec::new(),
            fetch_timeout_secs: 10,
        }
    }
}

/// Infrastructure limits (not game rules).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    pub max_ws_connections: usize,
    /// Bound on each player's outbound message buffer.
    pub player_message_buffer: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_ws_connections: 1024,
            player_message_buffer: 256,
        }
    }
}

impl ServerConfig {
    /// Validate configuration; exits on unusable values.
    pub fn validate(&self) {
        if self.listen_addr.parse::<std::net::SocketAddr>().is_err() {
            tracing::error!(
                addr = %self.listen_addr,
                "listen_addr is not a valid socket address"
            );
            std::process::exit(1);
        }
        if self.dictionary.fetch_timeout_secs == 0 {
            tracing::error!("dictionary.fetch_timeout_secs must be > 0");
            std::process::exit(1);
        }
        if self.limits.player_message_buffer == 0 {
            tracing::error!("limits.player_message_buffer must be > 0");
            std::process::exit(1);
        }
    }

    /// Load config from `yoink.toml` if it exists, then apply env overrides.
    pub fn load() -> Self {
        let mut config = match std::fs::read_to_string("yoink.toml") {
            Ok(content) => match toml::from_str::<ServerConfig>(&content) {
                Ok(cfg) => {
                    tracing::info!("Loaded configuration from yoink.toml");
                    cfg
                },
                Err(e) => {
                    tracing::warn!("Failed to parse yoink.toml: {e}, using defaults");
                    ServerConfig::default()
                },
            },
            Err(_) => {
                tracing::info!("No yoink.toml found, using defaults");
                ServerConfig::default()
            },
        };

        if let Ok(addr) = std::env::var("YOINK_LISTEN_ADDR")
            && !addr.is_empty()
        {
            config.listen_addr = addr;
        }
        if let Ok(urls) = std::env::var("YOINK_DICTIONARY_URLS")
            && !urls.is_empty()
        {
            config.dictionary.urls = urls
                .split(',')
                .map(|u| u.trim().to_string())
                .filter(|u| !u.is_empty())
                .collect();
        }

        config
    }
}
