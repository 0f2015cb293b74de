use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;
use std::time::Duration;

use crate::ai::{Agent, RandomAgent, TreeSearchAgent, DEFAULT_DEPTH};
use crate::error::ConfigError;
use crate::game::{Player, COLS, ROWS};

pub const DEFAULT_PORT: u16 = 4444;

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// flexi_logger spec, e.g. `"info"` or `"info, connect_four::ai=debug"`.
    pub log_level: String,
    pub server: ServerConfig,
    pub client: ClientConfig,
    pub bot: BotConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            log_level: "info".to_string(),
            server: ServerConfig::default(),
            client: ClientConfig::default(),
            bot: BotConfig::default(),
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Delay before a finished game is reset.
    pub reset_delay_ms: u64,
    pub io_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            reset_delay_ms: 8000,
            io_timeout_ms: 5000,
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn reset_delay(&self) -> Duration {
        Duration::from_millis(self.reset_delay_ms)
    }

    pub fn io_timeout(&self) -> Duration {
        Duration::from_millis(self.io_timeout_ms)
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub host: IpAddr,
    pub port: u16,
    pub player: Player,
    pub poll_interval_ms: u64,
    pub io_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            player: Player::One,
            poll_interval_ms: 1000,
            io_timeout_ms: 5000,
        }
    }
}

impl ClientConfig {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn io_timeout(&self) -> Duration {
        Duration::from_millis(self.io_timeout_ms)
    }
}

/// Which agent drives the bot client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Depth-limited tree search
    Tree,
    /// Uniformly random legal moves
    Random,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Search horizon in plies.
    pub search_depth: u32,
    pub strategy: Strategy,
    /// Seed for tie-breaking; random when unset.
    pub seed: Option<u64>,
}

impl Default for BotConfig {
    fn default() -> Self {
        BotConfig {
            search_depth: DEFAULT_DEPTH,
            strategy: Strategy::Tree,
            seed: None,
        }
    }
}

impl BotConfig {
    pub fn build_agent(&self) -> Box<dyn Agent> {
        match (self.strategy, self.seed) {
            (Strategy::Tree, Some(seed)) => {
                Box::new(TreeSearchAgent::new(self.search_depth).with_seed(seed))
            }
            (Strategy::Tree, None) => Box::new(TreeSearchAgent::new(self.search_depth)),
            (Strategy::Random, Some(seed)) => Box::new(RandomAgent::with_seed(seed)),
            (Strategy::Random, None) => Box::new(RandomAgent::new()),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            // Logging is not up yet; it is configured from this file.
            eprintln!("Warning: config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.log_level.trim().is_empty() {
            return Err(ConfigError::Validation("log_level must not be empty".into()));
        }
        if self.server.port == 0 {
            return Err(ConfigError::Validation("server.port must be > 0".into()));
        }
        if self.server.io_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "server.io_timeout_ms must be > 0".into(),
            ));
        }
        if self.client.port == 0 {
            return Err(ConfigError::Validation("client.port must be > 0".into()));
        }
        if self.client.poll_interval_ms == 0 {
            return Err(ConfigError::Validation(
                "client.poll_interval_ms must be > 0".into(),
            ));
        }
        if self.client.io_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "client.io_timeout_ms must be > 0".into(),
            ));
        }
        if self.bot.search_depth as usize > ROWS * COLS {
            return Err(ConfigError::Validation(format!(
                "bot.search_depth must be <= {}",
                ROWS * COLS
            )));
        }
        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&AppConfig::default()).unwrap_or_default()
    }
}
