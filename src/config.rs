use anyhow::{Context, Result};
use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub graph: GraphConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

/// Graph store connection configuration. The password is never stored in the
/// config file; it is resolved from the environment variable named here.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphConfig {
    #[serde(default = "default_graph_uri")]
    pub uri: String,
    #[serde(default = "default_graph_user")]
    pub user: String,
    #[serde(default = "default_password_env")]
    pub password_env: String,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            uri: default_graph_uri(),
            user: default_graph_user(),
            password_env: default_password_env(),
        }
    }
}

/// HTTP gateway configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_http_port")]
    pub port: u16,
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: default_http_port(),
            allowed_origins: vec![],
        }
    }
}

fn default_graph_uri() -> String {
    "bolt://localhost:7687".to_string()
}

fn default_graph_user() -> String {
    "neo4j".to_string()
}

fn default_password_env() -> String {
    "NEO4J_PASSWORD".to_string()
}

fn default_http_port() -> u16 {
    5000
}

impl Config {
    /// Load configuration from file
    ///
    /// Loads environment variables from .env file (if present) before loading config.
    /// Looks for config file in this order:
    /// 1. Path specified in MACSCOPE_CONFIG environment variable
    /// 2. ./config.toml in current directory
    pub fn load() -> Result<Self> {
        // Load .env file if it exists (ignore errors - file is optional)
        let _ = dotenv::dotenv();

        let config_path = std::env::var("MACSCOPE_CONFIG")
            .unwrap_or_else(|_| "config.toml".to_string());

        let config_str = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path))?;

        let config: Config = toml::from_str(&config_str).context("Failed to parse config.toml")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.graph.uri.is_empty() {
            anyhow::bail!("graph.uri must not be empty");
        }

        if !self.graph.uri.contains("://") {
            anyhow::bail!(
                "graph.uri must be a Bolt URI such as bolt://localhost:7687, got: {}",
                self.graph.uri
            );
        }

        if self.graph.user.is_empty() {
            anyhow::bail!("graph.user must not be empty");
        }

        // Check both environment variable and .env file (dotenv already loaded in Config::load)
        std::env::var(&self.graph.password_env).with_context(|| {
            format!(
                "Environment variable {} not set. Set it in your .env file or as an \
                 environment variable with the graph store password.",
                self.graph.password_env
            )
        })?;

        if self.http.port == 0 {
            anyhow::bail!("http.port must be greater than 0");
        }

        Ok(())
    }

    /// Resolve the graph store password from the configured environment variable.
    pub fn graph_password(&self) -> Result<String> {
        std::env::var(&self.graph.password_env)
            .with_context(|| format!("Environment variable {} not set", self.graph.password_env))
    }
}
