use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub host: String,
    pub port: u16,

    // Cluster sync
    pub cluster_flag: String,
    pub sync_enabled: bool,

    // Contract document
    pub contract_title: String,
    pub contract_version: String,
    pub contract_host: Option<String>,
    pub contract_base_path: String,
    pub default_scheme: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if exists

        Ok(Self {
            // Server
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "7878".to_string())
                .parse()
                .map_err(|_| ConfigError::Invalid("PORT"))?,

            // Cluster sync
            cluster_flag: env::var("CLUSTER_FLAG").unwrap_or_else(|_| "/nifi".to_string()),
            sync_enabled: env::var("SYNC_ENABLED")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .map_err(|_| ConfigError::Invalid("SYNC_ENABLED"))?,

            // Contract document
            contract_title: env::var("CONTRACT_TITLE")
                .unwrap_or_else(|_| "Published APIs".to_string()),
            contract_version: env::var("CONTRACT_VERSION").unwrap_or_else(|_| "1.0.0".to_string()),
            contract_host: env::var("CONTRACT_HOST").ok().filter(|h| !h.is_empty()),
            contract_base_path: env::var("CONTRACT_BASE_PATH").unwrap_or_else(|_| "/".to_string()),
            default_scheme: env::var("DEFAULT_SCHEME").unwrap_or_else(|_| "http".to_string()),
        })
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 7878,
            cluster_flag: "/nifi".to_string(),
            sync_enabled: false,
            contract_title: "Published APIs".to_string(),
            contract_version: "1.0.0".to_string(),
            contract_host: None,
            contract_base_path: "/".to_string(),
            default_scheme: "http".to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid environment variable: {0}")]
    Invalid(&'static str),
}
