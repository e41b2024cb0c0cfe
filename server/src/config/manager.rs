// File: server/src/config/manager.rs
use super::Config;
use anyhow::{anyhow, Result};
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info};

pub struct ConfigManager {
    current_config: Arc<Config>,
}

impl ConfigManager {
    pub async fn new(config_dir: String) -> Result<Self> {
        let config = Self::load_configuration(&config_dir).await?;
        Ok(Self {
            current_config: Arc::new(config),
        })
    }

    pub fn get_current_config(&self) -> Arc<Config> {
        self.current_config.clone()
    }

    async fn load_configuration(config_dir: &str) -> Result<Config> {
        let main_config_path = format!("{}/main.toml", config_dir);

        let mut config: Config = match fs::read_to_string(&main_config_path).await {
            Ok(content) => toml::from_str(&content)
                .map_err(|e| anyhow!("Failed to parse {}: {}", main_config_path, e))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(
                    "No config file at {}, using defaults with env overrides",
                    main_config_path
                );
                Config::default()
            }
            Err(e) => {
                return Err(anyhow!("Failed to read {}: {}", main_config_path, e));
            }
        };

        // Secrets come from the environment when present, never logged
        if let Ok(secret) = std::env::var("SWEEP_SECRET") {
            if !secret.is_empty() {
                config.sweep_secret = secret;
                debug!("Sweep secret taken from SWEEP_SECRET");
            }
        }
        if let Ok(key) = std::env::var("RESEND_API_KEY") {
            if !key.is_empty() {
                config.resend_api_key = Some(key);
                debug!("Resend API key taken from RESEND_API_KEY");
            }
        }
        if let Ok(path) = std::env::var("DATABASE_PATH") {
            if !path.is_empty() {
                config.database_path = path;
            }
        }

        if config.sweep_secret.is_empty() {
            return Err(anyhow!(
                "No sweep secret configured. Set 'sweep_secret' in {} or export SWEEP_SECRET",
                main_config_path
            ));
        }

        Ok(config)
    }
}
