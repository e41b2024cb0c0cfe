//! Test configuration builder for creating test configs programmatically

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

use server::config::Config;

/// Builder for creating test configurations
pub struct TestConfigBuilder {
    config: Config,
}

impl TestConfigBuilder {
    /// Create a new test config builder with test-friendly defaults
    pub fn new() -> Self {
        let config = Config {
            sweep_secret: "test-sweep-secret".to_string(),
            sweep_interval_seconds: 0,
            app_url: "http://localhost:8095".to_string(),
            ..Config::default()
        };
        Self { config }
    }

    pub fn sweep_secret(mut self, secret: &str) -> Self {
        self.config.sweep_secret = secret.to_string();
        self
    }

    pub fn monitor_quota(mut self, quota: i64) -> Self {
        self.config.max_monitors_per_user = quota;
        self
    }

    pub fn max_concurrent_checks(mut self, max: usize) -> Self {
        self.config.max_concurrent_checks = max;
        self
    }

    pub fn app_url(mut self, url: &str) -> Self {
        self.config.app_url = url.to_string();
        self
    }

    pub fn resend_api_key(mut self, key: &str) -> Self {
        self.config.resend_api_key = Some(key.to_string());
        self
    }

    pub fn with_user(mut self, user_id: &str, email: &str) -> Self {
        self.config
            .users
            .insert(user_id.to_string(), email.to_string());
        self
    }

    pub fn build(self) -> Arc<Config> {
        Arc::new(self.config)
    }

    /// Write the config as main.toml into a temp directory, for exercising
    /// the file-loading path through ConfigManager.
    pub fn build_on_disk(self) -> TestConfigDir {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_dir = temp_dir.path().join("config");
        fs::create_dir_all(&config_dir).expect("Failed to create config dir");

        let toml = toml::to_string_pretty(&self.config).expect("Failed to serialize config");
        fs::write(config_dir.join("main.toml"), toml).expect("Failed to write main.toml");

        TestConfigDir {
            _temp_dir: temp_dir,
            config_dir,
        }
    }
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Built on-disk test configuration with temp directory
pub struct TestConfigDir {
    _temp_dir: TempDir,
    pub config_dir: PathBuf,
}

impl TestConfigDir {
    pub fn config_dir(&self) -> &PathBuf {
        &self.config_dir
    }
}
