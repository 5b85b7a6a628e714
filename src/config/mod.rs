//! # Configuration Management
//!
//! TOML configuration for the BBS, organized into sections:
//!
//! - [`BbsSection`] - board identity (name, welcome text)
//! - [`SshSection`] - listener address, port and host key location
//! - [`StorageSection`] - data directory
//! - [`LoggingSection`] - level and optional log file
//!
//! ```toml
//! [bbs]
//! name = "Shell BBS"
//! welcome = "Welcome aboard."
//!
//! [ssh]
//! listen = "0.0.0.0"
//! port = 2222
//! host_key_path = "host_key"
//!
//! [storage]
//! data_dir = "./data"
//!
//! [logging]
//! level = "info"
//! ```
//!
//! All values carry serde defaults so a partial file loads cleanly;
//! `Config::load` validates the result before handing it out.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BbsSection {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_welcome")]
    pub welcome: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SshSection {
    #[serde(default = "default_listen")]
    pub listen: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Host private key location. Created on first run if absent; never
    /// regenerated while the file exists.
    #[serde(default = "default_host_key_path")]
    pub host_key_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSection {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoggingSection {
    #[serde(default)]
    pub level: Option<String>,
    /// Optional log file. When set, log lines go to the file and, if stdout
    /// is a terminal, to the console as well.
    #[serde(default)]
    pub file: Option<String>,
}

fn default_name() -> String {
    "Shell BBS".to_string()
}
fn default_welcome() -> String {
    "Welcome aboard.".to_string()
}
fn default_listen() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    2222
}
fn default_host_key_path() -> String {
    "host_key".to_string()
}
fn default_data_dir() -> String {
    "./data".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub bbs: BbsSection,
    pub ssh: SshSection,
    pub storage: StorageSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bbs: BbsSection {
                name: default_name(),
                welcome: default_welcome(),
            },
            ssh: SshSection {
                listen: default_listen(),
                port: default_port(),
                host_key_path: default_host_key_path(),
            },
            storage: StorageSection {
                data_dir: default_data_dir(),
            },
            logging: LoggingSection::default(),
        }
    }
}

impl Config {
    /// Load and validate configuration from a TOML file.
    pub async fn load(path: &str) -> Result<Config> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;
        let config: Config =
            toml::from_str(&content).map_err(|e| anyhow!("Invalid config file {}: {}", path, e))?;
        config.validate()?;
        Ok(config)
    }

    /// Write a default configuration file. Refuses to overwrite.
    pub async fn create_default(path: &str) -> Result<Config> {
        if fs::try_exists(path).await? {
            return Err(anyhow!("Config file {} already exists", path));
        }
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config)?;
        fs::write(path, serialized).await?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.bbs.name.trim().is_empty() {
            return Err(anyhow!("bbs.name must not be empty"));
        }
        if self.ssh.port == 0 {
            return Err(anyhow!("ssh.port must not be 0"));
        }
        if self.ssh.host_key_path.trim().is_empty() {
            return Err(anyhow!("ssh.host_key_path must not be empty"));
        }
        if self.storage.data_dir.trim().is_empty() {
            return Err(anyhow!("storage.data_dir must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Config;

    #[test]
    fn default_round_trips_through_toml() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.ssh.port, config.ssh.port);
        assert_eq!(back.storage.data_dir, config.storage.data_dir);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let config: Config = toml::from_str(
            "[bbs]\nname = \"Tiny Board\"\n[ssh]\nport = 2022\n[storage]\n",
        )
        .unwrap();
        assert_eq!(config.bbs.name, "Tiny Board");
        assert_eq!(config.ssh.port, 2022);
        assert_eq!(config.ssh.listen, "0.0.0.0");
        assert_eq!(config.storage.data_dir, "./data");
    }
}
