//! Configuration loading and defaults.
//!
//! TOML file with one section per concern. Every field has a default so a
//! missing file or a partial one still produces a runnable setup; `init`
//! writes the full default file for editing.
//!
//! ```toml
//! [app]
//! name = "Teenspace"
//! companion_name = "Katya"
//!
//! [storage]
//! data_dir = "./data"
//!
//! [energy]
//! max_energy = 100
//! regen_interval_secs = 60
//!
//! [progression]
//! xp_per_level = 500
//!
//! [logging]
//! level = "info"
//! ```

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::game::energy::EnergyConfig;
use crate::game::progress::ProgressConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub energy: EnergySection,
    #[serde(default)]
    pub progression: ProgressionSection,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub name: String,
    /// Display name of the chat companion.
    pub companion_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnergySection {
    pub max_energy: u32,
    pub regen_interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressionSection {
    pub xp_per_level: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "Teenspace".to_string(),
            companion_name: "Katya".to_string(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "./data".to_string(),
        }
    }
}

impl Default for EnergySection {
    fn default() -> Self {
        Self {
            max_energy: 100,
            regen_interval_secs: 60,
        }
    }
}

impl Default for ProgressionSection {
    fn default() -> Self {
        Self { xp_per_level: 500 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app: AppConfig::default(),
            storage: StorageConfig::default(),
            energy: EnergySection::default(),
            progression: ProgressionSection::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a file.
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        config.validate()?;
        Ok(config)
    }

    /// Create a default configuration file.
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.energy.max_energy == 0 {
            return Err(anyhow!("energy.max_energy must be at least 1"));
        }
        if self.energy.regen_interval_secs == 0 {
            return Err(anyhow!("energy.regen_interval_secs must be at least 1"));
        }
        if self.progression.xp_per_level == 0 {
            return Err(anyhow!("progression.xp_per_level must be at least 1"));
        }
        if self.storage.data_dir.trim().is_empty() {
            return Err(anyhow!("storage.data_dir must not be empty"));
        }
        Ok(())
    }

    pub fn energy_config(&self) -> EnergyConfig {
        EnergyConfig {
            max_energy: self.energy.max_energy,
            regen_interval_ms: (self.energy.regen_interval_secs as i64).saturating_mul(1000),
        }
    }

    pub fn progress_config(&self) -> ProgressConfig {
        ProgressConfig {
            xp_per_level: self.progression.xp_per_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.energy_config().regen_interval_ms, 60_000);
        assert_eq!(config.progress_config().xp_per_level, 500);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config: Config = toml::from_str("[energy]\nmax_energy = 50\nregen_interval_secs = 30\n")
            .unwrap();
        assert_eq!(config.energy.max_energy, 50);
        assert_eq!(config.app.companion_name, "Katya");
        assert_eq!(config.progression.xp_per_level, 500);
    }

    #[test]
    fn zero_interval_rejected() {
        let config: Config =
            toml::from_str("[energy]\nmax_energy = 100\nregen_interval_secs = 0\n").unwrap();
        assert!(config.validate().is_err());
    }
}
