use crate::cost::PricingModel;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub aws: AwsConfig,
    pub pricing: PricingModel,
    pub advisor: AdvisorConfig,
    pub tagging: TaggingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AwsConfig {
    /// Region override (falls back to the SDK default chain)
    pub region: Option<String>,
    /// Named profile from ~/.aws/config
    pub profile: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    /// Tables to analyze when none are given on the command line (empty = all)
    pub tables: Vec<String>,
    /// Days between today and the exclusive end of the lookback window
    pub end_date_offset_days: u32,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            tables: Vec::new(),
            end_date_offset_days: 1,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaggingConfig {
    pub dry_run: bool,
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = if let Some(p) = path {
            p.to_path_buf()
        } else {
            // Try .hygienectl.toml in current dir, then ~/.config/hygienectl/config.toml
            let local = PathBuf::from(".hygienectl.toml");
            if local.exists() {
                local
            } else {
                dirs::config_dir()
                    .map(|d| d.join("hygienectl").join("config.toml"))
                    .unwrap_or_else(|| PathBuf::from(".hygienectl.toml"))
            }
        };

        let config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config: {}", config_path.display()))?;
            toml::from_str::<Config>(&content).with_context(|| {
                let mut err = format!("Failed to parse config: {}", config_path.display());
                err.push_str("\n  Common issues:");
                err.push_str("\n    - Invalid TOML syntax");
                err.push_str("\n    - Incorrect value types (prices are floats)");
                err.push_str("\n  Tip: Run 'hygienectl init' to create a new config file");
                err
            })?
        } else {
            if path.is_some() {
                tracing::warn!(
                    "Config file not found: {}, using default configuration",
                    config_path.display()
                );
            }
            Config::default()
        };

        config.pricing.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }
}

pub fn init_config(output: &Path) -> Result<()> {
    let config = Config::default();
    config.save(output)?;
    println!("Created config file: {}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.aws.region.is_none());
        assert_eq!(config.advisor.end_date_offset_days, 1);
        assert!(config.advisor.tables.is_empty());
        assert!(!config.tagging.dry_run);
        assert_eq!(config.pricing, PricingModel::default());
    }

    #[test]
    fn test_config_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test_config.toml");

        let mut config = Config::default();
        config.advisor.tables = vec!["orders".to_string()];
        config.pricing.on_demand_write_request = 0.000001;
        assert!(config.save(&config_path).is_ok());
        assert!(config_path.exists());

        let loaded = Config::load(Some(&config_path)).unwrap();
        assert_eq!(loaded.advisor.tables, vec!["orders".to_string()]);
        assert_eq!(loaded.pricing.on_demand_write_request, 0.000001);
    }

    #[test]
    fn test_config_load_nonexistent() {
        let temp_dir = TempDir::new().unwrap();
        let fake_path = temp_dir.path().join("nonexistent.toml");

        let config = Config::load(Some(&fake_path)).unwrap();
        assert_eq!(config.advisor.end_date_offset_days, 1);
    }

    #[test]
    fn test_config_load_partial() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("partial.toml");
        std::fs::write(&config_path, "[aws]\nregion = \"eu-west-1\"\n").unwrap();

        let config = Config::load(Some(&config_path)).unwrap();
        assert_eq!(config.aws.region.as_deref(), Some("eu-west-1"));
        assert_eq!(config.pricing, PricingModel::default());
    }

    #[test]
    fn test_config_load_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("invalid.toml");
        std::fs::write(&config_path, "invalid toml content {").unwrap();

        assert!(Config::load(Some(&config_path)).is_err());
    }

    #[test]
    fn test_config_load_rejects_negative_price() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("negative.toml");
        std::fs::write(&config_path, "[pricing]\nprovisioned_write_unit_hour = -0.1\n").unwrap();

        assert!(Config::load(Some(&config_path)).is_err());
    }

    #[test]
    fn test_init_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("init_test.toml");

        assert!(init_config(&config_path).is_ok());
        assert!(config_path.exists());

        let config = Config::load(Some(&config_path)).unwrap();
        assert_eq!(config.advisor.end_date_offset_days, 1);
    }
}
