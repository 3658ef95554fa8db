//! Node configuration types

use serde::{Deserialize, Serialize};
use vein_core::{BoostTerms, Result as CoreResult, VaultCatalog, VaultDefinition};
use vein_engine::MiningParams;

/// Complete node configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Node identity settings
    #[serde(default)]
    pub node: NodeSettings,

    /// Vault catalog source
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Platform economics (boost terms, mining coefficients)
    #[serde(default)]
    pub economics: EconomicsConfig,

    /// Batch job cadence
    #[serde(default)]
    pub jobs: JobsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl NodeConfig {
    /// Load a configuration file
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}

/// Basic node settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeSettings {
    /// Node name
    #[serde(default = "default_node_name")]
    pub name: String,
}

fn default_node_name() -> String {
    "vein-node".to_string()
}

impl Default for NodeSettings {
    fn default() -> Self {
        Self {
            name: default_node_name(),
        }
    }
}

/// Where the vault catalog comes from
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Use the built-in tier x duration table
    #[serde(default = "default_true")]
    pub builtin: bool,

    /// Explicit vault definitions (used when `builtin` is false)
    #[serde(default)]
    pub vaults: Vec<VaultDefinition>,
}

fn default_true() -> bool {
    true
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            builtin: true,
            vaults: Vec::new(),
        }
    }
}

impl CatalogConfig {
    /// Build and validate the catalog this configuration describes
    pub fn build(&self, terms: BoostTerms) -> CoreResult<VaultCatalog> {
        if self.builtin {
            Ok(VaultCatalog::builtin_with_terms(terms))
        } else {
            VaultCatalog::new(self.vaults.clone())
        }
    }
}

/// Platform-wide economic parameters
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EconomicsConfig {
    /// Boost terms applied to the built-in catalog
    #[serde(default)]
    pub boost: BoostTerms,

    /// Mining difficulty and issuance coefficients
    #[serde(default)]
    pub mining: MiningParams,
}

/// Batch job cadence and the activation delay
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JobsConfig {
    /// Hours between creation and activation eligibility
    #[serde(default = "default_activation_delay_hours")]
    pub activation_delay_hours: u64,

    /// Activation pass interval in seconds
    #[serde(default = "default_activation_interval")]
    pub activation_interval_secs: u64,

    /// Payout distribution pass interval in seconds
    #[serde(default = "default_payout_interval")]
    pub payout_interval_secs: u64,

    /// Completion pass interval in seconds
    #[serde(default = "default_completion_interval")]
    pub completion_interval_secs: u64,

    /// Difficulty refresh interval in seconds
    #[serde(default = "default_difficulty_interval")]
    pub difficulty_refresh_interval_secs: u64,
}

fn default_activation_delay_hours() -> u64 {
    72
}

fn default_activation_interval() -> u64 {
    3600 // hourly
}

fn default_payout_interval() -> u64 {
    6 * 3600 // every 6 hours
}

fn default_completion_interval() -> u64 {
    3600
}

fn default_difficulty_interval() -> u64 {
    3600
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            activation_delay_hours: default_activation_delay_hours(),
            activation_interval_secs: default_activation_interval(),
            payout_interval_secs: default_payout_interval(),
            completion_interval_secs: default_completion_interval(),
            difficulty_refresh_interval_secs: default_difficulty_interval(),
        }
    }
}

/// Logging configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: "text" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = NodeConfig::default();

        assert_eq!(config.node.name, "vein-node");
        assert!(config.catalog.builtin);
        assert_eq!(config.jobs.activation_delay_hours, 72);
        assert_eq!(config.jobs.payout_interval_secs, 6 * 3600);
        assert_eq!(config.economics.boost.valuation_multiplier, 2.0);
        assert_eq!(config.economics.mining.supply_cap, 210_000_000.0);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: NodeConfig = toml::from_str(
            r#"
            [node]
            name = "vein-testnet-1"

            [jobs]
            activation_delay_hours = 24
            "#,
        )
        .unwrap();

        assert_eq!(config.node.name, "vein-testnet-1");
        assert_eq!(config.jobs.activation_delay_hours, 24);
        // Untouched sections keep their defaults
        assert_eq!(config.jobs.payout_interval_secs, 6 * 3600);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_economics_override() {
        let config: NodeConfig = toml::from_str(
            r#"
            [economics.boost]
            valuation_multiplier = 1.5
            cap_fraction = 0.25

            [economics.mining]
            daily_rate_per_baseline = 5.0
            "#,
        )
        .unwrap();

        assert_eq!(config.economics.boost.valuation_multiplier, 1.5);
        assert_eq!(config.economics.mining.daily_rate_per_baseline, 5.0);
        // Remaining mining coefficients default
        assert_eq!(config.economics.mining.supply_weight, 4.0);
    }

    #[test]
    fn test_builtin_catalog_inherits_boost_terms() {
        let config: NodeConfig = toml::from_str(
            r#"
            [economics.boost]
            valuation_multiplier = 3.0
            "#,
        )
        .unwrap();

        let catalog = config.catalog.build(config.economics.boost).unwrap();
        for vault in catalog.all_vaults() {
            assert_eq!(vault.boost_terms.valuation_multiplier, 3.0);
        }
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [node]
            name = "from-file"
            "#
        )
        .unwrap();

        let config = NodeConfig::load(file.path()).unwrap();
        assert_eq!(config.node.name, "from-file");
    }
}
