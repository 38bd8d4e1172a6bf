//! # Sync Configuration
//!
//! TOML-backed configuration for the ERPNext connection, the store
//! identity embedded in outbound documents, and sync timing knobs.
//!
//! ## Load Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  1. Built-in defaults                                               │
//! │  2. mizan.toml from the platform config dir (if present)            │
//! │  3. Environment overrides: MIZAN_ERP_URL, MIZAN_ERP_API_KEY,        │
//! │     MIZAN_ERP_API_SECRET                                            │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{SyncError, SyncResult};

// =============================================================================
// Configuration Sections
// =============================================================================

/// ERPNext connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErpSettings {
    /// Base URL of the ERPNext instance, e.g. `https://erp.example.com`.
    pub base_url: String,

    /// API key half of the token pair.
    pub api_key: String,

    /// API secret half of the token pair.
    pub api_secret: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Store identity stamped onto outbound documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Legal seller name (tag 1 of the invoice QR payload).
    pub seller_name: String,

    /// 15-digit VAT registration number (tag 2).
    pub vat_number: String,

    /// Warehouse stock entries deduct from.
    #[serde(default = "default_warehouse")]
    pub warehouse: String,

    /// Stock unit of measure for stock entry rows.
    #[serde(default = "default_stock_uom")]
    pub stock_uom: String,

    /// Customer name used when a sale has no loyalty customer attached.
    #[serde(default = "default_walk_in_customer")]
    pub walk_in_customer: String,
}

/// Sync timing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncSettings {
    /// Delay before the one-shot catalog refresh that follows a
    /// successful sale sync.
    #[serde(default = "default_stock_refresh_delay_secs")]
    pub stock_refresh_delay_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_warehouse() -> String {
    "Stores - M".to_string()
}

fn default_stock_uom() -> String {
    "Nos".to_string()
}

fn default_walk_in_customer() -> String {
    "Walk-in Customer".to_string()
}

fn default_stock_refresh_delay_secs() -> u64 {
    5
}

// =============================================================================
// Top-Level Config
// =============================================================================

/// Complete sync configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    pub erp: ErpSettings,
    pub store: StoreSettings,
    #[serde(default)]
    pub sync: SyncSettings,
}

impl Default for ErpSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            api_key: String::new(),
            api_secret: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            seller_name: "Mizan Store".to_string(),
            vat_number: "310000000000003".to_string(),
            warehouse: default_warehouse(),
            stock_uom: default_stock_uom(),
            walk_in_customer: default_walk_in_customer(),
        }
    }
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            stock_refresh_delay_secs: default_stock_refresh_delay_secs(),
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            erp: ErpSettings::default(),
            store: StoreSettings::default(),
            sync: SyncSettings::default(),
        }
    }
}

impl SyncConfig {
    /// Platform config file path, e.g.
    /// `~/.config/mizan-pos/mizan.toml` on Linux.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("sa", "mizan", "mizan-pos")
            .map(|dirs| dirs.config_dir().join("mizan.toml"))
    }

    /// Loads from the given path, falling back to defaults when the file
    /// does not exist. Environment overrides apply in both cases.
    pub fn load_or_default(path: Option<&PathBuf>) -> SyncResult<Self> {
        let resolved = match path {
            Some(p) => Some(p.clone()),
            None => Self::default_path(),
        };

        let mut config = match resolved {
            Some(ref p) if p.exists() => {
                debug!(path = %p.display(), "Loading sync config");
                let raw = fs::read_to_string(p)?;
                toml::from_str(&raw)?
            }
            _ => {
                warn!("No config file found, using defaults");
                Self::default()
            }
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Writes the config as TOML, creating parent directories as needed.
    pub fn save(&self, path: &PathBuf) -> SyncResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(self)?;
        fs::write(path, raw)?;
        debug!(path = %path.display(), "Saved sync config");
        Ok(())
    }

    /// Environment variables beat the file so deployments can inject
    /// credentials without editing it.
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("MIZAN_ERP_URL") {
            self.erp.base_url = url;
        }
        if let Ok(key) = std::env::var("MIZAN_ERP_API_KEY") {
            self.erp.api_key = key;
        }
        if let Ok(secret) = std::env::var("MIZAN_ERP_API_SECRET") {
            self.erp.api_secret = secret;
        }
    }

    /// Validates the fields every outbound document depends on.
    pub fn validate(&self) -> SyncResult<()> {
        if !self.erp.base_url.starts_with("http://") && !self.erp.base_url.starts_with("https://")
        {
            return Err(SyncError::InvalidUrl(format!(
                "base_url must start with http:// or https://, got '{}'",
                self.erp.base_url
            )));
        }
        if self.erp.timeout_secs == 0 {
            return Err(SyncError::InvalidConfig(
                "timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.store.seller_name.trim().is_empty() {
            return Err(SyncError::InvalidConfig(
                "store.seller_name must not be empty".to_string(),
            ));
        }
        mizan_core::validation::validate_vat_number(&self.store.vat_number)
            .map_err(|e| SyncError::InvalidConfig(e.to_string()))?;
        if self.store.warehouse.trim().is_empty() {
            return Err(SyncError::InvalidConfig(
                "store.warehouse must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.erp.timeout_secs)
    }

    /// Delay before the post-sale catalog refresh.
    pub fn stock_refresh_delay(&self) -> Duration {
        Duration::from_secs(self.sync.stock_refresh_delay_secs)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        assert!(SyncConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_url_scheme() {
        let mut config = SyncConfig::default();
        config.erp.base_url = "ftp://erp.example.com".to_string();
        assert!(matches!(
            config.validate(),
            Err(SyncError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_rejects_bad_vat_number() {
        let mut config = SyncConfig::default();
        config.store.vat_number = "12345".to_string();
        assert!(matches!(
            config.validate(),
            Err(SyncError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let mut config = SyncConfig::default();
        config.erp.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = SyncConfig::default();
        let raw = toml::to_string_pretty(&config).unwrap();
        let parsed: SyncConfig = toml::from_str(&raw).unwrap();
        assert_eq!(parsed.erp.base_url, config.erp.base_url);
        assert_eq!(parsed.store.vat_number, config.store.vat_number);
        assert_eq!(
            parsed.sync.stock_refresh_delay_secs,
            config.sync.stock_refresh_delay_secs
        );
    }

    #[test]
    fn test_missing_sections_get_defaults() {
        let raw = r#"
            [erp]
            base_url = "https://erp.example.com"
            api_key = "k"
            api_secret = "s"

            [store]
            seller_name = "Mizan Store"
            vat_number = "310122393500003"
        "#;
        let config: SyncConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.erp.timeout_secs, 30);
        assert_eq!(config.store.walk_in_customer, "Walk-in Customer");
        assert_eq!(config.sync.stock_refresh_delay_secs, 5);
    }
}
