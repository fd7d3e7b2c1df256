use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::domain::aggregation::bundles::{BundleMatcher, DEFAULT_APP_DIRS, DEFAULT_HELPER_TOKENS};
use crate::domain::value_objects::thresholds::ThresholdSet;

/// Top-level application configuration loaded from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub thresholds: ThresholdConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub aggregation: AggregationConfig,
}

/// General settings: ranking depth and sync staleness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_cloud_sync_max_age")]
    pub cloud_sync_max_age_days: f64,
}

/// Ladder boundaries for every classified metric.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdConfig {
    #[serde(default = "default_mem_warn")]
    pub mem_warn_percent: f64,
    #[serde(default = "default_mem_critical")]
    pub mem_critical_percent: f64,
    #[serde(default = "default_disk_warn")]
    pub disk_warn_percent: f64,
    #[serde(default = "default_disk_critical")]
    pub disk_critical_percent: f64,
    #[serde(default = "default_swap_warn")]
    pub swap_warn_mb: f64,
    #[serde(default = "default_swap_critical")]
    pub swap_critical_mb: f64,
    #[serde(default = "default_pageouts_warn")]
    pub pageouts_warn: f64,
    #[serde(default = "default_cpu_warn_factor")]
    pub cpu_load_warn_factor: f64,
    #[serde(default = "default_cpu_critical_factor")]
    pub cpu_load_critical_factor: f64,
    #[serde(default = "default_process_count_warn")]
    pub process_count_warn: f64,
    #[serde(default = "default_uptime_warn")]
    pub uptime_warn_days: f64,
    #[serde(default = "default_battery_warn")]
    pub battery_warn_percent: f64,
    #[serde(default = "default_battery_critical")]
    pub battery_critical_percent: f64,
    #[serde(default = "default_battery_cycles_warn")]
    pub battery_cycles_warn: f64,
    #[serde(default = "default_wifi_warn")]
    pub wifi_warn_dbm: f64,
    #[serde(default = "default_wifi_critical")]
    pub wifi_critical_dbm: f64,
    #[serde(default = "default_top_cpu_warn")]
    pub top_cpu_warn_percent: f64,
    #[serde(default = "default_helper_rss_warn")]
    pub helper_rss_warn_mb: f64,
    #[serde(default = "default_helper_rss_critical")]
    pub helper_rss_critical_mb: f64,
    #[serde(default = "default_firewall_off_states")]
    pub firewall_off_states: Vec<String>,
}

/// Location and toggle of the rolling last-run snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_history_path")]
    pub path: String,
}

/// Helper bundle grouping rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationConfig {
    #[serde(default = "default_app_dirs")]
    pub app_dirs: Vec<String>,
    #[serde(default = "default_helper_tokens")]
    pub helper_tokens: Vec<String>,
}

// --- Defaults ---

const fn default_top_k() -> usize {
    5
}

const fn default_cloud_sync_max_age() -> f64 {
    7.0
}

const fn default_mem_warn() -> f64 {
    75.0
}

const fn default_mem_critical() -> f64 {
    90.0
}

const fn default_disk_warn() -> f64 {
    80.0
}

const fn default_disk_critical() -> f64 {
    90.0
}

const fn default_swap_warn() -> f64 {
    1024.0
}

const fn default_swap_critical() -> f64 {
    4096.0
}

const fn default_pageouts_warn() -> f64 {
    100_000.0
}

const fn default_cpu_warn_factor() -> f64 {
    1.0
}

const fn default_cpu_critical_factor() -> f64 {
    2.0
}

const fn default_process_count_warn() -> f64 {
    1000.0
}

const fn default_uptime_warn() -> f64 {
    30.0
}

const fn default_battery_warn() -> f64 {
    20.0
}

const fn default_battery_critical() -> f64 {
    10.0
}

const fn default_battery_cycles_warn() -> f64 {
    1000.0
}

const fn default_wifi_warn() -> f64 {
    -70.0
}

const fn default_wifi_critical() -> f64 {
    -80.0
}

const fn default_top_cpu_warn() -> f64 {
    90.0
}

const fn default_helper_rss_warn() -> f64 {
    2048.0
}

const fn default_helper_rss_critical() -> f64 {
    4096.0
}

fn default_firewall_off_states() -> Vec<String> {
    vec!["disabled".into(), "off".into()]
}

const fn default_true() -> bool {
    true
}

// NOTE: Stored as raw string with tilde, expanded at point of use.
fn default_history_path() -> String {
    "~/.local/share/hostcheck/last_run.toml".into()
}

fn default_app_dirs() -> Vec<String> {
    DEFAULT_APP_DIRS.iter().map(ToString::to_string).collect()
}

fn default_helper_tokens() -> Vec<String> {
    DEFAULT_HELPER_TOKENS.iter().map(ToString::to_string).collect()
}

// --- Default impls ---

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            cloud_sync_max_age_days: default_cloud_sync_max_age(),
        }
    }
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            mem_warn_percent: default_mem_warn(),
            mem_critical_percent: default_mem_critical(),
            disk_warn_percent: default_disk_warn(),
            disk_critical_percent: default_disk_critical(),
            swap_warn_mb: default_swap_warn(),
            swap_critical_mb: default_swap_critical(),
            pageouts_warn: default_pageouts_warn(),
            cpu_load_warn_factor: default_cpu_warn_factor(),
            cpu_load_critical_factor: default_cpu_critical_factor(),
            process_count_warn: default_process_count_warn(),
            uptime_warn_days: default_uptime_warn(),
            battery_warn_percent: default_battery_warn(),
            battery_critical_percent: default_battery_critical(),
            battery_cycles_warn: default_battery_cycles_warn(),
            wifi_warn_dbm: default_wifi_warn(),
            wifi_critical_dbm: default_wifi_critical(),
            top_cpu_warn_percent: default_top_cpu_warn(),
            helper_rss_warn_mb: default_helper_rss_warn(),
            helper_rss_critical_mb: default_helper_rss_critical(),
            firewall_off_states: default_firewall_off_states(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            path: default_history_path(),
        }
    }
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            app_dirs: default_app_dirs(),
            helper_tokens: default_helper_tokens(),
        }
    }
}

// --- AppConfig methods ---

impl AppConfig {
    /// Load config from default path or create default config file
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be determined,
    /// the file cannot be read, or the TOML content is invalid.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_or_create(&path)
    }

    /// Load from a specific path, or create a default config file if missing
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML content is invalid,
    /// or the default config file cannot be written.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from(path)
        } else {
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Load from a specific path
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the TOML content is invalid.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).context("Failed to read config file")?;
        toml::from_str(&content).context("Failed to parse config file")
    }

    /// Save config to a specific path, creating parent directories if needed
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created,
    /// serialization fails, or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }

    /// Effective ladder boundaries, including the `[general]` sync cutoff.
    #[must_use]
    pub fn threshold_set(&self) -> ThresholdSet {
        ThresholdSet {
            cloud_sync_max_age_days: self.general.cloud_sync_max_age_days.max(0.0),
            ..ThresholdSet::from(&self.thresholds)
        }
    }

    /// Helper grouping rules with tilde-expanded application directories.
    #[must_use]
    pub fn bundle_matcher(&self) -> BundleMatcher {
        let app_dirs = self
            .aggregation
            .app_dirs
            .iter()
            .map(|dir| shellexpand::tilde(dir).into_owned())
            .collect();
        BundleMatcher::new(app_dirs, self.aggregation.helper_tokens.clone())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(config_dir.join("hostcheck").join("config.toml"))
    }
}

impl From<&ThresholdConfig> for ThresholdSet {
    fn from(config: &ThresholdConfig) -> Self {
        let defaults = Self::default();

        // Clamp percentages to valid range
        let mem_warning = config.mem_warn_percent.clamp(0.0, 100.0);
        let mem_critical = config.mem_critical_percent.clamp(0.0, 100.0);
        let disk_warning = config.disk_warn_percent.clamp(0.0, 100.0);
        let disk_critical = config.disk_critical_percent.clamp(0.0, 100.0);
        let battery_warning = config.battery_warn_percent.clamp(0.0, 100.0);
        let battery_critical = config.battery_critical_percent.clamp(0.0, 100.0);
        let top_cpu_warning = config.top_cpu_warn_percent.max(0.0);

        let swap_warning = config.swap_warn_mb.max(0.0);
        let helper_warning = config.helper_rss_warn_mb.max(0.0);
        let cpu_warning_factor = config.cpu_load_warn_factor.max(0.1);

        Self {
            mem_warning,
            mem_critical: mem_critical.max(mem_warning),
            disk_warning,
            disk_critical: disk_critical.max(disk_warning),
            swap_warning_mb: swap_warning,
            swap_critical_mb: config.swap_critical_mb.max(swap_warning),
            pageouts_warning: config.pageouts_warn.max(0.0),
            cpu_load_warning_factor: cpu_warning_factor,
            cpu_load_critical_factor: config.cpu_load_critical_factor.max(cpu_warning_factor),
            process_count_warning: config.process_count_warn.max(0.0),
            uptime_warning_days: config.uptime_warn_days.max(0.0),
            // Lower is worse: critical must not sit above warning
            battery_warning_pct: battery_warning,
            battery_critical_pct: battery_critical.min(battery_warning),
            battery_cycles_warning: config.battery_cycles_warn.max(0.0),
            wifi_warning_dbm: config.wifi_warn_dbm,
            wifi_critical_dbm: config.wifi_critical_dbm.min(config.wifi_warn_dbm),
            cloud_sync_max_age_days: defaults.cloud_sync_max_age_days,
            top_cpu_warning_pct: top_cpu_warning,
            helper_rss_warning_mb: helper_warning,
            helper_rss_critical_mb: config.helper_rss_critical_mb.max(helper_warning),
            firewall_off_states: config
                .firewall_off_states
                .iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }
}
