use serde::{Deserialize, Serialize};

/// Boundaries used to build the default threshold ladders.
///
/// Every `*_warning`/`*_critical` pair is inclusive on the lower bound unless
/// the field says otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSet {
    /// Memory usage percentage that triggers a warning
    pub mem_warning: f64,
    /// Memory usage percentage that triggers a critical finding
    pub mem_critical: f64,
    /// Disk usage percentage that triggers a warning
    pub disk_warning: f64,
    /// Disk usage percentage that triggers a critical finding
    pub disk_critical: f64,
    /// Swap in use (MB) that triggers a warning
    pub swap_warning_mb: f64,
    /// Swap in use (MB) that triggers a critical finding
    pub swap_critical_mb: f64,
    /// Cumulative pageouts that trigger a warning
    pub pageouts_warning: f64,
    /// Load is a warning above `cores * factor`, exclusive
    pub cpu_load_warning_factor: f64,
    /// Load is critical above `cores * factor`, exclusive
    pub cpu_load_critical_factor: f64,
    /// Process count that triggers a warning
    pub process_count_warning: f64,
    /// Uptime in days after which a reboot is recommended
    pub uptime_warning_days: f64,
    /// Battery charge at or below which a warning is raised
    pub battery_warning_pct: f64,
    /// Battery charge at or below which a critical finding is raised
    pub battery_critical_pct: f64,
    /// Battery cycle count that triggers a warning
    pub battery_cycles_warning: f64,
    /// Wi-Fi RSSI (dBm) below which a warning is raised, exclusive
    pub wifi_warning_dbm: f64,
    /// Wi-Fi RSSI (dBm) below which a critical finding is raised, exclusive
    pub wifi_critical_dbm: f64,
    /// Days without cloud sync activity before the sync counts as stalled
    pub cloud_sync_max_age_days: f64,
    /// CPU percentage of the single heaviest process that triggers a warning
    pub top_cpu_warning_pct: f64,
    /// Combined RSS (MB) of grouped helper processes that triggers a warning
    pub helper_rss_warning_mb: f64,
    /// Combined RSS (MB) of grouped helper processes that triggers a critical finding
    pub helper_rss_critical_mb: f64,
    /// Firewall states that count as disabled, case-insensitive
    pub firewall_off_states: Vec<String>,
}

impl Default for ThresholdSet {
    fn default() -> Self {
        Self {
            mem_warning: 75.0,
            mem_critical: 90.0,
            disk_warning: 80.0,
            disk_critical: 90.0,
            swap_warning_mb: 1024.0,
            swap_critical_mb: 4096.0,
            pageouts_warning: 100_000.0,
            cpu_load_warning_factor: 1.0,
            cpu_load_critical_factor: 2.0,
            process_count_warning: 1000.0,
            uptime_warning_days: 30.0,
            battery_warning_pct: 20.0,
            battery_critical_pct: 10.0,
            battery_cycles_warning: 1000.0,
            wifi_warning_dbm: -70.0,
            wifi_critical_dbm: -80.0,
            cloud_sync_max_age_days: 7.0,
            top_cpu_warning_pct: 90.0,
            helper_rss_warning_mb: 2048.0,
            helper_rss_critical_mb: 4096.0,
            firewall_off_states: vec!["disabled".into(), "off".into()],
        }
    }
}
