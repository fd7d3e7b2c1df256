use std::collections::BTreeMap;

use super::ladder::{ConfigurationError, Predicate, ThresholdLadder};
use crate::domain::value_objects::metric::{Metric, MetricValue};
use crate::domain::value_objects::severity::Severity;
use crate::domain::value_objects::thresholds::ThresholdSet;

/// Names of the metrics the default catalog knows how to classify.
pub mod metric {
    pub const MEM_PCT: &str = "mem_pct";
    pub const CPU_LOAD: &str = "cpu_load";
    pub const CPU_CORES: &str = "cpu_cores";
    pub const DISK_PCT: &str = "disk_pct";
    pub const SWAP_MB: &str = "swap_mb";
    pub const PAGEOUTS: &str = "pageouts";
    pub const PROCESSES: &str = "processes";
    pub const UPTIME_DAYS: &str = "uptime_days";
    pub const BATTERY_PCT: &str = "battery_pct";
    pub const BATTERY_CYCLES: &str = "battery_cycles";
    pub const WIFI_RSSI: &str = "wifi_rssi";
    pub const FIREWALL: &str = "firewall";
    /// RFC 3339 time of the last cloud sync activity, as text
    pub const CLOUD_SYNC_LAST_ACTIVITY: &str = "cloud_sync_last_activity";
    pub const CLOUD_SYNC_AGE_DAYS: &str = "cloud_sync_age_days";
    pub const TOP_CPU_PCT: &str = "top_cpu_pct";
    pub const HELPER_RSS_MB: &str = "helper_rss_mb";

    /// Display unit rendered into finding messages.
    #[must_use]
    pub fn unit(name: &str) -> Option<&'static str> {
        match name {
            MEM_PCT | DISK_PCT | BATTERY_PCT | TOP_CPU_PCT => Some("%"),
            SWAP_MB | HELPER_RSS_MB => Some("MB"),
            WIFI_RSSI => Some("dBm"),
            _ => None,
        }
    }
}

/// Wraps a reading as a [`Metric`] with the unit known for `name`.
#[must_use]
pub fn measured(name: &str, value: impl Into<MetricValue>) -> Metric {
    let reading = Metric::new(name, value);
    match metric::unit(name) {
        Some(unit) => reading.with_unit(unit),
        None => reading,
    }
}

/// Metrics read straight from the provider, in report order.
pub const PROVIDED_METRICS: &[&str] = &[
    metric::MEM_PCT,
    metric::DISK_PCT,
    metric::SWAP_MB,
    metric::PAGEOUTS,
    metric::PROCESSES,
    metric::UPTIME_DAYS,
    metric::BATTERY_PCT,
    metric::BATTERY_CYCLES,
    metric::WIFI_RSSI,
    metric::FIREWALL,
];

/// Integer part of a load average, the unit the CPU load ladder works in.
#[must_use]
pub fn load_int(load: f64) -> f64 {
    load.trunc()
}

/// Immutable set of ladders built once per run from the configured thresholds.
#[derive(Debug, Clone)]
pub struct LadderCatalog {
    ladders: BTreeMap<String, ThresholdLadder>,
    thresholds: ThresholdSet,
}

impl LadderCatalog {
    /// Builds every static ladder.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if any ladder fails validation.
    pub fn from_thresholds(thresholds: &ThresholdSet) -> Result<Self, ConfigurationError> {
        let t = thresholds;
        let ladders = vec![
            ThresholdLadder::numeric(metric::MEM_PCT)
                .rung(Predicate::AtLeast(t.mem_critical), Severity::Critical, "Memory usage critical: {value}{unit}")
                .rung(Predicate::AtLeast(t.mem_warning), Severity::Warning, "Memory usage high: {value}{unit}")
                .otherwise(Severity::Ok, "Memory usage normal: {value}{unit}")
                .remediation("Purge inactive memory", "sudo purge")
                .build()?,
            ThresholdLadder::numeric(metric::DISK_PCT)
                .rung(Predicate::AtLeast(t.disk_critical), Severity::Critical, "Startup disk almost full: {value}{unit} used")
                .rung(Predicate::AtLeast(t.disk_warning), Severity::Warning, "Startup disk filling up: {value}{unit} used")
                .otherwise(Severity::Ok, "Startup disk usage fine: {value}{unit} used")
                .remediation("Empty the trash", "rm -rf ~/.Trash/*")
                .build()?,
            ThresholdLadder::numeric(metric::SWAP_MB)
                .rung(Predicate::AtLeast(t.swap_critical_mb), Severity::Critical, "Heavy swapping: {value} {unit} of swap in use")
                .rung(Predicate::AtLeast(t.swap_warning_mb), Severity::Warning, "Swap in use: {value} {unit}")
                .otherwise(Severity::Ok, "Swap usage low: {value} {unit}")
                .build()?,
            ThresholdLadder::numeric(metric::PAGEOUTS)
                .rung(Predicate::AtLeast(t.pageouts_warning), Severity::Warning, "High pageout count: {value}")
                .otherwise(Severity::Ok, "Pageouts: {value}")
                .build()?,
            ThresholdLadder::numeric(metric::PROCESSES)
                .rung(Predicate::AtLeast(t.process_count_warning), Severity::Warning, "Unusually many processes: {value}")
                .otherwise(Severity::Ok, "Process count: {value}")
                .build()?,
            ThresholdLadder::numeric(metric::UPTIME_DAYS)
                .rung(Predicate::AtLeast(t.uptime_warning_days), Severity::Warning, "Up for {value} days, a reboot is recommended")
                .otherwise(Severity::Ok, "Uptime: {value} days")
                .build()?,
            ThresholdLadder::numeric(metric::BATTERY_PCT)
                .rung(Predicate::AtMost(t.battery_critical_pct), Severity::Critical, "Battery nearly empty: {value}{unit}")
                .rung(Predicate::AtMost(t.battery_warning_pct), Severity::Warning, "Battery low: {value}{unit}")
                .otherwise(Severity::Ok, "Battery charge: {value}{unit}")
                .build()?,
            ThresholdLadder::numeric(metric::BATTERY_CYCLES)
                .rung(Predicate::AtLeast(t.battery_cycles_warning), Severity::Warning, "Battery worn: {value} charge cycles")
                .otherwise(Severity::Ok, "Battery cycles: {value}")
                .build()?,
            ThresholdLadder::numeric(metric::WIFI_RSSI)
                .rung(Predicate::Below(t.wifi_critical_dbm), Severity::Critical, "Wi-Fi signal very weak: {value} {unit}")
                .rung(Predicate::Below(t.wifi_warning_dbm), Severity::Warning, "Wi-Fi signal weak: {value} {unit}")
                .otherwise(Severity::Ok, "Wi-Fi signal good: {value} {unit}")
                .build()?,
            ThresholdLadder::text(metric::FIREWALL)
                .rung(Predicate::OneOf(t.firewall_off_states.clone()), Severity::Warning, "Firewall is disabled")
                .otherwise(Severity::Ok, "Firewall: {value}")
                .remediation(
                    "Enable the application firewall",
                    "sudo /usr/libexec/ApplicationFirewall/socketfilterfw --setglobalstate on",
                )
                .build()?,
            ThresholdLadder::numeric(metric::CLOUD_SYNC_AGE_DAYS)
                .rung(Predicate::AtLeast(t.cloud_sync_max_age_days), Severity::Warning, "Cloud sync looks stalled: no activity for {value} days")
                .otherwise(Severity::Ok, "Cloud sync active {value} days ago")
                .build()?,
            ThresholdLadder::numeric(metric::TOP_CPU_PCT)
                .rung(Predicate::AtLeast(t.top_cpu_warning_pct), Severity::Warning, "A single process is using {value}{unit} CPU")
                .otherwise(Severity::Ok, "Heaviest process CPU: {value}{unit}")
                .build()?,
            ThresholdLadder::numeric(metric::HELPER_RSS_MB)
                .rung(Predicate::AtLeast(t.helper_rss_critical_mb), Severity::Critical, "App helper processes hold {value} {unit}")
                .rung(Predicate::AtLeast(t.helper_rss_warning_mb), Severity::Warning, "App helper processes hold {value} {unit}")
                .otherwise(Severity::Ok, "App helper processes hold {value} {unit}")
                .build()?,
        ];

        Ok(Self {
            ladders: ladders
                .into_iter()
                .map(|l| (l.metric().to_string(), l))
                .collect(),
            thresholds: thresholds.clone(),
        })
    }

    #[must_use]
    pub fn get(&self, metric_name: &str) -> Option<&ThresholdLadder> {
        self.ladders.get(metric_name)
    }

    /// CPU load ladder for a host with `cores` logical cores.
    ///
    /// The value classified is [`load_int`] of the load average and both
    /// boundaries are exclusive: `> cores * critical_factor` is Critical,
    /// `> cores * warning_factor` is Warning.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if the ladder fails validation.
    pub fn cpu_load(&self, cores: u32) -> Result<ThresholdLadder, ConfigurationError> {
        let cores = f64::from(cores.max(1));
        let critical = cores * self.thresholds.cpu_load_critical_factor;
        let warning = cores * self.thresholds.cpu_load_warning_factor;
        ThresholdLadder::numeric(metric::CPU_LOAD)
            .rung(Predicate::Above(critical), Severity::Critical, "CPU overloaded: load {value}")
            .rung(Predicate::Above(warning), Severity::Warning, "CPU busy: load {value}")
            .otherwise(Severity::Ok, "CPU load normal: {value}")
            .build()
    }
}
