use sysinfo::{Disks, System};
use tracing::debug;

use crate::domain::entities::process::ProcessSample;
use crate::domain::ports::provider::{MetricProvider, ProcessLister, ProviderError};
use crate::domain::rules::metric;
use crate::domain::value_objects::metric::MetricValue;

const BYTES_PER_KB: u64 = 1024;
const BYTES_PER_MB: u64 = 1_048_576;
const SECS_PER_DAY: u64 = 86_400;

/// Filesystem types to exclude from disk metrics.
const PSEUDO_FILESYSTEMS: &[&str] = &[
    "tmpfs",
    "devtmpfs",
    "sysfs",
    "proc",
    "cgroup2",
    "overlay",
    "squashfs",
    "efivarfs",
    "devfs",
    "autofs",
];

/// Returns `(numerator / denominator) * 100.0`, or `0.0` when `denominator` is zero.
#[allow(clippy::cast_precision_loss)]
fn safe_percent(numerator: u64, denominator: u64) -> f64 {
    if denominator > 0 {
        (numerator as f64 / denominator as f64) * 100.0
    } else {
        0.0
    }
}

/// Whole percent used, truncated toward zero.
fn whole_percent(used: u64, total: u64) -> f64 {
    safe_percent(used, total).clamp(0.0, 100.0).trunc()
}

/// Best-effort provider backed by the `sysinfo` crate plus a few kernel files.
///
/// All data is sampled once in [`SysinfoProvider::new`]; reads afterwards are
/// pure lookups, so the engine always sees one consistent pass.
pub struct SysinfoProvider {
    sys: System,
    disks: Disks,
}

impl SysinfoProvider {
    /// Samples the host. Blocks for sysinfo's minimum CPU interval so that
    /// per-process CPU usage is meaningful.
    #[must_use]
    pub fn new() -> Self {
        let mut sys = System::new_all();
        std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
        sys.refresh_all();
        Self {
            sys,
            disks: Disks::new_with_refreshed_list(),
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn disk_pct(&self) -> Option<f64> {
        let real: Vec<_> = self
            .disks
            .iter()
            .filter(|d| {
                let fs = d.file_system().to_string_lossy();
                !PSEUDO_FILESYSTEMS.iter().any(|&pseudo| fs == pseudo) && d.total_space() > 0
            })
            .collect();
        // Prefer the root volume, fall back to the largest one
        let disk = real
            .iter()
            .find(|d| d.mount_point() == std::path::Path::new("/"))
            .or_else(|| real.iter().max_by_key(|d| d.total_space()))?;
        let used = disk.total_space().saturating_sub(disk.available_space());
        Some(whole_percent(used, disk.total_space()))
    }
}

impl Default for SysinfoProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricProvider for SysinfoProvider {
    #[allow(clippy::cast_precision_loss)]
    fn read(&self, name: &str) -> Result<Option<MetricValue>, ProviderError> {
        let value = match name {
            metric::MEM_PCT => {
                let total = self.sys.total_memory();
                if total == 0 {
                    return Err(ProviderError::Unavailable(name.into()));
                }
                Some(whole_percent(self.sys.used_memory(), total))
            }
            metric::SWAP_MB => Some((self.sys.used_swap() / BYTES_PER_MB) as f64),
            metric::CPU_LOAD => Some(System::load_average().one),
            metric::CPU_CORES => Some(self.sys.cpus().len() as f64),
            metric::DISK_PCT => self.disk_pct(),
            metric::PROCESSES => Some(self.sys.processes().len() as f64),
            metric::UPTIME_DAYS => Some((System::uptime() / SECS_PER_DAY) as f64),
            metric::PAGEOUTS => kernel::pageouts(),
            metric::BATTERY_PCT => kernel::battery_attribute("capacity"),
            metric::BATTERY_CYCLES => kernel::battery_attribute("cycle_count"),
            metric::WIFI_RSSI => kernel::wifi_rssi(),
            _ => None,
        };
        debug!(metric = name, ?value, "sysinfo read");
        Ok(value.map(MetricValue::Number))
    }
}

impl ProcessLister for SysinfoProvider {
    fn processes(&self) -> Result<Vec<ProcessSample>, ProviderError> {
        let mut samples: Vec<ProcessSample> = self
            .sys
            .processes()
            .values()
            .map(|proc_info| {
                let cmdline = proc_info
                    .cmd()
                    .iter()
                    .map(|s| s.to_string_lossy().to_string())
                    .collect::<Vec<_>>()
                    .join(" ");
                let identity = if cmdline.is_empty() {
                    proc_info.exe().map_or_else(
                        || proc_info.name().to_string_lossy().to_string(),
                        |p| p.to_string_lossy().to_string(),
                    )
                } else {
                    cmdline
                };
                ProcessSample {
                    identity,
                    pid: proc_info.pid().as_u32(),
                    cpu_pct: f64::from(proc_info.cpu_usage()),
                    rss_kb: proc_info.memory() / BYTES_PER_KB,
                }
            })
            .collect();
        // The process table is a hash map; order by pid so runs are reproducible
        samples.sort_by_key(|s| s.pid);
        Ok(samples)
    }
}

/// Linux kernel interfaces. Other platforms report these metrics as absent.
mod kernel {
    #[cfg(target_os = "linux")]
    const VMSTAT: &str = "/proc/vmstat";
    #[cfg(target_os = "linux")]
    const WIRELESS: &str = "/proc/net/wireless";
    #[cfg(target_os = "linux")]
    const POWER_SUPPLY: &str = "/sys/class/power_supply";

    /// Value of `key` in `/proc/vmstat`-style `key value` lines.
    #[cfg_attr(not(target_os = "linux"), allow(dead_code))]
    pub(super) fn parse_vmstat(content: &str, key: &str) -> Option<f64> {
        content.lines().find_map(|line| {
            let (k, v) = line.split_once(' ')?;
            (k == key).then(|| v.trim().parse::<f64>().ok()).flatten()
        })
    }

    /// Signal level (dBm) of the first interface in `/proc/net/wireless`.
    #[cfg_attr(not(target_os = "linux"), allow(dead_code))]
    pub(super) fn parse_wireless(content: &str) -> Option<f64> {
        content
            .lines()
            .skip(2)
            .find_map(|line| line.split_whitespace().nth(3))
            .and_then(|level| level.trim_end_matches('.').parse::<f64>().ok())
    }

    #[cfg(target_os = "linux")]
    pub(super) fn pageouts() -> Option<f64> {
        let content = std::fs::read_to_string(VMSTAT).ok()?;
        parse_vmstat(&content, "pswpout")
    }

    #[cfg(target_os = "linux")]
    pub(super) fn wifi_rssi() -> Option<f64> {
        let content = std::fs::read_to_string(WIRELESS).ok()?;
        parse_wireless(&content)
    }

    #[cfg(target_os = "linux")]
    pub(super) fn battery_attribute(attribute: &str) -> Option<f64> {
        std::fs::read_dir(POWER_SUPPLY)
            .ok()?
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().starts_with("BAT"))
            .find_map(|e| std::fs::read_to_string(e.path().join(attribute)).ok())
            .and_then(|raw| raw.trim().parse::<f64>().ok())
    }

    #[cfg(not(target_os = "linux"))]
    pub(super) const fn pageouts() -> Option<f64> {
        None
    }

    #[cfg(not(target_os = "linux"))]
    pub(super) const fn wifi_rssi() -> Option<f64> {
        None
    }

    #[cfg(not(target_os = "linux"))]
    pub(super) const fn battery_attribute(_attribute: &str) -> Option<f64> {
        None
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn parse_vmstat_finds_key() {
        let content = "nr_free_pages 1234\npswpin 10\npswpout 42\n";
        assert_eq!(kernel::parse_vmstat(content, "pswpout"), Some(42.0));
        assert_eq!(kernel::parse_vmstat(content, "missing"), None);
    }

    #[test]
    fn parse_wireless_reads_level() {
        let content = "Inter-| sta-|   Quality        |   Discarded packets\n face | tus | link level noise |  nwid  crypt\n wlp2s0: 0000   54.  -56.  -256        0      0\n";
        assert_eq!(kernel::parse_wireless(content), Some(-56.0));
        assert_eq!(kernel::parse_wireless("header\nheader\n"), None);
    }

    #[test]
    fn safe_percent_handles_zero() {
        assert!(safe_percent(5, 0).abs() < f64::EPSILON);
        assert!((safe_percent(1, 4) - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn whole_percent_truncates_toward_lower_rung() {
        assert!((whole_percent(8995, 10_000) - 89.0).abs() < f64::EPSILON);
        assert!((whole_percent(9000, 10_000) - 90.0).abs() < f64::EPSILON);
        assert!((whole_percent(20, 10) - 100.0).abs() < f64::EPSILON);
        assert!(whole_percent(1, 0).abs() < f64::EPSILON);
    }

    #[test]
    fn reads_core_metrics_from_live_host() {
        let provider = SysinfoProvider::new();
        let mem = provider
            .read(metric::MEM_PCT)
            .expect("mem read")
            .and_then(|v| v.as_number())
            .expect("mem present");
        assert!((0.0..=100.0).contains(&mem));
        let cores = provider
            .read(metric::CPU_CORES)
            .expect("cores read")
            .and_then(|v| v.as_number())
            .expect("cores present");
        assert!(cores >= 1.0);
        assert!(provider.read("no_such_metric").expect("read").is_none());
    }

    #[test]
    fn lists_own_process() {
        let provider = SysinfoProvider::new();
        let samples = provider.processes().expect("processes");
        let my_pid = std::process::id();
        assert!(samples.iter().any(|s| s.pid == my_pid));
        assert!(samples.windows(2).all(|w| w[0].pid <= w[1].pid));
    }
}
