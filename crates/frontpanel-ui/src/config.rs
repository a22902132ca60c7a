use std::{
    env, fs,
    io::Write,
    path::{Path, PathBuf},
    process,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::PanelError;

pub const CONFIG_FILENAME: &str = "panel_conf.json";
pub const ROOT_ENV: &str = "FRONTPANEL_ROOT";
pub const DEFAULT_ROOT: &str = "/var/lib/frontpanel";

/// State directory holding the config and logs: `$FRONTPANEL_ROOT`, then
/// `/var/lib/frontpanel` if it exists, then the working directory.
pub fn resolve_root() -> Result<PathBuf> {
    if let Ok(env_path) = env::var(ROOT_ENV) {
        if !env_path.trim().is_empty() {
            return Ok(PathBuf::from(env_path));
        }
    }

    let default = PathBuf::from(DEFAULT_ROOT);
    if default.exists() {
        return Ok(default);
    }

    env::current_dir().context("determining current directory")
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PanelConfig {
    #[serde(default)]
    pub devices: DeviceConfig,
    #[serde(default)]
    pub sensors: SensorPaths,
    #[serde(default)]
    pub fan: FanCalibration,
    #[serde(default)]
    pub knob: KnobCodes,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub commands: CommandConfig,
}

impl PanelConfig {
    pub fn path(root: &Path) -> PathBuf {
        root.join(CONFIG_FILENAME)
    }

    /// Load `<root>/panel_conf.json`, creating it with defaults on first boot.
    pub fn load(root: &Path) -> Result<Self> {
        let path = Self::path(root);
        if !path.exists() {
            let default = PanelConfig::default();
            default.save(&path)?;
            return Ok(default);
        }

        let contents =
            fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        let mut config: PanelConfig =
            serde_json::from_str(&contents).map_err(|err| PanelError::Config {
                path: path.clone(),
                reason: err.to_string(),
            })?;

        if config.normalize() {
            tracing::warn!("Repaired invalid values in {}", path.display());
            config.save(&path)?;
        }
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating config directory {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        let mut tmp = path.to_path_buf();
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(CONFIG_FILENAME);
        let now_ns = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|dur| dur.as_nanos())
            .unwrap_or(0);
        tmp.set_file_name(format!(".{filename}.tmp.{}.{}", process::id(), now_ns));

        let mut file = fs::File::create(&tmp)
            .with_context(|| format!("creating temp config {}", tmp.display()))?;
        file.write_all(json.as_bytes())
            .with_context(|| format!("writing temp config {}", tmp.display()))?;
        file.write_all(b"\n")
            .with_context(|| format!("writing newline to temp config {}", tmp.display()))?;
        file.sync_all()
            .with_context(|| format!("syncing temp config {}", tmp.display()))?;
        drop(file);

        fs::rename(&tmp, path).with_context(|| {
            format!(
                "renaming temp config {} -> {}",
                tmp.display(),
                path.display()
            )
        })?;
        Ok(())
    }

    /// Replace values that would stall or break the panel. Returns true if anything changed.
    pub fn normalize(&mut self) -> bool {
        let mut changed = false;
        changed |= self.timing.normalize();
        changed |= self.fan.normalize();
        changed |= self.commands.normalize();
        changed
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeviceConfig {
    #[serde(default = "DeviceConfig::default_hidraw")]
    pub display: PathBuf,
    #[serde(default = "DeviceConfig::default_hidraw")]
    pub knob: PathBuf,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            display: Self::default_hidraw(),
            knob: Self::default_hidraw(),
        }
    }
}

impl DeviceConfig {
    // The LCD and the knob share one HID interface.
    fn default_hidraw() -> PathBuf {
        PathBuf::from("/dev/hidraw0")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SensorPaths {
    #[serde(default = "SensorPaths::default_net_dir")]
    pub net_dir: PathBuf,
    #[serde(default = "SensorPaths::default_loadavg")]
    pub loadavg: PathBuf,
    #[serde(default = "SensorPaths::default_temperature")]
    pub temperature: PathBuf,
    #[serde(default = "SensorPaths::default_fan_pwm")]
    pub fan_pwm: PathBuf,
}

impl Default for SensorPaths {
    fn default() -> Self {
        Self {
            net_dir: Self::default_net_dir(),
            loadavg: Self::default_loadavg(),
            temperature: Self::default_temperature(),
            fan_pwm: Self::default_fan_pwm(),
        }
    }
}

impl SensorPaths {
    fn default_net_dir() -> PathBuf {
        PathBuf::from("/sys/class/net")
    }
    fn default_loadavg() -> PathBuf {
        PathBuf::from("/proc/loadavg")
    }
    fn default_temperature() -> PathBuf {
        PathBuf::from("/sys/class/thermal/thermal_zone0/temp")
    }
    fn default_fan_pwm() -> PathBuf {
        PathBuf::from("/sys/devices/platform/w83627ehf.656/hwmon/hwmon2/device/pwm2")
    }
}

/// Maps the raw PWM register onto a 0-100% fan duty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FanCalibration {
    #[serde(default = "FanCalibration::default_pwm_offset")]
    pub pwm_offset: f64,
    #[serde(default = "FanCalibration::default_pwm_max")]
    pub pwm_max: f64,
}

impl Default for FanCalibration {
    fn default() -> Self {
        Self {
            pwm_offset: Self::default_pwm_offset(),
            pwm_max: Self::default_pwm_max(),
        }
    }
}

impl FanCalibration {
    const fn default_pwm_offset() -> f64 {
        70.0
    }
    const fn default_pwm_max() -> f64 {
        255.0
    }

    fn normalize(&mut self) -> bool {
        if self.pwm_max.is_finite() && self.pwm_max > 0.0 && self.pwm_offset.is_finite() {
            return false;
        }
        *self = Self::default();
        true
    }
}

/// Byte values the knob reports at offset 2.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct KnobCodes {
    #[serde(default = "KnobCodes::default_press")]
    pub press: u8,
    #[serde(default = "KnobCodes::default_right")]
    pub right: u8,
    #[serde(default = "KnobCodes::default_left")]
    pub left: u8,
}

impl Default for KnobCodes {
    fn default() -> Self {
        Self {
            press: Self::default_press(),
            right: Self::default_right(),
            left: Self::default_left(),
        }
    }
}

impl KnobCodes {
    const fn default_press() -> u8 {
        58
    }
    const fn default_right() -> u8 {
        59
    }
    const fn default_left() -> u8 {
        60
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimingConfig {
    #[serde(default = "TimingConfig::default_rate_interval_ms")]
    pub rate_interval_ms: u64,
    #[serde(default = "TimingConfig::default_health_interval_ms")]
    pub health_interval_ms: u64,
    #[serde(default = "TimingConfig::default_grace_period_secs")]
    pub grace_period_secs: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            rate_interval_ms: Self::default_rate_interval_ms(),
            health_interval_ms: Self::default_health_interval_ms(),
            grace_period_secs: Self::default_grace_period_secs(),
        }
    }
}

impl TimingConfig {
    const fn default_rate_interval_ms() -> u64 {
        1_000
    }
    const fn default_health_interval_ms() -> u64 {
        5_000
    }
    const fn default_grace_period_secs() -> u64 {
        120
    }

    pub fn rate_interval(&self) -> Duration {
        Duration::from_millis(self.rate_interval_ms)
    }

    pub fn health_interval(&self) -> Duration {
        Duration::from_millis(self.health_interval_ms)
    }

    pub fn grace_period(&self) -> Duration {
        Duration::from_secs(self.grace_period_secs)
    }

    // A zero rate interval would divide by zero; a zero health interval spins.
    fn normalize(&mut self) -> bool {
        let mut changed = false;
        if self.rate_interval_ms == 0 {
            self.rate_interval_ms = Self::default_rate_interval_ms();
            changed = true;
        }
        if self.health_interval_ms == 0 {
            self.health_interval_ms = Self::default_health_interval_ms();
            changed = true;
        }
        changed
    }
}

/// Argument vectors for the external commands; element 0 is the program.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommandConfig {
    #[serde(default = "CommandConfig::default_version")]
    pub version: Vec<String>,
    #[serde(default = "CommandConfig::default_shutdown")]
    pub shutdown: Vec<String>,
    #[serde(default = "CommandConfig::default_reboot")]
    pub reboot: Vec<String>,
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            version: Self::default_version(),
            shutdown: Self::default_shutdown(),
            reboot: Self::default_reboot(),
        }
    }
}

impl CommandConfig {
    fn default_version() -> Vec<String> {
        vec!["/opt/vyatta/bin/vyatta-show-version".to_string()]
    }
    fn default_shutdown() -> Vec<String> {
        argv(&["/sbin/shutdown", "-h", "now"])
    }
    fn default_reboot() -> Vec<String> {
        argv(&["/sbin/shutdown", "-r", "now"])
    }

    fn normalize(&mut self) -> bool {
        let mut changed = false;
        if self.version.is_empty() {
            self.version = Self::default_version();
            changed = true;
        }
        if self.shutdown.is_empty() {
            self.shutdown = Self::default_shutdown();
            changed = true;
        }
        if self.reboot.is_empty() {
            self.reboot = Self::default_reboot();
            changed = true;
        }
        changed
    }
}

fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}
