//! Reads interface counters and health sensors from sysfs/procfs.
//!
//! Every value lives in its own small text file. A missing file is a
//! [`PanelError::SensorRead`], which screens treat as "give up and go back to the
//! menu" (an interface can vanish mid-sample when a USB NIC is pulled).

use std::{
    fmt, fs,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use frontpanel_logging::targets::T_SENSOR;

use crate::{
    cancel::{cancel_sleep, CancelFlag},
    config::{FanCalibration, SensorPaths},
    error::{PanelError, Result},
};

/// Receive/transmit throughput in bits per second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateSample {
    pub rx_bps: f64,
    pub tx_bps: f64,
}

/// Raw byte counters at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteCounters {
    pub rx_bytes: u64,
    pub tx_bytes: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Up,
    Down,
}

impl fmt::Display for LinkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkState::Up => f.write_str("UP"),
            LinkState::Down => f.write_str("DOWN"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadAverage {
    pub one: f64,
    pub five: f64,
    pub fifteen: f64,
}

#[derive(Debug, Clone)]
pub struct SensorReader {
    paths: SensorPaths,
    fan: FanCalibration,
}

impl SensorReader {
    pub fn new(paths: SensorPaths, fan: FanCalibration) -> Self {
        Self { paths, fan }
    }

    fn iface_dir(&self, iface: &str) -> PathBuf {
        self.paths.net_dir.join(iface)
    }

    /// Interface names under the net class directory, sorted.
    pub fn list_interfaces(&self) -> Result<Vec<String>> {
        let dir = &self.paths.net_dir;
        let entries = fs::read_dir(dir).map_err(|err| PanelError::sensor_read(dir, err))?;
        let mut names: Vec<String> = entries
            .flatten()
            .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
            .collect();
        names.sort();
        Ok(names)
    }

    pub fn read_counters(&self, iface: &str) -> Result<ByteCounters> {
        let stats = self.iface_dir(iface).join("statistics");
        Ok(ByteCounters {
            rx_bytes: parse_value(&stats.join("rx_bytes"))?,
            tx_bytes: parse_value(&stats.join("tx_bytes"))?,
        })
    }

    /// Sample the counters twice, `interval` apart. The wait honours `cancel`.
    pub fn read_interface_rates(
        &self,
        iface: &str,
        interval: Duration,
        cancel: Option<&CancelFlag>,
    ) -> Result<RateSample> {
        let before = self.read_counters(iface)?;
        cancel_sleep(cancel, interval)?;
        let after = self.read_counters(iface)?;
        Ok(rate_between(iface, before, after, interval))
    }

    /// An unreadable carrier file means the link is administratively down.
    pub fn read_link_state(&self, iface: &str) -> LinkState {
        let path = self.iface_dir(iface).join("carrier");
        match parse_value::<u8>(&path) {
            Ok(0) => LinkState::Down,
            Ok(_) => LinkState::Up,
            Err(err) => {
                tracing::trace!(target: T_SENSOR, "carrier unreadable, reporting down: {err}");
                LinkState::Down
            }
        }
    }

    pub fn read_mac_address(&self, iface: &str) -> Result<String> {
        read_trimmed(&self.iface_dir(iface).join("address"))
    }

    pub fn read_load_average(&self) -> Result<LoadAverage> {
        let path = &self.paths.loadavg;
        let raw = read_trimmed(path)?;
        let mut fields = raw.split_whitespace().map(|field| field.parse::<f64>());
        let mut next = || match fields.next() {
            Some(Ok(value)) => Ok(value),
            _ => Err(PanelError::SensorParse {
                path: path.clone(),
                value: raw.clone(),
            }),
        };
        Ok(LoadAverage {
            one: next()?,
            five: next()?,
            fifteen: next()?,
        })
    }

    /// Degrees celsius; the thermal zone reports millidegrees.
    pub fn read_temperature(&self) -> Result<f64> {
        let milli: f64 = parse_value(&self.paths.temperature)?;
        Ok(milli / 1000.0)
    }

    /// Fan duty in percent, derived from the raw PWM register.
    pub fn read_fan_duty(&self) -> Result<f64> {
        let raw: f64 = parse_value(&self.paths.fan_pwm)?;
        Ok(fan_percent(raw, &self.fan))
    }
}

pub fn fan_percent(raw_pwm: f64, fan: &FanCalibration) -> f64 {
    (raw_pwm - fan.pwm_offset) / fan.pwm_max * 100.0
}

/// Bits per second between two counter readings. A counter that went backwards
/// (reset or wrap) reports zero for that direction.
pub fn rate_between(
    iface: &str,
    before: ByteCounters,
    after: ByteCounters,
    interval: Duration,
) -> RateSample {
    let secs = interval.as_secs_f64();
    if secs <= 0.0 {
        return RateSample {
            rx_bps: 0.0,
            tx_bps: 0.0,
        };
    }
    let delta = |name: &str, then: u64, now: u64| {
        if now < then {
            tracing::warn!(
                target: T_SENSOR,
                "{iface} {name} counter went backwards ({then} -> {now}), reporting 0"
            );
        }
        now.saturating_sub(then) as f64 * 8.0 / secs
    };
    RateSample {
        rx_bps: delta("rx_bytes", before.rx_bytes, after.rx_bytes),
        tx_bps: delta("tx_bytes", before.tx_bytes, after.tx_bytes),
    }
}

fn read_trimmed(path: &Path) -> Result<String> {
    let raw = fs::read_to_string(path).map_err(|err| PanelError::sensor_read(path, err))?;
    tracing::trace!(target: T_SENSOR, path = %path.display(), value = raw.trim(), "read");
    Ok(raw.trim().to_string())
}

fn parse_value<T: FromStr>(path: &Path) -> Result<T> {
    let raw = read_trimmed(path)?;
    raw.parse::<T>().map_err(|_| PanelError::SensorParse {
        path: path.to_path_buf(),
        value: raw,
    })
}
