use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the panel's sensor, device and command layers.
///
/// Sensor errors are transient: a screen that hits one gives up its refresh and
/// the user lands back in the menu. Device errors mean the display or knob itself
/// is gone and nothing on the panel can recover from that.
#[derive(Error, Debug)]
pub enum PanelError {
    #[error("Failed to read sensor {path}: {source}")]
    SensorRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Unexpected value {value:?} in sensor {path}")]
    SensorParse { path: PathBuf, value: String },

    #[error("Panel device {path} failed: {source}")]
    Device {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to run '{program}': {source}")]
    Command {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Invalid panel config {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    #[error("Operation cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, PanelError>;

impl PanelError {
    pub fn sensor_read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        PanelError::SensorRead {
            path: path.into(),
            source,
        }
    }

    pub fn device(path: impl Into<PathBuf>, source: io::Error) -> Self {
        PanelError::Device {
            path: path.into(),
            source,
        }
    }

    /// True for failures a screen may swallow by returning to the menu.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PanelError::SensorRead { .. } | PanelError::SensorParse { .. } | PanelError::Cancelled
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sensor_errors_are_transient() {
        let err = PanelError::sensor_read(
            "/sys/class/net/eth9/statistics/rx_bytes",
            io::Error::from(io::ErrorKind::NotFound),
        );
        assert!(err.is_transient());
        assert!(err.to_string().contains("eth9"));
    }

    #[test]
    fn device_errors_are_fatal() {
        let err = PanelError::device("/dev/hidraw0", io::Error::from(io::ErrorKind::BrokenPipe));
        assert!(!err.is_transient());
    }
}
