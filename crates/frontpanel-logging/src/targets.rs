//! Tracing targets that get their own log file.

/// Raw display packets and knob reports.
pub const T_DEVICE: &str = "device";
/// Sysfs and procfs sensor reads.
pub const T_SENSOR: &str = "sensor";
