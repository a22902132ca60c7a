//! Startup pruning of the panel's rolled log files.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use anyhow::{Context, Result};

use crate::config::LoggingConfig;

/// Disk budget shared by every panel log.
const MAX_TOTAL_BYTES: u64 = 32 * 1024 * 1024;
const LOG_STEMS: [&str; 3] = ["frontpanel.log", "device.log", "sensor.log"];

struct Rolled {
    path: PathBuf,
    modified: SystemTime,
    len: u64,
}

/// Remove panel logs older than `keep_days`, then the oldest of the rest until
/// they fit in [`MAX_TOTAL_BYTES`]. Returns how many files were removed.
pub fn run_retention(root: &Path, cfg: &LoggingConfig) -> Result<usize> {
    let mut logs = panel_logs(&root.join("logs"))?;
    logs.sort_by(|a, b| b.modified.cmp(&a.modified));

    let max_age = Duration::from_secs(cfg.keep_days.saturating_mul(24 * 60 * 60));
    let now = SystemTime::now();
    let mut kept_bytes = 0u64;
    let mut removed = 0;
    for log in logs {
        let age = now.duration_since(log.modified).unwrap_or_default();
        if age <= max_age && kept_bytes + log.len <= MAX_TOTAL_BYTES {
            kept_bytes += log.len;
            continue;
        }
        match fs::remove_file(&log.path) {
            Ok(()) => removed += 1,
            Err(err) => {
                tracing::warn!("Keeping {}, removal failed: {err}", log.path.display());
                kept_bytes += log.len;
            }
        }
    }
    if removed > 0 {
        tracing::info!(removed, "Pruned old panel logs");
    }
    Ok(removed)
}

fn panel_logs(dir: &Path) -> Result<Vec<Rolled>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(err).with_context(|| format!("listing {}", dir.display())),
    };

    let mut logs = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("listing {}", dir.display()))?;
        if !entry.file_name().to_str().is_some_and(is_panel_log) {
            continue;
        }
        let meta = entry
            .metadata()
            .with_context(|| format!("stat {}", entry.path().display()))?;
        if !meta.is_file() {
            continue;
        }
        logs.push(Rolled {
            path: entry.path(),
            modified: meta.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            len: meta.len(),
        });
    }
    Ok(logs)
}

/// `device.log` or a rolled `device.log.2026-10-18`.
fn is_panel_log(name: &str) -> bool {
    LOG_STEMS.iter().any(|stem| {
        name.strip_prefix(stem)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
    })
}
