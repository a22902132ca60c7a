//! `config/logging.json`: whether to log, at what level, and for how long.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "LoggingConfig::default_enabled")]
    pub enabled: bool,
    /// An `EnvFilter` directive, e.g. `info` or `info,device=trace`.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,
    #[serde(default = "LoggingConfig::default_keep_days")]
    pub keep_days: u64,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: Self::default_enabled(),
            level: Self::default_level(),
            keep_days: Self::default_keep_days(),
        }
    }
}

impl LoggingConfig {
    fn default_enabled() -> bool {
        true
    }

    fn default_level() -> String {
        "info".to_string()
    }

    // The panel runs on small flash storage, keep a week.
    fn default_keep_days() -> u64 {
        7
    }

    pub fn path(root: &Path) -> PathBuf {
        root.join("config").join("logging.json")
    }

    /// Never fails: a missing file is seeded with the defaults and an unreadable
    /// or malformed one is replaced by them in memory.
    pub fn load(root: &Path) -> Self {
        let path = Self::path(root);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                let cfg = Self::default();
                if let Err(err) = cfg.save(root) {
                    eprintln!("frontpanel: cannot seed {}: {err:#}", path.display());
                }
                return cfg;
            }
            Err(err) => {
                eprintln!("frontpanel: cannot read {}: {err}", path.display());
                return Self::default();
            }
        };
        serde_json::from_str(&text).unwrap_or_else(|err| {
            eprintln!("frontpanel: ignoring malformed {}: {err}", path.display());
            Self::default()
        })
    }

    /// Replace the file atomically so the watcher never sees half a document.
    pub fn save(&self, root: &Path) -> Result<()> {
        let path = Self::path(root);
        let dir = path.parent().unwrap_or(root);
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

        let staged = path.with_extension("json.tmp");
        let body = serde_json::to_vec_pretty(self).context("encoding logging config")?;
        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        std::os::unix::fs::OpenOptionsExt::mode(&mut options, 0o600);

        let mut file = options
            .open(&staged)
            .with_context(|| format!("creating {}", staged.display()))?;
        file.write_all(&body)
            .and_then(|()| file.sync_all())
            .with_context(|| format!("writing {}", staged.display()))?;
        fs::rename(&staged, &path).with_context(|| format!("replacing {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_fills_defaults() {
        let cfg: LoggingConfig = serde_json::from_str(r#"{"level":"debug"}"#).unwrap();
        assert!(cfg.enabled);
        assert_eq!(cfg.level, "debug");
        assert_eq!(cfg.keep_days, 7);
    }

    #[test]
    fn missing_file_is_seeded_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(LoggingConfig::load(dir.path()), LoggingConfig::default());
        assert!(LoggingConfig::path(dir.path()).exists());
    }

    #[test]
    fn saved_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = LoggingConfig {
            enabled: false,
            level: "sensor=trace".to_string(),
            keep_days: 3,
        };
        cfg.save(dir.path()).unwrap();
        assert_eq!(LoggingConfig::load(dir.path()), cfg);
        assert!(!LoggingConfig::path(dir.path())
            .with_extension("json.tmp")
            .exists());
    }

    #[test]
    fn malformed_file_means_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = LoggingConfig::path(dir.path());
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(LoggingConfig::load(dir.path()), LoggingConfig::default());
    }
}
