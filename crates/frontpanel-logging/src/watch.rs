//! Live reload of `config/logging.json`.

use std::path::Path;

use anyhow::{Context, Result};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::config::LoggingConfig;
use crate::init::reload;

/// Re-apply the logging config whenever its file changes. The watch lasts as
/// long as the returned watcher is alive.
pub fn watch_config(root: &Path) -> Result<RecommendedWatcher> {
    let path = LoggingConfig::path(root);
    let dir = path.parent().unwrap_or(root).to_path_buf();
    std::fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;

    let root = root.to_path_buf();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
        Ok(event) if touches(&event, &path) => match reload(&LoggingConfig::load(&root)) {
            Ok(()) => tracing::info!("Logging config reloaded"),
            Err(err) => tracing::warn!("Logging config not applied: {err:#}"),
        },
        Ok(_) => {}
        Err(err) => tracing::warn!("Logging config watch error: {err}"),
    })
    .context("creating logging config watcher")?;
    watcher
        .watch(&dir, RecursiveMode::NonRecursive)
        .with_context(|| format!("watching {}", dir.display()))?;
    Ok(watcher)
}

/// Reads and metadata-only events do not change the config.
fn touches(event: &Event, path: &Path) -> bool {
    matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    ) && event.paths.iter().any(|p| p == path)
}
