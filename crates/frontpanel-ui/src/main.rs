#![deny(unsafe_op_in_unsafe_fn)]
// The panel talks to hidraw nodes and sysfs; there is nothing to run elsewhere.
#[cfg(not(target_os = "linux"))]
compile_error!("frontpanel only runs on Linux. Build with a Linux target.");

use anyhow::{Context, Result};
use frontpanel_logging::LoggingConfig;
use frontpanel_ui::{
    app::App,
    config::{resolve_root, PanelConfig},
};

fn main() -> Result<()> {
    let root = resolve_root()?;
    let log_cfg = LoggingConfig::load(&root);
    let _logging_guards = frontpanel_logging::init("frontpanel", &root, &log_cfg)?;
    if let Err(err) = frontpanel_logging::run_retention(&root, &log_cfg) {
        tracing::warn!("Log retention failed: {:#}", err);
    }
    let _log_watcher = frontpanel_logging::watch_config(&root)
        .map_err(|err| tracing::warn!("Logging config reload disabled: {err:#}"))
        .ok();

    let span = tracing::info_span!("frontpanel", component = "frontpanel");
    let _span_guard = span.enter();

    let config = PanelConfig::load(&root)
        .with_context(|| format!("loading panel config from {}", root.display()))?;
    let mut app = App::new(config).context("opening panel devices")?;
    app.run()?;
    Ok(())
}
