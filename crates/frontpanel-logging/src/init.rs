//! Subscriber setup: stderr, `logs/<component>.log`, and one file per subsystem.

use std::path::Path;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_error::ErrorLayer;
use tracing_log::LogTracer;
use tracing_subscriber::{
    filter::{LevelFilter, Targets},
    fmt,
    layer::{Layered, SubscriberExt},
    reload, EnvFilter, Layer, Registry,
};

use crate::config::LoggingConfig;
use crate::targets::{T_DEVICE, T_SENSOR};

type Filtered = Layered<reload::Layer<EnvFilter, Registry>, Registry>;
type BoxedLayer = Box<dyn Layer<Filtered> + Send + Sync>;

/// Subsystem targets and the file each one is routed to. They stay out of the
/// component log.
const SUBSYSTEM_FILES: [(&str, &str); 2] = [(T_DEVICE, "device.log"), (T_SENSOR, "sensor.log")];

static FILTER: OnceCell<reload::Handle<EnvFilter, Registry>> = OnceCell::new();

/// Flushes the background file writers on drop. Hold it for the life of `main`.
pub struct LoggingGuards {
    _writers: Vec<WorkerGuard>,
}

pub fn init(component: &str, root: &Path, cfg: &LoggingConfig) -> Result<LoggingGuards> {
    let (filter, handle) = reload::Layer::new(filter_for(cfg));

    let mut layers: Vec<BoxedLayer> = vec![
        ErrorLayer::default().boxed(),
        fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_thread_names(true)
            .boxed(),
    ];
    let mut writers = Vec::new();

    let log_dir = root.join("logs");
    let dir_error = std::fs::create_dir_all(&log_dir).err();
    if dir_error.is_none() {
        let mut route = |file_name: &str, targets: Targets| {
            let (writer, guard) =
                tracing_appender::non_blocking(rolling::daily(&log_dir, file_name));
            writers.push(guard);
            layers.push(
                fmt::layer()
                    .compact()
                    .with_ansi(false)
                    .with_thread_names(true)
                    .with_writer(writer)
                    .with_filter(targets)
                    .boxed(),
            );
        };
        route(&format!("{component}.log"), component_targets());
        for (target, file_name) in SUBSYSTEM_FILES {
            route(file_name, Targets::new().with_target(target, LevelFilter::TRACE));
        }
    }

    LogTracer::init().context("routing log records into tracing")?;
    let subscriber = tracing_subscriber::registry().with(filter).with(layers);
    tracing::subscriber::set_global_default(subscriber).context("installing tracing subscriber")?;
    let _ = FILTER.set(handle);

    if let Some(err) = dir_error {
        tracing::warn!("File logging disabled, cannot create {}: {err}", log_dir.display());
    }
    Ok(LoggingGuards { _writers: writers })
}

/// Replace the live filter with the one described by `cfg`.
pub fn reload(cfg: &LoggingConfig) -> Result<()> {
    FILTER
        .get()
        .context("logging is not initialized")?
        .reload(filter_for(cfg))
        .context("swapping log filter")
}

fn filter_for(cfg: &LoggingConfig) -> EnvFilter {
    if !cfg.enabled {
        return EnvFilter::new("off");
    }
    EnvFilter::try_new(&cfg.level).unwrap_or_else(|err| {
        eprintln!("frontpanel: bad log level {:?} ({err}), using info", cfg.level);
        EnvFilter::new("info")
    })
}

fn component_targets() -> Targets {
    SUBSYSTEM_FILES
        .iter()
        .fold(Targets::new().with_default(LevelFilter::TRACE), |targets, (target, _)| {
            targets.with_target(*target, LevelFilter::OFF)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_config_turns_everything_off() {
        let cfg = LoggingConfig {
            enabled: false,
            ..LoggingConfig::default()
        };
        assert_eq!(filter_for(&cfg).to_string(), "off");
    }

    #[test]
    fn invalid_level_falls_back_to_info() {
        let cfg = LoggingConfig {
            level: "[[[".to_string(),
            ..LoggingConfig::default()
        };
        assert_eq!(filter_for(&cfg).to_string(), "info");
    }

    #[test]
    fn subsystems_stay_out_of_the_component_log() {
        let targets = component_targets();
        assert!(!targets.would_enable(T_DEVICE, &tracing::Level::ERROR));
        assert!(!targets.would_enable(T_SENSOR, &tracing::Level::ERROR));
        assert!(targets.would_enable("frontpanel_ui::app", &tracing::Level::TRACE));
    }

    #[test]
    fn reload_before_init_is_an_error() {
        // Tests never install the global subscriber.
        assert!(reload(&LoggingConfig::default()).is_err());
    }
}
