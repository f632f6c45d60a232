//! Tracing subscriber bootstrap
//!
//! The subscriber is installed before the config file is resolved, at the
//! default level, so resolution warnings are not lost. Once the config is
//! loaded the filter is swapped for the configured level through a reload
//! handle. `RUST_LOG` takes precedence over both. Output goes to stderr so
//! reports written to stdout stay machine-readable.

use crate::config::LoggingConfig;
use crate::{Error, Result};
use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};

/// Build the filter: `RUST_LOG` if set and valid, else the configured level
pub fn build_filter(logging: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    level_filter(&logging.level)
}

fn level_filter(level: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(level)
        .map_err(|e| Error::Config(format!("Invalid log level '{}': {}", level, e)))
}

/// Handle for replacing the active filter after startup
#[derive(Debug, Clone)]
pub struct LogHandle {
    handle: reload::Handle<EnvFilter, Registry>,
}

impl LogHandle {
    /// Switch to the configured level, unless `RUST_LOG` is set
    pub fn apply(&self, logging: &LoggingConfig) -> Result<()> {
        if std::env::var_os("RUST_LOG").is_some() {
            return Ok(());
        }
        self.set_level(&logging.level)
    }

    /// Switch to `level` unconditionally
    pub fn set_level(&self, level: &str) -> Result<()> {
        let filter = level_filter(level)?;
        self.handle
            .reload(filter)
            .map_err(|e| Error::Config(format!("Failed to reload log filter: {}", e)))
    }
}

/// fmt subscriber with a reloadable filter, writing to `writer`
pub fn subscriber_with_writer<W>(
    filter: EnvFilter,
    writer: W,
) -> (impl Subscriber + Send + Sync + 'static, LogHandle)
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let (filter_layer, handle) = reload::Layer::new(filter);
    let subscriber = tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt::layer().with_writer(writer).with_target(false));
    (subscriber, LogHandle { handle })
}

/// Initialize the global tracing subscriber
///
/// Fails if a subscriber is already installed.
pub fn init_tracing(logging: &LoggingConfig) -> Result<LogHandle> {
    let filter = build_filter(logging)?;
    let (subscriber, handle) = subscriber_with_writer(filter, std::io::stderr);
    subscriber
        .try_init()
        .map_err(|e| Error::Config(format!("Failed to initialize tracing: {}", e)))?;
    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[test]
    fn test_configured_level_builds_filter() {
        let logging = LoggingConfig {
            level: "debug".to_string(),
        };
        assert!(build_filter(&logging).is_ok());
    }

    #[test]
    fn test_invalid_level_rejected() {
        assert!(matches!(level_filter("[not a level"), Err(Error::Config(_))));
    }

    #[test]
    fn test_set_level_replaces_bootstrap_filter() {
        let captured = Captured::default();
        let writer = captured.clone();
        let (subscriber, handle) =
            subscriber_with_writer(EnvFilter::new("warn"), move || writer.clone());

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!("bootstrap warning");
            tracing::debug!("hidden debug");
            handle.set_level("debug").unwrap();
            tracing::debug!("visible debug");
        });

        let text = captured.text();
        assert!(text.contains("bootstrap warning"));
        assert!(!text.contains("hidden debug"));
        assert!(text.contains("visible debug"));
    }
}
