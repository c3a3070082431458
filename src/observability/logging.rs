//! Structured logging.
//!
//! # Responsibilities
//! - Initialize logging subsystem before anything else runs
//! - Configure log level from config, overridable at runtime via `RUST_LOG`

use tracing_subscriber::{
    layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter, Registry,
};

/// Default filter directive for a configured level.
pub fn default_directive(level: &str) -> String {
    format!("devproxy={}", level)
}

/// Handle to the installed filter, used once the config file is known.
pub struct LogHandle {
    filter: reload::Handle<EnvFilter, Registry>,
    from_env: bool,
}

impl LogHandle {
    /// Switch to `level` unless `RUST_LOG` chose the filter.
    pub fn set_level(&self, level: &str) {
        if self.from_env {
            return;
        }
        if let Err(e) = self.filter.reload(EnvFilter::new(default_directive(level))) {
            tracing::warn!(error = %e, "Failed to apply configured log level");
        }
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `level`. Calling this twice leaves the first
/// subscriber in place.
pub fn init_logging(level: &str) -> LogHandle {
    let (filter, from_env) = match EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, true),
        Err(_) => (EnvFilter::new(default_directive(level)), false),
    };
    let (filter, handle) = reload::Layer::new(filter);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();

    LogHandle {
        filter: handle,
        from_env,
    }
}
