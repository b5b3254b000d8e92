use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

/// Install the global tracing subscriber. `RUST_LOG` takes precedence over
/// the configured level. Logs go to stderr so command output stays on stdout.
///
/// Safe to call more than once; later calls leave the first subscriber in
/// place.
pub fn init(config: &AppConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    let result = if config.log_format == "json" {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if let Err(e) = result {
        tracing::debug!(error = %e, "Tracing subscriber already installed");
    }
}
