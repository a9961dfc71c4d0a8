use crate::common::settings::{LogFormat, LoggingSettings};
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. `RUST_LOG` wins over the configured level.
///
/// # Errors
/// If a global subscriber was already set.
pub fn init_logging(
    settings: &LoggingSettings,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "image_search_client={0},image_search={0}",
            settings.level
        ))
    });

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match settings.format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
}
