use crate::api::search_structs::finite_score;
use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

pub const DEFAULT_CONFIG_PATH: &str = "config/settings.yaml";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Cannot load settings: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid settings: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct Settings {
    #[validate(nested)]
    pub api: ApiSettings,
    #[validate(nested)]
    pub search: SearchDefaults,
    pub logging: LoggingSettings,
}

/// Where the search service lives.
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct ApiSettings {
    #[validate(length(min = 1))]
    pub base_url: String,
}

/// Values the search fields start out with.
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct SearchDefaults {
    #[validate(range(min = 1))]
    pub top_k: u32,
    #[validate(range(min = 0.0, max = 1.0), custom(function = "finite_score"))]
    pub min_score: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoggingSettings {
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Settings {
    /// Load settings from built-in defaults, then the yaml file at
    /// `config_path` (if it exists), then `APP__*` environment variables.
    ///
    /// # Errors
    /// * If a source can't be read or parsed.
    /// * If the merged settings fail validation.
    pub fn load(config_path: &Path) -> Result<Self, SettingsError> {
        dotenv::from_path(".env").ok();

        let builder = config::Config::builder()
            .set_default("api.base_url", "http://localhost:8000")?
            .set_default("search.top_k", 10)?
            .set_default("search.min_score", 0.4)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            .add_source(config::File::from(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            );

        let settings: Self = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }
}
