use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use core_types::AnalysisSettings;
pub use settings::{DatasetSettings, DisplaySettings, Settings};

/// Environment variables with this prefix override file settings, using `__`
/// between path segments (e.g. `DASHBOARD__DATASET__PATH`).
pub const ENV_PREFIX: &str = "DASHBOARD";

/// Loads the application settings.
///
/// Sources are layered from lowest to highest precedence: built-in defaults,
/// the TOML file (`path`, or an optional `config.toml` in the working
/// directory), then `DASHBOARD__*` environment variables. The result is
/// validated before it is returned.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let defaults = Settings::default();

    let mut builder = config::Config::builder()
        .set_default("dataset.path", defaults.dataset.path.to_string_lossy().into_owned())?
        .set_default("dataset.delimiter", defaults.dataset.delimiter.clone())?
        .set_default("analysis.bucket_fill", defaults.analysis.bucket_fill.to_string())?
        .set_default(
            "analysis.recency_reference",
            defaults.analysis.recency_reference.to_string(),
        )?
        .set_default("display.top_n", defaults.display.top_n as u64)?
        .set_default("display.demographics_top_n", defaults.display.demographics_top_n as u64)?
        .set_default("display.rfm_top_n", defaults.display.rfm_top_n as u64)?
        .set_default("display.currency", defaults.display.currency.clone())?;

    builder = match path {
        // An explicitly requested file must exist.
        Some(path) => builder.add_source(config::File::from(path)),
        None => builder.add_source(config::File::with_name("config").required(false)),
    };

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize::<Settings>()?;

    settings.validate()?;
    tracing::debug!(?settings, "Configuration loaded.");
    Ok(settings)
}
