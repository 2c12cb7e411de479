use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::info;

/// Custom error type for config loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
}

/// A reusable configuration loader that combines file-based settings with environment overrides.
///
/// This function implements a layered configuration strategy:
/// 1. **Base File**: Loads settings from a file (e.g., `server.toml`). If no path is provided, it defaults to `"server"`.
/// 2. **Environment Overrides**: Overlays values from environment variables prefixed with `CPARK__`.
///    Nested structures are accessed using double underscores (e.g., `CPARK__DATABASE__URL` maps to `database.url`).
///
/// # Arguments
/// * `path`: An optional file path to the configuration source. Defaults to the `server` file in the current working directory.
///
/// # Errors
/// This function will return an error if:
/// * The specified (or default) configuration file cannot be found.
/// * The content of the file does not match the structure of type `T`.
///
/// # Example
/// ```rust
/// use cpark_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppConfig {
///     port: u16,
/// }
///
/// let cfg: AppConfig = load_config(Some("config/local")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let effective_path = path.map_or_else(|| PathBuf::from("server"), |p| p.as_ref().to_path_buf());

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(true))
        .add_source(
            Environment::with_prefix("CPARK")
                .separator("__")
                .convert_case(config::Case::Snake), // Env var overrides (e.g., CPARK__DATABASE__URL)
        );

    info!("Loading config from {}", effective_path.display());

    let config = builder.build()?.try_deserialize::<T>()?;

    Ok(config)
}
