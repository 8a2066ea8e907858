//! Configuration loader for WindVeal.
//!
//! Reads `windveal.toml` and deserializes it into [`AppConfig`], then applies
//! environment overrides. A missing file means defaults; a file that exists
//! but cannot be read or parsed is an error, since the server would otherwise
//! start with a provider chain nobody asked for.

use std::path::Path;

use windveal_types::config::AppConfig;
use windveal_types::error::ConfigError;

pub const DEFAULT_CONFIG_PATH: &str = "windveal.toml";

pub const ENV_DATABASE_URL: &str = "WINDVEAL_DATABASE_URL";
pub const ENV_PERSONA_PATH: &str = "WINDVEAL_PERSONA_PATH";
pub const ENV_WEB_DIR: &str = "WINDVEAL_WEB_DIR";

/// Load configuration from `path`.
pub async fn load_app_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(AppConfig::default());
        }
        Err(err) => {
            return Err(ConfigError::Io {
                path: path.display().to_string(),
                message: err.to_string(),
            });
        }
    };

    toml::from_str::<AppConfig>(&content).map_err(|err| ConfigError::Parse {
        path: path.display().to_string(),
        message: err.to_string(),
    })
}

/// Apply `WINDVEAL_*` overrides. Blank values are ignored.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(url) = get(ENV_DATABASE_URL) {
        config.database.url = Some(url);
    }
    if let Some(path) = get(ENV_PERSONA_PATH) {
        config.persona.path = path;
    }
    if let Some(dir) = get(ENV_WEB_DIR) {
        config.server.web_dir = dir;
    }
}
