//! Parameter file resolution and path discovery.
//!
//! Resolution order: CLI argument → environment variables → XDG path.
//! There are no built-in default parameters.

use std::path::{Path, PathBuf};

/// Where a parameter file was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamsSource {
    /// Explicitly provided via CLI argument.
    CliArgument,

    /// Set via environment variable.
    Environment,

    /// Found in XDG config directory.
    XdgConfig,

    /// Supplied in memory by the caller.
    InMemory,
}

impl std::fmt::Display for ParamsSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamsSource::CliArgument => write!(f, "CLI argument"),
            ParamsSource::Environment => write!(f, "environment variable"),
            ParamsSource::XdgConfig => write!(f, "XDG config"),
            ParamsSource::InMemory => write!(f, "in memory"),
        }
    }
}

/// Environment variable names.
pub const ENV_PARAMS_PATH: &str = "LCGM_PARAMS";
pub const ENV_CONFIG_DIR: &str = "LCGM_CONFIG_DIR";

/// Standard parameter file name.
pub const PARAMS_FILENAME: &str = "params.json";

/// Application name for XDG directories.
const APP_NAME: &str = "lcgm";

/// Resolve the parameter file path.
///
/// Resolution order:
/// 1. Explicit CLI path (returned even if missing so loading reports it)
/// 2. LCGM_PARAMS environment variable
/// 3. LCGM_CONFIG_DIR environment variable + params.json
/// 4. XDG config directory (~/.config/lcgm/params.json)
pub fn resolve_params_path(cli_path: Option<&Path>) -> Option<(PathBuf, ParamsSource)> {
    if let Some(path) = cli_path {
        return Some((path.to_path_buf(), ParamsSource::CliArgument));
    }

    if let Ok(env_path) = std::env::var(ENV_PARAMS_PATH) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Some((path, ParamsSource::Environment));
        }
    }

    if let Ok(config_dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = PathBuf::from(config_dir).join(PARAMS_FILENAME);
        if path.exists() {
            return Some((path, ParamsSource::Environment));
        }
    }

    if let Some(dir) = xdg_config_dir() {
        let path = dir.join(PARAMS_FILENAME);
        if path.exists() {
            return Some((path, ParamsSource::XdgConfig));
        }
    }

    None
}

/// Get the XDG config directory for lcgm.
pub fn xdg_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME))
}
