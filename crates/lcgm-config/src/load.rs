//! Parameter file loading.

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::params::ParamsDocument;
use crate::resolve::ParamsSource;
use crate::snapshot::ParamsSnapshot;
use crate::validate::{validate_document, ValidationError};

/// Errors that can occur while loading parameters.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Parameter file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("No parameter file given (use --params, LCGM_PARAMS, or ~/.config/lcgm/params.json)")]
    Unresolved,

    #[error("I/O error reading {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in parameter file {path}: {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),
}

/// A validated parameter document and its provenance.
#[derive(Debug, Clone)]
pub struct LoadedParams {
    pub document: ParamsDocument,
    pub snapshot: ParamsSnapshot,
}

/// Load, parse and validate a parameter file.
pub fn load_params(path: &Path, source: ParamsSource) -> Result<LoadedParams, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let document: ParamsDocument =
        serde_json::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

    validate_document(&document)?;

    let snapshot = ParamsSnapshot::new(&document, Some(path), source, &content);
    Ok(LoadedParams { document, snapshot })
}

/// Parse and validate parameters from an in-memory JSON string.
pub fn parse_params(content: &str) -> Result<LoadedParams, ConfigError> {
    let document: ParamsDocument =
        serde_json::from_str(content).map_err(|e| ConfigError::ParseError {
            path: PathBuf::from("<memory>"),
            source: e,
        })?;
    validate_document(&document)?;
    let snapshot = ParamsSnapshot::new(&document, None, ParamsSource::InMemory, content);
    Ok(LoadedParams { document, snapshot })
}
