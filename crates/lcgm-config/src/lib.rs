//! Growth-mixture parameter loading and validation.
//!
//! This crate provides:
//! - Typed Rust structs for fitted parameter bundles (params.json)
//! - Path resolution (CLI → env → XDG)
//! - Shape and semantic validation
//! - Parameter snapshots for provenance in evaluation output

pub mod load;
pub mod params;
pub mod resolve;
pub mod snapshot;
pub mod validate;

pub use load::{load_params, parse_params, ConfigError, LoadedParams};
pub use params::{Limits, ModelParams, ParamsDocument};
pub use resolve::{resolve_params_path, ParamsSource};
pub use snapshot::{ParamsSnapshot, ParamsSummary};
pub use validate::{validate_document, validate_params, ValidationError, ValidationResult};

/// Schema version for parameter files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
