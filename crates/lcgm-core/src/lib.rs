//! Latent-Class Growth-Mixture Core Library
//!
//! This library evaluates fitted growth-mixture models:
//! - Polynomial group trajectories and collapsed super-group trajectories
//! - Softmax (multinomial logit) membership risk from baseline covariates
//! - Censored-normal likelihood of observed outcome trajectories
//! - Posterior group membership via log-domain Bayes combination
//!
//! The binary entry point is in `main.rs`.

pub mod error;
pub mod exit_codes;
pub mod likelihood;
pub mod logging;
pub mod model;
pub mod observation;
pub mod output;
pub mod posterior;
pub mod risk;
pub mod schema;
pub mod trajectory;

pub use error::{IndexKind, ModelError};
pub use model::Model;
pub use observation::{Observation, SubjectRecord};
pub use posterior::{EvidenceTerm, PosteriorResult, SubjectPosterior};
