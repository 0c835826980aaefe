//! Latent-class growth-mixture math utilities.

pub mod math;

pub use math::density::{ObservationDensity, TruncatedNormal};
pub use math::polynomial::{polyval, polyval_grid};
pub use math::stable::*;
pub use math::truncnorm::truncated_normal_log_pdf;
