//! Core math modules.

pub mod density;
pub mod polynomial;
pub mod stable;
pub mod truncnorm;
