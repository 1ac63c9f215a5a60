//! Utility modules

pub mod validation;
pub mod value_source;

pub use validation::*;
pub use value_source::*;
