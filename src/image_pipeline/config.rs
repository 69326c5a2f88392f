//! Analysis configuration
//!
//! Every threshold and weight of the classification is a named field here,
//! passed explicitly into each stage.

mod types;

#[cfg(test)]
mod tests;

pub use types::{PaiConfig, PaiConfigBuilder, INTENSITY_LEVELS};
