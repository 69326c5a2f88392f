//! Common utilities module
//!
//! Error types shared by every stage of the canopy pipeline.

pub mod error;

pub use error::{PaiError, Result};
