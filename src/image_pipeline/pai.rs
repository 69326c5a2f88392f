//! Plant Area Index from crown cover and gap fraction

use serde::Serialize;

use crate::image_pipeline::common::error::{PaiError, Result};


#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PaiEstimate {
    /// CP = 1 - (1 - GF) / CC
    pub crown_porosity: f64,
    /// PAI = -CC * ln(CP) / k
    pub pai: f64,
}

pub fn crown_porosity(crown_cover: f64, gap_fraction: f64) -> f64 {
    1.0 - (1.0 - gap_fraction) / crown_cover
}

/// Fails with [`PaiError::InvalidPorosity`] whenever the logarithm would be
/// undefined, i.e. CP is not strictly positive or CC is zero.
pub fn estimate_pai(crown_cover: f64, gap_fraction: f64, k: f64) -> Result<PaiEstimate> {
    let porosity = crown_porosity(crown_cover, gap_fraction);
    if crown_cover <= 0.0 || !porosity.is_finite() || porosity <= 0.0 {
        return Err(PaiError::InvalidPorosity { porosity });
    }
    Ok(PaiEstimate {
        crown_porosity: porosity,
        pai: -crown_cover * porosity.ln() / k,
    })
}
