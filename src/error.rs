use thiserror::Error;

/// Errors reported by the sampler.
///
/// Configuration problems are reported when an engine is constructed. The remaining variants
/// can only surface while sampling. The engine then stays failed and every later step returns
/// the same error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SamplerError {
    #[error("radius must be positive and finite, got {radius}")]
    InvalidRadius { radius: f64 },

    #[error("invalid radius range: min {min} must be positive and not larger than max {max}")]
    InvalidRadiusRange { min: f64, max: f64 },

    #[error("rejection limit must be at least 1")]
    InvalidRejectionLimit,

    #[error("domain is empty along axis {axis}: [{min}, {max})")]
    DegenerateDomain { axis: usize, min: f64, max: f64 },

    #[error("sampling requires at least one dimension")]
    ZeroDimension,

    #[error("initial point {point:?} lies outside the domain")]
    InitialPointOutsideDomain { point: Vec<f64> },

    #[error("density {value} at {position:?} is outside [0, 1]")]
    DensityOutOfRange { value: f64, position: Vec<f64> },

    #[error("density field of {width}x{height} texels cannot hold {len} values")]
    InvalidField { width: usize, height: usize, len: usize },

    #[error("grid cell {cell:?} is already occupied by sample {occupant}")]
    CellOccupied { cell: Vec<i64>, occupant: usize },
}
