use crate::bounds::BoundingBox;
use crate::error::SamplerError;

/// A density field over the unit hypercube, returning values in `[0, 1]`.
pub type DensityFn<const D: usize> = Box<dyn Fn([f64; D]) -> f64 + Send + Sync>;

/// The minimum separation required around a position.
///
/// `Fixed` gives uniform blue noise. `Variable` maps a density field over the normalized
/// domain onto `[min, max]`: a density of 0 asks for the minimum radius (tight packing),
/// a density of 1 for the maximum radius.
pub enum RadiusPolicy<const D: usize> {
    Fixed(f64),
    Variable {
        min: f64,
        max: f64,
        density: DensityFn<D>,
    },
}

impl<const D: usize> RadiusPolicy<D> {
    pub fn fixed(radius: f64) -> Self {
        RadiusPolicy::Fixed(radius)
    }

    pub fn variable<F>(min: f64, max: f64, density: F) -> Self
    where
        F: Fn([f64; D]) -> f64 + Send + Sync + 'static,
    {
        RadiusPolicy::Variable { min, max, density: Box::new(density) }
    }

    pub fn validate(&self) -> Result<(), SamplerError> {
        match *self {
            RadiusPolicy::Fixed(radius) => {
                if radius.is_finite() && radius > 0.0 {
                    Ok(())
                } else {
                    Err(SamplerError::InvalidRadius { radius })
                }
            }
            RadiusPolicy::Variable { min, max, .. } => {
                if min.is_finite() && max.is_finite() && min > 0.0 && min <= max {
                    Ok(())
                } else {
                    Err(SamplerError::InvalidRadiusRange { min, max })
                }
            }
        }
    }

    /// The smallest radius the policy can return. Sizes the grid cells.
    pub fn lower_bound(&self) -> f64 {
        match *self {
            RadiusPolicy::Fixed(radius) => radius,
            RadiusPolicy::Variable { min, .. } => min,
        }
    }

    /// The largest radius the policy can return.
    pub fn upper_bound(&self) -> f64 {
        match *self {
            RadiusPolicy::Fixed(radius) => radius,
            RadiusPolicy::Variable { max, .. } => max,
        }
    }

    /// Evaluates the required separation at `position`.
    pub fn radius_at(&self, position: &[f64; D], bounds: &BoundingBox<D>) -> Result<f64, SamplerError> {
        match self {
            RadiusPolicy::Fixed(radius) => Ok(*radius),
            RadiusPolicy::Variable { min, max, density } => {
                let value = density(bounds.normalize(position));
                if !(0.0..=1.0).contains(&value) {
                    return Err(SamplerError::DensityOutOfRange {
                        value,
                        position: position.to_vec(),
                    });
                }
                Ok(min + (max - min) * value)
            }
        }
    }
}

impl<const D: usize> std::fmt::Debug for RadiusPolicy<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RadiusPolicy::Fixed(radius) => f.debug_tuple("Fixed").field(radius).finish(),
            RadiusPolicy::Variable { min, max, .. } => f
                .debug_struct("Variable")
                .field("min", min)
                .field("max", max)
                .finish_non_exhaustive(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed() {
        let bounds = BoundingBox::from_extents([10.0, 10.0]);
        let policy = RadiusPolicy::fixed(2.5);
        assert!(policy.validate().is_ok());
        assert_eq!(policy.radius_at(&[3.0, 4.0], &bounds), Ok(2.5));
        assert_eq!(policy.lower_bound(), 2.5);
        assert_eq!(policy.upper_bound(), 2.5);
    }

    #[test]
    fn test_fixed_rejects_non_positive() {
        for radius in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(RadiusPolicy::<2>::fixed(radius).validate().is_err(), "radius {}", radius);
        }
    }

    #[test]
    fn test_variable_interpolates_normalized_density() {
        let bounds = BoundingBox::from_extents([100.0, 50.0]);
        // Density ramps along x.
        let policy = RadiusPolicy::variable(1.0, 5.0, |p: [f64; 2]| p[0]);
        assert!(policy.validate().is_ok());
        assert_eq!(policy.radius_at(&[0.0, 10.0], &bounds), Ok(1.0));
        assert_eq!(policy.radius_at(&[50.0, 10.0], &bounds), Ok(3.0));
        assert_eq!(policy.radius_at(&[75.0, 49.0], &bounds), Ok(4.0));
    }

    #[test]
    fn test_variable_rejects_density_outside_unit_range() {
        let bounds = BoundingBox::from_extents([1.0, 1.0]);
        let policy = RadiusPolicy::variable(1.0, 2.0, |_: [f64; 2]| 1.5);
        match policy.radius_at(&[0.5, 0.5], &bounds) {
            Err(SamplerError::DensityOutOfRange { value, .. }) => assert_eq!(value, 1.5),
            other => panic!("Expected density error, got {:?}", other),
        }
        let policy = RadiusPolicy::variable(1.0, 2.0, |_: [f64; 2]| f64::NAN);
        assert!(policy.radius_at(&[0.5, 0.5], &bounds).is_err());
    }

    #[test]
    fn test_variable_range_validation() {
        assert!(RadiusPolicy::<2>::variable(0.0, 2.0, |_| 0.5).validate().is_err());
        assert!(RadiusPolicy::<2>::variable(3.0, 2.0, |_| 0.5).validate().is_err());
        assert!(RadiusPolicy::<2>::variable(2.0, 2.0, |_| 0.5).validate().is_ok());
    }
}
