use crate::error::SamplerError;

/// Generic axis-aligned bounding box for N-dimensional space.
///
/// The box is half-open: a point is inside when `min[i] <= p[i] < max[i]` on every axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox<const D: usize> {
    pub min: [f64; D],
    pub max: [f64; D],
}

impl<const D: usize> BoundingBox<D> {
    pub fn new(min: [f64; D], max: [f64; D]) -> Self {
        Self { min, max }
    }

    /// A box spanning `[0, extents[i])` on every axis.
    pub fn from_extents(extents: [f64; D]) -> Self {
        Self { min: [0.0; D], max: extents }
    }

    /// Checks that the box has positive, finite size on every axis.
    pub fn validate(&self) -> Result<(), SamplerError> {
        if D == 0 {
            return Err(SamplerError::ZeroDimension);
        }
        for axis in 0..D {
            let (min, max) = (self.min[axis], self.max[axis]);
            if !min.is_finite() || !max.is_finite() || max <= min {
                return Err(SamplerError::DegenerateDomain { axis, min, max });
            }
        }
        Ok(())
    }

    pub fn extent(&self, axis: usize) -> f64 {
        self.max[axis] - self.min[axis]
    }

    pub fn extents(&self) -> [f64; D] {
        std::array::from_fn(|i| self.extent(i))
    }

    /// Length of the box diagonal.
    pub fn diagonal(&self) -> f64 {
        self.extents().iter().map(|e| e * e).sum::<f64>().sqrt()
    }

    pub fn contains(&self, point: &[f64; D]) -> bool {
        (0..D).all(|i| point[i] >= self.min[i] && point[i] < self.max[i])
    }

    /// Maps a point of the box to `[0, 1]^D`.
    pub fn normalize(&self, point: &[f64; D]) -> [f64; D] {
        std::array::from_fn(|i| (point[i] - self.min[i]) / self.extent(i))
    }

    /// Maps a point of `[0, 1]^D` back into the box.
    pub fn denormalize(&self, unit: &[f64; D]) -> [f64; D] {
        std::array::from_fn(|i| self.min[i] + unit[i] * self.extent(i))
    }
}
