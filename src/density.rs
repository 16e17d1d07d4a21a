use crate::error::SamplerError;

/// A 2D density field sampled with bilinear interpolation.
///
/// Values are stored row-major, `height` rows of `width` texels, and addressed with
/// normalized coordinates in `[0, 1]^2`. Texel centers sit at `(i + 0.5) / width`;
/// lookups beyond the outer centers clamp to the edge.
#[derive(Clone, Debug, PartialEq)]
pub struct BilinearField {
    width: usize,
    height: usize,
    values: Vec<f64>,
}

impl BilinearField {
    /// Wraps a row-major grid of densities. Every value must lie in `[0, 1]`.
    pub fn new(width: usize, height: usize, values: Vec<f64>) -> Result<Self, SamplerError> {
        if width == 0 || height == 0 || values.len() != width * height {
            return Err(SamplerError::InvalidField {
                width,
                height,
                len: values.len(),
            });
        }
        if let Some(index) = values.iter().position(|v| !(0.0..=1.0).contains(v)) {
            return Err(SamplerError::DensityOutOfRange {
                value: values[index],
                position: vec![(index % width) as f64, (index / width) as f64],
            });
        }
        Ok(BilinearField { width, height, values })
    }

    /// Builds a field by evaluating `f` at every texel center.
    pub fn from_fn<F>(width: usize, height: usize, f: F) -> Result<Self, SamplerError>
    where
        F: Fn(f64, f64) -> f64,
    {
        let mut values = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let u = (x as f64 + 0.5) / width as f64;
                let v = (y as f64 + 0.5) / height as f64;
                values.push(f(u, v));
            }
        }
        Self::new(width, height, values)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn texel(&self, x: usize, y: usize) -> f64 {
        self.values[y * self.width + x]
    }

    /// Interpolated density at normalized coordinates `(u, v)`.
    pub fn sample(&self, u: f64, v: f64) -> f64 {
        let (x0, x1, tx) = axis_lookup(u, self.width);
        let (y0, y1, ty) = axis_lookup(v, self.height);
        let top = lerp(self.texel(x0, y0), self.texel(x1, y0), tx);
        let bottom = lerp(self.texel(x0, y1), self.texel(x1, y1), tx);
        lerp(top, bottom, ty)
    }

    /// The field as a density function over normalized positions, ready for a radius policy.
    pub fn into_density(self) -> impl Fn([f64; 2]) -> f64 + Send + Sync + 'static {
        move |p| self.sample(p[0], p[1])
    }
}

/// Neighboring texel indices along one axis and the blend factor between them.
fn axis_lookup(t: f64, size: usize) -> (usize, usize, f64) {
    let max = (size - 1) as f64;
    let x = (t * size as f64 - 0.5).clamp(0.0, max);
    let i0 = x.floor() as usize;
    let i1 = (i0 + 1).min(size - 1);
    (i0, i1, x - i0 as f64)
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-12, "Expected {}, got {}", expected, actual);
    }

    #[test]
    fn test_texel_centers_are_exact() {
        let field = BilinearField::new(2, 2, vec![0.0, 1.0, 0.5, 0.25]).unwrap();
        assert_close(field.sample(0.25, 0.25), 0.0);
        assert_close(field.sample(0.75, 0.25), 1.0);
        assert_close(field.sample(0.25, 0.75), 0.5);
        assert_close(field.sample(0.75, 0.75), 0.25);
    }

    #[test]
    fn test_interpolates_between_texels() {
        let field = BilinearField::new(2, 1, vec![0.0, 1.0]).unwrap();
        assert_close(field.sample(0.5, 0.5), 0.5);
        assert_close(field.sample(0.375, 0.0), 0.25);
    }

    #[test]
    fn test_clamps_at_edges() {
        let field = BilinearField::new(2, 1, vec![0.2, 0.8]).unwrap();
        assert_close(field.sample(0.0, 0.0), 0.2);
        assert_close(field.sample(1.0, 1.0), 0.8);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            BilinearField::new(2, 2, vec![0.0; 3]),
            Err(SamplerError::InvalidField { width: 2, height: 2, len: 3 })
        ));
        assert!(matches!(
            BilinearField::new(1, 1, vec![1.5]),
            Err(SamplerError::DensityOutOfRange { .. })
        ));
    }

    #[test]
    fn test_from_fn_gradient() {
        let field = BilinearField::from_fn(16, 16, |u, _| u).unwrap();
        let density = field.into_density();
        assert!(density([0.1, 0.5]) < density([0.9, 0.5]));
        assert_close(density([0.5, 0.3]), 0.5);
    }
}
