/// An accepted point together with the separation radius in effect when it was placed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample<const D: usize> {
    pub position: [f64; D],
    pub radius: f64,
}

impl<const D: usize> Sample<D> {
    pub fn new(position: [f64; D], radius: f64) -> Self {
        Self { position, radius }
    }

    pub fn distance_sq(&self, point: &[f64; D]) -> f64 {
        distance_sq(&self.position, point)
    }

    /// Whether a point with its own `radius` would sit too close to this sample.
    ///
    /// The required separation is the larger of the two radii.
    pub fn conflicts_with(&self, point: &[f64; D], radius: f64) -> bool {
        let required = self.radius.max(radius);
        self.distance_sq(point) < required * required
    }
}

/// Squared Euclidean distance between two points.
#[inline]
pub fn distance_sq<const D: usize>(a: &[f64; D], b: &[f64; D]) -> f64 {
    let mut sum = 0.0;
    for i in 0..D {
        let d = a[i] - b[i];
        sum += d * d;
    }
    sum
}

/// Strips the radii from a list of samples.
pub fn positions<const D: usize>(samples: &[Sample<D>]) -> Vec<[f64; D]> {
    samples.iter().map(|s| s.position).collect()
}

/// Flattens sample positions into `[x0, y0, ..., x1, y1, ...]`.
pub fn flatten<const D: usize>(samples: &[Sample<D>]) -> Vec<f64> {
    let mut out = Vec::with_capacity(samples.len() * D);
    for s in samples {
        out.extend_from_slice(&s.position);
    }
    out
}
