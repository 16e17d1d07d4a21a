//! Diagnostics for judging a point set: brute-force separation checks and a uniform
//! random scatter to compare blue noise against.
//!
//! The checks are quadratic in the number of points and run in parallel with rayon.

use rayon::prelude::*;

use crate::bounds::BoundingBox;
use crate::random::RandomSource;
use crate::sample::{Sample, distance_sq};

/// `count` points drawn independently and uniformly from the box.
///
/// Meant to be driven by its own random source, seeded separately from the sampler's, so
/// that rendering a comparison never perturbs the blue-noise sequence.
pub fn uniform_scatter<const D: usize, R: RandomSource>(
    bounds: &BoundingBox<D>,
    count: usize,
    rng: &mut R,
) -> Vec<[f64; D]> {
    (0..count)
        .map(|_| {
            let point: [f64; D] = std::array::from_fn(|i| bounds.min[i] + rng.next_float() * bounds.extent(i));
            point
        })
        .collect()
}

/// Distance from every point to its nearest other point. Empty for fewer than two points.
pub fn nearest_neighbor_distances<const D: usize>(points: &[[f64; D]]) -> Vec<f64> {
    if points.len() < 2 {
        return Vec::new();
    }
    points
        .par_iter()
        .enumerate()
        .map(|(i, p)| {
            points
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(_, q)| distance_sq(p, q))
                .fold(f64::INFINITY, f64::min)
                .sqrt()
        })
        .collect()
}

/// Smallest pairwise distance, `None` for fewer than two points.
pub fn min_separation<const D: usize>(points: &[[f64; D]]) -> Option<f64> {
    nearest_neighbor_distances(points)
        .into_iter()
        .reduce(f64::min)
}

/// Mean nearest-neighbor distance, `None` for fewer than two points.
pub fn mean_nearest_neighbor_distance<const D: usize>(points: &[[f64; D]]) -> Option<f64> {
    let distances = nearest_neighbor_distances(points);
    if distances.is_empty() {
        return None;
    }
    Some(distances.iter().sum::<f64>() / distances.len() as f64)
}

/// Pairs `(i, j)`, `i < j`, closer than the larger of their radii minus `tolerance`.
pub fn separation_violations<const D: usize>(samples: &[Sample<D>], tolerance: f64) -> Vec<(usize, usize)> {
    samples
        .par_iter()
        .enumerate()
        .flat_map_iter(|(i, a)| {
            samples[i + 1..].iter().enumerate().filter_map(move |(k, b)| {
                let required = (a.radius.max(b.radius) - tolerance).max(0.0);
                (distance_sq(&a.position, &b.position) < required * required).then_some((i, i + 1 + k))
            })
        })
        .collect()
}
