//! Independent engines run in parallel.
//!
//! Every job gets its own engine and its own seeded random source, so results do not depend
//! on scheduling. Jobs never see each other's samples: point sets of neighboring tiles are
//! not reconciled along shared borders.

use rayon::prelude::*;

use crate::bounds::BoundingBox;
use crate::engine::PoissonDiskEngine;
use crate::error::SamplerError;
use crate::policy::RadiusPolicy;
use crate::random;
use crate::sample::Sample;

/// One engine run: a domain, a rejection limit and a seed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BatchJob<const D: usize> {
    pub bounds: BoundingBox<D>,
    pub rejection_limit: usize,
    pub seed: u64,
}

impl<const D: usize> BatchJob<D> {
    pub fn new(bounds: BoundingBox<D>, rejection_limit: usize, seed: u64) -> Self {
        Self { bounds, rejection_limit, seed }
    }
}

/// Runs every job on the rayon pool. `policy` builds the radius policy of each job.
///
/// Results come back in job order.
pub fn generate_batch<const D: usize, F>(jobs: &[BatchJob<D>], policy: F) -> Vec<Result<Vec<Sample<D>>, SamplerError>>
where
    F: Fn(&BatchJob<D>) -> RadiusPolicy<D> + Sync,
{
    jobs.par_iter()
        .map(|job| {
            PoissonDiskEngine::new(job.bounds, policy(job), job.rejection_limit, random::seeded(job.seed))?
                .generate()
        })
        .collect()
}

/// Splits `bounds` into `tiles[i]` equal slabs along each axis, one job per tile.
///
/// Tile seeds are `base_seed`, `base_seed + 1`, ... in row-major tile order (axis 0 fastest).
pub fn tile_jobs<const D: usize>(
    bounds: &BoundingBox<D>,
    tiles: [usize; D],
    rejection_limit: usize,
    base_seed: u64,
) -> Vec<BatchJob<D>> {
    let total: usize = tiles.iter().product();
    let mut jobs = Vec::with_capacity(total);
    for n in 0..total {
        let mut rem = n;
        let tile: [usize; D] = std::array::from_fn(|i| {
            let t = rem % tiles[i];
            rem /= tiles[i];
            t
        });
        let size: [f64; D] = std::array::from_fn(|i| bounds.extent(i) / tiles[i] as f64);
        let min: [f64; D] = std::array::from_fn(|i| bounds.min[i] + tile[i] as f64 * size[i]);
        let max: [f64; D] = std::array::from_fn(|i| {
            if tile[i] + 1 == tiles[i] { bounds.max[i] } else { min[i] + size[i] }
        });
        jobs.push(BatchJob::new(BoundingBox::new(min, max), rejection_limit, base_seed.wrapping_add(n as u64)));
    }
    jobs
}
