use tracing::{debug, info, trace, warn};

use crate::bounds::BoundingBox;
use crate::dart;
use crate::error::SamplerError;
use crate::grid::SpatialGrid;
use crate::policy::RadiusPolicy;
use crate::random::RandomSource;
use crate::sample::Sample;

/// Number of darts thrown around an active sample before it is retired.
pub const DEFAULT_REJECTION_LIMIT: usize = 30;

/// Lifecycle of a [`PoissonDiskEngine`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    /// The initial sample is placed, no step has run yet.
    Seeded,
    /// Steps are running and the active list is not empty.
    Sampling,
    /// The active list is empty. No further samples will be produced.
    Done,
    /// A step failed. Every later step reports the same error.
    Failed,
}

/// Outcome of a single [`PoissonDiskEngine::step`].
#[derive(Clone, Debug, PartialEq)]
pub enum SamplerEvent<const D: usize> {
    /// A dart thrown around the active sample `parent` was accepted as sample `index`.
    Created { parent: usize, index: usize, sample: Sample<D> },
    /// Sample `index` exhausted its rejection budget and left the active list.
    Closed { index: usize, sample: Sample<D> },
    /// The active list is empty.
    Complete,
}

/// Grid-accelerated dart throwing (Bridson's algorithm) over an axis-aligned box.
///
/// The engine owns the acceleration grid, the active list and the accepted samples. Each
/// step picks a random active sample and throws up to `rejection_limit` darts into the
/// annulus around it; the first dart that lies inside the domain and keeps its distance to
/// every neighbor becomes a new sample. A sample whose darts all fail is retired.
///
/// Two samples `p` and `q` are always at least `max(radius(p), radius(q))` apart, where
/// each radius is evaluated once, when its sample is placed.
///
/// ```rust
/// use bluedart::{PoissonDiskEngine, random};
///
/// let engine = PoissonDiskEngine::uniform_2d(100.0, 100.0, 10.0, 30, random::seeded(42)).unwrap();
/// let samples = engine.generate().unwrap();
/// assert!(samples.len() > 1);
/// ```
pub struct PoissonDiskEngine<const D: usize, R: RandomSource> {
    bounds: BoundingBox<D>,
    policy: RadiusPolicy<D>,
    rejection_limit: usize,
    rng: R,
    grid: SpatialGrid<D>,
    samples: Vec<Sample<D>>,
    /// Indices into `samples` that may still spawn new samples.
    active: Vec<usize>,
    /// Largest radius of any accepted sample, bounds the neighbor search.
    largest_radius: f64,
    state: EngineState,
    failure: Option<SamplerError>,
}

impl<const D: usize, R: RandomSource> PoissonDiskEngine<D, R> {
    /// Creates an engine seeded with one uniformly random point of the domain.
    pub fn new(
        bounds: BoundingBox<D>,
        policy: RadiusPolicy<D>,
        rejection_limit: usize,
        mut rng: R,
    ) -> Result<Self, SamplerError> {
        validate(&bounds, &policy, rejection_limit)?;
        let initial = std::array::from_fn(|i| {
            let v = bounds.min[i] + rng.next_float() * bounds.extent(i);
            // Rounding can land on the open upper edge.
            if v < bounds.max[i] { v } else { bounds.min[i] }
        });
        Self::seeded(bounds, policy, rejection_limit, rng, initial)
    }

    /// Creates an engine seeded with a caller-supplied point, which must lie in the domain.
    pub fn with_initial_point(
        bounds: BoundingBox<D>,
        policy: RadiusPolicy<D>,
        rejection_limit: usize,
        rng: R,
        initial: [f64; D],
    ) -> Result<Self, SamplerError> {
        validate(&bounds, &policy, rejection_limit)?;
        if !bounds.contains(&initial) {
            return Err(SamplerError::InitialPointOutsideDomain { point: initial.to_vec() });
        }
        Self::seeded(bounds, policy, rejection_limit, rng, initial)
    }

    /// Fixed-radius sampling of `[0, extents[i])` on every axis.
    pub fn uniform(extents: [f64; D], radius: f64, rejection_limit: usize, rng: R) -> Result<Self, SamplerError> {
        Self::new(BoundingBox::from_extents(extents), RadiusPolicy::fixed(radius), rejection_limit, rng)
    }

    fn seeded(
        bounds: BoundingBox<D>,
        policy: RadiusPolicy<D>,
        rejection_limit: usize,
        rng: R,
        initial: [f64; D],
    ) -> Result<Self, SamplerError> {
        let cell_size = SpatialGrid::<D>::cell_size_for(policy.lower_bound());
        let grid = SpatialGrid::new(bounds.min, cell_size);

        let mut engine = PoissonDiskEngine {
            bounds,
            policy,
            rejection_limit,
            rng,
            grid,
            samples: Vec::new(),
            active: Vec::new(),
            largest_radius: 0.0,
            state: EngineState::Seeded,
            failure: None,
        };
        let radius = engine.policy.radius_at(&initial, &engine.bounds)?;
        engine.accept(initial, radius)?;
        debug!(
            dimensions = D,
            cell_size,
            rejection_limit,
            initial = ?initial,
            radius,
            "poisson disk engine seeded"
        );
        Ok(engine)
    }

    /// Runs one iteration of the active-list loop.
    ///
    /// An error moves the engine to [`EngineState::Failed`]; the samples accepted so far stay
    /// available, but sampling does not resume.
    pub fn step(&mut self) -> Result<SamplerEvent<D>, SamplerError> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        self.advance().inspect_err(|err| {
            warn!(error = %err, samples = self.samples.len(), "poisson disk sampling failed");
            self.failure = Some(err.clone());
            self.state = EngineState::Failed;
        })
    }

    fn advance(&mut self) -> Result<SamplerEvent<D>, SamplerError> {
        if self.active.is_empty() {
            if self.state != EngineState::Done {
                info!(samples = self.samples.len(), "poisson disk sampling complete");
                self.state = EngineState::Done;
            }
            return Ok(SamplerEvent::Complete);
        }
        self.state = EngineState::Sampling;

        let slot = self.rng.next_int(self.active.len());
        let parent = self.active[slot];
        let seed = self.samples[parent];

        for _ in 0..self.rejection_limit {
            let candidate = dart::throw(&seed.position, seed.radius, &mut self.rng);
            if !self.bounds.contains(&candidate) {
                continue;
            }
            let radius = self.policy.radius_at(&candidate, &self.bounds)?;
            if self.is_far(candidate, radius) {
                let index = self.accept(candidate, radius)?;
                trace!(parent, index, position = ?candidate, radius, "sample created");
                return Ok(SamplerEvent::Created {
                    parent,
                    index,
                    sample: self.samples[index],
                });
            }
        }

        // The parent stays in `samples`, it just stops spawning.
        self.active.swap_remove(slot);
        trace!(index = parent, remaining = self.active.len(), "sample closed");
        Ok(SamplerEvent::Closed { index: parent, sample: seed })
    }

    /// Steps until the active list is empty and returns the number of samples.
    pub fn run(&mut self) -> Result<usize, SamplerError> {
        while self.step()? != SamplerEvent::Complete {}
        Ok(self.samples.len())
    }

    /// Fills the domain and hands over the samples in acceptance order.
    #[tracing::instrument(skip_all, fields(dimensions = D))]
    pub fn generate(mut self) -> Result<Vec<Sample<D>>, SamplerError> {
        self.run()?;
        Ok(self.samples)
    }

    pub fn into_samples(self) -> Vec<Sample<D>> {
        self.samples
    }

    pub fn samples(&self) -> &[Sample<D>] {
        &self.samples
    }

    /// Number of samples that may still spawn new ones.
    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn bounds(&self) -> &BoundingBox<D> {
        &self.bounds
    }

    pub fn policy(&self) -> &RadiusPolicy<D> {
        &self.policy
    }

    pub fn grid(&self) -> &SpatialGrid<D> {
        &self.grid
    }

    pub fn rejection_limit(&self) -> usize {
        self.rejection_limit
    }

    pub fn cell_size(&self) -> f64 {
        self.grid.cell_size()
    }

    /// Number of grid cells spanning the domain along each axis.
    pub fn grid_dimensions(&self) -> [usize; D] {
        std::array::from_fn(|i| (self.bounds.extent(i) / self.grid.cell_size()).ceil() as usize)
    }

    fn is_far(&self, candidate: [f64; D], radius: f64) -> bool {
        let search_radius = radius.max(self.largest_radius);
        !self
            .grid
            .neighbors_within_radius(&self.samples, candidate, search_radius)
            .any(|n| n.conflicts_with(&candidate, radius))
    }

    fn accept(&mut self, position: [f64; D], radius: f64) -> Result<usize, SamplerError> {
        let index = self.samples.len();
        self.grid.insert(index, &position)?;
        self.samples.push(Sample::new(position, radius));
        self.active.push(index);
        self.largest_radius = self.largest_radius.max(radius);
        Ok(index)
    }
}

impl<R: RandomSource> PoissonDiskEngine<2, R> {
    /// Fixed-radius sampling of a `width` x `height` rectangle at the origin.
    pub fn uniform_2d(width: f64, height: f64, radius: f64, rejection_limit: usize, rng: R) -> Result<Self, SamplerError> {
        Self::uniform([width, height], radius, rejection_limit, rng)
    }

    /// Density-driven sampling of a `width` x `height` rectangle at the origin.
    ///
    /// `density` receives positions normalized to `[0, 1]^2` and must return values in `[0, 1]`,
    /// which are mapped linearly onto `[min_radius, max_radius]`.
    pub fn variable_2d<F>(
        width: f64,
        height: f64,
        min_radius: f64,
        max_radius: f64,
        density: F,
        rejection_limit: usize,
        rng: R,
    ) -> Result<Self, SamplerError>
    where
        F: Fn([f64; 2]) -> f64 + Send + Sync + 'static,
    {
        Self::new(
            BoundingBox::from_extents([width, height]),
            RadiusPolicy::variable(min_radius, max_radius, density),
            rejection_limit,
            rng,
        )
    }
}

impl<const D: usize, R: RandomSource> std::fmt::Debug for PoissonDiskEngine<D, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoissonDiskEngine")
            .field("bounds", &self.bounds)
            .field("policy", &self.policy)
            .field("rejection_limit", &self.rejection_limit)
            .field("cell_size", &self.grid.cell_size())
            .field("samples", &self.samples.len())
            .field("active", &self.active.len())
            .field("state", &self.state)
            .finish()
    }
}

fn validate<const D: usize>(
    bounds: &BoundingBox<D>,
    policy: &RadiusPolicy<D>,
    rejection_limit: usize,
) -> Result<(), SamplerError> {
    bounds.validate()?;
    policy.validate()?;
    if rejection_limit == 0 {
        return Err(SamplerError::InvalidRejectionLimit);
    }
    Ok(())
}
