use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::bounds::BoundingBox;
use crate::engine::{DEFAULT_REJECTION_LIMIT, PoissonDiskEngine};
use crate::error::SamplerError;
use crate::policy::RadiusPolicy;
use crate::random;

/// Offset between the sampler seed and the seed of the uniform comparison scatter.
const COMPARISON_SEED_OFFSET: u64 = 0x9E37_79B9_7F4A_7C15;

/// Knobs of a sampling run, loadable from any serde format.
///
/// Missing fields take their default values.
///
/// ```rust
/// use bluedart::SamplerConfig;
///
/// let config: SamplerConfig = serde_json::from_str(r#"{ "radius": 40.0 }"#).unwrap();
/// assert_eq!(config.width, 1024.0);
/// assert_eq!(config.radius, 40.0);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    pub width: f64,
    pub height: f64,
    pub rejection_limit: usize,
    pub seed: u64,
    /// Exclusion radius of uniform runs.
    pub radius: f64,
    /// Radius of variable runs where the density is 0.
    pub min_radius: f64,
    /// Radius of variable runs where the density is 1.
    pub max_radius: f64,
    /// Also draw a uniform random scatter of the same size for comparison.
    pub compare_uniform: bool,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        SamplerConfig {
            width: 1024.0,
            height: 1024.0,
            rejection_limit: DEFAULT_REJECTION_LIMIT,
            seed: 1337,
            radius: 25.0,
            min_radius: 10.0,
            max_radius: 50.0,
            compare_uniform: false,
        }
    }
}

impl SamplerConfig {
    /// Checks every field without building an engine.
    pub fn validate(&self) -> Result<(), SamplerError> {
        self.bounds().validate()?;
        RadiusPolicy::<2>::fixed(self.radius).validate()?;
        RadiusPolicy::<2>::variable(self.min_radius, self.max_radius, |_| 0.0).validate()?;
        if self.rejection_limit == 0 {
            return Err(SamplerError::InvalidRejectionLimit);
        }
        Ok(())
    }

    /// The `width` x `height` rectangle at the origin.
    pub fn bounds(&self) -> BoundingBox<2> {
        BoundingBox::from_extents([self.width, self.height])
    }

    pub fn uniform_engine(&self) -> Result<PoissonDiskEngine<2, StdRng>, SamplerError> {
        PoissonDiskEngine::uniform_2d(
            self.width,
            self.height,
            self.radius,
            self.rejection_limit,
            random::seeded(self.seed),
        )
    }

    pub fn variable_engine<F>(&self, density: F) -> Result<PoissonDiskEngine<2, StdRng>, SamplerError>
    where
        F: Fn([f64; 2]) -> f64 + Send + Sync + 'static,
    {
        PoissonDiskEngine::variable_2d(
            self.width,
            self.height,
            self.min_radius,
            self.max_radius,
            density,
            self.rejection_limit,
            random::seeded(self.seed),
        )
    }

    /// Fixed-radius engine over `[0, extents[i])`, ignoring `width` and `height`.
    pub fn uniform_nd_engine<const D: usize>(
        &self,
        extents: [f64; D],
    ) -> Result<PoissonDiskEngine<D, StdRng>, SamplerError> {
        PoissonDiskEngine::uniform(extents, self.radius, self.rejection_limit, random::seeded(self.seed))
    }

    /// Random source for the uniform comparison scatter, independent of the sampler's.
    pub fn comparison_rng(&self) -> StdRng {
        random::seeded(self.seed.wrapping_add(COMPARISON_SEED_OFFSET))
    }
}
