use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// A uniform random source driving the sampler.
///
/// Every `rand` generator implements this trait, so any seedable generator can be swapped in.
/// Identical seeds and call sequences must produce identical outputs, which is what makes
/// sampling reproducible.
pub trait RandomSource {
    /// A float in `[0, 1)`.
    fn next_float(&mut self) -> f64;

    /// An integer in `[0, bound)`. `bound` must be positive.
    fn next_int(&mut self, bound: usize) -> usize;
}

impl<R: RngCore> RandomSource for R {
    fn next_float(&mut self) -> f64 {
        self.r#gen::<f64>()
    }

    fn next_int(&mut self, bound: usize) -> usize {
        self.gen_range(0..bound)
    }
}

/// The default random source, seeded explicitly.
pub fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// A seed drawn from the operating system (or `Math.random` in the browser).
pub fn entropy_seed() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        (js_sys::Math::random() * 4294967296.0) as u64
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let mut bytes = [0u8; 8];
        match getrandom::getrandom(&mut bytes) {
            Ok(()) => u64::from_le_bytes(bytes),
            Err(err) => {
                tracing::warn!(%err, "entropy unavailable, falling back to the thread rng");
                rand::thread_rng().next_u64()
            }
        }
    }
}
