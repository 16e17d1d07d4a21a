use rand::rngs::StdRng;
use wasm_bindgen::prelude::*;

use crate::engine::{EngineState, PoissonDiskEngine};
use crate::random;
use crate::sample::flatten;
use crate::wasm::utils::to_js_error;

/// Fixed-radius sampler over the box `[0, width) x [0, height) x [0, depth)`.
#[wasm_bindgen]
pub struct PoissonSampler3D {
    inner: PoissonDiskEngine<3, StdRng>,
}

#[wasm_bindgen]
impl PoissonSampler3D {
    #[wasm_bindgen(constructor)]
    pub fn new(
        width: f64,
        height: f64,
        depth: f64,
        radius: f64,
        rejection_limit: usize,
        seed: u64,
    ) -> Result<PoissonSampler3D, JsValue> {
        let inner = PoissonDiskEngine::uniform([width, height, depth], radius, rejection_limit, random::seeded(seed))
            .map_err(to_js_error)?;
        Ok(PoissonSampler3D { inner })
    }

    pub fn run(&mut self) -> Result<usize, JsValue> {
        self.inner.run().map_err(to_js_error)
    }

    #[wasm_bindgen(getter)]
    pub fn done(&self) -> bool {
        self.inner.state() == EngineState::Done
    }

    #[wasm_bindgen(getter)]
    pub fn count(&self) -> usize {
        self.inner.samples().len()
    }

    /// Flat `[x0, y0, z0, x1, ...]` in acceptance order.
    #[wasm_bindgen(getter)]
    pub fn points(&self) -> Vec<f64> {
        flatten(self.inner.samples())
    }
}
