use js_sys::Function;
use rand::rngs::StdRng;
use wasm_bindgen::prelude::*;

use crate::engine::{EngineState, PoissonDiskEngine, SamplerEvent};
use crate::random;
use crate::sample::flatten;
use crate::stats::uniform_scatter;
use crate::wasm::utils::{JsDensity, flat_radii, to_js_error};

/// Fixed-radius sampler over a `width` x `height` rectangle.
#[wasm_bindgen]
pub struct PoissonSampler2D {
    inner: PoissonDiskEngine<2, StdRng>,
}

#[wasm_bindgen]
impl PoissonSampler2D {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64, radius: f64, rejection_limit: usize, seed: u64) -> Result<PoissonSampler2D, JsValue> {
        let inner = PoissonDiskEngine::uniform_2d(width, height, radius, rejection_limit, random::seeded(seed))
            .map_err(to_js_error)?;
        Ok(PoissonSampler2D { inner })
    }

    /// Runs one iteration. Returns the index of a new sample, or -1 if none was created.
    pub fn step(&mut self) -> Result<i32, JsValue> {
        Ok(step_index(self.inner.step().map_err(to_js_error)?))
    }

    /// Fills the domain and returns the sample count.
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

    #[wasm_bindgen(getter)]
    pub fn active_count(&self) -> usize {
        self.inner.active_len()
    }

    /// Flat `[x0, y0, x1, y1, ...]` in acceptance order.
    #[wasm_bindgen(getter)]
    pub fn points(&self) -> Vec<f64> {
        flatten(self.inner.samples())
    }

    #[wasm_bindgen(getter)]
    pub fn grid_dimensions(&self) -> Vec<usize> {
        self.inner.grid_dimensions().to_vec()
    }

    /// As many uniformly random points as there are samples, from an independent seed.
    pub fn uniform_comparison(&self, seed: u64) -> Vec<f64> {
        comparison(&self.inner, seed)
    }
}

/// Density-driven sampler. `density(u, v)` receives normalized coordinates and must return a
/// value in `[0, 1]`, mapped onto `[min_radius, max_radius]`.
#[wasm_bindgen]
pub struct VariablePoissonSampler2D {
    inner: PoissonDiskEngine<2, StdRng>,
}

#[wasm_bindgen]
impl VariablePoissonSampler2D {
    #[wasm_bindgen(constructor)]
    pub fn new(
        width: f64,
        height: f64,
        min_radius: f64,
        max_radius: f64,
        density: Function,
        rejection_limit: usize,
        seed: u64,
    ) -> Result<VariablePoissonSampler2D, JsValue> {
        let density = JsDensity::new(density);
        let inner = PoissonDiskEngine::variable_2d(
            width,
            height,
            min_radius,
            max_radius,
            move |unit| density.eval(unit),
            rejection_limit,
            random::seeded(seed),
        )
        .map_err(to_js_error)?;
        Ok(VariablePoissonSampler2D { inner })
    }

    pub fn step(&mut self) -> Result<i32, JsValue> {
        Ok(step_index(self.inner.step().map_err(to_js_error)?))
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

    #[wasm_bindgen(getter)]
    pub fn active_count(&self) -> usize {
        self.inner.active_len()
    }

    #[wasm_bindgen(getter)]
    pub fn points(&self) -> Vec<f64> {
        flatten(self.inner.samples())
    }

    /// Exclusion radius of every sample, aligned with `points`.
    #[wasm_bindgen(getter)]
    pub fn radii(&self) -> Vec<f64> {
        flat_radii(self.inner.samples())
    }

    pub fn uniform_comparison(&self, seed: u64) -> Vec<f64> {
        comparison(&self.inner, seed)
    }
}

fn step_index(event: SamplerEvent<2>) -> i32 {
    match event {
        SamplerEvent::Created { index, .. } => index as i32,
        SamplerEvent::Closed { .. } | SamplerEvent::Complete => -1,
    }
}

fn comparison(engine: &PoissonDiskEngine<2, StdRng>, seed: u64) -> Vec<f64> {
    uniform_scatter(engine.bounds(), engine.samples().len(), &mut random::seeded(seed))
        .into_iter()
        .flatten()
        .collect()
}
