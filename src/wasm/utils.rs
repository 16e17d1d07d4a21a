use js_sys::Function;
use wasm_bindgen::prelude::*;

use crate::error::SamplerError;
use crate::random;
use crate::sample::Sample;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen_rayon::init_thread_pool;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn init_threads(n: usize) -> js_sys::Promise {
    init_thread_pool(n)
}

#[wasm_bindgen(typescript_custom_section)]
const TS_DENSITY: &'static str = r#"
export type DensityFunction = (u: number, v: number) => number;
"#;

/// A seed for callers that do not need reproducible output.
#[wasm_bindgen(js_name = entropySeed)]
pub fn entropy_seed() -> u64 {
    random::entropy_seed()
}

pub fn to_js_error(err: SamplerError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

pub fn flat_radii<const D: usize>(samples: &[Sample<D>]) -> Vec<f64> {
    samples.iter().map(|s| s.radius).collect()
}

/// A JS function `(u, v) => number` used as a density.
///
/// Anything that is not a number, and any exception thrown by the function, becomes NaN and
/// is reported by the sampler as an out-of-range density.
pub struct JsDensity {
    func: Function,
}

unsafe impl Send for JsDensity {}
unsafe impl Sync for JsDensity {}

impl JsDensity {
    pub fn new(func: Function) -> Self {
        JsDensity { func }
    }

    pub fn eval(&self, unit: [f64; 2]) -> f64 {
        self.func
            .call2(&JsValue::NULL, &unit[0].into(), &unit[1].into())
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(f64::NAN)
    }
}
