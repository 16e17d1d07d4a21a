mod d2;
mod d3;
mod utils;

pub use d2::{PoissonSampler2D, VariablePoissonSampler2D};
pub use d3::PoissonSampler3D;
pub use utils::entropy_seed;
#[cfg(target_arch = "wasm32")]
pub use utils::init_threads;
