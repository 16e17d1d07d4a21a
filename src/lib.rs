//! # bluedart
//!
//! `bluedart` generates blue-noise point sets with Poisson disk sampling, designed to be used in
//! Rust as well as compiled to WebAssembly (WASM). Points are placed by throwing darts around
//! already accepted samples and rejecting every dart that lands too close to a neighbor, so the
//! result covers the domain evenly without the clumps and holes of uniform random points.
//!
//! ## Features
//!
//! - **Any dimension**: The engine is generic over the dimension `D` of its axis-aligned domain.
//! - **Variable density**: A density function maps every position to a radius between a minimum
//!   and a maximum, producing dense and sparse regions in one point set.
//! - **Reproducible**: All randomness flows through a [`RandomSource`], so a seed fully
//!   determines the output.
//! - **Step-wise**: [`PoissonDiskEngine::step`] reports every created and retired sample, which
//!   is enough to animate the fill.
//! - **WASM-first**: Built with `wasm-bindgen` for seamless integration with JavaScript and TypeScript.
//!
//! ## Example
//!
//! ```rust
//! use bluedart::{PoissonDiskEngine, random};
//!
//! let samples = PoissonDiskEngine::variable_2d(
//!     200.0,
//!     100.0,
//!     4.0,
//!     12.0,
//!     |p| p[0],
//!     30,
//!     random::seeded(1337),
//! )
//! .and_then(|engine| engine.generate())
//! .unwrap();
//! assert!(samples.iter().all(|s| s.radius >= 4.0 && s.radius <= 12.0));
//! ```
//!
//! See `demos/poisson_svg.rs` for SVG plots of uniform, variable and random point sets.
//!
//! ## Main Interface
//!
//! The primary entry point is the [`PoissonDiskEngine`] struct, which owns the acceleration grid,
//! the active list and the accepted samples.

mod bounds;
mod config;
mod density;
mod engine;
mod error;
mod grid;
mod policy;
mod sample;

pub mod batch;
pub mod dart;
pub mod random;
pub mod stats;
pub mod wasm;

pub use bounds::BoundingBox;
pub use config::SamplerConfig;
pub use density::BilinearField;
pub use engine::{DEFAULT_REJECTION_LIMIT, EngineState, PoissonDiskEngine, SamplerEvent};
pub use error::SamplerError;
pub use grid::SpatialGrid;
pub use policy::{DensityFn, RadiusPolicy};
pub use random::RandomSource;
pub use sample::{Sample, flatten, positions};
