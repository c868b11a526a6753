//! # site-percolation
//!
//! Newman-Ziff site percolation on a square lattice embedded in a torus.
//!
//! Sites are occupied one at a time in a uniformly random order; a weighted
//! union-find forest tracks the connected components, so the size of the
//! largest component is known after every single occupation at amortized
//! near-constant cost per step.
//!
//! ## Modules
//!
//! - [`lattice`] — toroidal square lattice and its neighbour table
//! - [`random`] — seeded generators and uniform occupation orders
//! - [`collections`] — the per-site pointer array (union-find forest)
//! - [`engine`] — incremental occupation and weighted union
//! - [`inspect`] — read-only component views and render data
//! - [`ensemble`] — parallel realizations and the binomial convolution
//! - [`config`] — validated run parameters
//! - [`stats`], [`special`] — numerical helpers for the ensemble averages
//!
//! ## Example
//!
//! ```
//! use site_percolation::collections::RootFinding;
//! use site_percolation::engine::percolate;
//! use site_percolation::lattice::Lattice;
//! use site_percolation::random::{create_rng, random_permutation, PermutationMethod};
//!
//! let lattice = Lattice::new(16).unwrap();
//! let mut rng = create_rng(42);
//! let order = random_permutation(lattice.num_sites(), PermutationMethod::FisherYates, &mut rng);
//! let run = percolate(lattice.neighbors(), &order, RootFinding::Halving).unwrap();
//! // a fully occupied torus is one component
//! assert_eq!(run.largest_component_size, 256);
//! ```
//!
//! ## Design Philosophy
//!
//! - **Explicit randomness**: every random draw takes its generator as an
//!   argument; nothing touches process-global state
//! - **Tagged sites**: the pointer array stores `Empty | Root | Child`
//!   variants and converts to the classic signed-integer encoding on demand
//! - **Property-based testing**: forest invariants verified via proptest

pub mod collections;
pub mod config;
pub mod engine;
pub mod ensemble;
pub mod error;
pub mod inspect;
pub mod lattice;
pub mod random;
pub mod special;
pub mod stats;

pub use collections::{PointerArray, RootFinding, Site};
pub use config::{EnsembleConfig, PercolationConfig};
pub use engine::{percolate, Percolation, Realization};
pub use error::{PercolationError, Result};
pub use lattice::{build_neighbors, Lattice};
