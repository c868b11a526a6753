//! Error type shared by every module of the crate.
//!
//! All variants are configuration or programming errors. Nothing here is
//! transient, so no operation in the crate retries.

use thiserror::Error;

/// Errors reported by lattice construction, the percolation engine and the
/// inspection helpers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PercolationError {
    /// The linear dimension is zero, or `dim * dim` does not fit in `usize`.
    #[error("invalid lattice dimension {dim}: must be at least 1 and dim*dim must not overflow")]
    InvalidDimension { dim: usize },

    /// A site id is not below the number of sites.
    #[error("site {site} is out of range for a lattice of {num_sites} sites")]
    SiteOutOfRange { site: usize, num_sites: usize },

    /// `occupy_next` was called on a site that is already occupied.
    ///
    /// This means the occupation order is not a permutation.
    #[error("site {site} is already occupied; the occupation order is not a permutation")]
    SiteAlreadyOccupied { site: usize },

    /// The occupation order does not cover the lattice exactly once.
    #[error("permutation has {len} entries but the lattice has {num_sites} sites")]
    PermutationLength { len: usize, num_sites: usize },

    /// A raw pointer-array entry is none of empty, root size or parent index.
    #[error("invalid pointer value {value} at site {site}")]
    InvalidPointerValue { site: usize, value: i64 },

    /// Decoded pointers do not form a forest: following parents from `site`
    /// cycles or reaches an empty site, or the root at `site` stores a size
    /// that differs from its member count.
    #[error("pointer array is not a valid forest at site {site}")]
    MalformedForest { site: usize },

    /// The empty sentinel collides with a root size or a parent index.
    #[error("empty sentinel {sentinel} must be below -{num_sites}")]
    InvalidSentinel { sentinel: i64, num_sites: usize },

    /// An occupation probability outside `[0, 1]`.
    #[error("probability {p} is outside [0, 1]")]
    InvalidProbability { p: f64 },

    /// An ensemble needs at least one realization.
    #[error("an ensemble needs at least one realization")]
    InvalidRealizations,

    /// A site count that is not `dim * dim` for any positive `dim`.
    #[error("{num_sites} sites do not form a square lattice")]
    NotSquare { num_sites: usize },

    /// Render data is only produced for small lattices.
    #[error("lattice of {num_sites} sites is too large to render (limit {limit})")]
    LatticeTooLarge { num_sites: usize, limit: usize },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PercolationError>;
