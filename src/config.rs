//! Run parameters.
//!
//! A [`PercolationConfig`] describes one realization; an [`EnsembleConfig`]
//! repeats it. Both validate before doing any work, so an invalid dimension
//! is reported before a lattice is allocated.

use rand::Rng;

use crate::collections::RootFinding;
use crate::engine::{percolate, Realization};
use crate::error::{PercolationError, Result};
use crate::lattice::{checked_num_sites, Lattice};
use crate::random::{create_rng, entropy_rng, random_permutation, PermutationMethod};

/// Parameters of one percolation realization.
///
/// # Examples
/// ```
/// use site_percolation::config::PercolationConfig;
///
/// let run = PercolationConfig::new(8).with_seed(42).run().unwrap();
/// assert_eq!(run.largest_component_size, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PercolationConfig {
    /// Linear dimension of the torus.
    pub dim: usize,
    /// Seed of the occupation order. `None` draws one from the OS.
    pub seed: Option<u64>,
    pub root_finding: RootFinding,
    pub permutation: PermutationMethod,
}

impl Default for PercolationConfig {
    fn default() -> Self {
        Self {
            dim: 4,
            seed: None,
            root_finding: RootFinding::default(),
            permutation: PermutationMethod::default(),
        }
    }
}

impl PercolationConfig {
    /// Default parameters on a `dim x dim` torus.
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_root_finding(mut self, root_finding: RootFinding) -> Self {
        self.root_finding = root_finding;
        self
    }

    pub fn with_permutation(mut self, permutation: PermutationMethod) -> Self {
        self.permutation = permutation;
        self
    }

    /// Number of sites, `dim * dim`.
    ///
    /// # Errors
    /// [`PercolationError::InvalidDimension`] for `dim == 0` or overflow.
    pub fn validate(&self) -> Result<usize> {
        checked_num_sites(self.dim)
    }

    /// Runs one realization with the configured seed.
    ///
    /// # Errors
    /// [`PercolationError::InvalidDimension`] for an invalid `dim`.
    pub fn run(&self) -> Result<Realization> {
        match self.seed {
            Some(seed) => self.run_with_rng(&mut create_rng(seed)),
            None => self.run_with_rng(&mut entropy_rng()),
        }
    }

    /// Runs one realization drawing the occupation order from `rng`.
    ///
    /// The configured seed is ignored.
    pub fn run_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Realization> {
        self.validate()?;
        let lattice = Lattice::new(self.dim)?;
        let order = random_permutation(lattice.num_sites(), self.permutation, rng);
        percolate(lattice.neighbors(), &order, self.root_finding)
    }
}

/// Parameters of a set of independent realizations.
///
/// Realization `i` uses the seed `base + i`, where `base` is
/// `percolation.seed` or, if unset, a seed drawn once from the OS.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnsembleConfig {
    pub percolation: PercolationConfig,
    pub realizations: usize,
}

impl Default for EnsembleConfig {
    fn default() -> Self {
        Self {
            percolation: PercolationConfig::default(),
            realizations: 100,
        }
    }
}

impl EnsembleConfig {
    pub fn new(percolation: PercolationConfig, realizations: usize) -> Self {
        Self {
            percolation,
            realizations,
        }
    }

    /// Returns the number of sites.
    ///
    /// # Errors
    /// - [`PercolationError::InvalidRealizations`] for zero realizations.
    /// - [`PercolationError::InvalidDimension`] for an invalid `dim`.
    pub fn validate(&self) -> Result<usize> {
        if self.realizations == 0 {
            return Err(PercolationError::InvalidRealizations);
        }
        self.percolation.validate()
    }

    /// Seed of the first realization.
    pub fn base_seed(&self) -> u64 {
        self.percolation
            .seed
            .unwrap_or_else(|| entropy_rng().random())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PercolationConfig::default();
        assert_eq!(config.dim, 4);
        assert_eq!(config.seed, None);
        assert_eq!(config.root_finding, RootFinding::Halving);
        assert_eq!(config.permutation, PermutationMethod::FisherYates);
        assert_eq!(config.validate(), Ok(16));
    }

    #[test]
    fn test_builder() {
        let config = PercolationConfig::new(7)
            .with_seed(3)
            .with_root_finding(RootFinding::Compression)
            .with_permutation(PermutationMethod::Library);
        assert_eq!(config.dim, 7);
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.root_finding, RootFinding::Compression);
        assert_eq!(config.permutation, PermutationMethod::Library);
    }

    #[test]
    fn test_invalid_dimension() {
        let config = PercolationConfig::new(0);
        assert_eq!(
            config.run(),
            Err(PercolationError::InvalidDimension { dim: 0 })
        );
    }

    #[test]
    fn test_seeded_run_is_reproducible() {
        let config = PercolationConfig::new(6).with_seed(11);
        assert_eq!(config.run().unwrap(), config.run().unwrap());
    }

    #[test]
    fn test_unseeded_run_completes() {
        let run = PercolationConfig::new(5).run().unwrap();
        assert_eq!(run.largest_component_size, 25);
    }

    #[test]
    fn test_ensemble_validation() {
        let config = EnsembleConfig::new(PercolationConfig::new(3), 0);
        assert_eq!(config.validate(), Err(PercolationError::InvalidRealizations));
        let config = EnsembleConfig::new(PercolationConfig::new(3).with_seed(9), 2);
        assert_eq!(config.validate(), Ok(9));
        assert_eq!(config.base_seed(), 9);
    }
}
