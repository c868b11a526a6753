//! Averages over many independent realizations.
//!
//! A single realization gives the largest component size after each number
//! `n` of occupied sites. Averaging its fraction of the lattice over many
//! realizations estimates the conditional statistic `Q_n`. The statistic at
//! occupation probability `p` then follows from the binomial convolution
//!
//! ```text
//! Q(p) = Σ_n C(N, n) pⁿ (1 − p)^(N − n) Q_n
//! ```
//!
//! (equation (2) of Newman & Ziff 2001).
//!
//! Realizations run in parallel on the rayon pool. Each one owns its
//! generator and its pointer array; only the neighbour table is shared.

use rayon::prelude::*;

use crate::config::EnsembleConfig;
use crate::engine::percolate;
use crate::error::{PercolationError, Result};
use crate::lattice::Lattice;
use crate::random::{create_rng, random_permutation};
use crate::special::binomial_pmf;
use crate::stats::{kahan_sum, WelfordAccumulator};

/// Per-step statistics of the largest-component fraction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ensemble {
    num_sites: usize,
    per_step: Vec<WelfordAccumulator>,
}

impl Ensemble {
    /// Number of lattice sites `N`.
    pub fn num_sites(&self) -> usize {
        self.num_sites
    }

    /// Number of realizations averaged.
    pub fn realizations(&self) -> u64 {
        self.per_step.first().map_or(0, WelfordAccumulator::count)
    }

    /// Mean largest-component fraction for `n = 0..=N`.
    pub fn q_n(&self) -> Vec<f64> {
        self.per_step
            .iter()
            .map(|acc| acc.mean().unwrap_or(0.0))
            .collect()
    }

    /// Sample standard deviation of the fraction for `n = 0..=N`; zero
    /// with fewer than two realizations.
    pub fn std_dev_n(&self) -> Vec<f64> {
        self.per_step
            .iter()
            .map(|acc| acc.sample_std_dev().unwrap_or(0.0))
            .collect()
    }

    /// `Q(p)`, the binomial average of [`q_n`](Self::q_n).
    ///
    /// # Errors
    /// [`PercolationError::InvalidProbability`] if `p` is not in `[0, 1]`.
    pub fn q_of_p(&self, p: f64) -> Result<f64> {
        binomial_convolution(&self.q_n(), p)
    }
}

/// Runs `config.realizations` independent realizations and aggregates them.
///
/// # Errors
/// Configuration errors from [`EnsembleConfig::validate`].
///
/// # Examples
/// ```
/// use site_percolation::config::{EnsembleConfig, PercolationConfig};
/// use site_percolation::ensemble::run_ensemble;
///
/// let config = EnsembleConfig::new(PercolationConfig::new(4).with_seed(1), 8);
/// let ensemble = run_ensemble(&config).unwrap();
/// assert_eq!(ensemble.realizations(), 8);
/// assert_eq!(ensemble.q_n()[16], 1.0);
/// ```
pub fn run_ensemble(config: &EnsembleConfig) -> Result<Ensemble> {
    let num_sites = config.validate()?;
    let lattice = Lattice::new(config.percolation.dim)?;
    let base_seed = config.base_seed();
    let method = config.percolation.permutation;
    let strategy = config.percolation.root_finding;
    log::info!(
        "running {} realizations on a {}x{} torus (base seed {base_seed})",
        config.realizations,
        lattice.dim(),
        lattice.dim()
    );

    let empty = || vec![WelfordAccumulator::new(); num_sites + 1];
    let per_step = (0..config.realizations)
        .into_par_iter()
        .try_fold(
            empty,
            |mut accs: Vec<WelfordAccumulator>, index: usize| -> Result<Vec<WelfordAccumulator>> {
                let mut rng = create_rng(base_seed.wrapping_add(index as u64));
                let order = random_permutation(num_sites, method, &mut rng);
                let run = percolate(lattice.neighbors(), &order, strategy)?;
                for (acc, fraction) in accs.iter_mut().zip(run.largest_fraction()) {
                    acc.update(fraction);
                }
                Ok(accs)
            },
        )
        .try_reduce(empty, |mut left, right| -> Result<Vec<WelfordAccumulator>> {
            for (acc, other) in left.iter_mut().zip(&right) {
                acc.merge(other);
            }
            Ok(left)
        })?;

    let ensemble = Ensemble {
        num_sites,
        per_step,
    };
    log::info!("ensemble of {} realizations finished", ensemble.realizations());
    Ok(ensemble)
}

/// Binomial convolution of a conditional statistic.
///
/// `q_n[n]` is the statistic given `n` occupied sites, for `n = 0..=N`.
///
/// # Errors
/// [`PercolationError::InvalidProbability`] if `p` is not in `[0, 1]`.
///
/// # Examples
/// ```
/// use site_percolation::ensemble::binomial_convolution;
/// let q = [0.0, 0.5, 1.0];
/// assert_eq!(binomial_convolution(&q, 0.0).unwrap(), 0.0);
/// assert_eq!(binomial_convolution(&q, 1.0).unwrap(), 1.0);
/// // linear in n, so Q(p) = p
/// assert!((binomial_convolution(&q, 0.3).unwrap() - 0.3).abs() < 1e-12);
/// ```
pub fn binomial_convolution(q_n: &[f64], p: f64) -> Result<f64> {
    if !(0.0..=1.0).contains(&p) {
        return Err(PercolationError::InvalidProbability { p });
    }
    let Some(num_sites) = q_n.len().checked_sub(1) else {
        return Ok(0.0);
    };
    Ok(kahan_sum(
        q_n.iter()
            .enumerate()
            .map(|(n, &q)| binomial_pmf(num_sites, n, p) * q),
    ))
}
