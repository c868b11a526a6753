//! Newman-Ziff incremental site percolation.
//!
//! Sites are occupied one at a time in a given order. Each newly occupied
//! site starts as a singleton component and is merged with the component of
//! every occupied neighbour, using weighted union on the component sizes
//! stored at the roots of the [`PointerArray`]. After every merge the size
//! of the largest component is updated, so the whole curve "largest
//! component vs. number of occupied sites" comes out of a single pass.
//!
//! # Algorithm
//!
//! For the new site `s1` with running root `r1 = s1`, and each neighbour
//! `s2` in the order east, west, south, north:
//!
//! 1. skip `s2` if it is empty;
//! 2. find `r2`, the root of `s2`; skip if `r2 == r1`;
//! 3. the strictly larger component absorbs the smaller one. On equal sizes
//!    `r2` absorbs `r1`. The surviving root becomes the new `r1`.
//!
//! The tie rule is arbitrary but fixed, so runs are reproducible.
//!
//! # Complexity
//! O(n α(n)) for a full pass over `n` sites.
//!
//! # References
//!
//! - Newman & Ziff (2001), "Fast Monte Carlo algorithm for site or bond
//!   percolation", *Phys. Rev. E* 64, 016706.
//! - Newman (2010), *Networks: An Introduction*, §16.5.

use crate::collections::{PointerArray, RootFinding, Site};
use crate::error::{PercolationError, Result};
use crate::lattice::NUM_NEIGHBORS;

/// Outcome of one percolation realization.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Realization {
    /// Largest component size seen during the run.
    pub largest_component_size: usize,
    /// Forest after the last occupation.
    pub pointers: PointerArray,
    /// `trajectory[n]` is the largest component size after `n` occupations.
    pub trajectory: Vec<usize>,
}

impl Realization {
    /// Number of sites that were occupied.
    pub fn occupied(&self) -> usize {
        self.trajectory.len() - 1
    }

    /// Largest component size divided by the number of sites, per step.
    pub fn largest_fraction(&self) -> Vec<f64> {
        let n = self.pointers.len().max(1) as f64;
        self.trajectory.iter().map(|&big| big as f64 / n).collect()
    }
}

/// Incremental percolation state over a fixed neighbour table.
///
/// # Examples
/// ```
/// use site_percolation::collections::RootFinding;
/// use site_percolation::engine::Percolation;
/// use site_percolation::lattice::Lattice;
///
/// let lattice = Lattice::new(3).unwrap();
/// let mut perc = Percolation::new(lattice.neighbors(), RootFinding::Halving);
/// assert_eq!(perc.occupy_next(4).unwrap(), 0);
/// assert_eq!(perc.occupy_next(5).unwrap(), 2);
/// assert_eq!(perc.occupy_next(0).unwrap(), 2);
/// assert_eq!(perc.pointers().component_size(5), Some(2));
/// ```
#[derive(Debug, Clone)]
pub struct Percolation<'a> {
    neighbors: &'a [[usize; NUM_NEIGHBORS]],
    pointers: PointerArray,
    strategy: RootFinding,
    largest: usize,
    trajectory: Vec<usize>,
}

impl<'a> Percolation<'a> {
    /// Creates an engine with every site empty.
    ///
    /// `neighbors` is trusted as built by
    /// [`build_neighbors`](crate::lattice::build_neighbors).
    ///
    /// # Panics
    /// [`occupy_next`](Self::occupy_next) panics if a table entry is not
    /// below `neighbors.len()`.
    pub fn new(neighbors: &'a [[usize; NUM_NEIGHBORS]], strategy: RootFinding) -> Self {
        let num_sites = neighbors.len();
        let mut trajectory = Vec::with_capacity(num_sites + 1);
        trajectory.push(0);
        Self {
            neighbors,
            pointers: PointerArray::new(num_sites),
            strategy,
            largest: 0,
            trajectory,
        }
    }

    /// Empties every site, keeping the allocations.
    pub fn reset(&mut self) {
        self.pointers = PointerArray::new(self.neighbors.len());
        self.largest = 0;
        self.trajectory.clear();
        self.trajectory.push(0);
    }

    /// Number of sites.
    pub fn num_sites(&self) -> usize {
        self.neighbors.len()
    }

    /// Number of occupied sites.
    pub fn occupied(&self) -> usize {
        self.trajectory.len() - 1
    }

    /// Returns `true` once every site is occupied.
    pub fn is_complete(&self) -> bool {
        self.occupied() == self.num_sites()
    }

    /// Largest component size so far. Starts at 0 and only grows on merges.
    pub fn largest_component_size(&self) -> usize {
        self.largest
    }

    /// Root-finding strategy in use.
    pub fn strategy(&self) -> RootFinding {
        self.strategy
    }

    /// Current forest.
    pub fn pointers(&self) -> &PointerArray {
        &self.pointers
    }

    /// Largest component size after each occupation, starting with 0.
    pub fn trajectory(&self) -> &[usize] {
        &self.trajectory
    }

    /// Occupies `site` and merges it with its occupied neighbours.
    ///
    /// Returns the largest component size after the step.
    ///
    /// # Errors
    /// - [`PercolationError::SiteOutOfRange`] if `site >= num_sites()`.
    /// - [`PercolationError::SiteAlreadyOccupied`] if `site` is occupied,
    ///   which means the occupation order is not a permutation. The engine
    ///   is left unchanged; callers should treat this as fatal.
    pub fn occupy_next(&mut self, site: usize) -> Result<usize> {
        let num_sites = self.num_sites();
        if site >= num_sites {
            return Err(PercolationError::SiteOutOfRange { site, num_sites });
        }
        if self.pointers[site].is_occupied() {
            return Err(PercolationError::SiteAlreadyOccupied { site });
        }

        self.pointers.set(site, Site::Root { size: 1 });
        let mut r1 = site;

        for s2 in self.neighbors[site] {
            if !self.pointers[s2].is_occupied() {
                continue;
            }
            let r2 = self.pointers.find_root(s2, self.strategy);
            if r2 == r1 {
                continue;
            }

            let size1 = self.root_size(r1);
            let size2 = self.root_size(r2);
            let merged = size1 + size2;
            if size1 > size2 {
                self.pointers.set(r1, Site::Root { size: merged });
                self.pointers.set(r2, Site::Child { parent: r1 });
            } else {
                self.pointers.set(r2, Site::Root { size: merged });
                self.pointers.set(r1, Site::Child { parent: r2 });
                r1 = r2;
            }

            if merged > self.largest {
                self.largest = merged;
            }
        }

        self.trajectory.push(self.largest);
        log::trace!("{} {}", self.occupied(), self.largest);
        Ok(self.largest)
    }

    /// Occupies the sites of `order` in turn.
    ///
    /// `order` may be any prefix of a permutation; stopping early leaves a
    /// valid intermediate state.
    ///
    /// # Errors
    /// Stops at the first error of [`occupy_next`](Self::occupy_next).
    pub fn occupy_all(&mut self, order: &[usize]) -> Result<usize> {
        for &site in order {
            self.occupy_next(site)?;
        }
        Ok(self.largest)
    }

    /// Consumes the engine, returning the final state.
    pub fn into_realization(self) -> Realization {
        Realization {
            largest_component_size: self.largest,
            pointers: self.pointers,
            trajectory: self.trajectory,
        }
    }

    fn root_size(&self, root: usize) -> usize {
        debug_assert!(self.pointers[root].is_root(), "site {root} is not a root");
        match self.pointers[root] {
            Site::Root { size } => size,
            _ => 0,
        }
    }
}

/// Runs one full realization: every site is occupied in `permutation` order.
///
/// # Panics
/// Panics if a neighbour table entry is not below `neighbors.len()`.
///
/// # Errors
/// - [`PercolationError::PermutationLength`] if `permutation` does not have
///   one entry per site.
/// - [`PercolationError::SiteAlreadyOccupied`] or
///   [`PercolationError::SiteOutOfRange`] if it is not a permutation.
///
/// # Examples
/// ```
/// use site_percolation::collections::RootFinding;
/// use site_percolation::engine::percolate;
/// use site_percolation::lattice::Lattice;
///
/// let lattice = Lattice::new(3).unwrap();
/// let run = percolate(lattice.neighbors(), &[4, 5, 8, 0, 2, 6, 3, 1, 7], RootFinding::Halving).unwrap();
/// assert_eq!(run.largest_component_size, 9);
/// assert_eq!(run.pointers.roots(), vec![4]);
/// ```
pub fn percolate(
    neighbors: &[[usize; NUM_NEIGHBORS]],
    permutation: &[usize],
    strategy: RootFinding,
) -> Result<Realization> {
    let num_sites = neighbors.len();
    if permutation.len() != num_sites {
        return Err(PercolationError::PermutationLength {
            len: permutation.len(),
            num_sites,
        });
    }
    let mut perc = Percolation::new(neighbors, strategy);
    perc.occupy_all(permutation)?;
    log::debug!(
        "realization over {num_sites} sites finished, largest component {}",
        perc.largest_component_size()
    );
    Ok(perc.into_realization())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::Lattice;

    const BOTH: [RootFinding; 2] = [RootFinding::Halving, RootFinding::Compression];

    #[test]
    fn test_dim_two_identity_order() {
        let lattice = Lattice::new(2).unwrap();
        for strategy in BOTH {
            let run = percolate(lattice.neighbors(), &[0, 1, 2, 3], strategy).unwrap();
            assert_eq!(run.largest_component_size, 4);
            assert_eq!(run.trajectory, vec![0, 0, 2, 3, 4]);
            // site 1 ties with 0 and is absorbed, then 0 keeps winning
            assert_eq!(run.pointers.roots(), vec![0]);
            assert_eq!(run.pointers[0], Site::Root { size: 4 });
        }
    }

    #[test]
    fn test_dim_three_scenario() {
        let lattice = Lattice::new(3).unwrap();
        let order = [4, 5, 8, 0, 2, 6, 3, 1, 7];
        for strategy in BOTH {
            let run = percolate(lattice.neighbors(), &order, strategy).unwrap();
            assert_eq!(run.largest_component_size, 9);
            assert_eq!(run.trajectory, vec![0, 0, 2, 3, 3, 5, 6, 7, 8, 9]);
            assert_eq!(run.pointers.roots(), vec![4]);
            assert_eq!(run.pointers[4], Site::Root { size: 9 });
        }
    }

    #[test]
    fn test_dim_three_step_by_step() {
        let lattice = Lattice::new(3).unwrap();
        let mut perc = Percolation::new(lattice.neighbors(), RootFinding::Halving);

        // lone site: no merge yet
        assert_eq!(perc.occupy_next(4).unwrap(), 0);
        assert_eq!(perc.pointers()[4], Site::Root { size: 1 });

        // 5 is east of 4; equal sizes, so 4 (the neighbour's root) survives
        assert_eq!(perc.occupy_next(5).unwrap(), 2);
        assert_eq!(perc.pointers()[5], Site::Child { parent: 4 });

        // 8 is south of 5; the pair absorbs the singleton
        assert_eq!(perc.occupy_next(8).unwrap(), 3);
        assert_eq!(perc.pointers()[8], Site::Child { parent: 4 });

        // 0 touches nothing occupied
        assert_eq!(perc.occupy_next(0).unwrap(), 3);
        assert_eq!(perc.pointers().roots(), vec![0, 4]);

        // 2 joins 0 (east, wrapping) and then the big component through 5 (south)
        assert_eq!(perc.occupy_next(2).unwrap(), 5);
        assert_eq!(perc.pointers().roots(), vec![4]);
    }

    #[test]
    fn test_singleton_tie() {
        let lattice = Lattice::new(4).unwrap();
        let mut perc = Percolation::new(lattice.neighbors(), RootFinding::Halving);
        perc.occupy_next(6).unwrap();
        // 6 is east of 5; the neighbour's root wins the tie
        perc.occupy_next(5).unwrap();
        assert_eq!(perc.pointers()[5], Site::Child { parent: 6 });
        assert_eq!(perc.pointers()[6], Site::Root { size: 2 });
    }

    #[test]
    fn test_tie_break_favours_neighbor_root() {
        let lattice = Lattice::new(5).unwrap();
        let mut perc = Percolation::new(lattice.neighbors(), RootFinding::Halving);
        // singleton {2} and pair {0, 5} rooted at 0
        perc.occupy_all(&[2, 0, 5]).unwrap();
        assert_eq!(perc.pointers().roots(), vec![0, 2]);

        // site 1 first merges east into 2, making the running root 2 with
        // size 2, then meets 0 (west) whose component also has size 2
        perc.occupy_next(1).unwrap();
        assert_eq!(perc.pointers()[1], Site::Child { parent: 2 });
        assert_eq!(perc.pointers()[2], Site::Child { parent: 0 });
        assert_eq!(perc.pointers()[0], Site::Root { size: 4 });
        assert_eq!(perc.largest_component_size(), 4);
    }

    #[test]
    fn test_larger_component_absorbs_smaller() {
        let lattice = Lattice::new(6).unwrap();
        let mut perc = Percolation::new(lattice.neighbors(), RootFinding::Compression);
        // row 0: 0, 1, 2 form a component of 3 rooted at 0; 4 stays alone
        perc.occupy_all(&[0, 1, 2, 4]).unwrap();
        assert_eq!(perc.pointers().roots(), vec![0, 4]);

        // 3 ties with 4 (east) and loses, then the pair {3, 4} meets the
        // larger component through 2 (west) and is absorbed
        perc.occupy_next(3).unwrap();
        assert_eq!(perc.pointers()[3], Site::Child { parent: 4 });
        assert_eq!(perc.pointers()[4], Site::Child { parent: 0 });
        assert_eq!(perc.pointers()[0], Site::Root { size: 5 });
    }

    #[test]
    fn test_double_occupation_is_rejected() {
        let lattice = Lattice::new(3).unwrap();
        let mut perc = Percolation::new(lattice.neighbors(), RootFinding::Halving);
        perc.occupy_all(&[1, 2]).unwrap();
        let before = perc.pointers().clone();
        assert_eq!(
            perc.occupy_next(2),
            Err(PercolationError::SiteAlreadyOccupied { site: 2 })
        );
        assert_eq!(perc.pointers(), &before);
        assert_eq!(perc.occupied(), 2);
    }

    #[test]
    fn test_out_of_range_site() {
        let lattice = Lattice::new(2).unwrap();
        let mut perc = Percolation::new(lattice.neighbors(), RootFinding::Halving);
        assert_eq!(
            perc.occupy_next(4),
            Err(PercolationError::SiteOutOfRange {
                site: 4,
                num_sites: 4
            })
        );
    }

    #[test]
    fn test_percolate_rejects_short_and_repeated_orders() {
        let lattice = Lattice::new(2).unwrap();
        assert_eq!(
            percolate(lattice.neighbors(), &[0, 1, 2], RootFinding::Halving),
            Err(PercolationError::PermutationLength {
                len: 3,
                num_sites: 4
            })
        );
        assert_eq!(
            percolate(lattice.neighbors(), &[0, 1, 1, 3], RootFinding::Halving),
            Err(PercolationError::SiteAlreadyOccupied { site: 1 })
        );
    }

    #[test]
    #[should_panic]
    fn test_neighbor_table_out_of_range_panics() {
        // site 0 names neighbour 5 on a two-site table
        let table = [[1, 1, 5, 1], [0, 0, 0, 0]];
        let mut perc = Percolation::new(&table, RootFinding::Halving);
        perc.occupy_next(1).unwrap();
        let _ = perc.occupy_next(0);
    }

    #[test]
    fn test_single_site_lattice() {
        let lattice = Lattice::new(1).unwrap();
        let run = percolate(lattice.neighbors(), &[0], RootFinding::Halving).unwrap();
        // self-loops never merge, so the largest size is never updated
        assert_eq!(run.largest_component_size, 0);
        assert_eq!(run.pointers[0], Site::Root { size: 1 });
    }

    #[test]
    fn test_reset() {
        let lattice = Lattice::new(3).unwrap();
        let mut perc = Percolation::new(lattice.neighbors(), RootFinding::Halving);
        perc.occupy_all(&[0, 1, 2]).unwrap();
        perc.reset();
        assert_eq!(perc.occupied(), 0);
        assert_eq!(perc.largest_component_size(), 0);
        assert_eq!(perc.trajectory(), &[0]);
        assert_eq!(perc.pointers().occupied_count(), 0);
    }

    #[test]
    fn test_largest_fraction() {
        let lattice = Lattice::new(2).unwrap();
        let run = percolate(lattice.neighbors(), &[0, 1, 2, 3], RootFinding::Halving).unwrap();
        assert_eq!(run.occupied(), 4);
        assert_eq!(run.largest_fraction(), vec![0.0, 0.0, 0.5, 0.75, 1.0]);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::lattice::Lattice;
    use crate::random::{create_rng, random_permutation, PermutationMethod};
    use proptest::prelude::*;

    /// Every occupied site walks to a root whose size is the exact number of
    /// sites walking to it.
    fn check_forest(ptr: &PointerArray) -> std::result::Result<(), TestCaseError> {
        let mut counts = vec![0usize; ptr.len()];
        for site in 0..ptr.len() {
            if ptr[site].is_occupied() {
                let root = ptr.root_of(site);
                prop_assert!(ptr[root].is_root());
                counts[root] += 1;
            }
        }
        for site in 0..ptr.len() {
            match ptr[site] {
                Site::Root { size } => prop_assert_eq!(size, counts[site]),
                _ => prop_assert_eq!(counts[site], 0),
            }
        }
        Ok(())
    }

    fn strategy_of(compression: bool) -> RootFinding {
        if compression {
            RootFinding::Compression
        } else {
            RootFinding::Halving
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn forest_invariants_hold_after_every_step(
            dim in 1_usize..9,
            seed in 0_u64..10000,
            compression in any::<bool>(),
        ) {
            let lattice = Lattice::new(dim).unwrap();
            let order = random_permutation(lattice.num_sites(), PermutationMethod::FisherYates, &mut create_rng(seed));
            let mut perc = Percolation::new(lattice.neighbors(), strategy_of(compression));
            for &site in &order {
                perc.occupy_next(site).unwrap();
                check_forest(perc.pointers())?;
                prop_assert!(perc.largest_component_size() <= perc.occupied());
            }
        }

        #[test]
        fn trajectory_is_monotone(
            dim in 1_usize..16,
            seed in 0_u64..10000,
        ) {
            let lattice = Lattice::new(dim).unwrap();
            let order = random_permutation(lattice.num_sites(), PermutationMethod::FisherYates, &mut create_rng(seed));
            let run = percolate(lattice.neighbors(), &order, RootFinding::Halving).unwrap();
            prop_assert!(run.trajectory.windows(2).all(|w| w[0] <= w[1]));
            prop_assert_eq!(run.trajectory.len(), lattice.num_sites() + 1);
            prop_assert_eq!(run.trajectory.last().copied(), Some(run.largest_component_size));
        }

        #[test]
        fn full_occupation_connects_the_torus(
            dim in 2_usize..16,
            seed in 0_u64..10000,
            compression in any::<bool>(),
        ) {
            let lattice = Lattice::new(dim).unwrap();
            let order = random_permutation(lattice.num_sites(), PermutationMethod::Library, &mut create_rng(seed));
            let run = percolate(lattice.neighbors(), &order, strategy_of(compression)).unwrap();
            prop_assert_eq!(run.largest_component_size, lattice.num_sites());
            prop_assert_eq!(run.pointers.roots().len(), 1);
        }

        #[test]
        fn strategies_produce_the_same_components(
            dim in 1_usize..12,
            seed in 0_u64..10000,
            prefix in 0.0_f64..=1.0,
        ) {
            let lattice = Lattice::new(dim).unwrap();
            let order = random_permutation(lattice.num_sites(), PermutationMethod::FisherYates, &mut create_rng(seed));
            let cut = ((order.len() as f64) * prefix) as usize;
            let mut halving = Percolation::new(lattice.neighbors(), RootFinding::Halving);
            let mut compression = Percolation::new(lattice.neighbors(), RootFinding::Compression);
            halving.occupy_all(&order[..cut]).unwrap();
            compression.occupy_all(&order[..cut]).unwrap();
            prop_assert_eq!(halving.trajectory(), compression.trajectory());
            prop_assert_eq!(halving.pointers().roots(), compression.pointers().roots());
            for site in 0..lattice.num_sites() {
                prop_assert_eq!(
                    halving.pointers().root_of(site),
                    compression.pointers().root_of(site)
                );
            }
        }
    }
}
