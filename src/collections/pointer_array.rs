//! Per-site pointer array of the Newman-Ziff union-find forest.
//!
//! Each site is in one of three states:
//!
//! - [`Site::Empty`]: not yet occupied;
//! - [`Site::Root`]: occupied and the representative of its component,
//!   carrying the exact component size;
//! - [`Site::Child`]: occupied, pointing at a parent in the same tree (not
//!   necessarily the root).
//!
//! Newman and Ziff pack all three states into one signed integer per site.
//! That encoding is kept as the exchange format, see
//! [`PointerArray::to_raw`] and [`PointerArray::from_raw`]:
//!
//! | State | Raw value |
//! |---|---|
//! | `Empty` | `-num_sites - 1` |
//! | `Root { size }` | `-size`, in `[-num_sites, -1]` |
//! | `Child { parent }` | `parent`, in `[0, num_sites)` |
//!
//! # Root finding
//!
//! Two strategies with amortized O(α(n)) cost, selected with
//! [`RootFinding`]. They always agree on the root; they leave different
//! intermediate pointers behind, so one run should stick to one strategy.
//!
//! # References
//!
//! - Newman & Ziff (2001), "Fast Monte Carlo algorithm for site or bond
//!   percolation", *Phys. Rev. E* 64, 016706.
//! - Tarjan & van Leeuwen (1984), "Worst-Case Analysis of Set Union Algorithms"

use crate::error::{PercolationError, Result};

/// State of one site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Site {
    /// Not occupied.
    #[default]
    Empty,
    /// Occupied component representative; `size` is the component size.
    Root { size: usize },
    /// Occupied non-root site pointing at `parent`.
    Child { parent: usize },
}

impl Site {
    /// Returns `true` unless the site is empty.
    pub fn is_occupied(self) -> bool {
        !matches!(self, Site::Empty)
    }

    /// Returns `true` for a component root.
    pub fn is_root(self) -> bool {
        matches!(self, Site::Root { .. })
    }
}

/// Root-finding strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RootFinding {
    /// Iterative; every visited node is re-pointed at its grandparent.
    #[default]
    Halving,
    /// Every visited node is re-pointed straight at the root.
    ///
    /// Implemented with two iterative passes, so deep trees cannot overflow
    /// the call stack.
    Compression,
}

/// The union-find forest over all sites of a lattice.
///
/// # Examples
/// ```
/// use site_percolation::collections::{PointerArray, RootFinding, Site};
///
/// let mut ptr = PointerArray::new(4);
/// assert_eq!(ptr.occupied_count(), 0);
///
/// ptr.set(2, Site::Root { size: 2 });
/// ptr.set(3, Site::Child { parent: 2 });
/// assert_eq!(ptr.find_root(3, RootFinding::Halving), 2);
/// assert_eq!(ptr.component_size(3), Some(2));
/// assert_eq!(ptr.to_raw(), vec![-5, -5, -2, 2]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointerArray {
    sites: Vec<Site>,
}

impl PointerArray {
    /// Creates an array of `num_sites` empty sites.
    ///
    /// # Complexity
    /// O(n)
    pub fn new(num_sites: usize) -> Self {
        Self {
            sites: vec![Site::Empty; num_sites],
        }
    }

    /// Returns the number of sites.
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    /// Returns `true` if there are no sites.
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// State of `site`.
    ///
    /// # Panics
    /// Panics if `site >= len()`.
    pub fn get(&self, site: usize) -> Site {
        self.sites[site]
    }

    /// Overwrites the state of `site`.
    ///
    /// No invariant is checked; the engine is the only writer that keeps
    /// sizes and parent pointers consistent.
    ///
    /// # Panics
    /// Panics if `site >= len()`.
    pub fn set(&mut self, site: usize, state: Site) {
        self.sites[site] = state;
    }

    /// All site states, in site order.
    pub fn as_slice(&self) -> &[Site] {
        &self.sites
    }

    /// Iterator over site states, in site order.
    pub fn iter(&self) -> std::slice::Iter<'_, Site> {
        self.sites.iter()
    }

    /// Number of occupied sites.
    ///
    /// # Complexity
    /// O(n)
    pub fn occupied_count(&self) -> usize {
        self.sites.iter().filter(|s| s.is_occupied()).count()
    }

    /// Ids of all roots, ascending.
    pub fn roots(&self) -> Vec<usize> {
        self.sites
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_root())
            .map(|(i, _)| i)
            .collect()
    }

    /// Finds the root of an occupied `site`, shortening the path on the way.
    ///
    /// # Complexity
    /// Amortized O(α(n))
    ///
    /// # Panics
    /// Panics if `site >= len()`. Must not be called on an empty site; in
    /// debug builds that is asserted, in release builds the site itself is
    /// returned.
    pub fn find_root(&mut self, site: usize, strategy: RootFinding) -> usize {
        debug_assert!(
            self.sites[site].is_occupied(),
            "find_root on empty site {site}"
        );
        match strategy {
            RootFinding::Halving => self.find_root_halving(site),
            RootFinding::Compression => self.find_root_compression(site),
        }
    }

    fn find_root_halving(&mut self, site: usize) -> usize {
        let mut s = site;
        let mut r = site;
        while let Site::Child { parent } = self.sites[r] {
            // on the first pass s == r, so this is a no-op
            self.sites[s] = self.sites[r];
            s = r;
            r = parent;
        }
        r
    }

    fn find_root_compression(&mut self, site: usize) -> usize {
        let root = self.root_of(site);
        let mut s = site;
        while let Site::Child { parent } = self.sites[s] {
            self.sites[s] = Site::Child { parent: root };
            s = parent;
        }
        root
    }

    /// Finds the root of `site` without touching the array.
    ///
    /// Returns `site` itself for a root or an empty site.
    ///
    /// # Complexity
    /// O(tree height)
    pub fn root_of(&self, site: usize) -> usize {
        let mut r = site;
        while let Site::Child { parent } = self.sites[r] {
            r = parent;
        }
        r
    }

    /// Size of the component containing `site`, or `None` if it is empty.
    pub fn component_size(&self, site: usize) -> Option<usize> {
        match self.sites[self.root_of(site)] {
            Site::Root { size } => Some(size),
            _ => None,
        }
    }

    /// Size of the largest component, `0` when nothing is occupied.
    pub fn largest_component(&self) -> usize {
        self.sites
            .iter()
            .filter_map(|s| match s {
                Site::Root { size } => Some(*size),
                _ => None,
            })
            .max()
            .unwrap_or(0)
    }

    /// The empty sentinel of the raw encoding, `-len() - 1`.
    pub fn empty_sentinel(&self) -> i64 {
        -(self.sites.len() as i64) - 1
    }

    /// Encodes the array as Newman-Ziff signed integers.
    pub fn to_raw(&self) -> Vec<i64> {
        let empty = self.empty_sentinel();
        self.sites
            .iter()
            .map(|s| match *s {
                Site::Empty => empty,
                Site::Root { size } => -(size as i64),
                Site::Child { parent } => parent as i64,
            })
            .collect()
    }

    /// Decodes signed integers using the default sentinel `-len - 1`.
    ///
    /// # Errors
    /// - [`PercolationError::InvalidPointerValue`] for a value that is not
    ///   the sentinel, a root size in `[-len, -1]` or a parent in `[0, len)`.
    /// - [`PercolationError::MalformedForest`] if parent pointers cycle or
    ///   lead to an empty site, or a root size differs from its member count.
    pub fn from_raw(raw: &[i64]) -> Result<Self> {
        Self::from_raw_with_sentinel(raw, -(raw.len() as i64) - 1)
    }

    /// Decodes signed integers with an explicit empty sentinel.
    ///
    /// Any value at or below `empty` counts as empty, matching the
    /// "occupied iff value > sentinel" reading of the encoding.
    ///
    /// # Errors
    /// Returns [`PercolationError::InvalidSentinel`] if `empty >= -len`,
    /// and the value and structure errors of [`from_raw`].
    ///
    /// [`from_raw`]: PointerArray::from_raw
    pub fn from_raw_with_sentinel(raw: &[i64], empty: i64) -> Result<Self> {
        let n = raw.len() as i64;
        if empty >= -n {
            return Err(PercolationError::InvalidSentinel {
                sentinel: empty,
                num_sites: raw.len(),
            });
        }
        let sites = raw
            .iter()
            .enumerate()
            .map(|(site, &value)| match value {
                v if v <= empty => Ok(Site::Empty),
                v if v < -n => Err(PercolationError::InvalidPointerValue { site, value }),
                v if v < 0 => Ok(Site::Root { size: (-v) as usize }),
                v if v < n => Ok(Site::Child { parent: v as usize }),
                _ => Err(PercolationError::InvalidPointerValue { site, value }),
            })
            .collect::<Result<Vec<_>>>()?;
        check_forest(&sites)?;
        Ok(Self { sites })
    }
}

/// Verifies that every occupied site walks to a root, and that each root's
/// size equals the number of sites walking to it.
///
/// # Complexity
/// O(n): each site is resolved once and its root cached.
fn check_forest(sites: &[Site]) -> Result<()> {
    let n = sites.len();
    let mut resolved: Vec<Option<usize>> = vec![None; n];
    let mut on_path = vec![false; n];
    let mut members = vec![0usize; n];
    let mut path = Vec::new();

    for start in 0..n {
        if !sites[start].is_occupied() {
            continue;
        }
        let mut s = start;
        let root = loop {
            if let Some(root) = resolved[s] {
                break root;
            }
            match sites[s] {
                Site::Root { .. } => break s,
                Site::Child { parent } if !on_path[s] => {
                    on_path[s] = true;
                    path.push(s);
                    s = parent;
                }
                // an empty parent, or a cycle back onto this walk
                _ => return Err(PercolationError::MalformedForest { site: start }),
            }
        };
        for visited in path.drain(..) {
            on_path[visited] = false;
            resolved[visited] = Some(root);
        }
        members[root] += 1;
    }

    for (site, state) in sites.iter().enumerate() {
        if let Site::Root { size } = *state {
            if size != members[site] {
                return Err(PercolationError::MalformedForest { site });
            }
        }
    }
    Ok(())
}

impl std::ops::Index<usize> for PointerArray {
    type Output = Site;

    fn index(&self, site: usize) -> &Site {
        &self.sites[site]
    }
}

impl<'a> IntoIterator for &'a PointerArray {
    type Item = &'a Site;
    type IntoIter = std::slice::Iter<'a, Site>;

    fn into_iter(self) -> Self::IntoIter {
        self.sites.iter()
    }
}
