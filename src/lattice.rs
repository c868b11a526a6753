//! Square lattice embedded in a torus.
//!
//! Sites are numbered row-major: site `i` sits at row `i / dim`, column
//! `i % dim`. Every site has four nearest neighbours, with wraparound on all
//! four edges, so the lattice has no boundary.
//!
//! # Degenerate sizes
//!
//! For `dim >= 3` the four neighbours of every site are distinct and the
//! neighbour relation is symmetric. For `dim == 2` east and west coincide,
//! as do south and north. For `dim == 1` the single site is its own
//! neighbour four times over. Both small cases are accepted; the
//! percolation engine skips a neighbour that already shares its root.

use crate::error::{PercolationError, Result};

/// Number of nearest neighbours of a site on the square lattice.
pub const NUM_NEIGHBORS: usize = 4;

/// Neighbour directions, in the order they appear in a [`NeighborTable`]
/// row and the order the engine visits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    East,
    West,
    South,
    North,
}

impl Direction {
    /// All directions in table order.
    pub const ALL: [Direction; NUM_NEIGHBORS] = [
        Direction::East,
        Direction::West,
        Direction::South,
        Direction::North,
    ];

    /// Column index of this direction in a neighbour table row.
    pub fn index(self) -> usize {
        self as usize
    }

    /// The direction pointing back.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::East => Direction::West,
            Direction::West => Direction::East,
            Direction::South => Direction::North,
            Direction::North => Direction::South,
        }
    }
}

/// Neighbour table: row `i` holds `[east, west, south, north]` of site `i`.
pub type NeighborTable = Vec<[usize; NUM_NEIGHBORS]>;

/// Builds the neighbour table of a `dim x dim` torus.
///
/// # Errors
/// Returns [`PercolationError::InvalidDimension`] if `dim == 0` or if
/// `dim * dim` overflows `usize`.
///
/// # Examples
/// ```
/// use site_percolation::lattice::build_neighbors;
/// let table = build_neighbors(3).unwrap();
/// // site 4 is the centre of a 3x3 lattice
/// assert_eq!(table[4], [5, 3, 7, 1]);
/// // site 0 wraps around on both axes
/// assert_eq!(table[0], [1, 2, 3, 6]);
/// ```
pub fn build_neighbors(dim: usize) -> Result<NeighborTable> {
    let num_sites = checked_num_sites(dim)?;
    let table = (0..num_sites)
        .map(|site| {
            let row = site / dim;
            let col = site % dim;
            let east = row * dim + (col + 1) % dim;
            let west = row * dim + (col + dim - 1) % dim;
            let south = ((row + 1) % dim) * dim + col;
            let north = ((row + dim - 1) % dim) * dim + col;
            [east, west, south, north]
        })
        .collect();
    Ok(table)
}

/// `dim * dim`, or [`PercolationError::InvalidDimension`].
pub(crate) fn checked_num_sites(dim: usize) -> Result<usize> {
    if dim == 0 {
        return Err(PercolationError::InvalidDimension { dim });
    }
    dim.checked_mul(dim)
        .ok_or(PercolationError::InvalidDimension { dim })
}

/// An immutable `dim x dim` toroidal lattice with its neighbour table.
///
/// # Examples
/// ```
/// use site_percolation::lattice::{Direction, Lattice};
/// let lattice = Lattice::new(4).unwrap();
/// assert_eq!(lattice.num_sites(), 16);
/// assert_eq!(lattice.neighbor(3, Direction::East), 0);
/// assert_eq!(lattice.coordinates(6), (1, 2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lattice {
    dim: usize,
    neighbors: NeighborTable,
}

impl Lattice {
    /// Builds a lattice of linear dimension `dim`.
    ///
    /// # Errors
    /// Same as [`build_neighbors`].
    pub fn new(dim: usize) -> Result<Self> {
        let neighbors = build_neighbors(dim)?;
        log::debug!("built {dim}x{dim} torus with {} sites", neighbors.len());
        Ok(Self { dim, neighbors })
    }

    /// Linear dimension.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Total number of sites, `dim * dim`.
    pub fn num_sites(&self) -> usize {
        self.neighbors.len()
    }

    /// The full neighbour table.
    pub fn neighbors(&self) -> &NeighborTable {
        &self.neighbors
    }

    /// The four neighbours of `site` in table order.
    ///
    /// # Panics
    /// Panics if `site >= num_sites()`.
    pub fn neighbors_of(&self, site: usize) -> &[usize; NUM_NEIGHBORS] {
        &self.neighbors[site]
    }

    /// Neighbour of `site` in direction `dir`.
    ///
    /// # Panics
    /// Panics if `site >= num_sites()`.
    pub fn neighbor(&self, site: usize, dir: Direction) -> usize {
        self.neighbors[site][dir.index()]
    }

    /// `(row, col)` of a site.
    pub fn coordinates(&self, site: usize) -> (usize, usize) {
        (site / self.dim, site % self.dim)
    }

    /// Site id at `(row, col)`, both taken modulo `dim`.
    pub fn site(&self, row: usize, col: usize) -> usize {
        (row % self.dim) * self.dim + col % self.dim
    }

    /// Returns `true` if `site` is a valid id for this lattice.
    pub fn contains(&self, site: usize) -> bool {
        site < self.num_sites()
    }
}
