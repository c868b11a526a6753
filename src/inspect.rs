//! Read-only views of a percolation state for drawing.
//!
//! Nothing here mutates a [`PointerArray`]: inspecting the same state twice
//! gives the same answer, and the state stays usable by the engine.
//!
//! Colours are purely presentational. Each root gets the colour of its site
//! id in a table of uniform random RGB triples drawn from a seeded
//! generator, so a component keeps its colour across calls as long as its
//! root and the seed stay the same.

use std::collections::BTreeMap;

use rand::Rng;

use crate::collections::{PointerArray, Site};
use crate::error::{PercolationError, Result};
use crate::random::create_rng;

/// Largest lattice, in sites, that [`render_data`] accepts.
pub const MAX_RENDER_SITES: usize = 1000;

/// Colour of unoccupied sites.
pub const EMPTY_COLOR: Rgb = Rgb {
    r: 0.7,
    g: 0.7,
    b: 0.7,
};

/// Marker size of occupied sites is this divided by the linear dimension.
const MARKER_SCALE: f64 = 600.0;

/// Ratio between occupied and unoccupied marker sizes.
const EMPTY_MARKER_RATIO: f64 = 1.5;

/// What inspection reports about one site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SiteDescription {
    pub occupied: bool,
    /// Root of the site's component, `None` when unoccupied.
    pub root: Option<usize>,
    pub is_root: bool,
}

/// Describes every site of `pointers`.
///
/// Roots are found by following parent pointers without compressing them.
///
/// # Examples
/// ```
/// use site_percolation::collections::{PointerArray, Site};
/// use site_percolation::inspect::describe_components;
///
/// let mut ptr = PointerArray::new(3);
/// ptr.set(0, Site::Root { size: 2 });
/// ptr.set(2, Site::Child { parent: 0 });
/// let desc = describe_components(&ptr);
/// assert_eq!(desc[2].root, Some(0));
/// assert!(desc[0].is_root);
/// assert!(!desc[1].occupied);
/// ```
pub fn describe_components(pointers: &PointerArray) -> Vec<SiteDescription> {
    pointers
        .iter()
        .enumerate()
        .map(|(site, state)| match state {
            Site::Empty => SiteDescription {
                occupied: false,
                root: None,
                is_root: false,
            },
            Site::Root { .. } => SiteDescription {
                occupied: true,
                root: Some(site),
                is_root: true,
            },
            Site::Child { .. } => SiteDescription {
                occupied: true,
                root: Some(pointers.root_of(site)),
                is_root: false,
            },
        })
        .collect()
}

/// Describes a state given in the raw signed-integer encoding.
///
/// A site is occupied iff its value is above `empty_sentinel`.
///
/// # Errors
/// Same as [`PointerArray::from_raw_with_sentinel`].
pub fn describe_raw(raw: &[i64], empty_sentinel: i64) -> Result<Vec<SiteDescription>> {
    let pointers = PointerArray::from_raw_with_sentinel(raw, empty_sentinel)?;
    Ok(describe_components(&pointers))
}

/// An RGB colour with components in `[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Assigns a colour to each root id.
///
/// The colour of a root depends only on its id and `seed`.
///
/// # Examples
/// ```
/// use site_percolation::inspect::color_assignment;
/// let a = color_assignment(&[3, 7], 42);
/// let b = color_assignment(&[7], 42);
/// assert_eq!(a[&7], b[&7]);
/// ```
pub fn color_assignment(root_ids: &[usize], seed: u64) -> BTreeMap<usize, Rgb> {
    let Some(&max_root) = root_ids.iter().max() else {
        return BTreeMap::new();
    };
    let mut rng = create_rng(seed);
    let table: Vec<Rgb> = (0..=max_root)
        .map(|_| Rgb {
            r: rng.random(),
            g: rng.random(),
            b: rng.random(),
        })
        .collect();
    root_ids.iter().map(|&root| (root, table[root])).collect()
}

/// Drawing data for one site.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderSite {
    pub site: usize,
    /// Position on the unit square; column maps to `x`, row to `y`.
    pub x: f64,
    pub y: f64,
    pub color: Rgb,
    pub marker_size: u32,
    pub occupied: bool,
}

/// Drawing data for a whole lattice, in site order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderData {
    pub dim: usize,
    pub sites: Vec<RenderSite>,
}

/// Builds per-site positions, colours and marker sizes for a renderer.
///
/// Sites sharing a component share the colour of their root. Unoccupied
/// sites are grey and drawn smaller.
///
/// # Errors
/// - [`PercolationError::LatticeTooLarge`] for [`MAX_RENDER_SITES`] sites
///   or more.
/// - [`PercolationError::NotSquare`] if the number of sites is not a
///   positive perfect square.
pub fn render_data(pointers: &PointerArray, seed: u64) -> Result<RenderData> {
    let num_sites = pointers.len();
    if num_sites >= MAX_RENDER_SITES {
        return Err(PercolationError::LatticeTooLarge {
            num_sites,
            limit: MAX_RENDER_SITES,
        });
    }
    let dim = (num_sites as f64).sqrt().round() as usize;
    if dim == 0 || dim * dim != num_sites {
        return Err(PercolationError::NotSquare { num_sites });
    }

    let big = (MARKER_SCALE / dim as f64).round();
    let small = (big / EMPTY_MARKER_RATIO).round();
    let step = if dim > 1 { 1.0 / (dim - 1) as f64 } else { 0.0 };

    let descriptions = describe_components(pointers);
    let roots = pointers.roots();
    let colors = color_assignment(&roots, seed);

    let sites = descriptions
        .iter()
        .enumerate()
        .map(|(site, desc)| {
            let row = site / dim;
            let col = site % dim;
            let color = desc
                .root
                .and_then(|root| colors.get(&root).copied())
                .unwrap_or(EMPTY_COLOR);
            RenderSite {
                site,
                x: col as f64 * step,
                y: row as f64 * step,
                color,
                marker_size: if desc.occupied { big as u32 } else { small as u32 },
                occupied: desc.occupied,
            }
        })
        .collect();

    Ok(RenderData { dim, sites })
}
