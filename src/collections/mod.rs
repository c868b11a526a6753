//! Data structures backing the percolation engine.

pub mod pointer_array;

pub use pointer_array::{PointerArray, RootFinding, Site};
