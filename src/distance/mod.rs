//! Distance graphs.
//!
//! The search engine only needs a vertex count and a pairwise distance, so it
//! is written against the [`DistanceGraph`] trait. [`DistanceMatrix`] is the
//! dense implementation used in practice.

mod matrix;

pub use matrix::{DistanceMatrix, Point};

/// A weighted complete graph over `vertex_count()` vertices.
///
/// Tours assume distances are non-negative and symmetric; the incremental
/// length updates of segment reversal rely on symmetry.
pub trait DistanceGraph {
    /// Number of vertices.
    fn vertex_count(&self) -> usize;

    /// Distance from vertex `from` to vertex `to`.
    fn distance(&self, from: usize, to: usize) -> f64;

    /// Returns `true` if vertex coordinates are available.
    fn has_coordinates(&self) -> bool {
        false
    }

    /// Coordinates of a vertex, if known.
    fn coordinate_of(&self, _vertex: usize) -> Option<Point> {
        None
    }
}
