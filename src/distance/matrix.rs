//! Dense distance matrix.

use serde::{Deserialize, Serialize};

use super::DistanceGraph;
use crate::error::{TspError, TspResult};

/// Largest `|d(i, j) - d(j, i)|` accepted for explicit distance data.
const SYMMETRY_TOLERANCE: f64 = 1e-9;

/// A vertex location in 2D or 3D space. 2D points carry `z = 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl Point {
    /// Creates a 2D point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// Creates a 3D point.
    pub fn new_3d(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// A dense n×n distance matrix stored in row-major order.
///
/// Built either from vertex coordinates (Euclidean distances, coordinates are
/// kept) or from explicit distances.
///
/// # Examples
///
/// ```
/// use u_tsp::distance::{DistanceGraph, DistanceMatrix, Point};
///
/// let points = vec![Point::new(0.0, 0.0), Point::new(3.0, 4.0), Point::new(0.0, 8.0)];
/// let dm = DistanceMatrix::from_points(&points);
/// assert!((dm.distance(0, 1) - 5.0).abs() < 1e-10);
/// assert_eq!(dm.vertex_count(), 3);
/// assert!(dm.has_coordinates());
/// ```
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
    coordinates: Option<Vec<Point>>,
}

impl DistanceMatrix {
    /// Creates a distance matrix of the given size, initialized to zero.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0.0; size * size],
            size,
            coordinates: None,
        }
    }

    /// Computes a Euclidean distance matrix from vertex coordinates.
    pub fn from_points(points: &[Point]) -> Self {
        let n = points.len();
        let mut dm = Self::new(n);
        for i in 0..n {
            for j in (i + 1)..n {
                let d = points[i].distance_to(&points[j]);
                dm.set(i, j, d);
                dm.set(j, i, d);
            }
        }
        dm.coordinates = Some(points.to_vec());
        dm
    }

    /// Creates a distance matrix from an explicit row-major n×n grid.
    ///
    /// Fails if the data length doesn't match `size * size`, any entry is
    /// negative or not finite, or `d(i, j)` and `d(j, i)` differ.
    pub fn from_data(size: usize, data: Vec<f64>) -> TspResult<Self> {
        if data.len() != size * size {
            return Err(TspError::invalid_argument(format!(
                "expected {} distances for {size} vertices, got {}",
                size * size,
                data.len()
            )));
        }
        if let Some(bad) = data.iter().find(|d| !d.is_finite() || **d < 0.0) {
            return Err(TspError::invalid_argument(format!(
                "distances must be finite and non-negative, found {bad}"
            )));
        }
        let dm = Self {
            data,
            size,
            coordinates: None,
        };
        if !dm.is_symmetric(SYMMETRY_TOLERANCE) {
            return Err(TspError::invalid_argument(
                "distance matrix must be symmetric",
            ));
        }
        Ok(dm)
    }

    /// Creates a distance matrix from a list of rows.
    pub fn from_rows(rows: &[Vec<f64>]) -> TspResult<Self> {
        let size = rows.len();
        if let Some(row) = rows.iter().find(|r| r.len() != size) {
            return Err(TspError::invalid_argument(format!(
                "row of length {} in a {size}x{size} matrix",
                row.len()
            )));
        }
        Self::from_data(size, rows.concat())
    }

    /// Returns the distance from `from` to `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Sets the distance from `from` to `to`.
    pub fn set(&mut self, from: usize, to: usize, distance: f64) {
        self.data[from * self.size + to] = distance;
    }

    /// Number of vertices in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if the matrix is symmetric within the given tolerance.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                if (self.get(i, j) - self.get(j, i)).abs() > tol {
                    return false;
                }
            }
        }
        true
    }
}

impl DistanceGraph for DistanceMatrix {
    fn vertex_count(&self) -> usize {
        self.size
    }

    fn distance(&self, from: usize, to: usize) -> f64 {
        self.get(from, to)
    }

    fn has_coordinates(&self) -> bool {
        self.coordinates.is_some()
    }

    fn coordinate_of(&self, vertex: usize) -> Option<Point> {
        self.coordinates
            .as_ref()
            .and_then(|points| points.get(vertex).copied())
    }
}
