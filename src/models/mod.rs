//! Domain model types.
//!
//! A [`Tour`] is the genome of the search: a permutation of vertex indices
//! bound to a shared distance graph, with its cyclic length cached.

mod tour;

pub use tour::Tour;
