//! Travel cost matrix.
//!
//! Provides a dense, validated distance matrix for routing problems. Matrices
//! are supplied by the caller; coordinates are never converted here.

mod matrix;

pub use matrix::DistanceMatrix;
