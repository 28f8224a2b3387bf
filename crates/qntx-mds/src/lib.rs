//! QNTX Landmark Multidimensional Scaling
//!
//! Embeds N objects known only through a pairwise distance function into a
//! low-dimensional Euclidean space. A random subset of landmarks carries the
//! cubic-cost eigen-decomposition; every other object is triangulated from its
//! distances to the landmarks.
//!
//! # Pipeline
//!
//! 1. [`select_landmarks_random`] - uniform landmark subset
//! 2. [`compute_distance_matrix`] - squared distances between landmarks
//!    ([`compute_full_distance_matrix`] over all objects)
//! 3. external [`Eigensolver`] - spectral embedding of the landmarks
//! 4. [`triangulate`] - out-of-sample placement of the remaining objects
//!
//! [`LandmarkMds`] runs the whole pipeline from a [`LandmarkConfig`].
//!
//! # Features
//!
//! - `parallel` (default) - fork-join worker pools via rayon
//!
//! # Example
//!
//! ```rust
//! use ndarray::{arr1, arr2};
//! use qntx_mds::{
//!     compute_distance_matrix, landmark_distances_squared, triangulate, LandmarkEmbedding,
//! };
//!
//! let points = vec![-1.0f64, 0.5, 1.0];
//! let distance = |a: &f64, b: &f64| -> Result<f64, String> { Ok((a - b).abs()) };
//! let landmarks = vec![0, 2];
//!
//! let matrix = compute_distance_matrix(&points, &landmarks, distance).unwrap();
//! assert_eq!(matrix, arr2(&[[0.0, 4.0], [4.0, 0.0]]));
//!
//! // Coordinates of the two landmarks and the eigenvalue of their single axis
//! let embedding = LandmarkEmbedding::new(arr2(&[[1.0], [-1.0]]), arr1(&[2.0]));
//! let reference = landmark_distances_squared(&matrix);
//!
//! let result = triangulate(&points, distance, &landmarks, &reference, embedding, 1).unwrap();
//! assert_eq!(result.embedding, arr2(&[[1.0], [-0.5], [-1.0]]));
//! assert!(result.eigenvalues.is_empty());
//! ```

pub mod config;
pub mod error;
pub mod landmarks;
pub mod matrix;
pub mod mds;
pub mod scaling;
pub mod triangulate;
pub mod workers;

mod timing;

// Re-export main types at crate root
pub use config::LandmarkConfig;
pub use error::{MdsError, MdsResult, Stage};
pub use landmarks::{select_landmarks_random, select_landmarks_with_rng, Landmarks};
pub use matrix::{
    compute_distance_matrix, compute_distance_matrix_in, compute_full_distance_matrix,
    compute_full_distance_matrix_in, SquaredDistanceMatrix,
};
pub use mds::LandmarkMds;
pub use scaling::{double_center, landmark_distances_squared, scale_by_eigenvalues, Eigensolver};
pub use triangulate::{triangulate, triangulate_in, EmbeddingResult, LandmarkEmbedding};
pub use workers::WorkerPool;
