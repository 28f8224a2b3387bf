//! Shared helpers for integration tests
#![allow(dead_code)]

use std::cmp::Ordering;

use nalgebra::{DMatrix, SymmetricEigen};
use ndarray::{Array1, Array2};
use qntx_mds::{Eigensolver, LandmarkEmbedding};
use tracing_subscriber::EnvFilter;

/// Dense symmetric eigensolver backed by nalgebra
pub struct SymmetricSolver;

impl Eigensolver for SymmetricSolver {
    fn eigendecompose(
        &self,
        matrix: &Array2<f64>,
        dimension: usize,
    ) -> Result<LandmarkEmbedding, String> {
        let n = matrix.nrows();
        if dimension > n {
            return Err(format!(
                "cannot take {} eigenpairs of a {}x{} matrix",
                dimension, n, n
            ));
        }

        let eigen = SymmetricEigen::new(DMatrix::from_fn(n, n, |i, j| matrix[[i, j]]));

        // Largest eigenvalue first
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| {
            eigen.eigenvalues[b]
                .partial_cmp(&eigen.eigenvalues[a])
                .unwrap_or(Ordering::Equal)
        });
        order.truncate(dimension);

        let eigenvectors =
            Array2::from_shape_fn((n, dimension), |(i, c)| eigen.eigenvectors[(i, order[c])]);
        let eigenvalues: Array1<f64> = order.iter().map(|&c| eigen.eigenvalues[c]).collect();
        Ok(LandmarkEmbedding::new(eigenvectors, eigenvalues))
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn euclidean(a: &[f64; 2], b: &[f64; 2]) -> Result<f64, String> {
    Ok(((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)).sqrt())
}

/// Unit square corners
pub fn unit_square() -> Vec<[f64; 2]> {
    vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]]
}

/// Slightly jittered planar grid, `side * side` points
pub fn planar_grid(side: usize) -> Vec<[f64; 2]> {
    (0..side * side)
        .map(|i| {
            let (x, y) = ((i % side) as f64, (i / side) as f64);
            [x + 0.1 * (i as f64).sin(), y + 0.1 * (i as f64 * 1.7).cos()]
        })
        .collect()
}

/// Assert that `embedding` reproduces every pairwise distance of `points`.
pub fn assert_isometric(points: &[[f64; 2]], embedding: &Array2<f64>, tolerance: f64) {
    assert_eq!(embedding.nrows(), points.len());
    for i in 0..points.len() {
        for j in (i + 1)..points.len() {
            let expected = euclidean(&points[i], &points[j]).unwrap();
            let row_i = embedding.row(i);
            let row_j = embedding.row(j);
            let actual = row_i
                .iter()
                .zip(row_j.iter())
                .map(|(a, b)| (a - b).powi(2))
                .sum::<f64>()
                .sqrt();
            assert!(
                (expected - actual).abs() < tolerance,
                "distance between {} and {} is {}, expected {}",
                i,
                j,
                actual,
                expected
            );
        }
    }
}
