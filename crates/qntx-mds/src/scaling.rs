//! Classical scaling around the external eigensolver
//!
//! The eigen-decomposition itself is supplied by the caller through
//! [`Eigensolver`]. This module prepares its input (double-centering) and turns
//! its output into coordinates.

use ndarray::{Array1, Array2, Axis};

use crate::error::{MdsError, MdsResult, Stage};
use crate::matrix::SquaredDistanceMatrix;
use crate::triangulate::LandmarkEmbedding;

/// Contract for symmetric eigen-decomposition backends.
pub trait Eigensolver {
    /// Return the `dimension` leading eigenpairs of the symmetric `matrix`,
    /// largest eigenvalue first, eigenvectors as columns.
    fn eigendecompose(
        &self,
        matrix: &Array2<f64>,
        dimension: usize,
    ) -> Result<LandmarkEmbedding, String>;
}

/// Mean squared distance from each landmark to all landmarks (column means).
pub fn landmark_distances_squared(matrix: &SquaredDistanceMatrix) -> Array1<f64> {
    matrix
        .mean_axis(Axis(0))
        .unwrap_or_else(|| Array1::zeros(0))
}

/// Replace `D` with `-0.5 * J D J`, where `J` is the centering matrix.
pub fn double_center(matrix: &mut SquaredDistanceMatrix) -> MdsResult<()> {
    let (rows, cols) = matrix.dim();
    if rows != cols {
        return Err(MdsError::invalid(
            Stage::Eigensolver,
            format!("cannot center a {}x{} matrix", rows, cols),
        ));
    }
    let (Some(row_means), Some(col_means)) =
        (matrix.mean_axis(Axis(1)), matrix.mean_axis(Axis(0)))
    else {
        return Ok(());
    };
    let grand_mean = row_means.sum() / rows as f64;

    for ((i, j), value) in matrix.indexed_iter_mut() {
        *value = -0.5 * (*value - row_means[i] - col_means[j] + grand_mean);
    }
    Ok(())
}

/// Turn unit eigenvectors into coordinates: column `c` times `sqrt(s[c])`.
pub fn scale_by_eigenvalues(embedding: &mut LandmarkEmbedding) -> MdsResult<()> {
    if embedding.eigenvectors.ncols() != embedding.eigenvalues.len() {
        return Err(MdsError::invalid(
            Stage::Eigensolver,
            format!(
                "{} eigenvector columns for {} eigenvalues",
                embedding.eigenvectors.ncols(),
                embedding.eigenvalues.len()
            ),
        ));
    }
    for (column, &value) in embedding.eigenvalues.iter().enumerate() {
        if !value.is_finite() || value <= 0.0 {
            return Err(MdsError::numerical(
                Stage::Eigensolver,
                format!("eigenvalue {} is {}, expected a positive value", column, value),
            ));
        }
    }

    let eigenvalues = &embedding.eigenvalues;
    for (column, mut values) in embedding.eigenvectors.axis_iter_mut(Axis(1)).enumerate() {
        values *= eigenvalues[column].sqrt();
    }
    Ok(())
}

/// Run the solver and check that its output fits an `n x dimension` embedding.
pub(crate) fn solve<S>(
    solver: &S,
    matrix: &Array2<f64>,
    dimension: usize,
) -> MdsResult<LandmarkEmbedding>
where
    S: Eigensolver + ?Sized,
{
    let embedding = solver
        .eigendecompose(matrix, dimension)
        .map_err(MdsError::Eigensolver)?;

    let expected = (matrix.nrows(), dimension);
    if embedding.eigenvectors.dim() != expected || embedding.dimension() != dimension {
        return Err(MdsError::invalid(
            Stage::Eigensolver,
            format!(
                "eigensolver returned {:?} eigenvectors and {} eigenvalues, expected {:?} and {}",
                embedding.eigenvectors.dim(),
                embedding.dimension(),
                expected,
                dimension
            ),
        ));
    }
    Ok(embedding)
}
