//! Landmark triangulation
//!
//! Places every non-landmark object in the landmark configuration from its
//! distances to the landmarks alone:
//!
//! ```text
//! x_p = -0.5 * (E / s)^T * (delta_p - delta_mean)
//! ```
//!
//! where `E` holds the landmark coordinates, `s` the eigenvalues, `delta_p` the
//! squared distances from `p` to each landmark and `delta_mean` the reference
//! vector derived from the landmark distance matrix.

use std::fmt::Display;

use ndarray::{Array1, Array2, ArrayViewMut1, Axis};
use tracing::{info, warn};

#[cfg(feature = "parallel")]
use ndarray::parallel::prelude::*;

use crate::error::{MdsError, MdsResult, Stage};
use crate::landmarks::validate_landmarks;
use crate::matrix::squared_distance;
use crate::timing::TimedContext;
use crate::workers::WorkerPool;

/// Spectral embedding of the landmarks produced by the eigensolver
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkEmbedding {
    /// L x K, one row per landmark in landmark order
    pub eigenvectors: Array2<f64>,
    /// K eigenvalues, one per column of `eigenvectors`
    pub eigenvalues: Array1<f64>,
}

impl LandmarkEmbedding {
    pub fn new(eigenvectors: Array2<f64>, eigenvalues: Array1<f64>) -> Self {
        Self {
            eigenvectors,
            eigenvalues,
        }
    }

    pub fn n_landmarks(&self) -> usize {
        self.eigenvectors.nrows()
    }

    pub fn dimension(&self) -> usize {
        self.eigenvalues.len()
    }
}

/// Final embedding of all objects.
///
/// `eigenvalues` is empty for landmark MDS: no per-dimension summary exists for
/// the full point set. Only the full classical MDS path fills it.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingResult {
    /// N x K, one row per object
    pub embedding: Array2<f64>,
    pub eigenvalues: Array1<f64>,
}

/// Extend a landmark embedding to every object of `collection`.
pub fn triangulate<T, F, E>(
    collection: &[T],
    distance: F,
    landmarks: &[usize],
    landmark_distances_squared: &Array1<f64>,
    landmarks_embedding: LandmarkEmbedding,
    target_dimension: usize,
) -> MdsResult<EmbeddingResult>
where
    T: Sync,
    F: Fn(&T, &T) -> Result<f64, E> + Sync,
    E: Display,
{
    let pool = WorkerPool::for_stage(0, Stage::Triangulation)?;
    triangulate_in(
        &pool,
        collection,
        distance,
        landmarks,
        landmark_distances_squared,
        landmarks_embedding,
        target_dimension,
    )
}

/// [`triangulate`] on a caller-provided pool
pub fn triangulate_in<T, F, E>(
    pool: &WorkerPool,
    collection: &[T],
    distance: F,
    landmarks: &[usize],
    landmark_distances_squared: &Array1<f64>,
    landmarks_embedding: LandmarkEmbedding,
    target_dimension: usize,
) -> MdsResult<EmbeddingResult>
where
    T: Sync,
    F: Fn(&T, &T) -> Result<f64, E> + Sync,
    E: Display,
{
    let _context = TimedContext::new("Landmark triangulation");

    let n_objects = collection.len();
    let n_landmarks = landmarks.len();
    check_inputs(
        n_objects,
        landmarks,
        landmark_distances_squared,
        &landmarks_embedding,
        target_dimension,
    )?;

    let LandmarkEmbedding {
        mut eigenvectors,
        eigenvalues,
    } = landmarks_embedding;

    // Landmark rows are copied as-is and never revisited
    let mut placed = vec![false; n_objects];
    let mut embedding = Array2::<f64>::zeros((n_objects, target_dimension));
    for (row, &index) in landmarks.iter().enumerate() {
        placed[index] = true;
        embedding.row_mut(index).assign(&eigenvectors.row(row));
    }

    for (column, mut values) in eigenvectors.axis_iter_mut(Axis(1)).enumerate() {
        values /= eigenvalues[column];
    }

    info!(
        "Triangulating {} objects against {} landmarks",
        n_objects - n_landmarks,
        n_landmarks
    );

    let projection = &eigenvectors;
    let placed = &placed;
    let distance = &distance;
    let place = |scratch: &mut Array1<f64>,
                 (index, mut row): (usize, ArrayViewMut1<f64>)|
     -> MdsResult<()> {
        if placed[index] {
            return Ok(());
        }

        for (slot, &landmark) in scratch.iter_mut().zip(landmarks) {
            *slot = squared_distance(distance, collection, index, landmark, Stage::Triangulation)?;
        }
        *scratch -= landmark_distances_squared;

        let coordinates = projection.t().dot(&*scratch) * -0.5;
        if coordinates.iter().any(|v| !v.is_finite()) {
            return Err(MdsError::numerical(
                Stage::Triangulation,
                format!("object {} triangulated to non-finite coordinates", index),
            ));
        }
        row.assign(&coordinates);
        Ok(())
    };

    #[cfg(feature = "parallel")]
    pool.install(|| {
        embedding
            .axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .try_for_each_init(
                || Array1::zeros(n_landmarks),
                |scratch, item| place(scratch, item),
            )
    })?;

    #[cfg(not(feature = "parallel"))]
    pool.install(|| {
        let mut scratch = Array1::zeros(n_landmarks);
        embedding
            .axis_iter_mut(Axis(0))
            .enumerate()
            .try_for_each(|item| place(&mut scratch, item))
    })?;

    Ok(EmbeddingResult {
        embedding,
        eigenvalues: Array1::zeros(0),
    })
}

fn check_inputs(
    n_objects: usize,
    landmarks: &[usize],
    landmark_distances_squared: &Array1<f64>,
    landmarks_embedding: &LandmarkEmbedding,
    target_dimension: usize,
) -> MdsResult<()> {
    let stage = Stage::Triangulation;
    if target_dimension == 0 {
        return Err(MdsError::invalid(stage, "target_dimension must be at least 1"));
    }
    validate_landmarks(landmarks, n_objects, stage)?;

    let n_landmarks = landmarks.len();
    if landmark_distances_squared.len() != n_landmarks {
        return Err(MdsError::invalid(
            stage,
            format!(
                "{} landmark distances for {} landmarks",
                landmark_distances_squared.len(),
                n_landmarks
            ),
        ));
    }
    if landmarks_embedding.eigenvectors.dim() != (n_landmarks, target_dimension)
        || landmarks_embedding.dimension() != target_dimension
    {
        return Err(MdsError::invalid(
            stage,
            format!(
                "landmark embedding is {:?} with {} eigenvalues, expected ({}, {}) with {}",
                landmarks_embedding.eigenvectors.dim(),
                landmarks_embedding.dimension(),
                n_landmarks,
                target_dimension,
                target_dimension
            ),
        ));
    }

    let eigenvalues = &landmarks_embedding.eigenvalues;
    if let Some((column, value)) = eigenvalues
        .iter()
        .enumerate()
        .find(|(_, v)| !v.is_finite() || **v <= 0.0)
    {
        return Err(MdsError::numerical(
            stage,
            format!("eigenvalue {} is {}, expected a positive value", column, value),
        ));
    }
    if eigenvalues.iter().zip(eigenvalues.iter().skip(1)).any(|(a, b)| b > a) {
        warn!("Landmark eigenvalues are not in non-increasing order: {}", eigenvalues);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, arr2};
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn abs_distance(a: &f64, b: &f64) -> Result<f64, String> {
        Ok((a - b).abs())
    }

    /// Landmarks at -1 and 1 on a line, embedded (reflected) at 1 and -1.
    fn line_embedding() -> LandmarkEmbedding {
        LandmarkEmbedding::new(arr2(&[[1.0], [-1.0]]), arr1(&[2.0]))
    }

    #[test]
    fn test_places_point_between_landmarks() {
        let points = vec![-1.0, 0.5, 1.0];
        let result = triangulate(
            &points,
            abs_distance,
            &[0, 2],
            &arr1(&[2.0, 2.0]),
            line_embedding(),
            1,
        )
        .unwrap();

        assert_eq!(result.embedding, arr2(&[[1.0], [-0.5], [-1.0]]));
        assert!(result.eigenvalues.is_empty());
    }

    #[test]
    fn test_landmark_rows_copied_unchanged() {
        let points: Vec<f64> = (0..10).map(|i| i as f64 * 0.25 - 1.0).collect();
        let embedding = LandmarkEmbedding::new(arr2(&[[0.3, -0.7], [1.1, 0.2]]), arr1(&[3.0, 0.5]));
        let result = triangulate(
            &points,
            abs_distance,
            &[7, 2],
            &arr1(&[1.5, 2.5]),
            embedding.clone(),
            2,
        )
        .unwrap();

        assert_eq!(result.embedding.row(7), embedding.eigenvectors.row(0));
        assert_eq!(result.embedding.row(2), embedding.eigenvectors.row(1));
    }

    #[test]
    fn test_zero_eigenvalue_fails_before_any_distance() {
        let calls = AtomicUsize::new(0);
        let counting = |a: &f64, b: &f64| -> Result<f64, String> {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok((a - b).abs())
        };
        let points = vec![-1.0, 0.5, 1.0];
        let embedding = LandmarkEmbedding::new(arr2(&[[1.0, 0.0], [-1.0, 0.0]]), arr1(&[2.0, 0.0]));

        let err = triangulate(&points, counting, &[0, 2], &arr1(&[2.0, 2.0]), embedding, 2)
            .unwrap_err();
        assert!(matches!(
            err,
            MdsError::Numerical {
                stage: Stage::Triangulation,
                ..
            }
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_negative_eigenvalue_rejected() {
        let points = vec![-1.0, 0.5, 1.0];
        let embedding = LandmarkEmbedding::new(arr2(&[[1.0], [-1.0]]), arr1(&[-2.0]));
        let err = triangulate(&points, abs_distance, &[0, 2], &arr1(&[2.0, 2.0]), embedding, 1)
            .unwrap_err();
        assert!(matches!(err, MdsError::Numerical { .. }));
    }

    #[test]
    fn test_shape_mismatches_are_invalid() {
        let points = vec![-1.0, 0.5, 1.0];
        let lds = arr1(&[2.0, 2.0]);

        let err = triangulate(&points, abs_distance, &[0, 2], &lds, line_embedding(), 2)
            .unwrap_err();
        assert!(matches!(err, MdsError::InvalidParameter { .. }));

        let err = triangulate(&points, abs_distance, &[0, 2], &arr1(&[2.0]), line_embedding(), 1)
            .unwrap_err();
        assert!(matches!(err, MdsError::InvalidParameter { .. }));

        let err = triangulate(&points, abs_distance, &[0, 2], &lds, line_embedding(), 0)
            .unwrap_err();
        assert!(matches!(err, MdsError::InvalidParameter { .. }));

        let err = triangulate(&points, abs_distance, &[0, 0], &lds, line_embedding(), 1)
            .unwrap_err();
        assert!(matches!(err, MdsError::InvalidParameter { .. }));
    }

    #[test]
    fn test_distance_failure_aborts() {
        let points: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let failing = |a: &f64, b: &f64| -> Result<f64, String> {
            if *a == 13.0 {
                Err(format!("cannot measure {}", a))
            } else {
                Ok((a - b).abs())
            }
        };
        let err = triangulate(
            &points,
            failing,
            &[0, 19],
            &arr1(&[2.0, 2.0]),
            line_embedding(),
            1,
        )
        .unwrap_err();

        match err {
            MdsError::DistanceFunction {
                stage,
                first,
                message,
                ..
            } => {
                assert_eq!(stage, Stage::Triangulation);
                assert_eq!(first, 13);
                assert_eq!(message, "cannot measure 13");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_increasing_eigenvalues_still_triangulate() {
        let points = vec![-1.0, 0.5, 1.0];
        let embedding = LandmarkEmbedding::new(arr2(&[[1.0, 0.0], [-1.0, 0.0]]), arr1(&[2.0, 4.0]));
        let result = triangulate(
            &points,
            abs_distance,
            &[0, 2],
            &arr1(&[2.0, 2.0]),
            embedding,
            2,
        )
        .unwrap();

        assert_eq!(result.embedding, arr2(&[[1.0, 0.0], [-0.5, 0.0], [-1.0, 0.0]]));
    }

    #[test]
    fn test_rank_deficient_embedding_is_tolerated() {
        let points: Vec<f64> = (0..6).map(|i| i as f64).collect();
        // Second coordinate carries no information
        let embedding = LandmarkEmbedding::new(
            arr2(&[[1.0, 0.0], [0.0, 0.0], [-1.0, 0.0]]),
            arr1(&[2.0, 1e-12]),
        );
        let result = triangulate(
            &points,
            abs_distance,
            &[0, 2, 4],
            &arr1(&[3.0, 2.0, 3.0]),
            embedding,
            2,
        )
        .unwrap();
        assert_eq!(result.embedding.dim(), (6, 2));
        assert!(result.embedding.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_bit_identical_across_worker_counts() {
        let points: Vec<f64> = (0..200).map(|i| (i as f64 * 0.11).sin() * 5.0).collect();
        let embedding = LandmarkEmbedding::new(
            arr2(&[[0.4, 0.1], [-0.2, 0.9], [0.7, -0.3], [-0.9, -0.6]]),
            arr1(&[4.0, 1.5]),
        );
        let landmarks = [3, 50, 120, 199];
        let lds = arr1(&[10.0, 7.5, 9.0, 12.0]);

        let single = WorkerPool::new(1).unwrap();
        let many = WorkerPool::new(4).unwrap();
        let a = triangulate_in(
            &single,
            &points,
            abs_distance,
            &landmarks,
            &lds,
            embedding.clone(),
            2,
        )
        .unwrap();
        let b =
            triangulate_in(&many, &points, abs_distance, &landmarks, &lds, embedding, 2).unwrap();

        for (x, y) in a.embedding.iter().zip(b.embedding.iter()) {
            assert_eq!(x.to_bits(), y.to_bits());
        }
    }
}
