//! Squared distance matrix assembly
//!
//! Each task owns one row and writes its `j >= i` cells in place; the upper
//! triangle is then mirrored so `M[i][j]` and `M[j][i]` hold the same stored value.
//! Diagonal entries keep whatever the distance callback returns, squared.

use std::fmt::Display;

use ndarray::{Array2, ArrayViewMut1, Axis};

#[cfg(feature = "parallel")]
use ndarray::parallel::prelude::*;

use crate::error::{MdsError, MdsResult, Stage};
use crate::landmarks::validate_landmarks;
use crate::timing::TimedContext;
use crate::workers::WorkerPool;

/// Symmetric matrix of squared pairwise distances
pub type SquaredDistanceMatrix = Array2<f64>;

/// Squared distances between landmarks (L x L), in landmark order.
pub fn compute_distance_matrix<T, F, E>(
    collection: &[T],
    landmarks: &[usize],
    distance: F,
) -> MdsResult<SquaredDistanceMatrix>
where
    T: Sync,
    F: Fn(&T, &T) -> Result<f64, E> + Sync,
    E: Display,
{
    let pool = WorkerPool::for_stage(0, Stage::DistanceMatrix)?;
    compute_distance_matrix_in(&pool, collection, landmarks, distance)
}

/// [`compute_distance_matrix`] on a caller-provided pool
pub fn compute_distance_matrix_in<T, F, E>(
    pool: &WorkerPool,
    collection: &[T],
    landmarks: &[usize],
    distance: F,
) -> MdsResult<SquaredDistanceMatrix>
where
    T: Sync,
    F: Fn(&T, &T) -> Result<f64, E> + Sync,
    E: Display,
{
    let _context = TimedContext::new("Landmark distance matrix computation");
    validate_landmarks(landmarks, collection.len(), Stage::DistanceMatrix)?;
    assemble(pool, landmarks.len(), |i| landmarks[i], collection, &distance)
}

/// Squared distances between all objects (N x N).
pub fn compute_full_distance_matrix<T, F, E>(
    collection: &[T],
    distance: F,
) -> MdsResult<SquaredDistanceMatrix>
where
    T: Sync,
    F: Fn(&T, &T) -> Result<f64, E> + Sync,
    E: Display,
{
    let pool = WorkerPool::for_stage(0, Stage::DistanceMatrix)?;
    compute_full_distance_matrix_in(&pool, collection, distance)
}

/// [`compute_full_distance_matrix`] on a caller-provided pool
pub fn compute_full_distance_matrix_in<T, F, E>(
    pool: &WorkerPool,
    collection: &[T],
    distance: F,
) -> MdsResult<SquaredDistanceMatrix>
where
    T: Sync,
    F: Fn(&T, &T) -> Result<f64, E> + Sync,
    E: Display,
{
    let _context = TimedContext::new("Full distance matrix computation");
    assemble(pool, collection.len(), |i| i, collection, &distance)
}

fn assemble<T, F, E, I>(
    pool: &WorkerPool,
    n: usize,
    object_index: I,
    collection: &[T],
    distance: &F,
) -> MdsResult<SquaredDistanceMatrix>
where
    T: Sync,
    F: Fn(&T, &T) -> Result<f64, E> + Sync,
    E: Display,
    I: Fn(usize) -> usize + Sync,
{
    let mut matrix = Array2::<f64>::zeros((n, n));

    // Entries j >= i of row i
    let fill_row = |(i, mut row): (usize, ArrayViewMut1<f64>)| -> MdsResult<()> {
        let first = object_index(i);
        for j in i..n {
            row[j] = squared_distance(
                distance,
                collection,
                first,
                object_index(j),
                Stage::DistanceMatrix,
            )?;
        }
        Ok(())
    };

    #[cfg(feature = "parallel")]
    pool.install(|| {
        matrix
            .axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .try_for_each(&fill_row)
    })?;

    #[cfg(not(feature = "parallel"))]
    pool.install(|| {
        matrix
            .axis_iter_mut(Axis(0))
            .enumerate()
            .try_for_each(&fill_row)
    })?;

    for i in 0..n {
        for j in (i + 1)..n {
            matrix[[j, i]] = matrix[[i, j]];
        }
    }
    Ok(matrix)
}

/// Evaluate the callback for two objects and square the result.
pub(crate) fn squared_distance<T, F, E>(
    distance: &F,
    collection: &[T],
    first: usize,
    second: usize,
    stage: Stage,
) -> MdsResult<f64>
where
    F: Fn(&T, &T) -> Result<f64, E>,
    E: Display,
{
    let d = distance(&collection[first], &collection[second]).map_err(|e| {
        MdsError::DistanceFunction {
            stage,
            first,
            second,
            message: e.to_string(),
        }
    })?;

    let squared = d * d;
    if !squared.is_finite() {
        return Err(MdsError::numerical(
            stage,
            format!(
                "squared distance between objects {} and {} is not finite (distance {})",
                first, second, d
            ),
        ));
    }
    Ok(squared)
}
