//! Landmark selection

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::config::validate_ratio;
use crate::error::{MdsError, MdsResult, Stage};

/// Indices of the objects acting as landmarks.
///
/// Order defines the rows and columns of the landmark distance matrix and the
/// rows of the landmark embedding.
pub type Landmarks = Vec<usize>;

/// Choose `floor(n * ratio)` distinct landmarks uniformly at random.
pub fn select_landmarks_random<T>(collection: &[T], ratio: f64) -> MdsResult<Landmarks> {
    select_landmarks_with_rng(collection.len(), ratio, &mut rand::thread_rng())
}

/// Same as [`select_landmarks_random`] over `n_objects` indices, drawing from `rng`.
pub fn select_landmarks_with_rng<R>(
    n_objects: usize,
    ratio: f64,
    rng: &mut R,
) -> MdsResult<Landmarks>
where
    R: Rng + ?Sized,
{
    validate_ratio(ratio, Stage::Selection)?;

    let n_landmarks = (n_objects as f64 * ratio).floor() as usize;
    if n_landmarks == 0 {
        return Err(MdsError::invalid(
            Stage::Selection,
            format!(
                "ratio {} selects no landmarks out of {} objects",
                ratio, n_objects
            ),
        ));
    }

    let mut landmarks: Landmarks = (0..n_objects).collect();
    landmarks.shuffle(rng);
    landmarks.truncate(n_landmarks);

    debug!(
        "Selected {} of {} objects as landmarks",
        n_landmarks, n_objects
    );
    Ok(landmarks)
}

/// Check that a landmark set is non-empty, in range, and free of duplicates.
pub(crate) fn validate_landmarks(
    landmarks: &[usize],
    n_objects: usize,
    stage: Stage,
) -> MdsResult<()> {
    if landmarks.is_empty() {
        return Err(MdsError::invalid(stage, "landmark set is empty"));
    }

    let mut seen = vec![false; n_objects];
    for &index in landmarks {
        if index >= n_objects {
            return Err(MdsError::invalid(
                stage,
                format!(
                    "landmark index {} out of range for {} objects",
                    index, n_objects
                ),
            ));
        }
        if seen[index] {
            return Err(MdsError::invalid(
                stage,
                format!("landmark index {} appears more than once", index),
            ));
        }
        seen[index] = true;
    }
    Ok(())
}
