//! LandmarkMds - end-to-end embedding pipelines
//!
//! Landmark path:
//! select landmarks -> landmark distance matrix -> reference vector ->
//! double-centering -> eigensolver -> coordinates -> triangulation
//!
//! Full path (classical MDS, every object is a landmark):
//! full distance matrix -> double-centering -> eigensolver -> coordinates

use std::fmt::Display;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::config::LandmarkConfig;
use crate::error::MdsResult;
use crate::landmarks::{select_landmarks_with_rng, Landmarks};
use crate::matrix::{compute_distance_matrix_in, compute_full_distance_matrix_in};
use crate::scaling::{
    double_center, landmark_distances_squared, scale_by_eigenvalues, solve, Eigensolver,
};
use crate::triangulate::{triangulate_in, EmbeddingResult};
use crate::workers::WorkerPool;

/// Landmark MDS runner holding a validated configuration
#[derive(Debug, Clone)]
pub struct LandmarkMds {
    config: LandmarkConfig,
}

impl LandmarkMds {
    pub fn new(config: LandmarkConfig) -> MdsResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &LandmarkConfig {
        &self.config
    }

    /// Landmarks for `n_objects`, seeded when the config carries a seed
    pub fn select_landmarks(&self, n_objects: usize) -> MdsResult<Landmarks> {
        let ratio = self.config.landmark_ratio;
        match self.config.seed {
            Some(seed) => {
                select_landmarks_with_rng(n_objects, ratio, &mut StdRng::seed_from_u64(seed))
            }
            None => select_landmarks_with_rng(n_objects, ratio, &mut rand::thread_rng()),
        }
    }

    /// Embed `collection` through a landmark subset.
    ///
    /// The auxiliary eigenvalue vector of the result is always empty.
    pub fn embed<T, F, E, S>(
        &self,
        collection: &[T],
        distance: F,
        solver: &S,
    ) -> MdsResult<EmbeddingResult>
    where
        T: Sync,
        F: Fn(&T, &T) -> Result<f64, E> + Sync,
        E: Display,
        S: Eigensolver + ?Sized,
    {
        let dimension = self.config.target_dimension;
        let landmarks = self.select_landmarks(collection.len())?;
        if landmarks.len() == collection.len() {
            debug!("Every object is a landmark; embed_full computes the same embedding directly");
        }
        info!(
            "Landmark MDS: {} objects, {} landmarks, {} dimensions",
            collection.len(),
            landmarks.len(),
            dimension
        );

        let pool = WorkerPool::new(self.config.num_threads)?;
        let mut matrix = compute_distance_matrix_in(&pool, collection, &landmarks, &distance)?;
        let reference = landmark_distances_squared(&matrix);

        double_center(&mut matrix)?;
        let mut landmark_embedding = solve(solver, &matrix, dimension)?;
        scale_by_eigenvalues(&mut landmark_embedding)?;

        triangulate_in(
            &pool,
            collection,
            &distance,
            &landmarks,
            &reference,
            landmark_embedding,
            dimension,
        )
    }

    /// Embed `collection` with classical MDS over all pairwise distances.
    ///
    /// Unlike [`LandmarkMds::embed`], the result carries the eigenvalues.
    pub fn embed_full<T, F, E, S>(
        &self,
        collection: &[T],
        distance: F,
        solver: &S,
    ) -> MdsResult<EmbeddingResult>
    where
        T: Sync,
        F: Fn(&T, &T) -> Result<f64, E> + Sync,
        E: Display,
        S: Eigensolver + ?Sized,
    {
        let dimension = self.config.target_dimension;
        info!(
            "Classical MDS: {} objects, {} dimensions",
            collection.len(),
            dimension
        );

        let pool = WorkerPool::new(self.config.num_threads)?;
        let mut matrix = compute_full_distance_matrix_in(&pool, collection, distance)?;

        double_center(&mut matrix)?;
        let mut result = solve(solver, &matrix, dimension)?;
        scale_by_eigenvalues(&mut result)?;

        Ok(EmbeddingResult {
            embedding: result.eigenvectors,
            eigenvalues: result.eigenvalues,
        })
    }
}
