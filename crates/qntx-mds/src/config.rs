//! Landmark MDS configuration

use serde::{Deserialize, Serialize};

use crate::error::{MdsError, MdsResult, Stage};

/// Configuration for a landmark MDS run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandmarkConfig {
    /// Fraction of objects used as landmarks, in (0, 1]
    pub landmark_ratio: f64,
    /// Number of coordinates per embedded object
    pub target_dimension: usize,
    /// Workers per parallel loop (0 = one per logical CPU)
    pub num_threads: usize,
    /// Seed for landmark sampling; unseeded runs draw from the thread-local RNG
    pub seed: Option<u64>,
}

impl Default for LandmarkConfig {
    fn default() -> Self {
        Self {
            landmark_ratio: 0.5,
            target_dimension: 2,
            num_threads: 0,
            seed: None,
        }
    }
}

impl LandmarkConfig {
    /// Parse a JSON configuration; missing fields take their defaults.
    pub fn from_json(json: &str) -> MdsResult<Self> {
        let config: LandmarkConfig = serde_json::from_str(json).map_err(|e| {
            MdsError::invalid(Stage::Configuration, format!("invalid config: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> MdsResult<()> {
        validate_ratio(self.landmark_ratio, Stage::Configuration)?;
        if self.target_dimension == 0 {
            return Err(MdsError::invalid(
                Stage::Configuration,
                "target_dimension must be at least 1",
            ));
        }
        Ok(())
    }
}

pub(crate) fn validate_ratio(ratio: f64, stage: Stage) -> MdsResult<()> {
    if !ratio.is_finite() || ratio <= 0.0 || ratio > 1.0 {
        return Err(MdsError::invalid(
            stage,
            format!("landmark ratio must be in (0, 1], got {}", ratio),
        ));
    }
    Ok(())
}
