//! Per-call fork-join worker pools
//!
//! Every parallel loop runs inside a pool that is built for the call and
//! dropped when the call returns, so no worker threads outlive an embedding.
//! Without the `parallel` feature the pool runs everything on the caller's thread.

#[cfg(feature = "parallel")]
use crate::error::MdsError;
use crate::error::{MdsResult, Stage};

/// Fork-join pool for the distance matrix and triangulation sweeps
pub struct WorkerPool {
    #[cfg(feature = "parallel")]
    pool: rayon::ThreadPool,
}

impl WorkerPool {
    /// Build a pool with `num_threads` workers (0 = one per logical CPU)
    pub fn new(num_threads: usize) -> MdsResult<Self> {
        Self::for_stage(num_threads, Stage::Configuration)
    }

    #[cfg(feature = "parallel")]
    pub(crate) fn for_stage(num_threads: usize, stage: Stage) -> MdsResult<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|i| format!("qntx-mds-{}", i))
            .build()
            .map_err(|e| MdsError::WorkerPool {
                stage,
                message: e.to_string(),
            })?;
        Ok(Self { pool })
    }

    #[cfg(not(feature = "parallel"))]
    pub(crate) fn for_stage(_num_threads: usize, _stage: Stage) -> MdsResult<Self> {
        Ok(Self {})
    }

    /// Run `op` inside the pool and wait for every task it forks
    pub fn install<OP, R>(&self, op: OP) -> R
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        #[cfg(feature = "parallel")]
        {
            self.pool.install(op)
        }
        #[cfg(not(feature = "parallel"))]
        {
            op()
        }
    }

    /// Number of workers tasks are spread across
    pub fn num_threads(&self) -> usize {
        #[cfg(feature = "parallel")]
        {
            self.pool.current_num_threads()
        }
        #[cfg(not(feature = "parallel"))]
        {
            1
        }
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("num_threads", &self.num_threads())
            .finish()
    }
}
