use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use rayon::ThreadPool;
use serde::{Deserialize, Serialize};

use crate::error::{CentralityError, Result};

/// Default for `max_memory_mb` (4 GB).
pub const DEFAULT_MEMORY_MB: usize = 4096;

/// Lower bound for `max_memory_mb`.
pub const MIN_MEMORY_MB: usize = 64;

/// Upper bound for `max_memory_mb` (128 GB).
pub const MAX_MEMORY_MB: usize = 131_072;

/// Engine-wide settings, independent of any single call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Working-memory cap for one computation. Calls whose estimate exceeds
    /// it fail before traversal starts.
    pub max_memory_mb: usize,
    /// Worker threads for a dedicated pool. `None` runs on the global rayon pool.
    pub num_threads: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_memory_mb: DEFAULT_MEMORY_MB,
            num_threads: None,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| CentralityError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(MIN_MEMORY_MB..=MAX_MEMORY_MB).contains(&self.max_memory_mb) {
            return Err(CentralityError::Config(format!(
                "max_memory_mb must be within {}..={}, got {}",
                MIN_MEMORY_MB, MAX_MEMORY_MB, self.max_memory_mb
            )));
        }
        if self.num_threads == Some(0) {
            return Err(CentralityError::Config("num_threads must be at least 1".into()));
        }
        Ok(())
    }

    /// Number of workers a computation will run on.
    pub fn worker_count(&self) -> usize {
        self.num_threads
            .unwrap_or_else(rayon::current_num_threads)
            .max(1)
    }

    /// Run `op` on the configured pool.
    pub(crate) fn install<R, F>(&self, op: F) -> Result<R>
    where
        R: Send,
        F: FnOnce() -> R + Send,
    {
        match self.num_threads {
            None => Ok(op()),
            Some(threads) => Ok(pool_for(threads)?.install(op)),
        }
    }
}

/// Dedicated pools, built once per thread count and shared by every call.
fn pool_for(threads: usize) -> Result<Arc<ThreadPool>> {
    static POOLS: OnceLock<Mutex<HashMap<usize, Arc<ThreadPool>>>> = OnceLock::new();

    let mut pools = POOLS
        .get_or_init(Default::default)
        .lock()
        .map_err(|_| CentralityError::ThreadPool("thread pool registry poisoned".into()))?;
    if let Some(pool) = pools.get(&threads) {
        return Ok(Arc::clone(pool));
    }
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("centrality-worker-{}", i))
        .build()
        .map(Arc::new)
        .map_err(|e| CentralityError::ThreadPool(e.to_string()))?;
    pools.insert(threads, Arc::clone(&pool));
    Ok(pool)
}
