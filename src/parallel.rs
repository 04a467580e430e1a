//! Download worker pool sizing
//!
//! Downloads are independent, so the pipeline can run several at once. The
//! default stays at one worker, which reproduces a strictly sequential run.

/// Configuration for concurrent downloads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerConfig {
    pub workers: usize,
}

impl WorkerConfig {
    /// `0` selects one worker per CPU core.
    pub fn new(requested: usize) -> Self {
        if requested == 0 {
            Self::all_cores()
        } else {
            Self { workers: requested }
        }
    }

    /// One download at a time.
    pub fn sequential() -> Self {
        Self { workers: 1 }
    }

    /// Create a configuration that uses all available CPU cores
    pub fn all_cores() -> Self {
        Self {
            workers: num_cpus::get().max(1),
        }
    }

    pub fn is_sequential(&self) -> bool {
        self.workers == 1
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self::sequential()
    }
}
