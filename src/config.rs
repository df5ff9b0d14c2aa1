//! Configuration for batch and bulk operations

use log::warn;

/// Configuration for how batch encode/decode and bulk evaluation are executed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionConfig {
    /// Size of the global rayon pool, 0 picks one thread per core
    pub threads: usize,
    /// Split batch rows, large matrix products and bulk evaluation across the pool
    pub parallel: bool,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            threads: 0,
            parallel: true,
        }
    }
}

impl ExecutionConfig {
    pub fn new(threads: usize, parallel: bool) -> Self {
        Self { threads, parallel }
    }

    /// Every codeword and matrix row processed in order on the calling thread
    pub fn sequential() -> Self {
        Self::new(1, false)
    }

    /// Read `--threads` and `--no-parallel`; an unparsable thread count falls back to auto
    pub fn from_args(matches: &clap::ArgMatches) -> Self {
        let threads = matches
            .get_one::<String>("threads")
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);

        let parallel = !matches.get_flag("no-parallel");

        Self::new(threads, parallel)
    }

    /// Threads a batch may occupy; a sequential config never leaves the caller's thread
    pub fn effective_threads(&self) -> usize {
        match (self.parallel, self.threads) {
            (false, _) => 1,
            (true, 0) => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            (true, n) => n,
        }
    }

    /// Configure the global rayon pool; a pool that is already built is kept
    pub fn install_global_pool(&self) {
        let threads = self.effective_threads();
        if threads > 0 {
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build_global()
                .unwrap_or_else(|_| {
                    warn!(
                        "Could not set thread count to {}, using existing pool",
                        threads
                    );
                });
        }
    }
}
