//! Parallelism configuration.
//!
//! The per-row transform is pure, so the pipeline can run it under rayon or
//! sequentially and must produce byte-identical output either way. This
//! module provides the switch between the two schedules and the scoped
//! thread-pool setup.

use rayon::prelude::*;

/// Whether parallel execution is allowed.
///
/// This is a simple flag passed through the pipeline. When `Parallel`, the
/// pipeline may use rayon parallel iterators; when `Sequential`, it must
/// iterate in place. The actual thread pool is set up at the exporter API
/// level via `n_threads`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Parallelism {
    Sequential,
    Parallel,
}

impl Parallelism {
    /// Create from thread count semantics.
    ///
    /// - 0 = auto (parallel if the rayon pool has multiple threads)
    /// - 1 = sequential
    /// - >1 = parallel
    #[inline]
    pub fn from_threads(n_threads: usize) -> Self {
        if n_threads == 1 || (n_threads == 0 && rayon::current_num_threads() == 1) {
            Parallelism::Sequential
        } else {
            Parallelism::Parallel
        }
    }

    /// Returns `true` if parallel execution is allowed.
    #[inline]
    pub fn is_parallel(self) -> bool {
        matches!(self, Parallelism::Parallel)
    }

    /// Map every item, preserving input order in the output.
    #[inline]
    pub fn maybe_par_map<T, B, I, F>(self, iter: I, f: F) -> Vec<B>
    where
        T: Send,
        B: Send,
        I: IntoIterator<Item = T> + IntoParallelIterator<Item = T>,
        F: Fn(T) -> B + Sync + Send,
    {
        if self.is_parallel() {
            iter.into_par_iter().map(f).collect()
        } else {
            iter.into_iter().map(f).collect()
        }
    }
}

/// Run a closure with the appropriate thread pool.
///
/// Thread count semantics:
/// - `0` = auto (use all available cores)
/// - `1` = sequential (no thread pool)
/// - `n > 1` = use exactly `n` threads
pub fn run_with_threads<T: Send>(n_threads: usize, f: impl FnOnce(Parallelism) -> T + Send) -> T {
    match Parallelism::from_threads(n_threads) {
        Parallelism::Sequential => f(Parallelism::Sequential),
        Parallelism::Parallel => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n_threads)
                .build()
                .expect("failed to create thread pool");
            pool.install(|| f(Parallelism::Parallel))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_threads_semantics() {
        assert!(Parallelism::from_threads(0).is_parallel()); // auto = parallel
        assert!(!Parallelism::from_threads(1).is_parallel()); // 1 = sequential
        assert!(Parallelism::from_threads(2).is_parallel());
        assert!(Parallelism::from_threads(8).is_parallel());
    }

    #[test]
    fn maybe_par_map_preserves_order() {
        let sequential: Vec<_> =
            Parallelism::Sequential.maybe_par_map(0..100usize, |i| i * 2);
        let parallel: Vec<_> = Parallelism::Parallel.maybe_par_map(0..100usize, |i| i * 2);
        assert_eq!(sequential, parallel);
        assert_eq!(sequential[3], 6);
    }

    #[test]
    fn run_with_threads_sequential() {
        let result = run_with_threads(1, |p| {
            assert!(!p.is_parallel());
            42
        });
        assert_eq!(result, 42);
    }

    #[test]
    fn run_with_threads_explicit() {
        let result = run_with_threads(2, |_| rayon::current_num_threads());
        assert_eq!(result, 2);
    }
}
