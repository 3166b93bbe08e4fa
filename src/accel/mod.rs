//! Optional acceleration for element-wise numeric kernels
//!
//! When the `parallel` feature is enabled the shim builds one dedicated rayon
//! pool the first time it is consulted. Kernels wrapped with [`parallel`] run on
//! that pool instead of the calling thread, and the pool is reused by every
//! kernel for the rest of the process.
//!
//! Whether acceleration is available is decided exactly once and recorded in
//! [`HAS_PARALLEL`]. A missing feature or a pool that fails to build is not an
//! error at that point; it only shows up as `false` in the flag.
//!
//! Two ways to wrap a function coexist:
//!
//! - [`parallel`] is strict and fails with
//!   [`FastephemError::MissingDependency`] when acceleration is unavailable;
//! - [`maybe_parallel`] is lenient and returns `None`, for call sites that keep
//!   the serial function as a fallback.

use crate::{FastephemError, Result};
use lazy_static::lazy_static;
use ndarray::{Array, AsArray, Dimension};

#[cfg(feature = "parallel")]
type Pool = rayon::ThreadPool;

#[cfg(not(feature = "parallel"))]
type Pool = ();

lazy_static! {
    static ref POOL: Option<Pool> = build_pool();

    /// Whether accelerated kernels can be created in this process
    pub static ref HAS_PARALLEL: bool = POOL.is_some();
}

#[cfg(feature = "parallel")]
fn build_pool() -> Option<Pool> {
    match rayon::ThreadPoolBuilder::new()
        .thread_name(|i| format!("fastephem-{}", i))
        .build()
    {
        Ok(pool) => {
            log::debug!(
                "Acceleration pool ready with {} threads",
                pool.current_num_threads()
            );
            Some(pool)
        }
        Err(e) => {
            log::warn!("Could not build acceleration pool, running serially: {}", e);
            None
        }
    }
}

#[cfg(not(feature = "parallel"))]
fn build_pool() -> Option<Pool> {
    log::debug!("Built without the `parallel` feature, acceleration disabled");
    None
}

/// An element-wise numeric function bound to the acceleration pool
pub struct Accelerated<F> {
    func: F,
    #[cfg_attr(not(feature = "parallel"), allow(dead_code))]
    pool: &'static Pool,
}

impl<F> Accelerated<F>
where
    F: Fn(f64) -> f64 + Send + Sync,
{
    /// Apply the function to every element, returning a new array of the same shape
    pub fn call<'a, V, D>(&self, value: V) -> Array<f64, D>
    where
        V: AsArray<'a, f64, D>,
        D: Dimension,
    {
        let mut out = value.into().to_owned();
        self.apply_inplace(&mut out);
        out
    }

    #[cfg(feature = "parallel")]
    fn apply_inplace<D: Dimension>(&self, out: &mut Array<f64, D>) {
        let func = &self.func;
        self.pool.install(|| out.par_mapv_inplace(func));
    }

    #[cfg(not(feature = "parallel"))]
    fn apply_inplace<D: Dimension>(&self, out: &mut Array<f64, D>) {
        out.mapv_inplace(&self.func);
    }

    /// The wrapped serial function
    pub fn inner(&self) -> &F {
        &self.func
    }
}

impl<F> std::fmt::Debug for Accelerated<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Accelerated").finish_non_exhaustive()
    }
}

/// Wrap `func` so it runs on the acceleration pool
///
/// Fails with [`FastephemError::MissingDependency`] when [`HAS_PARALLEL`] is
/// false.
pub fn parallel<F>(func: F) -> Result<Accelerated<F>>
where
    F: Fn(f64) -> f64 + Send + Sync,
{
    maybe_parallel(func).ok_or(FastephemError::MissingDependency("rayon"))
}

/// Wrap `func` if acceleration is available, `None` otherwise
pub(crate) fn maybe_parallel<F>(func: F) -> Option<Accelerated<F>>
where
    F: Fn(f64) -> f64 + Send + Sync,
{
    POOL.as_ref().map(|pool| Accelerated { func, pool })
}
