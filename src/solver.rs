use std::sync::OnceLock;

use crate::{apply_boundaries, BoundaryPolicy, Field2};

const RELAX_ITERS_DEFAULT: usize = 20;
const PRESSURE_ITERS_DEFAULT: usize = 20;

fn env_iterations(key: &str) -> Option<usize> {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
}

fn default_relax_iterations() -> usize {
    static ITERS: OnceLock<usize> = OnceLock::new();
    *ITERS.get_or_init(|| env_iterations("SIM_RELAX_ITERS").unwrap_or(RELAX_ITERS_DEFAULT))
}

fn default_pressure_iterations() -> usize {
    static ITERS: OnceLock<usize> = OnceLock::new();
    *ITERS.get_or_init(|| {
        env_iterations("SIM_PRESSURE_ITERS").unwrap_or(PRESSURE_ITERS_DEFAULT)
    })
}

/// Fixed sweep counts for the relaxation solves.
///
/// `Default` honours the `SIM_RELAX_ITERS` and `SIM_PRESSURE_ITERS`
/// environment variables.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SolverConfig {
    /// Sweeps per diffusion solve.
    pub relax_iterations: usize,
    /// Sweeps per pressure solve inside projection.
    pub pressure_iterations: usize,
}

impl SolverConfig {
    pub fn new(relax_iterations: usize, pressure_iterations: usize) -> Self {
        Self {
            relax_iterations,
            pressure_iterations,
        }
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self::new(default_relax_iterations(), default_pressure_iterations())
    }
}

/// Jacobi relaxation of `x = (x0 + a * sum(neighbours of x)) / c`.
///
/// `x` is the write destination and `x0` the read-only right-hand side. Every
/// sweep reads the previous sweep's values of `x` and writes the interior of
/// `scratch`, which is then copied back whole. `scratch` must hold zeros in
/// its border; it is only ever written at interior cells. All `iterations`
/// sweeps run; there is no convergence test.
pub fn solve_poisson(
    x: &mut Field2,
    x0: &Field2,
    a: f32,
    c: f32,
    policy: BoundaryPolicy,
    iterations: usize,
    scratch: &mut Field2,
) {
    debug_assert_eq!(x.grid(), x0.grid(), "poisson grid mismatch");
    debug_assert_eq!(x.grid(), scratch.grid(), "poisson scratch grid mismatch");
    let grid = x.grid();
    x.copy_from(x0);
    for _ in 0..iterations {
        for j in 1..=grid.height() {
            for i in 1..=grid.width() {
                let neighbours =
                    x.get(i - 1, j) + x.get(i + 1, j) + x.get(i, j - 1) + x.get(i, j + 1);
                scratch.set(i, j, (x0.get(i, j) + a * neighbours) / c);
            }
        }
        x.copy_from(scratch);
        apply_boundaries(x, policy);
    }
}

/// Implicit diffusion of `x0` into `x` at `rate` over `dt`.
pub fn diffuse(
    x: &mut Field2,
    x0: &Field2,
    rate: f32,
    dt: f32,
    policy: BoundaryPolicy,
    iterations: usize,
    scratch: &mut Field2,
) {
    let grid = x.grid();
    let a = dt * rate * grid.width() as f32 * grid.height() as f32;
    solve_poisson(x, x0, a, 1.0 + 4.0 * a, policy, iterations, scratch);
}
