//! Stepping many independent systems at once.
//!
//! Each [`FluidSystem`] is still stepped sequentially; parallelism only ever
//! spans distinct instances.

use rayon::prelude::*;
use std::sync::OnceLock;

use crate::{Field2, FluidSystem, VecField2};

const PAR_THRESHOLD_DEFAULT: usize = 65_536;

fn parallel_threshold() -> usize {
    static THRESHOLD: OnceLock<usize> = OnceLock::new();
    *THRESHOLD.get_or_init(|| {
        std::env::var("SIM_PAR_THRESHOLD")
            .ok()
            .and_then(|value| value.parse::<usize>().ok())
            .filter(|value| *value > 0)
            .unwrap_or(PAR_THRESHOLD_DEFAULT)
    })
}

fn should_parallel(systems: &[FluidSystem]) -> bool {
    if systems.len() < 2 || rayon::current_num_threads() < 2 {
        return false;
    }
    let cells: usize = systems.iter().map(|system| system.grid().interior_size()).sum();
    cells >= parallel_threshold()
}

/// Per-tick sources for one system in a batch.
#[derive(Clone, Copy, Debug)]
pub struct Sources<'a> {
    pub density: &'a Field2,
    pub velocity: &'a VecField2,
}

/// Steps `systems[k]` with `sources[k]`.
///
/// Runs on the rayon pool when the combined interior cell count reaches
/// `SIM_PAR_THRESHOLD`, otherwise in order on the calling thread. Results are
/// identical either way.
pub fn step_all(systems: &mut [FluidSystem], sources: &[Sources<'_>], dt: f32) {
    assert_eq!(systems.len(), sources.len(), "one source pair per system");
    if should_parallel(systems) {
        systems
            .par_iter_mut()
            .zip(sources.par_iter())
            .for_each(|(system, source)| {
                system.step(source.density, source.velocity, dt);
            });
    } else {
        for (system, source) in systems.iter_mut().zip(sources.iter()) {
            system.step(source.density, source.velocity, dt);
        }
    }
}
