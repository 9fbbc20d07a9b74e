use std::mem;

use log::{debug, log_enabled, trace, Level};

use crate::{
    advect_into, advect_velocity_into, diffuse, divergence, project, BoundaryPolicy, Field2,
    Grid2, ProjectionScratch, SolverConfig, VecField2,
};

/// Read-only view of the simulated fields, handed out after each step.
#[derive(Clone, Copy, Debug)]
pub struct FluidView<'a> {
    density: &'a Field2,
    velocity: &'a VecField2,
}

impl<'a> FluidView<'a> {
    pub fn density(&self) -> &'a Field2 {
        self.density
    }

    pub fn velocity(&self) -> &'a VecField2 {
        self.velocity
    }
}

/// Summary numbers for logging and tests.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FluidStats {
    /// Total density over interior cells.
    pub mass: f32,
    pub max_divergence: f32,
    pub energy: f32,
    pub max_speed: f32,
}

/// Stable-fluids solver on a fixed `width x height` grid.
///
/// Owns the current and previous density and velocity buffers plus all solver
/// scratch; nothing is allocated after construction.
#[derive(Clone, Debug)]
pub struct FluidSystem {
    grid: Grid2,
    diffusion: f32,
    viscosity: f32,
    config: SolverConfig,
    density: Field2,
    density_prev: Field2,
    velocity: VecField2,
    velocity_prev: VecField2,
    scratch: ProjectionScratch,
    ticks: u64,
}

impl FluidSystem {
    pub fn new(width: usize, height: usize, diffusion: f32, viscosity: f32) -> Self {
        Self::with_config(width, height, diffusion, viscosity, SolverConfig::default())
    }

    pub fn with_config(
        width: usize,
        height: usize,
        diffusion: f32,
        viscosity: f32,
        config: SolverConfig,
    ) -> Self {
        debug_assert!(diffusion >= 0.0, "diffusion must be >= 0");
        debug_assert!(viscosity >= 0.0, "viscosity must be >= 0");
        let grid = Grid2::new(width, height);
        debug!(
            "fluid system {}x{} diffusion={} viscosity={} relax_iters={} pressure_iters={}",
            width,
            height,
            diffusion,
            viscosity,
            config.relax_iterations,
            config.pressure_iterations
        );
        Self {
            grid,
            diffusion,
            viscosity,
            config,
            density: Field2::new(grid),
            density_prev: Field2::new(grid),
            velocity: VecField2::new(grid),
            velocity_prev: VecField2::new(grid),
            scratch: ProjectionScratch::new(grid),
            ticks: 0,
        }
    }

    pub fn grid(&self) -> Grid2 {
        self.grid
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn diffusion(&self) -> f32 {
        self.diffusion
    }

    pub fn viscosity(&self) -> f32 {
        self.viscosity
    }

    pub fn config(&self) -> SolverConfig {
        self.config
    }

    pub fn density(&self) -> &Field2 {
        &self.density
    }

    pub fn velocity(&self) -> &VecField2 {
        &self.velocity
    }

    /// Steps taken since construction or the last [`clear`](Self::clear).
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn view(&self) -> FluidView<'_> {
        FluidView {
            density: &self.density,
            velocity: &self.velocity,
        }
    }

    /// Advances one tick: sources are added, then velocity and density are stepped.
    ///
    /// Both source fields must share this system's grid, and `dt` must be positive.
    pub fn step(
        &mut self,
        added_density: &Field2,
        added_velocity: &VecField2,
        dt: f32,
    ) -> FluidView<'_> {
        debug_assert_eq!(added_density.grid(), self.grid, "density source grid mismatch");
        debug_assert_eq!(added_velocity.grid(), self.grid, "velocity source grid mismatch");
        debug_assert!(dt > 0.0, "dt must be > 0");
        self.step_velocity(added_velocity, dt);
        self.step_density(added_density, dt);
        self.ticks += 1;
        if log_enabled!(Level::Debug) {
            let stats = self.stats();
            debug!(
                "step={} dt={:.4} mass={:.4} max_div={:.3e} energy={:.4} max_speed={:.4}",
                self.ticks, dt, stats.mass, stats.max_divergence, stats.energy, stats.max_speed
            );
        }
        self.view()
    }

    /// Zeroes all four simulation buffers. Dimensions and coefficients are kept.
    pub fn clear(&mut self) {
        self.density.clear();
        self.density_prev.clear();
        self.velocity.clear();
        self.velocity_prev.clear();
        self.ticks = 0;
    }

    pub fn stats(&self) -> FluidStats {
        FluidStats {
            mass: self.density.sum(),
            max_divergence: divergence(&self.velocity).max_abs(),
            energy: self.velocity.energy(),
            max_speed: self.velocity.max_speed(),
        }
    }

    // Order is fixed: diffuse, project, self-advect, project.
    fn step_velocity(&mut self, added_velocity: &VecField2, dt: f32) {
        self.velocity += added_velocity;

        trace!("velocity: diffuse viscosity={}", self.viscosity);
        mem::swap(&mut self.velocity, &mut self.velocity_prev);
        for axis in 0..2 {
            diffuse(
                self.velocity.component_mut(axis),
                self.velocity_prev.component(axis),
                self.viscosity,
                dt,
                BoundaryPolicy::for_axis(axis),
                self.config.relax_iterations,
                &mut self.scratch.relax,
            );
        }
        trace!("velocity: project");
        project(
            &mut self.velocity,
            self.config.pressure_iterations,
            &mut self.scratch,
        );

        trace!("velocity: self-advect");
        mem::swap(&mut self.velocity, &mut self.velocity_prev);
        advect_velocity_into(&mut self.velocity, &self.velocity_prev, &self.velocity_prev, dt);
        trace!("velocity: project");
        project(
            &mut self.velocity,
            self.config.pressure_iterations,
            &mut self.scratch,
        );
    }

    // Runs after step_velocity so dye moves with the updated flow.
    fn step_density(&mut self, added_density: &Field2, dt: f32) {
        self.density += added_density;

        trace!("density: diffuse diffusion={}", self.diffusion);
        mem::swap(&mut self.density, &mut self.density_prev);
        diffuse(
            &mut self.density,
            &self.density_prev,
            self.diffusion,
            dt,
            BoundaryPolicy::Continuity,
            self.config.relax_iterations,
            &mut self.scratch.relax,
        );

        trace!("density: advect");
        mem::swap(&mut self.density, &mut self.density_prev);
        advect_into(
            &mut self.density,
            &self.density_prev,
            &self.velocity,
            dt,
            BoundaryPolicy::Continuity,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vec2;

    fn assert_close(a: f32, b: f32, tol: f32) {
        assert!(
            (a - b).abs() <= tol,
            "expected {a} to be within {tol} of {b}"
        );
    }

    fn quiet_system(width: usize, height: usize) -> FluidSystem {
        FluidSystem::with_config(width, height, 0.0, 0.0, SolverConfig::new(20, 20))
    }

    #[test]
    fn zero_sources_keep_zero_state() {
        let mut system =
            FluidSystem::with_config(6, 5, 0.001, 0.002, SolverConfig::new(10, 10));
        let grid = system.grid();
        system.clear();
        let density = Field2::new(grid);
        let velocity = VecField2::new(grid);
        system.step(&density, &velocity, 0.1);
        assert_eq!(system.density(), &density);
        assert_eq!(system.velocity(), &velocity);
    }

    #[test]
    fn single_dye_cell_stays_put_without_flow() {
        let mut system = quiet_system(4, 4);
        let grid = system.grid();
        let dye = Field2::from_fn(grid, |i, j| if (i, j) == (2, 2) { 1.0 } else { 0.0 });
        let view = system.step(&dye, &VecField2::new(grid), 1.0);
        let density = view.density();
        for j in 1..=4 {
            for i in 1..=4 {
                let expected = if (i, j) == (2, 2) { 1.0 } else { 0.0 };
                assert_eq!(density.get(i, j), expected, "cell ({i}, {j})");
            }
        }
    }

    #[test]
    fn uniform_push_is_projected_divergence_free() {
        let mut system = quiet_system(4, 4);
        let grid = system.grid();
        let push = VecField2::uniform(grid, Vec2::new(1.0, 0.0));
        system.step(&Field2::new(grid), &push, 1.0);
        let max_div = divergence(system.velocity()).max_abs();
        assert!(max_div < 1e-2, "max divergence {max_div}");
    }

    #[test]
    fn step_leaves_borders_consistent() {
        let mut system =
            FluidSystem::with_config(7, 5, 0.0005, 0.0005, SolverConfig::new(10, 20));
        let grid = system.grid();
        let dye = Field2::from_fn(grid, |i, j| ((i * j) % 3) as f32);
        let push = VecField2::from_fn(grid, |i, j| Vec2::new(0.05 * j as f32, -0.03 * i as f32));
        system.step(&dye, &push, 0.1);
        let density = system.density();
        let u = system.velocity().u();
        let v = system.velocity().v();
        for j in 1..=5 {
            assert_eq!(density.get(0, j), density.get(1, j));
            assert_eq!(density.get(8, j), density.get(7, j));
            assert_eq!(u.get(0, j), -u.get(1, j));
            assert_eq!(u.get(8, j), -u.get(7, j));
            assert_eq!(v.get(0, j), v.get(1, j));
            assert_eq!(v.get(8, j), v.get(7, j));
        }
        for i in 1..=7 {
            assert_eq!(density.get(i, 0), density.get(i, 1));
            assert_eq!(density.get(i, 6), density.get(i, 5));
            assert_eq!(u.get(i, 0), u.get(i, 1));
            assert_eq!(u.get(i, 6), u.get(i, 5));
            assert_eq!(v.get(i, 0), -v.get(i, 1));
            assert_eq!(v.get(i, 6), -v.get(i, 5));
        }
    }

    #[test]
    fn clear_resets_fields_but_keeps_parameters() {
        let mut system =
            FluidSystem::with_config(5, 5, 0.01, 0.02, SolverConfig::new(5, 5));
        let grid = system.grid();
        let dye = Field2::from_fn(grid, |_, _| 1.0);
        let push = VecField2::uniform(grid, Vec2::new(0.2, 0.1));
        system.step(&dye, &push, 0.1);
        assert!(system.density().sum() > 0.0);
        system.clear();
        assert_eq!(system.density(), &Field2::new(grid));
        assert_eq!(system.velocity(), &VecField2::new(grid));
        assert_eq!(system.ticks(), 0);
        assert_eq!(system.width(), 5);
        assert_eq!(system.diffusion(), 0.01);
        assert_eq!(system.viscosity(), 0.02);
        assert_eq!(system.config(), SolverConfig::new(5, 5));
    }

    #[test]
    fn clear_twice_matches_clear_once() {
        let mut system = quiet_system(4, 3);
        let grid = system.grid();
        let dye = Field2::from_fn(grid, |i, _| i as f32);
        system.step(&dye, &VecField2::uniform(grid, Vec2::new(0.1, 0.0)), 0.5);
        system.clear();
        let once = system.clone();
        system.clear();
        assert_eq!(system.density(), once.density());
        assert_eq!(system.velocity(), once.velocity());
        system.step(&Field2::new(grid), &VecField2::new(grid), 0.5);
        assert_eq!(system.density(), &Field2::new(grid));
        assert_eq!(system.velocity(), &VecField2::new(grid));
    }

    #[test]
    fn density_is_carried_by_the_updated_flow() {
        // Dye and a rightward push are injected in the same tick; the dye must
        // already move, which only happens when the new velocity is used.
        let mut system = quiet_system(8, 8);
        let grid = system.grid();
        let dye = Field2::from_fn(grid, |i, j| if (i, j) == (3, 4) { 1.0 } else { 0.0 });
        let push = VecField2::from_fn(grid, |i, j| {
            if (2..=6).contains(&i) && (3..=5).contains(&j) {
                Vec2::new(0.05, 0.0)
            } else {
                Vec2::ZERO
            }
        });
        system.step(&dye, &push, 0.5);
        assert!(system.density().get(3, 4) < 1.0);
    }

    #[test]
    fn stats_track_mass() {
        let mut system = quiet_system(4, 4);
        let grid = system.grid();
        let dye = Field2::from_fn(grid, |_, _| 0.5);
        system.step(&dye, &VecField2::new(grid), 0.1);
        let stats = system.stats();
        assert_close(stats.mass, 8.0, 1e-5);
        assert_eq!(stats.max_speed, 0.0);
        assert_eq!(system.ticks(), 1);
    }
}
