use crate::{apply_boundaries, solve_poisson, BoundaryPolicy, Field2, Grid2, VecField2};

/// Buffers reused by every projection and relaxation solve of one system.
#[derive(Clone, Debug)]
pub struct ProjectionScratch {
    pub(crate) pressure: Field2,
    pub(crate) divergence: Field2,
    pub(crate) gradient: VecField2,
    /// Jacobi destination buffer; its border is never written.
    pub(crate) relax: Field2,
}

impl ProjectionScratch {
    pub fn new(grid: Grid2) -> Self {
        Self {
            pressure: Field2::new(grid),
            divergence: Field2::new(grid),
            gradient: VecField2::new(grid),
            relax: Field2::new(grid),
        }
    }

    pub fn grid(&self) -> Grid2 {
        self.pressure.grid()
    }

    /// Pressure solved by the most recent projection.
    pub fn pressure(&self) -> &Field2 {
        &self.pressure
    }
}

/// Central-difference divergence over interior cells; the border of `out` is left as is.
pub fn divergence_into(out: &mut Field2, velocity: &VecField2) {
    debug_assert_eq!(out.grid(), velocity.grid(), "divergence grid mismatch");
    let grid = velocity.grid();
    let u = velocity.u();
    let v = velocity.v();
    for j in 1..=grid.height() {
        for i in 1..=grid.width() {
            let du = 0.5 * (u.get(i + 1, j) - u.get(i - 1, j));
            let dv = 0.5 * (v.get(i, j + 1) - v.get(i, j - 1));
            out.set(i, j, du + dv);
        }
    }
}

pub fn divergence(velocity: &VecField2) -> Field2 {
    let mut out = Field2::new(velocity.grid());
    divergence_into(&mut out, velocity);
    out
}

/// Central-difference gradient over interior cells; the border of `out` is left as is.
pub fn gradient_into(out: &mut VecField2, pressure: &Field2) {
    debug_assert_eq!(out.grid(), pressure.grid(), "gradient grid mismatch");
    let grid = pressure.grid();
    for j in 1..=grid.height() {
        for i in 1..=grid.width() {
            let dx = 0.5 * (pressure.get(i + 1, j) - pressure.get(i - 1, j));
            let dy = 0.5 * (pressure.get(i, j + 1) - pressure.get(i, j - 1));
            out.u_mut().set(i, j, dx);
            out.v_mut().set(i, j, dy);
        }
    }
}

/// Removes the divergent part of `velocity` in place.
///
/// Solves `4p - sum(neighbours of p) = -div(velocity)` with `iterations`
/// Jacobi sweeps, subtracts `grad(p)` and restores the reflective border of
/// each component.
pub fn project(velocity: &mut VecField2, iterations: usize, scratch: &mut ProjectionScratch) {
    debug_assert_eq!(velocity.grid(), scratch.grid(), "projection grid mismatch");
    let ProjectionScratch {
        pressure,
        divergence,
        gradient,
        relax,
    } = scratch;

    divergence.clear();
    divergence_into(divergence, velocity);
    divergence.scale_in_place(-1.0);
    pressure.clear();
    apply_boundaries(divergence, BoundaryPolicy::Continuity);
    apply_boundaries(pressure, BoundaryPolicy::Continuity);
    solve_poisson(
        pressure,
        divergence,
        1.0,
        4.0,
        BoundaryPolicy::Continuity,
        iterations,
        relax,
    );

    gradient.clear();
    gradient_into(gradient, pressure);
    *velocity -= &*gradient;
    apply_boundaries(velocity.u_mut(), BoundaryPolicy::HorizontalReflective);
    apply_boundaries(velocity.v_mut(), BoundaryPolicy::VerticalReflective);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vec2;
    use std::f32::consts::PI;

    fn assert_close(a: f32, b: f32, tol: f32) {
        assert!(
            (a - b).abs() <= tol,
            "expected {a} to be within {tol} of {b}"
        );
    }

    fn with_walls(mut velocity: VecField2) -> VecField2 {
        apply_boundaries(velocity.u_mut(), BoundaryPolicy::HorizontalReflective);
        apply_boundaries(velocity.v_mut(), BoundaryPolicy::VerticalReflective);
        velocity
    }

    #[test]
    fn divergence_of_linear_field() {
        let grid = Grid2::new(5, 5);
        let velocity = VecField2::from_fn(grid, |i, j| Vec2::new(2.0 * i as f32, -(j as f32)));
        let div = divergence(&velocity);
        assert_close(div.get(3, 3), 1.0, 1e-6);
        assert_close(div.get(2, 4), 1.0, 1e-6);
    }

    #[test]
    fn gradient_of_linear_field() {
        let grid = Grid2::new(4, 4);
        let pressure = Field2::from_fn(grid, |i, j| 3.0 * i as f32 + j as f32);
        let mut grad = VecField2::new(grid);
        gradient_into(&mut grad, &pressure);
        assert_eq!(grad.get(2, 2), Vec2::new(3.0, 1.0));
        assert_eq!(grad.get(0, 0), Vec2::ZERO);
    }

    #[test]
    fn zero_velocity_stays_zero() {
        let grid = Grid2::new(6, 6);
        let mut velocity = VecField2::new(grid);
        let mut scratch = ProjectionScratch::new(grid);
        project(&mut velocity, 20, &mut scratch);
        assert_eq!(velocity, VecField2::new(grid));
    }

    #[test]
    fn projection_reduces_divergence_of_smooth_flow() {
        let grid = Grid2::new(8, 8);
        let velocity = with_walls(VecField2::from_fn(grid, |i, j| {
            let x = (i as f32 - 0.5) / 8.0;
            let y = (j as f32 - 0.5) / 8.0;
            Vec2::new(
                1.5 * (PI * x).sin() * (PI * y + 0.3).cos(),
                -0.8 * (PI * x + 1.1).cos() * (PI * y).sin(),
            )
        }));
        let before = divergence(&velocity).max_abs();
        let mut projected = velocity.clone();
        let mut scratch = ProjectionScratch::new(grid);
        project(&mut projected, 80, &mut scratch);
        let after = divergence(&projected).max_abs();
        assert!(before > 0.1);
        assert!(after < 0.5 * before, "before={before} after={after}");
    }

    #[test]
    fn projection_restores_reflective_walls() {
        let grid = Grid2::new(5, 4);
        let mut velocity = VecField2::from_fn(grid, |i, j| Vec2::new(i as f32 * 0.1, j as f32 * 0.2));
        let mut scratch = ProjectionScratch::new(grid);
        project(&mut velocity, 10, &mut scratch);
        for j in 1..=4 {
            assert_eq!(velocity.u().get(0, j), -velocity.u().get(1, j));
            assert_eq!(velocity.u().get(6, j), -velocity.u().get(5, j));
            assert_eq!(velocity.v().get(0, j), velocity.v().get(1, j));
        }
        for i in 1..=5 {
            assert_eq!(velocity.v().get(i, 0), -velocity.v().get(i, 1));
            assert_eq!(velocity.v().get(i, 5), -velocity.v().get(i, 4));
            assert_eq!(velocity.u().get(i, 0), velocity.u().get(i, 1));
        }
    }

    #[test]
    fn scratch_reuse_gives_identical_results() {
        let grid = Grid2::new(6, 6);
        let velocity = with_walls(VecField2::from_fn(grid, |i, j| {
            Vec2::new((i as f32 * 0.7).sin(), (j as f32 * 0.4).cos())
        }));
        let mut scratch = ProjectionScratch::new(grid);
        let mut first = velocity.clone();
        project(&mut first, 15, &mut scratch);
        let mut second = velocity.clone();
        project(&mut second, 15, &mut scratch);
        assert_eq!(first, second);
    }
}
