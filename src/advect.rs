use crate::{apply_boundaries, BoundaryPolicy, Field2, VecField2};

/// Bilinear sample of `field` at a fractional cell position.
///
/// The position must lie in `[0.5, width + 0.5] x [0.5, height + 0.5]`, so
/// every tap stays inside the padded buffer.
pub fn sample_bilinear(field: &Field2, x: f32, y: f32) -> f32 {
    let i0 = x.floor() as usize;
    let j0 = y.floor() as usize;
    let i1 = i0 + 1;
    let j1 = j0 + 1;
    let s1 = x - i0 as f32;
    let s0 = 1.0 - s1;
    let t1 = y - j0 as f32;
    let t0 = 1.0 - t1;
    s0 * (t0 * field.get(i0, j0) + t1 * field.get(i0, j1))
        + s1 * (t0 * field.get(i1, j0) + t1 * field.get(i1, j1))
}

/// Semi-Lagrangian transport of `prev` through `velocity` into `out`.
///
/// `prev` and `velocity` are read-only; `out` is written at every interior
/// cell and then has `policy` applied once. Velocities are in domain units per
/// unit time, so the backtrace is scaled by the grid extents.
pub fn advect_into(
    out: &mut Field2,
    prev: &Field2,
    velocity: &VecField2,
    dt: f32,
    policy: BoundaryPolicy,
) {
    debug_assert_eq!(out.grid(), prev.grid(), "advection grid mismatch");
    debug_assert_eq!(out.grid(), velocity.grid(), "advection velocity grid mismatch");
    let grid = out.grid();
    let w = grid.width() as f32;
    let h = grid.height() as f32;
    let dt_x = dt * w;
    let dt_y = dt * h;
    for j in 1..=grid.height() {
        for i in 1..=grid.width() {
            let x = (i as f32 - dt_x * velocity.u().get(i, j)).clamp(0.5, w + 0.5);
            let y = (j as f32 - dt_y * velocity.v().get(i, j)).clamp(0.5, h + 0.5);
            out.set(i, j, sample_bilinear(prev, x, y));
        }
    }
    apply_boundaries(out, policy);
}

/// Advects each component of `prev` through `velocity`, applying the
/// component's reflective policy.
pub fn advect_velocity_into(out: &mut VecField2, prev: &VecField2, velocity: &VecField2, dt: f32) {
    for axis in 0..2 {
        advect_into(
            out.component_mut(axis),
            prev.component(axis),
            velocity,
            dt,
            BoundaryPolicy::for_axis(axis),
        );
    }
}
