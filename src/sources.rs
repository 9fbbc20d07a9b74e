//! Helpers for painting per-tick source fields.
//!
//! Positions are in cell coordinates, where interior cell `(i, j)` has its
//! centre at `(i as f32, j as f32)`. Only interior cells are touched.

use crate::{Field2, Grid2, Vec2, VecField2};

/// Radial weight in `[0, 1]`: one at `center`, zero at `radius` and beyond.
fn falloff(center: (f32, f32), radius: f32, i: usize, j: usize) -> f32 {
    if radius <= 0.0 {
        return 0.0;
    }
    let dx = i as f32 - center.0;
    let dy = j as f32 - center.1;
    let t = (dx * dx + dy * dy) / (radius * radius);
    if t >= 1.0 {
        0.0
    } else {
        let s = 1.0 - t;
        s * s
    }
}

fn covered_range(center: f32, radius: f32, extent: usize) -> std::ops::RangeInclusive<usize> {
    let lo = (center - radius).floor().max(1.0) as usize;
    let hi = ((center + radius).ceil().max(0.0) as usize).min(extent);
    lo..=hi
}

fn for_each_covered(
    grid: Grid2,
    center: (f32, f32),
    radius: f32,
    mut f: impl FnMut(usize, usize, f32),
) {
    for j in covered_range(center.1, radius, grid.height()) {
        for i in covered_range(center.0, radius, grid.width()) {
            let weight = falloff(center, radius, i, j);
            if weight > 0.0 {
                f(i, j, weight);
            }
        }
    }
}

/// Adds `amount` of dye around `center`, fading out at `radius`.
pub fn splat_density(field: &mut Field2, center: (f32, f32), radius: f32, amount: f32) {
    let grid = field.grid();
    for_each_covered(grid, center, radius, |i, j, weight| {
        let value = field.get(i, j);
        field.set(i, j, value + amount * weight);
    });
}

/// Adds `force` around `center`, fading out at `radius`.
pub fn splat_velocity(field: &mut VecField2, center: (f32, f32), radius: f32, force: Vec2) {
    let grid = field.grid();
    for_each_covered(grid, center, radius, |i, j, weight| {
        let value = field.get(i, j);
        field.set(
            i,
            j,
            Vec2::new(value.x + force.x * weight, value.y + force.y * weight),
        );
    });
}
