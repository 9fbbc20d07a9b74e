use crate::Field2;

/// How the ghost border of a quantity is derived from its interior.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundaryPolicy {
    /// Border mirrors the adjacent interior cell with the same sign.
    /// Used for density, pressure and divergence.
    Continuity,
    /// Left and right walls mirror with inverted sign; used for `u`.
    HorizontalReflective,
    /// Bottom and top walls mirror with inverted sign; used for `v`.
    VerticalReflective,
}

impl BoundaryPolicy {
    /// Policy for velocity component `axis` (0 = x, 1 = y).
    pub fn for_axis(axis: usize) -> Self {
        match axis {
            0 => BoundaryPolicy::HorizontalReflective,
            1 => BoundaryPolicy::VerticalReflective,
            _ => panic!("axis {axis} out of range for a 2D velocity"),
        }
    }

    fn wall_signs(self) -> (f32, f32) {
        match self {
            BoundaryPolicy::Continuity => (1.0, 1.0),
            BoundaryPolicy::HorizontalReflective => (-1.0, 1.0),
            BoundaryPolicy::VerticalReflective => (1.0, -1.0),
        }
    }
}

/// Overwrites the border of `field` from its interior.
///
/// The left/right columns are filled first, then the bottom/top rows. Both
/// passes cover interior positions only, so the four corner cells are left
/// untouched.
pub fn apply_boundaries(field: &mut Field2, policy: BoundaryPolicy) {
    let grid = field.grid();
    let w = grid.width();
    let h = grid.height();
    let (side_sign, cap_sign) = policy.wall_signs();
    for j in 1..=h {
        let left = field.get(1, j);
        let right = field.get(w, j);
        field.set(0, j, side_sign * left);
        field.set(w + 1, j, side_sign * right);
    }
    for i in 1..=w {
        let bottom = field.get(i, 1);
        let top = field.get(i, h);
        field.set(i, 0, cap_sign * bottom);
        field.set(i, h + 1, cap_sign * top);
    }
}
