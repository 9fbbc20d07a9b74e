use std::ops::{AddAssign, SubAssign};

use crate::{Field2, Grid2, Vec2};

/// Two-component vector quantity; component 0 is `u` (x), component 1 is `v` (y).
#[derive(Clone, Debug, PartialEq)]
pub struct VecField2 {
    u: Field2,
    v: Field2,
}

impl VecField2 {
    pub fn new(grid: Grid2) -> Self {
        Self {
            u: Field2::new(grid),
            v: Field2::new(grid),
        }
    }

    /// Interior cells set to `value`, border cells zero.
    pub fn uniform(grid: Grid2, value: Vec2) -> Self {
        Self::from_fn(grid, |_, _| value)
    }

    pub fn from_fn(grid: Grid2, f: impl Fn(usize, usize) -> Vec2) -> Self {
        let u = Field2::from_fn(grid, |i, j| f(i, j).x);
        let v = Field2::from_fn(grid, |i, j| f(i, j).y);
        Self { u, v }
    }

    pub fn from_components(u: Field2, v: Field2) -> Self {
        assert_eq!(u.grid(), v.grid(), "vector component grid mismatch");
        Self { u, v }
    }

    pub fn grid(&self) -> Grid2 {
        self.u.grid()
    }

    pub fn get(&self, i: usize, j: usize) -> Vec2 {
        Vec2::new(self.u.get(i, j), self.v.get(i, j))
    }

    pub fn set(&mut self, i: usize, j: usize, value: Vec2) {
        self.u.set(i, j, value.x);
        self.v.set(i, j, value.y);
    }

    pub fn u(&self) -> &Field2 {
        &self.u
    }

    pub fn v(&self) -> &Field2 {
        &self.v
    }

    pub fn u_mut(&mut self) -> &mut Field2 {
        &mut self.u
    }

    pub fn v_mut(&mut self) -> &mut Field2 {
        &mut self.v
    }

    pub fn component(&self, axis: usize) -> &Field2 {
        match axis {
            0 => &self.u,
            1 => &self.v,
            _ => panic!("axis {axis} out of range for VecField2"),
        }
    }

    pub fn component_mut(&mut self, axis: usize) -> &mut Field2 {
        match axis {
            0 => &mut self.u,
            1 => &mut self.v,
            _ => panic!("axis {axis} out of range for VecField2"),
        }
    }

    pub fn scale_in_place(&mut self, scale: f32) {
        self.u.scale_in_place(scale);
        self.v.scale_in_place(scale);
    }

    pub fn copy_from(&mut self, other: &Self) {
        self.u.copy_from(&other.u);
        self.v.copy_from(&other.v);
    }

    pub fn clear(&mut self) {
        self.u.clear();
        self.v.clear();
    }

    /// Largest speed over interior cells.
    pub fn max_speed(&self) -> f32 {
        let grid = self.grid();
        let mut max_sq = 0.0_f32;
        for j in 1..=grid.height() {
            for i in 1..=grid.width() {
                max_sq = max_sq.max(self.get(i, j).length_squared());
            }
        }
        max_sq.sqrt()
    }

    pub fn max_abs(&self) -> f32 {
        self.u.max_abs().max(self.v.max_abs())
    }

    pub fn energy(&self) -> f32 {
        self.u.sum_squares() + self.v.sum_squares()
    }

    pub fn is_finite(&self) -> bool {
        self.u.is_finite() && self.v.is_finite()
    }
}

impl AddAssign<&VecField2> for VecField2 {
    fn add_assign(&mut self, other: &VecField2) {
        self.u += &other.u;
        self.v += &other.v;
    }
}

impl SubAssign<&VecField2> for VecField2 {
    fn sub_assign(&mut self, other: &VecField2) {
        self.u -= &other.u;
        self.v -= &other.v;
    }
}
