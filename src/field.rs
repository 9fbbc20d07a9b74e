use std::ops::{AddAssign, SubAssign};

use crate::grid::Grid2;

/// Scalar quantity stored on a padded grid.
///
/// Border cells only ever hold boundary reflections written by
/// [`apply_boundaries`](crate::apply_boundaries); stages read them as stencil
/// neighbours but never solve for them.
#[derive(Clone, Debug, PartialEq)]
pub struct Field2 {
    grid: Grid2,
    data: Vec<f32>,
}

impl Field2 {
    pub fn new(grid: Grid2) -> Self {
        let data = vec![0.0; grid.size()];
        Self { grid, data }
    }

    /// Builds a field whose interior cells are `f(i, j)`; border cells start at zero.
    pub fn from_fn(grid: Grid2, f: impl Fn(usize, usize) -> f32) -> Self {
        let mut field = Self::new(grid);
        field.fill_interior(f);
        field
    }

    pub fn grid(&self) -> Grid2 {
        self.grid
    }

    pub fn get(&self, i: usize, j: usize) -> f32 {
        self.data[self.grid.idx(i, j)]
    }

    pub fn set(&mut self, i: usize, j: usize, value: f32) {
        let idx = self.grid.idx(i, j);
        self.data[idx] = value;
    }

    /// Padded, row-major view of every cell, border included.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn fill_interior(&mut self, f: impl Fn(usize, usize) -> f32) {
        for j in 1..=self.grid.height() {
            for i in 1..=self.grid.width() {
                self.set(i, j, f(i, j));
            }
        }
    }

    pub fn scale_in_place(&mut self, scale: f32) {
        for value in &mut self.data {
            *value *= scale;
        }
    }

    /// Full-buffer assignment; keeps the existing allocation.
    pub fn copy_from(&mut self, other: &Self) {
        self.assert_same_grid(other);
        self.data.copy_from_slice(&other.data);
    }

    pub fn clear(&mut self) {
        self.data.fill(0.0);
    }

    /// Sum over interior cells.
    pub fn sum(&self) -> f32 {
        self.interior_values().sum()
    }

    pub fn abs_sum(&self) -> f32 {
        self.interior_values().map(|value| value.abs()).sum()
    }

    pub fn max_abs(&self) -> f32 {
        self.interior_values()
            .map(|value| value.abs())
            .fold(0.0_f32, f32::max)
    }

    pub fn sum_squares(&self) -> f32 {
        self.interior_values().map(|value| value * value).sum()
    }

    pub fn min_max(&self) -> (f32, f32) {
        let mut iter = self.interior_values().filter(|value| value.is_finite());
        let Some(first) = iter.next() else {
            return (0.0, 0.0);
        };
        iter.fold((first, first), |(min_value, max_value), value| {
            (min_value.min(value), max_value.max(value))
        })
    }

    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|value| value.is_finite())
    }

    fn interior_values(&self) -> impl Iterator<Item = f32> + '_ {
        let full_width = self.grid.full_width();
        let width = self.grid.width();
        self.data
            .chunks_exact(full_width)
            .skip(1)
            .take(self.grid.height())
            .flat_map(move |row| row[1..=width].iter().copied())
    }

    fn assert_same_grid(&self, other: &Self) {
        debug_assert_eq!(self.grid, other.grid, "field grid mismatch");
    }
}

impl AddAssign<&Field2> for Field2 {
    fn add_assign(&mut self, other: &Field2) {
        self.assert_same_grid(other);
        for (value, other_value) in self.data.iter_mut().zip(other.data.iter()) {
            *value += other_value;
        }
    }
}

impl SubAssign<&Field2> for Field2 {
    fn sub_assign(&mut self, other: &Field2) {
        self.assert_same_grid(other);
        for (value, other_value) in self.data.iter_mut().zip(other.data.iter()) {
            *value -= other_value;
        }
    }
}
