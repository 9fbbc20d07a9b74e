//! Fixed-resolution 2D incompressible fluid solver in the "Stable Fluids" style.
//!
//! A [`FluidSystem`] owns a dye density field and a velocity field on a padded
//! grid. Each [`FluidSystem::step`] adds the caller's sources, then diffuses,
//! projects and self-advects the velocity and diffuses and advects the
//! density through the updated flow.

mod advect;
mod batch;
mod boundary;
mod field;
mod fluid;
mod grid;
mod project;
mod solver;
mod sources;
mod vec2;
mod vec_field;

pub use advect::{advect_into, advect_velocity_into, sample_bilinear};
pub use batch::{step_all, Sources};
pub use boundary::{apply_boundaries, BoundaryPolicy};
pub use field::Field2;
pub use fluid::{FluidStats, FluidSystem, FluidView};
pub use grid::Grid2;
pub use project::{divergence, divergence_into, gradient_into, project, ProjectionScratch};
pub use solver::{diffuse, solve_poisson, SolverConfig};
pub use sources::{splat_density, splat_velocity};
pub use vec2::Vec2;
pub use vec_field::VecField2;
