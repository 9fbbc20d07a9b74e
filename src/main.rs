use anyhow::{ensure, Result};
use clap::Parser;
use log::info;
use stable_fluids::{
    splat_density, splat_velocity, Field2, FluidSystem, SolverConfig, Vec2, VecField2,
};

/// Headless stable-fluids run: a dye plume pushed upward from the bottom.
#[derive(Parser, Debug)]
#[command(name = "stable-fluids", version, about)]
struct Cli {
    /// Interior cells along x
    #[arg(long, default_value_t = 64)]
    width: usize,

    /// Interior cells along y
    #[arg(long, default_value_t = 64)]
    height: usize,

    /// Number of ticks to run
    #[arg(long, default_value_t = 120)]
    steps: usize,

    /// Time step per tick
    #[arg(long, default_value_t = 0.1)]
    dt: f32,

    /// Dye diffusion constant
    #[arg(long, default_value_t = 0.0)]
    diffusion: f32,

    /// Velocity viscosity
    #[arg(long, default_value_t = 0.0)]
    viscosity: f32,

    /// Ticks during which the plume source is active
    #[arg(long, default_value_t = 40)]
    inject_steps: usize,

    /// Jacobi sweeps per diffusion solve (defaults to SIM_RELAX_ITERS or 20)
    #[arg(long)]
    relax_iters: Option<usize>,

    /// Jacobi sweeps per pressure solve (defaults to SIM_PRESSURE_ITERS or 20)
    #[arg(long)]
    pressure_iters: Option<usize>,

    /// Print the final density as ASCII shades
    #[arg(long)]
    ascii: bool,
}

#[derive(Clone, Copy, Debug)]
struct Plume {
    center: (f32, f32),
    radius: f32,
    dye: f32,
    force: Vec2,
}

impl Plume {
    fn new(width: usize, height: usize) -> Self {
        let size = width.min(height) as f32;
        Self {
            center: (width as f32 * 0.5 + 0.5, height as f32 * 0.15 + 0.5),
            radius: (size * 0.08).max(1.5),
            dye: 1.0,
            force: Vec2::new(0.0, 0.02),
        }
    }

    fn fill(&self, density: &mut Field2, velocity: &mut VecField2) {
        splat_density(density, self.center, self.radius, self.dye);
        splat_velocity(velocity, self.center, self.radius, self.force);
    }
}

fn solver_config(cli: &Cli) -> SolverConfig {
    let defaults = SolverConfig::default();
    SolverConfig::new(
        cli.relax_iters.unwrap_or(defaults.relax_iterations),
        cli.pressure_iters.unwrap_or(defaults.pressure_iterations),
    )
}

fn density_to_ascii(density: &Field2) -> String {
    const SHADES: &[u8] = b" .:-=+*#%@";
    let grid = density.grid();
    let mut out = String::with_capacity((grid.width() + 1) * grid.height());
    for j in (1..=grid.height()).rev() {
        for i in 1..=grid.width() {
            let t = density.get(i, j).clamp(0.0, 1.0);
            let idx = (t * (SHADES.len() - 1) as f32).round() as usize;
            out.push(SHADES[idx] as char);
        }
        out.push('\n');
    }
    out
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    ensure!(cli.width > 0 && cli.height > 0, "grid extents must be positive");
    ensure!(cli.dt > 0.0, "dt must be positive, got {}", cli.dt);
    ensure!(
        cli.diffusion >= 0.0 && cli.viscosity >= 0.0,
        "diffusion and viscosity must be non-negative"
    );

    let config = solver_config(&cli);
    let mut system =
        FluidSystem::with_config(cli.width, cli.height, cli.diffusion, cli.viscosity, config);
    let grid = system.grid();
    let plume = Plume::new(cli.width, cli.height);
    let mut added_density = Field2::new(grid);
    let mut added_velocity = VecField2::new(grid);
    let report_every = (cli.steps / 10).max(1);

    info!(
        "running {} steps on {}x{} (dt={}, relax={}, pressure={})",
        cli.steps,
        cli.width,
        cli.height,
        cli.dt,
        config.relax_iterations,
        config.pressure_iterations
    );
    for step in 0..cli.steps {
        added_density.clear();
        added_velocity.clear();
        if step < cli.inject_steps {
            plume.fill(&mut added_density, &mut added_velocity);
        }
        system.step(&added_density, &added_velocity, cli.dt);
        if (step + 1) % report_every == 0 || step + 1 == cli.steps {
            let stats = system.stats();
            info!(
                "step={} mass={:.3} max_div={:.3e} energy={:.4} max_speed={:.4}",
                step + 1,
                stats.mass,
                stats.max_divergence,
                stats.energy,
                stats.max_speed
            );
        }
    }

    ensure!(
        system.density().is_finite() && system.velocity().is_finite(),
        "simulation diverged; try a smaller dt or more pressure iterations"
    );
    let (min_value, max_value) = system.density().min_max();
    println!(
        "{} steps, mass {:.4}, density range [{:.4}, {:.4}]",
        system.ticks(),
        system.density().sum(),
        min_value,
        max_value
    );
    if cli.ascii {
        print!("{}", density_to_ascii(system.density()));
    }
    Ok(())
}
