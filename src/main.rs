use clap::Parser;
use metropolis_ising::config::{InitialState, SimulationConfig};
use metropolis_ising::errors::Result;
use metropolis_ising::monte_carlo::observables::SampleRecorder;
use metropolis_ising::monte_carlo::temperature_scan::scan_temperatures;
use metropolis_ising::simulation::Simulation;
use metropolis_ising::utils::running_average;
use statrs::statistics::Statistics;
use std::path::Path;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Metropolis Monte Carlo for the 2D Ising model on a periodic square lattice
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Override the lattice width N
    #[arg(short = 'n', long)]
    size: Option<usize>,

    /// Override the temperature
    #[arg(short, long)]
    temperature: Option<f64>,

    /// Override the number of sweeps
    #[arg(short, long)]
    sweeps: Option<u64>,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Initial spin configuration
    #[arg(long, value_enum)]
    initial_state: Option<InitialState>,

    /// Comma separated temperatures; runs one replica per temperature in parallel
    #[arg(long, value_delimiter = ',')]
    scan: Vec<f64>,

    /// Do not print the final lattice
    #[arg(long)]
    quiet: bool,
}

fn load_config(args: &Args) -> Result<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => SimulationConfig::from_file(Path::new(path))?,
        None => SimulationConfig::default(),
    };
    if let Some(size) = args.size {
        config.lattice_size = size;
    }
    if let Some(temperature) = args.temperature {
        config.temperature = temperature;
    }
    if let Some(sweeps) = args.sweeps {
        config.sweeps = sweeps;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if let Some(initial_state) = args.initial_state {
        config.initial_state = initial_state;
    }
    if !args.scan.is_empty() {
        config.scan_temperatures = args.scan.clone();
    }
    config.validate()?;
    Ok(config)
}

fn run_single(config: &SimulationConfig, quiet: bool) -> Result<()> {
    let mut simulation = Simulation::new(config)?;
    let mut recorder = SampleRecorder::new(config.burn_in_sweeps, config.sample_interval);
    simulation.run(Some(&mut recorder));

    if !recorder.is_empty() {
        let abs_magnetisations: Vec<f64> =
            recorder.get_magnetisations().iter().map(|m| m.abs()).collect();
        let running = running_average(&abs_magnetisations);
        // a drifting running mean means the burn in was too short
        debug!(
            halfway = running[running.len() / 2],
            end = running[running.len() - 1],
            "running mean of |m|"
        );
        info!(
            samples = recorder.len(),
            mean_abs_magnetisation = running[running.len() - 1],
            mean_energy_per_site = recorder.get_energies().mean(),
            "equilibrium estimates"
        );
    }

    if !quiet {
        print!("{}", simulation.lattice());
    }
    Ok(())
}

fn run_scan(config: &SimulationConfig) -> Result<()> {
    let result = scan_temperatures(
        config.lattice_size,
        &config.scan_temperatures,
        config.get_scan_settings(),
        config.initial_state,
        config.seed,
    )?;

    println!("# {}", result.get_lattice_description());
    println!("# T |m| e C chi U4");
    for (i, temperature) in result.get_temperatures().iter().enumerate() {
        println!(
            "{:.4} {:.6} {:.6} {:.6} {:.6} {:.6}",
            temperature,
            result.get_avg_abs_magnetisations()[i],
            result.get_avg_energies()[i],
            result.get_heat_capacities()[i],
            result.get_magnetic_susceptibilities()[i],
            result.get_binder_cumulants()[i],
        );
    }
    Ok(())
}

fn main() {
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let outcome = if config.scan_temperatures.is_empty() {
        run_single(&config, args.quiet)
    } else {
        run_scan(&config)
    };

    if let Err(e) = outcome {
        eprintln!("Simulation error: {}", e);
        std::process::exit(1);
    }
}
