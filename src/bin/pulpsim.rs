use std::path::PathBuf;
use std::process;
use std::time::Instant;

use clap::{Parser, ValueEnum};

use pulpsim::config::CookParameters;
use pulpsim::output::{plot_cook, plot_history, CookReport, CsvConfig, CsvExporter, CsvMetadata, Exporter};
use pulpsim::physics::PhysicalModel;
use pulpsim::solver::{Dopri5Solver, EulerSolver, RK4Solver, Scenario, Solver, SolverConfiguration};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Method {
    /// Adaptive Dormand-Prince, output at the configured times
    Dopri5,
    /// Fixed-step fourth-order Runge-Kutta
    Rk4,
    /// Fixed-step forward Euler
    Euler,
}

#[derive(Parser)]
#[command(name = "pulpsim")]
#[command(about = "Simulate a kraft cook from a parameter file")]
#[command(version)]
struct Args {
    /// Parameter table (CSV with name,value,units,description)
    #[arg(short, long, default_value = "data/parameters.csv")]
    parameters: PathBuf,

    /// Time integration method
    #[arg(short, long, value_enum, default_value_t = Method::Dopri5)]
    solver: Method,

    /// Number of steps for the fixed-step methods
    #[arg(long, default_value_t = 10_000)]
    steps: usize,

    /// Write the cook history as CSV
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write concentration maps (.png or .svg)
    #[arg(long)]
    plot: Option<PathBuf>,

    /// Write temperature and kappa histories (.png or .svg)
    #[arg(long)]
    history_plot: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();

    // ====== Configuration ======

    let parameters = CookParameters::from_path(&args.parameters)?;
    log::info!(
        "Loaded {} ({} compartments, {} kinetics)",
        args.parameters.display(),
        parameters.n_compartments,
        parameters.variant.name()
    );

    let (solver, config): (Box<dyn Solver>, SolverConfiguration) = match args.solver {
        Method::Dopri5 => (Box::new(Dopri5Solver::new()), parameters.adaptive_configuration()),
        Method::Rk4 => (Box::new(RK4Solver::new()), parameters.fixed_step_configuration(args.steps)),
        Method::Euler => (Box::new(EulerSolver::new()), parameters.fixed_step_configuration(args.steps)),
    };

    // ====== Simulation ======

    let scenario = Scenario::new(Box::new(parameters.build_model()?));
    let result = solver.solve(&scenario, &config)?;
    println!("Simulation run time: {:.3} sec", start.elapsed().as_secs_f64());

    // ====== Post-processing ======

    let cook = parameters.build_model()?;
    let report = CookReport::from_result(&cook, &result, parameters.mass_balance_tolerance)?;

    println!("Solver:            {}", solver.name());
    println!("Output times:      {}", report.len());
    if let Some(temperature) = report.final_temperature() {
        println!("Final temperature: {:.2} K", temperature);
    }
    match report.final_kappa() {
        Some(kappa) => println!("Final kappa:       {:.2}", kappa),
        None => println!("Final kappa:       n/a"),
    }
    println!("Total moles drift: {:.6e}", report.max_drift());
    if !report.mass_balance.is_satisfied() {
        println!(
            "Mass balance:      VIOLATED (residual {:.3e} at t = {})",
            report.mass_balance.max_residual, report.mass_balance.worst_time
        );
    }

    // ====== Export ======

    if let Some(path) = &args.csv {
        let metadata = CsvMetadata::from_result(cook.name(), &result);
        CsvExporter::new(CsvConfig::default().with_metadata(metadata)).export(&report, None, path)?;
        log::info!("Wrote {}", path.display());
    }
    if let Some(path) = &args.plot {
        plot_cook(&report, path, None)?;
        log::info!("Wrote {}", path.display());
    }
    if let Some(path) = &args.history_plot {
        plot_history(&report, path, None)?;
        log::info!("Wrote {}", path.display());
    }

    Ok(())
}
